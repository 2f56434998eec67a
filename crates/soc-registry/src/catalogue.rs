//! The standard component catalogue.
//!
//! Built per board: the memory PHY's clock domains follow the board's SDRAM
//! rate and DQS phase, and the memory controller is sized to the board's
//! main-RAM window.

use soc_board::{Board, Capability, SdramRate};
use soc_clock::{ClockRequest, CALIBRATION_HZ, SYS_DOMAIN};

use crate::component::{AddressNeed, ComponentSpec};
use crate::error::Result;
use crate::registry::ComponentRegistry;

/// One CSR page.
pub const CSR_SIZE: u64 = 0x800;

/// Main RAM size used when the board does not declare a window.
const DEFAULT_MAIN_RAM_SIZE: u64 = 0x1000_0000;

/// Memory-mapped SPI flash window.
const SPI_FLASH_SIZE: u64 = 0x100_0000;

const ETH_REF_HZ: u64 = 200_000_000;
const SATA_REF_HZ: u64 = 150_000_000;
const VIDEO_PIXEL_HZ: u64 = 65_000_000;

fn sys() -> ClockRequest {
    ClockRequest::sys_ratio(SYS_DOMAIN, 1, 1)
}

/// The standard catalogue's specs for `board`.
pub fn standard_specs(board: &Board) -> Vec<ComponentSpec> {
    let nphases = board
        .sdram
        .as_ref()
        .map_or(SdramRate::Quarter.nphases(), |s| s.rate.nphases());
    let dqs_phase = board.sdram.as_ref().map_or(90, |s| s.dqs_phase_deg);
    let phy_clock = format!("sys{nphases}x");
    let main_ram_size = board.main_ram.map_or(DEFAULT_MAIN_RAM_SIZE, |w| w.size);

    vec![
        ComponentSpec::new("sys-memory-controller", "SDRAM controller serving main RAM")
            .clock(sys())
            .address(AddressNeed::main_ram(main_ram_size))
            .depends_on("ddr-phy")
            .requires(Capability::Sdram),
        ComponentSpec::new("ddr-phy", "DDR PHY with DQS strobe and input-delay calibration")
            .clock(sys())
            .clock(ClockRequest::sys_ratio(&phy_clock, nphases, 1))
            .clock(
                ClockRequest::sys_ratio(format!("{phy_clock}-shifted"), nphases, 1)
                    .with_phase(&phy_clock, dqs_phase as f64),
            )
            .clock(ClockRequest::calibration("idelay", CALIBRATION_HZ))
            .address(AddressNeed::io(CSR_SIZE))
            .requires(Capability::Sdram),
        ComponentSpec::new("led-chaser", "User LED chaser")
            .clock(sys())
            .address(AddressNeed::io(CSR_SIZE))
            .requires(Capability::UserLeds),
        ComponentSpec::new("gpio-buttons", "User push-button inputs")
            .clock(sys())
            .address(AddressNeed::io(CSR_SIZE))
            .requires(Capability::UserButtons),
        ComponentSpec::new("ethernet-phy", "Ethernet PHY")
            .clock(sys())
            .clock(ClockRequest::hz("eth", ETH_REF_HZ))
            .address(AddressNeed::io(CSR_SIZE))
            .requires(Capability::Ethernet),
        ComponentSpec::new("ethernet-mac", "Ethernet MAC with CPU-visible packet buffers")
            .clock(sys())
            .address(AddressNeed::memory(0x2000))
            .depends_on("ethernet-phy"),
        ComponentSpec::new("etherbone", "Etherbone bridge: bus access over UDP")
            .clock(sys())
            .depends_on("ethernet-phy"),
        ComponentSpec::new("spi-flash", "Memory-mapped SPI flash")
            .clock(sys())
            .address(AddressNeed::memory(SPI_FLASH_SIZE))
            .requires(Capability::SpiFlash),
        ComponentSpec::new("spi-sdcard", "SD card over SPI")
            .clock(sys())
            .address(AddressNeed::io(CSR_SIZE))
            .exclusive_in("sd-slot")
            .requires(Capability::Sdcard),
        ComponentSpec::new("sdcard", "SD card over the native 4-bit bus")
            .clock(sys())
            .address(AddressNeed::io(CSR_SIZE))
            .exclusive_in("sd-slot")
            .requires(Capability::Sdcard),
        ComponentSpec::new("pcie-phy", "PCIe PHY")
            .clock(sys())
            .address(AddressNeed::io(CSR_SIZE))
            .requires(Capability::Pcie),
        ComponentSpec::new("pcie-dma", "PCIe endpoint with DMA")
            .clock(sys())
            .address(AddressNeed::io(CSR_SIZE))
            .depends_on("pcie-phy"),
        ComponentSpec::new("sata-phy", "SATA PHY")
            .clock(sys())
            .clock(ClockRequest::hz("sata-refclk", SATA_REF_HZ))
            .address(AddressNeed::io(CSR_SIZE))
            .requires(Capability::Sata),
        ComponentSpec::new("sata-core", "SATA host with DMA into main RAM")
            .clock(sys())
            .address(AddressNeed::io(CSR_SIZE))
            .depends_on("sata-phy")
            .requires_feature("sys-memory-controller"),
        ComponentSpec::new("video-phy", "Video output PHY")
            .clock(ClockRequest::hz("vga", VIDEO_PIXEL_HZ))
            .requires(Capability::Video),
        ComponentSpec::new("video-terminal", "Text-mode video terminal")
            .clock(sys())
            .address(AddressNeed::memory(0x1_0000))
            .depends_on("video-phy"),
    ]
}

/// The standard catalogue for `board`, loaded into a registry.
pub fn standard(board: &Board) -> Result<ComponentRegistry> {
    ComponentRegistry::load(standard_specs(board))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::{DependencyKind, Placement};
    use crate::resolve::resolve;
    use soc_board::builtin_boards;

    #[test]
    fn loads_for_every_builtin_board() {
        for board in builtin_boards() {
            let registry = standard(&board).unwrap();
            assert_eq!(registry.len(), 16, "{}", board.name);
        }
    }

    #[test]
    fn phy_clocks_follow_sdram_rate() {
        let a7 = standard(&Board::microphase_a7lite()).unwrap();
        let names: Vec<_> = a7
            .get("ddr-phy")
            .unwrap()
            .clocks
            .iter()
            .map(|c| c.name.as_str())
            .collect();
        assert_eq!(names, vec!["sys", "sys4x", "sys4x-shifted", "idelay"]);

        let hyvision = standard(&Board::hyvision_pcie_opt01_revf()).unwrap();
        let phy = hyvision.get("ddr-phy").unwrap();
        assert_eq!(phy.clocks[1].name, "sys2x");
        assert_eq!(phy.clocks[2].phase.as_ref().unwrap().reference, "sys2x");
    }

    #[test]
    fn dqs_phase_follows_board() {
        let ypcb = standard(&Board::ypcb_00338_1p1()).unwrap();
        let shifted = &ypcb.get("ddr-phy").unwrap().clocks[2];
        assert_eq!(shifted.phase.as_ref().unwrap().degrees, 135.0);
    }

    #[test]
    fn memory_controller_is_pinned_to_main_ram() {
        let registry = standard(&Board::hyvision_pcie_opt01_revf()).unwrap();
        let need = registry.get("sys-memory-controller").unwrap().address.unwrap();
        assert_eq!(need.placement, Placement::MainRam);
        assert_eq!(need.size, 0x1000_0000);
    }

    #[test]
    fn ethernet_front_ends_share_one_phy() {
        let registry = standard(&Board::xilinx_kc705()).unwrap();
        let resolution = resolve(&registry, &["etherbone"]).unwrap();
        assert_eq!(resolution.order, vec!["ethernet-phy", "etherbone"]);

        let both = resolve(&registry, &["ethernet-mac", "etherbone"]).unwrap();
        assert_eq!(both.order, vec!["ethernet-phy", "ethernet-mac", "etherbone"]);
        assert_eq!(both.auto_included, vec!["ethernet-phy"]);
    }

    #[test]
    fn sd_card_modes_share_one_slot() {
        let registry = standard(&Board::xilinx_kc705()).unwrap();
        let err = resolve(&registry, &["sdcard", "spi-sdcard"]).unwrap_err();
        assert!(matches!(
            err,
            crate::RegistryError::ConflictingFeatureSelection { ref group, .. } if group == "sd-slot"
        ));
    }

    #[test]
    fn sata_needs_memory_controller_selected() {
        let registry = standard(&Board::xilinx_kc705()).unwrap();
        let sata = registry.get("sata-core").unwrap();
        assert_eq!(sata.dependencies[1].kind, DependencyKind::Feature);
        let resolution = resolve(&registry, &["sys-memory-controller", "sata-core"]).unwrap();
        assert_eq!(
            resolution.order,
            vec!["ddr-phy", "sys-memory-controller", "sata-phy", "sata-core"]
        );
    }
}
