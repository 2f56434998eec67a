//! Built-in board catalogue.

use crate::board::{
    Board, Capability, InputClock, MemoryWindow, ResetInput, SdramProfile, SdramRate,
    SharedConnector,
};
use crate::error::{BoardError, Result};
use crate::generator::{ClockGenerator, GeneratorFamily};

/// Main RAM origin shared by the built-in boards.
const MAIN_RAM_BASE: u64 = 0x4000_0000;

impl Board {
    /// MicroPhase A7-Lite: Artix-7 with DDR3, MII Ethernet, SD card and HDMI.
    pub fn microphase_a7lite() -> Self {
        Self {
            name: "microphase-a7lite".into(),
            vendor: "MicroPhase A7-Lite".into(),
            device: "xc7a35tfgg484-2".into(),
            clocks: vec![InputClock::new("clk50", 50_000_000)],
            resets: vec![ResetInput::active_low("cpu_reset")],
            generator: ClockGenerator::new(GeneratorFamily::S7Pll, -1),
            capabilities: [
                Capability::Sdram,
                Capability::Ethernet,
                Capability::Sdcard,
                Capability::Video,
                Capability::UserLeds,
                Capability::UserButtons,
                Capability::Serial,
            ]
            .into_iter()
            .collect(),
            main_ram: Some(MemoryWindow {
                base: MAIN_RAM_BASE,
                size: 0x4000_0000,
            }),
            sdram: Some(SdramProfile {
                memtype: "DDR3".into(),
                module: "MT41K256M16".into(),
                rate: SdramRate::Quarter,
                dqs_phase_deg: 90,
            }),
            shared_connectors: Vec::new(),
            default_sys_clk_hz: 50_000_000,
        }
    }

    /// Xilinx KC705: Kintex-7 with DDR3, Ethernet, SPI flash, PCIe x4 and SATA over SFP.
    pub fn xilinx_kc705() -> Self {
        Self {
            name: "xilinx-kc705".into(),
            vendor: "Xilinx KC705".into(),
            device: "xc7k325t-ffg900-2".into(),
            clocks: vec![InputClock::new("clk200", 200_000_000)],
            resets: vec![ResetInput::active_high("cpu_reset")],
            generator: ClockGenerator::new(GeneratorFamily::S7Mmcm, -2),
            capabilities: [
                Capability::Sdram,
                Capability::Ethernet,
                Capability::SpiFlash,
                Capability::Pcie,
                Capability::Sata,
                Capability::UserLeds,
                Capability::Serial,
            ]
            .into_iter()
            .collect(),
            main_ram: Some(MemoryWindow {
                base: MAIN_RAM_BASE,
                size: 0x4000_0000,
            }),
            sdram: Some(SdramProfile {
                memtype: "DDR3".into(),
                module: "MT8JTF12864".into(),
                rate: SdramRate::Quarter,
                dqs_phase_deg: 90,
            }),
            shared_connectors: Vec::new(),
            default_sys_clk_hz: 125_000_000,
        }
    }

    /// HyVision PCIe OPT01 rev F: Kintex-7 with DDR2, SFP Ethernet and PCIe x4.
    pub fn hyvision_pcie_opt01_revf() -> Self {
        Self {
            name: "hyvision-pcie-opt01-revf".into(),
            vendor: "HVS HyVision PCIe OPT01 rev F".into(),
            device: "xc7k160tffg676-1".into(),
            clocks: vec![InputClock::new("clk200", 200_000_000)],
            resets: Vec::new(),
            generator: ClockGenerator::new(GeneratorFamily::S7Mmcm, -1),
            capabilities: [
                Capability::Sdram,
                Capability::Ethernet,
                Capability::Pcie,
                Capability::UserLeds,
                Capability::JtagUart,
            ]
            .into_iter()
            .collect(),
            main_ram: Some(MemoryWindow {
                base: MAIN_RAM_BASE,
                size: 0x1000_0000,
            }),
            sdram: Some(SdramProfile {
                memtype: "DDR2".into(),
                module: "K4T1G164QGBCE7".into(),
                rate: SdramRate::Half,
                dqs_phase_deg: 90,
            }),
            shared_connectors: Vec::new(),
            default_sys_clk_hz: 100_000_000,
        }
    }

    /// YPCB-00338-1P1: Kintex-7 with DDR3 (shifted DQS) and PCIe x8.
    pub fn ypcb_00338_1p1() -> Self {
        Self {
            name: "ypcb-00338-1p1".into(),
            vendor: "YPCB-00338-1P1".into(),
            device: "xc7k480tffg1156-2".into(),
            clocks: vec![InputClock::new("clk50", 50_000_000)],
            resets: vec![ResetInput::active_low("rst_n")],
            generator: ClockGenerator::new(GeneratorFamily::S7Mmcm, -2),
            capabilities: [
                Capability::Sdram,
                Capability::Pcie,
                Capability::UserLeds,
                Capability::JtagUart,
            ]
            .into_iter()
            .collect(),
            main_ram: Some(MemoryWindow {
                base: MAIN_RAM_BASE,
                size: 0x2000_0000,
            }),
            sdram: Some(SdramProfile {
                memtype: "DDR3".into(),
                module: "MT41J256M16".into(),
                rate: SdramRate::Quarter,
                dqs_phase_deg: 135,
            }),
            shared_connectors: Vec::new(),
            default_sys_clk_hz: 125_000_000,
        }
    }

    /// Olimex GateMate A1 EVB: GateMate FPGA with VGA and one PMOD connector.
    pub fn olimex_gatemate_a1_evb() -> Self {
        Self {
            name: "olimex-gatemate-a1-evb".into(),
            vendor: "Olimex GateMate A1 EVB".into(),
            device: "CCGM1A1".into(),
            clocks: vec![InputClock::new("clk0", 10_000_000)],
            resets: vec![
                ResetInput::active_low("user_btn_n"),
                ResetInput::active_low("usr_rstn"),
            ],
            generator: ClockGenerator::new(GeneratorFamily::GatematePll, -1),
            capabilities: [
                Capability::Video,
                Capability::UserLeds,
                Capability::Ethernet,
                Capability::Sdcard,
                Capability::Serial,
            ]
            .into_iter()
            .collect(),
            main_ram: None,
            sdram: None,
            shared_connectors: vec![SharedConnector {
                name: "PMOD".into(),
                components: vec![
                    "spi-sdcard".into(),
                    "sdcard".into(),
                    "ethernet-mac".into(),
                    "etherbone".into(),
                ],
            }],
            default_sys_clk_hz: 24_000_000,
        }
    }

    /// Alinx AX7020: Zynq-7020 programmable logic side with LEDs and buttons.
    pub fn alinx_ax7020() -> Self {
        Self {
            name: "alinx-ax7020".into(),
            vendor: "Alinx AX7020".into(),
            device: "xc7z020clg400-2".into(),
            clocks: vec![InputClock::new("clk50", 50_000_000)],
            resets: Vec::new(),
            generator: ClockGenerator::new(GeneratorFamily::S7Pll, -2),
            capabilities: [
                Capability::UserLeds,
                Capability::UserButtons,
                Capability::Video,
                Capability::Serial,
            ]
            .into_iter()
            .collect(),
            main_ram: None,
            sdram: None,
            shared_connectors: Vec::new(),
            default_sys_clk_hz: 100_000_000,
        }
    }

    /// MLKPAI FS01 DR1V90M: the 25 MHz oscillator drives `sys` without a PLL.
    pub fn mlkpai_fs01_dr1v90m() -> Self {
        Self {
            name: "mlkpai-fs01-dr1v90m".into(),
            vendor: "MLKPAI FS01 DR1V90M".into(),
            device: "DR1V90MEG484".into(),
            clocks: vec![InputClock::new("clk25", 25_000_000)],
            resets: vec![ResetInput::active_low("user_btn")],
            generator: ClockGenerator::new(GeneratorFamily::Bypass, -1),
            capabilities: [Capability::UserLeds, Capability::UserButtons, Capability::Serial]
                .into_iter()
                .collect(),
            main_ram: None,
            sdram: None,
            shared_connectors: Vec::new(),
            default_sys_clk_hz: 25_000_000,
        }
    }
}

/// All built-in boards, in catalogue order.
pub fn builtin_boards() -> Vec<Board> {
    vec![
        Board::microphase_a7lite(),
        Board::xilinx_kc705(),
        Board::hyvision_pcie_opt01_revf(),
        Board::ypcb_00338_1p1(),
        Board::olimex_gatemate_a1_evb(),
        Board::alinx_ax7020(),
        Board::mlkpai_fs01_dr1v90m(),
    ]
}

/// Look up a built-in board by name.
pub fn find_builtin(name: &str) -> Result<Board> {
    builtin_boards()
        .into_iter()
        .find(|b| b.name == name)
        .ok_or_else(|| BoardError::UnknownBoard {
            name: name.to_string(),
        })
}
