//! Board model.
//!
//! Describes one physical FPGA board: its oscillators, reset inputs,
//! peripheral capabilities, clock generator and memory.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::generator::ClockGenerator;

/// A physical oscillator wired to the FPGA.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct InputClock {
    /// Pin-level name (e.g., "clk50", "clk200").
    pub name: String,
    /// Nominal frequency in Hz.
    pub freq_hz: u64,
}

impl InputClock {
    pub fn new(name: impl Into<String>, freq_hz: u64) -> Self {
        Self {
            name: name.into(),
            freq_hz,
        }
    }

    /// Clock period in nanoseconds.
    pub fn period_ns(&self) -> f64 {
        1e9 / self.freq_hz as f64
    }
}

/// Native polarity of a reset signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Polarity {
    ActiveHigh,
    ActiveLow,
}

/// A physical reset source (push-button, external bus reset).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ResetInput {
    /// Signal name (e.g., "cpu_reset", "user_btn_n").
    pub name: String,
    /// Level at which the input asserts reset.
    pub polarity: Polarity,
}

impl ResetInput {
    pub fn active_high(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            polarity: Polarity::ActiveHigh,
        }
    }

    pub fn active_low(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            polarity: Polarity::ActiveLow,
        }
    }
}

/// A peripheral class the board has pins for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Capability {
    Sdram,
    Ethernet,
    Pcie,
    Sata,
    SpiFlash,
    Sdcard,
    Video,
    UserLeds,
    UserButtons,
    Serial,
    JtagUart,
}

impl Capability {
    /// Every capability, in declaration order.
    pub const ALL: [Capability; 11] = [
        Capability::Sdram,
        Capability::Ethernet,
        Capability::Pcie,
        Capability::Sata,
        Capability::SpiFlash,
        Capability::Sdcard,
        Capability::Video,
        Capability::UserLeds,
        Capability::UserButtons,
        Capability::Serial,
        Capability::JtagUart,
    ];

    /// The kebab-case name used in board files.
    pub fn as_str(&self) -> &'static str {
        match self {
            Capability::Sdram => "sdram",
            Capability::Ethernet => "ethernet",
            Capability::Pcie => "pcie",
            Capability::Sata => "sata",
            Capability::SpiFlash => "spi-flash",
            Capability::Sdcard => "sdcard",
            Capability::Video => "video",
            Capability::UserLeds => "user-leds",
            Capability::UserButtons => "user-buttons",
            Capability::Serial => "serial",
            Capability::JtagUart => "jtag-uart",
        }
    }
}

impl std::fmt::Display for Capability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The address window where main system memory is decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct MemoryWindow {
    /// Base address of the window.
    pub base: u64,
    /// Size of the window in bytes.
    pub size: u64,
}

/// SDRAM controller to PHY clock ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SdramRate {
    #[serde(rename = "1:2")]
    Half,
    #[serde(rename = "1:4")]
    Quarter,
}

impl SdramRate {
    /// Number of DFI phases, which is also the PHY clock multiplier over `sys`.
    pub fn nphases(&self) -> u32 {
        match self {
            SdramRate::Half => 2,
            SdramRate::Quarter => 4,
        }
    }
}

/// External SDRAM wiring and timing profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct SdramProfile {
    /// Memory type (e.g., "DDR2", "DDR3").
    pub memtype: String,
    /// Memory module part name.
    pub module: String,
    /// Controller/PHY clock ratio.
    pub rate: SdramRate,
    /// DQS clock phase relative to the PHY clock, in degrees.
    pub dqs_phase_deg: u32,
}

/// Components that share one physical connector; at most one may be selected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct SharedConnector {
    /// Connector name (e.g., "PMOD").
    pub name: String,
    /// Component identifiers wired through this connector.
    pub components: Vec<String>,
}

/// A complete board description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Board {
    /// Board name (e.g., "microphase-a7lite").
    pub name: String,
    /// Human-readable vendor and product description.
    #[serde(default)]
    pub vendor: String,
    /// FPGA part number.
    pub device: String,
    /// Physical input clocks; the first one is primary.
    pub clocks: Vec<InputClock>,
    /// Physical reset inputs.
    #[serde(default)]
    pub resets: Vec<ResetInput>,
    /// Clock generator available on the device.
    pub generator: ClockGenerator,
    /// Peripheral capabilities the board has pins for.
    #[serde(default)]
    pub capabilities: BTreeSet<Capability>,
    /// Main-RAM address window.
    #[serde(default)]
    pub main_ram: Option<MemoryWindow>,
    /// SDRAM profile, when external SDRAM is fitted.
    #[serde(default)]
    pub sdram: Option<SdramProfile>,
    /// Connector sharing constraints.
    #[serde(default)]
    pub shared_connectors: Vec<SharedConnector>,
    /// Default system clock frequency in Hz.
    pub default_sys_clk_hz: u64,
}

impl Board {
    /// The primary input clock, which drives the primary generation stage.
    pub fn primary_clock(&self) -> Option<&InputClock> {
        self.clocks.first()
    }

    /// Look up an input clock by name.
    pub fn clock(&self, name: &str) -> Option<&InputClock> {
        self.clocks.iter().find(|c| c.name == name)
    }

    /// Whether the board has pins for the given peripheral class.
    pub fn has_capability(&self, capability: Capability) -> bool {
        self.capabilities.contains(&capability)
    }

    /// Connectors shared by more than one of the given components.
    pub fn connector_conflicts<'a>(
        &'a self,
        selected: &'a [String],
    ) -> impl Iterator<Item = (&'a SharedConnector, Vec<&'a str>)> + 'a {
        self.shared_connectors.iter().filter_map(move |connector| {
            let members: Vec<&str> = selected
                .iter()
                .filter(|id| connector.components.contains(id))
                .map(String::as_str)
                .collect();
            (members.len() > 1).then_some((connector, members))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::GeneratorFamily;

    fn sample() -> Board {
        Board {
            name: "sample".into(),
            vendor: String::new(),
            device: "xc7a35t".into(),
            clocks: vec![InputClock::new("clk50", 50_000_000), InputClock::new("clk25", 25_000_000)],
            resets: vec![ResetInput::active_low("rst_n")],
            generator: ClockGenerator::new(GeneratorFamily::S7Pll, -1),
            capabilities: [Capability::UserLeds, Capability::Sdcard].into_iter().collect(),
            main_ram: None,
            sdram: None,
            shared_connectors: vec![SharedConnector {
                name: "PMOD".into(),
                components: vec!["spi-sdcard".into(), "ethernet-phy".into()],
            }],
            default_sys_clk_hz: 50_000_000,
        }
    }

    #[test]
    fn primary_clock_is_first() {
        let board = sample();
        assert_eq!(board.primary_clock().unwrap().name, "clk50");
        assert_eq!(board.clock("clk25").unwrap().freq_hz, 25_000_000);
        assert!(board.clock("clk200").is_none());
    }

    #[test]
    fn capability_lookup() {
        let board = sample();
        assert!(board.has_capability(Capability::UserLeds));
        assert!(!board.has_capability(Capability::Ethernet));
    }

    #[test]
    fn connector_conflicts_need_two_members() {
        let board = sample();
        let one = vec!["spi-sdcard".to_string(), "led-chaser".to_string()];
        assert_eq!(board.connector_conflicts(&one).count(), 0);

        let two = vec!["ethernet-phy".to_string(), "spi-sdcard".to_string()];
        let conflicts: Vec<_> = board.connector_conflicts(&two).collect();
        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].0.name, "PMOD");
        assert_eq!(conflicts[0].1, vec!["ethernet-phy", "spi-sdcard"]);
    }

    #[test]
    fn capability_names_are_kebab_case() {
        assert_eq!(Capability::SpiFlash.to_string(), "spi-flash");
        assert_eq!(Capability::UserLeds.as_str(), "user-leds");
        assert_eq!(Capability::ALL.len(), 11);
    }

    #[test]
    fn sdram_rate_phases() {
        assert_eq!(SdramRate::Half.nphases(), 2);
        assert_eq!(SdramRate::Quarter.nphases(), 4);
    }
}
