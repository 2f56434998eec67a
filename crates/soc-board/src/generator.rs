//! Clock generator families.
//!
//! Each family bounds the configurations a generation stage can take:
//! `f_vco = f_in * mult / div_in` must fall inside the VCO range, and every
//! output is `f_vco / div_out`.

use serde::{Deserialize, Serialize};

/// The PLL/MMCM primitive family available on a device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GeneratorFamily {
    /// Xilinx 7-series PLLE2.
    S7Pll,
    /// Xilinx 7-series MMCME2.
    S7Mmcm,
    /// Cologne Chip GateMate PLL.
    GatematePll,
    /// No generator: the input clock drives `sys` directly.
    Bypass,
}

/// Inclusive configuration ranges of a generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeneratorLimits {
    /// VCO frequency range in Hz.
    pub vco_hz: (u64, u64),
    /// Input (reference) divider range.
    pub input_divider: (u32, u32),
    /// Feedback multiplier range.
    pub multiplier: (u32, u32),
    /// Output divider range.
    pub output_divider: (u32, u32),
    /// Maximum number of outputs per stage.
    pub max_outputs: usize,
}

/// A clock generator: family plus device speed grade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ClockGenerator {
    pub family: GeneratorFamily,
    /// Device speed grade (e.g., -1, -2). Ignored by families without grades.
    #[serde(default = "default_speed_grade")]
    pub speed_grade: i8,
}

fn default_speed_grade() -> i8 {
    -1
}

impl ClockGenerator {
    pub fn new(family: GeneratorFamily, speed_grade: i8) -> Self {
        Self {
            family,
            speed_grade,
        }
    }

    /// Configuration limits for this family and speed grade.
    pub fn limits(&self) -> GeneratorLimits {
        match self.family {
            GeneratorFamily::S7Pll => GeneratorLimits {
                vco_hz: match self.speed_grade {
                    -3 => (800_000_000, 2_133_000_000),
                    -2 => (800_000_000, 1_866_000_000),
                    _ => (800_000_000, 1_600_000_000),
                },
                input_divider: (1, 56),
                multiplier: (2, 64),
                output_divider: (1, 128),
                max_outputs: 6,
            },
            GeneratorFamily::S7Mmcm => GeneratorLimits {
                vco_hz: match self.speed_grade {
                    -3 => (600_000_000, 1_600_000_000),
                    -2 => (600_000_000, 1_440_000_000),
                    _ => (600_000_000, 1_200_000_000),
                },
                input_divider: (1, 106),
                multiplier: (2, 64),
                output_divider: (1, 128),
                max_outputs: 7,
            },
            GeneratorFamily::GatematePll => GeneratorLimits {
                vco_hz: (500_000_000, 2_500_000_000),
                input_divider: (1, 32),
                multiplier: (1, 255),
                output_divider: (1, 128),
                max_outputs: 4,
            },
            GeneratorFamily::Bypass => GeneratorLimits {
                vco_hz: (0, u64::MAX),
                input_divider: (1, 1),
                multiplier: (1, 1),
                output_divider: (1, 1),
                max_outputs: 1,
            },
        }
    }

    /// Whether the family can shift output phase.
    pub fn supports_phase(&self) -> bool {
        !matches!(self.family, GeneratorFamily::Bypass)
    }
}
