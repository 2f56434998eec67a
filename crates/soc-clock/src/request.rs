//! Clock domain requests.
//!
//! A request names a domain and says how fast it runs, where it is derived
//! from, and whether it is phase shifted against another domain.

use serde::{Deserialize, Serialize};

/// Name of the primary system domain.
pub const SYS_DOMAIN: &str = "sys";

/// Default reference frequency for input-delay calibration (IDELAYCTRL).
pub const CALIBRATION_HZ: u64 = 200_000_000;

/// Target frequency of a requested domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Frequency {
    /// Absolute frequency in Hz.
    Hz(u64),
    /// Rational multiple of the `sys` domain frequency.
    SysRatio { num: u32, den: u32 },
}

impl Frequency {
    /// Resolve against the system clock frequency.
    ///
    /// Returns `None` for a zero denominator.
    pub fn resolve(&self, sys_hz: u64) -> Option<u64> {
        match *self {
            Frequency::Hz(hz) => Some(hz),
            Frequency::SysRatio { den: 0, .. } => None,
            Frequency::SysRatio { num, den } => {
                Some(sys_hz.saturating_mul(num as u64) / den as u64)
            }
        }
    }
}

/// Where a domain is derived from.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ClockSource {
    /// The board's primary input clock.
    #[default]
    Primary,
    /// A named physical input clock.
    Input(String),
    /// Another derived domain; shares its generation stage.
    Domain(String),
}

impl std::fmt::Display for ClockSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClockSource::Primary => f.write_str("primary"),
            ClockSource::Input(name) => write!(f, "input:{name}"),
            ClockSource::Domain(name) => write!(f, "domain:{name}"),
        }
    }
}

/// A phase shift against a reference domain of the same stage and frequency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct PhaseOffset {
    /// Reference domain name.
    pub reference: String,
    /// Shift in degrees of one period, in `[0, 360)`.
    pub degrees: f64,
}

/// What a domain is used for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DomainRole {
    #[default]
    General,
    /// Dedicated input-delay calibration reference; never merged with general domains.
    Calibration,
}

/// A request for one clock domain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ClockRequest {
    pub name: String,
    #[serde(rename = "freq")]
    pub frequency: Frequency,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phase: Option<PhaseOffset>,
    #[serde(default)]
    pub source: ClockSource,
    #[serde(default)]
    pub role: DomainRole,
}

impl ClockRequest {
    pub fn new(name: impl Into<String>, frequency: Frequency) -> Self {
        Self {
            name: name.into(),
            frequency,
            phase: None,
            source: ClockSource::Primary,
            role: DomainRole::General,
        }
    }

    /// A domain at a fixed frequency.
    pub fn hz(name: impl Into<String>, hz: u64) -> Self {
        Self::new(name, Frequency::Hz(hz))
    }

    /// A domain at `num/den` times the system clock.
    pub fn sys_ratio(name: impl Into<String>, num: u32, den: u32) -> Self {
        Self::new(name, Frequency::SysRatio { num, den })
    }

    /// The primary `sys` domain.
    pub fn sys(hz: u64) -> Self {
        Self::hz(SYS_DOMAIN, hz)
    }

    /// A dedicated calibration domain on the primary stage.
    pub fn calibration(name: impl Into<String>, hz: u64) -> Self {
        Self {
            role: DomainRole::Calibration,
            ..Self::hz(name, hz)
        }
    }

    pub fn with_phase(mut self, reference: impl Into<String>, degrees: f64) -> Self {
        self.phase = Some(PhaseOffset {
            reference: reference.into(),
            degrees,
        });
        self
    }

    pub fn from_input(mut self, input: impl Into<String>) -> Self {
        self.source = ClockSource::Input(input.into());
        self
    }

    pub fn from_domain(mut self, domain: impl Into<String>) -> Self {
        self.source = ClockSource::Domain(domain.into());
        self
    }
}
