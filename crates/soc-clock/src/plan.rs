//! The finished clock plan.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use soc_board::GeneratorFamily;

use crate::request::{ClockSource, DomainRole, PhaseOffset, SYS_DOMAIN};
use crate::reset::ResetLine;

/// A generated clock domain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ClockDomain {
    pub name: String,
    /// Requested frequency in Hz.
    pub freq_hz: u64,
    /// Frequency produced by the chosen divider, rounded to Hz.
    pub achieved_hz: u64,
    /// Output divider on the stage VCO.
    pub divider: u32,
    /// Phase as requested, relative to its reference.
    pub phase: Option<PhaseOffset>,
    /// Phase relative to the stage feedback, in degrees.
    pub absolute_phase_deg: f64,
    /// Source as requested; `Primary` is recorded as the concrete input.
    pub source: ClockSource,
    /// Index into [`ClockPlan::stages`].
    pub stage: usize,
    pub role: DomainRole,
}

impl ClockDomain {
    pub fn period_ns(&self) -> f64 {
        1e9 / self.achieved_hz as f64
    }
}

/// One PLL/MMCM instance driven by one input clock.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct GenerationStage {
    /// Input clock name.
    pub input: String,
    pub input_hz: u64,
    pub family: GeneratorFamily,
    pub input_divider: u32,
    pub multiplier: u32,
    pub vco_hz: u64,
    /// Domain names produced by this stage, in output order.
    pub outputs: Vec<String>,
}

/// A timing constraint handed to the external build flow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", tag = "kind")]
pub enum TimingConstraint {
    Period { clock: String, period_ns: f64 },
    FalsePath { from: String, to: String },
}

impl std::fmt::Display for TimingConstraint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TimingConstraint::Period { clock, period_ns } => {
                write!(f, "period {clock} {period_ns:.3} ns")
            }
            TimingConstraint::FalsePath { from, to } => write!(f, "false-path {from} -> {to}"),
        }
    }
}

/// All clock domains of one composition plus the reset model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ClockPlan {
    pub stages: Vec<GenerationStage>,
    /// Underlying domains, in request order.
    pub domains: Vec<ClockDomain>,
    /// Requested names merged into an identical underlying domain.
    pub aliases: BTreeMap<String, String>,
    pub reset: ResetLine,
}

impl ClockPlan {
    /// Look up a domain by name or alias.
    pub fn domain(&self, name: &str) -> Option<&ClockDomain> {
        let target = self.aliases.get(name).map(String::as_str).unwrap_or(name);
        self.domains.iter().find(|d| d.name == target)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.domain(name).is_some()
    }

    /// Number of underlying domains.
    pub fn len(&self) -> usize {
        self.domains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.domains.is_empty()
    }

    /// Domains generated by one stage.
    pub fn stage_domains(&self, stage: usize) -> impl Iterator<Item = &ClockDomain> {
        self.domains.iter().filter(move |d| d.stage == stage)
    }

    /// Period constraints for every input and domain, plus a false path
    /// from `sys` to each stage input (the reset path into the generator).
    pub fn constraints(&self) -> Vec<TimingConstraint> {
        let mut constraints: Vec<TimingConstraint> = self
            .stages
            .iter()
            .map(|s| TimingConstraint::Period {
                clock: s.input.clone(),
                period_ns: 1e9 / s.input_hz as f64,
            })
            .collect();
        constraints.extend(self.domains.iter().map(|d| TimingConstraint::Period {
            clock: d.name.clone(),
            period_ns: d.period_ns(),
        }));
        if let Some(sys) = self.domain(SYS_DOMAIN) {
            constraints.extend(self.stages.iter().map(|s| TimingConstraint::FalsePath {
                from: sys.name.clone(),
                to: s.input.clone(),
            }));
        }
        constraints
    }
}
