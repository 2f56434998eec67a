//! Human-readable composition report.

use std::fmt;

use soc_clock::DomainRole;

use crate::composition::Composition;

/// Report view of a [`Composition`].
pub struct CompositionReport<'a> {
    composition: &'a Composition,
}

impl Composition {
    pub fn report(&self) -> CompositionReport<'_> {
        CompositionReport { composition: self }
    }
}

fn mhz(hz: u64) -> f64 {
    hz as f64 / 1e6
}

impl fmt::Display for CompositionReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = self.composition;
        let plan = c.clock_plan();

        writeln!(f, "=== SoC Composition ===")?;
        writeln!(f, "Board: {} ({})", c.board().name, c.board().device)?;
        writeln!(f, "Fingerprint: {}", c.fingerprint())?;

        writeln!(f)?;
        writeln!(f, "--- Clock Domains ({}) ---", plan.len())?;
        for domain in &plan.domains {
            write!(
                f,
                "  {:<16} {:>9.3} MHz  (achieved {:.3} MHz, /{}, stage {})",
                domain.name,
                mhz(domain.freq_hz),
                mhz(domain.achieved_hz),
                domain.divider,
                domain.stage
            )?;
            if domain.absolute_phase_deg != 0.0 {
                write!(f, " @{}°", domain.absolute_phase_deg)?;
            }
            if domain.role == DomainRole::Calibration {
                write!(f, " [calibration]")?;
            }
            writeln!(f)?;
        }
        for (alias, target) in &plan.aliases {
            writeln!(f, "  {alias} = {target}")?;
        }

        writeln!(f)?;
        writeln!(f, "--- Generation Stages ({}) ---", plan.stages.len())?;
        for (i, stage) in plan.stages.iter().enumerate() {
            writeln!(
                f,
                "  Stage {i}: {} {:.3} MHz -> {:?} d={} m={} vco={:.3} MHz",
                stage.input,
                mhz(stage.input_hz),
                stage.family,
                stage.input_divider,
                stage.multiplier,
                mhz(stage.vco_hz),
            )?;
        }
        writeln!(f, "  Reset: {}", plan.reset.expression())?;

        writeln!(f)?;
        writeln!(f, "--- Build Order ({}) ---", c.order().len())?;
        for (i, id) in c.order().iter().enumerate() {
            let auto = if c.auto_included().contains(id) {
                " (auto)"
            } else {
                ""
            };
            writeln!(f, "  {:>2}. {id}{auto}", i + 1)?;
        }

        writeln!(f)?;
        writeln!(f, "--- Address Map ({}) ---", c.address_map().len())?;
        for region in c.address_map().by_address() {
            writeln!(f, "  {region}")?;
        }

        writeln!(f)?;
        writeln!(f, "--- Timing Constraints ({}) ---", c.constraints().len())?;
        for constraint in c.constraints() {
            writeln!(f, "  {constraint}")?;
        }
        Ok(())
    }
}
