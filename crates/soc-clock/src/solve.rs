//! Generator configuration search.
//!
//! Walks input dividers upward and feedback multipliers downward, taking the
//! first configuration whose VCO is in range and for which every output has
//! an integer divider within the frequency margin.

use soc_board::GeneratorLimits;

/// Default relative frequency tolerance per output.
pub const DEFAULT_MARGIN: f64 = 1e-2;

/// A solved generation stage configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct StageConfig {
    pub input_divider: u32,
    pub multiplier: u32,
    pub vco_hz: f64,
    /// One divider per requested output, in request order.
    pub output_dividers: Vec<u32>,
}

impl StageConfig {
    /// Frequency actually produced on output `index`.
    pub fn output_hz(&self, index: usize) -> f64 {
        self.vco_hz / self.output_dividers[index] as f64
    }
}

/// Search a configuration producing all `outputs` (Hz) from `input_hz`.
pub fn solve_stage(
    input_hz: u64,
    outputs: &[u64],
    limits: &GeneratorLimits,
    margin: f64,
) -> Option<StageConfig> {
    if outputs.len() > limits.max_outputs {
        return None;
    }
    let (vco_min, vco_max) = (limits.vco_hz.0 as f64, limits.vco_hz.1 as f64);

    for input_divider in limits.input_divider.0..=limits.input_divider.1 {
        for multiplier in (limits.multiplier.0..=limits.multiplier.1).rev() {
            let vco_hz = input_hz as f64 * multiplier as f64 / input_divider as f64;
            if vco_hz < vco_min || vco_hz > vco_max {
                continue;
            }
            let dividers: Option<Vec<u32>> = outputs
                .iter()
                .map(|&target| output_divider(vco_hz, target, limits, margin))
                .collect();
            if let Some(output_dividers) = dividers {
                return Some(StageConfig {
                    input_divider,
                    multiplier,
                    vco_hz,
                    output_dividers,
                });
            }
        }
    }
    None
}

/// Nearest integer divider of `vco_hz` landing within `margin` of `target`.
fn output_divider(vco_hz: f64, target: u64, limits: &GeneratorLimits, margin: f64) -> Option<u32> {
    if target == 0 {
        return None;
    }
    let target = target as f64;
    let ideal = (vco_hz / target).round();
    if ideal < limits.output_divider.0 as f64 || ideal > limits.output_divider.1 as f64 {
        return None;
    }
    let divider = ideal as u32;
    let produced = vco_hz / divider as f64;
    ((produced - target).abs() <= target * margin).then_some(divider)
}

/// Index of the first output that makes the stage unsolvable.
///
/// Grows the output set one request at a time so the reported culprit is the
/// earliest request that cannot coexist with those before it.
pub fn first_unsolvable(
    input_hz: u64,
    outputs: &[u64],
    limits: &GeneratorLimits,
    margin: f64,
) -> Option<usize> {
    (1..=outputs.len())
        .find(|&n| solve_stage(input_hz, &outputs[..n], limits, margin).is_none())
        .map(|n| n - 1)
}
