//! Reset line model.
//!
//! The generator reset is a single active-high line: the OR of the software
//! reset request and every physical reset input, with active-low inputs
//! inverted so each term asserts high.

use serde::{Deserialize, Serialize};
use soc_board::{Board, Polarity};

/// Signal name of the software reset request.
pub const SOFT_RESET: &str = "rst";

/// One OR-ed term of the reset line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ResetTerm {
    pub signal: String,
    /// Whether the raw level is inverted to normalize to active-high.
    pub inverted: bool,
}

impl ResetTerm {
    fn asserted(&self, level: bool) -> bool {
        level != self.inverted
    }
}

/// The combined reset line gating every generation stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ResetLine {
    /// Terms in order: software request first, then board inputs.
    pub terms: Vec<ResetTerm>,
    /// Indices of the generation stages whose enable this line gates.
    pub gates: Vec<usize>,
}

impl ResetLine {
    /// Combine the software request with all of the board's reset inputs.
    pub fn for_board(board: &Board, stage_count: usize) -> Self {
        let mut terms = vec![ResetTerm {
            signal: SOFT_RESET.to_string(),
            inverted: false,
        }];
        terms.extend(board.resets.iter().map(|r| ResetTerm {
            signal: r.name.clone(),
            inverted: r.polarity == Polarity::ActiveLow,
        }));
        Self {
            terms,
            gates: (0..stage_count).collect(),
        }
    }

    /// Evaluate the line given raw pin levels.
    ///
    /// `level` returns the raw level of a physical input; signals it does
    /// not know read as deasserted for their polarity.
    pub fn asserted(&self, software: bool, level: impl Fn(&str) -> Option<bool>) -> bool {
        self.terms.iter().any(|term| {
            if term.signal == SOFT_RESET {
                software
            } else {
                level(&term.signal).is_some_and(|l| term.asserted(l))
            }
        })
    }

    /// Boolean expression of the line, e.g. `rst | ~cpu_reset`.
    pub fn expression(&self) -> String {
        self.terms
            .iter()
            .map(|t| {
                if t.inverted {
                    format!("~{}", t.signal)
                } else {
                    t.signal.clone()
                }
            })
            .collect::<Vec<_>>()
            .join(" | ")
    }
}
