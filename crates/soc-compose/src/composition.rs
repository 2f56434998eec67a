//! The composed SoC.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use soc_address::AddressMap;
use soc_board::Board;
use soc_clock::{ClockPlan, TimingConstraint};

use crate::error::Result;

/// SHA-256 hex digest of a composition's content.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// Hash the given data.
    pub fn compute(data: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(data);
        Fingerprint(hex_encode(&hasher.finalize()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// First 12 hex digits.
    pub fn short(&self) -> &str {
        &self.0[..12]
    }
}

impl std::fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

fn hex_encode(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

/// Everything a fingerprint covers.
#[derive(Serialize)]
#[serde(rename_all = "kebab-case")]
struct Content<'a> {
    board: &'a Board,
    clock_plan: &'a ClockPlan,
    address_map: &'a AddressMap,
    order: &'a [String],
    requested: &'a [String],
    auto_included: &'a [String],
    constraints: &'a [TimingConstraint],
}

/// A complete, immutable SoC description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Composition {
    board: Board,
    clock_plan: ClockPlan,
    address_map: AddressMap,
    order: Vec<String>,
    requested: Vec<String>,
    auto_included: Vec<String>,
    constraints: Vec<TimingConstraint>,
    fingerprint: Fingerprint,
}

impl Composition {
    pub(crate) fn new(
        board: Board,
        clock_plan: ClockPlan,
        address_map: AddressMap,
        order: Vec<String>,
        requested: Vec<String>,
        auto_included: Vec<String>,
    ) -> Result<Self> {
        let constraints = clock_plan.constraints();
        let content = Content {
            board: &board,
            clock_plan: &clock_plan,
            address_map: &address_map,
            order: &order,
            requested: &requested,
            auto_included: &auto_included,
            constraints: &constraints,
        };
        let fingerprint = Fingerprint::compute(&serde_json::to_vec(&content)?);
        Ok(Self {
            board,
            clock_plan,
            address_map,
            order,
            requested,
            auto_included,
            constraints,
            fingerprint,
        })
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn clock_plan(&self) -> &ClockPlan {
        &self.clock_plan
    }

    pub fn address_map(&self) -> &AddressMap {
        &self.address_map
    }

    /// Components in instantiation order; dependencies first.
    pub fn order(&self) -> &[String] {
        &self.order
    }

    /// Components the caller asked for.
    pub fn requested(&self) -> &[String] {
        &self.requested
    }

    /// Components added as structural dependencies.
    pub fn auto_included(&self) -> &[String] {
        &self.auto_included
    }

    pub fn constraints(&self) -> &[TimingConstraint] {
        &self.constraints
    }

    pub fn fingerprint(&self) -> &Fingerprint {
        &self.fingerprint
    }

    /// Serialize to pretty JSON for downstream generators.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fingerprint_is_sha256_hex() {
        let fp = Fingerprint::compute(b"abc");
        assert_eq!(
            fp.as_str(),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
        assert_eq!(fp.short(), "ba7816bf8f01");
    }
}
