//! `soc.toml` manifest parsing and project configuration.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use soc_clock::ClockRequest;

/// The top-level manifest structure for a SoC project.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SocManifest {
    /// Composition defaults.
    #[serde(default)]
    pub soc: SocConfig,
    /// Extra clock domains requested by the project.
    #[serde(default)]
    pub clocks: Vec<ClockEntry>,
}

/// The `[soc]` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct SocConfig {
    /// Built-in board name, project board name, or path to a `.board.toml`.
    #[serde(default)]
    pub board: Option<String>,
    /// System clock frequency in Hz.
    #[serde(default)]
    pub sys_clk_freq: Option<u64>,
    /// First address handed out by the allocator.
    #[serde(default)]
    pub address_base: Option<u64>,
    /// Components to compose.
    #[serde(default)]
    pub components: Vec<String>,
    /// Component catalogue file, relative to the project directory.
    #[serde(default)]
    pub catalogue: Option<String>,
    /// Non-primary input clocks allowed to drive their own stage.
    #[serde(default)]
    pub declare_stages: Vec<String>,
}

/// One `[[clocks]]` entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ClockEntry {
    pub name: String,
    pub freq_hz: u64,
    /// Physical input clock to derive from (default: the primary input).
    #[serde(default)]
    pub input: Option<String>,
    /// Phase shift in degrees against `reference`.
    #[serde(default)]
    pub phase: Option<f64>,
    #[serde(default)]
    pub reference: Option<String>,
}

impl ClockEntry {
    pub fn to_request(&self) -> Result<ClockRequest> {
        let mut request = ClockRequest::hz(&self.name, self.freq_hz);
        if let Some(input) = &self.input {
            request = request.from_input(input);
        }
        match (self.phase, &self.reference) {
            (Some(degrees), Some(reference)) => request = request.with_phase(reference, degrees),
            (None, None) => {}
            (Some(_), None) => bail!("clock '{}' has a phase but no reference domain", self.name),
            (None, Some(_)) => bail!("clock '{}' has a reference domain but no phase", self.name),
        }
        Ok(request)
    }
}

impl SocManifest {
    /// Search upward from `start_dir` for a `soc.toml` file, parse and return it
    /// along with the directory it was found in.
    pub fn find_and_load(start_dir: &Path) -> Result<Option<(Self, PathBuf)>> {
        let mut dir = start_dir.to_path_buf();
        loop {
            let candidate = dir.join("soc.toml");
            if candidate.is_file() {
                let content = std::fs::read_to_string(&candidate)
                    .with_context(|| format!("reading {}", candidate.display()))?;
                let manifest = Self::parse(&content)
                    .with_context(|| format!("parsing {}", candidate.display()))?;
                return Ok(Some((manifest, dir)));
            }
            if !dir.pop() {
                break;
            }
        }
        Ok(None)
    }

    /// Parse a manifest from a TOML string.
    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// All `[[clocks]]` entries as clock requests.
    pub fn clock_requests(&self) -> Result<Vec<ClockRequest>> {
        self.clocks.iter().map(ClockEntry::to_request).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use soc_clock::{ClockSource, Frequency};

    #[test]
    fn parse_full_manifest() {
        let manifest = SocManifest::parse(
            r#"
[soc]
board = "microphase-a7lite"
sys-clk-freq = 50000000
address-base = 0x8000_0000
components = ["sys-memory-controller", "led-chaser"]
catalogue = "catalogue.toml"
declare-stages = ["clk125"]

[[clocks]]
name = "eth"
freq-hz = 125000000
input = "clk125"

[[clocks]]
name = "eth-rx"
freq-hz = 125000000
input = "clk125"
phase = 90.0
reference = "eth"
"#,
        )
        .unwrap();
        assert_eq!(manifest.soc.board.as_deref(), Some("microphase-a7lite"));
        assert_eq!(manifest.soc.sys_clk_freq, Some(50_000_000));
        assert_eq!(manifest.soc.address_base, Some(0x8000_0000));
        assert_eq!(manifest.soc.components.len(), 2);
        assert_eq!(manifest.soc.declare_stages, vec!["clk125"]);

        let requests = manifest.clock_requests().unwrap();
        assert_eq!(requests[0].frequency, Frequency::Hz(125_000_000));
        assert_eq!(requests[0].source, ClockSource::Input("clk125".into()));
        assert_eq!(requests[1].phase.as_ref().unwrap().reference, "eth");
    }

    #[test]
    fn parse_empty_manifest() {
        let manifest = SocManifest::parse("").unwrap();
        assert!(manifest.soc.board.is_none());
        assert!(manifest.clocks.is_empty());
    }

    #[test]
    fn phase_needs_a_reference() {
        let manifest = SocManifest::parse(
            r#"
[[clocks]]
name = "shifted"
freq-hz = 100000000
phase = 90.0
"#,
        )
        .unwrap();
        assert!(manifest.clock_requests().is_err());
    }

    #[test]
    fn reject_malformed_manifest() {
        assert!(SocManifest::parse("[soc]\nsys-clk-freq = \"fast\"").is_err());
    }

    #[test]
    fn find_and_load_walks_upward() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("soc.toml"), "[soc]\nboard = \"xilinx-kc705\"\n").unwrap();
        let nested = dir.path().join("a/b");
        std::fs::create_dir_all(&nested).unwrap();

        let (manifest, found) = SocManifest::find_and_load(&nested).unwrap().unwrap();
        assert_eq!(found, dir.path());
        assert_eq!(manifest.soc.board.as_deref(), Some("xilinx-kc705"));
    }

    #[test]
    fn find_and_load_reports_parse_errors_with_path() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("soc.toml"), "[soc\n").unwrap();
        let err = SocManifest::find_and_load(dir.path()).unwrap_err();
        assert!(format!("{err:#}").contains("soc.toml"));
    }
}
