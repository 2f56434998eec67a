//! `socc compose`: run the composition pipeline and print the result.

use std::path::Path;

use anyhow::{bail, Context, Result};
use soc_clock::ClockRequest;
use soc_compose::{compose, CompositionRequest};

use super::{load_registry, parse_address, parse_frequency, select_board};
use crate::manifest::SocManifest;

/// Command-line values; each one present overrides `soc.toml`.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub board: Option<String>,
    pub components: Vec<String>,
    pub sys_clk_freq: Option<String>,
    pub address_base: Option<String>,
    /// `NAME=FREQ[@INPUT]`
    pub clocks: Vec<String>,
    pub declared_stages: Vec<String>,
    pub catalogue: Option<String>,
}

pub fn run(
    project_dir: &Path,
    manifest: Option<&SocManifest>,
    overrides: &Overrides,
    json: bool,
) -> Result<()> {
    let board = select_board(overrides.board.as_deref(), manifest, project_dir)?;
    let registry = load_registry(&board, overrides.catalogue.as_deref(), manifest, project_dir)?;
    let request = build_request(manifest, overrides)?;

    let composition = compose(&registry, &board, &request)
        .with_context(|| format!("composing for board '{}'", board.name))?;

    if json {
        println!("{}", composition.to_json()?);
    } else {
        print!("{}", composition.report());
    }
    Ok(())
}

/// Merge `soc.toml` and command-line values into one request.
pub fn build_request(
    manifest: Option<&SocManifest>,
    overrides: &Overrides,
) -> Result<CompositionRequest> {
    let config = manifest.map(|m| &m.soc);

    let components = if overrides.components.is_empty() {
        config.map(|c| c.components.clone()).unwrap_or_default()
    } else {
        overrides.components.clone()
    };
    let mut request = CompositionRequest::new(components);

    request.sys_clk_hz = match &overrides.sys_clk_freq {
        Some(freq) => Some(parse_frequency(freq)?),
        None => config.and_then(|c| c.sys_clk_freq),
    };
    request.address_base = match &overrides.address_base {
        Some(base) => parse_address(base)?,
        None => config.and_then(|c| c.address_base).unwrap_or(0),
    };

    // A command-line clock replaces a manifest clock of the same name.
    let mut clocks = match manifest {
        Some(m) => m.clock_requests()?,
        None => Vec::new(),
    };
    for arg in &overrides.clocks {
        let clock = parse_clock_arg(arg)?;
        clocks.retain(|c| c.name != clock.name);
        clocks.push(clock);
    }
    request.clocks = clocks;

    let mut stages: Vec<String> = config.map(|c| c.declare_stages.clone()).unwrap_or_default();
    for stage in &overrides.declared_stages {
        if !stages.contains(stage) {
            stages.push(stage.clone());
        }
    }
    request.declared_stages = stages;

    Ok(request)
}

/// Parse `NAME=FREQ[@INPUT]`.
pub fn parse_clock_arg(arg: &str) -> Result<ClockRequest> {
    let Some((name, rest)) = arg.split_once('=') else {
        bail!("invalid clock '{arg}': expected NAME=FREQ[@INPUT]");
    };
    let name = name.trim();
    if name.is_empty() {
        bail!("invalid clock '{arg}': empty domain name");
    }
    let (freq, input) = match rest.split_once('@') {
        Some((freq, input)) => (freq, Some(input.trim())),
        None => (rest, None),
    };
    let mut request = ClockRequest::hz(name, parse_frequency(freq)?);
    if let Some(input) = input {
        request = request.from_input(input);
    }
    Ok(request)
}
