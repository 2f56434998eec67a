//! CLI command implementations.

pub mod board;
pub mod components;
pub mod compose;
pub mod tree;

use std::path::Path;

use anyhow::{bail, Context, Result};
use soc_board::parse::load_board_toml;
use soc_board::{find_builtin, Board};
use soc_registry::{load_catalogue_toml, standard, ComponentRegistry};
use tracing::debug;

use crate::manifest::SocManifest;

/// Board used when neither the command line nor `soc.toml` names one.
pub const DEFAULT_BOARD: &str = "microphase-a7lite";

/// Load a board by path, project board name (`boards/<name>.board.toml`), or built-in name.
pub fn load_board(name_or_path: &str, project_dir: &Path) -> Result<Board> {
    if name_or_path.ends_with(".toml") {
        let path = project_dir.join(name_or_path);
        return load_board_toml(&path)
            .with_context(|| format!("loading board {}", path.display()));
    }
    let local = project_dir
        .join("boards")
        .join(format!("{name_or_path}.board.toml"));
    if local.is_file() {
        return load_board_toml(&local)
            .with_context(|| format!("loading board {}", local.display()));
    }
    find_builtin(name_or_path)
        .context("use 'socc boards' to list available boards")
}

/// The board named on the command line, else in `soc.toml`, else the default.
pub fn select_board(
    flag: Option<&str>,
    manifest: Option<&SocManifest>,
    project_dir: &Path,
) -> Result<Board> {
    let name = flag
        .or_else(|| manifest.and_then(|m| m.soc.board.as_deref()))
        .unwrap_or(DEFAULT_BOARD);
    debug!(board = name, "selecting board");
    load_board(name, project_dir)
}

/// The catalogue file if one is given, else the standard catalogue for `board`.
pub fn load_registry(
    board: &Board,
    flag: Option<&str>,
    manifest: Option<&SocManifest>,
    project_dir: &Path,
) -> Result<ComponentRegistry> {
    match flag.or_else(|| manifest.and_then(|m| m.soc.catalogue.as_deref())) {
        Some(path) => {
            let path = project_dir.join(path);
            debug!(path = %path.display(), "loading component catalogue");
            load_catalogue_toml(&path)
                .with_context(|| format!("loading catalogue {}", path.display()))
        }
        None => standard(board).context("building the standard catalogue"),
    }
}

/// Parse a frequency: plain Hz or with a `kHz`/`MHz` suffix, fractional allowed with a suffix.
pub fn parse_frequency(s: &str) -> Result<u64> {
    let s = s.trim();
    let lower = s.to_ascii_lowercase();
    let (number, scale) = if let Some(n) = lower.strip_suffix("mhz") {
        (n, 1e6)
    } else if let Some(n) = lower.strip_suffix("khz") {
        (n, 1e3)
    } else if let Some(n) = lower.strip_suffix("hz") {
        (n, 1.0)
    } else {
        (lower.as_str(), 1.0)
    };
    let number = number.trim();
    if scale == 1.0 {
        return number
            .parse::<u64>()
            .with_context(|| format!("invalid frequency '{s}'"));
    }
    let value: f64 = number
        .parse()
        .with_context(|| format!("invalid frequency '{s}'"))?;
    if !value.is_finite() || value <= 0.0 {
        bail!("invalid frequency '{s}'");
    }
    Ok((value * scale).round() as u64)
}

/// Parse an address in decimal or `0x` hex, with optional `_` separators.
pub fn parse_address(s: &str) -> Result<u64> {
    let cleaned = s.trim().replace('_', "");
    let parsed = match cleaned
        .strip_prefix("0x")
        .or_else(|| cleaned.strip_prefix("0X"))
    {
        Some(hex) => u64::from_str_radix(hex, 16),
        None => cleaned.parse(),
    };
    parsed.with_context(|| format!("invalid address '{s}'"))
}
