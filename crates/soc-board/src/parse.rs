//! TOML parsing, serialization, validation, and discovery for board definitions.
//!
//! Custom boards are stored as `.board.toml` files in a `boards/` directory.
//! Built-in boards can be exported to the same format as a starting point.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::board::{Board, Capability};
use crate::error::{BoardError, Result};
use crate::generator::GeneratorFamily;

/// How serious a validation issue is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

/// A validation issue found in a board definition.
#[derive(Debug, Clone)]
pub struct ValidationIssue {
    pub severity: Severity,
    /// Human-readable description.
    pub message: String,
}

impl ValidationIssue {
    fn error(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            message: message.into(),
        }
    }

    fn warning(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

/// Load a board from a `.board.toml` file.
pub fn load_board_toml(path: &Path) -> Result<Board> {
    if !path.exists() {
        return Err(BoardError::NotFound {
            path: path.to_path_buf(),
        });
    }
    debug!(path = %path.display(), "loading board file");
    let content = std::fs::read_to_string(path)?;
    parse_board_toml(&content)
}

/// Parse a board from a TOML string.
pub fn parse_board_toml(toml_str: &str) -> Result<Board> {
    let board: Board = toml::from_str(toml_str)?;
    Ok(board)
}

/// Serialize a board to pretty TOML.
pub fn board_to_toml(board: &Board) -> Result<String> {
    let toml_str = toml::to_string_pretty(board)?;
    Ok(toml_str)
}

/// Load a board by built-in name or by path to a `.board.toml` file.
pub fn resolve_board(name_or_path: &str) -> Result<Board> {
    if name_or_path.ends_with(".toml") {
        load_board_toml(Path::new(name_or_path))
    } else {
        crate::builtin::find_builtin(name_or_path)
    }
}

/// Validate a board definition for structural correctness.
///
/// Returns `Ok(())` if clean, or `Err(issues)` with errors and warnings.
pub fn validate_board(board: &Board) -> std::result::Result<(), Vec<ValidationIssue>> {
    let mut issues = Vec::new();

    // 1. At least one input clock, all with distinct names and non-zero frequency
    if board.clocks.is_empty() {
        issues.push(ValidationIssue::error("board has no input clocks"));
    }
    let mut seen = BTreeSet::new();
    for clock in &board.clocks {
        if !seen.insert(clock.name.as_str()) {
            issues.push(ValidationIssue::error(format!(
                "input clock '{}' is declared more than once",
                clock.name
            )));
        }
        if clock.freq_hz == 0 {
            issues.push(ValidationIssue::error(format!(
                "input clock '{}' has zero frequency",
                clock.name
            )));
        }
    }

    // 2. Reset inputs are distinct and do not reuse clock pins
    let mut resets = BTreeSet::new();
    for reset in &board.resets {
        if !resets.insert(reset.name.as_str()) {
            issues.push(ValidationIssue::error(format!(
                "reset input '{}' is declared more than once",
                reset.name
            )));
        }
        if seen.contains(reset.name.as_str()) {
            issues.push(ValidationIssue::error(format!(
                "reset input '{}' has the same name as an input clock",
                reset.name
            )));
        }
    }

    // 3. Main RAM window is non-empty and aligned
    if let Some(window) = board.main_ram {
        if window.size == 0 {
            issues.push(ValidationIssue::error("main-ram window has zero size"));
        } else {
            let span = window.size.next_power_of_two();
            if span != window.size {
                issues.push(ValidationIssue::warning(format!(
                    "main-ram size 0x{:X} is not a power of two",
                    window.size
                )));
            }
            if window.base % span != 0 {
                issues.push(ValidationIssue::error(format!(
                    "main-ram base 0x{:X} is not aligned to its size 0x{:X}",
                    window.base, span
                )));
            }
        }
    }

    // 4. SDRAM profile agrees with capabilities and memory window
    match &board.sdram {
        Some(profile) => {
            if !board.has_capability(Capability::Sdram) {
                issues.push(ValidationIssue::error(
                    "sdram profile present but 'sdram' capability missing",
                ));
            }
            if board.main_ram.is_none() {
                issues.push(ValidationIssue::error(
                    "sdram profile present but no main-ram window",
                ));
            }
            if profile.dqs_phase_deg >= 360 {
                issues.push(ValidationIssue::error(format!(
                    "sdram dqs-phase-deg {} is not below 360",
                    profile.dqs_phase_deg
                )));
            }
        }
        None => {
            if board.has_capability(Capability::Sdram) {
                issues.push(ValidationIssue::warning(
                    "'sdram' capability without an sdram profile; defaults will be used",
                ));
            }
        }
    }

    // 5. System clock is reachable
    if board.default_sys_clk_hz == 0 {
        issues.push(ValidationIssue::error("default-sys-clk-hz is zero"));
    }
    if board.generator.family == GeneratorFamily::Bypass {
        if let Some(primary) = board.primary_clock() {
            if primary.freq_hz != board.default_sys_clk_hz {
                issues.push(ValidationIssue::error(format!(
                    "bypass generator cannot derive {} Hz from {} ({} Hz)",
                    board.default_sys_clk_hz, primary.name, primary.freq_hz
                )));
            }
        }
    }

    // 6. Shared connectors constrain at least two components
    for connector in &board.shared_connectors {
        if connector.components.len() < 2 {
            issues.push(ValidationIssue::warning(format!(
                "shared connector '{}' lists fewer than two components",
                connector.name
            )));
        }
    }

    if issues.is_empty() {
        Ok(())
    } else {
        Err(issues)
    }
}

/// Generate a template `.board.toml` for a new board.
///
/// Seeds from the MicroPhase A7-Lite with the given custom name.
pub fn generate_template(name: &str) -> Result<String> {
    let mut board = Board::microphase_a7lite();
    board.name = name.into();
    board.vendor = String::new();
    board_to_toml(&board)
}

/// Discover all `.board.toml` files in a project's `boards/` directory.
///
/// Returns a list of (board_name, file_path) pairs.
pub fn discover_boards(project_dir: &Path) -> Result<Vec<(String, PathBuf)>> {
    let boards_dir = project_dir.join("boards");
    if !boards_dir.is_dir() {
        return Ok(Vec::new());
    }

    let mut boards = Vec::new();
    for entry in std::fs::read_dir(&boards_dir)? {
        let path = entry?.path();
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .and_then(|n| n.strip_suffix(".board.toml"))
            .map(str::to_string);
        if let Some(name) = name {
            boards.push((name, path));
        }
    }
    boards.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(boards)
}
