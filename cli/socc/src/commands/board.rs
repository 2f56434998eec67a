//! `socc boards` and `socc board`: board listing, description, and validation.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use soc_board::parse::{board_to_toml, discover_boards, generate_template, validate_board};
use soc_board::{builtin_boards, Board, Polarity};

use super::load_board;

/// List built-in boards and the project's `boards/*.board.toml`.
pub fn list(project_dir: &Path) -> Result<()> {
    println!("Built-in boards:");
    println!();
    for board in builtin_boards() {
        println!("  {:<26} {}", board.name, board.vendor);
    }

    let custom = discover_boards(project_dir)?;
    if !custom.is_empty() {
        println!();
        println!("Project boards:");
        println!();
        for (name, path) in &custom {
            println!("  {:<26} {}", name, path.display());
        }
    }

    println!();
    println!("Use 'socc board describe <name>' for details.");
    Ok(())
}

/// Describe a board in detail.
pub fn describe(name: &str, project_dir: &Path, format: Option<&str>) -> Result<()> {
    let board = load_board(name, project_dir)?;
    match format {
        None | Some("human") => print!("{}", describe_text(&board)),
        Some("toml") => print!("{}", board_to_toml(&board)?),
        Some(other) => bail!("unknown format '{other}' (expected human or toml)"),
    }
    Ok(())
}

fn describe_text(board: &Board) -> String {
    let mut out = String::new();
    let mut line = |s: String| {
        out.push_str(&s);
        out.push('\n');
    };

    line(format!("=== Board: {} ===", board.name));
    if !board.vendor.is_empty() {
        line(board.vendor.clone());
    }
    line(format!("Device: {}", board.device));
    line(format!("Default sys clock: {} Hz", board.default_sys_clk_hz));
    line(String::new());

    line("--- Input Clocks ---".into());
    for (i, clock) in board.clocks.iter().enumerate() {
        let primary = if i == 0 { " (primary)" } else { "" };
        line(format!(
            "  {:<12} {:>12} Hz  {:.3} ns{primary}",
            clock.name,
            clock.freq_hz,
            clock.period_ns()
        ));
    }
    line(String::new());

    line("--- Reset Inputs ---".into());
    for reset in &board.resets {
        let polarity = match reset.polarity {
            Polarity::ActiveHigh => "active-high",
            Polarity::ActiveLow => "active-low",
        };
        line(format!("  {:<12} {polarity}", reset.name));
    }
    line(String::new());

    line("--- Clock Generator ---".into());
    let limits = board.generator.limits();
    line(format!(
        "  Family: {:?} (speed grade {})",
        board.generator.family, board.generator.speed_grade
    ));
    line(format!(
        "  VCO:    {} - {} MHz",
        limits.vco_hz.0 / 1_000_000,
        limits.vco_hz.1 / 1_000_000
    ));
    line(format!("  Outputs per stage: {}", limits.max_outputs));
    line(String::new());

    line("--- Capabilities ---".into());
    for capability in &board.capabilities {
        line(format!("  {capability}"));
    }

    if board.main_ram.is_some() || board.sdram.is_some() {
        line(String::new());
        line("--- Memory ---".into());
        if let Some(window) = board.main_ram {
            line(format!(
                "  Main RAM: {:#010x} - {:#010x} ({} bytes)",
                window.base,
                window.base + window.size,
                window.size
            ));
        }
        if let Some(sdram) = &board.sdram {
            line(format!(
                "  SDRAM:    {} {} ({}:1, DQS at {}°)",
                sdram.memtype,
                sdram.module,
                sdram.rate.nphases(),
                sdram.dqs_phase_deg
            ));
        }
    }

    if !board.shared_connectors.is_empty() {
        line(String::new());
        line("--- Shared Connectors ---".into());
        for connector in &board.shared_connectors {
            line(format!("  {}: {}", connector.name, connector.components.join(", ")));
        }
    }

    out
}

/// Validate a board definition, printing errors and warnings.
pub fn validate(name: &str, project_dir: &Path) -> Result<()> {
    let board = load_board(name, project_dir)?;
    match validate_board(&board) {
        Ok(()) => {
            println!("Board '{}' is valid.", board.name);
            Ok(())
        }
        Err(issues) => {
            let mut errors = 0;
            for issue in &issues {
                if issue.is_error() {
                    errors += 1;
                    println!("  error: {}", issue.message);
                } else {
                    println!("  warning: {}", issue.message);
                }
            }
            if errors > 0 {
                bail!("board '{}' has {errors} error(s)", board.name);
            }
            println!(
                "Board '{}' is valid ({} warning(s)).",
                board.name,
                issues.len()
            );
            Ok(())
        }
    }
}

/// Write `boards/<name>.board.toml` seeded from a built-in board.
pub fn template(name: &str, project_dir: &Path) -> Result<()> {
    let path = write_template(name, project_dir)?;
    println!("Created {}", path.display());
    println!("Edit it, then check it with 'socc board validate {name}'.");
    Ok(())
}

fn write_template(name: &str, project_dir: &Path) -> Result<PathBuf> {
    let boards_dir = project_dir.join("boards");
    let path = boards_dir.join(format!("{name}.board.toml"));
    if path.exists() {
        bail!("{} already exists", path.display());
    }
    std::fs::create_dir_all(&boards_dir)
        .with_context(|| format!("creating {}", boards_dir.display()))?;
    std::fs::write(&path, generate_template(name)?)
        .with_context(|| format!("writing {}", path.display()))?;
    Ok(path)
}
