//! socc: compose FPGA SoC descriptions from a board and a component selection.

mod commands;
mod manifest;

use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use manifest::SocManifest;

#[derive(Parser)]
#[command(name = "socc", version, about = "SoC composition and clock-domain planning")]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compose a SoC: clock plan, build order, and address map
    Compose {
        /// Components to include (default: components listed in soc.toml)
        components: Vec<String>,
        /// Board name or path to a .board.toml file
        #[arg(long)]
        board: Option<String>,
        /// System clock frequency (e.g., 100000000, 100MHz)
        #[arg(long)]
        sys_clk_freq: Option<String>,
        /// First address handed out by the allocator (e.g., 0x80000000)
        #[arg(long)]
        address_base: Option<String>,
        /// Extra clock domain, NAME=FREQ[@INPUT] (repeatable)
        #[arg(long = "clock")]
        clocks: Vec<String>,
        /// Let a non-primary input clock drive its own stage (repeatable)
        #[arg(long = "declare-stage")]
        declared_stages: Vec<String>,
        /// Component catalogue file (default: the standard catalogue)
        #[arg(long)]
        catalogue: Option<String>,
        /// Print the composition as JSON
        #[arg(long)]
        json: bool,
    },
    /// List available boards
    Boards,
    /// Inspect and validate board definitions
    Board {
        #[command(subcommand)]
        action: BoardAction,
    },
    /// List the components of the catalogue
    Components {
        /// Board the standard catalogue is built for
        #[arg(long)]
        board: Option<String>,
        /// Component catalogue file (default: the standard catalogue)
        #[arg(long)]
        catalogue: Option<String>,
        /// Export the catalogue as TOML
        #[arg(long)]
        toml: bool,
    },
    /// Show the dependency tree of a selection
    Tree {
        /// Components to resolve (default: components listed in soc.toml)
        components: Vec<String>,
        /// Board the standard catalogue is built for
        #[arg(long)]
        board: Option<String>,
        /// Component catalogue file (default: the standard catalogue)
        #[arg(long)]
        catalogue: Option<String>,
        /// Print the flat build order instead of the tree
        #[arg(long)]
        order: bool,
    },
}

#[derive(Subcommand)]
enum BoardAction {
    /// Show details of a board
    Describe {
        /// Board name or path to a .board.toml file
        name: String,
        /// Output format (default: human-readable, "toml" for TOML)
        #[arg(long)]
        format: Option<String>,
    },
    /// Validate a board definition
    Validate {
        /// Board name or path to a .board.toml file
        name: String,
    },
    /// Write a template .board.toml into boards/
    Template {
        /// Name of the new board
        name: String,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = run(cli);
    if let Err(e) = result {
        eprintln!("error: {e:#}");
        process::exit(1);
    }
}

/// Logs go to stderr; `RUST_LOG` wins over `-v`.
fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let cwd = std::env::current_dir()?;

    match cli.command {
        Commands::Compose {
            components,
            board,
            sys_clk_freq,
            address_base,
            clocks,
            declared_stages,
            catalogue,
            json,
        } => {
            let (manifest, project_dir) = load_manifest_optional(&cwd)?;
            let project_dir = project_dir.unwrap_or(cwd);
            let overrides = commands::compose::Overrides {
                board,
                components,
                sys_clk_freq,
                address_base,
                clocks,
                declared_stages,
                catalogue,
            };
            commands::compose::run(&project_dir, manifest.as_ref(), &overrides, json)
        }

        Commands::Boards => {
            let (_, project_dir) = load_manifest_optional(&cwd)?;
            let project_dir = project_dir.unwrap_or(cwd);
            commands::board::list(&project_dir)
        }

        Commands::Board { action } => {
            let (_, project_dir) = load_manifest_optional(&cwd)?;
            let project_dir = project_dir.unwrap_or(cwd);
            match action {
                BoardAction::Describe { name, format } => {
                    commands::board::describe(&name, &project_dir, format.as_deref())
                }
                BoardAction::Validate { name } => commands::board::validate(&name, &project_dir),
                BoardAction::Template { name } => commands::board::template(&name, &project_dir),
            }
        }

        Commands::Components {
            board,
            catalogue,
            toml,
        } => {
            let (manifest, project_dir) = load_manifest_optional(&cwd)?;
            let project_dir = project_dir.unwrap_or(cwd);
            commands::components::run(
                &project_dir,
                manifest.as_ref(),
                board.as_deref(),
                catalogue.as_deref(),
                toml,
            )
        }

        Commands::Tree {
            components,
            board,
            catalogue,
            order,
        } => {
            let (manifest, project_dir) = load_manifest_optional(&cwd)?;
            let project_dir = project_dir.unwrap_or(cwd);
            commands::tree::run(
                &project_dir,
                manifest.as_ref(),
                &components,
                board.as_deref(),
                catalogue.as_deref(),
                order,
            )
        }
    }
}

/// Try to load a manifest from the current directory upward. Returns (None, None) if not found.
fn load_manifest_optional(cwd: &Path) -> anyhow::Result<(Option<SocManifest>, Option<PathBuf>)> {
    match SocManifest::find_and_load(cwd)? {
        Some((manifest, dir)) => Ok((Some(manifest), Some(dir))),
        None => Ok((None, None)),
    }
}
