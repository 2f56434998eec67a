//! `socc tree`: show how a selection resolves.

use std::path::Path;

use anyhow::{Context, Result};
use soc_registry::{format_order, format_tree, resolve};

use super::{load_registry, select_board};
use crate::manifest::SocManifest;

pub fn run(
    project_dir: &Path,
    manifest: Option<&SocManifest>,
    components: &[String],
    board: Option<&str>,
    catalogue: Option<&str>,
    order: bool,
) -> Result<()> {
    let board = select_board(board, manifest, project_dir)?;
    let registry = load_registry(&board, catalogue, manifest, project_dir)?;
    let components = if components.is_empty() {
        manifest.map(|m| m.soc.components.as_slice()).unwrap_or_default()
    } else {
        components
    };

    let resolution = resolve(&registry, components).context("resolving dependencies")?;
    if order {
        print!("{}", format_order(&resolution));
    } else {
        print!("{}", format_tree(&board.name, &registry, &resolution));
    }
    Ok(())
}
