//! `socc components`: list the component catalogue.

use std::path::Path;

use anyhow::Result;
use soc_board::Board;
use soc_registry::{catalogue_to_toml, ComponentRegistry, ComponentSpec, DependencyKind};

use super::{load_registry, select_board};
use crate::manifest::SocManifest;

pub fn run(
    project_dir: &Path,
    manifest: Option<&SocManifest>,
    board: Option<&str>,
    catalogue: Option<&str>,
    toml: bool,
) -> Result<()> {
    let board = select_board(board, manifest, project_dir)?;
    let registry = load_registry(&board, catalogue, manifest, project_dir)?;
    if toml {
        print!("{}", catalogue_to_toml(&registry)?);
    } else {
        print!("{}", format_catalogue(&board, &registry));
    }
    Ok(())
}

fn format_catalogue(board: &Board, registry: &ComponentRegistry) -> String {
    let mut out = format!("Components for {} ({}):\n\n", board.name, registry.len());
    for spec in registry.components() {
        let marker = if supported(board, spec) { "" } else { " [unsupported]" };
        out.push_str(&format!("  {:<24} {}{marker}\n", spec.id, spec.description));

        let mut details = Vec::new();
        let structural: Vec<&str> = deps_of(spec, DependencyKind::Structural);
        if !structural.is_empty() {
            details.push(format!("needs {}", structural.join(", ")));
        }
        let feature: Vec<&str> = deps_of(spec, DependencyKind::Feature);
        if !feature.is_empty() {
            details.push(format!("requires selecting {}", feature.join(", ")));
        }
        if !spec.exclusive.is_empty() {
            details.push(format!("exclusive in {}", spec.exclusive.join(", ")));
        }
        if !details.is_empty() {
            out.push_str(&format!("  {:<24} {}\n", "", details.join("; ")));
        }
    }
    out
}

fn deps_of(spec: &ComponentSpec, kind: DependencyKind) -> Vec<&str> {
    spec.dependencies
        .iter()
        .filter(|d| d.kind == kind)
        .map(|d| d.id.as_str())
        .collect()
}

fn supported(board: &Board, spec: &ComponentSpec) -> bool {
    spec.capabilities.iter().all(|c| board.has_capability(*c))
}
