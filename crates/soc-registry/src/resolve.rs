//! Dependency resolution.
//!
//! Expands a requested selection with its structural dependencies, checks
//! that feature dependencies were selected, and orders the result so every
//! component comes after everything it depends on.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::component::DependencyKind;
use crate::error::{RegistryError, Result};
use crate::registry::ComponentRegistry;

/// The result of resolving a selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Resolution {
    /// Requested ids, duplicates removed, in request order.
    pub requested: Vec<String>,
    /// Build order; dependencies first.
    pub order: Vec<String>,
    /// Ids added because a selected component structurally depends on them.
    pub auto_included: Vec<String>,
}

impl Resolution {
    pub fn is_auto_included(&self, id: &str) -> bool {
        self.auto_included.iter().any(|a| a == id)
    }

    /// Position of `id` in the build order.
    pub fn position(&self, id: &str) -> Option<usize> {
        self.order.iter().position(|o| o == id)
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    Visiting,
    Visited,
}

/// Resolve `requested` against `registry`.
pub fn resolve<S: AsRef<str>>(registry: &ComponentRegistry, requested: &[S]) -> Result<Resolution> {
    let mut selection: Vec<String> = Vec::new();
    for id in requested {
        let spec = registry.require(id.as_ref())?;
        if !selection.contains(&spec.id) {
            selection.push(spec.id.clone());
        }
    }
    let requested = selection.clone();

    // Auto-include structural dependencies in discovery order.
    let mut auto_included = Vec::new();
    let mut cursor = 0;
    while cursor < selection.len() {
        let spec = registry.require(&selection[cursor])?;
        for dep in &spec.dependencies {
            if dep.kind == DependencyKind::Structural && !selection.contains(&dep.id) {
                debug!(component = %spec.id, dependency = %dep.id, "auto-including structural dependency");
                selection.push(dep.id.clone());
                auto_included.push(dep.id.clone());
            }
        }
        cursor += 1;
    }

    for id in &selection {
        let spec = registry.require(id)?;
        if let Some(missing) = spec
            .dependencies
            .iter()
            .find(|d| d.kind == DependencyKind::Feature && !selection.contains(&d.id))
        {
            return Err(RegistryError::MissingPrerequisite {
                component: spec.id.clone(),
                dependency: missing.id.clone(),
            });
        }
    }

    registry.validate_selection(&selection)?;

    let mut marks = BTreeMap::new();
    let mut order = Vec::with_capacity(selection.len());
    for id in &selection {
        let mut path = Vec::new();
        visit(registry, id, &mut marks, &mut path, &mut order)?;
    }
    debug!(order = ?order, "resolved build order");

    Ok(Resolution {
        requested,
        order,
        auto_included,
    })
}

fn visit<'a>(
    registry: &'a ComponentRegistry,
    id: &'a str,
    marks: &mut BTreeMap<&'a str, Mark>,
    path: &mut Vec<&'a str>,
    order: &mut Vec<String>,
) -> Result<()> {
    match marks.get(id) {
        Some(Mark::Visited) => return Ok(()),
        Some(Mark::Visiting) => {
            let start = path.iter().position(|p| *p == id).unwrap_or(0);
            let mut cycle: Vec<String> = path[start..].iter().map(|s| s.to_string()).collect();
            cycle.push(id.to_string());
            return Err(RegistryError::CyclicDependency { cycle });
        }
        None => {}
    }
    marks.insert(id, Mark::Visiting);
    path.push(id);
    let spec = registry.require(id)?;
    for dep in spec.dependency_ids() {
        visit(registry, dep, marks, path, order)?;
    }
    path.pop();
    marks.insert(id, Mark::Visited);
    order.push(id.to_string());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::ComponentSpec;

    fn registry() -> ComponentRegistry {
        ComponentRegistry::load([
            ComponentSpec::new("controller", "").depends_on("phy"),
            ComponentSpec::new("phy", ""),
            ComponentSpec::new("mac", "").depends_on("eth-phy"),
            ComponentSpec::new("etherbone", "").depends_on("eth-phy"),
            ComponentSpec::new("eth-phy", ""),
            ComponentSpec::new("sdcard", "").depends_on("sd-phy").exclusive_in("sd-slot"),
            ComponentSpec::new("spi-sdcard", "").depends_on("sd-phy").exclusive_in("sd-slot"),
            ComponentSpec::new("sd-phy", ""),
            ComponentSpec::new("dma", "")
                .depends_on("dma-phy")
                .requires_feature("controller"),
            ComponentSpec::new("dma-phy", ""),
            ComponentSpec::new("leds", ""),
        ])
        .unwrap()
    }

    #[test]
    fn structural_dependencies_are_auto_included() {
        let resolution = resolve(&registry(), &["controller", "leds"]).unwrap();
        assert_eq!(resolution.order, vec!["phy", "controller", "leds"]);
        assert_eq!(resolution.auto_included, vec!["phy"]);
        assert_eq!(resolution.requested, vec!["controller", "leds"]);
        assert!(resolution.is_auto_included("phy"));
    }

    #[test]
    fn explicitly_requested_dependency_is_not_auto() {
        let resolution = resolve(&registry(), &["controller", "phy"]).unwrap();
        assert!(resolution.auto_included.is_empty());
        assert_eq!(resolution.order, vec!["phy", "controller"]);
    }

    #[test]
    fn feature_dependency_must_be_requested() {
        let err = resolve(&registry(), &["dma"]).unwrap_err();
        match err {
            RegistryError::MissingPrerequisite {
                component,
                dependency,
            } => {
                assert_eq!(component, "dma");
                assert_eq!(dependency, "controller");
            }
            other => panic!("expected MissingPrerequisite, got {other:?}"),
        }
    }

    #[test]
    fn feature_dependency_satisfied_by_selection() {
        let resolution = resolve(&registry(), &["dma", "controller"]).unwrap();
        assert_eq!(resolution.order, vec!["dma-phy", "phy", "controller", "dma"]);
        assert_eq!(resolution.auto_included, vec!["dma-phy", "phy"]);
    }

    #[test]
    fn exclusivity_is_checked_after_expansion() {
        let err = resolve(&registry(), &["sdcard", "spi-sdcard"]).unwrap_err();
        assert!(matches!(err, RegistryError::ConflictingFeatureSelection { ref group, .. } if group == "sd-slot"));
    }

    #[test]
    fn shared_dependency_is_included_once() {
        let resolution = resolve(&registry(), &["mac", "etherbone"]).unwrap();
        assert_eq!(resolution.order, vec!["eth-phy", "mac", "etherbone"]);
        assert_eq!(resolution.auto_included, vec!["eth-phy"]);
    }

    #[test]
    fn unknown_request_is_rejected() {
        let err = resolve(&registry(), &["leds", "uart"]).unwrap_err();
        assert!(matches!(err, RegistryError::UnknownComponent { ref id } if id == "uart"));
    }

    #[test]
    fn duplicates_in_request_collapse() {
        let resolution = resolve(&registry(), &["leds", "leds"]).unwrap();
        assert_eq!(resolution.order, vec!["leds"]);
    }

    #[test]
    fn dependencies_precede_dependents() {
        let registry = registry();
        let resolution = resolve(&registry, &["leds", "dma", "mac", "controller"]).unwrap();
        for id in &resolution.order {
            let spec = registry.get(id).unwrap();
            for dep in spec.dependency_ids() {
                assert!(resolution.position(dep) < resolution.position(id), "{dep} after {id}");
            }
        }
    }

    #[test]
    fn resolution_is_stable() {
        let registry = registry();
        let a = resolve(&registry, &["mac", "leds", "controller"]).unwrap();
        let b = resolve(&registry, &["mac", "leds", "controller"]).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.order, vec!["eth-phy", "mac", "leds", "phy", "controller"]);
    }
}
