//! The component registry.
//!
//! Loading checks the catalogue as a whole: identifiers are unique, every
//! dependency names a known component, and the dependency graph is acyclic.
//! After loading the registry is read-only and can be shared across threads.

use std::collections::BTreeMap;

use tracing::debug;

use crate::component::ComponentSpec;
use crate::error::{RegistryError, Result};

/// A validated, immutable set of component specs.
#[derive(Debug, Clone, Default)]
pub struct ComponentRegistry {
    specs: Vec<ComponentSpec>,
    index: BTreeMap<String, usize>,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    Visiting,
    Done,
}

impl ComponentRegistry {
    /// Validate and index a catalogue.
    pub fn load(specs: impl IntoIterator<Item = ComponentSpec>) -> Result<Self> {
        let mut registry = Self::default();
        for spec in specs {
            check_spec(&spec)?;
            if registry.index.contains_key(&spec.id) {
                return Err(RegistryError::DuplicateComponent { id: spec.id });
            }
            registry.index.insert(spec.id.clone(), registry.specs.len());
            registry.specs.push(spec);
        }

        for spec in &registry.specs {
            for dep in spec.dependency_ids() {
                if !registry.index.contains_key(dep) {
                    return Err(RegistryError::UnknownDependency {
                        component: spec.id.clone(),
                        dependency: dep.to_string(),
                    });
                }
            }
        }

        let mut marks = BTreeMap::new();
        for spec in &registry.specs {
            let mut path = Vec::new();
            registry.check_acyclic(&spec.id, &mut marks, &mut path)?;
        }

        debug!(components = registry.specs.len(), "loaded component registry");
        Ok(registry)
    }

    pub fn get(&self, id: &str) -> Option<&ComponentSpec> {
        self.index.get(id).map(|&i| &self.specs[i])
    }

    /// Like [`get`](Self::get), failing with `UnknownComponent`.
    pub fn require(&self, id: &str) -> Result<&ComponentSpec> {
        self.get(id).ok_or_else(|| RegistryError::UnknownComponent { id: id.to_string() })
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// All specs, in load order.
    pub fn components(&self) -> &[ComponentSpec] {
        &self.specs
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    /// Check that every id exists and no exclusive group is selected twice.
    pub fn validate_selection<S: AsRef<str>>(&self, ids: &[S]) -> Result<()> {
        let mut groups: BTreeMap<&str, Vec<String>> = BTreeMap::new();
        for id in ids {
            let spec = self.require(id.as_ref())?;
            for group in &spec.exclusive {
                let members = groups.entry(group.as_str()).or_default();
                if !members.contains(&spec.id) {
                    members.push(spec.id.clone());
                }
            }
        }
        match groups.into_iter().find(|(_, members)| members.len() > 1) {
            Some((group, components)) => Err(RegistryError::ConflictingFeatureSelection {
                group: group.to_string(),
                components,
            }),
            None => Ok(()),
        }
    }

    fn check_acyclic<'a>(
        &'a self,
        id: &'a str,
        marks: &mut BTreeMap<&'a str, Mark>,
        path: &mut Vec<&'a str>,
    ) -> Result<()> {
        match marks.get(id) {
            Some(Mark::Done) => return Ok(()),
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
        if let Some(spec) = self.get(id) {
            for dep in spec.dependency_ids() {
                self.check_acyclic(dep, marks, path)?;
            }
        }
        path.pop();
        marks.insert(id, Mark::Done);
        Ok(())
    }
}

fn check_spec(spec: &ComponentSpec) -> Result<()> {
    let invalid = |detail: String| RegistryError::InvalidCatalogue { detail };
    if spec.id.trim().is_empty() {
        return Err(invalid("component id must not be empty".into()));
    }
    if spec.address.is_some_and(|a| a.size == 0) {
        return Err(invalid(format!("component '{}' declares a zero-sized address window", spec.id)));
    }
    for (i, clock) in spec.clocks.iter().enumerate() {
        if spec.clocks[..i].iter().any(|c| c.name == clock.name) {
            return Err(invalid(format!(
                "component '{}' lists clock domain '{}' twice",
                spec.id, clock.name
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::AddressNeed;

    fn spec(id: &str) -> ComponentSpec {
        ComponentSpec::new(id, "")
    }

    #[test]
    fn load_and_lookup() {
        let registry = ComponentRegistry::load([spec("a").depends_on("b"), spec("b")]).unwrap();
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.get("a").unwrap().dependencies.len(), 1);
        assert!(registry.get("c").is_none());
        assert!(matches!(
            registry.require("c"),
            Err(RegistryError::UnknownComponent { .. })
        ));
    }

    #[test]
    fn duplicate_id_is_rejected() {
        let err = ComponentRegistry::load([spec("a"), spec("a")]).unwrap_err();
        assert!(matches!(err, RegistryError::DuplicateComponent { ref id } if id == "a"));
    }

    #[test]
    fn unknown_dependency_is_rejected() {
        let err = ComponentRegistry::load([spec("a").depends_on("ghost")]).unwrap_err();
        assert!(matches!(
            err,
            RegistryError::UnknownDependency { ref dependency, .. } if dependency == "ghost"
        ));
    }

    #[test]
    fn mutual_dependency_is_a_cycle() {
        let err = ComponentRegistry::load([spec("a").depends_on("b"), spec("b").requires_feature("a")])
            .unwrap_err();
        match err {
            RegistryError::CyclicDependency { cycle } => assert_eq!(cycle, vec!["a", "b", "a"]),
            other => panic!("expected CyclicDependency, got {other:?}"),
        }
    }

    #[test]
    fn self_dependency_is_a_cycle() {
        let err = ComponentRegistry::load([spec("a").depends_on("a")]).unwrap_err();
        assert!(matches!(err, RegistryError::CyclicDependency { ref cycle } if cycle == &["a", "a"]));
    }

    #[test]
    fn transitive_cycle_reports_only_the_loop() {
        let err = ComponentRegistry::load([
            spec("root").depends_on("x"),
            spec("x").depends_on("y"),
            spec("y").depends_on("z"),
            spec("z").depends_on("x"),
        ])
        .unwrap_err();
        assert!(matches!(err, RegistryError::CyclicDependency { ref cycle } if cycle == &["x", "y", "z", "x"]));
    }

    #[test]
    fn invalid_specs_are_rejected() {
        assert!(matches!(
            ComponentRegistry::load([spec(" ")]),
            Err(RegistryError::InvalidCatalogue { .. })
        ));
        assert!(matches!(
            ComponentRegistry::load([spec("a").address(AddressNeed::io(0))]),
            Err(RegistryError::InvalidCatalogue { .. })
        ));
    }

    #[test]
    fn exclusive_group_allows_one_member() {
        let registry = ComponentRegistry::load([
            spec("sdcard").exclusive_in("sd-slot"),
            spec("spi-sdcard").exclusive_in("sd-slot"),
            spec("leds"),
        ])
        .unwrap();
        registry.validate_selection(&["sdcard", "leds"]).unwrap();
        let err = registry.validate_selection(&["spi-sdcard", "leds", "sdcard"]).unwrap_err();
        match err {
            RegistryError::ConflictingFeatureSelection { group, components } => {
                assert_eq!(group, "sd-slot");
                assert_eq!(components, vec!["spi-sdcard", "sdcard"]);
            }
            other => panic!("expected ConflictingFeatureSelection, got {other:?}"),
        }
    }

    #[test]
    fn unknown_selection_is_rejected() {
        let registry = ComponentRegistry::load([spec("a")]).unwrap();
        assert!(matches!(
            registry.validate_selection(&["b"]),
            Err(RegistryError::UnknownComponent { ref id }) if id == "b"
        ));
    }

    #[test]
    fn registry_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ComponentRegistry>();
    }
}
