//! Catalogue files.
//!
//! A catalogue file lists components as `[[component]]` tables:
//!
//! ```toml
//! [[component]]
//! id = "led-chaser"
//! description = "User LED chaser"
//! capabilities = ["user-leds"]
//! address = { size = 0x800, kind = "io" }
//! clocks = [{ name = "sys", freq = { sys-ratio = { num = 1, den = 1 } } }]
//! dependencies = [{ id = "gpio-buttons", kind = "feature" }]
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::component::ComponentSpec;
use crate::error::{RegistryError, Result};
use crate::registry::ComponentRegistry;

#[derive(Debug, Default, Serialize, Deserialize)]
struct CatalogueFile {
    #[serde(default, rename = "component")]
    components: Vec<ComponentSpec>,
}

/// Parse a catalogue from a TOML string and load it into a registry.
pub fn parse_catalogue_toml(input: &str) -> Result<ComponentRegistry> {
    let file: CatalogueFile = toml::from_str(input)?;
    ComponentRegistry::load(file.components)
}

/// Load a catalogue from a `.toml` file.
pub fn load_catalogue_toml(path: &Path) -> Result<ComponentRegistry> {
    if !path.exists() {
        return Err(RegistryError::NotFound {
            path: path.to_path_buf(),
        });
    }
    debug!(path = %path.display(), "loading component catalogue");
    let content = std::fs::read_to_string(path)?;
    parse_catalogue_toml(&content)
}

/// Serialize a registry's components to catalogue TOML.
pub fn catalogue_to_toml(registry: &ComponentRegistry) -> Result<String> {
    let file = CatalogueFile {
        components: registry.components().to_vec(),
    };
    Ok(toml::to_string_pretty(&file)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalogue::standard;
    use crate::component::{DependencyKind, Placement};
    use soc_address::RegionKind;
    use soc_board::{Board, Capability};
    use soc_clock::{ClockSource, DomainRole, Frequency};

    const CATALOGUE: &str = r#"
[[component]]
id = "sys-memory-controller"
description = "SDRAM controller"
capabilities = ["sdram"]
address = { size = 0x40000000, kind = "memory", placement = "main-ram" }
clocks = [
    { name = "sys", freq = { hz = 50000000 } },
    { name = "sys4x", freq = { sys-ratio = { num = 4, den = 1 } } },
    { name = "sys4x-shifted", freq = { sys-ratio = { num = 4, den = 1 } }, phase = { reference = "sys4x", degrees = 90.0 } },
    { name = "idelay", freq = { hz = 200000000 }, role = "calibration" },
]

[[component]]
id = "eth"
clocks = [{ name = "eth", freq = { hz = 125000000 }, source = { input = "clk125" } }]
dependencies = [{ id = "sys-memory-controller", kind = "feature" }]
"#;

    #[test]
    fn parse_full_catalogue() {
        let registry = parse_catalogue_toml(CATALOGUE).unwrap();
        assert_eq!(registry.len(), 2);

        let mc = registry.get("sys-memory-controller").unwrap();
        assert_eq!(mc.capabilities, vec![Capability::Sdram]);
        let address = mc.address.unwrap();
        assert_eq!(address.kind, RegionKind::Memory);
        assert_eq!(address.placement, Placement::MainRam);
        assert_eq!(mc.clocks[1].frequency, Frequency::SysRatio { num: 4, den: 1 });
        assert_eq!(mc.clocks[2].phase.as_ref().unwrap().degrees, 90.0);
        assert_eq!(mc.clocks[3].role, DomainRole::Calibration);

        let eth = registry.get("eth").unwrap();
        assert_eq!(eth.clocks[0].source, ClockSource::Input("clk125".into()));
        assert_eq!(eth.dependencies[0].kind, DependencyKind::Feature);
    }

    #[test]
    fn dependency_kind_defaults_to_structural() {
        let registry = parse_catalogue_toml(
            r#"
[[component]]
id = "a"
dependencies = [{ id = "b" }]

[[component]]
id = "b"
"#,
        )
        .unwrap();
        assert_eq!(registry.get("a").unwrap().dependencies[0].kind, DependencyKind::Structural);
    }

    #[test]
    fn catalogue_validation_applies_to_files() {
        let err = parse_catalogue_toml(
            r#"
[[component]]
id = "a"
dependencies = [{ id = "missing" }]
"#,
        )
        .unwrap_err();
        assert!(matches!(err, RegistryError::UnknownDependency { .. }));
    }

    #[test]
    fn malformed_toml_is_reported() {
        assert!(matches!(
            parse_catalogue_toml("[[component]]\nid = 3\n"),
            Err(RegistryError::Toml(_))
        ));
    }

    #[test]
    fn standard_catalogue_survives_a_file() {
        let registry = standard(&Board::microphase_a7lite()).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalogue.toml");
        std::fs::write(&path, catalogue_to_toml(&registry).unwrap()).unwrap();

        let loaded = load_catalogue_toml(&path).unwrap();
        assert_eq!(loaded.components(), registry.components());
    }

    #[test]
    fn missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_catalogue_toml(&dir.path().join("nope.toml")).unwrap_err();
        assert!(matches!(err, RegistryError::NotFound { .. }));
    }
}
