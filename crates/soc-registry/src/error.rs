//! Registry error types.

use std::path::PathBuf;

/// Errors that can occur while loading a catalogue or resolving a selection.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// Two components share an identifier.
    #[error("duplicate component '{id}'")]
    DuplicateComponent { id: String },

    /// A component depends on an identifier the catalogue does not contain.
    #[error("component '{component}' depends on unknown component '{dependency}'")]
    UnknownDependency {
        component: String,
        dependency: String,
    },

    /// Dependencies form a cycle; the path starts and ends at the same id.
    #[error("dependency cycle: {}", cycle.join(" -> "))]
    CyclicDependency { cycle: Vec<String> },

    /// A selected identifier is not in the catalogue.
    #[error("unknown component '{id}'")]
    UnknownComponent { id: String },

    /// More than one member of a mutually exclusive group was selected.
    #[error("components {} are mutually exclusive ({group})", components.join(", "))]
    ConflictingFeatureSelection {
        group: String,
        components: Vec<String>,
    },

    /// A feature dependency was not selected.
    #[error("component '{component}' requires '{dependency}' to be selected")]
    MissingPrerequisite {
        component: String,
        dependency: String,
    },

    /// Structurally invalid catalogue entry.
    #[error("invalid catalogue: {detail}")]
    InvalidCatalogue { detail: String },

    /// Catalogue file not found.
    #[error("catalogue not found: {}", path.display())]
    NotFound { path: PathBuf },

    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// TOML serialization error.
    #[error("TOML serialize error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for registry operations.
pub type Result<T> = std::result::Result<T, RegistryError>;
