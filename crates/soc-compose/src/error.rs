//! Composition errors and their kind taxonomy.

use serde::{Deserialize, Serialize};
use soc_address::AddressError;
use soc_board::BoardError;
use soc_clock::ClockError;
use soc_registry::RegistryError;

/// Errors that abort a composition.
///
/// Errors from the planning crates pass through unchanged; [`kind`](Self::kind)
/// classifies any of them.
#[derive(Debug, thiserror::Error)]
pub enum ComposeError {
    #[error(transparent)]
    Board(#[from] BoardError),

    #[error(transparent)]
    Clock(#[from] ClockError),

    #[error(transparent)]
    Address(#[from] AddressError),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// A selected component needs something the board does not provide.
    #[error("component '{component}' needs '{capability}', which board '{board}' does not provide")]
    UnsupportedOnBoard {
        component: String,
        capability: String,
        board: String,
    },

    /// The composition could not be serialized for fingerprinting.
    #[error("failed to serialize composition: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias for composition.
pub type Result<T> = std::result::Result<T, ComposeError>;

/// Flat classification of every composition failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ErrorKind {
    ConflictingClockSource,
    InvalidPhaseReference,
    DuplicateDomain,
    UnknownClockSource,
    SourceCycle,
    UnachievableFrequency,
    InvalidClockRequest,
    AddressSpaceExhausted,
    RegionOverlap,
    MisalignedRegion,
    DuplicateRegion,
    ZeroSizedRegion,
    DuplicateComponent,
    UnknownDependency,
    CyclicDependency,
    UnknownComponent,
    ConflictingFeatureSelection,
    MissingPrerequisite,
    InvalidCatalogue,
    UnsupportedOnBoard,
    InvalidBoard,
    Serialization,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::ConflictingClockSource => "conflicting-clock-source",
            ErrorKind::InvalidPhaseReference => "invalid-phase-reference",
            ErrorKind::DuplicateDomain => "duplicate-domain",
            ErrorKind::UnknownClockSource => "unknown-clock-source",
            ErrorKind::SourceCycle => "source-cycle",
            ErrorKind::UnachievableFrequency => "unachievable-frequency",
            ErrorKind::InvalidClockRequest => "invalid-clock-request",
            ErrorKind::AddressSpaceExhausted => "address-space-exhausted",
            ErrorKind::RegionOverlap => "region-overlap",
            ErrorKind::MisalignedRegion => "misaligned-region",
            ErrorKind::DuplicateRegion => "duplicate-region",
            ErrorKind::ZeroSizedRegion => "zero-sized-region",
            ErrorKind::DuplicateComponent => "duplicate-component",
            ErrorKind::UnknownDependency => "unknown-dependency",
            ErrorKind::CyclicDependency => "cyclic-dependency",
            ErrorKind::UnknownComponent => "unknown-component",
            ErrorKind::ConflictingFeatureSelection => "conflicting-feature-selection",
            ErrorKind::MissingPrerequisite => "missing-prerequisite",
            ErrorKind::InvalidCatalogue => "invalid-catalogue",
            ErrorKind::UnsupportedOnBoard => "unsupported-on-board",
            ErrorKind::InvalidBoard => "invalid-board",
            ErrorKind::Serialization => "serialization",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ComposeError {
    /// The kind of the underlying failure.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ComposeError::Board(_) => ErrorKind::InvalidBoard,
            ComposeError::Clock(e) => match e {
                ClockError::ConflictingClockSource { .. } => ErrorKind::ConflictingClockSource,
                ClockError::InvalidPhaseReference { .. } => ErrorKind::InvalidPhaseReference,
                ClockError::DuplicateDomain { .. } => ErrorKind::DuplicateDomain,
                ClockError::UnknownClockSource { .. } => ErrorKind::UnknownClockSource,
                ClockError::SourceCycle { .. } => ErrorKind::SourceCycle,
                ClockError::UnachievableFrequency { .. } => ErrorKind::UnachievableFrequency,
                ClockError::InvalidRequest { .. } => ErrorKind::InvalidClockRequest,
            },
            ComposeError::Address(e) => match e {
                AddressError::AddressSpaceExhausted { .. } => ErrorKind::AddressSpaceExhausted,
                AddressError::RegionOverlap { .. } => ErrorKind::RegionOverlap,
                AddressError::MisalignedRegion { .. } => ErrorKind::MisalignedRegion,
                AddressError::DuplicateRegion { .. } => ErrorKind::DuplicateRegion,
                AddressError::ZeroSizedRegion { .. } => ErrorKind::ZeroSizedRegion,
            },
            ComposeError::Registry(e) => match e {
                RegistryError::DuplicateComponent { .. } => ErrorKind::DuplicateComponent,
                RegistryError::UnknownDependency { .. } => ErrorKind::UnknownDependency,
                RegistryError::CyclicDependency { .. } => ErrorKind::CyclicDependency,
                RegistryError::UnknownComponent { .. } => ErrorKind::UnknownComponent,
                RegistryError::ConflictingFeatureSelection { .. } => {
                    ErrorKind::ConflictingFeatureSelection
                }
                RegistryError::MissingPrerequisite { .. } => ErrorKind::MissingPrerequisite,
                RegistryError::InvalidCatalogue { .. }
                | RegistryError::NotFound { .. }
                | RegistryError::Toml(_)
                | RegistryError::TomlSer(_)
                | RegistryError::Io(_) => ErrorKind::InvalidCatalogue,
            },
            ComposeError::UnsupportedOnBoard { .. } => ErrorKind::UnsupportedOnBoard,
            ComposeError::Serialization(_) => ErrorKind::Serialization,
        }
    }
}
