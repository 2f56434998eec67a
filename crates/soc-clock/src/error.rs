//! Clock planning errors.

use thiserror::Error;

/// Errors that can occur while building a clock plan.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ClockError {
    #[error("conflicting clock source '{input}': {detail}")]
    ConflictingClockSource { input: String, detail: String },

    #[error("invalid phase reference '{reference}' for domain '{domain}': {detail}")]
    InvalidPhaseReference {
        domain: String,
        reference: String,
        detail: String,
    },

    #[error("clock domain '{name}' requested twice with different parameters")]
    DuplicateDomain { name: String },

    #[error("unknown clock source '{source_name}' (requested by '{domain}')")]
    UnknownClockSource { domain: String, source_name: String },

    #[error("clock source chain is cyclic: {}", chain.join(" -> "))]
    SourceCycle { chain: Vec<String> },

    #[error("cannot generate {freq_hz} Hz for domain '{domain}': {detail}")]
    UnachievableFrequency {
        domain: String,
        freq_hz: u64,
        detail: String,
    },

    #[error("invalid clock request '{domain}': {detail}")]
    InvalidRequest { domain: String, detail: String },
}

/// Result type for clock planning.
pub type Result<T> = std::result::Result<T, ClockError>;
