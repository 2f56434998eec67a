//! SoC composition.
//!
//! Turns a board, a component registry and a selection into one immutable
//! [`Composition`]: the clock plan, the build order and the address map,
//! plus the timing constraints the build flow needs.
//!
//! ```text
//! selection ──► resolve ──► board support ──► clock plan ──► address map ──► Composition
//! ```
//!
//! Composition is a pure function of its inputs: identical inputs give equal
//! compositions with equal fingerprints.

pub mod composer;
pub mod composition;
pub mod error;
pub mod report;

pub use composer::{compose, CompositionRequest, SocComposer};
pub use composition::{Composition, Fingerprint};
pub use error::{ComposeError, ErrorKind, Result};
pub use report::CompositionReport;
