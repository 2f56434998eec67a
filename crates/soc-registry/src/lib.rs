//! Component registry and dependency resolution for SoC composition.
//!
//! # Architecture
//!
//! - **Components**: declarative specs carrying clock needs, address window,
//!   dependencies, exclusive groups, board capabilities
//! - **Registry**: a validated, read-only catalogue of specs
//! - **Resolution**: expands a selection with its structural dependencies
//!   and orders it so dependencies come first
//!
//! The standard catalogue is built per board so that memory PHY clocking
//! follows the board's SDRAM profile.

pub mod catalogue;
pub mod component;
pub mod error;
pub mod parse;
pub mod registry;
pub mod resolve;
pub mod tree;

pub use catalogue::{standard, standard_specs};
pub use component::{AddressNeed, ComponentSpec, Dependency, DependencyKind, Placement};
pub use error::{RegistryError, Result};
pub use parse::{catalogue_to_toml, load_catalogue_toml, parse_catalogue_toml};
pub use registry::ComponentRegistry;
pub use resolve::{resolve, Resolution};
pub use tree::{format_order, format_tree};
