//! Memory-mapped address space allocation.
//!
//! Components that expose registers or memory get one [`AddressRegion`]
//! each. Regions are power-of-two sized and naturally aligned, never overlap,
//! and stay below the bus limit (4 GiB by default).

pub mod allocator;
pub mod error;
pub mod region;

pub use allocator::{AddressAllocator, DEFAULT_LIMIT};
pub use error::{AddressError, Result};
pub use region::{AddressMap, AddressRegion, RegionKind};
