//! Address allocation errors.

/// Errors that can occur while building an address map.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AddressError {
    /// No free, aligned window below the bus limit.
    #[error("address space exhausted: no room for {size:#x} bytes for '{owner}' below {limit:#x}")]
    AddressSpaceExhausted { owner: String, size: u64, limit: u64 },

    /// A pinned region collides with one already placed.
    #[error("region '{owner}' at {base:#x} overlaps region '{other}'")]
    RegionOverlap {
        owner: String,
        base: u64,
        other: String,
    },

    /// A pinned base is not aligned to the region's span.
    #[error("region '{owner}' base {base:#x} is not aligned to its span {span:#x}")]
    MisalignedRegion { owner: String, base: u64, span: u64 },

    /// The owner already holds a region.
    #[error("'{owner}' already owns a region")]
    DuplicateRegion { owner: String },

    #[error("region for '{owner}' has zero size")]
    ZeroSizedRegion { owner: String },
}

/// Result type alias for address allocation.
pub type Result<T> = std::result::Result<T, AddressError>;
