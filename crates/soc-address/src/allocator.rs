//! First-fit address allocator.
//!
//! Every region occupies a power-of-two span aligned to that span, so a
//! region can be decoded with a single mask compare. Pinned regions are
//! placed first at their fixed base; the rest are placed first-fit from the
//! allocator's base in request order.

use tracing::debug;

use crate::error::{AddressError, Result};
use crate::region::{AddressMap, AddressRegion, RegionKind};

/// Upper bound of a 32-bit bus.
pub const DEFAULT_LIMIT: u64 = 1 << 32;

/// Round `value` up to the next multiple of `align` (a power of two).
fn align_up(value: u64, align: u64) -> Option<u64> {
    value.checked_add(align - 1).map(|v| v & !(align - 1))
}

/// Builds an [`AddressMap`] one region at a time.
#[derive(Debug, Clone)]
pub struct AddressAllocator {
    base: u64,
    limit: u64,
    regions: Vec<AddressRegion>,
}

impl Default for AddressAllocator {
    fn default() -> Self {
        Self::new(0, DEFAULT_LIMIT)
    }
}

impl AddressAllocator {
    /// Allocator placing regions in `[base, limit)`.
    pub fn new(base: u64, limit: u64) -> Self {
        Self {
            base,
            limit,
            regions: Vec::new(),
        }
    }

    pub fn base(&self) -> u64 {
        self.base
    }

    pub fn limit(&self) -> u64 {
        self.limit
    }

    /// Regions placed so far.
    pub fn regions(&self) -> &[AddressRegion] {
        &self.regions
    }

    /// Place a region at a fixed base.
    pub fn pin(&mut self, owner: &str, base: u64, size: u64, kind: RegionKind) -> Result<u64> {
        let span = self.span_for(owner, size)?;
        if base % span != 0 {
            return Err(AddressError::MisalignedRegion {
                owner: owner.to_string(),
                base,
                span,
            });
        }
        if base.checked_add(span).map_or(true, |end| end > self.limit) {
            return Err(AddressError::AddressSpaceExhausted {
                owner: owner.to_string(),
                size,
                limit: self.limit,
            });
        }
        if let Some(other) = self.regions.iter().find(|r| r.overlaps(base, span)) {
            return Err(AddressError::RegionOverlap {
                owner: owner.to_string(),
                base,
                other: other.owner.clone(),
            });
        }
        self.place(owner, base, size, span, kind, true);
        Ok(base)
    }

    /// Place a region at the lowest free aligned base.
    pub fn allocate(&mut self, owner: &str, size: u64, kind: RegionKind) -> Result<u64> {
        let span = self.span_for(owner, size)?;
        let exhausted = || AddressError::AddressSpaceExhausted {
            owner: owner.to_string(),
            size,
            limit: self.limit,
        };

        let mut candidate = align_up(self.base, span).ok_or_else(exhausted)?;
        loop {
            let end = candidate.checked_add(span).ok_or_else(exhausted)?;
            if end > self.limit {
                return Err(exhausted());
            }
            // Skip past the highest-ending region in the way.
            let blocker = self
                .regions
                .iter()
                .filter(|r| r.overlaps(candidate, span))
                .map(AddressRegion::end)
                .max();
            match blocker {
                Some(blocked_until) => {
                    candidate = align_up(blocked_until, span).ok_or_else(exhausted)?;
                }
                None => break,
            }
        }
        self.place(owner, candidate, size, span, kind, false);
        Ok(candidate)
    }

    /// Freeze the map.
    pub fn finish(self) -> AddressMap {
        AddressMap::new(self.regions)
    }

    fn span_for(&self, owner: &str, size: u64) -> Result<u64> {
        if size == 0 {
            return Err(AddressError::ZeroSizedRegion {
                owner: owner.to_string(),
            });
        }
        if self.regions.iter().any(|r| r.owner == owner) {
            return Err(AddressError::DuplicateRegion {
                owner: owner.to_string(),
            });
        }
        size.checked_next_power_of_two()
            .ok_or_else(|| AddressError::AddressSpaceExhausted {
                owner: owner.to_string(),
                size,
                limit: self.limit,
            })
    }

    fn place(
        &mut self,
        owner: &str,
        base: u64,
        size: u64,
        span: u64,
        kind: RegionKind,
        pinned: bool,
    ) {
        debug!(owner, base, span, %kind, pinned, "placed address region");
        self.regions.push(AddressRegion {
            owner: owner.to_string(),
            base,
            size,
            span,
            kind,
            pinned,
        });
    }
}
