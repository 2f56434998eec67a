//! Address regions and the finished map.

use serde::{Deserialize, Serialize};

/// Whether a region is cached memory or uncached I/O.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RegionKind {
    /// Cacheable memory.
    Memory,
    /// Uncached control/status registers.
    #[default]
    Io,
}

impl std::fmt::Display for RegionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RegionKind::Memory => f.pad("memory"),
            RegionKind::Io => f.pad("io"),
        }
    }
}

/// One memory-mapped window owned by a component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct AddressRegion {
    pub owner: String,
    pub base: u64,
    /// Size as requested.
    pub size: u64,
    /// Size rounded up to a power of two; the base is aligned to it.
    pub span: u64,
    pub kind: RegionKind,
    /// Placed at an explicit base rather than by the allocator.
    pub pinned: bool,
}

impl AddressRegion {
    /// One past the last address of the span.
    pub fn end(&self) -> u64 {
        self.base + self.span
    }

    pub fn contains(&self, addr: u64) -> bool {
        addr >= self.base && addr < self.end()
    }

    pub fn overlaps(&self, base: u64, span: u64) -> bool {
        base < self.end() && self.base < base + span
    }
}

impl std::fmt::Display for AddressRegion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:#010x}..{:#010x} {:<6} {}",
            self.base,
            self.end(),
            self.kind,
            self.owner
        )?;
        if self.pinned {
            write!(f, " (pinned)")?;
        }
        Ok(())
    }
}

/// Frozen result of allocation: regions in allocation order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AddressMap {
    regions: Vec<AddressRegion>,
}

impl AddressMap {
    pub(crate) fn new(regions: Vec<AddressRegion>) -> Self {
        Self { regions }
    }

    /// Regions in the order they were placed.
    pub fn regions(&self) -> &[AddressRegion] {
        &self.regions
    }

    pub fn region(&self, owner: &str) -> Option<&AddressRegion> {
        self.regions.iter().find(|r| r.owner == owner)
    }

    /// Region containing `addr`, if any.
    pub fn lookup(&self, addr: u64) -> Option<&AddressRegion> {
        self.regions.iter().find(|r| r.contains(addr))
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// Regions sorted by base address.
    pub fn by_address(&self) -> Vec<&AddressRegion> {
        let mut sorted: Vec<_> = self.regions.iter().collect();
        sorted.sort_by_key(|r| r.base);
        sorted
    }
}
