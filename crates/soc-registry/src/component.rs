//! Component specifications.
//!
//! A component declares what it needs from the SoC: clock domains, an
//! address window, other components, and board capabilities. Specs are
//! plain data and never change once loaded into a registry.

use serde::{Deserialize, Serialize};
use soc_address::RegionKind;
use soc_board::Capability;
use soc_clock::ClockRequest;

/// How a dependency enters the selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DependencyKind {
    /// Added automatically when the dependent is selected.
    #[default]
    Structural,
    /// Must be selected explicitly.
    Feature,
}

/// An edge to another component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Dependency {
    pub id: String,
    #[serde(default)]
    pub kind: DependencyKind,
}

/// Where an address window is placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Placement {
    /// First fit from the address base.
    #[default]
    Auto,
    /// Pinned at the board's main-RAM window.
    MainRam,
}

/// The address window a component decodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct AddressNeed {
    pub size: u64,
    #[serde(default)]
    pub kind: RegionKind,
    #[serde(default)]
    pub placement: Placement,
}

impl AddressNeed {
    /// Uncached register window.
    pub fn io(size: u64) -> Self {
        Self {
            size,
            kind: RegionKind::Io,
            placement: Placement::Auto,
        }
    }

    /// Cached memory window placed first fit.
    pub fn memory(size: u64) -> Self {
        Self {
            size,
            kind: RegionKind::Memory,
            placement: Placement::Auto,
        }
    }

    /// Cached memory pinned at the board's main-RAM base.
    pub fn main_ram(size: u64) -> Self {
        Self {
            size,
            kind: RegionKind::Memory,
            placement: Placement::MainRam,
        }
    }
}

/// One selectable hardware building block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ComponentSpec {
    /// Unique identifier (e.g., "ethernet-mac").
    pub id: String,
    #[serde(default)]
    pub description: String,
    /// Clock domains this component is clocked by.
    #[serde(default)]
    pub clocks: Vec<ClockRequest>,
    #[serde(default)]
    pub address: Option<AddressNeed>,
    /// Dependencies, in declared order.
    #[serde(default)]
    pub dependencies: Vec<Dependency>,
    /// Mutually exclusive groups this component belongs to.
    #[serde(default)]
    pub exclusive: Vec<String>,
    /// Board capabilities the component needs pins for.
    #[serde(default)]
    pub capabilities: Vec<Capability>,
}

impl ComponentSpec {
    pub fn new(id: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            description: description.into(),
            clocks: Vec::new(),
            address: None,
            dependencies: Vec::new(),
            exclusive: Vec::new(),
            capabilities: Vec::new(),
        }
    }

    pub fn clock(mut self, request: ClockRequest) -> Self {
        self.clocks.push(request);
        self
    }

    pub fn address(mut self, need: AddressNeed) -> Self {
        self.address = Some(need);
        self
    }

    /// Structural dependency, auto-included.
    pub fn depends_on(mut self, id: impl Into<String>) -> Self {
        self.dependencies.push(Dependency {
            id: id.into(),
            kind: DependencyKind::Structural,
        });
        self
    }

    /// Feature dependency, which the caller must select.
    pub fn requires_feature(mut self, id: impl Into<String>) -> Self {
        self.dependencies.push(Dependency {
            id: id.into(),
            kind: DependencyKind::Feature,
        });
        self
    }

    pub fn exclusive_in(mut self, group: impl Into<String>) -> Self {
        self.exclusive.push(group.into());
        self
    }

    pub fn requires(mut self, capability: Capability) -> Self {
        self.capabilities.push(capability);
        self
    }

    /// Identifiers of all dependencies, in declared order.
    pub fn dependency_ids(&self) -> impl Iterator<Item = &str> {
        self.dependencies.iter().map(|d| d.id.as_str())
    }
}
