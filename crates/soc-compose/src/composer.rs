//! Composition pipeline.
//!
//! expand selection -> board support -> clock plan -> build order -> address map.
//! Any failure aborts the whole composition.

use soc_address::{AddressAllocator, DEFAULT_LIMIT};
use soc_board::parse::validate_board;
use soc_board::{Board, BoardError};
use soc_clock::{ClockPlanner, ClockRequest};
use soc_registry::{resolve, ComponentRegistry, Placement, RegistryError, Resolution};
use tracing::{info, warn};

use crate::composition::Composition;
use crate::error::{ComposeError, Result};

/// What the caller wants composed.
#[derive(Debug, Clone, PartialEq)]
pub struct CompositionRequest {
    /// Requested component ids, in priority order.
    pub components: Vec<String>,
    /// System clock; the board default when absent.
    pub sys_clk_hz: Option<u64>,
    /// Extra clock domains requested by the caller.
    pub clocks: Vec<ClockRequest>,
    /// Non-primary input clocks allowed to drive their own stage.
    pub declared_stages: Vec<String>,
    /// First address handed out by the allocator.
    pub address_base: u64,
    /// Bus limit.
    pub address_limit: u64,
}

impl Default for CompositionRequest {
    fn default() -> Self {
        Self {
            components: Vec::new(),
            sys_clk_hz: None,
            clocks: Vec::new(),
            declared_stages: Vec::new(),
            address_base: 0,
            address_limit: DEFAULT_LIMIT,
        }
    }
}

impl CompositionRequest {
    pub fn new<S: Into<String>>(components: impl IntoIterator<Item = S>) -> Self {
        Self {
            components: components.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    pub fn sys_clk_hz(mut self, hz: u64) -> Self {
        self.sys_clk_hz = Some(hz);
        self
    }

    pub fn clock(mut self, request: ClockRequest) -> Self {
        self.clocks.push(request);
        self
    }

    pub fn declare_stage(mut self, input: impl Into<String>) -> Self {
        self.declared_stages.push(input.into());
        self
    }

    pub fn address_base(mut self, base: u64) -> Self {
        self.address_base = base;
        self
    }
}

/// Composes SoCs from one registry.
#[derive(Debug, Clone, Copy)]
pub struct SocComposer<'r> {
    registry: &'r ComponentRegistry,
}

/// Compose `request` on `board` from `registry`.
pub fn compose(
    registry: &ComponentRegistry,
    board: &Board,
    request: &CompositionRequest,
) -> Result<Composition> {
    SocComposer::new(registry).compose_request(board, request)
}

impl<'r> SocComposer<'r> {
    pub fn new(registry: &'r ComponentRegistry) -> Self {
        Self { registry }
    }

    /// Compose with the board's default system clock.
    pub fn compose<S: AsRef<str>>(
        &self,
        board: &Board,
        requested: &[S],
        clock_requests: &[ClockRequest],
        address_base: u64,
    ) -> Result<Composition> {
        let request = CompositionRequest {
            components: requested.iter().map(|s| s.as_ref().to_string()).collect(),
            clocks: clock_requests.to_vec(),
            address_base,
            ..CompositionRequest::default()
        };
        self.compose_request(board, &request)
    }

    /// Run the full pipeline.
    pub fn compose_request(&self, board: &Board, request: &CompositionRequest) -> Result<Composition> {
        check_board(board)?;

        let resolution = resolve(self.registry, &request.components)?;
        self.check_support(board, &resolution)?;

        let clock_plan = {
            let sys_hz = request.sys_clk_hz.unwrap_or(board.default_sys_clk_hz);
            let mut planner = ClockPlanner::new(board)
                .request(ClockRequest::sys(sys_hz))
                .requests(request.clocks.iter().cloned());
            for input in &request.declared_stages {
                planner = planner.declare_stage(input.clone());
            }
            for id in &resolution.order {
                let spec = self.registry.require(id)?;
                planner = planner.requests(spec.clocks.iter().cloned());
            }
            planner.build()?
        };

        let address_map = {
            let mut allocator = AddressAllocator::new(request.address_base, request.address_limit);
            // Pinned windows first so first-fit allocation routes around them.
            for id in &resolution.order {
                let spec = self.registry.require(id)?;
                if let (Some(need), Some(window)) = (spec.address, board.main_ram) {
                    if need.placement == Placement::MainRam {
                        allocator.pin(id, window.base, need.size, need.kind)?;
                    }
                }
            }
            for id in &resolution.order {
                let spec = self.registry.require(id)?;
                if let Some(need) = spec.address.filter(|n| n.placement == Placement::Auto) {
                    allocator.allocate(id, need.size, need.kind)?;
                }
            }
            allocator.finish()
        };

        let Resolution {
            requested,
            order,
            auto_included,
        } = resolution;
        let composition = Composition::new(
            board.clone(),
            clock_plan,
            address_map,
            order,
            requested,
            auto_included,
        )?;

        info!(
            board = %board.name,
            components = composition.order().len(),
            domains = composition.clock_plan().len(),
            regions = composition.address_map().len(),
            fingerprint = composition.fingerprint().short(),
            "composed SoC"
        );
        Ok(composition)
    }

    /// Every selected component must be buildable on the board.
    fn check_support(&self, board: &Board, resolution: &Resolution) -> Result<()> {
        for id in &resolution.order {
            let spec = self.registry.require(id)?;
            if let Some(missing) = spec.capabilities.iter().find(|c| !board.has_capability(**c)) {
                return Err(ComposeError::UnsupportedOnBoard {
                    component: id.clone(),
                    capability: missing.to_string(),
                    board: board.name.clone(),
                });
            }
            // A main-RAM need must fit the window the board decodes.
            if let Some(need) = spec.address.filter(|n| n.placement == Placement::MainRam) {
                if board.main_ram.map_or(true, |window| need.size > window.size) {
                    return Err(ComposeError::UnsupportedOnBoard {
                        component: id.clone(),
                        capability: "main-ram".into(),
                        board: board.name.clone(),
                    });
                }
            }
        }

        if let Some((connector, members)) = board.connector_conflicts(&resolution.order).next() {
            return Err(RegistryError::ConflictingFeatureSelection {
                group: connector.name.clone(),
                components: members.into_iter().map(String::from).collect(),
            }
            .into());
        }
        Ok(())
    }
}

/// Reject boards with validation errors; log warnings.
fn check_board(board: &Board) -> Result<()> {
    let Err(issues) = validate_board(board) else {
        return Ok(());
    };
    let mut errors = Vec::new();
    for issue in &issues {
        if issue.is_error() {
            errors.push(issue.message.clone());
        } else {
            warn!(board = %board.name, "{}", issue.message);
        }
    }
    if errors.is_empty() {
        Ok(())
    } else {
        Err(BoardError::Validation {
            detail: format!("board '{}': {}", board.name, errors.join("; ")),
        }
        .into())
    }
}
