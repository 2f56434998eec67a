//! Clock domain planning.
//!
//! Given a board and a list of [`ClockRequest`]s, the planner produces a
//! [`ClockPlan`]: one generation stage per driving input, the divider and
//! absolute phase of every domain, the reset line gating all stages, and the
//! timing constraints the build flow needs.
//!
//! ```text
//!   clk50 ──► [stage 0: PLL, VCO 1600 MHz] ─┬─► sys            /32
//!                    ▲                       ├─► sys4x          /8
//!      rst | ~cpu_reset                      ├─► sys4x-shifted  /8 @ 90°
//!                                            └─► calibration    /8
//! ```

pub mod error;
pub mod plan;
pub mod planner;
pub mod request;
pub mod reset;
pub mod solve;

pub use error::{ClockError, Result};
pub use plan::{ClockDomain, ClockPlan, GenerationStage, TimingConstraint};
pub use planner::{plan_clocks, ClockPlanner};
pub use request::{
    ClockRequest, ClockSource, DomainRole, Frequency, PhaseOffset, CALIBRATION_HZ, SYS_DOMAIN,
};
pub use reset::{ResetLine, ResetTerm, SOFT_RESET};
pub use solve::{solve_stage, StageConfig, DEFAULT_MARGIN};
