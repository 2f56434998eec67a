//! FPGA board models for SoC composition.
//!
//! A board describes the physical target a SoC is composed for:
//! - **Input clocks:** oscillators wired to the FPGA, the first one is primary
//! - **Reset inputs:** push-buttons and external bus resets, with native polarity
//! - **Capabilities:** which peripherals the board has pins for
//! - **Clock generator:** the PLL/MMCM family available on the device
//! - **Memory:** the main-RAM window and the SDRAM profile, when present
//!
//! Boards are immutable once loaded, either from the built-in catalogue or
//! from a `.board.toml` file.

pub mod board;
pub mod builtin;
pub mod error;
pub mod generator;
pub mod parse;

pub use board::{
    Board, Capability, InputClock, MemoryWindow, Polarity, ResetInput, SdramProfile,
    SdramRate, SharedConnector,
};
pub use builtin::{builtin_boards, find_builtin};
pub use error::{BoardError, Result};
pub use generator::{ClockGenerator, GeneratorFamily, GeneratorLimits};
