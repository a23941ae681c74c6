//! Platform abstraction layer
//!
//! This module provides the outputs the BTS7960 driver runs on: real Raspberry
//! Pi GPIO (feature `rpi`) or a simulated board with identical behaviour from
//! the driver's point of view. All platform-specific code is isolated here.

pub mod board;
pub mod error;
pub mod sim;

#[cfg(feature = "rpi")]
pub mod rpi;

// Re-export commonly used types
pub use board::{connect, Board, BoardMode, BoardPin, BoardPwm, MotorDriver};
pub use error::{PlatformError, Result};
pub use sim::{SimPin, SimPwm, SimulatedBoard};
