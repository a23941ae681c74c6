//! Motor driver abstraction
//!
//! This module provides a zero-cost abstraction for driving a DC motor through
//! an H-bridge, with forward/reverse ramps, direct speed control and stop.
//!
//! # Features
//!
//! - `PwmPin` / `EnablePin` capabilities implemented by real or simulated outputs
//! - Platform-independent `Motor` trait for generic motor control
//! - BTS7960 H-bridge driver (two PWM inputs, two enable inputs)
//!
//! # Design
//!
//! This module is pure `no_std` with no feature gates. Platform-specific
//! output implementations belong in the application crate.

pub mod bts7960;

pub use bts7960::{Bts7960, Direction};

use core::fmt;

/// Motor control error types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotorError {
    /// Speed value outside [-1.0, +1.0] range
    InvalidSpeed,
    /// Output line unavailable or a write to it failed
    HardwareFault,
}

impl fmt::Display for MotorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MotorError::InvalidSpeed => write!(f, "speed outside [-1.0, 1.0]"),
            MotorError::HardwareFault => write!(f, "motor output hardware fault"),
        }
    }
}

impl core::error::Error for MotorError {}

/// PWM pin abstraction for motor control
///
/// This trait defines the interface for controlling a single PWM output pin.
/// Platform-specific implementations wrap their HAL's PWM types.
pub trait PwmPin {
    /// Set PWM duty cycle as a fraction [0.0, 1.0]
    ///
    /// # Arguments
    ///
    /// * `duty` - Duty cycle as fraction (0.0 = 0%, 1.0 = 100%)
    ///
    /// # Errors
    ///
    /// Returns `MotorError::HardwareFault` if PWM hardware fails.
    fn set_duty(&mut self, duty: f32) -> Result<(), MotorError>;

    /// Drive the output to 0% and give up the line.
    ///
    /// Called once during shutdown. The default only zeroes the duty cycle.
    ///
    /// # Errors
    ///
    /// Returns `MotorError::HardwareFault` if PWM hardware fails.
    fn release(&mut self) -> Result<(), MotorError> {
        self.set_duty(0.0)
    }
}

/// Digital enable line abstraction
pub trait EnablePin {
    /// Drive the line high (`true`) or low (`false`).
    ///
    /// # Errors
    ///
    /// Returns `MotorError::HardwareFault` if the GPIO write fails.
    fn set_level(&mut self, high: bool) -> Result<(), MotorError>;

    /// Drive the line low and give up the line.
    ///
    /// # Errors
    ///
    /// Returns `MotorError::HardwareFault` if the GPIO write fails.
    fn release(&mut self) -> Result<(), MotorError> {
        self.set_level(false)
    }
}

/// Motor control trait (platform-independent)
///
/// Speed values are normalized to [-1.0, +1.0]:
/// - `+1.0` = full forward
/// - `0.0` = stopped
/// - `-1.0` = full reverse
pub trait Motor {
    /// Set motor speed and direction
    ///
    /// # Arguments
    ///
    /// * `speed` - Motor speed in range [-1.0, +1.0]
    ///   - Positive values: forward motion
    ///   - Negative values: reverse motion
    ///   - Zero: stop
    ///
    /// # Errors
    ///
    /// Returns `MotorError::InvalidSpeed` if speed is outside [-1.0, +1.0] range.
    /// Returns `MotorError::HardwareFault` if PWM hardware fails.
    fn set_speed(&mut self, speed: f32) -> Result<(), MotorError>;

    /// Stop motor (both PWM inputs at 0%)
    ///
    /// # Errors
    ///
    /// Returns `MotorError::HardwareFault` if PWM hardware fails.
    fn stop(&mut self) -> Result<(), MotorError>;
}
