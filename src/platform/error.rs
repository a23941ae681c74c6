//! Platform error types
//!
//! This module defines error types for output setup. Errors raised while
//! driving an already-created output are reported as
//! `motor_ramp_core::MotorError` instead.

/// Result type for platform operations
pub type Result<T> = std::result::Result<T, PlatformError>;

/// Platform-level errors
#[derive(Debug, thiserror::Error)]
pub enum PlatformError {
    /// GPIO peripheral access failed (no /dev/gpiomem, missing permissions, not a Pi)
    #[cfg(feature = "rpi")]
    #[error("GPIO error: {0}")]
    Gpio(#[from] rppal::gpio::Error),

    /// Pin number outside the BCM range of the board
    #[error("GPIO pin {0} out of range")]
    InvalidPin(u8),

    /// Pin requested twice
    #[error("GPIO pin {0} already in use")]
    PinInUse(u8),

    /// Built without real GPIO support
    #[error("real GPIO support not compiled in (build with the `rpi` feature)")]
    Unsupported,
}
