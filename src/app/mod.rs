//! Operator programs
//!
//! - `cycle`: unattended accelerate / hold / decelerate / rest loop
//! - `menu`: interactive forward / reverse / stop / fast-forward menu
//! - `input`: line sources for the menu (stdin, scripted)
//!
//! Both programs borrow the driver and a [`Delay`] and return an [`Outcome`].
//! An operator interruption is an outcome, not an error.
//!
//! [`Delay`]: motor_ramp_core::traits::Delay

use std::io;
use std::ops::ControlFlow;
use std::time::Duration;

use motor_ramp_core::motor::MotorError;
use motor_ramp_core::ramp::{RampError, RampReport};

pub mod cycle;
pub mod input;
pub mod menu;

pub use cycle::run_cycle;
pub use input::{LineSource, ScriptedLines, StdinLines};
pub use menu::{Menu, MenuAction};

/// How an operator program ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Ran the requested number of cycles
    Completed,
    /// Operator chose Quit
    Quit,
    /// Input stream ended
    InputClosed,
    /// Shutdown requested (Ctrl-C)
    Interrupted,
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Outcome::Completed => write!(f, "completed"),
            Outcome::Quit => write!(f, "quit by operator"),
            Outcome::InputClosed => write!(f, "input closed"),
            Outcome::Interrupted => write!(f, "interrupted"),
        }
    }
}

/// Operator program failures
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("motor output failed: {0}")]
    Motor(#[from] MotorError),

    #[error("terminal I/O failed: {0}")]
    Io(#[from] io::Error),
}

/// Continue with the report of a finished ramp, or stop with `Interrupted`.
///
/// Output failures are errors.
fn ramp_flow(result: Result<RampReport, RampError>) -> Result<ControlFlow<Outcome, RampReport>, AppError> {
    match result {
        Ok(report) => Ok(ControlFlow::Continue(report)),
        Err(RampError::Interrupted) => Ok(ControlFlow::Break(Outcome::Interrupted)),
        Err(RampError::Motor(e)) => Err(AppError::Motor(e)),
    }
}

/// Seconds from configuration as a `Duration`.
///
/// Negative and NaN values become zero; values too large to represent
/// saturate at `Duration::MAX`.
fn seconds(s: f64) -> Duration {
    if s.is_nan() || s.is_sign_negative() {
        return Duration::ZERO;
    }
    Duration::try_from_secs_f64(s).unwrap_or(Duration::MAX)
}
