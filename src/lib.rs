//! motor_ramp - BTS7960 DC motor ramp programs for Raspberry Pi
//!
//! This library provides the platform layer (real GPIO through rppal, or a
//! simulated board), the motor session that guarantees cleanup, and the two
//! operator programs built on the ramp logic in `motor_ramp_core`.

// Logging macros and shutdown signal
pub mod core;

// Real and simulated outputs, board selection
pub mod platform;

// Motor session (scoped acquisition)
pub mod libraries;

// Cycle and menu programs
pub mod app;

pub mod cli;
pub mod config;

pub use motor_ramp_core::{Direction, Motor, MotorError, Ramp, RampError, ZeroStepPolicy};
