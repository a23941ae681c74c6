//! motor_ramp_core - Pure no_std motor ramp logic
//!
//! This crate contains the platform-agnostic parts of the motor ramp demos:
//! the duty-cycle ramp algorithm and the BTS7960 H-bridge driver. It can be
//! tested on host without any hardware.
//!
//! # Design Principles
//!
//! - **Zero cfg**: No `#[cfg(feature = ...)]` directives
//! - **Pure no_std**: No std library dependencies outside of tests
//! - **Trait abstractions**: Outputs and sleeping are injected via traits
//!
//! # Modules
//!
//! - [`traits`]: Platform-agnostic trait abstractions (Delay)
//! - [`motor`]: PWM/enable capabilities, `Motor` trait and the BTS7960 driver
//! - [`ramp`]: Linear duty-cycle ramp in whole-percent steps

#![cfg_attr(not(test), no_std)]

pub mod motor;
pub mod ramp;
pub mod traits;

pub use motor::{Bts7960, Direction, EnablePin, Motor, MotorError, PwmPin};
pub use ramp::{
    NoopObserver, Ramp, RampError, RampObserver, RampReport, RampStep, ZeroStepPolicy,
};
pub use traits::{Delay, Interrupted, MockDelay};
