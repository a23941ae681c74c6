//! Core traits for platform-agnostic motor control.
//!
//! This module provides trait abstractions that decouple the ramp logic
//! from the way a platform blocks between steps.
//!
//! # Design
//!
//! - Trait definitions are pure and have no feature gates
//! - Mock implementations are always available for host testing
//! - Blocking implementations (thread sleep, signal-aware waits) live in the
//!   application crate

pub mod delay;

pub use delay::{Delay, Interrupted, MockDelay};
