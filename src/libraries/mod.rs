//! Shared libraries
//!
//! - `motor_driver`: scoped ownership of the BTS7960 driver with guaranteed
//!   release of its outputs

pub mod motor_driver;

pub use motor_driver::MotorSession;
