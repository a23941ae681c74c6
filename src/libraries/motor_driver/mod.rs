//! Motor driver session
//!
//! The driver types themselves live in `motor_ramp_core::motor`; this module
//! owns one for the lifetime of a program run and guarantees that its outputs
//! are zeroed, disabled and released on every exit path.
//!
//! ## Example
//!
//! ```no_run
//! use motor_ramp::libraries::MotorSession;
//! use motor_ramp::platform;
//! use motor_ramp::config::AppConfig;
//!
//! let cfg = AppConfig::default();
//! let board = platform::connect(&cfg.pins, &cfg.pwm, true)?;
//! let (_mode, driver) = board.into_driver();
//! let mut session = MotorSession::new(driver);
//!
//! session.enable()?;
//! // ... drive the motor through `session` ...
//! session.finish()?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod session;

pub use session::MotorSession;
