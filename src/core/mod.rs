//! Core application infrastructure
//!
//! Logging and operator shutdown handling shared by both demo programs.

pub mod logging;
pub mod shutdown;
