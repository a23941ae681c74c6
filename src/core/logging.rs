//! Logging abstraction
//!
//! Provides unified logging macros used across the crate. Every macro forwards
//! to the matching `tracing` event, so the output format and filtering are
//! decided once by [`init`].
//!
//! Logs go to stderr so they never interleave with the interactive menu on
//! stdout.
//!
//! ## Levels
//!
//! - `log_info!`: phase changes operators care about (ramp started, cleanup)
//! - `log_warn!`: degraded operation (simulated fallback, second Ctrl-C)
//! - `log_error!`: failures that end the program
//! - `log_debug!`: per-action detail
//! - `log_trace!`: per-write detail (every duty-cycle change)

use tracing_subscriber::EnvFilter;

#[doc(hidden)]
pub use tracing;

/// Filter used when `RUST_LOG` is unset, by number of `-v` flags.
fn default_filter(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "info",
        1 => "debug",
        _ => "trace",
    }
}

/// Install the global `tracing` subscriber.
///
/// `RUST_LOG` takes precedence over `verbosity`. Calling this twice is
/// harmless; the second call keeps the first subscriber.
pub fn init(verbosity: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(verbosity)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Log informational message
#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {
        $crate::core::logging::tracing::info!($($arg)*)
    };
}

/// Log warning message
#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {
        $crate::core::logging::tracing::warn!($($arg)*)
    };
}

/// Log error message
#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {
        $crate::core::logging::tracing::error!($($arg)*)
    };
}

/// Log debug message
#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => {
        $crate::core::logging::tracing::debug!($($arg)*)
    };
}

/// Log trace message
#[macro_export]
macro_rules! log_trace {
    ($($arg:tt)*) => {
        $crate::core::logging::tracing::trace!($($arg)*)
    };
}
