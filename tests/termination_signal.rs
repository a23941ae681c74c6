//! Runs in its own test binary: a process can install only one handler.
#![cfg(unix)]

use std::process::Command;
use std::time::{Duration, Instant};

use motor_ramp::core::shutdown;

#[test]
fn sigterm_interrupts_sleep() {
    let signal = shutdown::install_ctrlc_handler().unwrap();
    assert!(!signal.is_requested());

    let status = Command::new("kill")
        .args(["-TERM", &std::process::id().to_string()])
        .status()
        .unwrap();
    assert!(status.success());

    let started = Instant::now();
    assert!(signal.sleep(Duration::from_secs(30)).is_err());
    assert!(started.elapsed() < Duration::from_secs(10));
    assert!(signal.is_requested());
}
