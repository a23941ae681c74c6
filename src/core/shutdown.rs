//! Operator shutdown signal
//!
//! A [`ShutdownTrigger`] / [`ShutdownSignal`] pair built on a
//! `crossbeam-channel` whose sender is never used to send: firing the trigger
//! drops the sender, which disconnects the channel and wakes every clone of
//! the signal at once. Blocking waits (ramp delays, holds, pauses, the stdin
//! reader) select on that receiver so a Ctrl-C ends whatever the control
//! thread is blocked on.
//!
//! Dropping the trigger without calling [`ShutdownTrigger::fire`] has the same
//! effect as firing it.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender};
use motor_ramp_core::traits::{Delay, Interrupted};

/// Firing side of the shutdown signal.
#[derive(Debug)]
pub struct ShutdownTrigger {
    _tx: Sender<()>,
    requested: Arc<AtomicBool>,
}

impl ShutdownTrigger {
    /// Request shutdown and wake every waiter.
    pub fn fire(self) {
        self.requested.store(true, Ordering::SeqCst);
        // Dropping self drops the sender and disconnects the channel
    }
}

/// Observing side of the shutdown signal. Cheap to clone.
#[derive(Debug, Clone)]
pub struct ShutdownSignal {
    rx: Receiver<()>,
    requested: Arc<AtomicBool>,
}

impl ShutdownSignal {
    /// True once shutdown has been requested.
    pub fn is_requested(&self) -> bool {
        self.requested.load(Ordering::SeqCst)
    }

    /// Receiver that becomes ready (disconnected) on shutdown.
    ///
    /// Use it in `crossbeam_channel::select!` alongside other channels.
    pub fn receiver(&self) -> &Receiver<()> {
        &self.rx
    }

    /// Sleep for `duration` unless shutdown is requested first.
    pub fn sleep(&self, duration: Duration) -> Result<(), Interrupted> {
        if self.is_requested() {
            return Err(Interrupted);
        }
        match self.rx.recv_timeout(duration) {
            Err(RecvTimeoutError::Timeout) => Ok(()),
            Ok(()) | Err(RecvTimeoutError::Disconnected) => Err(Interrupted),
        }
    }
}

impl Delay for ShutdownSignal {
    fn delay(&mut self, duration: Duration) -> Result<(), Interrupted> {
        self.sleep(duration)
    }
}

/// Create a connected trigger/signal pair.
pub fn channel() -> (ShutdownTrigger, ShutdownSignal) {
    let (tx, rx) = crossbeam_channel::bounded(0);
    let requested = Arc::new(AtomicBool::new(false));
    (
        ShutdownTrigger {
            _tx: tx,
            requested: requested.clone(),
        },
        ShutdownSignal { rx, requested },
    )
}

/// Route Ctrl-C and termination requests (SIGINT, SIGTERM, SIGHUP) to a
/// fresh shutdown signal.
///
/// The first signal fires the trigger. Later signals are only logged, since
/// cleanup is already under way on the control thread.
///
/// # Errors
///
/// Returns an error if a handler is already installed for this process.
pub fn install_ctrlc_handler() -> Result<ShutdownSignal, ctrlc::Error> {
    let (trigger, signal) = channel();
    let mut trigger = Some(trigger);

    ctrlc::set_handler(move || match trigger.take() {
        Some(trigger) => {
            crate::log_info!("Interrupt received, stopping motor");
            trigger.fire();
        }
        None => crate::log_warn!("Shutdown already in progress"),
    })?;

    Ok(signal)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use std::time::Instant;

    #[test]
    fn test_sleep_completes_without_trigger() {
        let (_trigger, signal) = channel();
        let started = Instant::now();

        assert!(signal.sleep(Duration::from_millis(20)).is_ok());
        assert!(started.elapsed() >= Duration::from_millis(20));
        assert!(!signal.is_requested());
    }

    #[test]
    fn test_fire_interrupts_sleep() {
        let (trigger, signal) = channel();
        let waiter = signal.clone();

        let handle = thread::spawn(move || waiter.sleep(Duration::from_secs(30)));
        thread::sleep(Duration::from_millis(20));
        trigger.fire();

        assert_eq!(handle.join().unwrap(), Err(Interrupted));
        assert!(signal.is_requested());
    }

    #[test]
    fn test_sleep_after_fire_returns_immediately() {
        let (trigger, mut signal) = channel();
        trigger.fire();

        let started = Instant::now();
        assert_eq!(signal.delay(Duration::from_secs(30)), Err(Interrupted));
        assert!(started.elapsed() < Duration::from_secs(1));
    }

    #[test]
    fn test_receiver_ready_after_fire() {
        let (trigger, signal) = channel();
        assert_eq!(
            signal.receiver().try_recv(),
            Err(crossbeam_channel::TryRecvError::Empty)
        );

        trigger.fire();
        assert_eq!(
            signal.receiver().try_recv(),
            Err(crossbeam_channel::TryRecvError::Disconnected)
        );
    }
}
