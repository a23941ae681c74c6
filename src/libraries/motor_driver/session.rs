//! Scoped motor ownership

use std::ops::{Deref, DerefMut};

use motor_ramp_core::motor::{Bts7960, EnablePin, MotorError, PwmPin};

/// Owns a [`Bts7960`] driver and shuts it down when the session ends.
///
/// Call [`finish`](Self::finish) on the normal exit path to observe the
/// cleanup result. If the session is dropped without it (early `?` return,
/// panic unwind), `Drop` runs the same shutdown and logs any failure.
///
/// The driver is reachable through `Deref`/`DerefMut`.
pub struct MotorSession<P, E>
where
    P: PwmPin,
    E: EnablePin,
{
    driver: Bts7960<P, E>,
    finished: bool,
}

impl<P, E> MotorSession<P, E>
where
    P: PwmPin,
    E: EnablePin,
{
    pub fn new(driver: Bts7960<P, E>) -> Self {
        Self {
            driver,
            finished: false,
        }
    }

    /// Shut the driver down and end the session.
    ///
    /// # Errors
    ///
    /// Returns the first `MotorError` raised while zeroing, disabling or
    /// releasing the outputs. Every step is attempted regardless.
    pub fn finish(mut self) -> Result<(), MotorError> {
        self.finished = true;
        self.cleanup()
    }

    fn cleanup(&mut self) -> Result<(), MotorError> {
        crate::log_info!("Cleaning up GPIO");
        let result = self.driver.shutdown();
        match result {
            Ok(()) => crate::log_info!("Motor stopped, outputs released"),
            Err(e) => crate::log_error!("Cleanup incomplete: {}", e),
        }
        result
    }
}

impl<P, E> Deref for MotorSession<P, E>
where
    P: PwmPin,
    E: EnablePin,
{
    type Target = Bts7960<P, E>;

    fn deref(&self) -> &Self::Target {
        &self.driver
    }
}

impl<P, E> DerefMut for MotorSession<P, E>
where
    P: PwmPin,
    E: EnablePin,
{
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.driver
    }
}

impl<P, E> Drop for MotorSession<P, E>
where
    P: PwmPin,
    E: EnablePin,
{
    fn drop(&mut self) {
        if !self.finished {
            // Errors were already logged
            let _ = self.cleanup();
        }
    }
}
