//! Simulated outputs
//!
//! `SimulatedBoard` hands out PWM and digital outputs that behave like the real
//! ones from the driver's point of view but produce no signal. Their state is
//! shared with the board, so it can still be inspected after the outputs have
//! been moved into a driver.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use motor_ramp_core::motor::{EnablePin, MotorError, PwmPin};

use super::error::{PlatformError, Result};

/// Highest BCM GPIO number on the 40-pin header.
const MAX_GPIO: u8 = 27;

#[derive(Debug, Default)]
struct PwmState {
    duty_cycle: f32,
    frequency_hz: f64,
    writes: u64,
    released: bool,
    history: Vec<f32>,
}

#[derive(Debug, Default)]
struct PinState {
    high: bool,
    released: bool,
}

#[derive(Debug, Default)]
struct BoardState {
    pwms: BTreeMap<u8, PwmState>,
    outputs: BTreeMap<u8, PinState>,
    record_history: bool,
}

impl BoardState {
    fn claim(&self, pin: u8) -> Result<()> {
        if pin > MAX_GPIO {
            return Err(PlatformError::InvalidPin(pin));
        }
        if self.pwms.contains_key(&pin) || self.outputs.contains_key(&pin) {
            return Err(PlatformError::PinInUse(pin));
        }
        Ok(())
    }
}

/// Lock the shared state, recovering it if a holder panicked.
///
/// Outputs must stay usable after a panic so cleanup can still run.
fn lock(state: &Mutex<BoardState>) -> MutexGuard<'_, BoardState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Simulated GPIO board.
///
/// Clones share the same state.
#[derive(Debug, Clone, Default)]
pub struct SimulatedBoard {
    state: Arc<Mutex<BoardState>>,
}

impl SimulatedBoard {
    /// Create a board that tracks current output state only.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a board that also keeps every duty cycle written to each PWM.
    pub fn with_history() -> Self {
        let board = Self::default();
        board.lock().record_history = true;
        board
    }

    fn lock(&self) -> MutexGuard<'_, BoardState> {
        lock(&self.state)
    }

    /// Create a simulated PWM output at 0% duty.
    pub fn create_pwm(&self, pin: u8, frequency_hz: f64) -> Result<SimPwm> {
        let mut state = self.lock();
        state.claim(pin)?;
        state.pwms.insert(
            pin,
            PwmState {
                frequency_hz,
                ..PwmState::default()
            },
        );
        Ok(SimPwm {
            pin,
            state: self.state.clone(),
        })
    }

    /// Create a simulated digital output at the given level.
    pub fn create_output(&self, pin: u8, high: bool) -> Result<SimPin> {
        let mut state = self.lock();
        state.claim(pin)?;
        state.outputs.insert(
            pin,
            PinState {
                high,
                ..PinState::default()
            },
        );
        Ok(SimPin {
            pin,
            state: self.state.clone(),
        })
    }

    /// Current duty cycle of a PWM output.
    pub fn duty_cycle(&self, pin: u8) -> Option<f32> {
        self.lock().pwms.get(&pin).map(|p| p.duty_cycle)
    }

    /// Configured frequency of a PWM output.
    pub fn frequency_hz(&self, pin: u8) -> Option<f64> {
        self.lock().pwms.get(&pin).map(|p| p.frequency_hz)
    }

    /// Number of duty-cycle writes to a PWM output.
    pub fn pwm_writes(&self, pin: u8) -> Option<u64> {
        self.lock().pwms.get(&pin).map(|p| p.writes)
    }

    /// Every duty cycle written to a PWM output (empty unless created
    /// [`with_history`](Self::with_history)).
    pub fn history(&self, pin: u8) -> Vec<f32> {
        self.lock()
            .pwms
            .get(&pin)
            .map(|p| p.history.clone())
            .unwrap_or_default()
    }

    /// Current level of a digital output.
    pub fn is_high(&self, pin: u8) -> Option<bool> {
        self.lock().outputs.get(&pin).map(|p| p.high)
    }

    /// Whether the output on `pin` (PWM or digital) has been released.
    pub fn is_released(&self, pin: u8) -> Option<bool> {
        let state = self.lock();
        state
            .pwms
            .get(&pin)
            .map(|p| p.released)
            .or_else(|| state.outputs.get(&pin).map(|p| p.released))
    }
}

/// Simulated PWM output.
#[derive(Debug)]
pub struct SimPwm {
    pin: u8,
    state: Arc<Mutex<BoardState>>,
}

impl SimPwm {
    /// BCM pin number
    pub fn pin(&self) -> u8 {
        self.pin
    }
}

impl PwmPin for SimPwm {
    fn set_duty(&mut self, duty: f32) -> std::result::Result<(), MotorError> {
        let duty = duty.clamp(0.0, 1.0);
        let mut state = lock(&self.state);
        let record = state.record_history;
        let pwm = state
            .pwms
            .get_mut(&self.pin)
            .ok_or(MotorError::HardwareFault)?;

        pwm.duty_cycle = duty;
        pwm.writes += 1;
        if record {
            pwm.history.push(duty);
        }
        crate::log_trace!("[sim] GPIO{} duty {:.2}", self.pin, duty);
        Ok(())
    }

    fn release(&mut self) -> std::result::Result<(), MotorError> {
        let mut state = lock(&self.state);
        let pwm = state
            .pwms
            .get_mut(&self.pin)
            .ok_or(MotorError::HardwareFault)?;

        pwm.duty_cycle = 0.0;
        pwm.released = true;
        crate::log_trace!("[sim] GPIO{} released", self.pin);
        Ok(())
    }
}

/// Simulated digital output.
#[derive(Debug)]
pub struct SimPin {
    pin: u8,
    state: Arc<Mutex<BoardState>>,
}

impl SimPin {
    /// BCM pin number
    pub fn pin(&self) -> u8 {
        self.pin
    }
}

impl EnablePin for SimPin {
    fn set_level(&mut self, high: bool) -> std::result::Result<(), MotorError> {
        let mut state = lock(&self.state);
        let out = state
            .outputs
            .get_mut(&self.pin)
            .ok_or(MotorError::HardwareFault)?;

        out.high = high;
        crate::log_trace!("[sim] GPIO{} {}", self.pin, if high { "high" } else { "low" });
        Ok(())
    }

    fn release(&mut self) -> std::result::Result<(), MotorError> {
        let mut state = lock(&self.state);
        let out = state
            .outputs
            .get_mut(&self.pin)
            .ok_or(MotorError::HardwareFault)?;

        out.high = false;
        out.released = true;
        crate::log_trace!("[sim] GPIO{} released", self.pin);
        Ok(())
    }
}
