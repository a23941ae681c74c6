//! Board selection
//!
//! Chooses once, at startup, between real GPIO and the simulated board, and
//! exposes the result through a single pair of output types so the rest of
//! the program runs unmodified in either mode.

use std::fmt;

use motor_ramp_core::motor::{Bts7960, EnablePin, MotorError, PwmPin};

#[cfg(feature = "rpi")]
use super::rpi::{RpiPin, RpiPwm};
use super::error::Result;
use super::sim::{SimPin, SimPwm, SimulatedBoard};
use crate::config::{PinConfig, PwmSettings};

/// Which kind of outputs the program is driving.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardMode {
    /// Real GPIO, physical signals produced
    Hardware,
    /// Inert stand-ins, no physical signal
    Simulated,
}

impl fmt::Display for BoardMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoardMode::Hardware => write!(f, "hardware"),
            BoardMode::Simulated => write!(f, "simulated"),
        }
    }
}

/// PWM output on whichever board was selected.
#[derive(Debug)]
pub enum BoardPwm {
    #[cfg(feature = "rpi")]
    Hardware(RpiPwm),
    Simulated(SimPwm),
}

impl PwmPin for BoardPwm {
    fn set_duty(&mut self, duty: f32) -> std::result::Result<(), MotorError> {
        match self {
            #[cfg(feature = "rpi")]
            BoardPwm::Hardware(pwm) => pwm.set_duty(duty),
            BoardPwm::Simulated(pwm) => pwm.set_duty(duty),
        }
    }

    fn release(&mut self) -> std::result::Result<(), MotorError> {
        match self {
            #[cfg(feature = "rpi")]
            BoardPwm::Hardware(pwm) => pwm.release(),
            BoardPwm::Simulated(pwm) => pwm.release(),
        }
    }
}

/// Digital output on whichever board was selected.
#[derive(Debug)]
pub enum BoardPin {
    #[cfg(feature = "rpi")]
    Hardware(RpiPin),
    Simulated(SimPin),
}

impl EnablePin for BoardPin {
    fn set_level(&mut self, high: bool) -> std::result::Result<(), MotorError> {
        match self {
            #[cfg(feature = "rpi")]
            BoardPin::Hardware(pin) => pin.set_level(high),
            BoardPin::Simulated(pin) => pin.set_level(high),
        }
    }

    fn release(&mut self) -> std::result::Result<(), MotorError> {
        match self {
            #[cfg(feature = "rpi")]
            BoardPin::Hardware(pin) => pin.release(),
            BoardPin::Simulated(pin) => pin.release(),
        }
    }
}

/// BTS7960 driver over the selected board's outputs.
pub type MotorDriver = Bts7960<BoardPwm, BoardPin>;

/// The selected board: its mode and the four BTS7960 outputs.
#[derive(Debug)]
pub struct Board {
    pub mode: BoardMode,
    pub lpwm: BoardPwm,
    pub rpwm: BoardPwm,
    pub l_en: BoardPin,
    pub r_en: BoardPin,
}

impl Board {
    /// Claim the BTS7960 pins on real GPIO.
    ///
    /// # Errors
    ///
    /// Returns `PlatformError::Gpio` on any GPIO setup failure, or
    /// `PlatformError::Unsupported` when built without the `rpi` feature.
    #[cfg(feature = "rpi")]
    pub fn hardware(pins: &PinConfig, pwm: &PwmSettings) -> Result<Self> {
        let outputs = super::rpi::open(pins, pwm)?;
        Ok(Self {
            mode: BoardMode::Hardware,
            lpwm: BoardPwm::Hardware(outputs.lpwm),
            rpwm: BoardPwm::Hardware(outputs.rpwm),
            l_en: BoardPin::Hardware(outputs.l_en),
            r_en: BoardPin::Hardware(outputs.r_en),
        })
    }

    /// Claim the BTS7960 pins on real GPIO.
    ///
    /// # Errors
    ///
    /// Always returns `PlatformError::Unsupported`: built without `rpi`.
    #[cfg(not(feature = "rpi"))]
    pub fn hardware(_pins: &PinConfig, _pwm: &PwmSettings) -> Result<Self> {
        Err(super::error::PlatformError::Unsupported)
    }

    /// Claim the BTS7960 pins on a simulated board.
    ///
    /// Enable outputs start high, matching the hardware setup.
    ///
    /// # Errors
    ///
    /// Returns `PlatformError::InvalidPin` or `PlatformError::PinInUse` if
    /// the pin configuration is invalid.
    pub fn simulated(board: &SimulatedBoard, pins: &PinConfig, pwm: &PwmSettings) -> Result<Self> {
        Ok(Self {
            mode: BoardMode::Simulated,
            lpwm: BoardPwm::Simulated(board.create_pwm(pins.lpwm, pwm.frequency_hz)?),
            rpwm: BoardPwm::Simulated(board.create_pwm(pins.rpwm, pwm.frequency_hz)?),
            l_en: BoardPin::Simulated(board.create_output(pins.l_en, true)?),
            r_en: BoardPin::Simulated(board.create_output(pins.r_en, true)?),
        })
    }

    /// Hand the outputs to a BTS7960 driver.
    pub fn into_driver(self) -> (BoardMode, MotorDriver) {
        (
            self.mode,
            Bts7960::new(self.lpwm, self.rpwm, self.l_en, self.r_en),
        )
    }
}

/// Select the board: real GPIO unless `simulate` is set, falling back to
/// the simulated board when real GPIO cannot be initialized.
///
/// # Errors
///
/// Returns `PlatformError` only when the simulated board itself rejects the
/// pin configuration.
pub fn connect(pins: &PinConfig, pwm: &PwmSettings, simulate: bool) -> Result<Board> {
    if !simulate {
        match Board::hardware(pins, pwm) {
            Ok(board) => {
                crate::log_info!(
                    "GPIO ready (LPWM={}, RPWM={}, L_EN={}, R_EN={})",
                    pins.lpwm,
                    pins.rpwm,
                    pins.l_en,
                    pins.r_en
                );
                return Ok(board);
            }
            Err(e) => {
                crate::log_warn!(
                    "Could not initialize GPIO: {}. Run on a Raspberry Pi with GPIO access.",
                    e
                );
                crate::log_warn!("Continuing in simulated mode; the motor will not move.");
            }
        }
    } else {
        crate::log_info!("Simulated mode requested");
    }

    Board::simulated(&SimulatedBoard::new(), pins, pwm)
}
