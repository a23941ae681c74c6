//! Raspberry Pi outputs (rppal)
//!
//! PWM channels use rppal's software PWM on ordinary output pins, so any BCM
//! pin can carry LPWM/RPWM. Enable lines are plain push-pull outputs.
//!
//! rppal resets each pin to its original mode when the `OutputPin` is dropped.

use motor_ramp_core::motor::{EnablePin, MotorError, PwmPin};
use rppal::gpio::{Gpio, OutputPin};

use super::error::Result;
use crate::config::{PinConfig, PwmSettings};

/// Software PWM on a Raspberry Pi GPIO pin.
#[derive(Debug)]
pub struct RpiPwm {
    pin: OutputPin,
    frequency_hz: f64,
}

impl RpiPwm {
    fn new(gpio: &Gpio, pin: u8, frequency_hz: f64) -> Result<Self> {
        let pin = gpio.get(pin)?.into_output_low();
        Ok(Self { pin, frequency_hz })
    }
}

impl PwmPin for RpiPwm {
    fn set_duty(&mut self, duty: f32) -> std::result::Result<(), MotorError> {
        let duty = f64::from(duty.clamp(0.0, 1.0));
        let result = if duty <= 0.0 {
            // Stop the PWM thread entirely rather than running it at 0%
            self.pin.clear_pwm().map(|()| self.pin.set_low())
        } else {
            self.pin.set_pwm_frequency(self.frequency_hz, duty)
        };

        result.map_err(|e| {
            crate::log_error!("GPIO{} PWM write failed: {}", self.pin.pin(), e);
            MotorError::HardwareFault
        })
    }

    fn release(&mut self) -> std::result::Result<(), MotorError> {
        let result = self.pin.clear_pwm();
        self.pin.set_low();
        result.map_err(|e| {
            crate::log_error!("GPIO{} PWM release failed: {}", self.pin.pin(), e);
            MotorError::HardwareFault
        })
    }
}

/// Digital output on a Raspberry Pi GPIO pin.
#[derive(Debug)]
pub struct RpiPin {
    pin: OutputPin,
}

impl RpiPin {
    fn new(gpio: &Gpio, pin: u8, high: bool) -> Result<Self> {
        let pin = gpio.get(pin)?;
        let pin = if high {
            pin.into_output_high()
        } else {
            pin.into_output_low()
        };
        Ok(Self { pin })
    }
}

impl EnablePin for RpiPin {
    fn set_level(&mut self, high: bool) -> std::result::Result<(), MotorError> {
        if high {
            self.pin.set_high();
        } else {
            self.pin.set_low();
        }
        Ok(())
    }
}

/// The four BTS7960 outputs on real GPIO.
#[derive(Debug)]
pub struct RpiOutputs {
    pub lpwm: RpiPwm,
    pub rpwm: RpiPwm,
    pub l_en: RpiPin,
    pub r_en: RpiPin,
}

/// Open the GPIO peripheral and claim the BTS7960 pins.
///
/// PWM outputs start low; enable outputs start high.
///
/// # Errors
///
/// Returns `PlatformError::Gpio` if the GPIO peripheral cannot be opened or
/// a pin is unavailable.
pub fn open(pins: &PinConfig, pwm: &PwmSettings) -> Result<RpiOutputs> {
    let gpio = Gpio::new()?;
    Ok(RpiOutputs {
        lpwm: RpiPwm::new(&gpio, pins.lpwm, pwm.frequency_hz)?,
        rpwm: RpiPwm::new(&gpio, pins.rpwm, pwm.frequency_hz)?,
        l_en: RpiPin::new(&gpio, pins.l_en, true)?,
        r_en: RpiPin::new(&gpio, pins.r_en, true)?,
    })
}
