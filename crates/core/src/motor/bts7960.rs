//! BTS7960 H-bridge motor driver
//!
//! The BTS7960 (IBT-2 module) is a dual half-bridge driven by two PWM inputs
//! and two enable inputs.
//!
//! ## Control Table
//!
//! | L_EN | R_EN | LPWM | RPWM | Motor State                      |
//! |------|------|------|------|----------------------------------|
//! | 0    | 0    | x    | x    | Disabled (outputs high-Z)        |
//! | 1    | 1    | 0    | 0    | Stopped                          |
//! | 1    | 1    | PWM  | 0    | Forward (speed = LPWM duty)      |
//! | 1    | 1    | 0    | PWM  | Reverse (speed = RPWM duty)      |
//!
//! LPWM and RPWM must never be driven at the same time; every operation that
//! drives one channel zeroes the other first.

use crate::ramp::{Ramp, RampError, RampObserver, RampReport};
use crate::traits::Delay;

use super::{EnablePin, Motor, MotorError, PwmPin};

/// Rotation direction selected by which PWM channel is driven.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// LPWM driven, RPWM held at 0%
    Forward,
    /// RPWM driven, LPWM held at 0%
    Reverse,
}

/// BTS7960 H-bridge motor driver
///
/// # Type Parameters
///
/// * `P` - PWM output type for LPWM/RPWM
/// * `E` - Digital output type for L_EN/R_EN
pub struct Bts7960<P, E>
where
    P: PwmPin,
    E: EnablePin,
{
    lpwm: P,
    rpwm: P,
    l_en: E,
    r_en: E,
}

impl<P, E> Bts7960<P, E>
where
    P: PwmPin,
    E: EnablePin,
{
    /// Create a driver from initialized outputs.
    ///
    /// The outputs are used as-is; call [`enable`](Self::enable) before driving
    /// the motor if the enable lines start low.
    pub fn new(lpwm: P, rpwm: P, l_en: E, r_en: E) -> Self {
        Self {
            lpwm,
            rpwm,
            l_en,
            r_en,
        }
    }

    /// Drive both enable lines high.
    pub fn enable(&mut self) -> Result<(), MotorError> {
        self.l_en.set_level(true)?;
        self.r_en.set_level(true)?;
        Ok(())
    }

    /// Drive both enable lines low.
    pub fn disable(&mut self) -> Result<(), MotorError> {
        self.l_en.set_level(false)?;
        self.r_en.set_level(false)?;
        Ok(())
    }

    /// Zero the opposite channel, then ramp the channel for `direction`.
    ///
    /// # Errors
    ///
    /// See [`Ramp::run`].
    pub fn ramp<D, O>(
        &mut self,
        direction: Direction,
        ramp: &Ramp,
        delay: &mut D,
        observer: &mut O,
    ) -> Result<RampReport, RampError>
    where
        D: Delay + ?Sized,
        O: RampObserver + ?Sized,
    {
        let (driven, idle) = match direction {
            Direction::Forward => (&mut self.lpwm, &mut self.rpwm),
            Direction::Reverse => (&mut self.rpwm, &mut self.lpwm),
        };
        idle.set_duty(0.0)?;
        ramp.run(driven, delay, observer)
    }

    /// Zero both PWM channels, drop both enables and release every output.
    ///
    /// Every step is attempted even when an earlier one fails; the first error
    /// is returned. Safe to call more than once.
    pub fn shutdown(&mut self) -> Result<(), MotorError> {
        let results = [
            self.lpwm.set_duty(0.0),
            self.rpwm.set_duty(0.0),
            self.l_en.set_level(false),
            self.r_en.set_level(false),
            self.lpwm.release(),
            self.rpwm.release(),
            self.l_en.release(),
            self.r_en.release(),
        ];
        results.into_iter().collect()
    }

    /// LPWM (forward) output
    pub fn lpwm(&self) -> &P {
        &self.lpwm
    }

    /// RPWM (reverse) output
    pub fn rpwm(&self) -> &P {
        &self.rpwm
    }

    /// L_EN output
    pub fn l_en(&self) -> &E {
        &self.l_en
    }

    /// R_EN output
    pub fn r_en(&self) -> &E {
        &self.r_en
    }
}

impl<P, E> Motor for Bts7960<P, E>
where
    P: PwmPin,
    E: EnablePin,
{
    /// Set motor speed and direction
    ///
    /// - Forward (speed > 0): LPWM=speed, RPWM=0
    /// - Reverse (speed < 0): LPWM=0, RPWM=|speed|
    /// - Stop (speed = 0): LPWM=0, RPWM=0
    #[inline]
    fn set_speed(&mut self, speed: f32) -> Result<(), MotorError> {
        if !(-1.0..=1.0).contains(&speed) {
            return Err(MotorError::InvalidSpeed);
        }

        // Idle channel first so both are never driven together
        if speed > 0.0 {
            self.rpwm.set_duty(0.0)?;
            self.lpwm.set_duty(speed)?;
        } else if speed < 0.0 {
            self.lpwm.set_duty(0.0)?;
            self.rpwm.set_duty(speed.abs())?;
        } else {
            self.lpwm.set_duty(0.0)?;
            self.rpwm.set_duty(0.0)?;
        }
        Ok(())
    }

    #[inline]
    fn stop(&mut self) -> Result<(), MotorError> {
        self.lpwm.set_duty(0.0)?;
        self.rpwm.set_duty(0.0)?;
        Ok(())
    }
}
