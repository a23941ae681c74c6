//! Interactive motor menu
//!
//! ```text
//! 1 - Forward        RPWM off, ramp LPWM start -> end in ramp_s
//! 2 - Reverse        LPWM off, ramp RPWM start -> end in ramp_s
//! 3 - Stop           both PWM off
//! 4 - Fast forward   RPWM off, ramp LPWM start -> end in fast_ramp_s
//! Q - Quit
//! ```
//!
//! Selections are trimmed and case-insensitive. Invalid input is reported and
//! followed by a short pause; after every completed action the operator
//! presses ENTER to get back to the menu. End of input counts as Quit.

use std::io::{self, Write};
use std::ops::ControlFlow;

use motor_ramp_core::motor::{Bts7960, Direction, EnablePin, Motor, PwmPin};
use motor_ramp_core::ramp::{Ramp, RampObserver, RampReport, RampStep};
use motor_ramp_core::traits::Delay;

use super::input::LineSource;
use super::{ramp_flow, seconds, AppError, Outcome};
use crate::config::MenuConfig;

const RULE: &str = "=======================================";
const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

/// A menu selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    Forward,
    Reverse,
    Stop,
    FastForward,
    Quit,
}

impl MenuAction {
    /// Parse an operator selection, or `None` if it is not a menu entry.
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_ascii_uppercase().as_str() {
            "1" => Some(MenuAction::Forward),
            "2" => Some(MenuAction::Reverse),
            "3" => Some(MenuAction::Stop),
            "4" => Some(MenuAction::FastForward),
            "Q" => Some(MenuAction::Quit),
            _ => None,
        }
    }
}

/// Prints ramp progress to the terminal, updating the duty line in place.
///
/// Observer callbacks cannot fail, so the first write error is kept and
/// returned by [`finish`](Self::finish).
struct ProgressPrinter<'w, W: Write> {
    out: &'w mut W,
    error: Option<io::Error>,
}

impl<'w, W: Write> ProgressPrinter<'w, W> {
    fn new(out: &'w mut W) -> Self {
        Self { out, error: None }
    }

    fn emit(&mut self, f: impl FnOnce(&mut W) -> io::Result<()>) {
        if self.error.is_none() {
            if let Err(e) = f(&mut *self.out).and_then(|()| self.out.flush()) {
                self.error = Some(e);
            }
        }
    }

    fn finish(self) -> io::Result<()> {
        self.error.map_or(Ok(()), Err)
    }
}

impl<W: Write> RampObserver for ProgressPrinter<'_, W> {
    fn on_start(&mut self, ramp: &Ramp) {
        let (start, end, secs) = (
            ramp.start_percent(),
            ramp.end_percent(),
            ramp.effective_duration_s(),
        );
        self.emit(|out| writeln!(out, "Ramping from {start}% to {end}% over {secs}s..."));
    }

    fn on_step(&mut self, step: &RampStep) {
        let percent = step.percent;
        crate::log_trace!("duty {}% ({:.2})", percent, step.duty);
        self.emit(|out| write!(out, "\rDuty cycle: {percent}%   "));
    }

    fn on_complete(&mut self, ramp: &Ramp, _report: &RampReport) {
        let end = ramp.end_percent();
        self.emit(|out| writeln!(out, "\rDuty cycle: {end}% - ramp complete.          "));
    }
}

/// Interactive menu over a line source and a terminal.
pub struct Menu<'a, L, W> {
    cfg: &'a MenuConfig,
    input: L,
    out: W,
}

impl<'a, L, W> Menu<'a, L, W>
where
    L: LineSource,
    W: Write,
{
    pub fn new(cfg: &'a MenuConfig, input: L, out: W) -> Self {
        Self { cfg, input, out }
    }

    /// Show the menu and perform selections until Quit, end of input or
    /// interruption.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Motor` if an output write fails, or `AppError::Io`
    /// if the terminal cannot be written.
    pub fn run<P, E, D>(&mut self, motor: &mut Bts7960<P, E>, delay: &mut D) -> Result<Outcome, AppError>
    where
        P: PwmPin,
        E: EnablePin,
        D: Delay + ?Sized,
    {
        loop {
            self.draw()?;

            let Some(choice) = (match self.input.read_line() {
                Ok(line) => line,
                Err(_) => return Ok(Outcome::Interrupted),
            }) else {
                writeln!(self.out)?;
                crate::log_info!("Input closed, leaving menu");
                return Ok(Outcome::InputClosed);
            };

            writeln!(self.out, "\nProcessing...")?;
            let Some(action) = MenuAction::parse(&choice) else {
                writeln!(self.out, "Invalid option '{}'. Try again.", choice.trim())?;
                self.out.flush()?;
                crate::log_debug!("Invalid menu selection {:?}", choice);
                if delay.delay(seconds(self.cfg.invalid_pause_s)).is_err() {
                    return Ok(Outcome::Interrupted);
                }
                continue;
            };

            crate::log_debug!("Menu selection {:?}", action);
            if let ControlFlow::Break(outcome) = self.perform(action, motor, delay)? {
                return Ok(outcome);
            }

            write!(self.out, "\nAction complete. Press ENTER to return to the menu...")?;
            self.out.flush()?;
            match self.input.read_line() {
                Ok(Some(_)) => {}
                Ok(None) => {
                    writeln!(self.out)?;
                    return Ok(Outcome::InputClosed);
                }
                Err(_) => return Ok(Outcome::Interrupted),
            }
        }
    }

    fn draw(&mut self) -> io::Result<()> {
        let cfg = self.cfg;
        if cfg.clear_screen {
            write!(self.out, "{CLEAR_SCREEN}")?;
        }
        writeln!(self.out, "{RULE}")?;
        writeln!(self.out, "           DC Motor Control")?;
        writeln!(self.out, "{RULE}")?;
        writeln!(
            self.out,
            "1 - Forward (PWM {}% to {}% in {}s)",
            cfg.start_percent, cfg.end_percent, cfg.ramp_s
        )?;
        writeln!(
            self.out,
            "2 - Reverse (reversed polarity, {}% to {}% in {}s)",
            cfg.start_percent, cfg.end_percent, cfg.ramp_s
        )?;
        writeln!(self.out, "3 - Stop the motor (PWM off)")?;
        writeln!(
            self.out,
            "4 - Fast forward (PWM {}% to {}% in {}s)",
            cfg.start_percent, cfg.end_percent, cfg.fast_ramp_s
        )?;
        writeln!(self.out, "Q - Quit and release GPIO")?;
        writeln!(self.out, "{RULE}")?;
        write!(self.out, "Select an option and press ENTER: ")?;
        self.out.flush()
    }

    fn perform<P, E, D>(
        &mut self,
        action: MenuAction,
        motor: &mut Bts7960<P, E>,
        delay: &mut D,
    ) -> Result<ControlFlow<Outcome>, AppError>
    where
        P: PwmPin,
        E: EnablePin,
        D: Delay + ?Sized,
    {
        let cfg = self.cfg;
        match action {
            MenuAction::Forward => {
                writeln!(self.out, "--- Forward ---")?;
                self.ramp(motor, delay, Direction::Forward, cfg.ramp_s)
            }
            MenuAction::Reverse => {
                writeln!(self.out, "--- Reverse ---")?;
                self.ramp(motor, delay, Direction::Reverse, cfg.ramp_s)
            }
            MenuAction::FastForward => {
                writeln!(self.out, "--- Fast forward ---")?;
                self.ramp(motor, delay, Direction::Forward, cfg.fast_ramp_s)
            }
            MenuAction::Stop => {
                writeln!(self.out, "Stopping motor...")?;
                motor.stop()?;
                writeln!(self.out, "Motor stopped.")?;
                crate::log_info!("Motor stopped by operator");
                Ok(ControlFlow::Continue(()))
            }
            MenuAction::Quit => {
                writeln!(self.out, "Exiting.")?;
                Ok(ControlFlow::Break(Outcome::Quit))
            }
        }
    }

    fn ramp<P, E, D>(
        &mut self,
        motor: &mut Bts7960<P, E>,
        delay: &mut D,
        direction: Direction,
        duration_s: f64,
    ) -> Result<ControlFlow<Outcome>, AppError>
    where
        P: PwmPin,
        E: EnablePin,
        D: Delay + ?Sized,
    {
        let ramp = Ramp::new(self.cfg.start_percent, self.cfg.end_percent, duration_s)
            .with_zero_step(self.cfg.zero_step.into());
        crate::log_info!(
            "{:?} ramp {}% -> {}% over {}s",
            direction,
            ramp.start_percent(),
            ramp.end_percent(),
            ramp.effective_duration_s()
        );

        let mut printer = ProgressPrinter::new(&mut self.out);
        let result = motor.ramp(direction, &ramp, delay, &mut printer);
        printer.finish()?;

        Ok(match ramp_flow(result)? {
            ControlFlow::Continue(_) => ControlFlow::Continue(()),
            ControlFlow::Break(outcome) => {
                writeln!(self.out)?;
                ControlFlow::Break(outcome)
            }
        })
    }
}
