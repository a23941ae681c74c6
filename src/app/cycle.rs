//! Unattended ramp cycle
//!
//! Each cycle drives the motor forward only:
//!
//! 1. RPWM off, ramp LPWM `start_percent -> peak_percent` over `accel_s`
//! 2. hold at `peak_percent` for `hold_s`
//! 3. ramp LPWM `peak_percent -> end_percent` over `decel_s`
//! 4. rest for `rest_s`
//!
//! and repeats until interrupted or the requested number of cycles is done.

use std::ops::ControlFlow;

use motor_ramp_core::motor::{Bts7960, Direction, EnablePin, Motor, PwmPin};
use motor_ramp_core::ramp::{percent_to_duty, Ramp, RampObserver, RampReport, RampStep};
use motor_ramp_core::traits::Delay;

use super::{ramp_flow, seconds, AppError, Outcome};
use crate::config::CycleConfig;

/// Logs ramp progress: one line per ramp at info, one per step at debug.
#[derive(Debug, Default)]
pub struct LogObserver;

impl RampObserver for LogObserver {
    fn on_start(&mut self, ramp: &Ramp) {
        crate::log_info!(
            "Ramping from {}% to {}% over {}s",
            ramp.start_percent(),
            ramp.end_percent(),
            ramp.effective_duration_s()
        );
    }

    fn on_step(&mut self, step: &RampStep) {
        crate::log_debug!("Duty cycle: {}%", step.percent);
    }

    fn on_complete(&mut self, ramp: &Ramp, report: &RampReport) {
        crate::log_info!(
            "Reached {}% ({} writes, {:.3}s)",
            ramp.end_percent(),
            report.writes,
            report.slept.as_secs_f64()
        );
    }
}

/// Run the accelerate / hold / decelerate / rest cycle.
///
/// `max_cycles` of `None` repeats until `delay` reports an interruption.
///
/// # Errors
///
/// Returns `AppError::Motor` if an output write fails.
pub fn run_cycle<P, E, D>(
    motor: &mut Bts7960<P, E>,
    delay: &mut D,
    cfg: &CycleConfig,
    max_cycles: Option<u64>,
) -> Result<Outcome, AppError>
where
    P: PwmPin,
    E: EnablePin,
    D: Delay + ?Sized,
{
    let accel = Ramp::new(cfg.start_percent, cfg.peak_percent, cfg.accel_s)
        .with_zero_step(cfg.zero_step.into());
    let decel = Ramp::new(cfg.peak_percent, cfg.end_percent, cfg.decel_s)
        .with_zero_step(cfg.zero_step.into());
    let peak_speed = percent_to_duty(i64::from(cfg.peak_percent));

    let mut observer = LogObserver;
    let mut completed: u64 = 0;

    loop {
        if max_cycles.is_some_and(|max| completed >= max) {
            crate::log_info!("Finished {} cycle(s)", completed);
            return Ok(Outcome::Completed);
        }
        let cycle = completed + 1;

        crate::log_info!("Cycle {}: accelerating", cycle);
        if let ControlFlow::Break(outcome) =
            ramp_flow(motor.ramp(Direction::Forward, &accel, delay, &mut observer))?
        {
            return Ok(outcome);
        }

        crate::log_info!("Cycle {}: holding {}% for {}s", cycle, cfg.peak_percent, cfg.hold_s);
        motor.set_speed(peak_speed)?;
        if delay.delay(seconds(cfg.hold_s)).is_err() {
            return Ok(Outcome::Interrupted);
        }

        crate::log_info!("Cycle {}: decelerating", cycle);
        if let ControlFlow::Break(outcome) =
            ramp_flow(motor.ramp(Direction::Forward, &decel, delay, &mut observer))?
        {
            return Ok(outcome);
        }

        crate::log_info!("Cycle {}: resting {}s", cycle, cfg.rest_s);
        if delay.delay(seconds(cfg.rest_s)).is_err() {
            return Ok(Outcome::Interrupted);
        }

        completed = cycle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::{SimPin, SimPwm, SimulatedBoard};
    use motor_ramp_core::traits::MockDelay;
    use std::time::Duration;

    fn driver(board: &SimulatedBoard) -> Bts7960<SimPwm, SimPin> {
        Bts7960::new(
            board.create_pwm(12, 100.0).unwrap(),
            board.create_pwm(13, 100.0).unwrap(),
            board.create_output(17, true).unwrap(),
            board.create_output(27, true).unwrap(),
        )
    }

    #[test]
    fn test_single_cycle_timing() {
        let board = SimulatedBoard::with_history();
        let mut motor = driver(&board);
        let mut delay = MockDelay::new();

        let outcome = run_cycle(&mut motor, &mut delay, &CycleConfig::default(), Some(1)).unwrap();
        assert_eq!(outcome, Outcome::Completed);

        // 10s accel + 10s hold + 10s decel + 3s rest
        let total = delay.total().as_secs_f64();
        assert!((total - 33.0).abs() < 1e-6, "total sleep {total}");
        // 70 accel waits, hold, 100 decel waits, rest
        assert_eq!(delay.calls(), 70 + 1 + 100 + 1);
    }

    #[test]
    fn test_single_cycle_writes() {
        let board = SimulatedBoard::with_history();
        let mut motor = driver(&board);

        run_cycle(&mut motor, &mut MockDelay::new(), &CycleConfig::default(), Some(1)).unwrap();

        let lpwm = board.history(12);
        // 71 accel writes, hold write, 101 decel writes
        assert_eq!(lpwm.len(), 71 + 1 + 101);
        assert_eq!(lpwm[0], 0.3);
        assert_eq!(lpwm[70], 1.0);
        assert_eq!(lpwm[71], 1.0);
        assert_eq!(*lpwm.last().unwrap(), 0.0);

        // Reverse channel never driven
        assert!(board.history(13).iter().all(|&d| d == 0.0));
        assert_eq!(board.duty_cycle(12), Some(0.0));
    }

    #[test]
    fn test_repeats_requested_cycles() {
        let board = SimulatedBoard::with_history();
        let mut motor = driver(&board);
        let mut delay = MockDelay::new();

        run_cycle(&mut motor, &mut delay, &CycleConfig::default(), Some(3)).unwrap();
        assert_eq!(board.history(12).len(), 3 * 173);
        assert!((delay.total().as_secs_f64() - 99.0).abs() < 1e-6);
    }

    #[test]
    fn test_zero_cycles_does_nothing() {
        let board = SimulatedBoard::with_history();
        let mut motor = driver(&board);
        let mut delay = MockDelay::new();

        let outcome = run_cycle(&mut motor, &mut delay, &CycleConfig::default(), Some(0)).unwrap();
        assert_eq!(outcome, Outcome::Completed);
        assert!(board.history(12).is_empty());
        assert_eq!(delay.calls(), 0);
    }

    #[test]
    fn test_interrupt_during_hold() {
        let board = SimulatedBoard::with_history();
        let mut motor = driver(&board);
        // 70 accel waits, then the hold
        let mut delay = MockDelay::interrupting_on(71);

        let outcome = run_cycle(&mut motor, &mut delay, &CycleConfig::default(), None).unwrap();
        assert_eq!(outcome, Outcome::Interrupted);
        // Accel plus the hold write, no decel
        assert_eq!(board.history(12).len(), 72);
        assert_eq!(board.duty_cycle(12), Some(1.0));
    }

    #[test]
    fn test_interrupt_during_accel() {
        let board = SimulatedBoard::with_history();
        let mut motor = driver(&board);
        let mut delay = MockDelay::interrupting_on(5);

        let outcome = run_cycle(&mut motor, &mut delay, &CycleConfig::default(), None).unwrap();
        assert_eq!(outcome, Outcome::Interrupted);
        assert_eq!(board.history(12).len(), 5);
        assert_eq!(delay.total(), Duration::from_secs_f64(10.0 / 70.0) * 4);
    }

    #[test]
    fn test_huge_hold_still_waits() {
        let board = SimulatedBoard::with_history();
        let mut motor = driver(&board);
        let cfg = CycleConfig {
            hold_s: 1e20,
            ..CycleConfig::default()
        };
        let mut delay = MockDelay::new();

        run_cycle(&mut motor, &mut delay, &cfg, Some(1)).unwrap();
        assert_eq!(delay.longest(), Some(Duration::MAX));
        assert_eq!(delay.total(), Duration::MAX);
    }

    #[test]
    fn test_flat_ramp_skipped() {
        let board = SimulatedBoard::with_history();
        let mut motor = driver(&board);
        let cfg = CycleConfig {
            start_percent: 100,
            end_percent: 100,
            ..CycleConfig::default()
        };

        run_cycle(&mut motor, &mut MockDelay::new(), &cfg, Some(1)).unwrap();
        // Hold write only; both ramps have equal endpoints
        assert_eq!(board.history(12), vec![1.0]);
    }
}
