//! Duty-cycle ramp
//!
//! Drives a PWM output through every whole percentage between two endpoints,
//! spacing the writes evenly so the transition takes the requested time.
//!
//! ## Timing
//!
//! For `start != end` the ramp performs `|end - start| + 1` writes. A wait of
//! `duration / |end - start|` follows every write except the last, so the
//! total wait equals `duration`.
//!
//! ```text
//! start=30 end=33 duration=0.3s
//!
//!  write 0.30 | 0.1s | write 0.31 | 0.1s | write 0.32 | 0.1s | write 0.33
//! ```
//!
//! ## Example
//!
//! ```
//! use motor_ramp_core::motor::{MotorError, PwmPin};
//! use motor_ramp_core::ramp::{NoopObserver, Ramp};
//! use motor_ramp_core::traits::MockDelay;
//!
//! struct Pin(f32);
//!
//! impl PwmPin for Pin {
//!     fn set_duty(&mut self, duty: f32) -> Result<(), MotorError> {
//!         self.0 = duty;
//!         Ok(())
//!     }
//! }
//!
//! let mut pin = Pin(0.0);
//! let mut delay = MockDelay::new();
//! let report = Ramp::new(100, 0, 10.0)
//!     .run(&mut pin, &mut delay, &mut NoopObserver)
//!     .unwrap();
//!
//! assert_eq!(report.writes, 101);
//! assert_eq!(pin.0, 0.0);
//! ```

use core::fmt;
use core::time::Duration;

use crate::motor::{MotorError, PwmPin};
use crate::traits::{Delay, Interrupted};

/// Per-ramp duration used when the requested duration is not positive.
pub const MIN_RAMP_DURATION_S: f64 = 0.001;

/// Behaviour of a ramp whose start and end percentages are equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ZeroStepPolicy {
    /// Return immediately without touching the output.
    Skip,
    /// Write `end / 100` once, without waiting.
    #[default]
    Apply,
}

/// Ramp failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RampError {
    /// The output rejected a duty cycle write
    Motor(MotorError),
    /// The operator requested termination during a wait
    Interrupted,
}

impl From<MotorError> for RampError {
    fn from(err: MotorError) -> Self {
        RampError::Motor(err)
    }
}

impl From<Interrupted> for RampError {
    fn from(_: Interrupted) -> Self {
        RampError::Interrupted
    }
}

impl fmt::Display for RampError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RampError::Motor(e) => write!(f, "ramp output failed: {}", e),
            RampError::Interrupted => write!(f, "ramp interrupted by operator"),
        }
    }
}

impl core::error::Error for RampError {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            RampError::Motor(e) => Some(e),
            RampError::Interrupted => None,
        }
    }
}

/// One planned duty-cycle write.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RampStep {
    /// Position in the sequence (0-based)
    pub index: usize,
    /// Requested percentage, before clamping
    pub percent: i32,
    /// Duty cycle actually written, in [0.0, 1.0]
    pub duty: f32,
    /// Wait after this write (zero for the final write)
    pub delay_after: Duration,
}

/// Summary of a completed ramp.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RampReport {
    /// Number of duty-cycle writes
    pub writes: usize,
    /// Sum of the waits between writes
    pub slept: Duration,
    /// Last duty cycle written, if any
    pub final_duty: Option<f32>,
}

/// Progress callbacks for a running ramp.
///
/// All methods default to no-ops.
pub trait RampObserver {
    /// Called once before the first write.
    fn on_start(&mut self, _ramp: &Ramp) {}

    /// Called after each write, before the following wait.
    fn on_step(&mut self, _step: &RampStep) {}

    /// Called once after the last write.
    fn on_complete(&mut self, _ramp: &Ramp, _report: &RampReport) {}
}

/// Observer that ignores all progress.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl RampObserver for NoopObserver {}

impl<O: RampObserver + ?Sized> RampObserver for &mut O {
    fn on_start(&mut self, ramp: &Ramp) {
        (**self).on_start(ramp)
    }

    fn on_step(&mut self, step: &RampStep) {
        (**self).on_step(step)
    }

    fn on_complete(&mut self, ramp: &Ramp, report: &RampReport) {
        (**self).on_complete(ramp, report)
    }
}

/// Linear duty-cycle ramp between two whole percentages.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ramp {
    start_percent: i32,
    end_percent: i32,
    duration_s: f64,
    zero_step: ZeroStepPolicy,
}

impl Ramp {
    /// Create a ramp from `start_percent` to `end_percent` over `duration_s`.
    ///
    /// Percentages are conventionally in 0..=100 but are not checked; written
    /// duty cycles are always clamped into [0.0, 1.0]. A non-positive or
    /// non-finite duration is replaced by [`MIN_RAMP_DURATION_S`].
    pub fn new(start_percent: i32, end_percent: i32, duration_s: f64) -> Self {
        Self {
            start_percent,
            end_percent,
            duration_s,
            zero_step: ZeroStepPolicy::default(),
        }
    }

    /// Select the behaviour when `start_percent == end_percent`.
    pub fn with_zero_step(mut self, policy: ZeroStepPolicy) -> Self {
        self.zero_step = policy;
        self
    }

    /// Starting percentage
    pub fn start_percent(&self) -> i32 {
        self.start_percent
    }

    /// Final percentage
    pub fn end_percent(&self) -> i32 {
        self.end_percent
    }

    /// Requested duration in seconds, as given to [`Ramp::new`]
    pub fn duration_s(&self) -> f64 {
        self.duration_s
    }

    /// Zero-step policy in effect
    pub fn zero_step(&self) -> ZeroStepPolicy {
        self.zero_step
    }

    /// Duration actually spread over the steps (floored when not positive).
    pub fn effective_duration_s(&self) -> f64 {
        if self.duration_s.is_finite() && self.duration_s > 0.0 {
            self.duration_s
        } else {
            MIN_RAMP_DURATION_S
        }
    }

    /// `+1` when ramping up, `-1` otherwise.
    pub fn direction(&self) -> i32 {
        if self.end_percent > self.start_percent {
            1
        } else {
            -1
        }
    }

    /// Number of 1% steps between the endpoints.
    pub fn step_count(&self) -> u64 {
        (i64::from(self.end_percent) - i64::from(self.start_percent)).unsigned_abs()
    }

    /// Wait between consecutive writes (zero when there are no steps).
    ///
    /// Saturates at `Duration::MAX` for durations too large to represent.
    pub fn delay_per_step(&self) -> Duration {
        match self.step_count() {
            0 => Duration::ZERO,
            n => Duration::try_from_secs_f64(self.effective_duration_s() / n as f64)
                .unwrap_or(Duration::MAX),
        }
    }

    /// Planned write sequence.
    pub fn steps(&self) -> RampSteps {
        let writes = match (self.step_count(), self.zero_step) {
            (0, ZeroStepPolicy::Skip) => 0,
            (n, _) => n + 1,
        };
        RampSteps {
            start: i64::from(self.start_percent),
            direction: i64::from(self.direction()),
            delay: self.delay_per_step(),
            next: 0,
            writes,
        }
    }

    /// Drive `output` through the ramp, waiting on `delay` between writes.
    ///
    /// # Errors
    ///
    /// Returns `RampError::Motor` if the output rejects a write, or
    /// `RampError::Interrupted` if a wait is aborted. No write happens after
    /// the failing one.
    pub fn run<P, D, O>(
        &self,
        output: &mut P,
        delay: &mut D,
        observer: &mut O,
    ) -> Result<RampReport, RampError>
    where
        P: PwmPin + ?Sized,
        D: Delay + ?Sized,
        O: RampObserver + ?Sized,
    {
        let mut report = RampReport::default();
        let steps = self.steps();
        if steps.len() == 0 {
            return Ok(report);
        }

        observer.on_start(self);
        for step in steps {
            output.set_duty(step.duty)?;
            report.writes += 1;
            report.final_duty = Some(step.duty);
            observer.on_step(&step);

            if !step.delay_after.is_zero() {
                delay.delay(step.delay_after)?;
                report.slept = report.slept.saturating_add(step.delay_after);
            }
        }
        observer.on_complete(self, &report);

        Ok(report)
    }
}

/// Iterator over the writes of a [`Ramp`].
#[derive(Debug, Clone)]
pub struct RampSteps {
    start: i64,
    direction: i64,
    delay: Duration,
    next: u64,
    writes: u64,
}

impl Iterator for RampSteps {
    type Item = RampStep;

    fn next(&mut self) -> Option<RampStep> {
        if self.next >= self.writes {
            return None;
        }

        let index = self.next;
        self.next += 1;

        let percent = self.start + self.direction * index as i64;
        let is_last = self.next == self.writes;
        Some(RampStep {
            index: index as usize,
            percent: percent as i32,
            duty: percent_to_duty(percent),
            delay_after: if is_last { Duration::ZERO } else { self.delay },
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.writes - self.next) as usize;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for RampSteps {}

/// Convert a percentage to a duty cycle clamped into [0.0, 1.0].
pub fn percent_to_duty(percent: i64) -> f32 {
    (percent as f32 / 100.0).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::MockDelay;

    /// Mock PWM pin recording every write
    #[derive(Debug, Default)]
    struct RecordingPin {
        writes: Vec<f32>,
        fail_on: Option<usize>,
    }

    impl PwmPin for RecordingPin {
        fn set_duty(&mut self, duty: f32) -> Result<(), MotorError> {
            if self.fail_on == Some(self.writes.len()) {
                return Err(MotorError::HardwareFault);
            }
            self.writes.push(duty);
            Ok(())
        }
    }

    #[derive(Debug, Default)]
    struct CountingObserver {
        started: usize,
        steps: Vec<i32>,
        completed: usize,
    }

    impl RampObserver for CountingObserver {
        fn on_start(&mut self, _ramp: &Ramp) {
            self.started += 1;
        }

        fn on_step(&mut self, step: &RampStep) {
            self.steps.push(step.percent);
        }

        fn on_complete(&mut self, _ramp: &Ramp, _report: &RampReport) {
            self.completed += 1;
        }
    }

    fn run(ramp: Ramp) -> (RecordingPin, MockDelay, RampReport) {
        let mut pin = RecordingPin::default();
        let mut delay = MockDelay::new();
        let report = ramp.run(&mut pin, &mut delay, &mut NoopObserver).unwrap();
        (pin, delay, report)
    }

    #[test]
    fn test_ramp_up_writes_every_percent() {
        let (pin, delay, report) = run(Ramp::new(30, 35, 0.5));

        assert_eq!(report.writes, 6);
        assert_eq!(pin.writes, vec![0.30, 0.31, 0.32, 0.33, 0.34, 0.35]);
        assert_eq!(delay.calls(), 5);
        assert_eq!(delay.shortest(), Some(Duration::from_millis(100)));
        assert_eq!(delay.longest(), Some(Duration::from_millis(100)));
    }

    #[test]
    fn test_ramp_down_writes_every_percent() {
        let (pin, delay, _) = run(Ramp::new(3, 0, 3.0));

        assert_eq!(pin.writes, vec![0.03, 0.02, 0.01, 0.0]);
        assert_eq!(delay.total(), Duration::from_secs(3));
    }

    #[test]
    fn test_final_write_not_followed_by_wait() {
        let steps: Vec<RampStep> = Ramp::new(0, 2, 1.0).steps().collect();

        assert_eq!(steps.len(), 3);
        assert_eq!(steps[0].delay_after, Duration::from_millis(500));
        assert_eq!(steps[1].delay_after, Duration::from_millis(500));
        assert_eq!(steps[2].delay_after, Duration::ZERO);
    }

    #[test]
    fn test_direction_and_step_count() {
        assert_eq!(Ramp::new(30, 100, 1.0).direction(), 1);
        assert_eq!(Ramp::new(100, 0, 1.0).direction(), -1);
        assert_eq!(Ramp::new(50, 50, 1.0).direction(), -1);

        assert_eq!(Ramp::new(30, 100, 1.0).step_count(), 70);
        assert_eq!(Ramp::new(100, 0, 1.0).step_count(), 100);
        assert_eq!(Ramp::new(i32::MIN, i32::MAX, 1.0).step_count(), u32::MAX as u64);
    }

    #[test]
    fn test_zero_step_skip() {
        let ramp = Ramp::new(40, 40, 2.0).with_zero_step(ZeroStepPolicy::Skip);
        let mut observer = CountingObserver::default();
        let mut pin = RecordingPin::default();
        let mut delay = MockDelay::new();

        let report = ramp.run(&mut pin, &mut delay, &mut observer).unwrap();

        assert_eq!(report, RampReport::default());
        assert!(pin.writes.is_empty());
        assert_eq!(delay.calls(), 0);
        assert_eq!(observer.started, 0);
        assert_eq!(observer.completed, 0);
    }

    #[test]
    fn test_zero_step_apply() {
        let ramp = Ramp::new(40, 40, 2.0).with_zero_step(ZeroStepPolicy::Apply);
        let (pin, delay, report) = run(ramp);

        assert_eq!(pin.writes, vec![0.40]);
        assert_eq!(report.writes, 1);
        assert_eq!(report.final_duty, Some(0.40));
        assert_eq!(delay.calls(), 0);
    }

    #[test]
    fn test_zero_step_apply_clamps() {
        let ramp = Ramp::new(150, 150, 1.0).with_zero_step(ZeroStepPolicy::Apply);
        let (pin, _, _) = run(ramp);
        assert_eq!(pin.writes, vec![1.0]);
    }

    #[test]
    fn test_non_positive_duration_uses_floor() {
        for duration in [0.0, -5.0, f64::NAN] {
            let ramp = Ramp::new(0, 10, duration);
            assert_eq!(ramp.effective_duration_s(), MIN_RAMP_DURATION_S);

            let (pin, delay, _) = run(ramp);
            assert_eq!(pin.writes.len(), 11);
            assert_eq!(delay.calls(), 10);
            assert!(delay.shortest().unwrap() > Duration::ZERO);
            let total = delay.total().as_secs_f64();
            assert!((total - MIN_RAMP_DURATION_S).abs() < 1e-6);
        }
    }

    #[test]
    fn test_huge_duration_saturates() {
        let ramp = Ramp::new(0, 1, 1e20);
        assert_eq!(ramp.delay_per_step(), Duration::MAX);

        let (pin, delay, report) = run(ramp);
        assert_eq!(pin.writes, vec![0.0, 0.01]);
        assert_eq!(delay.calls(), 1);
        assert_eq!(report.slept, Duration::MAX);

        let (pin, delay, report) = run(Ramp::new(0, 3, f64::MAX));
        assert_eq!(pin.writes.len(), 4);
        assert_eq!(delay.total(), Duration::MAX);
        assert_eq!(report.slept, Duration::MAX);
    }

    #[test]
    fn test_out_of_range_endpoints_are_clamped() {
        let (pin, _, _) = run(Ramp::new(-3, 2, 0.5));
        assert_eq!(pin.writes, vec![0.0, 0.0, 0.0, 0.0, 0.01, 0.02]);

        let (pin, _, _) = run(Ramp::new(98, 102, 0.5));
        assert_eq!(pin.writes, vec![0.98, 0.99, 1.0, 1.0, 1.0]);
        assert!(pin.writes.iter().all(|d| (0.0..=1.0).contains(d)));
    }

    #[test]
    fn test_observer_sees_every_step() {
        let mut observer = CountingObserver::default();
        let mut pin = RecordingPin::default();
        let mut delay = MockDelay::new();

        Ramp::new(5, 1, 0.4)
            .run(&mut pin, &mut delay, &mut observer)
            .unwrap();

        assert_eq!(observer.started, 1);
        assert_eq!(observer.steps, vec![5, 4, 3, 2, 1]);
        assert_eq!(observer.completed, 1);
    }

    #[test]
    fn test_interrupt_stops_further_writes() {
        let mut pin = RecordingPin::default();
        let mut delay = MockDelay::interrupting_on(3);

        let result = Ramp::new(0, 10, 1.0).run(&mut pin, &mut delay, &mut NoopObserver);

        assert_eq!(result, Err(RampError::Interrupted));
        assert_eq!(pin.writes, vec![0.0, 0.01, 0.02]);
    }

    #[test]
    fn test_output_failure_propagates() {
        let mut pin = RecordingPin {
            fail_on: Some(2),
            ..Default::default()
        };
        let mut delay = MockDelay::new();

        let result = Ramp::new(0, 10, 1.0).run(&mut pin, &mut delay, &mut NoopObserver);

        assert_eq!(result, Err(RampError::Motor(MotorError::HardwareFault)));
        assert_eq!(pin.writes.len(), 2);
        assert_eq!(delay.calls(), 2);
    }

    #[test]
    fn test_steps_len_matches_writes() {
        let ramp = Ramp::new(30, 100, 10.0);
        let mut steps = ramp.steps();
        assert_eq!(steps.len(), 71);
        steps.next();
        assert_eq!(steps.len(), 70);
    }

    #[test]
    fn test_percent_to_duty() {
        assert_eq!(percent_to_duty(0), 0.0);
        assert_eq!(percent_to_duty(30), 0.3);
        assert_eq!(percent_to_duty(100), 1.0);
        assert_eq!(percent_to_duty(-20), 0.0);
        assert_eq!(percent_to_duty(250), 1.0);
    }
}
