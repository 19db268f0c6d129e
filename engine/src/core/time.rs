use std::time::Duration;

use shoal_macros::Unique;

/// Sixty simulation steps per second.
pub const SIXTY_HZ: Duration = Duration::from_nanos(16_666_667);

/// Upper bound on catch-up steps per [`Stepper::advance`] call.
pub const DEFAULT_MAX_STEPS: u32 = 8;

/// A fixed time step accumulator.
///
/// The host feeds the real elapsed time of each frame into [`advance`](Self::advance) and runs
/// the scheduler update once per returned step with [`step_seconds`](Self::step_seconds) as
/// `dt`. This keeps the simulation deterministic regardless of the host's frame rate.
#[derive(Debug, Clone, Copy)]
pub struct Stepper {
    step: Duration,
    accumulator: Duration,
    max_steps: u32,
    steps_run: u64,
}

impl Stepper {
    /// Construct a stepper for the given fixed step. A zero step is bumped to one nanosecond.
    pub fn new(step: Duration) -> Self {
        Self {
            step: step.max(Duration::from_nanos(1)),
            accumulator: Duration::ZERO,
            max_steps: DEFAULT_MAX_STEPS,
            steps_run: 0,
        }
    }

    /// Limit how many steps a single call to `advance` may return.
    pub fn with_max_steps(mut self, max_steps: u32) -> Self {
        self.max_steps = max_steps.max(1);
        self
    }

    /// The fixed step in seconds, suitable as the scheduler's `dt`.
    #[inline]
    pub fn step_seconds(&self) -> f32 {
        self.step.as_secs_f32()
    }

    /// Total number of steps handed out so far.
    #[inline]
    pub fn steps_run(&self) -> u64 {
        self.steps_run
    }

    /// Accumulate `delta` and return the number of fixed steps that are now due.
    ///
    /// When more than `max_steps` are due the backlog is dropped, so a stalled host does not
    /// try to replay the stall all at once.
    pub fn advance(&mut self, delta: Duration) -> u32 {
        self.accumulator += delta;
        let mut steps = 0;
        while self.accumulator >= self.step && steps < self.max_steps {
            self.accumulator -= self.step;
            steps += 1;
        }
        if steps == self.max_steps && self.accumulator >= self.step {
            log::warn!(
                "dropping {:?} of simulation backlog after {} steps",
                self.accumulator,
                steps
            );
            self.accumulator = Duration::ZERO;
        }
        self.steps_run += u64::from(steps);
        steps
    }

    /// How far the accumulator is into the next step, in `[0, 1)`. Used for render interpolation.
    pub fn alpha(&self) -> f32 {
        self.accumulator.as_secs_f32() / self.step.as_secs_f32()
    }

    /// Drop any accumulated time, e.g. after the host was paused.
    pub fn reset(&mut self) {
        self.accumulator = Duration::ZERO;
    }
}

impl Default for Stepper {
    fn default() -> Self {
        Self::new(SIXTY_HZ)
    }
}

/// Frame counter and simulated time, advanced by the scheduler at the start of every update.
#[derive(Unique, Debug, Default, Clone, Copy, PartialEq)]
pub struct FrameClock {
    /// Number of update calls so far, including the current one.
    pub frame: u64,
    /// Simulated seconds since the first update, including the current `delta`.
    pub elapsed: f64,
    /// The `dt` of the current update.
    pub delta: f32,
}

impl FrameClock {
    pub(crate) fn advance(&mut self, dt: f32) {
        self.frame += 1;
        self.delta = dt;
        self.elapsed += f64::from(dt);
    }
}
