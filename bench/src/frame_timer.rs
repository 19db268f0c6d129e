//! Timing for fixed step loops.
//!
//! A host frame feeds its real duration into a [`Stepper`] and then runs zero or more
//! simulation steps. [`measure_stepped`] times every step separately and records how many
//! steps each host frame needed, which is what decides whether a frame budget holds.

use std::{
    fmt,
    time::{Duration, Instant},
};

use shoal_engine::core::Stepper;

/// Summary of a set of measured durations.
#[derive(Debug, Clone)]
pub struct TimingStats {
    pub count: usize,
    pub total: Duration,
    /// Ascending.
    samples: Vec<Duration>,
}

impl TimingStats {
    pub fn from_samples(mut samples: Vec<Duration>) -> Self {
        samples.sort_unstable();
        Self {
            count: samples.len(),
            total: samples.iter().sum(),
            samples,
        }
    }

    pub fn mean(&self) -> Duration {
        match u32::try_from(self.count) {
            Ok(0) | Err(_) => Duration::ZERO,
            Ok(count) => self.total / count,
        }
    }

    pub fn min(&self) -> Duration {
        self.samples.first().copied().unwrap_or_default()
    }

    pub fn max(&self) -> Duration {
        self.samples.last().copied().unwrap_or_default()
    }

    /// Nearest-rank percentile, `p` in `0..=100`.
    pub fn percentile(&self, p: usize) -> Duration {
        if self.samples.is_empty() {
            return Duration::ZERO;
        }
        let rank = (self.samples.len() * p.min(100)).div_ceil(100);
        self.samples[rank.saturating_sub(1)]
    }
}

impl fmt::Display for TimingStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ms = |d: Duration| d.as_secs_f64() * 1000.0;
        write!(
            f,
            "{} samples, mean {:.3}ms, p50 {:.3}ms, p99 {:.3}ms, max {:.3}ms",
            self.count,
            ms(self.mean()),
            ms(self.percentile(50)),
            ms(self.percentile(99)),
            ms(self.max()),
        )
    }
}

/// Result of [`measure_stepped`].
#[derive(Debug, Clone)]
pub struct SteppedRun {
    /// Wall time of every simulation step.
    pub steps: TimingStats,
    /// Number of simulation steps run in each host frame.
    pub steps_per_frame: Vec<u32>,
}

impl SteppedRun {
    pub fn host_frames(&self) -> usize {
        self.steps_per_frame.len()
    }

    /// Host frames that needed more than one step to catch up.
    pub fn catch_up_frames(&self) -> usize {
        self.steps_per_frame.iter().filter(|steps| **steps > 1).count()
    }
}

/// Drive `step` through `stepper` for every host frame duration in `host_frames`.
///
/// `step` receives the fixed step in seconds.
pub fn measure_stepped<F>(mut stepper: Stepper, host_frames: &[Duration], mut step: F) -> SteppedRun
where
    F: FnMut(f32),
{
    let dt = stepper.step_seconds();
    let mut samples = Vec::with_capacity(host_frames.len());
    let mut steps_per_frame = Vec::with_capacity(host_frames.len());

    for delta in host_frames {
        let due = stepper.advance(*delta);
        for _ in 0..due {
            let start = Instant::now();
            step(dt);
            samples.push(start.elapsed());
        }
        steps_per_frame.push(due);
    }

    SteppedRun {
        steps: TimingStats::from_samples(samples),
        steps_per_frame,
    }
}
