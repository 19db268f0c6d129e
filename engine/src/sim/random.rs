//! Deterministic random streams.
//!
//! A single root seed lives in the [`RngStreams`] unique. Each concern draws from its own
//! [`ChaCha8Rng`] stream derived from that seed, so adding draws in one system never shifts the
//! sequence another system sees.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use shoal_macros::Unique;

pub const ROOT_SEED: u64 = 42;

/// Independent random sequences derived from the root seed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stream {
    Behavior = 1,
    Spawn = 2,
    Movement = 3,
    Placement = 4,
}

#[derive(Unique, Debug, Clone, Copy, PartialEq, Eq)]
pub struct RngStreams {
    pub seed: u64,
}

impl Default for RngStreams {
    fn default() -> Self {
        Self { seed: ROOT_SEED }
    }
}

impl RngStreams {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// A fresh generator for `stream`. Equal seeds yield equal sequences.
    pub fn stream(&self, stream: Stream) -> ChaCha8Rng {
        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
        rng.set_stream(stream as u64);
        rng
    }
}

/// Uniform draw in `[lo, hi]`, tolerant of `lo == hi` and swapped bounds.
///
/// A non-finite bound yields the other bound (or zero) without drawing, and a span too wide for
/// `f32` yields the midpoint.
pub fn uniform(rng: &mut impl Rng, lo: f32, hi: f32) -> f32 {
    if !lo.is_finite() || !hi.is_finite() {
        return [lo, hi].into_iter().find(|v| v.is_finite()).unwrap_or(0.0);
    }
    let (lo, hi) = if hi < lo { (hi, lo) } else { (lo, hi) };
    let span = hi - lo;
    if span <= f32::EPSILON {
        return lo;
    }
    if !span.is_finite() {
        return lo * 0.5 + hi * 0.5;
    }
    rng.gen_range(lo..=hi)
}

/// Pick a key with probability proportional to its weight.
///
/// Non-positive weights are never chosen. Returns `None` when no weight is positive, or when the
/// weights do not sum to a finite total, so the caller can apply its own fallback.
pub fn weighted_pick<'a, I>(rng: &mut impl Rng, entries: I) -> Option<&'a str>
where
    I: IntoIterator<Item = (&'a String, &'a f32)>,
{
    let candidates: Vec<(&str, f32)> = entries
        .into_iter()
        .filter(|(_, weight)| **weight > 0.0)
        .map(|(name, weight)| (name.as_str(), *weight))
        .collect();
    let total: f32 = candidates.iter().map(|(_, weight)| weight).sum();
    if !total.is_finite() || total <= 0.0 {
        return None;
    }

    let roll = rng.gen_range(0.0..total);
    let mut cumulative = 0.0_f32;
    for (name, weight) in candidates.iter() {
        cumulative += *weight;
        if cumulative >= roll {
            return Some(*name);
        }
    }
    candidates.last().map(|(name, _)| *name)
}
