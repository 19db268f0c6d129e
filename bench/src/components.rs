//! Filler components for store level benchmarks.
//!
//! The aquarium components live in `shoal_engine::sim::components`; these add extra kinds of
//! different sizes so views can be measured with several stores involved.

use rand::Rng;
use shoal_macros::{Component, Unique};

/// Hit points of a damageable entity (8 bytes).
#[derive(Component, Clone, Copy, Debug, Default)]
pub struct Health {
    pub current: f32,
    pub max: f32,
}

/// Seconds left before the entity should be removed.
#[derive(Component, Clone, Copy, Debug, Default)]
pub struct Lifetime {
    pub remaining: f32,
}

/// A large value (64 bytes) to make moves show up in the numbers.
#[derive(Component, Clone, Copy, Debug, Default)]
pub struct Payload {
    pub data: [f32; 16],
}

/// Zero sized tag.
#[derive(Component, Clone, Copy, Debug, Default)]
pub struct Tagged;

/// Shared step size for hand written benchmark systems.
#[derive(Unique, Clone, Copy, Debug)]
pub struct StepSize(pub f32);

impl Health {
    pub fn random(rng: &mut impl Rng) -> Self {
        let max = rng.gen_range(50.0..150.0);
        Self {
            current: rng.gen_range(1.0..max),
            max,
        }
    }
}

impl Lifetime {
    pub fn random(rng: &mut impl Rng) -> Self {
        Self {
            remaining: rng.gen_range(0.5..4.0),
        }
    }
}
