//! Whole-frame aquarium workloads.
//!
//! - **School**: many fish across several tanks; behavior and steering dominate
//! - **Pellet rain**: continuous clicks creating pellets that sink, land and get cleaned up;
//!   measures command churn and view rebuilds

pub mod pellet_rain;
pub mod school;

pub use pellet_rain::{PelletRainConfig, PelletRainScenario};
pub use school::{SchoolConfig, SchoolScenario};

/// Common trait for benchmark scenarios.
pub trait Scenario {
    fn name(&self) -> &'static str;

    /// Number of simulated bodies.
    fn entity_count(&mut self) -> usize;

    /// Build the world.
    fn setup(&mut self);

    /// Run one simulation step.
    fn update(&mut self);
}
