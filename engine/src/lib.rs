//! `shoal_engine`: a single-threaded simulation core with an entity/component store, a phase
//! ordered scheduler and a deterministic aquarium behavior layer.
//!
//! - [`ecs`]: entities, typed component stores, cached views, deferred commands, uniques,
//!   the event bus and the scheduler.
//! - [`sim`]: the aquarium domain (fish brains, steering, falling pellets, tanks).
//! - [`core`]: ambient helpers (log forwarding, fixed step clock).

// Allows the derive macros to refer to `::shoal_engine` from inside this crate.
extern crate self as shoal_engine;

pub mod core;
pub mod ecs;
pub mod sim;
