//! The aquarium: fish brains, steering, sinking pellets and tanks on top of [`crate::ecs`].
//!
//! Logic systems run in this order every update:
//!
//! 1. [`PlacementSystem`]: buffered clicks become queued pellets.
//! 2. [`BehaviorSystem`]: brains tick and write [`MovementIntent`](components::MovementIntent).
//! 3. [`FallingSystem`]: gravity and wobble.
//! 4. [`MovementSystem`]: steering, integration and containment.
//!
//! [`Aquarium`] wires them together with the configuration uniques.

pub mod aquarium;
pub mod behavior;
pub mod components;
pub mod config;
pub mod events;
pub mod falling;
pub mod geometry;
pub mod movement;
pub mod placement;
pub mod random;
pub mod spawn;

pub use aquarium::{Aquarium, AquariumConfig};
pub use behavior::{BehaviorSystem, StateKind};
pub use falling::FallingSystem;
pub use movement::MovementSystem;
pub use placement::PlacementSystem;
pub use spawn::SpawnError;
