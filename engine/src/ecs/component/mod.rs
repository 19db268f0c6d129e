//! Component management for the ECS.
//!
//! Components are plain data records attached to entities. Each component type lives in its own
//! homogeneous [`Store`](crate::ecs::storage::Store) keyed by [`Entity`](crate::ecs::Entity).
//!
//! ## Usage
//!
//! ```ignore
//! use shoal_engine::ecs::{Component, World};
//!
//! #[derive(Component)]
//! struct Position { x: f32, y: f32 }
//!
//! let mut world = World::new();
//! let entity = world.spawn(Position { x: 0.0, y: 0.0 });
//! assert!(world.has::<Position>(entity));
//! ```

mod set;

pub use set::{BoxedSet, Set, Target};

/// A trait representing a component in the ECS.
///
/// At present this only sets the required trait bounds for a type to be used as a component.
pub trait Component: 'static + Sized + Send + Sync {}
