//! Unique (singleton) types for the ECS.
//!
//! | Aspect | Unique | Component |
//! |--------|--------|-----------|
//! | Cardinality | One per type per world | Many per type (one per entity) |
//! | Access | Direct by type | View over matching entities |
//! | Use case | Configuration, clocks, random streams | Entity-specific data |
//!
//! ```rust,ignore
//! use shoal_macros::Unique;
//!
//! #[derive(Unique)]
//! struct Score(u32);
//!
//! world.uniques_mut().set(Score(0));
//! world.uniques_mut().get_mut::<Score>().0 += 10;
//! ```

/// A trait for singleton types stored in the world's [`Uniques`](crate::ecs::storage::Uniques).
///
/// Use `#[derive(Unique)]` to implement this trait.
pub trait Unique: 'static + Send + Sync {}
