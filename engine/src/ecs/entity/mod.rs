//! Entity identifiers for the ECS.
//!
//! An [`Entity`] is an opaque handle that components attach to. It carries no data of its own;
//! an entity "exists" only as the union of the component stores it appears in.
//!
//! Ids come from a shared [`Allocator`]: a monotonically increasing atomic counter starting at
//! `1`. Ids are never recycled within a process lifetime, so a stale handle can never alias a
//! newer entity. The allocator works through `&self` so it can be shared (behind an `Arc`)
//! between the world and every [`Commands`](crate::ecs::system::Commands) handle, which lets
//! deferred creations hand out ids before the entity is materialized at flush.

use std::{
    fmt,
    sync::atomic::{AtomicU64, Ordering},
};

/// An entity in the ECS. A unique, never reused, non-zero identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Entity(u64);

impl Entity {
    /// Construct an entity from a raw id.
    ///
    /// This is primarily used for testing.
    #[inline]
    pub(crate) const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Get the raw id of this entity.
    #[inline]
    pub const fn id(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Hands out fresh entity ids.
#[derive(Debug)]
pub struct Allocator {
    next: AtomicU64,
}

impl Allocator {
    /// The first id handed out by a new allocator.
    const FIRST: u64 = 1;

    /// Construct a new allocator.
    pub fn new() -> Self {
        Self {
            next: AtomicU64::new(Self::FIRST),
        }
    }

    /// Allocate a new, never before seen, entity.
    #[inline]
    pub fn alloc(&self) -> Entity {
        Entity(self.next.fetch_add(1, Ordering::Relaxed))
    }
}

impl Default for Allocator {
    fn default() -> Self {
        Self::new()
    }
}
