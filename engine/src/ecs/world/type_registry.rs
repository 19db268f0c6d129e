//! Registry of component kinds.
//!
//! Every component type touched by a world is assigned a compact [`KindId`]. Kind ids are used
//! as keys for component stores and as bit indices in the masks of cached views.
//!
//! # Thread Safety
//!
//! Registration works through `&self`: lock-free reads via `DashMap` and an atomic counter for
//! new ids. Registration is idempotent.
//!
//! # Example
//!
//! ```rust,ignore
//! let registry = TypeRegistry::new();
//! let pos = registry.register::<Position>();
//! assert_eq!(registry.register::<Position>(), pos);
//! assert_eq!(registry.name(pos), Some("my_crate::Position"));
//! ```

use std::{
    any::{TypeId as StdTypeId, type_name},
    fmt,
    sync::atomic::{AtomicU32, Ordering},
};

use dashmap::DashMap;

/// A compact identifier for a registered component kind.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct KindId(u32);

impl KindId {
    /// Construct a new id from a raw u32 value.
    #[inline]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the index of this id for use in indexable storage (e.g. Vec, bitset).
    #[inline]
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for KindId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "kind:{}", self.0)
    }
}

/// A thread-safe registry mapping rust types to [`KindId`]s.
pub struct TypeRegistry {
    /// Map from rust TypeId to our id.
    type_map: DashMap<StdTypeId, KindId>,

    /// Type names for diagnostics.
    names: DashMap<KindId, &'static str>,

    /// Next available kind identifier.
    next_id: AtomicU32,
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeRegistry {
    /// Create a new, empty type registry.
    #[inline]
    pub fn new() -> Self {
        Self {
            type_map: DashMap::new(),
            names: DashMap::new(),
            next_id: AtomicU32::new(0),
        }
    }

    /// Register a type, returning its kind id. Returns the existing id if already registered.
    pub fn register<T: 'static>(&self) -> KindId {
        let std_type_id = StdTypeId::of::<T>();

        // Fast path: already registered.
        if let Some(existing) = self.type_map.get(&std_type_id) {
            return *existing;
        }

        match self.type_map.entry(std_type_id) {
            dashmap::Entry::Occupied(occupied) => *occupied.get(),
            dashmap::Entry::Vacant(vacant) => {
                let id = KindId(self.next_id.fetch_add(1, Ordering::Relaxed));
                self.names.insert(id, type_name::<T>());
                vacant.insert(id);
                log::trace!("registered {} as {}", type_name::<T>(), id);
                id
            }
        }
    }

    /// Get the id for a type, if registered.
    #[inline]
    pub fn get<T: 'static>(&self) -> Option<KindId> {
        self.get_by_type_id(StdTypeId::of::<T>())
    }

    /// Get the id for a rust type id, if registered.
    #[inline]
    pub fn get_by_type_id(&self, type_id: StdTypeId) -> Option<KindId> {
        self.type_map.get(&type_id).map(|entry| *entry.value())
    }

    /// Get the type name a kind was registered for.
    #[inline]
    pub fn name(&self, id: KindId) -> Option<&'static str> {
        self.names.get(&id).map(|entry| *entry.value())
    }

    /// Get the number of registered kinds.
    #[inline]
    pub fn len(&self) -> usize {
        self.next_id.load(Ordering::Relaxed) as usize
    }

    /// Check if the registry is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
