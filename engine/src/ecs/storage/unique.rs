//! Type-keyed storage for singleton (unique) values.
//!
//! [`Uniques`] holds at most one value per type implementing [`Unique`]. It is how
//! configuration, random streams, the frame clock and any adapter-provided services are shared
//! with systems. Keys are rust types, so every access is statically typed.
//!
//! # Example
//!
//! ```rust,ignore
//! #[derive(Unique)]
//! struct Score(u32);
//!
//! let mut uniques = Uniques::new();
//! uniques.register(Score(0))?;
//! uniques.get_mut::<Score>().0 += 10;
//! assert_eq!(uniques.get::<Score>().0, 10);
//! assert!(uniques.register(Score(1)).is_err());
//! ```

use std::{
    any::{Any, TypeId, type_name},
    collections::HashMap,
    fmt,
};

use crate::ecs::unique::Unique;

/// Error returned when registering a unique type that is already present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UniqueError {
    AlreadyRegistered { type_name: &'static str },
}

impl fmt::Display for UniqueError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UniqueError::AlreadyRegistered { type_name } => {
                write!(f, "unique '{}' is already registered", type_name)
            }
        }
    }
}

impl std::error::Error for UniqueError {}

/// Storage for singleton values keyed by their rust type.
#[derive(Default)]
pub struct Uniques {
    data: HashMap<TypeId, Box<dyn Any + Send + Sync>>,
}

impl Uniques {
    /// Creates a new, empty unique storage.
    #[inline]
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
        }
    }

    /// Add a unique that must not already exist.
    pub fn register<U: Unique>(&mut self, value: U) -> Result<(), UniqueError> {
        if self.contains::<U>() {
            return Err(UniqueError::AlreadyRegistered {
                type_name: type_name::<U>(),
            });
        }
        self.data.insert(TypeId::of::<U>(), Box::new(value));
        Ok(())
    }

    /// Insert or replace a unique, returning the previous value if any.
    pub fn set<U: Unique>(&mut self, value: U) -> Option<U> {
        self.data
            .insert(TypeId::of::<U>(), Box::new(value))
            .and_then(|old| (old as Box<dyn Any>).downcast::<U>().ok())
            .map(|boxed| *boxed)
    }

    /// Get a unique that is expected to exist.
    ///
    /// # Panics
    /// Panics if no value of type `U` was registered. Use [`try_get`](Self::try_get) when absence
    /// is an expected condition.
    #[track_caller]
    pub fn get<U: Unique>(&self) -> &U {
        match self.try_get::<U>() {
            Some(value) => value,
            None => panic!("unique '{}' was never registered", type_name::<U>()),
        }
    }

    /// Get a unique mutably that is expected to exist.
    ///
    /// # Panics
    /// Panics if no value of type `U` was registered.
    #[track_caller]
    pub fn get_mut<U: Unique>(&mut self) -> &mut U {
        match self.try_get_mut::<U>() {
            Some(value) => value,
            None => panic!("unique '{}' was never registered", type_name::<U>()),
        }
    }

    #[inline]
    pub fn try_get<U: Unique>(&self) -> Option<&U> {
        self.data
            .get(&TypeId::of::<U>())
            .and_then(|stored| stored.downcast_ref::<U>())
    }

    #[inline]
    pub fn try_get_mut<U: Unique>(&mut self) -> Option<&mut U> {
        self.data
            .get_mut(&TypeId::of::<U>())
            .and_then(|stored| stored.downcast_mut::<U>())
    }

    /// A copy of the unique, or `default` when absent.
    pub fn get_or<U: Unique + Clone>(&self, default: U) -> U {
        self.try_get::<U>().cloned().unwrap_or(default)
    }

    /// Get a unique mutably, inserting the value produced by `init` when absent.
    pub fn get_or_insert_with<U: Unique>(&mut self, init: impl FnOnce() -> U) -> &mut U {
        let stored = self
            .data
            .entry(TypeId::of::<U>())
            .or_insert_with(|| Box::new(init()));
        match stored.downcast_mut::<U>() {
            Some(value) => value,
            None => unreachable!("unique '{}' stored under a foreign key", type_name::<U>()),
        }
    }

    /// Removes a unique from storage, returning it if it existed.
    pub fn remove<U: Unique>(&mut self) -> Option<U> {
        self.data
            .remove(&TypeId::of::<U>())
            .and_then(|stored| (stored as Box<dyn Any>).downcast::<U>().ok())
            .map(|boxed| *boxed)
    }

    #[inline]
    pub fn contains<U: Unique>(&self) -> bool {
        self.data.contains_key(&TypeId::of::<U>())
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
