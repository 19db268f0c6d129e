//! Typed component storage for the ECS.
//!
//! Each component kind lives in its own [`Store`]: a dense, homogeneous mapping from
//! [`Entity`] to value. An entity is simply the union of the stores it appears in. [`Storage`]
//! owns every store behind a type-erased handle keyed by [`KindId`] and exposes typed accessors
//! on top, so no caller ever dispatches on a runtime type tag.
//!
//! ```text
//! Storage
//!   ├── Position store: [E1, E2, E3] -> [Pos, Pos, Pos]
//!   ├── Velocity store: [E1, E3]     -> [Vel, Vel]
//!   └── Fish store:     [E3]         -> [Fish]
//! ```
//!
//! Read accessors treat a never seen kind as an empty store. Structural mutation is `pub(crate)`
//! so it can only be driven by the [`World`](crate::ecs::World), which is responsible for
//! invalidating cached views.

mod store;
pub mod unique;

use std::{
    any::{TypeId, type_name},
    collections::HashMap,
};

pub(crate) use store::ErasedStore;
pub use store::{Column, Store};
pub use unique::{UniqueError, Uniques};

use crate::ecs::{
    component::Component,
    entity::Entity,
    world::{KindId, TypeRegistry},
};

/// The collection of every component store in a world.
#[derive(Default)]
pub struct Storage {
    registry: TypeRegistry,
    stores: HashMap<KindId, Box<dyn ErasedStore>>,
}

impl Storage {
    /// The registry assigning kind ids for this storage.
    #[inline]
    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    /// Get the store for `C`, if it was ever created.
    pub fn store<C: Component>(&self) -> Option<&Store<C>> {
        let kind = self.registry.get::<C>()?;
        self.stores
            .get(&kind)
            .and_then(|store| store.as_any().downcast_ref::<Store<C>>())
    }

    /// Get the store for `C` mutably, if it was ever created.
    pub fn store_mut<C: Component>(&mut self) -> Option<&mut Store<C>> {
        let kind = self.registry.get::<C>()?;
        self.stores
            .get_mut(&kind)
            .and_then(|store| store.as_any_mut().downcast_mut::<Store<C>>())
    }

    /// Get the store for `C`, creating it empty on first access.
    pub fn store_or_create<C: Component>(&mut self) -> &mut Store<C> {
        let kind = self.registry.register::<C>();
        let store = self.stores.entry(kind).or_insert_with(|| {
            log::debug!("creating store for {}", type_name::<C>());
            Box::new(Store::<C>::new(kind))
        });
        match store.as_any_mut().downcast_mut::<Store<C>>() {
            Some(store) => store,
            None => unreachable!("store for {} holds a foreign type", type_name::<C>()),
        }
    }

    /// Insert or overwrite a component value, returning the kind it was stored under.
    pub(crate) fn insert<C: Component>(&mut self, entity: Entity, value: C) -> KindId {
        let store = self.store_or_create::<C>();
        store.insert(entity, value);
        store.kind()
    }

    /// Remove a component value, returning it along with its kind if it was present.
    pub(crate) fn remove<C: Component>(&mut self, entity: Entity) -> Option<(KindId, C)> {
        let store = self.store_mut::<C>()?;
        store.remove(entity).map(|value| (store.kind(), value))
    }

    /// Remove a component value by rust type id. Returns the kind if something was removed.
    pub(crate) fn remove_by_type_id(&mut self, type_id: TypeId, entity: Entity) -> Option<KindId> {
        let kind = self.registry.get_by_type_id(type_id)?;
        let store = self.stores.get_mut(&kind)?;
        store.remove_entity(entity).then_some(kind)
    }

    /// Remove `entity` from every store, returning the kinds it was removed from.
    pub(crate) fn remove_entity(&mut self, entity: Entity) -> Vec<KindId> {
        self.stores
            .values_mut()
            .filter_map(|store| store.remove_entity(entity).then(|| store.kind()))
            .collect()
    }

    #[inline]
    pub fn get<C: Component>(&self, entity: Entity) -> Option<&C> {
        self.store::<C>()?.get(entity)
    }

    #[inline]
    pub fn get_mut<C: Component>(&mut self, entity: Entity) -> Option<&mut C> {
        self.store_mut::<C>()?.get_mut(entity)
    }

    /// Does `entity` hold a value of `C`?
    #[inline]
    pub fn has<C: Component>(&self, entity: Entity) -> bool {
        self.store::<C>().is_some_and(|store| store.contains(entity))
    }

    /// Does `entity` appear in any store?
    pub fn contains(&self, entity: Entity) -> bool {
        self.stores.values().any(|store| store.contains(entity))
    }

    /// The entities holding every kind in `kinds`.
    ///
    /// The first kind is the base: its store is walked in order and each entity is checked
    /// against the remaining stores. An empty kind list, or any kind without a store, yields no
    /// entities.
    pub fn intersect(&self, kinds: &[KindId]) -> Vec<Entity> {
        let Some((base, rest)) = kinds.split_first() else {
            return Vec::new();
        };
        let Some(base) = self.stores.get(base) else {
            return Vec::new();
        };
        let mut others = Vec::with_capacity(rest.len());
        for kind in rest {
            match self.stores.get(kind) {
                Some(store) => others.push(store),
                None => return Vec::new(),
            }
        }
        base.entities()
            .iter()
            .copied()
            .filter(|entity| others.iter().all(|store| store.contains(*entity)))
            .collect()
    }

    /// Raw column for `C`, if its store exists.
    pub(crate) fn column<C: Component>(&mut self) -> Option<Column<C>> {
        self.store_mut::<C>().map(|store| store.column())
    }
}
