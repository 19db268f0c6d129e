use std::{any::Any, collections::HashMap};

use crate::ecs::{component::Component, entity::Entity, world::KindId};

/// Dense storage for every value of one component kind.
///
/// Values are packed into a vector with a parallel vector of owning entities, plus an index map
/// for constant-time lookups. Removal swaps the last value into the hole, so iteration order is
/// insertion order until the first removal and unspecified afterwards.
///
/// Structural changes (insert/remove) are only reachable through the
/// [`World`](crate::ecs::World), which keeps cached views consistent. Values themselves can be
/// mutated in place through [`get_mut`](Self::get_mut) and [`iter_mut`](Self::iter_mut).
pub struct Store<C: Component> {
    kind: KindId,
    entities: Vec<Entity>,
    values: Vec<C>,
    index: HashMap<Entity, usize>,
}

impl<C: Component> Store<C> {
    pub(crate) fn new(kind: KindId) -> Self {
        Self {
            kind,
            entities: Vec::new(),
            values: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// The kind id this store holds.
    #[inline]
    pub fn kind(&self) -> KindId {
        self.kind
    }

    /// Insert or overwrite the value for `entity`, returning the previous value if any.
    pub(crate) fn insert(&mut self, entity: Entity, value: C) -> Option<C> {
        match self.index.get(&entity) {
            Some(&row) => Some(std::mem::replace(&mut self.values[row], value)),
            None => {
                self.index.insert(entity, self.values.len());
                self.entities.push(entity);
                self.values.push(value);
                None
            }
        }
    }

    /// Remove the value for `entity`, if present.
    pub(crate) fn remove(&mut self, entity: Entity) -> Option<C> {
        let row = self.index.remove(&entity)?;
        self.entities.swap_remove(row);
        let value = self.values.swap_remove(row);
        if let Some(moved) = self.entities.get(row) {
            self.index.insert(*moved, row);
        }
        Some(value)
    }

    #[inline]
    pub fn get(&self, entity: Entity) -> Option<&C> {
        self.index.get(&entity).map(|&row| &self.values[row])
    }

    #[inline]
    pub fn get_mut(&mut self, entity: Entity) -> Option<&mut C> {
        self.index.get(&entity).map(|&row| &mut self.values[row])
    }

    #[inline]
    pub fn contains(&self, entity: Entity) -> bool {
        self.index.contains_key(&entity)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The entities holding this kind, in store order.
    #[inline]
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    /// Iterate `(entity, value)` pairs in store order.
    pub fn iter(&self) -> impl Iterator<Item = (Entity, &C)> {
        self.entities.iter().copied().zip(self.values.iter())
    }

    /// Iterate `(entity, value)` pairs in store order with mutable values.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Entity, &mut C)> {
        self.entities.iter().copied().zip(self.values.iter_mut())
    }

    /// Raw column access for query fetches.
    pub(crate) fn column(&mut self) -> Column<C> {
        Column {
            index: &self.index,
            base: self.values.as_mut_ptr(),
        }
    }
}

/// Raw pointers into a store, used by view parameters to hand out references per entity.
#[doc(hidden)]
pub struct Column<C> {
    index: *const HashMap<Entity, usize>,
    base: *mut C,
}

impl<C> Clone for Column<C> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<C> Copy for Column<C> {}

impl<C> Column<C> {
    /// Get the row pointer for `entity`.
    ///
    /// # Safety
    /// The store this column was taken from must still be alive and must not have been
    /// structurally modified since.
    #[inline]
    pub(crate) unsafe fn row(&self, entity: Entity) -> Option<*mut C> {
        unsafe { (*self.index).get(&entity).map(|&row| self.base.add(row)) }
    }
}

/// Type-erased view of a [`Store`] used by storage bookkeeping.
pub(crate) trait ErasedStore: Any {
    fn kind(&self) -> KindId;
    fn contains(&self, entity: Entity) -> bool;
    fn entities(&self) -> &[Entity];
    fn len(&self) -> usize;

    /// Drop the value for `entity`. Returns true if something was removed.
    fn remove_entity(&mut self, entity: Entity) -> bool;

    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<C: Component> ErasedStore for Store<C> {
    fn kind(&self) -> KindId {
        self.kind
    }

    fn contains(&self, entity: Entity) -> bool {
        Store::contains(self, entity)
    }

    fn entities(&self) -> &[Entity] {
        &self.entities
    }

    fn len(&self) -> usize {
        Store::len(self)
    }

    fn remove_entity(&mut self, entity: Entity) -> bool {
        self.remove(entity).is_some()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use shoal_macros::Component;

    use super::*;

    #[derive(Component, Debug, Clone, Copy, PartialEq)]
    struct Health(i32);

    fn store_with(values: &[(u64, i32)]) -> Store<Health> {
        let mut store = Store::new(KindId::new(0));
        for (id, hp) in values {
            store.insert(Entity::new(*id), Health(*hp));
        }
        store
    }

    #[test]
    fn insert_then_get() {
        // Given
        let store = store_with(&[(1, 10), (2, 20)]);

        // Then
        assert_eq!(store.get(Entity::new(1)), Some(&Health(10)));
        assert_eq!(store.get(Entity::new(2)), Some(&Health(20)));
        assert_eq!(store.get(Entity::new(3)), None);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn insert_overwrites_in_place() {
        // Given
        let mut store = store_with(&[(1, 10)]);

        // When
        let previous = store.insert(Entity::new(1), Health(99));

        // Then
        assert_eq!(previous, Some(Health(10)));
        assert_eq!(store.len(), 1);
        assert_eq!(store.get(Entity::new(1)), Some(&Health(99)));
    }

    #[test]
    fn remove_swaps_last_into_hole() {
        // Given
        let mut store = store_with(&[(1, 10), (2, 20), (3, 30)]);

        // When
        let removed = store.remove(Entity::new(1));

        // Then
        assert_eq!(removed, Some(Health(10)));
        assert_eq!(store.entities(), &[Entity::new(3), Entity::new(2)]);
        assert_eq!(store.get(Entity::new(3)), Some(&Health(30)));
        assert_eq!(store.get(Entity::new(2)), Some(&Health(20)));
        assert!(!store.contains(Entity::new(1)));
    }

    #[test]
    fn remove_missing_is_none() {
        // Given
        let mut store = store_with(&[(1, 10)]);

        // Then
        assert_eq!(store.remove(Entity::new(5)), None);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn iter_mut_updates_values() {
        // Given
        let mut store = store_with(&[(1, 10), (2, 20)]);

        // When
        for (_, health) in store.iter_mut() {
            health.0 += 1;
        }

        // Then
        let values: Vec<_> = store.iter().map(|(e, h)| (e.id(), h.0)).collect();
        assert_eq!(values, vec![(1, 11), (2, 21)]);
    }

    #[test]
    fn column_reads_rows() {
        // Given
        let mut store = store_with(&[(1, 10), (2, 20)]);

        // When
        let column = store.column();
        let row = unsafe { column.row(Entity::new(2)) };

        // Then
        assert_eq!(row.map(|ptr| unsafe { *ptr }), Some(Health(20)));
        assert!(unsafe { column.row(Entity::new(9)) }.is_none());
    }
}
