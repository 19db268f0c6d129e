//! View result iterator.
//!
//! [`Result`] walks the cached entity list of a view and fetches the requested data for each
//! entity. It mutably borrows the world for its whole lifetime, so no structural change can
//! happen while it is alive.

use std::{marker::PhantomData, rc::Rc};

use crate::ecs::{entity::Entity, query::data::Data, storage::Storage};

/// An iterator over the items of a view.
///
/// Implements [`ExactSizeIterator`]: every listed entity holds all required kinds, so every
/// fetch succeeds.
///
/// ```rust,ignore
/// let results = world.view::<(&Position, &mut Velocity)>();
/// println!("Found {} entities", results.len());
/// for (pos, vel) in results {
///     vel.vx += pos.x * 0.01;
/// }
/// ```
pub struct Result<'w, D: Data> {
    /// Entities matching the view, in base order.
    entities: Rc<[Entity]>,

    /// Next position in `entities`.
    index: usize,

    /// Captured fetch state.
    state: D::State,

    /// Ties the iterator to the mutable borrow of the storage it reads.
    _marker: PhantomData<(&'w mut Storage, D)>,
}

impl<'w, D: Data> Result<'w, D> {
    /// # Safety
    /// `state` must have been prepared from the same storage `entities` was computed from, the
    /// storage must stay mutably borrowed for `'w`, and the spec of `D` must be valid.
    #[inline]
    pub(crate) unsafe fn new(entities: Rc<[Entity]>, state: D::State) -> Self {
        Self {
            entities,
            index: 0,
            state,
            _marker: PhantomData,
        }
    }

    /// The entities this view yields, including those already consumed.
    #[inline]
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }
}

impl<'w, D: Data> Iterator for Result<'w, D> {
    type Item = D::Item<'w>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(entity) = self.entities.get(self.index).copied() {
            self.index += 1;
            // Safety: guaranteed by the constructor contract; entities are distinct so
            // exclusive references never alias.
            if let Some(item) = unsafe { D::fetch(entity, self.state) } {
                return Some(item);
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.entities.len() - self.index;
        (remaining, Some(remaining))
    }
}

impl<'w, D: Data> ExactSizeIterator for Result<'w, D> {}
