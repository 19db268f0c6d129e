use std::{collections::HashMap, rc::Rc};

use fixedbitset::FixedBitSet;

use crate::ecs::{entity::Entity, storage::Storage, world::KindId};

/// A cached list of the entities matching one set of required kinds.
struct CachedView {
    /// Bit per required kind, used to decide which views a structural change touches.
    mask: FixedBitSet,
    entities: Rc<[Entity]>,
}

/// Lazily built, invalidate-on-write cache of view entity lists.
///
/// Views are keyed by their ordered list of required kinds, since the first kind decides the
/// iteration order. Any structural change to a kind drops every cached view whose mask contains
/// it, so the next request rebuilds from live storage and a stale list is never observed.
#[derive(Default)]
pub struct ViewCache {
    entries: HashMap<Vec<KindId>, CachedView>,
    hits: u64,
    builds: u64,
}

impl ViewCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the entity list for `kinds`, building it from `storage` on a miss.
    pub fn get_or_build(&mut self, kinds: &[KindId], storage: &Storage) -> Rc<[Entity]> {
        if let Some(view) = self.entries.get(kinds) {
            self.hits += 1;
            return view.entities.clone();
        }

        self.builds += 1;
        let entities: Rc<[Entity]> = storage.intersect(kinds).into();
        let mut mask = FixedBitSet::with_capacity(
            kinds.iter().map(|kind| kind.index() + 1).max().unwrap_or(0),
        );
        for kind in kinds {
            mask.insert(kind.index());
        }
        log::trace!("built view {:?} with {} entities", kinds, entities.len());
        self.entries.insert(
            kinds.to_vec(),
            CachedView {
                mask,
                entities: entities.clone(),
            },
        );
        entities
    }

    /// Drop every cached view that depends on `kind`. Returns the number of views dropped.
    pub fn invalidate(&mut self, kind: KindId) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, view| !view.mask.contains(kind.index()));
        before - self.entries.len()
    }

    /// Drop every cached view.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Number of views currently cached.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `(hits, builds)` since creation.
    #[inline]
    pub fn stats(&self) -> (u64, u64) {
        (self.hits, self.builds)
    }
}
