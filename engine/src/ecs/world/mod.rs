//! The World is the central container for entities, components, uniques and events.
//!
//! # Architecture
//!
//! The World coordinates several subsystems:
//! - **Entity Allocator**: Hands out never reused entity ids; shared with [`Commands`]
//! - **Storage**: One typed [`Store`] per component kind
//! - **View Cache**: Lazily built entity lists for [`view`](World::view), invalidated on write
//! - **Command Buffer**: Deferred structural changes, applied by [`flush_commands`](World::flush_commands)
//! - **Uniques**: Singleton values keyed by type (configuration, clocks, random streams)
//! - **Event Bus**: Synchronous publish/subscribe
//!
//! # Example
//!
//! ```ignore
//! use shoal_engine::ecs::World;
//!
//! let mut world = World::new();
//!
//! let entity = world.spawn((Position { x: 0.0, y: 0.0 }, Velocity { vx: 1.0, vy: 0.0 }));
//!
//! for (pos, vel) in world.view::<(&mut Position, &Velocity)>() {
//!     pos.x += vel.vx;
//! }
//!
//! world.commands().destroy(entity);
//! world.flush_commands();
//! ```

mod type_registry;

use std::{
    any::{TypeId, type_name},
    marker::PhantomData,
    sync::Arc,
};

pub use type_registry::{KindId, TypeRegistry};

use crate::ecs::{
    component::{BoxedSet, Component, Set},
    entity::{Allocator, Entity},
    event::EventBus,
    query::{self, ViewCache},
    storage::{Storage, Store, Uniques},
    system::{Command, CommandBuffer, Commands},
};

/// The World is the central container for all entities, components and their relationships.
pub struct World {
    /// Entity id source, shared with every `Commands` handle.
    allocator: Arc<Allocator>,

    /// The storage for components in the world.
    storage: Storage,

    /// Cached view entity lists.
    views: ViewCache,

    /// Deferred structural commands.
    commands: Arc<CommandBuffer>,

    uniques: Uniques,

    events: EventBus,

    /// Marker to make World !Send. World must stay on the thread that created it.
    _not_send: PhantomData<*mut ()>,
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

impl World {
    pub fn new() -> Self {
        Self {
            allocator: Arc::new(Allocator::new()),
            storage: Storage::default(),
            views: ViewCache::new(),
            commands: Arc::new(CommandBuffer::new()),
            uniques: Uniques::new(),
            events: EventBus::new(),
            _not_send: PhantomData,
        }
    }

    #[inline]
    pub fn storage(&self) -> &Storage {
        &self.storage
    }

    #[inline]
    pub fn kinds(&self) -> &TypeRegistry {
        self.storage.registry()
    }

    #[inline]
    pub fn views(&self) -> &ViewCache {
        &self.views
    }

    /// Allocate a fresh, never before used entity. It holds no components yet.
    #[inline]
    pub fn create_entity(&mut self) -> Entity {
        self.allocator.alloc()
    }

    /// Create an entity and attach every component in `set`.
    pub fn spawn<S: Set>(&mut self, set: S) -> Entity {
        let entity = self.create_entity();
        self.add_components(entity, set.into_boxed());
        entity
    }

    /// Insert or overwrite a component on `entity`. Views depending on its kind are invalidated.
    pub fn add_component<C: Component>(&mut self, entity: Entity, value: C) {
        let kind = self.storage.insert(entity, value);
        self.views.invalidate(kind);
    }

    /// Insert or overwrite every component in a type-erased set.
    pub fn add_components(&mut self, entity: Entity, set: BoxedSet) {
        for value in set.into_values() {
            let kind = value.insert_into(&mut self.storage, entity);
            self.views.invalidate(kind);
        }
    }

    /// Remove component `C` from `entity`, returning it if present. Views are only invalidated
    /// when something was actually removed.
    pub fn remove_component<C: Component>(&mut self, entity: Entity) -> Option<C> {
        let (kind, value) = self.storage.remove::<C>(entity)?;
        self.views.invalidate(kind);
        Some(value)
    }

    /// Remove a component by rust type id. Returns true if something was removed.
    pub(crate) fn remove_component_by_type_id(&mut self, entity: Entity, type_id: TypeId) -> bool {
        match self.storage.remove_by_type_id(type_id, entity) {
            Some(kind) => {
                self.views.invalidate(kind);
                true
            }
            None => false,
        }
    }

    /// Remove `entity` from every store. Returns true if it held any component.
    ///
    /// Systems should queue [`Command::Destroy`] instead so destruction lands at the flush point.
    pub fn destroy_entity(&mut self, entity: Entity) -> bool {
        let touched = self.storage.remove_entity(entity);
        for kind in &touched {
            self.views.invalidate(*kind);
        }
        !touched.is_empty()
    }

    /// Does `entity` hold any component?
    #[inline]
    pub fn contains(&self, entity: Entity) -> bool {
        self.storage.contains(entity)
    }

    #[inline]
    pub fn get<C: Component>(&self, entity: Entity) -> Option<&C> {
        self.storage.get::<C>(entity)
    }

    /// Mutate a component value in place. Not a structural change, so views stay valid.
    #[inline]
    pub fn get_mut<C: Component>(&mut self, entity: Entity) -> Option<&mut C> {
        self.storage.get_mut::<C>(entity)
    }

    #[inline]
    pub fn has<C: Component>(&self, entity: Entity) -> bool {
        self.storage.has::<C>(entity)
    }

    /// The live store for `C`, created empty on first access.
    pub fn get_store<C: Component>(&mut self) -> &Store<C> {
        self.storage.store_or_create::<C>()
    }

    /// The live store for `C` with mutable values, created empty on first access.
    pub fn get_store_mut<C: Component>(&mut self) -> &mut Store<C> {
        self.storage.store_or_create::<C>()
    }

    /// The store for `C` through a shared borrow. `None` if the kind was never seen.
    #[inline]
    pub fn try_store<C: Component>(&self) -> Option<&Store<C>> {
        self.storage.store::<C>()
    }

    /// Iterate every entity holding all required components of `D`.
    ///
    /// # Panics
    /// Panics if `D` requests a component mutably more than once, e.g. `(&Foo, &mut Foo)`.
    pub fn view<D: query::Data>(&mut self) -> query::Result<'_, D> {
        let spec = D::spec(self.storage.registry());
        assert!(
            spec.is_valid(),
            "view aliasing violation: {} requests a component mutably more than once",
            type_name::<D>()
        );
        let entities = self
            .views
            .get_or_build(&spec.required_kinds(), &self.storage);
        let state = D::prepare(&mut self.storage);
        // Safety: the spec is valid, state and entities come from the same storage, and the
        // result borrows `self` mutably for its whole lifetime.
        unsafe { query::Result::new(entities, state) }
    }

    /// A handle for queueing deferred commands.
    #[inline]
    pub fn commands(&self) -> Commands {
        Commands::new(self.commands.clone(), self.allocator.clone())
    }

    /// Queue a prebuilt command.
    #[inline]
    pub fn queue_command(&self, command: Command) {
        self.commands.push(command);
    }

    /// Apply every queued command in FIFO order. Returns the number applied.
    pub fn flush_commands(&mut self) -> usize {
        let buffer = self.commands.clone();
        buffer.flush(self)
    }

    /// Number of commands waiting for the next flush.
    #[inline]
    pub fn pending_commands(&self) -> usize {
        self.commands.len()
    }

    #[inline]
    pub fn uniques(&self) -> &Uniques {
        &self.uniques
    }

    #[inline]
    pub fn uniques_mut(&mut self) -> &mut Uniques {
        &mut self.uniques
    }

    #[inline]
    pub fn events(&self) -> &EventBus {
        &self.events
    }

    #[inline]
    pub fn events_mut(&mut self) -> &mut EventBus {
        &mut self.events
    }
}
