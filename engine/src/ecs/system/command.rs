//! Deferred command buffer for structural world changes.
//!
//! Systems queue entity creation and destruction (and component insertion/removal) into a
//! [`CommandBuffer`] instead of applying them mid-iteration. The scheduler flushes the buffer
//! exactly once per update, after the post-update phase, so every structural change of a frame
//! lands at a single well-defined point.
//!
//! # Lifecycle
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────────┐
//! │                     Scheduler::update                         │
//! ├───────────────────────────────────────────────────────────────┤
//! │  PreUpdate ─┐                                                 │
//! │  Logic     ─┼──push──► CommandBuffer ──flush──► World         │
//! │  PostUpdate─┘                  (once, after PostUpdate)       │
//! └───────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! let commands = world.commands();
//! let pellet = commands.create((Position { x: 1.0, y: 2.0 }, Pellet { size: 4.0 }));
//! commands.destroy(old_pellet);
//!
//! // Later, at the flush point
//! world.flush_commands();
//! ```

use std::{
    any::{TypeId, type_name},
    sync::Arc,
};

use crossbeam::queue::SegQueue;

use crate::ecs::{
    component::{BoxedSet, Component, Set},
    entity::{Allocator, Entity},
    world::World,
};

/// A deferred world command.
pub enum Command {
    /// Create an entity with the given components.
    ///
    /// The entity id is pre-allocated when the command is created, so callers can refer to the
    /// entity before it exists in storage.
    Create { entity: Entity, set: BoxedSet },

    /// Remove an entity from every store.
    Destroy { entity: Entity },

    /// Add or overwrite components on an entity.
    Insert { entity: Entity, set: BoxedSet },

    /// Remove one component type from an entity. Absent components are ignored.
    Remove {
        entity: Entity,
        type_id: TypeId,
        type_name: &'static str,
    },
}

impl Command {
    /// A command removing component `C` from `entity`.
    pub fn remove<C: Component>(entity: Entity) -> Self {
        Command::Remove {
            entity,
            type_id: TypeId::of::<C>(),
            type_name: type_name::<C>(),
        }
    }

    /// The entity this command targets.
    pub fn entity(&self) -> Entity {
        match self {
            Command::Create { entity, .. }
            | Command::Destroy { entity }
            | Command::Insert { entity, .. }
            | Command::Remove { entity, .. } => *entity,
        }
    }
}

/// FIFO command queue built on a lock-free `SegQueue`.
#[derive(Default)]
pub struct CommandBuffer {
    commands: SegQueue<Command>,
}

impl CommandBuffer {
    /// Create a new empty command buffer.
    pub fn new() -> Self {
        Self {
            commands: SegQueue::new(),
        }
    }

    /// Push a command to the back of the queue.
    pub fn push(&self, command: Command) {
        self.commands.push(command);
    }

    /// Drain all commands in FIFO order. The buffer is empty after this call.
    pub fn drain(&self) -> Vec<Command> {
        let mut commands = Vec::with_capacity(self.commands.len());
        while let Some(cmd) = self.commands.pop() {
            commands.push(cmd);
        }
        commands
    }

    /// Number of queued commands.
    #[inline]
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Apply every queued command to the world in FIFO order, returning how many were applied.
    ///
    /// Commands pushed while flushing are left for the next flush.
    pub fn flush(&self, world: &mut World) -> usize {
        let commands = self.drain();
        let count = commands.len();
        for command in commands {
            match command {
                Command::Create { entity, set } => {
                    world.add_components(entity, set);
                }
                Command::Destroy { entity } => {
                    world.destroy_entity(entity);
                }
                Command::Insert { entity, set } => {
                    world.add_components(entity, set);
                }
                Command::Remove {
                    entity,
                    type_id,
                    type_name,
                } => {
                    if !world.remove_component_by_type_id(entity, type_id) {
                        log::trace!("{} had no {} to remove", entity, type_name);
                    }
                }
            }
        }
        if count > 0 {
            log::trace!("flushed {} commands", count);
        }
        count
    }
}

/// A cloneable handle for queueing deferred commands.
///
/// Entity ids for [`create`](Self::create) come from the world's allocator, so they are unique
/// and usable immediately (e.g. as an `InTank` target) even though the entity only materializes
/// at the next flush.
#[derive(Clone)]
pub struct Commands {
    buffer: Arc<CommandBuffer>,
    allocator: Arc<Allocator>,
}

impl Commands {
    pub(crate) fn new(buffer: Arc<CommandBuffer>, allocator: Arc<Allocator>) -> Self {
        Self { buffer, allocator }
    }

    /// Queue creation of a new entity with `set`, returning its pre-allocated id.
    pub fn create<S: Set>(&self, set: S) -> Entity {
        let entity = self.allocator.alloc();
        self.buffer.push(Command::Create {
            entity,
            set: set.into_boxed(),
        });
        entity
    }

    /// Queue destruction of `entity`.
    pub fn destroy(&self, entity: Entity) {
        self.buffer.push(Command::Destroy { entity });
    }

    /// Queue insertion of components on an existing entity.
    pub fn insert<S: Set>(&self, entity: Entity, set: S) {
        self.buffer.push(Command::Insert {
            entity,
            set: set.into_boxed(),
        });
    }

    /// Queue removal of component `C` from `entity`.
    pub fn remove<C: Component>(&self, entity: Entity) {
        self.buffer.push(Command::remove::<C>(entity));
    }

    /// Queue a prebuilt command.
    pub fn push(&self, command: Command) {
        self.buffer.push(command);
    }

    /// Number of commands waiting for the next flush.
    pub fn pending(&self) -> usize {
        self.buffer.len()
    }
}

#[cfg(test)]
mod tests {
    use shoal_macros::Component;

    use super::*;

    #[derive(Component, Debug, PartialEq)]
    struct Position {
        x: u8,
        y: u8,
    }

    #[derive(Component, Debug, PartialEq)]
    struct Velocity {
        dx: u8,
        dy: u8,
    }

    fn commands() -> Commands {
        Commands::new(Arc::new(CommandBuffer::new()), Arc::new(Allocator::new()))
    }

    #[test]
    fn drain_is_fifo() {
        // Given
        let buffer = CommandBuffer::new();
        for id in 1..=3 {
            buffer.push(Command::Destroy {
                entity: Entity::new(id),
            });
        }

        // When
        let drained: Vec<u64> = buffer.drain().iter().map(|c| c.entity().id()).collect();

        // Then
        assert_eq!(drained, vec![1, 2, 3]);
        assert!(buffer.is_empty());
    }

    #[test]
    fn create_pre_allocates_distinct_ids() {
        // Given
        let commands = commands();

        // When
        let a = commands.create((Position { x: 1, y: 2 }, Velocity { dx: 0, dy: 1 }));
        let b = commands.create(Position { x: 3, y: 4 });

        // Then
        assert_ne!(a, b);
        assert_eq!(commands.pending(), 2);
    }

    #[test]
    fn clones_share_the_queue() {
        // Given
        let commands = commands();
        let other = commands.clone();

        // When
        other.destroy(Entity::new(9));
        commands.remove::<Velocity>(Entity::new(9));

        // Then
        assert_eq!(commands.pending(), 2);
        assert_eq!(other.pending(), 2);
    }

    #[test]
    fn flush_applies_in_order() {
        // Given
        let mut world = World::new();
        let commands = world.commands();
        let entity = commands.create((Position { x: 1, y: 2 }, Velocity { dx: 0, dy: 1 }));
        commands.remove::<Velocity>(entity);
        commands.insert(entity, Position { x: 5, y: 5 });

        // When
        let applied = world.flush_commands();

        // Then
        assert_eq!(applied, 3);
        assert_eq!(world.get::<Position>(entity), Some(&Position { x: 5, y: 5 }));
        assert!(!world.has::<Velocity>(entity));
        assert_eq!(world.pending_commands(), 0);
    }

    #[test]
    fn create_then_destroy_leaves_nothing() {
        // Given
        let mut world = World::new();
        let commands = world.commands();
        let entity = commands.create(Position { x: 1, y: 1 });
        commands.destroy(entity);

        // When
        world.flush_commands();

        // Then
        assert!(!world.contains(entity));
    }
}
