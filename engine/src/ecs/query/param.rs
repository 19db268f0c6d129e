//! Individual view parameters.
//!
//! A [`Parameter`] is a single element of a view: the [`Entity`] itself, a shared or exclusive
//! component reference, or an optional component reference.
//!
//! | Parameter | Restricts matches | Yields |
//! |-----------|-------------------|--------|
//! | `Entity` | no | the entity |
//! | `&C` | yes | `&C` |
//! | `&mut C` | yes | `&mut C` |
//! | `Option<&C>` | no | `Some(&C)` or `None` |
//! | `Option<&mut C>` | no | `Some(&mut C)` or `None` |

use crate::ecs::{
    component::Component,
    entity::Entity,
    storage::{Column, Storage},
    world::{KindId, TypeRegistry},
};

/// A single element that can be requested from a view.
pub trait Parameter {
    /// The value yielded per entity, borrowing the world for `'w`.
    type Value<'w>;

    /// Per invocation state captured before iteration starts.
    type State: Copy;

    /// Describe this parameter. Registers the component kind if necessary.
    fn spec(registry: &TypeRegistry) -> ParameterSpec;

    /// Capture whatever is needed to fetch values during iteration.
    fn prepare(storage: &mut Storage) -> Self::State;

    /// Fetch the value for `entity`.
    ///
    /// # Safety
    /// `state` must come from [`prepare`](Self::prepare) on storage that has not been
    /// structurally modified since, and the caller must not hand out two exclusive references to
    /// the same component value.
    unsafe fn fetch<'w>(entity: Entity, state: Self::State) -> Option<Self::Value<'w>>;
}

/// Describes what a parameter accesses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParameterSpec {
    /// The entity itself. Always immutable and passed by value.
    Entity,

    /// A component of a given kind.
    Component {
        kind: KindId,
        mutable: bool,
        optional: bool,
    },
}

impl Parameter for Entity {
    type Value<'w> = Entity;
    type State = ();

    fn spec(_registry: &TypeRegistry) -> ParameterSpec {
        ParameterSpec::Entity
    }

    fn prepare(_storage: &mut Storage) -> Self::State {}

    unsafe fn fetch<'w>(entity: Entity, _state: Self::State) -> Option<Self::Value<'w>> {
        Some(entity)
    }
}

impl<C: Component> Parameter for &C {
    type Value<'w> = &'w C;
    type State = Option<Column<C>>;

    fn spec(registry: &TypeRegistry) -> ParameterSpec {
        ParameterSpec::Component {
            kind: registry.register::<C>(),
            mutable: false,
            optional: false,
        }
    }

    fn prepare(storage: &mut Storage) -> Self::State {
        storage.column::<C>()
    }

    unsafe fn fetch<'w>(entity: Entity, state: Self::State) -> Option<Self::Value<'w>> {
        unsafe { state?.row(entity).map(|ptr| &*ptr) }
    }
}

impl<C: Component> Parameter for &mut C {
    type Value<'w> = &'w mut C;
    type State = Option<Column<C>>;

    fn spec(registry: &TypeRegistry) -> ParameterSpec {
        ParameterSpec::Component {
            kind: registry.register::<C>(),
            mutable: true,
            optional: false,
        }
    }

    fn prepare(storage: &mut Storage) -> Self::State {
        storage.column::<C>()
    }

    unsafe fn fetch<'w>(entity: Entity, state: Self::State) -> Option<Self::Value<'w>> {
        unsafe { state?.row(entity).map(|ptr| &mut *ptr) }
    }
}

impl<C: Component> Parameter for Option<&C> {
    type Value<'w> = Option<&'w C>;
    type State = Option<Column<C>>;

    fn spec(registry: &TypeRegistry) -> ParameterSpec {
        ParameterSpec::Component {
            kind: registry.register::<C>(),
            mutable: false,
            optional: true,
        }
    }

    fn prepare(storage: &mut Storage) -> Self::State {
        storage.column::<C>()
    }

    /// Always succeeds: an entity without the component yields `None`.
    unsafe fn fetch<'w>(entity: Entity, state: Self::State) -> Option<Self::Value<'w>> {
        Some(unsafe { <&C as Parameter>::fetch(entity, state) })
    }
}

impl<C: Component> Parameter for Option<&mut C> {
    type Value<'w> = Option<&'w mut C>;
    type State = Option<Column<C>>;

    fn spec(registry: &TypeRegistry) -> ParameterSpec {
        ParameterSpec::Component {
            kind: registry.register::<C>(),
            mutable: true,
            optional: true,
        }
    }

    fn prepare(storage: &mut Storage) -> Self::State {
        storage.column::<C>()
    }

    /// Always succeeds: an entity without the component yields `None`.
    unsafe fn fetch<'w>(entity: Entity, state: Self::State) -> Option<Self::Value<'w>> {
        Some(unsafe { <&mut C as Parameter>::fetch(entity, state) })
    }
}
