use std::any::{TypeId, type_name};

use crate::{
    all_tuples,
    ecs::{component::Component, entity::Entity, storage::Storage, world::KindId},
};

/// Trait describing a target that can have component values applied to it from a `Set`.
pub trait Target {
    fn apply<C: Component>(&mut self, value: C);
}

/// A trait describing a set of component values destined for one entity.
///
/// Examples of sets include: a single component type, a tuple of component types, or a
/// [`BoxedSet`] built by hand.
pub trait Set: Sized + 'static {
    /// Apply the component values in this set to the given target. This takes ownership of self.
    fn apply<T: Target>(self, target: &mut T);

    /// Erase the set so it can travel inside a command.
    fn into_boxed(self) -> BoxedSet {
        let mut boxed = BoxedSet::new();
        self.apply(&mut boxed);
        boxed
    }
}

/// Implement Set for single component types.
impl<C: Component> Set for C {
    fn apply<T: Target>(self, target: &mut T) {
        target.apply::<C>(self);
    }
}

impl Set for () {
    fn apply<T: Target>(self, _target: &mut T) {}
}

/// Implement Set for tuples of sets.
macro_rules! tuple_set {
    ($($name: ident),*) => {
        impl<$($name: Set),*> Set for ($($name,)*) {
            fn apply<CT: Target>(self, target: &mut CT) {
                #[allow(non_snake_case)]
                let ( $($name,)* ) = self;
                $(<$name as Set>::apply($name, target);)*
            }
        }
    }
}

all_tuples!(tuple_set);

/// A single type-erased component value.
pub(crate) trait ErasedValue: Send {
    /// The rust type of the wrapped value.
    fn value_type(&self) -> TypeId;

    /// The rust type name of the wrapped value, for diagnostics.
    fn value_name(&self) -> &'static str;

    /// Move the value into its store for `entity`, returning the kind it was stored under.
    fn insert_into(self: Box<Self>, storage: &mut Storage, entity: Entity) -> KindId;
}

struct Value<C>(C);

impl<C: Component> ErasedValue for Value<C> {
    fn value_type(&self) -> TypeId {
        TypeId::of::<C>()
    }

    fn value_name(&self) -> &'static str {
        type_name::<C>()
    }

    fn insert_into(self: Box<Self>, storage: &mut Storage, entity: Entity) -> KindId {
        storage.insert(entity, self.0)
    }
}

/// An owned, type-erased bundle of component values.
///
/// Each component type appears at most once; adding a value of a type already present replaces
/// the earlier value.
#[derive(Default)]
pub struct BoxedSet {
    values: Vec<Box<dyn ErasedValue>>,
}

impl BoxedSet {
    /// Construct an empty set.
    pub fn new() -> Self {
        Self { values: Vec::new() }
    }

    /// Builder style addition of a component value.
    pub fn with<C: Component>(mut self, value: C) -> Self {
        self.push(value);
        self
    }

    /// Add a component value, replacing any earlier value of the same type.
    pub fn push<C: Component>(&mut self, value: C) {
        let boxed: Box<dyn ErasedValue> = Box::new(Value(value));
        match self
            .values
            .iter_mut()
            .find(|v| v.value_type() == TypeId::of::<C>())
        {
            Some(slot) => *slot = boxed,
            None => self.values.push(boxed),
        }
    }

    /// Does the set contain a value of type `C`?
    pub fn contains<C: Component>(&self) -> bool {
        self.values
            .iter()
            .any(|v| v.value_type() == TypeId::of::<C>())
    }

    /// The type names of the contained values, in insertion order.
    pub fn type_names(&self) -> Vec<&'static str> {
        self.values.iter().map(|v| v.value_name()).collect()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub(crate) fn into_values(self) -> Vec<Box<dyn ErasedValue>> {
        self.values
    }
}

impl Target for BoxedSet {
    fn apply<C: Component>(&mut self, value: C) {
        self.push(value);
    }
}
