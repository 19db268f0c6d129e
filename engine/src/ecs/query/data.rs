//! Complete view specifications.
//!
//! The [`Data`] trait is implemented by:
//! - Any single [`Parameter`] type (automatic implementation)
//! - Tuples of `Data` types, so `(Entity, &Position, &mut Velocity)` is a valid view
//!
//! [`Parameter`]: super::param::Parameter

use crate::{
    all_tuples,
    ecs::{
        entity::Entity,
        query::param::{Parameter, ParameterSpec},
        storage::Storage,
        world::{KindId, TypeRegistry},
    },
};

/// Types that can be used as the complete shape of a view.
pub trait Data {
    /// The item yielded per matching entity.
    type Item<'w>;

    /// Per invocation state captured before iteration starts.
    type State: Copy;

    /// Append the parameter specs of this type to `out`, in declaration order.
    fn collect_specs(registry: &TypeRegistry, out: &mut Vec<ParameterSpec>);

    /// Get the [`DataSpec`] for this view type.
    fn spec(registry: &TypeRegistry) -> DataSpec {
        let mut params = Vec::new();
        Self::collect_specs(registry, &mut params);
        DataSpec::new(params)
    }

    /// Capture whatever is needed to fetch items during iteration.
    fn prepare(storage: &mut Storage) -> Self::State;

    /// Fetch the item for `entity`, or `None` if a required component is missing.
    ///
    /// # Safety
    /// Same contract as [`Parameter::fetch`], and the spec of `Self` must be valid.
    unsafe fn fetch<'w>(entity: Entity, state: Self::State) -> Option<Self::Item<'w>>;
}

impl<P: Parameter> Data for P {
    type Item<'w> = P::Value<'w>;
    type State = P::State;

    fn collect_specs(registry: &TypeRegistry, out: &mut Vec<ParameterSpec>) {
        out.push(P::spec(registry));
    }

    fn prepare(storage: &mut Storage) -> Self::State {
        P::prepare(storage)
    }

    unsafe fn fetch<'w>(entity: Entity, state: Self::State) -> Option<Self::Item<'w>> {
        unsafe { P::fetch(entity, state) }
    }
}

macro_rules! tuple_data {
    ($($name: ident),*) => {
        impl<$($name: Data),*> Data for ($($name,)*) {
            type Item<'w> = ($(<$name as Data>::Item<'w>,)*);
            type State = ($(<$name as Data>::State,)*);

            fn collect_specs(registry: &TypeRegistry, out: &mut Vec<ParameterSpec>) {
                $(<$name as Data>::collect_specs(registry, out);)*
            }

            fn prepare(storage: &mut Storage) -> Self::State {
                ($(<$name as Data>::prepare(storage),)*)
            }

            #[allow(non_snake_case)]
            unsafe fn fetch<'w>(entity: Entity, state: Self::State) -> Option<Self::Item<'w>> {
                let ($($name,)*) = state;
                Some(($(unsafe { <$name as Data>::fetch(entity, $name)? },)*))
            }
        }
    }
}

all_tuples!(tuple_data);

/// A description of everything a view accesses.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DataSpec {
    params: Vec<ParameterSpec>,
}

impl DataSpec {
    #[inline]
    pub const fn new(params: Vec<ParameterSpec>) -> Self {
        Self { params }
    }

    #[inline]
    pub fn params(&self) -> &[ParameterSpec] {
        &self.params
    }

    /// The kinds an entity must hold to match, in declaration order. Optional components and
    /// the entity parameter do not restrict matches.
    pub fn required_kinds(&self) -> Vec<KindId> {
        self.params
            .iter()
            .filter_map(|param| match param {
                ParameterSpec::Component {
                    kind,
                    optional: false,
                    ..
                } => Some(*kind),
                _ => None,
            })
            .collect()
    }

    /// A spec is valid when no kind requested mutably is requested a second time.
    pub fn is_valid(&self) -> bool {
        let components: Vec<(KindId, bool)> = self
            .params
            .iter()
            .filter_map(|param| match param {
                ParameterSpec::Component { kind, mutable, .. } => Some((*kind, *mutable)),
                ParameterSpec::Entity => None,
            })
            .collect();
        components.iter().enumerate().all(|(i, (kind, mutable))| {
            components[i + 1..]
                .iter()
                .all(|(other, other_mutable)| other != kind || !(*mutable || *other_mutable))
        })
    }
}
