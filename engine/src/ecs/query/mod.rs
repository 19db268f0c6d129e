//! Cached, typed views over entities and their components.
//!
//! # Architecture
//!
//! - **[Parameter]**: Individual view elements like `&Component`, `&mut Component`,
//!   `Option<&Component>`, or `Entity`.
//!
//! - **[Data]**: Complete view shapes composed of one or more parameters. Tuples of parameters
//!   automatically implement `Data`, allowing views like `(Entity, &Position, &mut Velocity)`.
//!
//! - **[ViewCache]**: The per-world cache of matching entity lists, keyed by the ordered list of
//!   required kinds and invalidated whenever one of those kinds gains or loses a value.
//!
//! - **[Result]**: The iterator returned by [`World::view`](crate::ecs::World::view).
//!
//! # Usage
//!
//! ```rust,ignore
//! for (entity, pos, vel) in world.view::<(Entity, &mut Position, &Velocity)>() {
//!     pos.x += vel.vx * dt;
//!     pos.y += vel.vy * dt;
//! }
//! ```
//!
//! # Matching
//!
//! Only required (non-optional) components restrict matches. The first required kind is the base:
//! items come out in the order of its store. A view without any required kind yields nothing.
//!
//! # Safety and Validation
//!
//! Requesting the same component twice where either request is mutable, e.g.
//! `(&Foo, &mut Foo)`, panics when the view is invoked.
//!
//! [Parameter]: param::Parameter
//! [Data]: data::Data
//! [Result]: result::Result

mod cache;
mod data;
mod param;
mod result;

pub use cache::ViewCache;
pub use data::{Data, DataSpec};
pub use param::{Parameter, ParameterSpec};
pub use result::Result;
