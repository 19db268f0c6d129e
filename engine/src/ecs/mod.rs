pub mod component;
pub mod entity;
pub mod event;
pub mod query;
pub mod schedule;
pub mod storage;
pub mod system;
pub mod unique;
pub(crate) mod util;
pub mod world;

pub use component::Component;
pub use entity::Entity;
pub use event::{Event, EventBus};
pub use schedule::{Phase, Scheduler};
pub use storage::{Store, UniqueError, Uniques};
pub use system::{Command, Commands, IntoSystem, System};
pub use unique::Unique;
pub use world::World;
