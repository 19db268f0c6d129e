//! Systems: the units of work the scheduler runs.
//!
//! # Overview
//!
//! A [`System`] declares the [`Phase`] it belongs to and receives exclusive access to the
//! [`World`] plus the frame's `dt` on every run. Systems hold their own state (configuration
//! snapshots, random streams, event receivers) in `self`.
//!
//! Plain closures and functions of the form `FnMut(&mut World, f32)` are systems too, through
//! [`IntoSystem`]:
//!
//! ```rust,ignore
//! fn drift(world: &mut World, dt: f32) {
//!     for (pos, vel) in world.view::<(&mut Position, &Velocity)>() {
//!         pos.x += vel.vx * dt;
//!     }
//! }
//!
//! scheduler.add_system(drift);
//! scheduler.add_system_to(Phase::Render, |world: &mut World, _dt| {
//!     let _ = world.view::<&Position>().len();
//! });
//! ```
//!
//! # Structural changes
//!
//! Systems must not create or destroy entities directly while other systems may be iterating;
//! instead they queue [`Command`]s through [`Commands`], which the scheduler applies once per
//! update after the post-update phase.

mod command;

use std::{any::type_name, marker::PhantomData};

pub use command::{Command, CommandBuffer, Commands};

use crate::ecs::{schedule::Phase, world::World};

/// A unit of simulation logic run by the scheduler.
pub trait System: 'static {
    /// A human readable name, used in logs.
    fn name(&self) -> &str {
        type_name::<Self>()
    }

    /// The phase this system runs in when added without an explicit phase.
    fn phase(&self) -> Phase {
        Phase::Logic
    }

    /// Run the system for one frame.
    fn update(&mut self, world: &mut World, dt: f32);
}

/// Conversion of a value into a boxed [`System`].
///
/// The `Marker` parameter keeps the blanket implementations for systems and for functions
/// from overlapping.
pub trait IntoSystem<Marker> {
    type System: System;

    fn into_system(self) -> Self::System;
}

/// Marker for types that already implement [`System`].
pub struct IsSystem;

impl<S: System> IntoSystem<IsSystem> for S {
    type System = S;

    fn into_system(self) -> Self::System {
        self
    }
}

/// Marker for functions of the form `FnMut(&mut World, f32)`.
pub struct IsFunction;

impl<F> IntoSystem<IsFunction> for F
where
    F: FnMut(&mut World, f32) + 'static,
{
    type System = FunctionSystem<F>;

    fn into_system(self) -> Self::System {
        FunctionSystem {
            name: type_name::<F>(),
            func: self,
            _marker: PhantomData,
        }
    }
}

/// A system wrapping a function or closure. Runs in [`Phase::Logic`] unless added to an
/// explicit phase.
pub struct FunctionSystem<F> {
    name: &'static str,
    func: F,
    _marker: PhantomData<fn()>,
}

impl<F> System for FunctionSystem<F>
where
    F: FnMut(&mut World, f32) + 'static,
{
    fn name(&self) -> &str {
        self.name
    }

    fn update(&mut self, world: &mut World, dt: f32) {
        (self.func)(world, dt)
    }
}
