//! Phase-ordered system execution.
//!
//! The [`Scheduler`] keeps one ordered list of systems per [`Phase`]. Registration order is
//! execution order; there is no dependency inference.
//!
//! ```text
//! Scheduler::update(world, dt)
//!   ├── FrameClock advanced
//!   ├── PreUpdate  ─► [input_bridge, ...]
//!   ├── Logic      ─► [placement, behavior, falling, movement, ...]
//!   ├── PostUpdate ─► [...]
//!   └── flush deferred commands (exactly once)
//!
//! Scheduler::render(world, dt)
//!   └── Render     ─► [draw, overlay, ...]   (never flushes)
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! let mut scheduler = Scheduler::new();
//! scheduler.add_system(BehaviorSystem::new(&world));
//! scheduler.add_system_to(Phase::Render, draw);
//!
//! loop {
//!     scheduler.update(&mut world, dt);
//!     scheduler.render(&mut world, dt);
//! }
//! ```

mod phase;

use log::{trace, warn};

pub use phase::Phase;

use crate::{
    core::time::FrameClock,
    ecs::{
        system::{IntoSystem, System},
        world::World,
    },
};

/// Ordered lists of systems per phase.
#[derive(Default)]
pub struct Scheduler {
    phases: [Vec<Box<dyn System>>; 4],
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a system to the phase it declares.
    pub fn add_system<M>(&mut self, system: impl IntoSystem<M>) -> &mut Self {
        let system = system.into_system();
        let phase = system.phase();
        self.push(phase, Box::new(system))
    }

    /// Append a system to an explicit phase, overriding the one it declares.
    pub fn add_system_to<M>(&mut self, phase: Phase, system: impl IntoSystem<M>) -> &mut Self {
        self.push(phase, Box::new(system.into_system()))
    }

    fn push(&mut self, phase: Phase, system: Box<dyn System>) -> &mut Self {
        trace!("adding system {} to {}", system.name(), phase);
        self.phases[phase.index()].push(system);
        self
    }

    /// Number of systems registered in `phase`.
    pub fn system_count(&self, phase: Phase) -> usize {
        self.phases[phase.index()].len()
    }

    /// Run one simulation step: pre-update, logic and post-update systems in order, then flush
    /// queued commands exactly once. Returns the number of commands applied.
    pub fn update(&mut self, world: &mut World, dt: f32) -> usize {
        world.uniques_mut().get_or_insert_with(FrameClock::default).advance(dt);
        for phase in Phase::UPDATE {
            self.run_phase(phase, world, dt);
        }
        world.flush_commands()
    }

    /// Run render systems only. Never flushes; commands queued by render systems stay pending
    /// until the next update.
    pub fn render(&mut self, world: &mut World, dt: f32) {
        let pending = world.pending_commands();
        self.run_phase(Phase::Render, world, dt);
        let queued = world.pending_commands().saturating_sub(pending);
        if queued > 0 {
            warn!(
                "render systems queued {} structural commands; they will apply on the next update",
                queued
            );
        }
    }

    fn run_phase(&mut self, phase: Phase, world: &mut World, dt: f32) {
        for system in self.phases[phase.index()].iter_mut() {
            system.update(world, dt);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, rc::Rc};

    use shoal_macros::Component;

    use super::*;
    use crate::ecs::Entity;

    #[derive(Component)]
    struct Marker;

    type Log = Rc<RefCell<Vec<&'static str>>>;

    fn logger(log: &Log, name: &'static str) -> impl FnMut(&mut World, f32) + 'static {
        let log = log.clone();
        move |_: &mut World, _: f32| log.borrow_mut().push(name)
    }

    #[test]
    fn update_runs_phases_in_order() {
        // Given
        let log: Log = Rc::default();
        let mut scheduler = Scheduler::new();
        scheduler
            .add_system_to(Phase::PostUpdate, logger(&log, "post"))
            .add_system_to(Phase::Render, logger(&log, "render"))
            .add_system(logger(&log, "logic-a"))
            .add_system_to(Phase::PreUpdate, logger(&log, "pre"))
            .add_system(logger(&log, "logic-b"));
        let mut world = World::new();

        // When
        scheduler.update(&mut world, 0.1);

        // Then
        assert_eq!(*log.borrow(), vec!["pre", "logic-a", "logic-b", "post"]);
        assert_eq!(scheduler.system_count(Phase::Logic), 2);
    }

    #[test]
    fn render_runs_render_only() {
        // Given
        let log: Log = Rc::default();
        let mut scheduler = Scheduler::new();
        scheduler
            .add_system(logger(&log, "logic"))
            .add_system_to(Phase::Render, logger(&log, "render"));
        let mut world = World::new();

        // When
        scheduler.render(&mut world, 0.1);

        // Then
        assert_eq!(*log.borrow(), vec!["render"]);
    }

    #[test]
    fn update_flushes_once_after_post_update() {
        // Given
        let seen: Rc<RefCell<Vec<usize>>> = Rc::default();
        let mut scheduler = Scheduler::new();
        scheduler.add_system(|world: &mut World, _dt: f32| {
            world.commands().create(Marker);
        });
        let observed = seen.clone();
        scheduler.add_system_to(Phase::PostUpdate, move |world: &mut World, _dt: f32| {
            observed.borrow_mut().push(world.view::<&Marker>().len());
        });
        let mut world = World::new();

        // When
        let first = scheduler.update(&mut world, 0.1);
        let second = scheduler.update(&mut world, 0.1);

        // Then
        assert_eq!(first, 1);
        assert_eq!(second, 1);
        assert_eq!(*seen.borrow(), vec![0, 1]);
        assert_eq!(world.view::<&Marker>().len(), 2);
    }

    #[test]
    fn commands_are_visible_from_next_pre_update() {
        // Given
        let seen: Rc<RefCell<Vec<usize>>> = Rc::default();
        let observed = seen.clone();
        let mut scheduler = Scheduler::new();
        scheduler.add_system_to(Phase::PreUpdate, move |world: &mut World, _dt: f32| {
            observed
                .borrow_mut()
                .push(world.view::<(Entity, &Marker)>().len());
        });
        scheduler.add_system(|world: &mut World, _dt: f32| {
            if world.view::<&Marker>().len() == 0 {
                world.commands().create(Marker);
            }
        });
        let mut world = World::new();

        // When
        scheduler.update(&mut world, 0.1);
        scheduler.update(&mut world, 0.1);

        // Then
        assert_eq!(*seen.borrow(), vec![0, 1]);
    }

    #[test]
    fn render_does_not_flush() {
        // Given
        let mut scheduler = Scheduler::new();
        scheduler.add_system_to(Phase::Render, |world: &mut World, _dt: f32| {
            world.commands().create(Marker);
        });
        let mut world = World::new();

        // When
        scheduler.render(&mut world, 0.1);

        // Then
        assert_eq!(world.pending_commands(), 1);
        assert_eq!(world.view::<&Marker>().len(), 0);
        assert_eq!(scheduler.update(&mut world, 0.1), 1);
        assert_eq!(world.view::<&Marker>().len(), 1);
    }

    #[test]
    fn update_advances_frame_clock() {
        // Given
        let mut scheduler = Scheduler::new();
        let mut world = World::new();

        // When
        scheduler.update(&mut world, 0.25);
        scheduler.update(&mut world, 0.25);

        // Then
        let clock = world.uniques().get::<FrameClock>();
        assert_eq!(clock.frame, 2);
        assert_eq!(clock.elapsed, 0.5);
        assert_eq!(clock.delta, 0.25);
    }
}
