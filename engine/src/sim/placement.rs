//! Turns [`ClickWorld`] events into pellets.
//!
//! Clicks arrive on the event bus whenever the input adapter publishes them and are buffered
//! in a channel. During logic the system drains the buffer, finds the tank under each click and
//! queues a pellet creation. The pellet exists after the end-of-frame flush.

use crossbeam::channel::Receiver;
use log::trace;
use rand_chacha::ChaCha8Rng;

use crate::{
    ecs::{Entity, System, World},
    sim::{
        components::{Tank, TankBounds},
        config::{DEFAULT_PELLET_SIZE, FallConfig},
        events::ClickWorld,
        geometry::{Rect, clamp_range},
        random::{RngStreams, Stream},
        spawn::pellet_bundle,
    },
};

pub struct PlacementSystem {
    clicks: Receiver<ClickWorld>,
    rng: ChaCha8Rng,
}

impl PlacementSystem {
    /// Subscribes to [`ClickWorld`] on the world's event bus. Pellet wobble is drawn from the
    /// placement stream of the world's [`RngStreams`].
    pub fn new(world: &mut World) -> Self {
        let streams = world.uniques().get_or(RngStreams::default());
        Self {
            clicks: world.events_mut().channel::<ClickWorld>(),
            rng: streams.stream(Stream::Placement),
        }
    }

    fn tank_at(world: &mut World, x: f32, y: f32) -> Option<(Entity, Rect)> {
        world
            .view::<(Entity, &Tank, &TankBounds)>()
            .find(|(_, _, bounds)| bounds.0.contains(x, y))
            .map(|(entity, _, bounds)| (entity, bounds.0))
    }
}

impl System for PlacementSystem {
    fn name(&self) -> &str {
        "placement"
    }

    fn update(&mut self, world: &mut World, _dt: f32) {
        let clicks: Vec<ClickWorld> = self.clicks.try_iter().collect();
        if clicks.is_empty() {
            return;
        }

        let fall = world.uniques().get_or(FallConfig::default());
        let commands = world.commands();
        let size = DEFAULT_PELLET_SIZE;
        for click in clicks {
            let Some((tank, bounds)) = Self::tank_at(world, click.x, click.y) else {
                trace!("click at ({}, {}) is outside every tank", click.x, click.y);
                continue;
            };
            let x = clamp_range(click.x, bounds.left(), bounds.right() - size);
            let y = clamp_range(click.y, bounds.top(), bounds.bottom() - size);
            let pellet = commands.create(pellet_bundle(x, y, tank, size, &fall, &mut self.rng));
            trace!("queued pellet {} in tank {}", pellet, tank);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{
        components::{Falling, InTank, Pellet, Position},
        events::Button,
        spawn::create_tank,
    };

    fn click(x: f32, y: f32) -> ClickWorld {
        ClickWorld {
            x,
            y,
            button: Button::Left,
        }
    }

    #[test]
    fn click_inside_tank_queues_pellet() {
        // Given
        let mut world = World::new();
        let tank = create_tank(&mut world, "main", 10, Rect::new(0.0, 0.0, 200.0, 100.0));
        let mut system = PlacementSystem::new(&mut world);
        world.events_mut().publish(click(50.0, 40.0));

        // When
        system.update(&mut world, 0.1);

        // Then
        assert_eq!(world.pending_commands(), 1);
        assert_eq!(world.view::<&Pellet>().len(), 0);
        world.flush_commands();
        let pellets: Vec<(Position, InTank)> = world
            .view::<(&Position, &InTank, &Pellet)>()
            .map(|(pos, in_tank, _)| (*pos, *in_tank))
            .collect();
        assert_eq!(pellets, vec![(Position::new(50.0, 40.0), InTank { tank })]);
    }

    #[test]
    fn pellet_is_clamped_inside_tank() {
        // Given
        let mut world = World::new();
        create_tank(&mut world, "main", 10, Rect::new(0.0, 0.0, 200.0, 100.0));
        let mut system = PlacementSystem::new(&mut world);
        world.events_mut().publish(click(200.0, 100.0));

        // When
        system.update(&mut world, 0.1);
        world.flush_commands();

        // Then
        let positions: Vec<Position> = world.view::<(&Position, &Pellet)>().map(|(pos, _)| *pos).collect();
        assert_eq!(positions, vec![Position::new(188.0, 88.0)]);
    }

    #[test]
    fn click_outside_tanks_is_ignored() {
        // Given
        let mut world = World::new();
        create_tank(&mut world, "main", 10, Rect::new(0.0, 0.0, 200.0, 100.0));
        let mut system = PlacementSystem::new(&mut world);
        world.events_mut().publish(click(500.0, 500.0));

        // When
        system.update(&mut world, 0.1);

        // Then
        assert_eq!(world.pending_commands(), 0);
    }

    #[test]
    fn clicks_are_consumed_once() {
        // Given
        let mut world = World::new();
        create_tank(&mut world, "main", 10, Rect::new(0.0, 0.0, 200.0, 100.0));
        let mut system = PlacementSystem::new(&mut world);
        world.events_mut().publish(click(10.0, 10.0));
        world.events_mut().publish(click(20.0, 10.0));

        // When
        system.update(&mut world, 0.1);
        system.update(&mut world, 0.1);
        world.flush_commands();

        // Then
        assert_eq!(world.view::<&Pellet>().len(), 2);
    }

    #[test]
    fn pellets_placed_together_wobble_independently() {
        // Given
        let mut world = World::new();
        world.uniques_mut().set(FallConfig {
            wobble_amplitude_range: Some([1.0, 3.0]),
            wobble_frequency_range: Some([0.5, 1.5]),
            wobble_phase_range: Some([0.0, 3.14]),
            wobble_time_range: Some([0.0, 2.0]),
            ..FallConfig::default()
        });
        create_tank(&mut world, "main", 10, Rect::new(0.0, 0.0, 200.0, 100.0));
        let mut system = PlacementSystem::new(&mut world);
        world.events_mut().publish(click(10.0, 10.0));
        world.events_mut().publish(click(20.0, 10.0));

        // When
        system.update(&mut world, 0.1);
        world.flush_commands();

        // Then
        let falls: Vec<Falling> = world
            .view::<(&Falling, &Pellet)>()
            .map(|(falling, _)| falling.clone())
            .collect();
        assert_eq!(falls.len(), 2);
        assert_ne!(falls[0].wobble_amplitude, falls[1].wobble_amplitude);
        assert_ne!(falls[0].wobble_phase, falls[1].wobble_phase);
        assert_ne!(falls[0].wobble_clock, falls[1].wobble_clock);
        for falling in &falls {
            assert!((1.0..=3.0).contains(&falling.wobble_amplitude.unwrap()));
            assert!((0.5..=1.5).contains(&falling.wobble_frequency.unwrap()));
            assert!((0.0..=2.0).contains(&falling.wobble_clock));
        }
    }
}
