//! The agent brain: a small state machine that writes [`MovementIntent`].
//!
//! Every agent with a [`Fish`], a [`Brain`] and a [`MovementIntent`] is ticked once per frame:
//!
//! ```text
//! first tick ─► weighted start state ─► on_enter ─► initialized
//! each tick  ─► time_in_state += dt ─► update ─┬─► None: stay
//!                                              └─► Some(next): on_exit, reset timers, on_enter
//! ```
//!
//! States are the closed [`StateKind`] enum. Names coming from configuration that do not match a
//! state resolve to [`StateKind::FALLBACK`].

mod cruise;
mod idle;
mod state;

use log::{debug, trace};
use rand_chacha::ChaCha8Rng;

pub use state::StateKind;
pub(crate) use state::StateContext;

use crate::{
    ecs::{Entity, System, World},
    sim::{
        components::{Brain, Fish, MovementIntent},
        config::{BehaviorConfig, SpeciesTable},
        random::{RngStreams, Stream, weighted_pick},
    },
};

/// Drives every agent's [`Brain`].
pub struct BehaviorSystem {
    rng: ChaCha8Rng,
}

impl BehaviorSystem {
    /// Seeds the behavior stream from the world's [`RngStreams`] (default seed when absent).
    pub fn new(world: &World) -> Self {
        let streams = world.uniques().get_or(RngStreams::default());
        Self {
            rng: streams.stream(Stream::Behavior),
        }
    }

    fn tick(
        &mut self,
        world: &mut World,
        entity: Entity,
        config: &BehaviorConfig,
        species: &SpeciesTable,
        dt: f32,
    ) {
        let Some(fish) = world.get::<Fish>(entity) else {
            return;
        };
        let species = species.get(&fish.species);
        let (Some(mut brain), Some(mut intent)) = (
            world.get::<Brain>(entity).cloned(),
            world.get::<MovementIntent>(entity).copied(),
        ) else {
            return;
        };

        let mut ctx = StateContext {
            entity,
            world: &mut *world,
            config,
            species,
            brain: &mut brain,
            intent: &mut intent,
            rng: &mut self.rng,
        };

        if !ctx.brain.initialized {
            ctx.brain.state = pick_start_state(ctx.rng, config);
            let state = ctx.brain.state;
            state.on_enter(&mut ctx);
            ctx.brain.initialized = true;
        }

        ctx.brain.time_in_state += dt;

        let current = ctx.brain.state;
        if let Some(next) = current.update(&mut ctx) {
            if next != current.name() {
                current.on_exit(&mut ctx);
                let next = resolve(&next);
                trace!("{} {} -> {}", entity, current, next);
                ctx.brain.state = next;
                ctx.brain.time_in_state = 0.0;
                ctx.brain.state_duration = 0.0;
                next.on_enter(&mut ctx);
            }
        }

        if let Some(stored) = world.get_mut::<Brain>(entity) {
            *stored = brain;
        }
        if let Some(stored) = world.get_mut::<MovementIntent>(entity) {
            *stored = intent;
        }
    }
}

fn pick_start_state(rng: &mut ChaCha8Rng, config: &BehaviorConfig) -> StateKind {
    match weighted_pick(rng, &config.start_state_weights) {
        Some(name) => resolve(name),
        None => StateKind::FALLBACK,
    }
}

fn resolve(name: &str) -> StateKind {
    StateKind::from_name(name).unwrap_or_else(|| {
        debug!("unknown behavior state '{}', using {}", name, StateKind::FALLBACK);
        StateKind::FALLBACK
    })
}

impl System for BehaviorSystem {
    fn name(&self) -> &str {
        "behavior"
    }

    fn update(&mut self, world: &mut World, dt: f32) {
        let config = world.uniques().get_or(BehaviorConfig::default());
        let species = world.uniques().get_or(SpeciesTable::default());
        let agents: Vec<Entity> = world
            .view::<(Entity, &Fish, &Brain, &MovementIntent)>()
            .map(|(entity, ..)| entity)
            .collect();
        for entity in agents {
            self.tick(world, entity, &config, &species, dt);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::sim::{
        components::{CruiseTarget, Extent, InTank, Position, TankBounds},
        config::{Species, WeightTable},
        geometry::Rect,
    };

    fn weights(entries: &[(&str, f32)]) -> WeightTable {
        entries
            .iter()
            .map(|(name, weight)| (name.to_string(), *weight))
            .collect()
    }

    fn world_with(config: BehaviorConfig) -> World {
        let mut world = World::new();
        world.uniques_mut().set(config);
        world.uniques_mut().set(
            SpeciesTable::default().with(
                "guppy",
                Species {
                    speed_range: Some([10.0, 15.0]),
                    width: 20.0,
                    height: 10.0,
                },
            ),
        );
        world
    }

    fn spawn_agent(world: &mut World, species: &str) -> Entity {
        spawn_agent_in(world, species, Rect::new(0.0, 0.0, 400.0, 300.0))
    }

    fn spawn_agent_in(world: &mut World, species: &str, bounds: Rect) -> Entity {
        let tank = world.spawn(TankBounds(bounds));
        world.spawn((
            Fish {
                species: species.to_string(),
            },
            Brain::default(),
            MovementIntent::default(),
            Position::new(200.0, 150.0),
            Extent::new(20.0, 10.0),
            InTank { tank },
        ))
    }

    #[test]
    fn start_state_follows_weights() {
        // Given
        let mut world = world_with(BehaviorConfig {
            start_state_weights: weights(&[("cruise", 1.0), ("idle", 0.0)]),
            ..BehaviorConfig::default()
        });
        let fish = spawn_agent(&mut world, "guppy");
        let mut system = BehaviorSystem::new(&world);

        // When
        system.update(&mut world, 0.1);

        // Then
        let brain = world.get::<Brain>(fish).unwrap();
        assert_eq!(brain.state, StateKind::Cruise);
        assert!(brain.initialized);
        assert!(world.has::<CruiseTarget>(fish));
    }

    #[test]
    fn empty_start_weights_fall_back_to_idle() {
        // Given
        let mut world = world_with(BehaviorConfig {
            start_state_weights: BTreeMap::new(),
            ..BehaviorConfig::default()
        });
        let fish = spawn_agent(&mut world, "guppy");
        let mut system = BehaviorSystem::new(&world);

        // When
        system.update(&mut world, 0.1);

        // Then
        assert_eq!(world.get::<Brain>(fish).unwrap().state, StateKind::Idle);
    }

    #[test]
    fn idle_uses_configured_duration_and_stops() {
        // Given
        let mut world = world_with(BehaviorConfig {
            start_state_weights: weights(&[("idle", 1.0)]),
            idle_duration_range: [3.0, 3.0],
            ..BehaviorConfig::default()
        });
        let fish = spawn_agent(&mut world, "guppy");
        world.get_mut::<MovementIntent>(fish).unwrap().set(5.0, 5.0);
        let mut system = BehaviorSystem::new(&world);

        // When
        system.update(&mut world, 0.5);

        // Then
        let brain = world.get::<Brain>(fish).unwrap();
        assert_eq!(brain.state, StateKind::Idle);
        assert_eq!(brain.state_duration, 3.0);
        assert_eq!(brain.time_in_state, 0.5);
        let intent = world.get::<MovementIntent>(fish).unwrap();
        assert_eq!((intent.vx, intent.vy), (0.0, 0.0));
    }

    #[test]
    fn zero_cruise_start_weight_always_starts_idle() {
        // Given
        let config = BehaviorConfig {
            start_state_weights: weights(&[("idle", 1.0), ("cruise", 0.0)]),
            ..BehaviorConfig::default()
        };
        let mut world = world_with(config);
        let fish: Vec<Entity> = (0..20).map(|_| spawn_agent(&mut world, "guppy")).collect();
        let mut system = BehaviorSystem::new(&world);

        // When
        system.update(&mut world, 0.1);

        // Then
        for entity in fish {
            let brain = world.get::<Brain>(entity).unwrap();
            assert_eq!(brain.state, StateKind::Idle);
            assert!(brain.initialized);
            assert!(!world.has::<CruiseTarget>(entity));
        }
    }

    #[test]
    fn degenerate_cruise_region_targets_its_center() {
        // Given a tank smaller than twice the inner margin plus the fish
        let mut world = world_with(BehaviorConfig {
            start_state_weights: weights(&[("cruise", 1.0)]),
            cruise_inner_margin: 40.0,
            ..BehaviorConfig::default()
        });
        let fish = spawn_agent_in(&mut world, "guppy", Rect::new(0.0, 0.0, 60.0, 60.0));
        let mut system = BehaviorSystem::new(&world);

        // When
        system.update(&mut world, 0.1);

        // Then the inner rect is (40, 40, -40, -30), centered on (20, 25)
        let target = *world.get::<CruiseTarget>(fish).unwrap();
        assert_eq!((target.x, target.y), (20.0, 25.0));
        let intent = world.get::<MovementIntent>(fish).unwrap();
        assert_eq!(intent.debug_target, Some((20.0, 25.0)));
    }

    #[test]
    fn cruise_speed_comes_from_species_range() {
        // Given
        let mut world = world_with(BehaviorConfig {
            start_state_weights: weights(&[("cruise", 1.0)]),
            ..BehaviorConfig::default()
        });
        let fish = spawn_agent(&mut world, "guppy");
        let mut system = BehaviorSystem::new(&world);

        // When
        system.update(&mut world, 0.1);

        // Then
        let target = *world.get::<CruiseTarget>(fish).unwrap();
        assert!((10.0..=15.0).contains(&target.speed));
        let intent = world.get::<MovementIntent>(fish).unwrap();
        let speed = (intent.vx * intent.vx + intent.vy * intent.vy).sqrt();
        assert!((speed - target.speed).abs() < 1e-3);
        assert_eq!(intent.debug_target, Some((target.x, target.y)));
    }

    #[test]
    fn cruise_target_stays_inside_inset_tank() {
        // Given
        let mut world = world_with(BehaviorConfig {
            start_state_weights: weights(&[("cruise", 1.0)]),
            cruise_inner_margin: 40.0,
            ..BehaviorConfig::default()
        });
        let agents: Vec<Entity> = (0..20).map(|_| spawn_agent(&mut world, "guppy")).collect();
        let mut system = BehaviorSystem::new(&world);

        // When
        system.update(&mut world, 0.1);

        // Then
        for fish in agents {
            let target = world.get::<CruiseTarget>(fish).unwrap();
            assert!((40.0..=340.0).contains(&target.x), "x = {}", target.x);
            assert!((40.0..=250.0).contains(&target.y), "y = {}", target.y);
        }
    }

    #[test]
    fn unknown_species_uses_default_speed() {
        // Given
        let mut world = world_with(BehaviorConfig {
            start_state_weights: weights(&[("cruise", 1.0)]),
            default_cruise_speed: 33.0,
            ..BehaviorConfig::default()
        });
        let fish = spawn_agent(&mut world, "eel");
        let mut system = BehaviorSystem::new(&world);

        // When
        system.update(&mut world, 0.1);

        // Then
        assert_eq!(world.get::<CruiseTarget>(fish).unwrap().speed, 33.0);
    }

    #[test]
    fn idle_moves_to_cruise_once_duration_elapses() {
        // Given
        let mut world = world_with(BehaviorConfig {
            start_state_weights: weights(&[("idle", 1.0)]),
            idle_duration_range: [1.0, 1.0],
            ..BehaviorConfig::default()
        });
        let fish = spawn_agent(&mut world, "guppy");
        let mut system = BehaviorSystem::new(&world);

        // When
        system.update(&mut world, 0.6);
        let before = world.get::<Brain>(fish).unwrap().state;
        system.update(&mut world, 0.6);

        // Then
        assert_eq!(before, StateKind::Idle);
        let brain = world.get::<Brain>(fish).unwrap();
        assert_eq!(brain.state, StateKind::Cruise);
        assert_eq!(brain.time_in_state, 0.0);
        assert_eq!(brain.state_duration, 2.0);
        assert!(world.has::<CruiseTarget>(fish));
    }

    #[test]
    fn leaving_cruise_clears_target() {
        // Given
        let mut world = world_with(BehaviorConfig {
            start_state_weights: weights(&[("cruise", 1.0)]),
            cruise_duration_range: [0.5, 0.5],
            ..BehaviorConfig::default()
        });
        let fish = spawn_agent(&mut world, "guppy");
        let mut system = BehaviorSystem::new(&world);

        // When
        system.update(&mut world, 0.3);
        system.update(&mut world, 0.3);

        // Then
        assert_eq!(world.get::<Brain>(fish).unwrap().state, StateKind::Idle);
        assert!(!world.has::<CruiseTarget>(fish));
        let intent = world.get::<MovementIntent>(fish).unwrap();
        assert_eq!(intent.debug_target, None);
        assert_eq!((intent.vx, intent.vy), (0.0, 0.0));
    }

    #[test]
    fn unknown_next_state_falls_back_to_idle() {
        // Given
        let mut world = world_with(BehaviorConfig {
            start_state_weights: weights(&[("idle", 1.0)]),
            idle_duration_range: [0.1, 0.1],
            transition_weights: BTreeMap::from([("idle".to_string(), weights(&[("sleep", 1.0)]))]),
            ..BehaviorConfig::default()
        });
        let fish = spawn_agent(&mut world, "guppy");
        let mut system = BehaviorSystem::new(&world);

        // When
        system.update(&mut world, 0.2);

        // Then
        let brain = world.get::<Brain>(fish).unwrap();
        assert_eq!(brain.state, StateKind::Idle);
        assert_eq!(brain.time_in_state, 0.0);
        assert_eq!(brain.state_duration, 0.1);
    }

    #[test]
    fn cruise_retargets_when_close() {
        // Given
        let mut world = world_with(BehaviorConfig {
            start_state_weights: weights(&[("cruise", 1.0)]),
            cruise_duration_range: [10.0, 10.0],
            ..BehaviorConfig::default()
        });
        let fish = spawn_agent(&mut world, "guppy");
        let mut system = BehaviorSystem::new(&world);
        system.update(&mut world, 0.1);
        let first = *world.get::<CruiseTarget>(fish).unwrap();

        // When
        *world.get_mut::<Position>(fish).unwrap() = Position::new(first.x, first.y);
        system.update(&mut world, 0.1);

        // Then
        let second = *world.get::<CruiseTarget>(fish).unwrap();
        assert_ne!((first.x, first.y), (second.x, second.y));
        assert_eq!(first.speed, second.speed);
    }

    #[test]
    fn agents_without_brain_are_ignored() {
        // Given
        let mut world = world_with(BehaviorConfig::default());
        let loner = world.spawn((
            Fish {
                species: "guppy".into(),
            },
            MovementIntent::default(),
        ));
        let mut system = BehaviorSystem::new(&world);

        // When
        system.update(&mut world, 0.1);

        // Then
        assert!(!world.has::<Brain>(loner));
        assert!(!world.has::<CruiseTarget>(loner));
    }
}
