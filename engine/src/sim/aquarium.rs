//! The simulation facade: a world, a scheduler and the aquarium systems wired together.
//!
//! ```rust,ignore
//! let mut aquarium = Aquarium::new(AquariumConfig::default());
//! let tank = aquarium.create_tank("main", 12, Rect::new(0.0, 0.0, 800.0, 600.0));
//! aquarium.populate(tank, "guppy", 8, 50.0)?;
//!
//! loop {
//!     aquarium.update(dt);
//!     aquarium.render(dt);
//! }
//! ```

use log::info;
use rand_chacha::ChaCha8Rng;
use serde::Deserialize;

use crate::{
    core::time::FrameClock,
    ecs::{Entity, IntoSystem, Phase, Scheduler, World},
    sim::{
        behavior::BehaviorSystem,
        config::{BehaviorConfig, FallConfig, LogicalSize, MovementConfig, SpeciesTable},
        events::{Button, ClickWorld},
        falling::FallingSystem,
        geometry::Rect,
        movement::MovementSystem,
        placement::PlacementSystem,
        random::{ROOT_SEED, RngStreams, Stream},
        spawn::{self, SpawnError},
    },
};

/// Everything needed to build an [`Aquarium`]. Missing sections use their defaults.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AquariumConfig {
    pub seed: u64,
    pub logical_size: LogicalSize,
    pub behavior: BehaviorConfig,
    pub species: SpeciesTable,
    pub movement: MovementConfig,
    pub fall: FallConfig,
}

impl Default for AquariumConfig {
    fn default() -> Self {
        Self {
            seed: ROOT_SEED,
            logical_size: LogicalSize::default(),
            behavior: BehaviorConfig::default(),
            species: SpeciesTable::default(),
            movement: MovementConfig::default(),
            fall: FallConfig::default(),
        }
    }
}

pub struct Aquarium {
    world: World,
    scheduler: Scheduler,
    spawn_rng: ChaCha8Rng,
}

impl Aquarium {
    /// Registers configuration and random streams, then the logic systems in order placement,
    /// behavior, falling, movement.
    pub fn new(config: AquariumConfig) -> Self {
        let mut world = World::new();
        let streams = RngStreams::new(config.seed);
        {
            let uniques = world.uniques_mut();
            uniques.set(streams);
            uniques.set(config.logical_size);
            uniques.set(config.behavior);
            uniques.set(config.species);
            uniques.set(config.movement);
            uniques.set(config.fall);
            uniques.set(FrameClock::default());
        }

        let mut scheduler = Scheduler::new();
        let placement = PlacementSystem::new(&mut world);
        scheduler
            .add_system(placement)
            .add_system(BehaviorSystem::new(&world))
            .add_system(FallingSystem::new())
            .add_system(MovementSystem::new(&world));

        info!(
            "aquarium ready (seed {}, {} logic systems)",
            config.seed,
            scheduler.system_count(Phase::Logic)
        );
        Self {
            world,
            scheduler,
            spawn_rng: streams.stream(Stream::Spawn),
        }
    }

    #[inline]
    pub fn world(&self) -> &World {
        &self.world
    }

    #[inline]
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    /// Add a system after the built-in ones of its phase.
    pub fn add_system<M>(&mut self, system: impl IntoSystem<M>) -> &mut Self {
        self.scheduler.add_system(system);
        self
    }

    pub fn add_system_to<M>(&mut self, phase: Phase, system: impl IntoSystem<M>) -> &mut Self {
        self.scheduler.add_system_to(phase, system);
        self
    }

    /// One simulation step. Returns the number of commands flushed.
    pub fn update(&mut self, dt: f32) -> usize {
        self.scheduler.update(&mut self.world, dt)
    }

    pub fn render(&mut self, dt: f32) {
        self.scheduler.render(&mut self.world, dt);
    }

    /// Frames simulated so far.
    pub fn frame(&self) -> u64 {
        self.world
            .uniques()
            .try_get::<FrameClock>()
            .map_or(0, |clock| clock.frame)
    }

    /// Publish a click in logical coordinates, as the input adapter would.
    pub fn click(&mut self, x: f32, y: f32, button: Button) {
        self.world
            .events_mut()
            .publish(ClickWorld { x, y, button });
    }

    pub fn create_tank(&mut self, name: &str, max_fish: usize, bounds: Rect) -> Entity {
        spawn::create_tank(&mut self.world, name, max_fish, bounds)
    }

    pub fn spawn_fish_in_tank(
        &mut self,
        tank: Entity,
        species: &str,
        x: f32,
        y: f32,
    ) -> Result<Option<Entity>, SpawnError> {
        spawn::spawn_fish_in_tank(&mut self.world, tank, species, x, y)
    }

    /// Debug population: up to `count` fish at random points of `tank`, drawn from the spawn
    /// stream.
    pub fn populate(
        &mut self,
        tank: Entity,
        species: &str,
        count: usize,
        margin: f32,
    ) -> Result<Vec<Entity>, SpawnError> {
        spawn::populate_tank(
            &mut self.world,
            tank,
            species,
            count,
            margin,
            &mut self.spawn_rng,
        )
    }
}
