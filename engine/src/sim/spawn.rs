//! Factories for tanks, fish and pellets, plus the per-tank population rules.

use std::fmt;

use log::debug;
use rand::Rng;

use crate::{
    ecs::{Entity, World},
    sim::{
        components::{
            Brain, Extent, Falling, Fish, InTank, MovementIntent, Pellet, Position, Tank,
            TankBounds, Velocity,
        },
        config::{FallConfig, SpeciesTable},
        geometry::Rect,
        random::uniform,
    },
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpawnError {
    UnknownSpecies { species: String },
    MissingTank { tank: Entity },
}

impl fmt::Display for SpawnError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpawnError::UnknownSpecies { species } => write!(f, "unknown species '{}'", species),
            SpawnError::MissingTank { tank } => write!(f, "entity {} has no tank bounds", tank),
        }
    }
}

impl std::error::Error for SpawnError {}

/// Create a tank entity with its containment bounds.
pub fn create_tank(world: &mut World, name: &str, max_fish: usize, bounds: Rect) -> Entity {
    world.spawn((
        Tank {
            name: name.to_string(),
            max_fish,
        },
        TankBounds(bounds),
    ))
}

/// Create a fish of `species` at `(x, y)`, sized from the [`SpeciesTable`] unique.
pub fn spawn_fish(world: &mut World, species: &str, x: f32, y: f32) -> Result<Entity, SpawnError> {
    let extent = world
        .uniques()
        .try_get::<SpeciesTable>()
        .and_then(|table| table.get(species))
        .map(|data| Extent::new(data.width, data.height))
        .ok_or_else(|| SpawnError::UnknownSpecies {
            species: species.to_string(),
        })?;

    Ok(world.spawn((
        Position::new(x, y),
        Velocity::default(),
        extent,
        Fish {
            species: species.to_string(),
        },
        Brain::default(),
        MovementIntent::default(),
    )))
}

/// Number of fish linked to `tank`.
pub fn fish_in_tank(world: &mut World, tank: Entity) -> usize {
    world
        .view::<(&Fish, &InTank)>()
        .filter(|(_, in_tank)| in_tank.tank == tank)
        .count()
}

/// Whether `tank` is below its cap. Entities without a [`Tank`] have no cap.
pub fn can_spawn_in_tank(world: &mut World, tank: Entity) -> bool {
    let Some(max_fish) = world.get::<Tank>(tank).map(|tank| tank.max_fish) else {
        return true;
    };
    fish_in_tank(world, tank) < max_fish
}

/// Spawn a fish inside `tank`, or return `None` when the tank is full.
pub fn spawn_fish_in_tank(
    world: &mut World,
    tank: Entity,
    species: &str,
    x: f32,
    y: f32,
) -> Result<Option<Entity>, SpawnError> {
    if !can_spawn_in_tank(world, tank) {
        debug!("tank {} is full, not spawning {}", tank, species);
        return Ok(None);
    }
    let fish = spawn_fish(world, species, x, y)?;
    world.add_component(fish, InTank { tank });
    Ok(Some(fish))
}

/// Fill `tank` with up to `count` fish at random points inset by `margin`.
///
/// The margin is clamped to half the tank size so tiny tanks still get valid points. Stops early
/// once the tank's cap is reached.
pub fn populate_tank(
    world: &mut World,
    tank: Entity,
    species: &str,
    count: usize,
    margin: f32,
    rng: &mut impl Rng,
) -> Result<Vec<Entity>, SpawnError> {
    let bounds = world
        .get::<TankBounds>(tank)
        .map(|bounds| bounds.0)
        .ok_or(SpawnError::MissingTank { tank })?;
    let mx = margin.clamp(0.0, bounds.width.max(0.0) * 0.5);
    let my = margin.clamp(0.0, bounds.height.max(0.0) * 0.5);

    let mut spawned = Vec::with_capacity(count);
    for _ in 0..count {
        let x = uniform(rng, bounds.left() + mx, bounds.right() - mx);
        let y = uniform(rng, bounds.top() + my, bounds.bottom() - my);
        match spawn_fish_in_tank(world, tank, species, x, y)? {
            Some(fish) => spawned.push(fish),
            None => break,
        }
    }
    Ok(spawned)
}

/// Components of a pellet dropped at `(x, y)` inside `tank`.
///
/// Wobble ranges configured in `fall` are drawn from `rng` for this pellet only.
pub fn pellet_bundle(
    x: f32,
    y: f32,
    tank: Entity,
    size: f32,
    fall: &FallConfig,
    rng: &mut impl Rng,
) -> (Pellet, Position, Velocity, Extent, InTank, Falling) {
    let mut draw = |range: Option<[f32; 2]>| range.map(|[lo, hi]| uniform(&mut *rng, lo, hi));
    let falling = Falling {
        wobble_amplitude: draw(fall.wobble_amplitude_range),
        wobble_frequency: draw(fall.wobble_frequency_range),
        wobble_phase: draw(fall.wobble_phase_range),
        wobble_clock: draw(fall.wobble_time_range).unwrap_or(0.0),
        ..Falling::from_config(fall)
    };
    (
        Pellet { size },
        Position::new(x, y),
        Velocity::default(),
        Extent::new(size, size),
        InTank { tank },
        falling,
    )
}
