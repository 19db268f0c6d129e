//! Aquarium components.

use shoal_macros::Component;

use crate::{
    ecs::Entity,
    sim::{behavior::StateKind, config::FallConfig, geometry::Rect},
};

/// Top-left corner in logical units.
#[derive(Component, Debug, Clone, Copy, PartialEq, Default)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Logical units per second.
#[derive(Component, Debug, Clone, Copy, PartialEq, Default)]
pub struct Velocity {
    pub vx: f32,
    pub vy: f32,
}

impl Velocity {
    pub fn new(vx: f32, vy: f32) -> Self {
        Self { vx, vy }
    }

    pub fn speed(&self) -> f32 {
        (self.vx * self.vx + self.vy * self.vy).sqrt()
    }
}

/// Bounding size of an entity, used for containment.
#[derive(Component, Debug, Clone, Copy, PartialEq, Default)]
pub struct Extent {
    pub width: f32,
    pub height: f32,
}

impl Extent {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

#[derive(Component, Debug, Clone, PartialEq)]
pub struct Fish {
    pub species: String,
}

#[derive(Component, Debug, Clone, PartialEq)]
pub struct Tank {
    pub name: String,
    pub max_fish: usize,
}

/// The containment region of a tank entity.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct TankBounds(pub Rect);

/// Links an entity to the tank that contains it.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct InTank {
    pub tank: Entity,
}

/// Behavior state of an agent.
#[derive(Component, Debug, Clone, PartialEq)]
pub struct Brain {
    pub state: StateKind,
    pub time_in_state: f32,
    pub state_duration: f32,
    pub initialized: bool,
}

impl Default for Brain {
    fn default() -> Self {
        Self {
            state: StateKind::Idle,
            time_in_state: 0.0,
            state_duration: 0.0,
            initialized: false,
        }
    }
}

/// Desired velocity written by the behavior layer and consumed by movement.
#[derive(Component, Debug, Clone, Copy, PartialEq, Default)]
pub struct MovementIntent {
    pub vx: f32,
    pub vy: f32,
    pub debug_target: Option<(f32, f32)>,
}

impl MovementIntent {
    pub fn set(&mut self, vx: f32, vy: f32) {
        self.vx = vx;
        self.vy = vy;
    }

    pub fn clear(&mut self) {
        self.set(0.0, 0.0);
    }
}

/// Where a cruising agent is headed and how fast. Present only while cruising.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct CruiseTarget {
    pub x: f32,
    pub y: f32,
    pub speed: f32,
}

/// Fall parameters. `None` fields read the [`FallConfig`] unique at update time.
#[derive(Component, Debug, Clone, PartialEq)]
pub struct Falling {
    pub gravity: Option<f32>,
    pub terminal_velocity: Option<f32>,
    pub stop_on_floor: bool,
    pub grounded: bool,
    pub wobble_amplitude: Option<f32>,
    pub wobble_frequency: Option<f32>,
    pub wobble_phase: Option<f32>,
    pub wobble_clock: f32,
}

impl Default for Falling {
    fn default() -> Self {
        Self {
            gravity: None,
            terminal_velocity: None,
            stop_on_floor: true,
            grounded: false,
            wobble_amplitude: None,
            wobble_frequency: None,
            wobble_phase: None,
            wobble_clock: 0.0,
        }
    }
}

impl Falling {
    /// A falling component that follows the configured defaults.
    pub fn from_config(config: &FallConfig) -> Self {
        Self {
            stop_on_floor: config.stop_on_floor,
            ..Self::default()
        }
    }

    /// Landed and expected to stay put.
    #[inline]
    pub fn is_resting(&self) -> bool {
        self.stop_on_floor && self.grounded
    }
}

#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Pellet {
    pub size: f32,
}
