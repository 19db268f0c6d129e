//! Typed configuration stored as uniques.
//!
//! Every shape derives `Deserialize` with field defaults, so a loader can hand in partial
//! documents and the simulation still runs with the built-in tuning. Weight tables are
//! `BTreeMap`s: iteration order is the key order, which keeps weighted draws reproducible.

use std::collections::BTreeMap;

use serde::Deserialize;
use shoal_macros::Unique;

use crate::sim::{behavior::StateKind, geometry::Rect};

pub const DEFAULT_IDLE_DURATION: f32 = 1.0;
pub const DEFAULT_CRUISE_DURATION: f32 = 2.0;
pub const DEFAULT_CRUISE_SPEED: f32 = 80.0;
pub const DEFAULT_PELLET_SIZE: f32 = 12.0;

/// Maps a state name to a relative weight. Weights need not sum to one.
pub type WeightTable = BTreeMap<String, f32>;

/// Tuning for the behavior state machine.
#[derive(Unique, Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct BehaviorConfig {
    pub start_state_weights: WeightTable,
    pub idle_duration_range: [f32; 2],
    pub cruise_duration_range: [f32; 2],
    /// Outgoing weights keyed by the current state name.
    pub transition_weights: BTreeMap<String, WeightTable>,
    pub default_cruise_speed: f32,
    pub cruise_inner_margin: f32,
    pub cruise_fallback_radius: f32,
    pub cruise_retarget_min_distance: f32,
    pub cruise_retarget_distance_factor: f32,
}

impl Default for BehaviorConfig {
    fn default() -> Self {
        Self {
            start_state_weights: BTreeMap::from([
                (StateKind::Idle.name().to_string(), 0.5),
                (StateKind::Cruise.name().to_string(), 0.5),
            ]),
            idle_duration_range: [DEFAULT_IDLE_DURATION; 2],
            cruise_duration_range: [DEFAULT_CRUISE_DURATION; 2],
            transition_weights: BTreeMap::new(),
            default_cruise_speed: DEFAULT_CRUISE_SPEED,
            cruise_inner_margin: 40.0,
            cruise_fallback_radius: 200.0,
            cruise_retarget_min_distance: 8.0,
            cruise_retarget_distance_factor: 0.25,
        }
    }
}

impl BehaviorConfig {
    /// Outgoing weights of `state`, if any were configured.
    pub fn transitions_from(&self, state: StateKind) -> Option<&WeightTable> {
        self.transition_weights.get(state.name())
    }
}

/// Per-species data.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Species {
    /// Cruise speed drawn uniformly from `[lo, hi]`.
    pub speed_range: Option<[f32; 2]>,
    pub width: f32,
    pub height: f32,
}

impl Default for Species {
    fn default() -> Self {
        Self {
            speed_range: None,
            width: 32.0,
            height: 16.0,
        }
    }
}

#[derive(Unique, Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(transparent)]
pub struct SpeciesTable {
    pub species: BTreeMap<String, Species>,
}

impl SpeciesTable {
    pub fn with(mut self, name: impl Into<String>, species: Species) -> Self {
        self.species.insert(name.into(), species);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Species> {
        self.species.get(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct AvoidanceConfig {
    /// Distance from a wall at which avoidance starts. Zero disables avoidance.
    pub margin: f32,
    pub strength: f32,
    /// Speed factor applied when touching a wall; clamped to `[0, 1]`.
    pub brake_min_factor: f32,
}

impl Default for AvoidanceConfig {
    fn default() -> Self {
        Self {
            margin: 0.0,
            strength: 0.0,
            brake_min_factor: 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct RedirectConfig {
    pub min_speed: f32,
    pub tangent_jitter: f32,
}

/// Steering tuning. Zero caps are disabled.
#[derive(Unique, Debug, Clone, Copy, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct MovementConfig {
    pub max_accel: f32,
    pub max_speed: f32,
    pub avoidance: AvoidanceConfig,
    pub redirect: RedirectConfig,
}

/// Defaults for [`Falling`](crate::sim::components::Falling) fields left unset.
///
/// The `*_range` fields are drawn once per pellet when it is placed, so pellets dropped
/// together do not sway in step. A drawn value takes precedence over the shared default.
#[derive(Unique, Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct FallConfig {
    pub gravity: f32,
    pub terminal_velocity: f32,
    pub stop_on_floor: bool,
    pub wobble_amplitude: Option<f32>,
    pub wobble_frequency: Option<f32>,
    pub wobble_phase: Option<f32>,
    pub wobble_amplitude_range: Option<[f32; 2]>,
    pub wobble_frequency_range: Option<[f32; 2]>,
    pub wobble_phase_range: Option<[f32; 2]>,
    /// Starting wobble clock.
    pub wobble_time_range: Option<[f32; 2]>,
}

impl Default for FallConfig {
    fn default() -> Self {
        Self {
            gravity: 0.0,
            terminal_velocity: 0.0,
            stop_on_floor: true,
            wobble_amplitude: None,
            wobble_frequency: None,
            wobble_phase: None,
            wobble_amplitude_range: None,
            wobble_frequency_range: None,
            wobble_phase_range: None,
            wobble_time_range: None,
        }
    }
}

/// Size of the fallback containment region for entities outside any tank.
#[derive(Unique, Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct LogicalSize {
    pub width: f32,
    pub height: f32,
}

impl Default for LogicalSize {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
        }
    }
}

impl LogicalSize {
    pub fn bounds(&self) -> Rect {
        Rect::new(0.0, 0.0, self.width, self.height)
    }
}
