//! Gravity, terminal velocity and side to side wobble for sinking objects.

use std::f32::consts::TAU;

use crate::{
    ecs::{System, World},
    sim::{
        components::{Falling, Velocity},
        config::FallConfig,
    },
};

#[derive(Debug, Default)]
pub struct FallingSystem;

impl FallingSystem {
    pub fn new() -> Self {
        Self
    }
}

fn fall(defaults: &FallConfig, dt: f32, vel: &mut Velocity, falling: &mut Falling) {
    if falling.is_resting() {
        return;
    }

    let gravity = falling.gravity.unwrap_or(defaults.gravity);
    let terminal = falling.terminal_velocity.unwrap_or(defaults.terminal_velocity);

    vel.vy += gravity * dt;
    if terminal > 0.0 {
        vel.vy = if gravity >= 0.0 {
            vel.vy.min(terminal)
        } else {
            vel.vy.max(-terminal)
        };
    }

    let amplitude = falling
        .wobble_amplitude
        .or(defaults.wobble_amplitude)
        .unwrap_or(0.0);
    let frequency = falling
        .wobble_frequency
        .or(defaults.wobble_frequency)
        .unwrap_or(0.0);
    if amplitude != 0.0 && frequency != 0.0 {
        let phase = falling.wobble_phase.or(defaults.wobble_phase).unwrap_or(0.0);
        falling.wobble_clock += dt;
        vel.vx = amplitude * (TAU * frequency * falling.wobble_clock + phase).sin();
    }
}

impl System for FallingSystem {
    fn name(&self) -> &str {
        "falling"
    }

    fn update(&mut self, world: &mut World, dt: f32) {
        let defaults = world.uniques().get_or(FallConfig::default());
        for (vel, falling) in world.view::<(&mut Velocity, &mut Falling)>() {
            fall(&defaults, dt, vel, falling);
        }
    }
}
