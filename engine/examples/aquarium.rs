//! Headless aquarium run.
//!
//! Builds one tank, fills it with fish, drops a few pellets and simulates ten seconds of
//! variable host frames through a fixed step [`Stepper`]. A render system prints a small text
//! summary once per simulated second.

use std::time::Duration;

use log::LevelFilter;
use shoal_engine::{
    core::{FrameClock, Stepper},
    ecs::{Entity, Phase, World},
    sim::{
        Aquarium, AquariumConfig, StateKind,
        components::{Brain, Falling, Fish, Pellet, Position},
        config::{AvoidanceConfig, MovementConfig, RedirectConfig, Species, SpeciesTable},
        events::Button,
        geometry::Rect,
    },
};

fn config() -> AquariumConfig {
    AquariumConfig {
        species: SpeciesTable::default()
            .with(
                "guppy",
                Species {
                    speed_range: Some([40.0, 70.0]),
                    width: 24.0,
                    height: 12.0,
                },
            )
            .with(
                "tetra",
                Species {
                    speed_range: Some([60.0, 95.0]),
                    width: 18.0,
                    height: 8.0,
                },
            ),
        movement: MovementConfig {
            max_accel: 160.0,
            max_speed: 110.0,
            avoidance: AvoidanceConfig {
                margin: 30.0,
                strength: 220.0,
                brake_min_factor: 0.4,
            },
            redirect: RedirectConfig {
                min_speed: 25.0,
                tangent_jitter: 0.35,
            },
        },
        ..AquariumConfig::default()
    }
}

/// Prints once per simulated second, however many host frames that took.
fn summary() -> impl FnMut(&mut World, f32) {
    let mut last_second = 0;
    move |world: &mut World, _dt: f32| {
        let second = world
            .uniques()
            .try_get::<FrameClock>()
            .map_or(0, |clock| clock.frame / 60);
        if second == last_second {
            return;
        }
        last_second = second;
        print_summary(world, second);
    }
}

fn print_summary(world: &mut World, second: u64) {
    let cruising = world
        .view::<(&Fish, &Brain)>()
        .filter(|(_, brain)| brain.state == StateKind::Cruise)
        .count();
    let fish = world.view::<&Fish>().len();
    let pellets: Vec<(Entity, f32, bool)> = world
        .view::<(Entity, &Position, &Falling, &Pellet)>()
        .map(|(entity, pos, falling, _)| (entity, pos.y, falling.grounded))
        .collect();

    println!("t={:>2}s: {}/{} fish cruising", second, cruising, fish);
    for (entity, y, grounded) in pellets {
        let state = if grounded { "resting" } else { "sinking" };
        println!("       pellet {} at y={:.1} ({})", entity, y, state);
    }
}

fn main() {
    let logs = match shoal_engine::core::log::init(LevelFilter::Info) {
        Ok(receiver) => Some(receiver),
        Err(err) => {
            eprintln!("logging disabled: {}", err);
            None
        }
    };

    let mut aquarium = Aquarium::new(config());
    let tank = aquarium.create_tank("main", 12, Rect::new(0.0, 0.0, 800.0, 600.0));
    for species in ["guppy", "tetra"] {
        if let Err(err) = aquarium.populate(tank, species, 5, 50.0) {
            eprintln!("could not populate tank: {}", err);
            return;
        }
    }
    aquarium.add_system_to(Phase::Render, summary());

    // Uneven host frames; the stepper turns them into fixed steps.
    let host_frames = [12_u64, 20, 16, 33, 8, 17];
    let mut stepper = Stepper::default();
    let mut elapsed = Duration::ZERO;
    let mut host_frame = 0;
    while elapsed < Duration::from_secs(10) {
        let delta = Duration::from_millis(host_frames[host_frame % host_frames.len()]);
        elapsed += delta;
        host_frame += 1;

        if host_frame % 120 == 1 {
            let x = 100.0 + (host_frame as f32 * 7.0) % 600.0;
            aquarium.click(x, 40.0, Button::Left);
        }

        for _ in 0..stepper.advance(delta) {
            aquarium.update(stepper.step_seconds());
        }
        aquarium.render(stepper.step_seconds());

        if let Some(logs) = &logs {
            for message in logs.try_iter() {
                println!("[{}] {}", message.level, message.message);
            }
        }
    }

    println!(
        "simulated {} steps over {} host frames",
        stepper.steps_run(),
        host_frame
    );
}
