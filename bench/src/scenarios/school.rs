//! Schools of fish spread over a grid of tanks.

use shoal_engine::sim::{
    Aquarium, AquariumConfig,
    components::Position,
    config::{AvoidanceConfig, MovementConfig, RedirectConfig, Species, SpeciesTable},
    geometry::Rect,
};

use crate::scenarios::Scenario;

#[derive(Debug, Clone, Copy)]
pub struct SchoolConfig {
    pub tanks: usize,
    pub fish_per_tank: usize,
    pub delta_time: f32,
    pub seed: u64,
}

impl Default for SchoolConfig {
    fn default() -> Self {
        Self {
            tanks: 4,
            fish_per_tank: 250,
            delta_time: 1.0 / 60.0,
            seed: 12345,
        }
    }
}

pub struct SchoolScenario {
    config: SchoolConfig,
    aquarium: Aquarium,
}

pub(crate) fn aquarium_config(seed: u64) -> AquariumConfig {
    AquariumConfig {
        seed,
        species: SpeciesTable::default().with(
            "guppy",
            Species {
                speed_range: Some([40.0, 90.0]),
                width: 24.0,
                height: 12.0,
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

impl SchoolScenario {
    pub fn with_config(config: SchoolConfig) -> Self {
        let aquarium = Aquarium::new(aquarium_config(config.seed));
        Self { config, aquarium }
    }

    pub fn aquarium_mut(&mut self) -> &mut Aquarium {
        &mut self.aquarium
    }

    fn tank_bounds(index: usize) -> Rect {
        let (col, row) = ((index % 4) as f32, (index / 4) as f32);
        Rect::new(col * 820.0, row * 620.0, 800.0, 600.0)
    }
}

impl Default for SchoolScenario {
    fn default() -> Self {
        Self::with_config(SchoolConfig::default())
    }
}

impl Scenario for SchoolScenario {
    fn name(&self) -> &'static str {
        "school"
    }

    fn entity_count(&mut self) -> usize {
        self.aquarium.world_mut().view::<&Position>().len()
    }

    fn setup(&mut self) {
        let per_tank = self.config.fish_per_tank;
        for index in 0..self.config.tanks {
            let tank = self
                .aquarium
                .create_tank(&format!("tank-{}", index), per_tank, Self::tank_bounds(index));
            if let Err(err) = self.aquarium.populate(tank, "guppy", per_tank, 40.0) {
                panic!("school setup failed: {}", err);
            }
        }
    }

    fn update(&mut self) {
        self.aquarium.update(self.config.delta_time);
    }
}
