//! Steering and containment.
//!
//! Every entity with [`Position`], [`Velocity`] and [`Extent`] is integrated once per tick and
//! kept inside its containment region: the bounds of the tank it belongs to, or the
//! [`LogicalSize`] area when it has none.
//!
//! ```text
//! intent ─► accel cap ─► wall avoidance + brake ─► speed cap ─► integrate ─► boundary
//!                                                                            ├─ no intent: bounce
//!                                                                            ├─ intent: redirect
//!                                                                            └─ floor + stop: ground
//! ```
//!
//! Avoidance runs before integration and redirect after it, so an agent can be braked and
//! redirected within the same tick.

use std::collections::HashMap;

use rand_chacha::ChaCha8Rng;

use crate::{
    ecs::{Entity, System, World},
    sim::{
        components::{Extent, Falling, InTank, MovementIntent, Position, TankBounds, Velocity},
        config::{LogicalSize, MovementConfig},
        geometry::{Rect, clamp_length, clamp_range},
        random::{RngStreams, Stream, uniform},
    },
};

pub struct MovementSystem {
    rng: ChaCha8Rng,
}

/// Mutable view of one entity taking part in a movement step.
struct Body<'a> {
    pos: &'a mut Position,
    vel: &'a mut Velocity,
    extent: &'a Extent,
    intent: Option<&'a mut MovementIntent>,
    falling: Option<&'a mut Falling>,
}

/// Which wall was hit on one axis: -1 low side, 1 high side, 0 none.
type Hit = i8;

impl MovementSystem {
    pub fn new(world: &World) -> Self {
        let streams = world.uniques().get_or(RngStreams::default());
        Self {
            rng: streams.stream(Stream::Movement),
        }
    }

    fn step(&mut self, config: &MovementConfig, region: Rect, dt: f32, body: Body<'_>) {
        let Body {
            pos,
            vel,
            extent,
            mut intent,
            mut falling,
        } = body;

        let stop_on_floor = falling.as_ref().is_some_and(|falling| falling.stop_on_floor);
        if falling.as_ref().is_some_and(|falling| falling.is_resting()) {
            *vel = Velocity::default();
            return;
        }

        if let Some(intent) = intent.as_deref() {
            let (dvx, dvy) = (intent.vx - vel.vx, intent.vy - vel.vy);
            if config.max_accel > 0.0 {
                let (dvx, dvy) = clamp_length(dvx, dvy, config.max_accel * dt);
                vel.vx += dvx;
                vel.vy += dvy;
            } else {
                vel.vx = intent.vx;
                vel.vy = intent.vy;
            }
        }

        let min_x = region.left();
        let max_x = region.right() - extent.width;
        let min_y = region.top();
        let max_y = region.bottom() - extent.height;

        if intent.is_some() && config.avoidance.margin > 0.0 {
            avoid_walls(config, dt, pos, vel, [min_x, max_x, min_y, max_y]);
        }

        if config.max_speed > 0.0 {
            (vel.vx, vel.vy) = clamp_length(vel.vx, vel.vy, config.max_speed);
        }

        pos.x += vel.vx * dt;
        pos.y += vel.vy * dt;

        let hit_x = resolve_axis(&mut pos.x, min_x, max_x);
        let hit_y = resolve_axis(&mut pos.y, min_y, max_y);
        if hit_x == 0 && hit_y == 0 {
            return;
        }

        if hit_y > 0 && stop_on_floor {
            *vel = Velocity::default();
            if let Some(falling) = falling.as_deref_mut() {
                falling.grounded = true;
            }
            return;
        }

        match intent.as_deref_mut() {
            Some(intent) => {
                let jitter = config.redirect.tangent_jitter;
                let (nx, ny) = (
                    self.inward(hit_x, jitter),
                    self.inward(hit_y, jitter),
                );
                let length = nx.hypot(ny);
                let speed = vel.speed().max(config.redirect.min_speed);
                if length > f32::EPSILON {
                    vel.vx = nx / length * speed;
                    vel.vy = ny / length * speed;
                }
                intent.set(vel.vx, vel.vy);
            }
            None => {
                if hit_x != 0 {
                    vel.vx = -vel.vx;
                }
                if hit_y != 0 {
                    vel.vy = -vel.vy;
                }
            }
        }
    }

    /// The inward normal component for a hit axis, or tangential jitter for an axis that was
    /// not hit.
    fn inward(&mut self, hit: Hit, jitter: f32) -> f32 {
        match hit {
            0 if jitter > 0.0 => uniform(&mut self.rng, -jitter, jitter),
            0 => 0.0,
            _ => -f32::from(hit),
        }
    }
}

/// Push away from walls closer than the avoidance margin, then brake by the closest one.
fn avoid_walls(
    config: &MovementConfig,
    dt: f32,
    pos: &Position,
    vel: &mut Velocity,
    [min_x, max_x, min_y, max_y]: [f32; 4],
) {
    let avoidance = &config.avoidance;
    let margin = avoidance.margin;
    // (distance, inward direction)
    let walls = [
        (pos.x - min_x, (1.0, 0.0)),
        (max_x - pos.x, (-1.0, 0.0)),
        (pos.y - min_y, (0.0, 1.0)),
        (max_y - pos.y, (0.0, -1.0)),
    ];

    let (mut push_x, mut push_y) = (0.0_f32, 0.0_f32);
    let mut closest = f32::INFINITY;
    for (distance, (dx, dy)) in walls {
        let distance = distance.max(0.0);
        closest = closest.min(distance);
        if distance < margin {
            let push = avoidance.strength * (1.0 - distance / margin) * dt;
            push_x += dx * push;
            push_y += dy * push;
        }
    }
    if config.max_accel > 0.0 {
        (push_x, push_y) = clamp_length(push_x, push_y, config.max_accel * dt);
    }
    vel.vx += push_x;
    vel.vy += push_y;

    if closest < margin {
        let floor = avoidance.brake_min_factor.clamp(0.0, 1.0);
        let t = (closest / margin).clamp(0.0, 1.0);
        let brake = floor + (1.0 - floor) * t;
        vel.vx *= brake;
        vel.vy *= brake;
    }
}

/// Clamp `value` into `[lo, hi]` and report which side was hit.
fn resolve_axis(value: &mut f32, lo: f32, hi: f32) -> Hit {
    let clamped = clamp_range(*value, lo, hi);
    let hit = if *value < clamped {
        -1
    } else if *value > clamped {
        1
    } else {
        0
    };
    *value = clamped;
    hit
}

impl System for MovementSystem {
    fn name(&self) -> &str {
        "movement"
    }

    fn update(&mut self, world: &mut World, dt: f32) {
        let config = world.uniques().get_or(MovementConfig::default());
        let fallback = world.uniques().get_or(LogicalSize::default()).bounds();
        let tanks: HashMap<Entity, Rect> = world
            .view::<(Entity, &TankBounds)>()
            .map(|(entity, bounds)| (entity, bounds.0))
            .collect();

        for (pos, vel, extent, intent, in_tank, falling) in world.view::<(
            &mut Position,
            &mut Velocity,
            &Extent,
            Option<&mut MovementIntent>,
            Option<&InTank>,
            Option<&mut Falling>,
        )>() {
            let region = in_tank
                .and_then(|in_tank| tanks.get(&in_tank.tank))
                .copied()
                .unwrap_or(fallback);
            let body = Body {
                pos,
                vel,
                extent,
                intent,
                falling,
            };
            self.step(&config, region, dt, body);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::config::{AvoidanceConfig, RedirectConfig};

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    fn world_with(config: MovementConfig) -> World {
        let mut world = World::new();
        world.uniques_mut().set(config);
        world
    }

    fn spawn_body(world: &mut World, x: f32, y: f32, vx: f32, vy: f32) -> Entity {
        world.spawn((
            Position::new(x, y),
            Velocity::new(vx, vy),
            Extent::new(10.0, 10.0),
        ))
    }

    #[test]
    fn acceleration_is_capped() {
        // Given
        let mut world = world_with(MovementConfig {
            max_accel: 10.0,
            ..MovementConfig::default()
        });
        let fish = spawn_body(&mut world, 400.0, 300.0, 0.0, 0.0);
        world.add_component(fish, MovementIntent {
            vx: 100.0,
            ..MovementIntent::default()
        });
        let mut system = MovementSystem::new(&world);

        // When
        system.update(&mut world, 0.5);

        // Then
        let vel = world.get::<Velocity>(fish).unwrap();
        assert!(approx(vel.vx, 5.0), "vx = {}", vel.vx);
        assert_eq!(vel.vy, 0.0);
        assert!(approx(world.get::<Position>(fish).unwrap().x, 402.5));
    }

    #[test]
    fn velocity_snaps_without_cap() {
        // Given
        let mut world = world_with(MovementConfig::default());
        let fish = spawn_body(&mut world, 400.0, 300.0, 0.0, 0.0);
        world.add_component(fish, MovementIntent {
            vx: 30.0,
            vy: -40.0,
            debug_target: None,
        });
        let mut system = MovementSystem::new(&world);

        // When
        system.update(&mut world, 0.1);

        // Then
        assert_eq!(*world.get::<Velocity>(fish).unwrap(), Velocity::new(30.0, -40.0));
    }

    #[test]
    fn passive_bodies_bounce() {
        // Given
        let mut world = world_with(MovementConfig::default());
        let ball = spawn_body(&mut world, 785.0, 300.0, 100.0, 20.0);
        let mut system = MovementSystem::new(&world);

        // When
        system.update(&mut world, 0.1);

        // Then
        assert_eq!(world.get::<Position>(ball).unwrap().x, 790.0);
        assert_eq!(*world.get::<Velocity>(ball).unwrap(), Velocity::new(-100.0, 20.0));
    }

    #[test]
    fn floor_hit_grounds_when_stopping() {
        // Given
        let mut world = world_with(MovementConfig::default());
        let pellet = spawn_body(&mut world, 100.0, 585.0, 3.0, 100.0);
        world.add_component(pellet, Falling::default());
        let mut system = MovementSystem::new(&world);

        // When
        system.update(&mut world, 0.1);

        // Then
        assert_eq!(world.get::<Position>(pellet).unwrap().y, 590.0);
        assert_eq!(*world.get::<Velocity>(pellet).unwrap(), Velocity::default());
        assert!(world.get::<Falling>(pellet).unwrap().grounded);
    }

    #[test]
    fn grounded_bodies_stay_put() {
        // Given
        let mut world = world_with(MovementConfig::default());
        let pellet = spawn_body(&mut world, 100.0, 590.0, 0.0, 50.0);
        world.add_component(pellet, Falling {
            grounded: true,
            ..Falling::default()
        });
        let mut system = MovementSystem::new(&world);

        // When
        system.update(&mut world, 0.1);

        // Then
        assert_eq!(*world.get::<Position>(pellet).unwrap(), Position::new(100.0, 590.0));
        assert_eq!(*world.get::<Velocity>(pellet).unwrap(), Velocity::default());
    }

    #[test]
    fn floor_bounces_when_not_stopping() {
        // Given
        let mut world = world_with(MovementConfig::default());
        let pellet = spawn_body(&mut world, 100.0, 585.0, 0.0, 100.0);
        world.add_component(pellet, Falling {
            stop_on_floor: false,
            ..Falling::default()
        });
        let mut system = MovementSystem::new(&world);

        // When
        system.update(&mut world, 0.1);

        // Then
        assert_eq!(world.get::<Velocity>(pellet).unwrap().vy, -100.0);
        assert!(!world.get::<Falling>(pellet).unwrap().grounded);
    }

    #[test]
    fn intent_driven_wall_hit_redirects_inward() {
        // Given
        let mut world = world_with(MovementConfig::default());
        let fish = spawn_body(&mut world, 785.0, 300.0, 0.0, 0.0);
        world.add_component(fish, MovementIntent {
            vx: 50.0,
            ..MovementIntent::default()
        });
        let mut system = MovementSystem::new(&world);

        // When
        system.update(&mut world, 0.2);

        // Then
        let vel = *world.get::<Velocity>(fish).unwrap();
        assert!(approx(vel.vx, -50.0));
        assert!(approx(vel.vy, 0.0));
        let intent = world.get::<MovementIntent>(fish).unwrap();
        assert_eq!((intent.vx, intent.vy), (vel.vx, vel.vy));
    }

    #[test]
    fn redirect_applies_speed_floor_and_jitter() {
        // Given
        let mut world = world_with(MovementConfig {
            redirect: RedirectConfig {
                min_speed: 40.0,
                tangent_jitter: 0.5,
            },
            ..MovementConfig::default()
        });
        let fish = spawn_body(&mut world, 0.0, 300.0, 0.0, 0.0);
        world.add_component(fish, MovementIntent {
            vx: -5.0,
            ..MovementIntent::default()
        });
        let mut system = MovementSystem::new(&world);

        // When
        system.update(&mut world, 0.1);

        // Then
        let vel = world.get::<Velocity>(fish).unwrap();
        assert!(approx(vel.speed(), 40.0), "speed = {}", vel.speed());
        assert!(vel.vx > 0.0);
        assert!(vel.vy.abs() <= vel.vx * 0.5 + 1e-4);
    }

    #[test]
    fn floor_stop_overrides_redirect() {
        // Given
        let mut world = world_with(MovementConfig::default());
        let fish = spawn_body(&mut world, 100.0, 589.0, 0.0, 0.0);
        world.add_component(fish, MovementIntent {
            vy: 50.0,
            ..MovementIntent::default()
        });
        world.add_component(fish, Falling::default());
        let mut system = MovementSystem::new(&world);

        // When
        system.update(&mut world, 0.1);

        // Then
        assert_eq!(*world.get::<Velocity>(fish).unwrap(), Velocity::default());
        assert!(world.get::<Falling>(fish).unwrap().grounded);
    }

    #[test]
    fn avoidance_pushes_and_brakes_near_walls() {
        // Given
        let mut world = world_with(MovementConfig {
            avoidance: AvoidanceConfig {
                margin: 50.0,
                strength: 100.0,
                brake_min_factor: 0.5,
            },
            ..MovementConfig::default()
        });
        let fish = spawn_body(&mut world, 10.0, 300.0, 0.0, 0.0);
        world.add_component(fish, MovementIntent {
            vx: -20.0,
            ..MovementIntent::default()
        });
        let mut system = MovementSystem::new(&world);

        // When
        system.update(&mut world, 0.1);

        // Then
        // push = 100 * (1 - 10/50) * 0.1 = 8, brake = 0.5 + 0.5 * 0.2 = 0.6
        let vel = world.get::<Velocity>(fish).unwrap();
        assert!(approx(vel.vx, -7.2), "vx = {}", vel.vx);
        assert!(approx(world.get::<Position>(fish).unwrap().x, 9.28));
    }

    #[test]
    fn avoidance_ignores_passive_bodies() {
        // Given
        let mut world = world_with(MovementConfig {
            avoidance: AvoidanceConfig {
                margin: 50.0,
                strength: 100.0,
                brake_min_factor: 0.5,
            },
            ..MovementConfig::default()
        });
        let ball = spawn_body(&mut world, 10.0, 300.0, -20.0, 0.0);
        let mut system = MovementSystem::new(&world);

        // When
        system.update(&mut world, 0.1);

        // Then
        assert_eq!(world.get::<Velocity>(ball).unwrap().vx, -20.0);
    }

    #[test]
    fn speed_is_capped() {
        // Given
        let mut world = world_with(MovementConfig {
            max_speed: 10.0,
            ..MovementConfig::default()
        });
        let fish = spawn_body(&mut world, 400.0, 300.0, 0.0, 0.0);
        world.add_component(fish, MovementIntent {
            vx: 30.0,
            vy: 40.0,
            debug_target: None,
        });
        let mut system = MovementSystem::new(&world);

        // When
        system.update(&mut world, 0.1);

        // Then
        let vel = world.get::<Velocity>(fish).unwrap();
        assert!(approx(vel.vx, 6.0));
        assert!(approx(vel.vy, 8.0));
    }

    #[test]
    fn tank_bounds_contain_members() {
        // Given
        let mut world = world_with(MovementConfig::default());
        let tank = world.spawn(TankBounds(Rect::new(100.0, 100.0, 200.0, 100.0)));
        let ball = spawn_body(&mut world, 285.0, 150.0, 100.0, 0.0);
        world.add_component(ball, InTank { tank });
        let mut system = MovementSystem::new(&world);

        // When
        system.update(&mut world, 0.1);

        // Then
        assert_eq!(world.get::<Position>(ball).unwrap().x, 290.0);
        assert_eq!(world.get::<Velocity>(ball).unwrap().vx, -100.0);
    }

    #[test]
    fn oversized_bodies_collapse_to_region_origin() {
        // Given
        let mut world = world_with(MovementConfig::default());
        world.uniques_mut().set(LogicalSize {
            width: 5.0,
            height: 600.0,
        });
        let ball = spawn_body(&mut world, 3.0, 300.0, 0.0, 0.0);
        let mut system = MovementSystem::new(&world);

        // When
        system.update(&mut world, 0.1);

        // Then
        assert_eq!(world.get::<Position>(ball).unwrap().x, 0.0);
    }
}
