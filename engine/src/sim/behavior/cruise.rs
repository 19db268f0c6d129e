//! Cruise: swim toward random points inside the tank until the drawn duration runs out.

use std::f32::consts::TAU;

use crate::sim::{
    behavior::state::{StateContext, StateKind},
    components::{CruiseTarget, Extent, InTank, MovementIntent, Position, TankBounds},
    geometry::Rect,
    random::{uniform, weighted_pick},
};

pub(crate) fn on_enter(ctx: &mut StateContext<'_>) {
    let [lo, hi] = ctx.config.cruise_duration_range;
    ctx.brain.time_in_state = 0.0;
    ctx.brain.state_duration = uniform(ctx.rng, lo, hi);

    let speed = pick_speed(ctx);
    let (x, y) = pick_target(ctx);
    let target = CruiseTarget { x, y, speed };
    let from = position(ctx);
    ctx.world.add_component(ctx.entity, target);
    aim(ctx.intent, from, &target);
}

pub(crate) fn update(ctx: &mut StateContext<'_>) -> Option<String> {
    if ctx.brain.time_in_state >= ctx.brain.state_duration {
        let next = ctx
            .config
            .transitions_from(StateKind::Cruise)
            .and_then(|weights| weighted_pick(ctx.rng, weights))
            .unwrap_or(StateKind::Idle.name());
        return Some(next.to_string());
    }

    let from = position(ctx);
    let existing = ctx.world.get::<CruiseTarget>(ctx.entity).copied();
    let mut target = match existing {
        Some(target) => target,
        None => {
            let (x, y) = pick_target(ctx);
            CruiseTarget {
                x,
                y,
                speed: pick_speed(ctx),
            }
        }
    };

    let close_enough = ctx
        .config
        .cruise_retarget_min_distance
        .max(ctx.config.cruise_retarget_distance_factor * target.speed);
    let distance = (target.x - from.0).hypot(target.y - from.1);
    if distance <= close_enough {
        (target.x, target.y) = pick_target(ctx);
    }

    match ctx.world.get_mut::<CruiseTarget>(ctx.entity) {
        Some(stored) => *stored = target,
        None => ctx.world.add_component(ctx.entity, target),
    }
    aim(ctx.intent, from, &target);
    None
}

pub(crate) fn on_exit(ctx: &mut StateContext<'_>) {
    ctx.world.remove_component::<CruiseTarget>(ctx.entity);
    ctx.intent.debug_target = None;
}

fn pick_speed(ctx: &mut StateContext<'_>) -> f32 {
    match ctx.species.and_then(|species| species.speed_range) {
        Some([lo, hi]) => uniform(ctx.rng, lo, hi),
        None => ctx.config.default_cruise_speed,
    }
}

fn position(ctx: &StateContext<'_>) -> (f32, f32) {
    ctx.world
        .get::<Position>(ctx.entity)
        .map(|pos| (pos.x, pos.y))
        .unwrap_or_default()
}

/// A random point inside the agent's tank, or near the agent when it has no tank.
fn pick_target(ctx: &mut StateContext<'_>) -> (f32, f32) {
    let tank = ctx
        .world
        .get::<InTank>(ctx.entity)
        .and_then(|in_tank| ctx.world.get::<TankBounds>(in_tank.tank))
        .map(|bounds| bounds.0);

    match tank {
        Some(bounds) => {
            let extent = ctx
                .world
                .get::<Extent>(ctx.entity)
                .copied()
                .unwrap_or_default();
            let margin = ctx.config.cruise_inner_margin;
            let inner = Rect::new(
                bounds.x + margin,
                bounds.y + margin,
                bounds.width - 2.0 * margin - extent.width,
                bounds.height - 2.0 * margin - extent.height,
            );
            if inner.is_degenerate() {
                return inner.center();
            }
            (
                uniform(ctx.rng, inner.left(), inner.right()),
                uniform(ctx.rng, inner.top(), inner.bottom()),
            )
        }
        None => {
            let (x, y) = position(ctx);
            let angle = uniform(ctx.rng, 0.0, TAU);
            let radius = uniform(ctx.rng, 0.0, ctx.config.cruise_fallback_radius.max(0.0));
            (x + radius * angle.cos(), y + radius * angle.sin())
        }
    }
}

fn aim(intent: &mut MovementIntent, from: (f32, f32), target: &CruiseTarget) {
    let (dx, dy) = (target.x - from.0, target.y - from.1);
    let distance = dx.hypot(dy);
    if distance > f32::EPSILON {
        intent.set(dx / distance * target.speed, dy / distance * target.speed);
    } else {
        intent.clear();
    }
    intent.debug_target = Some((target.x, target.y));
}
