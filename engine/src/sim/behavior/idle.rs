//! Idle: hold still for a drawn duration, then move on.

use crate::sim::{
    behavior::state::{StateContext, StateKind},
    random::{uniform, weighted_pick},
};

pub(crate) fn on_enter(ctx: &mut StateContext<'_>) {
    let [lo, hi] = ctx.config.idle_duration_range;
    ctx.brain.time_in_state = 0.0;
    ctx.brain.state_duration = uniform(ctx.rng, lo, hi);
    ctx.intent.clear();
}

pub(crate) fn update(ctx: &mut StateContext<'_>) -> Option<String> {
    if ctx.brain.time_in_state < ctx.brain.state_duration {
        return None;
    }
    let next = ctx
        .config
        .transitions_from(StateKind::Idle)
        .and_then(|weights| weighted_pick(ctx.rng, weights))
        .unwrap_or(StateKind::Cruise.name());
    Some(next.to_string())
}
