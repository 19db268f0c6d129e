use std::fmt;

use rand_chacha::ChaCha8Rng;

use crate::{
    ecs::{Entity, World},
    sim::{
        behavior::{cruise, idle},
        components::{Brain, MovementIntent},
        config::{BehaviorConfig, Species},
    },
};

/// The closed set of behavior states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StateKind {
    Idle,
    Cruise,
}

impl StateKind {
    pub const ALL: [StateKind; 2] = [StateKind::Idle, StateKind::Cruise];

    /// The state used whenever a name cannot be resolved.
    pub const FALLBACK: StateKind = StateKind::Idle;

    pub const fn name(&self) -> &'static str {
        match self {
            StateKind::Idle => "idle",
            StateKind::Cruise => "cruise",
        }
    }

    pub fn from_name(name: &str) -> Option<StateKind> {
        Self::ALL.into_iter().find(|state| state.name() == name)
    }

    pub(crate) fn on_enter(self, ctx: &mut StateContext<'_>) {
        match self {
            StateKind::Idle => idle::on_enter(ctx),
            StateKind::Cruise => cruise::on_enter(ctx),
        }
    }

    /// `None` to stay, or the name of the state to switch to.
    pub(crate) fn update(self, ctx: &mut StateContext<'_>) -> Option<String> {
        match self {
            StateKind::Idle => idle::update(ctx),
            StateKind::Cruise => cruise::update(ctx),
        }
    }

    pub(crate) fn on_exit(self, ctx: &mut StateContext<'_>) {
        match self {
            StateKind::Idle => {}
            StateKind::Cruise => cruise::on_exit(ctx),
        }
    }
}

impl fmt::Display for StateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Everything a state callback may read or write for one agent.
pub(crate) struct StateContext<'a> {
    pub entity: Entity,
    pub world: &'a mut World,
    pub config: &'a BehaviorConfig,
    pub species: Option<&'a Species>,
    pub brain: &'a mut Brain,
    pub intent: &'a mut MovementIntent,
    pub rng: &'a mut ChaCha8Rng,
}
