use std::fmt;

/// One of the scheduler's ordered execution buckets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Phase {
    PreUpdate,
    Logic,
    PostUpdate,
    Render,
}

impl Phase {
    /// Every phase in execution order.
    pub const ALL: [Phase; 4] = [
        Phase::PreUpdate,
        Phase::Logic,
        Phase::PostUpdate,
        Phase::Render,
    ];

    /// The phases run by [`Scheduler::update`](super::Scheduler::update), in order.
    pub const UPDATE: [Phase; 3] = [Phase::PreUpdate, Phase::Logic, Phase::PostUpdate];

    #[inline]
    pub const fn index(&self) -> usize {
        *self as usize
    }

    pub const fn name(&self) -> &'static str {
        match self {
            Phase::PreUpdate => "pre-update",
            Phase::Logic => "logic",
            Phase::PostUpdate => "post-update",
            Phase::Render => "render",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
