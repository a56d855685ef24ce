//! Timer identifier type for the livelog's periodic status frames.
//!
//! A worker instance runs at most one [`crate::job::Job`] at a time, so
//! timers don't need an owner-scoped namespace the way a multi-entity
//! scheduler would; one well-known `TimerId` per purpose is enough.

crate::define_id! {
    /// Identifies a scheduled timer (set/cancelled via [`crate::effect::Effect`]).
    pub struct TimerId("tmr-");
}

impl TimerId {
    /// Timer driving the periodic enriched status frames while livelog is active.
    pub fn livelog() -> Self {
        Self::from_string("tmr-livelog")
    }
}

#[cfg(test)]
#[path = "timer_tests.rs"]
mod tests;
