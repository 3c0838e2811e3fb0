use std::time::{Duration, Instant};

/// Something that moves forward one fixed step at a time.
pub trait Simulation {
    type Outcome;

    fn step(&mut self) -> Self::Outcome;
}

/// Steps a simulation at a fixed wall-clock interval, independent of how
/// often the host loop polls.
///
/// At most one step fires per poll, and the clock restarts from the poll
/// that fired it. A stalled loop therefore slows the game down instead of
/// replaying the missed steps in a burst.
#[derive(Debug, Clone)]
pub struct Scheduler {
    interval: Duration,
    last_tick: Instant,
}

impl Scheduler {
    pub fn new(interval: Duration, now: Instant) -> Self {
        Scheduler { interval, last_tick: now }
    }

    pub fn poll<S: Simulation>(&mut self, now: Instant, sim: &mut S) -> Option<S::Outcome> {
        if now.saturating_duration_since(self.last_tick) < self.interval {
            return None;
        }

        self.last_tick = now;
        Some(sim.step())
    }

    /// How long the host may wait for input before the next step is due.
    pub fn time_until_due(&self, now: Instant) -> Duration {
        self.interval.saturating_sub(now.saturating_duration_since(self.last_tick))
    }
}
