//! Fixed timestep clock decoupling real frame deltas from simulation ticks.

use siegeline_core::config;

/// Accumulates real elapsed time and emits whole fixed ticks. A late frame
/// emits several ticks to catch up, capped at `max_catchup` per advance;
/// backlog beyond the cap is discarded so a host stall cannot trigger an
/// ever-growing catch-up spiral.
pub struct FixedStepClock {
    tick_ms: f64,
    max_catchup: u32,
    accumulator_ms: f64,
}

impl FixedStepClock {
    pub fn new(tick_ms: f64) -> Self {
        Self {
            tick_ms,
            max_catchup: config::MAX_CATCHUP_TICKS,
            accumulator_ms: 0.0,
        }
    }

    pub fn with_max_catchup(tick_ms: f64, max_catchup: u32) -> Self {
        Self {
            tick_ms,
            max_catchup,
            accumulator_ms: 0.0,
        }
    }

    pub fn tick_ms(&self) -> f64 {
        self.tick_ms
    }

    /// Feed a real-time delta; returns how many fixed ticks to run now.
    pub fn advance(&mut self, delta_ms: f64) -> u32 {
        if delta_ms > 0.0 {
            self.accumulator_ms += delta_ms;
        }

        let mut ticks = 0u32;
        while self.accumulator_ms >= self.tick_ms && ticks < self.max_catchup {
            self.accumulator_ms -= self.tick_ms;
            ticks += 1;
        }

        if self.accumulator_ms >= self.tick_ms {
            let dropped = self.accumulator_ms - (self.accumulator_ms % self.tick_ms);
            log::debug!("clock dropped {dropped:.0}ms of backlog after a stall");
            self.accumulator_ms %= self.tick_ms;
        }

        ticks
    }

    /// Discard any accumulated backlog (used when ticking halts at game over).
    pub fn reset(&mut self) {
        self.accumulator_ms = 0.0;
    }
}
