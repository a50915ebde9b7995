//! Wall-clock feed for passive production.
//!
//! The frame loop calls `advance()` once per frame with the current
//! timestamp. Production is driven by elapsed real time, not frame count, so
//! a dropped frame just means a larger elapsed value on the next one.

use tracing::warn;

use crate::error::EconomyError;
use crate::games::GameView;

pub struct TickClock {
    /// Timestamp (seconds) of the last applied tick.
    last_tick: f64,
    /// Total seconds fed into the economy since creation.
    pub total_elapsed: f64,
}

impl TickClock {
    /// Start a clock. `now` becomes the baseline, so the first `advance()`
    /// only covers time since construction.
    pub fn new(now: f64) -> Self {
        Self {
            last_tick: now,
            total_elapsed: 0.0,
        }
    }

    pub fn last_tick(&self) -> f64 {
        self.last_tick
    }

    /// Feed the time since the last tick into `game`. Returns the elapsed seconds.
    ///
    /// A timestamp behind the baseline (clock went backward) is rejected and
    /// becomes the new baseline, so the next frame measures from there. A NaN
    /// timestamp is rejected and the baseline is kept.
    pub fn advance(&mut self, game: &mut dyn GameView, now: f64) -> Result<f64, EconomyError> {
        if now.is_nan() {
            warn!("tick clock fed a NaN timestamp");
            return Err(EconomyError::InvalidDuration(f64::NAN));
        }
        let elapsed = now - self.last_tick;
        if elapsed < 0.0 || !elapsed.is_finite() {
            warn!(now, last = self.last_tick, "tick clock went backward, rebasing");
            if now.is_finite() {
                self.last_tick = now;
            }
            return Err(EconomyError::InvalidDuration(elapsed));
        }
        game.tick(elapsed)?;
        self.last_tick = now;
        self.total_elapsed += elapsed;
        Ok(elapsed)
    }
}
