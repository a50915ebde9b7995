//! Player intents and the per-frame queue that applies them.
//!
//! Front ends never touch the economy. They translate key presses, taps or
//! autoplayer decisions into `Intent`s and push them here; the frame loop
//! drains the queue once per frame in arrival order.

use std::collections::VecDeque;

use tracing::debug;

use crate::error::EconomyError;
use crate::games::{GameView, Outcome};

/// Something the player asked for.
#[derive(Debug, Clone, PartialEq)]
pub enum Intent {
    Click,
    /// Buy one unit of the upgrade with this id.
    Buy(String),
    /// Buy the bonus upgrade with this id.
    BuyBonus(String),
    Prestige,
}

#[derive(Debug, Default)]
pub struct IntentQueue {
    pending: VecDeque<Intent>,
}

impl IntentQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, intent: Intent) {
        self.pending.push_back(intent);
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Apply every pending intent in FIFO order and return one result per
    /// intent. Each intent sees the state left by the ones before it, so two
    /// purchases queued in the same frame cannot spend the same currency.
    pub fn process(&mut self, game: &mut dyn GameView) -> Vec<Result<Outcome, EconomyError>> {
        let mut results = Vec::with_capacity(self.pending.len());
        while let Some(intent) = self.pending.pop_front() {
            let result = game.dispatch(&intent);
            if let Err(e) = &result {
                debug!(?intent, error = %e, "intent rejected");
            }
            results.push(result);
        }
        results
    }
}
