//! Greedy autoplayer: picks the affordable purchase that pays itself back soonest.
//!
//! Used by the headless driver and the balance simulator. It only reads the
//! state and proposes intents; applying them is the queue's job.

use super::logic;
use super::progression;
use super::state::EconomyState;
use crate::input::Intent;

/// Purchases slower than this to pay back are skipped so currency can pile
/// up toward a prestige instead of being spent the moment it arrives.
pub const MAX_PAYBACK_SECS: f64 = 1_800.0;

/// Best-payback affordable purchase (upgrade or bonus), if any.
///
/// Rate gains are measured by applying the candidate to a scratch copy, so
/// bonus multipliers and the global multiplier are accounted for exactly.
pub fn best_purchase(state: &EconomyState) -> Option<Intent> {
    let rate = state.production_rate();
    let mut best: Option<(f64, Intent)> = None; // (payback_seconds, intent)

    let mut consider = |payback: Option<f64>, intent: Intent| {
        if let Some(payback) = payback.filter(|p| *p <= MAX_PAYBACK_SECS) {
            let dominated = best.as_ref().map_or(false, |(bp, _)| *bp <= payback);
            if !dominated {
                best = Some((payback, intent));
            }
        }
    };

    for u in &state.upgrades {
        let cost = u.current_cost();
        if state.progress.currency < cost || !state.is_unlocked(u) {
            continue;
        }
        let mut scratch = state.clone();
        if logic::purchase(&mut scratch, u.id()).is_ok() {
            let gain = scratch.production_rate() - rate;
            consider(
                progression::payback_seconds(cost, gain),
                Intent::Buy(u.id().to_string()),
            );
        }
    }

    for b in &state.bonuses {
        let cost = b.definition.cost;
        if state.progress.currency < cost || !state.is_bonus_available(b) {
            continue;
        }
        let mut scratch = state.clone();
        if logic::purchase_bonus(&mut scratch, b.id()).is_ok() {
            let gain = scratch.production_rate() - rate;
            consider(
                progression::payback_seconds(cost, gain),
                Intent::BuyBonus(b.id().to_string()),
            );
        }
    }

    best.map(|(_, intent)| intent)
}

/// Prestige as soon as it grants anything.
pub fn wants_prestige(state: &EconomyState) -> bool {
    state.can_prestige()
}
