//! Economy mutators: every state transition the outside world can request.
//!
//! Each function validates against the current state and either applies the
//! whole transition or returns an error without touching anything.

use tracing::{debug, info, warn};

use super::catalog::BonusTarget;
use super::progression;
use super::state::EconomyState;
use crate::error::EconomyError;

/// Buy one unit of an upgrade. Returns the new purchase count.
pub fn purchase(state: &mut EconomyState, id: &str) -> Result<u32, EconomyError> {
    let idx = match state.upgrade_index(id) {
        Some(i) => i,
        None => {
            warn!(upgrade = id, "purchase of unknown upgrade");
            return Err(EconomyError::UnknownUpgrade(id.to_string()));
        }
    };

    if !state.is_unlocked(&state.upgrades[idx]) {
        return Err(EconomyError::LockedUpgrade(id.to_string()));
    }

    let cost = state.upgrades[idx].current_cost();
    if state.progress.currency < cost {
        return Err(EconomyError::InsufficientFunds {
            needed: cost,
            available: state.progress.currency,
        });
    }

    state.progress.currency -= cost;
    state.upgrades[idx].purchase_count += 1;
    state.recompute_production_rate();

    let count = state.upgrades[idx].purchase_count;
    debug!(
        upgrade = id,
        count,
        cost,
        rate = state.production_rate(),
        "upgrade purchased"
    );
    Ok(count)
}

/// Buy a one-shot bonus upgrade and apply its multiplier.
pub fn purchase_bonus(state: &mut EconomyState, id: &str) -> Result<(), EconomyError> {
    let idx = match state.bonus_index(id) {
        Some(i) => i,
        None => {
            warn!(bonus = id, "purchase of unknown bonus upgrade");
            return Err(EconomyError::UnknownBonus(id.to_string()));
        }
    };

    let bonus = &state.bonuses[idx];
    if bonus.purchased {
        return Err(EconomyError::AlreadyPurchased(id.to_string()));
    }
    if !state.is_bonus_available(bonus) {
        return Err(EconomyError::RequirementsNotMet(id.to_string()));
    }
    let cost = bonus.definition.cost;
    if state.progress.currency < cost {
        return Err(EconomyError::InsufficientFunds {
            needed: cost,
            available: state.progress.currency,
        });
    }

    let multiplier = bonus.definition.multiplier;
    let target = bonus.definition.affects.clone();

    // Resolve the target before mutating so a bad id leaves the state as it was.
    let target_idx = match &target {
        BonusTarget::Upgrade(upgrade) => match state.upgrade_index(upgrade) {
            Some(i) => Some(i),
            None => {
                warn!(bonus = id, upgrade = upgrade.as_str(), "bonus targets unknown upgrade");
                return Err(EconomyError::UnknownUpgrade(upgrade.clone()));
            }
        },
        BonusTarget::All => None,
    };

    state.progress.currency -= cost;
    state.bonuses[idx].purchased = true;
    match target_idx {
        Some(i) => state.upgrades[i].rate_multiplier *= multiplier,
        None => state.progress.global_multiplier *= multiplier,
    }
    state.recompute_production_rate();

    debug!(bonus = id, ?target, multiplier, "bonus upgrade purchased");
    Ok(())
}

/// Manual click. Returns the currency gained.
pub fn register_click(state: &mut EconomyState) -> f64 {
    let gained = state.click_yield();
    state.progress.currency += gained;
    state.progress.currency_all_time += gained;
    state.progress.total_clicks += 1;

    let xp = state.leveling_config().map(|c| c.xp_per_click);
    if let Some(xp) = xp {
        add_xp(state, xp);
    }
    gained
}

/// Award XP through the leveling module. Returns the levels gained; always 0
/// for variants without leveling.
pub fn add_xp(state: &mut EconomyState, amount: u64) -> u32 {
    let config = match &state.leveling_config {
        Some(c) => c.clone(),
        None => return 0,
    };
    let levels = match state.progress.leveling.as_mut() {
        Some(progress) => progression::add_xp(progress, &config, amount),
        None => return 0,
    };
    if levels > 0 {
        state.progress.currency_per_click += levels as f64 * config.click_bonus_per_level;
        info!(
            levels,
            level = state.progress.leveling.as_ref().map(|l| l.level),
            per_click = state.progress.currency_per_click,
            "level up"
        );
    }
    levels
}

/// Passive production for `elapsed_secs`. Returns the currency gained.
///
/// Negative, NaN or infinite durations are rejected and leave the state as it
/// was, as is any duration long enough to overflow the currency.
pub fn tick(state: &mut EconomyState, elapsed_secs: f64) -> Result<f64, EconomyError> {
    if !elapsed_secs.is_finite() || elapsed_secs < 0.0 {
        warn!(elapsed_secs, "dropping tick with invalid duration");
        return Err(EconomyError::InvalidDuration(elapsed_secs));
    }
    let gained = state.production_rate() * elapsed_secs;
    let currency = state.progress.currency + gained;
    let all_time = state.progress.currency_all_time + gained;
    if !currency.is_finite() || !all_time.is_finite() {
        warn!(elapsed_secs, rate = state.production_rate(), "dropping tick that overflows currency");
        return Err(EconomyError::InvalidDuration(elapsed_secs));
    }
    state.progress.currency = currency;
    state.progress.currency_all_time = all_time;
    Ok(gained)
}

/// Trade current currency for prestige points. Returns the points gained.
///
/// Resets currency, purchase counts and bonus flags, then rebuilds the global
/// multiplier from the new point total. Per-upgrade bonus multipliers, the
/// click yield and leveling are kept.
pub fn prestige(state: &mut EconomyState) -> Result<u64, EconomyError> {
    let points = state.prestige_yield();
    if points == 0 {
        return Err(EconomyError::PrestigeNotAvailable);
    }

    let spent = state.progress.currency;
    state.progress.prestige_points += points;
    state.progress.prestige_count += 1;
    state.progress.currency = 0.0;
    for u in &mut state.upgrades {
        u.purchase_count = 0;
    }
    for b in &mut state.bonuses {
        b.purchased = false;
    }
    state.progress.global_multiplier =
        progression::prestige_multiplier(state.progress.prestige_points);
    state.recompute_production_rate();

    info!(
        points,
        total = state.progress.prestige_points,
        spent,
        multiplier = state.progress.global_multiplier,
        "prestige"
    );
    Ok(points)
}
