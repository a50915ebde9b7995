//! Progression math: pure functions over plain numbers.
//!
//! Nothing in here touches `EconomyState` directly; the mutators in `logic`
//! feed these helpers and store the results.

use super::catalog::{LevelingConfig, Requirement};
use super::state::{LevelProgress, UpgradeInstance};

/// Cost growth per purchase of the same upgrade.
pub const COST_GROWTH: f64 = 1.15;

/// Currency needed before prestige yields anything.
pub const PRESTIGE_THRESHOLD: f64 = 1_000_000.0;

/// Global multiplier granted per prestige point.
pub const PRESTIGE_BONUS_PER_POINT: f64 = 0.1;

/// Cost of the next unit: `floor(base_cost * 1.15^purchase_count)`.
pub fn scaled_cost(base_cost: f64, purchase_count: u32) -> f64 {
    let exp = i32::try_from(purchase_count).unwrap_or(i32::MAX);
    (base_cost * COST_GROWTH.powi(exp)).floor()
}

/// `global_multiplier * Σ(purchase_count * effective_rate)`.
pub fn aggregate_production_rate(upgrades: &[UpgradeInstance], global_multiplier: f64) -> f64 {
    let base: f64 = upgrades.iter().map(|u| u.production()).sum();
    base * global_multiplier
}

/// Prestige points currency would convert into right now.
///
/// `floor(log10(currency / 1e6))` at or above the threshold, `0` below it.
/// The logarithm is never evaluated for ratios under 1.
pub fn prestige_yield(currency: f64) -> u64 {
    if !currency.is_finite() || currency < PRESTIGE_THRESHOLD {
        return 0;
    }
    let ratio = currency / PRESTIGE_THRESHOLD;
    let mut points = ratio.log10().floor().max(0.0);
    // log10 can land a hair off on exact powers of ten.
    if 10f64.powf(points + 1.0) <= ratio {
        points += 1.0;
    } else if points > 0.0 && 10f64.powf(points) > ratio {
        points -= 1.0;
    }
    points as u64
}

/// Global multiplier after prestige: `1 + points * 0.1`.
pub fn prestige_multiplier(prestige_points: u64) -> f64 {
    1.0 + prestige_points as f64 * PRESTIGE_BONUS_PER_POINT
}

/// Every requirement must hold; an empty list is trivially satisfied.
///
/// `owned` maps an upgrade id to its purchase count. Ids it cannot resolve
/// count as unsatisfied.
pub fn requirements_satisfied<F>(requirements: &[Requirement], currency: f64, owned: F) -> bool
where
    F: Fn(&str) -> Option<u32>,
{
    requirements.iter().all(|req| match req {
        Requirement::Owned { upgrade, count } => owned(upgrade).is_some_and(|n| n >= *count),
        Requirement::Currency { amount } => currency >= *amount,
    })
}

/// Add XP and roll over as many level thresholds as it covers.
///
/// Returns the number of levels gained. Each rollover subtracts the threshold
/// and grows it by the configured factor (floored), so the loop is bounded by
/// the XP added in this call.
pub fn add_xp(progress: &mut LevelProgress, config: &LevelingConfig, amount: u64) -> u32 {
    progress.xp = progress.xp.saturating_add(amount);
    let mut gained = 0;
    while progress.xp >= progress.xp_to_next_level {
        progress.xp -= progress.xp_to_next_level;
        progress.level += 1;
        progress.xp_to_next_level = next_threshold(progress.xp_to_next_level, config.growth);
        gained += 1;
    }
    gained
}

fn next_threshold(current: u64, growth: f64) -> u64 {
    let next = (current as f64 * growth).floor();
    if next >= u64::MAX as f64 {
        u64::MAX
    } else {
        (next as u64).max(1)
    }
}

/// Seconds of production needed for the next unit to pay back its cost.
/// `None` when the unit produces nothing.
pub fn payback_seconds(cost: f64, rate_gain: f64) -> Option<f64> {
    if rate_gain > 0.0 {
        Some(cost / rate_gain)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leveling() -> LevelingConfig {
        LevelingConfig::default()
    }

    #[test]
    fn scaled_cost_examples() {
        assert_eq!(scaled_cost(10.0, 0), 10.0);
        assert_eq!(scaled_cost(10.0, 1), 11.0);
        assert_eq!(scaled_cost(10.0, 5), 20.0);
        assert_eq!(scaled_cost(100.0, 3), (100.0 * 1.15f64.powi(3)).floor());
    }

    #[test]
    fn prestige_yield_thresholds() {
        assert_eq!(prestige_yield(0.0), 0);
        assert_eq!(prestige_yield(999_999.0), 0);
        assert_eq!(prestige_yield(1_000_000.0), 0);
        assert_eq!(prestige_yield(9_999_999.0), 0);
        assert_eq!(prestige_yield(10_000_000.0), 1);
        assert_eq!(prestige_yield(99_999_999.0), 1);
        assert_eq!(prestige_yield(100_000_000.0), 2);
        assert_eq!(prestige_yield(1_000_000_000.0), 3);
        assert_eq!(prestige_yield(1e15), 9);
    }

    #[test]
    fn prestige_yield_rejects_non_finite() {
        assert_eq!(prestige_yield(f64::NAN), 0);
        assert_eq!(prestige_yield(f64::INFINITY), 0);
        assert_eq!(prestige_yield(-5.0), 0);
    }

    #[test]
    fn prestige_multiplier_is_ten_percent_per_point() {
        assert!((prestige_multiplier(0) - 1.0).abs() < f64::EPSILON);
        assert!((prestige_multiplier(3) - 1.3).abs() < 1e-12);
    }

    #[test]
    fn empty_requirements_are_satisfied() {
        assert!(requirements_satisfied(&[], 0.0, |_| None));
    }

    #[test]
    fn owned_and_currency_requirements() {
        let reqs = vec![
            Requirement::Owned {
                upgrade: "knife".into(),
                count: 5,
            },
            Requirement::Currency { amount: 100.0 },
        ];
        let four = |id: &str| (id == "knife").then_some(4);
        let five = |id: &str| (id == "knife").then_some(5);
        assert!(!requirements_satisfied(&reqs, 100.0, four));
        assert!(!requirements_satisfied(&reqs, 99.0, five));
        assert!(requirements_satisfied(&reqs, 100.0, five));
    }

    #[test]
    fn unresolvable_owned_requirement_fails() {
        let reqs = vec![Requirement::Owned {
            upgrade: "ghost".into(),
            count: 0,
        }];
        assert!(!requirements_satisfied(&reqs, 1e9, |_| None));
    }

    #[test]
    fn add_xp_crosses_one_threshold() {
        let mut p = LevelProgress {
            level: 1,
            xp: 90,
            xp_to_next_level: 100,
        };
        let gained = add_xp(&mut p, &leveling(), 20);
        assert_eq!(gained, 1);
        assert_eq!(p.level, 2);
        assert_eq!(p.xp, 10);
        assert_eq!(p.xp_to_next_level, 150);
    }

    #[test]
    fn add_xp_crosses_several_thresholds() {
        let mut p = LevelProgress::new(&leveling());
        // 100 + 150 + 225 = 475
        let gained = add_xp(&mut p, &leveling(), 480);
        assert_eq!(gained, 3);
        assert_eq!(p.level, 4);
        assert_eq!(p.xp, 5);
        assert_eq!(p.xp_to_next_level, 337);
    }

    #[test]
    fn add_xp_below_threshold_only_accumulates() {
        let mut p = LevelProgress::new(&leveling());
        assert_eq!(add_xp(&mut p, &leveling(), 99), 0);
        assert_eq!(p.level, 1);
        assert_eq!(p.xp, 99);
    }

    #[test]
    fn payback_none_without_production() {
        assert_eq!(payback_seconds(10.0, 0.0), None);
        assert_eq!(payback_seconds(10.0, 0.5), Some(20.0));
    }
}
