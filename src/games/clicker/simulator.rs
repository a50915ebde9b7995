//! Balance simulator for the built-in variants.
//! Run with: cargo test simulate_ -- --nocapture

use super::autoplay;
use super::format::format_number;
use super::progression;
use super::state::EconomyState;
use crate::games::{create_game, GameView, Outcome, Variant};
use crate::input::{Intent, IntentQueue};

const CLICKS_PER_SECOND: u32 = 5;

struct Run {
    /// Second at which the first prestige went through.
    prestiged_at: Option<u32>,
    purchases: u32,
}

fn report(state: &EconomyState, second: u32, purchases: u32) {
    eprintln!("┌─── {}m{}s ─────────────────────────", second / 60, second % 60);
    eprintln!(
        "│ {}: {}  rate: {}/s  clicks: {}",
        state.currency_name,
        format_number(state.progress.currency),
        format_number(state.production_rate()),
        state.progress.total_clicks
    );
    let counts: Vec<String> = state
        .upgrades
        .iter()
        .map(|u| format!("{}:{}", u.id(), u.purchase_count))
        .collect();
    eprintln!("│ owned: {}", counts.join("  "));
    let bought: Vec<&str> = state
        .bonuses
        .iter()
        .filter(|b| b.purchased)
        .map(|b| b.id())
        .collect();
    if !bought.is_empty() {
        eprintln!("│ bonuses: {:?}", bought);
    }
    if let Some(l) = &state.progress.leveling {
        eprintln!("│ level {} ({}/{} xp)", l.level, l.xp, l.xp_to_next_level);
    }
    eprintln!("│ purchases: {}", purchases);
    eprintln!("└────────────────────────────────────");
}

/// The tracked rate must always equal a from-scratch recomputation.
fn assert_no_drift(state: &EconomyState) {
    let fresh =
        progression::aggregate_production_rate(&state.upgrades, state.progress.global_multiplier);
    assert!(
        (state.production_rate() - fresh).abs() <= 1e-9 * fresh.max(1.0),
        "rate drifted: tracked {} vs fresh {}",
        state.production_rate(),
        fresh
    );
}

/// Play `variant` with the greedy autoplayer in one-second steps until the
/// first prestige or `max_seconds`.
fn simulate(variant: Variant, max_seconds: u32) -> Run {
    let mut game = create_game(variant).unwrap();
    let mut queue = IntentQueue::new();
    let mut run = Run {
        prestiged_at: None,
        purchases: 0,
    };
    let report_times = [60, 300, 900, 1800, 3600, 7200];

    eprintln!("\n======== {} ========", variant);
    for second in 1..=max_seconds {
        for _ in 0..CLICKS_PER_SECOND {
            queue.push(Intent::Click);
        }
        queue.process(game.as_mut());
        game.tick(1.0).unwrap();

        if autoplay::wants_prestige(game.state()) {
            report(game.state(), second, run.purchases);
            queue.push(Intent::Prestige);
            let results = queue.process(game.as_mut());
            assert!(matches!(results[0], Ok(Outcome::Prestiged(_))));
            run.prestiged_at = Some(second);
            assert_no_drift(game.state());
            break;
        }

        // Buy best payback until nothing qualifies.
        for _ in 0..20 {
            let Some(intent) = autoplay::best_purchase(game.state()) else {
                break;
            };
            queue.push(intent);
            if queue.process(game.as_mut()).iter().all(|r| r.is_ok()) {
                run.purchases += 1;
            } else {
                break;
            }
        }
        assert_no_drift(game.state());
        assert!(game.state().progress.currency >= 0.0);

        if report_times.contains(&second) {
            report(game.state(), second, run.purchases);
        }
    }
    run
}

#[test]
fn simulate_meat_reaches_prestige() {
    let run = simulate(Variant::Meat, 4 * 3600);
    let at = run.prestiged_at.expect("meat never reached a prestige in 4h");
    eprintln!("meat: first prestige at {}s after {} purchases", at, run.purchases);
    assert!(run.purchases > 0);
}

#[test]
fn simulate_bakery_reaches_prestige() {
    let run = simulate(Variant::Bakery, 4 * 3600);
    let at = run.prestiged_at.expect("bakery never reached a prestige in 4h");
    eprintln!("bakery: first prestige at {}s after {} purchases", at, run.purchases);
    assert!(run.purchases > 0);
}
