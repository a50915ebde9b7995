//! Save / load for a running economy.
//!
//! ## Versioning
//!
//! - `SAVE_VERSION`: current format version. Bump it whenever a field is added.
//! - `MIN_COMPATIBLE_VERSION`: oldest version that can still be read. Only bump
//!   it for breaking changes (a field changing meaning or being removed).
//!
//! Saves at or above `MIN_COMPATIBLE_VERSION` load with missing fields filled
//! from defaults. Upgrades are matched by id, so catalog reordering is harmless;
//! ids the catalog no longer knows are skipped.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::progression;
use super::state::{EconomyState, LevelProgress};
use crate::error::SaveError;

const SAVE_VERSION: u32 = 1;

const MIN_COMPATIBLE_VERSION: u32 = 1;

/// Autosave cadence in seconds of play.
pub const AUTOSAVE_INTERVAL_SECS: f64 = 30.0;

#[derive(Serialize, Deserialize)]
struct SaveData {
    version: u32,
    game: GameSave,
}

#[derive(Serialize, Deserialize, Default)]
#[serde(default)]
struct GameSave {
    variant: String,
    currency: f64,
    currency_per_click: Option<f64>,
    global_multiplier: Option<f64>,
    prestige_points: u64,
    total_clicks: u64,
    prestige_count: u32,
    currency_all_time: f64,

    /// Absent for variants without leveling.
    level: Option<u32>,
    xp: Option<u64>,
    xp_to_next_level: Option<u64>,

    upgrades: Vec<UpgradeSave>,
    bonus_upgrades: Vec<BonusSave>,

    /// Timestamp (seconds) of the last applied tick.
    last_tick_timestamp: Option<f64>,
}

#[derive(Serialize, Deserialize, Default)]
#[serde(default)]
struct UpgradeSave {
    id: String,
    purchase_count: u32,
    rate_multiplier: f64,
}

#[derive(Serialize, Deserialize, Default)]
#[serde(default)]
struct BonusSave {
    id: String,
    purchased: bool,
}

fn extract_save(state: &EconomyState, last_tick_timestamp: Option<f64>) -> SaveData {
    let p = &state.progress;
    SaveData {
        version: SAVE_VERSION,
        game: GameSave {
            variant: state.name.clone(),
            currency: p.currency,
            currency_per_click: Some(p.currency_per_click),
            global_multiplier: Some(p.global_multiplier),
            prestige_points: p.prestige_points,
            total_clicks: p.total_clicks,
            prestige_count: p.prestige_count,
            currency_all_time: p.currency_all_time,
            level: p.leveling.as_ref().map(|l| l.level),
            xp: p.leveling.as_ref().map(|l| l.xp),
            xp_to_next_level: p.leveling.as_ref().map(|l| l.xp_to_next_level),
            upgrades: state
                .upgrades
                .iter()
                .map(|u| UpgradeSave {
                    id: u.id().to_string(),
                    purchase_count: u.purchase_count,
                    rate_multiplier: u.rate_multiplier,
                })
                .collect(),
            bonus_upgrades: state
                .bonuses
                .iter()
                .map(|b| BonusSave {
                    id: b.id().to_string(),
                    purchased: b.purchased,
                })
                .collect(),
            last_tick_timestamp,
        },
    }
}

/// Copy saved values onto a fresh state built from the same variant.
fn apply_save(state: &mut EconomyState, save: &GameSave) {
    let p = &mut state.progress;
    p.currency = non_negative(save.currency);
    if let Some(per_click) = save.currency_per_click {
        p.currency_per_click = non_negative(per_click);
    }
    // Never below what the prestige points alone grant.
    let floor = progression::prestige_multiplier(save.prestige_points);
    p.global_multiplier = save
        .global_multiplier
        .filter(|m| m.is_finite())
        .map_or(floor, |m| m.max(floor));
    p.prestige_points = save.prestige_points;
    p.total_clicks = save.total_clicks;
    p.prestige_count = save.prestige_count;
    p.currency_all_time = non_negative(save.currency_all_time);

    if let (Some(levels), Some(level)) = (p.leveling.as_mut(), save.level) {
        let fresh = levels.clone();
        *levels = LevelProgress {
            level: level.max(1),
            xp: save.xp.unwrap_or(fresh.xp),
            xp_to_next_level: save
                .xp_to_next_level
                .filter(|t| *t > 0)
                .unwrap_or(fresh.xp_to_next_level),
        };
    }

    for saved in &save.upgrades {
        match state.upgrades.iter_mut().find(|u| u.id() == saved.id) {
            Some(u) => {
                u.purchase_count = saved.purchase_count;
                u.rate_multiplier = if saved.rate_multiplier.is_finite() && saved.rate_multiplier > 0.0 {
                    saved.rate_multiplier
                } else {
                    1.0
                };
            }
            None => debug!(upgrade = saved.id.as_str(), "skipping saved upgrade not in catalog"),
        }
    }

    for saved in &save.bonus_upgrades {
        match state.bonuses.iter_mut().find(|b| b.id() == saved.id) {
            Some(b) => b.purchased = saved.purchased,
            None => debug!(bonus = saved.id.as_str(), "skipping saved bonus not in catalog"),
        }
    }

    state.recompute_production_rate();
}

fn non_negative(v: f64) -> f64 {
    if v.is_finite() {
        v.max(0.0)
    } else {
        0.0
    }
}

/// Serialize a state to JSON.
pub fn to_json(state: &EconomyState, last_tick_timestamp: Option<f64>) -> Result<String, SaveError> {
    Ok(serde_json::to_string_pretty(&extract_save(
        state,
        last_tick_timestamp,
    ))?)
}

/// Restore a JSON save onto `state`. Returns the saved tick timestamp, if any.
///
/// `state` should be freshly built from the same variant; it is only touched
/// once the save has parsed and passed the version and variant checks.
pub fn from_json(state: &mut EconomyState, json: &str) -> Result<Option<f64>, SaveError> {
    let data: SaveData = serde_json::from_str(json)?;

    if data.version < MIN_COMPATIBLE_VERSION {
        warn!(
            saved = data.version,
            min = MIN_COMPATIBLE_VERSION,
            "save too old, refusing to load"
        );
        return Err(SaveError::Incompatible {
            saved: data.version,
            min: MIN_COMPATIBLE_VERSION,
        });
    }
    if data.game.variant != state.name {
        return Err(SaveError::WrongVariant {
            saved: data.game.variant,
            expected: state.name.clone(),
        });
    }
    if data.version < SAVE_VERSION {
        info!(
            saved = data.version,
            current = SAVE_VERSION,
            "migrating older save"
        );
    }

    apply_save(state, &data.game);
    Ok(data.game.last_tick_timestamp)
}

/// Write a save file.
pub fn save_to_path(
    state: &EconomyState,
    last_tick_timestamp: Option<f64>,
    path: &Path,
) -> Result<(), SaveError> {
    let json = to_json(state, last_tick_timestamp)?;
    std::fs::write(path, json)?;
    debug!(path = %path.display(), "game saved");
    Ok(())
}

/// Read a save file onto `state`.
pub fn load_from_path(state: &mut EconomyState, path: &Path) -> Result<Option<f64>, SaveError> {
    let json = std::fs::read_to_string(path)?;
    let ts = from_json(state, &json)?;
    info!(path = %path.display(), "game loaded");
    Ok(ts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::clicker::catalog::GameConfig;

    fn meat() -> EconomyState {
        EconomyState::from_config(GameConfig::meat()).unwrap()
    }

    fn bakery() -> EconomyState {
        EconomyState::from_config(GameConfig::bakery()).unwrap()
    }

    #[test]
    fn extract_and_apply_roundtrip() {
        let mut original = meat();
        original.progress.currency = 12345.6;
        original.progress.currency_per_click = 3.0;
        original.progress.global_multiplier = 2.2;
        original.progress.prestige_points = 12;
        original.progress.total_clicks = 42;
        original.progress.prestige_count = 2;
        original.progress.currency_all_time = 99999.0;
        original.upgrades[0].purchase_count = 10;
        original.upgrades[0].rate_multiplier = 2.0;
        original.upgrades[2].purchase_count = 5;
        original.bonuses[0].purchased = true;
        original.recompute_production_rate();

        let json = to_json(&original, Some(123.5)).unwrap();
        let mut restored = meat();
        let ts = from_json(&mut restored, &json).unwrap();

        assert_eq!(ts, Some(123.5));
        assert!((restored.progress.currency - 12345.6).abs() < 0.001);
        assert!((restored.progress.currency_per_click - 3.0).abs() < 0.001);
        assert!((restored.progress.global_multiplier - 2.2).abs() < 0.001);
        assert_eq!(restored.progress.prestige_points, 12);
        assert_eq!(restored.progress.total_clicks, 42);
        assert_eq!(restored.progress.prestige_count, 2);
        assert_eq!(restored.upgrades[0].purchase_count, 10);
        assert!((restored.upgrades[0].rate_multiplier - 2.0).abs() < 0.001);
        assert_eq!(restored.upgrades[2].purchase_count, 5);
        assert!(restored.bonuses[0].purchased);
        assert!(!restored.bonuses[1].purchased);
        assert!((restored.production_rate() - original.production_rate()).abs() < 1e-9);
    }

    #[test]
    fn leveling_roundtrip() {
        let mut original = bakery();
        {
            let l = original.progress.leveling.as_mut().unwrap();
            l.level = 3;
            l.xp = 40;
            l.xp_to_next_level = 225;
        }
        let json = to_json(&original, None).unwrap();
        let mut restored = bakery();
        assert_eq!(from_json(&mut restored, &json).unwrap(), None);
        let l = restored.progress.leveling.as_ref().unwrap();
        assert_eq!((l.level, l.xp, l.xp_to_next_level), (3, 40, 225));
    }

    #[test]
    fn wrong_variant_is_rejected() {
        let json = to_json(&meat(), None).unwrap();
        let mut target = bakery();
        assert!(matches!(
            from_json(&mut target, &json),
            Err(SaveError::WrongVariant { .. })
        ));
    }

    #[test]
    fn version_below_min_compatible_is_rejected() {
        let json = r#"{ "version": 0, "game": { "variant": "meat", "currency": 5.0 } }"#;
        let mut s = meat();
        assert!(matches!(
            from_json(&mut s, json),
            Err(SaveError::Incompatible { saved: 0, min: 1 })
        ));
        assert_eq!(s.progress.currency, 0.0);
    }

    #[test]
    fn missing_multiplier_is_rebuilt_from_prestige_points() {
        let json = r#"{ "version": 1, "game": { "variant": "meat", "prestige_points": 5 } }"#;
        let mut s = meat();
        from_json(&mut s, json).unwrap();
        assert_eq!(s.progress.prestige_points, 5);
        assert!((s.progress.global_multiplier - 1.5).abs() < 1e-12);
    }

    #[test]
    fn multiplier_below_prestige_floor_is_raised() {
        let json = r#"{
            "version": 1,
            "game": { "variant": "meat", "prestige_points": 5, "global_multiplier": 1.2 }
        }"#;
        let mut s = meat();
        from_json(&mut s, json).unwrap();
        assert!((s.progress.global_multiplier - 1.5).abs() < 1e-12);

        // An "all" bonus on top of the points survives the restore.
        let json = r#"{
            "version": 1,
            "game": { "variant": "meat", "prestige_points": 5, "global_multiplier": 3.0 }
        }"#;
        let mut s = meat();
        from_json(&mut s, json).unwrap();
        assert_eq!(s.progress.global_multiplier, 3.0);
    }

    #[test]
    fn missing_fields_take_defaults() {
        let json = r#"{
            "version": 1,
            "game": {
                "variant": "meat",
                "currency": 500.0,
                "upgrades": [{ "id": "butcher", "purchase_count": 4 }]
            }
        }"#;
        let mut s = meat();
        from_json(&mut s, json).unwrap();
        assert!((s.progress.currency - 500.0).abs() < 0.001);
        assert_eq!(s.progress.global_multiplier, 1.0);
        assert_eq!(s.purchase_count("butcher"), Some(4));
        assert_eq!(s.upgrade("butcher").unwrap().rate_multiplier, 1.0);
        assert!((s.production_rate() - 2.0).abs() < 1e-9);
    }

    #[test]
    fn unknown_ids_and_fields_are_ignored() {
        let json = r#"{
            "version": 1,
            "game": {
                "variant": "meat",
                "upgrades": [{ "id": "spaceship", "purchase_count": 9, "rate_multiplier": 1.0 }],
                "bonus_upgrades": [{ "id": "warp_drive", "purchased": true }],
                "future_unknown_field": "should be ignored"
            }
        }"#;
        let mut s = meat();
        from_json(&mut s, json).unwrap();
        assert!(s.upgrades.iter().all(|u| u.purchase_count == 0));
        assert!(s.bonuses.iter().all(|b| !b.purchased));
    }

    #[test]
    fn corrupt_json_is_an_error() {
        let mut s = meat();
        assert!(matches!(from_json(&mut s, "{ nope"), Err(SaveError::Json(_))));
    }

    #[test]
    fn file_roundtrip() {
        let path = std::env::temp_dir().join(format!(
            "idle-economy-save-test-{}.json",
            std::process::id()
        ));
        let mut original = meat();
        original.progress.currency = 777.0;
        save_to_path(&original, Some(1.0), &path).unwrap();

        let mut restored = meat();
        let ts = load_from_path(&mut restored, &path).unwrap();
        let _ = std::fs::remove_file(&path);

        assert_eq!(ts, Some(1.0));
        assert!((restored.progress.currency - 777.0).abs() < 0.001);
    }
}
