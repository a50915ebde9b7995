//! Economy state definitions.

use serde::Serialize;

use super::catalog::{BonusUpgradeDefinition, GameConfig, LevelingConfig, UpgradeDefinition};
use super::progression;
use crate::error::{ConfigError, EconomyError};

/// One owned (or not yet owned) upgrade line.
#[derive(Clone, Debug)]
pub struct UpgradeInstance {
    pub definition: UpgradeDefinition,
    pub purchase_count: u32,
    /// Product of every bonus ever applied to this line (default 1.0).
    /// Survives prestige.
    pub rate_multiplier: f64,
}

impl UpgradeInstance {
    pub fn new(definition: UpgradeDefinition) -> Self {
        Self {
            definition,
            purchase_count: 0,
            rate_multiplier: 1.0,
        }
    }

    pub fn id(&self) -> &str {
        &self.definition.id
    }

    pub fn current_cost(&self) -> f64 {
        progression::scaled_cost(self.definition.base_cost, self.purchase_count)
    }

    /// Per-unit rate after bonus multipliers, before the global multiplier.
    pub fn effective_rate(&self) -> f64 {
        self.definition.production_rate * self.rate_multiplier
    }

    /// Contribution of this line before the global multiplier.
    pub fn production(&self) -> f64 {
        self.purchase_count as f64 * self.effective_rate()
    }
}

/// A one-shot bonus and whether it has been bought this prestige cycle.
#[derive(Clone, Debug)]
pub struct BonusUpgrade {
    pub definition: BonusUpgradeDefinition,
    pub purchased: bool,
}

impl BonusUpgrade {
    pub fn new(definition: BonusUpgradeDefinition) -> Self {
        Self {
            definition,
            purchased: false,
        }
    }

    pub fn id(&self) -> &str {
        &self.definition.id
    }
}

/// Leveling counters (bakery only). Untouched by prestige.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LevelProgress {
    pub level: u32,
    pub xp: u64,
    pub xp_to_next_level: u64,
}

impl LevelProgress {
    pub fn new(config: &LevelingConfig) -> Self {
        Self {
            level: 1,
            xp: 0,
            xp_to_next_level: config.starting_threshold,
        }
    }
}

/// The player's numbers.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PlayerProgress {
    pub currency: f64,
    /// Click yield before the global multiplier.
    pub currency_per_click: f64,
    /// Always >= 1.0.
    pub global_multiplier: f64,
    /// Never decreases.
    pub prestige_points: u64,
    pub total_clicks: u64,
    pub prestige_count: u32,
    /// Currency earned over the whole session, across prestiges.
    pub currency_all_time: f64,
    pub leveling: Option<LevelProgress>,
}

/// Full state of one running game.
#[derive(Clone, Debug)]
pub struct EconomyState {
    pub name: String,
    pub currency_name: String,
    pub progress: PlayerProgress,
    pub upgrades: Vec<UpgradeInstance>,
    pub bonuses: Vec<BonusUpgrade>,
    pub(crate) leveling_config: Option<LevelingConfig>,
    /// Aggregate rate, rebuilt from scratch after every purchase or prestige.
    pub(crate) production_rate: f64,
}

impl EconomyState {
    /// Build a fresh session from a config, validating it first.
    pub fn from_config(config: GameConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let GameConfig {
            name,
            currency_name,
            base_click_yield,
            catalog,
            leveling,
            bonuses,
        } = config;

        let mut state = Self {
            name,
            currency_name,
            progress: PlayerProgress {
                currency: 0.0,
                currency_per_click: base_click_yield,
                global_multiplier: 1.0,
                prestige_points: 0,
                total_clicks: 0,
                prestige_count: 0,
                currency_all_time: 0.0,
                leveling: leveling.as_ref().map(LevelProgress::new),
            },
            upgrades: catalog.iter().cloned().map(UpgradeInstance::new).collect(),
            bonuses: bonuses.into_iter().map(BonusUpgrade::new).collect(),
            leveling_config: leveling,
            production_rate: 0.0,
        };
        state.recompute_production_rate();
        Ok(state)
    }

    pub fn leveling_config(&self) -> Option<&LevelingConfig> {
        self.leveling_config.as_ref()
    }

    pub fn upgrade(&self, id: &str) -> Option<&UpgradeInstance> {
        self.upgrades.iter().find(|u| u.id() == id)
    }

    pub(crate) fn upgrade_index(&self, id: &str) -> Option<usize> {
        self.upgrades.iter().position(|u| u.id() == id)
    }

    pub fn bonus(&self, id: &str) -> Option<&BonusUpgrade> {
        self.bonuses.iter().find(|b| b.id() == id)
    }

    pub(crate) fn bonus_index(&self, id: &str) -> Option<usize> {
        self.bonuses.iter().position(|b| b.id() == id)
    }

    /// Cost of the next unit of `id`.
    pub fn current_cost(&self, id: &str) -> Result<f64, EconomyError> {
        self.upgrade(id)
            .map(UpgradeInstance::current_cost)
            .ok_or_else(|| EconomyError::UnknownUpgrade(id.to_string()))
    }

    pub fn purchase_count(&self, id: &str) -> Option<u32> {
        self.upgrade(id).map(|u| u.purchase_count)
    }

    /// Aggregate production rate (currency per second).
    pub fn production_rate(&self) -> f64 {
        self.production_rate
    }

    pub(crate) fn recompute_production_rate(&mut self) {
        self.production_rate =
            progression::aggregate_production_rate(&self.upgrades, self.progress.global_multiplier);
    }

    pub fn click_yield(&self) -> f64 {
        self.progress.currency_per_click * self.progress.global_multiplier
    }

    pub fn is_unlocked(&self, upgrade: &UpgradeInstance) -> bool {
        progression::requirements_satisfied(
            &upgrade.definition.unlock_requirements,
            self.progress.currency,
            |id| self.purchase_count(id),
        )
    }

    /// Requirements met and not yet bought.
    pub fn is_bonus_available(&self, bonus: &BonusUpgrade) -> bool {
        !bonus.purchased
            && progression::requirements_satisfied(
                &bonus.definition.requirements,
                self.progress.currency,
                |id| self.purchase_count(id),
            )
    }

    /// Prestige points a reset would grant right now.
    pub fn prestige_yield(&self) -> u64 {
        progression::prestige_yield(self.progress.currency)
    }

    pub fn can_prestige(&self) -> bool {
        self.prestige_yield() > 0
    }

    /// Read-only copy for presentation layers.
    pub fn snapshot(&self) -> Snapshot {
        let currency = self.progress.currency;
        Snapshot {
            name: self.name.clone(),
            currency_name: self.currency_name.clone(),
            progress: self.progress.clone(),
            production_rate: self.production_rate,
            prestige_on_offer: self.prestige_yield(),
            upgrades: self
                .upgrades
                .iter()
                .map(|u| {
                    let cost = u.current_cost();
                    UpgradeView {
                        id: u.id().to_string(),
                        display_name: u.definition.display_name.clone(),
                        purchase_count: u.purchase_count,
                        current_cost: cost,
                        effective_rate: u.effective_rate(),
                        unlocked: self.is_unlocked(u),
                        affordable: currency >= cost,
                    }
                })
                .collect(),
            bonuses: self
                .bonuses
                .iter()
                .map(|b| BonusView {
                    id: b.id().to_string(),
                    display_name: b.definition.display_name.clone(),
                    cost: b.definition.cost,
                    purchased: b.purchased,
                    available: self.is_bonus_available(b),
                    affordable: currency >= b.definition.cost,
                })
                .collect(),
        }
    }
}

/// One upgrade line as a renderer sees it.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct UpgradeView {
    pub id: String,
    pub display_name: String,
    pub purchase_count: u32,
    pub current_cost: f64,
    pub effective_rate: f64,
    pub unlocked: bool,
    pub affordable: bool,
}

/// One bonus upgrade as a renderer sees it.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BonusView {
    pub id: String,
    pub display_name: String,
    pub cost: f64,
    pub purchased: bool,
    pub available: bool,
    pub affordable: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Snapshot {
    pub name: String,
    pub currency_name: String,
    pub progress: PlayerProgress,
    pub production_rate: f64,
    /// Points a prestige would grant now; 0 means the control stays hidden.
    pub prestige_on_offer: u64,
    pub upgrades: Vec<UpgradeView>,
    pub bonuses: Vec<BonusView>,
}
