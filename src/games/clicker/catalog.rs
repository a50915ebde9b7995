//! Upgrade catalog and per-variant game configuration.
//!
//! Definitions here are immutable for the lifetime of a session; only the
//! purchase counts and flags in `state` change at runtime.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// A gate on buying something.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Requirement {
    /// At least `count` units of another upgrade owned.
    Owned { upgrade: String, count: u32 },
    /// At least `amount` currency on hand.
    Currency { amount: f64 },
}

/// A repeatable, cost-scaling producer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UpgradeDefinition {
    pub id: String,
    pub display_name: String,
    #[serde(default)]
    pub description: String,
    /// Cost of the first unit.
    pub base_cost: f64,
    /// Currency per second per unit, before multipliers.
    pub production_rate: f64,
    #[serde(default)]
    pub unlock_requirements: Vec<Requirement>,
}

impl UpgradeDefinition {
    pub fn new(id: &str, display_name: &str, base_cost: f64, production_rate: f64) -> Self {
        Self {
            id: id.to_string(),
            display_name: display_name.to_string(),
            description: String::new(),
            base_cost,
            production_rate,
            unlock_requirements: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    pub fn requires(mut self, requirement: Requirement) -> Self {
        self.unlock_requirements.push(requirement);
        self
    }
}

/// What a bonus upgrade multiplies.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BonusTarget {
    /// One upgrade's production rate.
    Upgrade(String),
    /// The global multiplier.
    All,
}

/// A one-shot purchase that scales one or all producers.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BonusUpgradeDefinition {
    pub id: String,
    pub display_name: String,
    #[serde(default)]
    pub description: String,
    pub cost: f64,
    #[serde(default)]
    pub requirements: Vec<Requirement>,
    pub affects: BonusTarget,
    pub multiplier: f64,
}

/// Ordered set of upgrade definitions. Order is display order.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UpgradeCatalog {
    upgrades: Vec<UpgradeDefinition>,
}

impl UpgradeCatalog {
    pub fn new(upgrades: Vec<UpgradeDefinition>) -> Self {
        Self { upgrades }
    }

    pub fn get(&self, id: &str) -> Option<&UpgradeDefinition> {
        self.upgrades.iter().find(|u| u.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &UpgradeDefinition> {
        self.upgrades.iter()
    }

    pub fn len(&self) -> usize {
        self.upgrades.len()
    }

    pub fn is_empty(&self) -> bool {
        self.upgrades.is_empty()
    }
}

/// Parameters of the optional leveling module.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelingConfig {
    /// XP needed to leave level 1.
    pub starting_threshold: u64,
    /// Threshold growth per level (floored).
    pub growth: f64,
    pub xp_per_click: u64,
    /// Added to the per-click yield on every level-up.
    pub click_bonus_per_level: f64,
}

impl Default for LevelingConfig {
    fn default() -> Self {
        Self {
            starting_threshold: 100,
            growth: 1.5,
            xp_per_click: 1,
            click_bonus_per_level: 1.0,
        }
    }
}

fn default_click_yield() -> f64 {
    1.0
}

/// One game variant: a catalog plus the optional modules composed onto it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    pub name: String,
    pub currency_name: String,
    /// Per-click yield at the start of a session.
    #[serde(default = "default_click_yield")]
    pub base_click_yield: f64,
    pub catalog: UpgradeCatalog,
    #[serde(default)]
    pub leveling: Option<LevelingConfig>,
    #[serde(default)]
    pub bonuses: Vec<BonusUpgradeDefinition>,
}

impl GameConfig {
    /// Magical Bakery. Leveling on, no bonus upgrades.
    pub fn bakery() -> Self {
        let catalog = UpgradeCatalog::new(vec![
            UpgradeDefinition::new("magic_whisk", "Magic Whisk", 10.0, 0.1),
            UpgradeDefinition::new("enchanted_oven", "Enchanted Oven", 50.0, 0.5),
            UpgradeDefinition::new("fairy_assistant", "Fairy Assistant", 200.0, 2.0),
            UpgradeDefinition::new("time_bending_mixer", "Time-Bending Mixer", 1_000.0, 10.0),
            UpgradeDefinition::new("cosmic_flour", "Cosmic Flour", 5_000.0, 50.0),
        ]);
        Self {
            name: "bakery".into(),
            currency_name: "cookies".into(),
            base_click_yield: 1.0,
            catalog,
            leveling: Some(LevelingConfig::default()),
            bonuses: Vec::new(),
        }
    }

    /// Meat Clicker. Bonus upgrades on, no leveling.
    pub fn meat() -> Self {
        let catalog = UpgradeCatalog::new(vec![
            UpgradeDefinition::new("knife", "Meat Stall", 10.0, 0.1)
                .with_description("Where it all started"),
            UpgradeDefinition::new("butcher", "Butcher Shop", 50.0, 0.5),
            UpgradeDefinition::new("grinder", "Regular Customer", 200.0, 2.0),
            UpgradeDefinition::new("farm", "Livestock Farm", 1_000.0, 10.0)
                .with_description("Fresh meat, straight from the field"),
            UpgradeDefinition::new("slaughterhouse", "Slaughterhouse", 5_000.0, 40.0)
                .with_description("Industrial meat processing"),
            UpgradeDefinition::new("lab", "Laboratory", 25_000.0, 200.0)
                .with_description("Synthetic meat"),
            UpgradeDefinition::new("factory", "Processing Plant", 100_000.0, 1_000.0)
                .with_description("Mass production of meat goods"),
            UpgradeDefinition::new("temple", "Temple of Meat", 500_000.0, 5_000.0)
                .with_description("Worship of eternal meat"),
        ]);

        let doubler = |id: &str, name: &str, cost: f64, target: &str, count: u32| {
            BonusUpgradeDefinition {
                id: id.into(),
                display_name: name.into(),
                description: format!("Doubles {} production", target),
                cost,
                requirements: vec![Requirement::Owned {
                    upgrade: target.into(),
                    count,
                }],
                affects: BonusTarget::Upgrade(target.into()),
                multiplier: 2.0,
            }
        };

        let bonuses = vec![
            doubler("sharp_blade", "Sharp Blade", 100.0, "knife", 5),
            doubler("master_butcher", "Master Butcher", 500.0, "butcher", 10),
            doubler("electric_grinder", "Electric Grinder", 2_000.0, "grinder", 10),
            doubler("industrial_farm", "Industrial Farm", 10_000.0, "farm", 10),
            doubler("automated_slaughter", "Automated Slaughter", 50_000.0, "slaughterhouse", 10),
            doubler("genetic_enhancement", "Genetic Enhancement", 250_000.0, "lab", 10),
            BonusUpgradeDefinition {
                id: "quantum_meat".into(),
                display_name: "Quantum Meat".into(),
                description: "Doubles all production".into(),
                cost: 1_000_000.0,
                requirements: vec![Requirement::Currency { amount: 1_000_000.0 }],
                affects: BonusTarget::All,
                multiplier: 2.0,
            },
        ];

        Self {
            name: "meat".into(),
            currency_name: "meat".into(),
            base_click_yield: 1.0,
            catalog,
            leveling: None,
            bonuses,
        }
    }

    /// Parse and validate a config from JSON.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Check the catalog invariants every session relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.catalog.is_empty() {
            return Err(ConfigError::EmptyCatalog);
        }
        if !(self.base_click_yield.is_finite() && self.base_click_yield >= 0.0) {
            return Err(ConfigError::InvalidRate("click".into()));
        }

        let mut seen = HashSet::new();
        for u in self.catalog.iter() {
            if !seen.insert(u.id.as_str()) {
                return Err(ConfigError::DuplicateId(u.id.clone()));
            }
            if !(u.base_cost.is_finite() && u.base_cost > 0.0) {
                return Err(ConfigError::InvalidCost(u.id.clone()));
            }
            if !(u.production_rate.is_finite() && u.production_rate >= 0.0) {
                return Err(ConfigError::InvalidRate(u.id.clone()));
            }
        }
        for u in self.catalog.iter() {
            self.check_requirements(&u.id, &u.unlock_requirements)?;
        }

        let mut bonus_ids = HashSet::new();
        for b in &self.bonuses {
            if !bonus_ids.insert(b.id.as_str()) {
                return Err(ConfigError::DuplicateId(b.id.clone()));
            }
            if !(b.cost.is_finite() && b.cost >= 0.0) {
                return Err(ConfigError::InvalidCost(b.id.clone()));
            }
            if !(b.multiplier.is_finite() && b.multiplier > 1.0) {
                return Err(ConfigError::InvalidMultiplier(b.id.clone()));
            }
            if let BonusTarget::Upgrade(target) = &b.affects {
                if !self.catalog.contains(target) {
                    return Err(ConfigError::UnknownReference {
                        owner: b.id.clone(),
                        target: target.clone(),
                    });
                }
            }
            self.check_requirements(&b.id, &b.requirements)?;
        }

        if let Some(l) = &self.leveling {
            if l.starting_threshold == 0
                || !(l.growth.is_finite() && l.growth > 1.0)
                || !(l.click_bonus_per_level.is_finite() && l.click_bonus_per_level >= 0.0)
            {
                return Err(ConfigError::InvalidLeveling);
            }
        }
        Ok(())
    }

    fn check_requirements(&self, owner: &str, reqs: &[Requirement]) -> Result<(), ConfigError> {
        for req in reqs {
            if let Requirement::Owned { upgrade, .. } = req {
                if !self.catalog.contains(upgrade) {
                    return Err(ConfigError::UnknownReference {
                        owner: owner.to_string(),
                        target: upgrade.clone(),
                    });
                }
            }
        }
        Ok(())
    }
}
