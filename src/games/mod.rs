//! Game trait and variant selection.

pub mod clicker;

use std::fmt;
use std::str::FromStr;

use crate::error::{ConfigError, EconomyError};
use crate::input::Intent;

use clicker::catalog::GameConfig;
use clicker::state::{EconomyState, Snapshot};
use clicker::ClickerGame;

/// Result of a successfully applied intent.
#[derive(Clone, Debug, PartialEq)]
pub enum Outcome {
    /// Currency gained by the click.
    Clicked(f64),
    /// New purchase count of the upgrade.
    Purchased(u32),
    BonusApplied,
    /// Prestige points awarded.
    Prestiged(u64),
}

/// The surface a front end talks to. It pushes intents, feeds time, and
/// reads snapshots; it never mutates the economy directly.
pub trait GameView {
    /// Apply one player intent.
    fn dispatch(&mut self, intent: &Intent) -> Result<Outcome, EconomyError>;

    /// Advance passive production by `elapsed_secs` seconds.
    fn tick(&mut self, elapsed_secs: f64) -> Result<(), EconomyError>;

    /// Everything a renderer needs for one frame.
    fn snapshot(&self) -> Snapshot;

    /// Backing state, for persistence.
    fn state(&self) -> &EconomyState;

    fn state_mut(&mut self) -> &mut EconomyState;
}

/// Built-in economies.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Variant {
    /// Leveling on clicks, no bonus upgrades.
    Bakery,
    /// Bonus upgrades, no leveling.
    Meat,
}

impl Variant {
    pub fn all() -> &'static [Variant] {
        &[Variant::Bakery, Variant::Meat]
    }

    pub fn name(self) -> &'static str {
        match self {
            Variant::Bakery => "bakery",
            Variant::Meat => "meat",
        }
    }

    pub fn config(self) -> GameConfig {
        match self {
            Variant::Bakery => GameConfig::bakery(),
            Variant::Meat => GameConfig::meat(),
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Variant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Variant::all()
            .iter()
            .copied()
            .find(|v| v.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown variant '{s}' (expected bakery or meat)"))
    }
}

/// Create a game instance from a built-in variant.
pub fn create_game(variant: Variant) -> Result<Box<dyn GameView>, ConfigError> {
    create_game_from_config(variant.config())
}

/// Create a game instance from an arbitrary (e.g. file-loaded) config.
pub fn create_game_from_config(config: GameConfig) -> Result<Box<dyn GameView>, ConfigError> {
    Ok(Box::new(ClickerGame::new(config)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn variant_parses_case_insensitively() {
        assert_eq!("bakery".parse::<Variant>(), Ok(Variant::Bakery));
        assert_eq!("MEAT".parse::<Variant>(), Ok(Variant::Meat));
        assert!("fish".parse::<Variant>().is_err());
    }

    #[test]
    fn every_variant_builds() {
        for &v in Variant::all() {
            let game = create_game(v).unwrap();
            let snap = game.snapshot();
            assert_eq!(snap.name, v.name());
            assert_eq!(snap.progress.currency, 0.0);
            assert_eq!(snap.production_rate, 0.0);
        }
    }

    #[test]
    fn invalid_config_is_rejected() {
        let mut config = GameConfig::meat();
        config.catalog = clicker::catalog::UpgradeCatalog::new(Vec::new());
        assert!(matches!(
            create_game_from_config(config),
            Err(ConfigError::EmptyCatalog)
        ));
    }
}
