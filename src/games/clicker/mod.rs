//! Clicker economy: one configurable engine behind every built-in variant.

pub mod autoplay;
pub mod catalog;
pub mod format;
pub mod logic;
pub mod progression;
pub mod save;
pub mod state;

#[cfg(test)]
mod simulator;

use crate::error::{ConfigError, EconomyError};
use crate::games::{GameView, Outcome};
use crate::input::Intent;

use catalog::GameConfig;
use state::{EconomyState, Snapshot};

pub struct ClickerGame {
    pub state: EconomyState,
}

impl ClickerGame {
    pub fn new(config: GameConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            state: EconomyState::from_config(config)?,
        })
    }
}

impl GameView for ClickerGame {
    fn dispatch(&mut self, intent: &Intent) -> Result<Outcome, EconomyError> {
        match intent {
            Intent::Click => Ok(Outcome::Clicked(logic::register_click(&mut self.state))),
            Intent::Buy(id) => logic::purchase(&mut self.state, id).map(Outcome::Purchased),
            Intent::BuyBonus(id) => {
                logic::purchase_bonus(&mut self.state, id).map(|()| Outcome::BonusApplied)
            }
            Intent::Prestige => logic::prestige(&mut self.state).map(Outcome::Prestiged),
        }
    }

    fn tick(&mut self, elapsed_secs: f64) -> Result<(), EconomyError> {
        logic::tick(&mut self.state, elapsed_secs).map(|_| ())
    }

    fn snapshot(&self) -> Snapshot {
        self.state.snapshot()
    }

    fn state(&self) -> &EconomyState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut EconomyState {
        &mut self.state
    }
}
