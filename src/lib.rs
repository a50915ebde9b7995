//! Idle clicker economy: upgrades with scaled costs, passive production,
//! prestige resets, and optional leveling or bonus-upgrade modules.

pub mod error;
pub mod games;
pub mod input;
pub mod time;

pub use error::{ConfigError, EconomyError, SaveError};
pub use games::clicker::catalog::GameConfig;
pub use games::clicker::format::format_number;
pub use games::clicker::state::{EconomyState, Snapshot};
pub use games::{create_game, create_game_from_config, GameView, Outcome, Variant};
pub use input::{Intent, IntentQueue};
pub use time::TickClock;
