//! Error taxonomy for the economy core.
//!
//! Nothing here is fatal to the frame loop. `UnknownUpgrade` / `UnknownBonus`
//! point at a caller bug (an id that is not in the catalog); everything else is
//! an expected, recoverable rejection that leaves the state untouched.

use thiserror::Error;

/// Rejections produced by the `EconomyState` mutators.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum EconomyError {
    #[error("unknown upgrade: {0}")]
    UnknownUpgrade(String),
    #[error("unknown bonus upgrade: {0}")]
    UnknownBonus(String),
    #[error("insufficient funds: need {needed}, have {available}")]
    InsufficientFunds { needed: f64, available: f64 },
    #[error("upgrade is still locked: {0}")]
    LockedUpgrade(String),
    #[error("bonus requirements not met: {0}")]
    RequirementsNotMet(String),
    #[error("bonus already purchased: {0}")]
    AlreadyPurchased(String),
    /// Elapsed time was negative or not a number.
    #[error("invalid elapsed duration: {0}")]
    InvalidDuration(f64),
    #[error("prestige is not available yet")]
    PrestigeNotAvailable,
}

impl EconomyError {
    /// Whether this rejection indicates a caller bug rather than a normal
    /// gameplay condition.
    pub fn is_programmer_error(&self) -> bool {
        matches!(
            self,
            EconomyError::UnknownUpgrade(_) | EconomyError::UnknownBonus(_)
        )
    }
}

/// Problems found while validating a `GameConfig`.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("catalog has no upgrades")]
    EmptyCatalog,
    #[error("duplicate id: {0}")]
    DuplicateId(String),
    #[error("invalid base cost for {0}")]
    InvalidCost(String),
    #[error("invalid production rate for {0}")]
    InvalidRate(String),
    #[error("{owner} references unknown upgrade {target}")]
    UnknownReference { owner: String, target: String },
    #[error("bonus multiplier must be > 1: {0}")]
    InvalidMultiplier(String),
    #[error("invalid leveling parameters")]
    InvalidLeveling,
    #[error("config parse error: {0}")]
    Parse(String),
    #[error("io error: {0}")]
    Io(String),
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e.to_string())
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::Parse(e.to_string())
    }
}

/// Problems reading or writing a save.
#[derive(Debug, Error)]
pub enum SaveError {
    #[error("save serialization failed: {0}")]
    Json(#[from] serde_json::Error),
    #[error("save io failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("save version {saved} is older than the minimum compatible version {min}")]
    Incompatible { saved: u32, min: u32 },
    #[error("save belongs to variant {saved}, expected {expected}")]
    WrongVariant { saved: String, expected: String },
}
