//! Tracker configuration loaded from TOML.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::core::rules::ScoringRules;

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Config file could not be read.
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    /// Config text is not valid TOML for [`TrackerConfig`].
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// A value is out of range.
    #[error("invalid config value `{field}`: {reason}")]
    Invalid {
        /// Offending field.
        field: &'static str,
        /// What is wrong with it.
        reason: &'static str,
    },
}

/// Display names for both sides.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerNames {
    /// Name shown for [`crate::types::Side::Player`].
    pub player: String,
    /// Name shown for [`crate::types::Side::Opponent`].
    pub opponent: String,
}

impl Default for PlayerNames {
    fn default() -> Self {
        Self {
            player: "Player".to_string(),
            opponent: "Opponent".to_string(),
        }
    }
}

/// Mock export settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Simulated delivery latency in milliseconds.
    pub latency_ms: u64,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self { latency_ms: 1500 }
    }
}

/// Top-level tracker configuration.
///
/// ```toml
/// allow_withdrawal = true
///
/// [rules]
/// sets_to_win = 2
/// max_sets = 3
///
/// [players]
/// player = "Alice"
/// opponent = "Bob"
///
/// [export]
/// latency_ms = 1500
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// Scoring constants.
    pub rules: ScoringRules,
    /// Display names.
    pub players: PlayerNames,
    /// When false, withdrawals are ignored.
    pub allow_withdrawal: bool,
    /// Mock export settings.
    pub export: ExportConfig,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            rules: ScoringRules::default(),
            players: PlayerNames::default(),
            allow_withdrawal: true,
            export: ExportConfig::default(),
        }
    }
}

impl TrackerConfig {
    /// Parses and validates a TOML document.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("loading tracker config");
        let text = std::fs::read_to_string(path.as_ref())?;
        let config = Self::from_toml_str(&text)?;
        info!(
            player = %config.players.player,
            opponent = %config.players.opponent,
            "tracker config loaded"
        );
        Ok(config)
    }

    /// Checks that the rules describe a playable match.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let rules = &self.rules;
        if rules.games_to_win_set == 0 {
            return Err(invalid("rules.games_to_win_set", "must be at least 1"));
        }
        if rules.lead_to_win_set == 0 {
            return Err(invalid("rules.lead_to_win_set", "must be at least 1"));
        }
        if rules.lead_to_win_set > rules.games_to_win_set {
            return Err(invalid(
                "rules.lead_to_win_set",
                "must not exceed games_to_win_set",
            ));
        }
        if rules.extended_games <= rules.games_to_win_set {
            return Err(invalid(
                "rules.extended_games",
                "must be greater than games_to_win_set",
            ));
        }
        if rules.sets_to_win == 0 {
            return Err(invalid("rules.sets_to_win", "must be at least 1"));
        }
        if rules.max_sets < rules.sets_to_win {
            return Err(invalid("rules.max_sets", "must be at least sets_to_win"));
        }
        if self.players.player.trim().is_empty() {
            return Err(invalid("players.player", "must not be blank"));
        }
        if self.players.opponent.trim().is_empty() {
            return Err(invalid("players.opponent", "must not be blank"));
        }
        Ok(())
    }
}

fn invalid(field: &'static str, reason: &'static str) -> ConfigError {
    ConfigError::Invalid { field, reason }
}
