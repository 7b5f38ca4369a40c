//! League configuration file.
//!
//! One TOML document per league season:
//!
//! ```toml
//! [league]
//! budget = 10000
//! roster_size = 5
//! lock_lead_minutes = 30
//!
//! [pricing]
//! base = 1000
//!
//! [scoring]
//! win = 40.0
//!
//! [logging]
//! level = "info"
//! format = "pretty"
//! ```
//!
//! Every section and field is optional and falls back to the default rule set.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use fightcard_core::domain::Fingerprint;
use fightcard_core::rules::{LeagueSettings, PricingRules, RulesError, ScoringRules};

use crate::logging::LoggingConfig;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid rules: {0}")]
    Rules(#[from] RulesError),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LeagueConfig {
    pub league: LeagueSettings,
    pub pricing: PricingRules,
    pub scoring: ScoringRules,
    pub logging: LoggingConfig,
}

impl LeagueConfig {
    /// Parse and check a config document.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.check()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml(&content)
    }

    pub fn check(&self) -> Result<(), RulesError> {
        self.league.check()?;
        self.pricing.check()?;
        self.scoring.check()
    }

    /// Content hash of the rule sections. Logging settings do not count.
    pub fn rules_id(&self) -> Fingerprint {
        let json = serde_json::to_vec(&(&self.league, &self.pricing, &self.scoring))
            .unwrap_or_default();
        Fingerprint::from_bytes(&json)
    }
}
