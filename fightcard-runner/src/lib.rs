//! Fightcard Runner — event scoring runs, leaderboards, config files, exports.
//!
//! This crate builds on `fightcard-core` to provide:
//! - League config file loading (`[league]`, `[pricing]`, `[scoring]`, `[logging]`)
//! - Tracing subscriber setup
//! - Parallel event scoring with deadline auto-lock and completeness gating
//! - Leaderboard ranking with submission-time tie-break
//! - JSON and CSV scoreboard artifacts

pub mod config;
pub mod export;
pub mod leaderboard;
pub mod logging;
pub mod runner;

pub use config::{ConfigError, LeagueConfig};
pub use export::{export_json, import_json, load_artifacts, save_artifacts};
pub use leaderboard::{rank, Leaderboard};
pub use logging::{LogFormat, LoggingConfig};
pub use runner::{EventRunner, EventScoreboard, IneligibleRoster, RunError, SCHEMA_VERSION};
