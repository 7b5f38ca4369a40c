//! Fightcard Core — roster economics and scoring for fantasy combat-sports leagues.
//!
//! This crate contains the rules engine:
//! - Domain types (competitors, bouts, events, outcomes, rosters)
//! - Injectable clock
//! - Salary pricing from ranking, card placement, market line, form and recognition
//! - Roster validation (size, budget, duplicates, per-bout limit, boost)
//! - Roster lifecycle `Draft → Locked → Scored` with deadline auto-lock
//! - Fighter and roster scoring with underdog, boost and category multipliers
//! - Outcome ingestion, catalog and store interfaces, input fingerprints

pub mod catalog;
pub mod clock;
pub mod domain;
pub mod fingerprint;
pub mod ingest;
pub mod lifecycle;
pub mod pricing;
pub mod rules;
pub mod scoring;
pub mod store;
pub mod validation;
