//! Event scoring run — outcomes in, ranked scoreboard out.
//!
//! A run:
//! 1. checks the outcome batch against the card (wholesale rejection),
//! 2. applies any due auto-lock to every roster of the event,
//! 3. sets aside rosters that are still drafts or break a roster rule,
//! 4. scores each remaining roster independently (rayon),
//! 5. ranks the scores,
//! 6. moves scored rosters to `Scored` once every live bout has a result.
//!
//! Re-running over the same rosters and outcomes overwrites the previous
//! scores with identical values.

use chrono::{DateTime, Utc};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use fightcard_core::clock::Clock;
use fightcard_core::domain::{
    Bout, BoutId, Event, EventCategory, EventId, Fingerprint, Outcome, Roster, RosterId,
    RosterStatus, UserId,
};
use fightcard_core::fingerprint::outcomes_fingerprint;
use fightcard_core::ingest::{check_against_card, IngestError};
use fightcard_core::lifecycle::{LifecycleError, RosterLifecycle};
use fightcard_core::scoring::{score_roster, CardIndex, RosterScore};
use fightcard_core::store::{RosterStore, StoreError};
use fightcard_core::validation::Violation;

use crate::config::LeagueConfig;
use crate::leaderboard::{rank, Leaderboard};

#[derive(Debug, Error)]
pub enum RunError {
    #[error("outcome batch rejected: {0}")]
    Ingest(#[from] IngestError),
    #[error("lifecycle error: {0}")]
    Lifecycle(#[from] LifecycleError),
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

/// Current schema version for persisted scoreboards.
pub const SCHEMA_VERSION: u32 = 1;

fn default_schema_version() -> u32 {
    SCHEMA_VERSION
}

/// A roster of the event that was not scored or ranked.
///
/// Either it was never locked, or it breaks at least one roster rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IneligibleRoster {
    pub roster_id: RosterId,
    pub user_id: UserId,
    pub status: RosterStatus,
    pub violations: Vec<Violation>,
}

/// Complete result of scoring one event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventScoreboard {
    /// Schema version for forward-compatible deserialization.
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    pub event_id: EventId,
    pub event_name: String,
    pub category: EventCategory,
    pub rules_id: Fingerprint,
    pub outcomes_fingerprint: Fingerprint,
    /// Every live bout has an outcome; totals are final.
    pub complete: bool,
    pub pending_bouts: Vec<BoutId>,
    pub scored_at: DateTime<Utc>,
    /// Ranked, best first.
    pub entries: Vec<RosterScore>,
    /// Rosters left off the leaderboard, by roster id.
    #[serde(default)]
    pub ineligible: Vec<IneligibleRoster>,
}

impl EventScoreboard {
    pub fn leaderboard(&self) -> Leaderboard {
        Leaderboard::new(self.event_id.clone(), self.entries.clone())
    }

    /// Same outcomes, same rules, same totals and ranks.
    pub fn matches(&self, other: &EventScoreboard) -> bool {
        self.rules_id == other.rules_id
            && self.outcomes_fingerprint == other.outcomes_fingerprint
            && self.entries == other.entries
            && self.ineligible == other.ineligible
    }
}

/// Scores events under one league configuration.
pub struct EventRunner<'a> {
    clock: &'a dyn Clock,
    config: &'a LeagueConfig,
    parallel: bool,
}

impl<'a> EventRunner<'a> {
    pub fn new(clock: &'a dyn Clock, config: &'a LeagueConfig) -> Self {
        Self {
            clock,
            config,
            parallel: true,
        }
    }

    pub fn with_parallelism(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Score every roster of `event` in place.
    ///
    /// Rosters for other events are ignored. Drafts and rosters that fail
    /// validation are reported as ineligible and never ranked. Roster status
    /// is updated (auto-lock, scored) but picks are never touched.
    pub fn score(
        &self,
        event: &Event,
        bouts: &[Bout],
        rosters: &mut [Roster],
        outcomes: &[Outcome],
    ) -> Result<EventScoreboard, RunError> {
        check_against_card(outcomes, bouts)?;

        let lifecycle = RosterLifecycle::new(self.clock, &self.config.league, event, bouts);
        let mut entered: Vec<&mut Roster> = Vec::with_capacity(rosters.len());
        let mut ineligible = Vec::new();
        for roster in rosters.iter_mut() {
            if roster.event_id != event.id {
                warn!(roster = %roster.id, event = %event.id, "roster belongs to another event, skipped");
                continue;
            }
            lifecycle.refresh_lock(roster);
            let report = lifecycle.validate(roster);
            if roster.status == RosterStatus::Draft || !report.valid {
                warn!(
                    roster = %roster.id,
                    status = ?roster.status,
                    violations = report.violations.len(),
                    "roster is not eligible for scoring"
                );
                ineligible.push(IneligibleRoster {
                    roster_id: roster.id.clone(),
                    user_id: roster.user_id.clone(),
                    status: roster.status,
                    violations: report.violations,
                });
                continue;
            }
            entered.push(roster);
        }
        ineligible.sort_by(|a, b| a.roster_id.cmp(&b.roster_id));

        let index = CardIndex::new(bouts, outcomes);
        let rules = &self.config.scoring;
        let settings = &self.config.league;
        let scores: Vec<RosterScore> = if self.parallel {
            entered
                .par_iter()
                .map(|r| score_roster(r, event, &index, rules, settings))
                .collect()
        } else {
            entered
                .iter()
                .map(|r| score_roster(r, event, &index, rules, settings))
                .collect()
        };
        let entries = rank(scores);

        let complete = index.is_complete();
        let pending_bouts: Vec<BoutId> = index.pending_bouts().into_iter().cloned().collect();
        if complete {
            for roster in entered {
                lifecycle.mark_scored(roster)?;
            }
        }

        let scoreboard = EventScoreboard {
            schema_version: SCHEMA_VERSION,
            event_id: event.id.clone(),
            event_name: event.name.clone(),
            category: event.category,
            rules_id: self.config.rules_id(),
            outcomes_fingerprint: outcomes_fingerprint(outcomes),
            complete,
            pending_bouts,
            scored_at: self.clock.now(),
            entries,
            ineligible,
        };
        info!(
            event = %scoreboard.event_id,
            rosters = scoreboard.entries.len(),
            ineligible = scoreboard.ineligible.len(),
            outcomes = outcomes.len(),
            complete,
            fingerprint = %scoreboard.outcomes_fingerprint,
            "event scored"
        );
        Ok(scoreboard)
    }

    /// Score the event's rosters held in `store`, persisting status moves.
    pub fn score_stored(
        &self,
        store: &mut dyn RosterStore,
        event: &Event,
        bouts: &[Bout],
        outcomes: &[Outcome],
    ) -> Result<EventScoreboard, RunError> {
        let mut rosters = store.rosters_for_event(&event.id);
        let before: Vec<RosterStatus> = rosters.iter().map(|r| r.status).collect();
        let scoreboard = self.score(event, bouts, &mut rosters, outcomes)?;
        for (roster, status) in rosters.into_iter().zip(before) {
            if roster.status != status {
                store.record_transition(roster)?;
            }
        }
        Ok(scoreboard)
    }
}
