//! Roster aggregation: one `FighterScore` per pick, summed, then the
//! event-category multiplier applied once.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::fighter::{round2, score_fighter, FighterScore};
use crate::domain::{
    Bout, BoutId, BoutStatus, CompetitorId, Event, EventCategory, EventId, LeagueId, Outcome,
    PerformanceStats, Roster, RosterId, UserId,
};
use crate::rules::{LeagueSettings, ScoringRules};

/// Scored totals for one roster, plus its leaderboard position once ranked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RosterScore {
    pub roster_id: RosterId,
    pub user_id: UserId,
    pub league_id: LeagueId,
    pub event_id: EventId,
    pub fighters: Vec<FighterScore>,
    pub raw_total: f64,
    pub category_multiplier: f64,
    pub final_total: f64,
    /// Tie-break key: earlier submission ranks higher.
    pub submitted_at: Option<DateTime<Utc>>,
    pub rank: Option<u32>,
    /// Shares its rank with another roster that has the same total and
    /// the same submission instant.
    #[serde(default)]
    pub tied: bool,
}

/// Lookup tables for one event's card and its processed outcomes.
#[derive(Debug)]
pub struct CardIndex<'a> {
    bout_of: HashMap<&'a CompetitorId, &'a Bout>,
    outcome_of: HashMap<&'a BoutId, &'a Outcome>,
    live_bouts: Vec<&'a BoutId>,
}

impl<'a> CardIndex<'a> {
    pub fn new(bouts: &'a [Bout], outcomes: &'a [Outcome]) -> Self {
        let bout_of = bouts
            .iter()
            .flat_map(|b| [(&b.red.competitor, b), (&b.blue.competitor, b)])
            .collect();
        let outcome_of = outcomes.iter().map(|o| (&o.bout_id, o)).collect();
        let live_bouts = bouts
            .iter()
            .filter(|b| b.status != BoutStatus::Cancelled)
            .map(|b| &b.id)
            .collect();
        Self {
            bout_of,
            outcome_of,
            live_bouts,
        }
    }

    pub fn bout_for(&self, competitor: &CompetitorId) -> Option<&'a Bout> {
        self.bout_of.get(competitor).copied()
    }

    pub fn outcome_for(&self, bout: &BoutId) -> Option<&'a Outcome> {
        self.outcome_of.get(bout).copied()
    }

    /// Every bout that was not cancelled has an outcome.
    pub fn is_complete(&self) -> bool {
        self.live_bouts.iter().all(|id| self.outcome_of.contains_key(*id))
    }

    pub fn pending_bouts(&self) -> Vec<&'a BoutId> {
        self.live_bouts
            .iter()
            .copied()
            .filter(|id| !self.outcome_of.contains_key(*id))
            .collect()
    }
}

/// Event-category multiplier for a roster in this league.
pub fn category_multiplier(event: &Event, settings: &LeagueSettings) -> f64 {
    if settings.category_multiplier_enabled && event.category == EventCategory::Marquee {
        settings.marquee_multiplier
    } else {
        1.0
    }
}

/// Score one pick. Unknown competitors and unprocessed bouts score zero.
pub fn score_pick(
    index: &CardIndex<'_>,
    rules: &ScoringRules,
    settings: &LeagueSettings,
    competitor: &CompetitorId,
    boosted: bool,
) -> FighterScore {
    let Some(bout) = index.bout_for(competitor) else {
        warn!(%competitor, "picked competitor is not on the card, scoring zero");
        return FighterScore::pending(competitor.clone(), None, boosted);
    };
    let Some(outcome) = index.outcome_for(&bout.id) else {
        debug!(%competitor, bout = %bout.id, "bout not processed yet");
        return FighterScore::pending(competitor.clone(), Some(bout.id.clone()), boosted);
    };
    if outcome.method.is_decisive()
        && !outcome.is_winner(competitor)
        && !outcome.is_loser(competitor)
    {
        warn!(
            %competitor,
            bout = %bout.id,
            "outcome names neither corner for this competitor, scoring zero"
        );
        return FighterScore::pending(competitor.clone(), Some(bout.id.clone()), boosted);
    }

    let default_stats = PerformanceStats::default();
    let stats = outcome.stats_for(competitor).unwrap_or(&default_stats);
    score_fighter(
        rules,
        bout,
        outcome,
        competitor,
        stats,
        boosted,
        settings.boost_multiplier,
    )
}

/// Score every pick on a roster and total them.
///
/// At most one pick is boosted: the first flagged one, and only when the
/// league allows boosts.
pub fn score_roster(
    roster: &Roster,
    event: &Event,
    index: &CardIndex<'_>,
    rules: &ScoringRules,
    settings: &LeagueSettings,
) -> RosterScore {
    let boosted_at = settings
        .boost_enabled
        .then(|| roster.picks.iter().position(|p| p.boosted))
        .flatten();
    let fighters: Vec<FighterScore> = roster
        .picks
        .iter()
        .enumerate()
        .map(|(i, pick)| score_pick(index, rules, settings, &pick.competitor, boosted_at == Some(i)))
        .collect();

    let raw_total = round2(fighters.iter().map(|f| f.final_total).sum());
    let multiplier = category_multiplier(event, settings);

    RosterScore {
        roster_id: roster.id.clone(),
        user_id: roster.user_id.clone(),
        league_id: roster.league_id.clone(),
        event_id: roster.event_id.clone(),
        fighters,
        raw_total,
        category_multiplier: multiplier,
        final_total: round2(raw_total * multiplier),
        submitted_at: roster.submitted_at,
        rank: None,
        tied: false,
    }
}
