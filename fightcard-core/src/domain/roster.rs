use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::competitor::Competitor;
use super::ids::{BoutId, CompetitorId, EventId, LeagueId, RosterId, UserId};

/// Whole currency units.
pub type Salary = u32;

/// A competitor priced for one event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricedCompetitor {
    pub competitor: Competitor,
    pub bout_id: BoutId,
    pub event_id: EventId,
    pub salary: Salary,
}

impl PricedCompetitor {
    pub fn id(&self) -> &CompetitorId {
        &self.competitor.id
    }
}

/// Roster lifecycle state. Only `Draft` is editable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RosterStatus {
    #[default]
    Draft,
    Locked,
    Scored,
}

impl RosterStatus {
    pub fn is_editable(self) -> bool {
        self == RosterStatus::Draft
    }
}

/// One selection on a roster. The salary is frozen at pick time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterPick {
    pub competitor: CompetitorId,
    pub salary: Salary,
    pub slot: usize,
    #[serde(default)]
    pub boosted: bool,
}

impl RosterPick {
    pub fn new(competitor: impl Into<String>, salary: Salary, slot: usize) -> Self {
        Self {
            competitor: CompetitorId::new(competitor),
            salary,
            slot,
            boosted: false,
        }
    }

    pub fn boosted(mut self) -> Self {
        self.boosted = true;
        self
    }
}

/// A user's picks for one league and event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Roster {
    pub id: RosterId,
    pub user_id: UserId,
    pub league_id: LeagueId,
    pub event_id: EventId,
    #[serde(default)]
    pub picks: Vec<RosterPick>,
    #[serde(default)]
    pub status: RosterStatus,
    /// Set on explicit submission only; auto-locked rosters leave it empty.
    #[serde(default)]
    pub submitted_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub locked_at: Option<DateTime<Utc>>,
}

impl Roster {
    pub fn new(
        id: impl Into<String>,
        user_id: impl Into<String>,
        league_id: impl Into<String>,
        event_id: impl Into<String>,
    ) -> Self {
        Self {
            id: RosterId::new(id),
            user_id: UserId::new(user_id),
            league_id: LeagueId::new(league_id),
            event_id: EventId::new(event_id),
            picks: Vec::new(),
            status: RosterStatus::Draft,
            submitted_at: None,
            locked_at: None,
        }
    }

    pub fn total_salary(&self) -> u64 {
        self.picks.iter().map(|p| p.salary as u64).sum()
    }

    pub fn contains(&self, competitor: &CompetitorId) -> bool {
        self.picks.iter().any(|p| p.competitor == *competitor)
    }

    pub fn boosted_pick(&self) -> Option<&RosterPick> {
        self.picks.iter().find(|p| p.boosted)
    }

    /// Lowest slot index not taken by an existing pick.
    pub fn next_free_slot(&self) -> usize {
        (0..)
            .find(|slot| !self.picks.iter().any(|p| p.slot == *slot))
            .unwrap_or(self.picks.len())
    }
}
