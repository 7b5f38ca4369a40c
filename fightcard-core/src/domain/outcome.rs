use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::ids::{BoutId, CompetitorId};

/// How a bout ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Method {
    /// KO or TKO, including doctor and corner stoppages.
    Stoppage,
    Submission,
    Decision,
    Disqualification,
    Draw,
    NoContest,
}

impl Method {
    /// Methods that must name a winner.
    pub fn is_decisive(self) -> bool {
        !matches!(self, Method::Draw | Method::NoContest)
    }

    /// Stoppage and submission end a bout inside the distance.
    pub fn is_finish(self) -> bool {
        matches!(self, Method::Stoppage | Method::Submission)
    }
}

/// Per-competitor statistics for one bout.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PerformanceStats {
    pub knockdowns: u32,
    pub significant_strikes: u32,
    pub total_strikes: u32,
    /// Landed over attempted significant strikes, 0.0..=1.0.
    pub strike_accuracy: Option<f64>,
    pub takedowns_attempted: u32,
    pub takedowns_landed: u32,
    pub control_seconds: u32,
    pub submission_attempts: u32,
    pub point_deductions: u32,
    pub missed_weight: bool,
}

impl PerformanceStats {
    pub fn control_minutes(&self) -> f64 {
        self.control_seconds as f64 / 60.0
    }
}

/// Post-fight awards handed out by the promotion.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BonusAwards {
    pub performance_of_the_night: Vec<CompetitorId>,
    pub fight_of_the_night: bool,
}

/// The authoritative result of a completed bout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Outcome {
    pub bout_id: BoutId,
    pub winner: Option<CompetitorId>,
    pub loser: Option<CompetitorId>,
    pub method: Method,
    pub round: u32,
    /// Elapsed time within the ending round.
    pub time_seconds: u32,
    #[serde(default)]
    pub stats: BTreeMap<CompetitorId, PerformanceStats>,
    #[serde(default)]
    pub bonuses: BonusAwards,
}

impl Outcome {
    pub fn stats_for(&self, competitor: &CompetitorId) -> Option<&PerformanceStats> {
        self.stats.get(competitor)
    }

    pub fn is_winner(&self, competitor: &CompetitorId) -> bool {
        self.winner.as_ref() == Some(competitor)
    }

    pub fn is_loser(&self, competitor: &CompetitorId) -> bool {
        self.loser.as_ref() == Some(competitor)
    }
}
