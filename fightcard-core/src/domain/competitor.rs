use serde::{Deserialize, Serialize};

use super::ids::CompetitorId;

/// Win/loss record, including how the wins came about.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FightRecord {
    pub wins: u32,
    pub losses: u32,
    pub draws: u32,
    pub no_contests: u32,
    pub stoppage_wins: u32,
    pub submission_wins: u32,
    pub decision_wins: u32,
}

impl FightRecord {
    /// Bouts that produced a competitive result. No-contests are excluded.
    pub fn competitive_bouts(&self) -> u32 {
        self.wins + self.losses + self.draws
    }

    /// Wins over competitive bouts, `None` with no competitive history.
    pub fn win_rate(&self) -> Option<f64> {
        match self.competitive_bouts() {
            0 => None,
            total => Some(self.wins as f64 / total as f64),
        }
    }

    /// Stoppage + submission wins over all wins, `None` without wins.
    pub fn finish_rate(&self) -> Option<f64> {
        if self.wins == 0 {
            return None;
        }
        Some((self.stoppage_wins + self.submission_wins) as f64 / self.wins as f64)
    }
}

/// A fighter as the catalog knows them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Competitor {
    pub id: CompetitorId,
    pub name: String,
    pub division: String,
    #[serde(default)]
    pub record: FightRecord,
    #[serde(default)]
    pub champion: bool,
    /// Divisional ranking. `None` for champions and unranked fighters.
    #[serde(default)]
    pub ranking: Option<u32>,
    #[serde(default)]
    pub pound_for_pound: Option<u32>,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

impl Competitor {
    pub fn new(id: impl Into<String>, name: impl Into<String>, division: impl Into<String>) -> Self {
        Self {
            id: CompetitorId::new(id),
            name: name.into(),
            division: division.into(),
            record: FightRecord::default(),
            champion: false,
            ranking: None,
            pound_for_pound: None,
            active: true,
        }
    }
}
