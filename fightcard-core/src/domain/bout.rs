use serde::{Deserialize, Serialize};

use super::ids::{BoutId, CompetitorId, EventId};

/// Where a bout stands in its own lifecycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoutStatus {
    #[default]
    Scheduled,
    Completed,
    Cancelled,
    NoResult,
}

/// One corner of a bout: the competitor and their betting line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Corner {
    pub competitor: CompetitorId,
    /// American odds. Negative is the favorite, e.g. `-250` or `+180`.
    #[serde(default)]
    pub line: Option<i32>,
}

impl Corner {
    pub fn new(competitor: impl Into<String>, line: Option<i32>) -> Self {
        Self {
            competitor: CompetitorId::new(competitor),
            line,
        }
    }
}

/// A single scheduled matchup on an event card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bout {
    pub id: BoutId,
    pub event_id: EventId,
    pub red: Corner,
    pub blue: Corner,
    pub weight_class: String,
    #[serde(default)]
    pub title: bool,
    #[serde(default)]
    pub interim_title: bool,
    #[serde(default)]
    pub headliner: bool,
    #[serde(default)]
    pub co_headliner: bool,
    /// 1 is the top of the card.
    pub card_position: u32,
    #[serde(default = "default_rounds")]
    pub scheduled_rounds: u32,
    #[serde(default)]
    pub status: BoutStatus,
}

fn default_rounds() -> u32 {
    3
}

impl Bout {
    pub fn involves(&self, competitor: &CompetitorId) -> bool {
        self.red.competitor == *competitor || self.blue.competitor == *competitor
    }

    pub fn corner(&self, competitor: &CompetitorId) -> Option<&Corner> {
        if self.red.competitor == *competitor {
            Some(&self.red)
        } else if self.blue.competitor == *competitor {
            Some(&self.blue)
        } else {
            None
        }
    }

    pub fn opponent_of(&self, competitor: &CompetitorId) -> Option<&CompetitorId> {
        if self.red.competitor == *competitor {
            Some(&self.blue.competitor)
        } else if self.blue.competitor == *competitor {
            Some(&self.red.competitor)
        } else {
            None
        }
    }

    pub fn line_for(&self, competitor: &CompetitorId) -> Option<i32> {
        self.corner(competitor).and_then(|c| c.line)
    }

    /// Title and interim-title bouts both count.
    pub fn is_title_fight(&self) -> bool {
        self.title || self.interim_title
    }
}
