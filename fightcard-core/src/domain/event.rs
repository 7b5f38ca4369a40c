use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::{BoutId, EventId};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventCategory {
    /// Numbered pay-per-view style cards; eligible for the category multiplier.
    Marquee,
    #[default]
    Standard,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,
    pub name: String,
    pub starts_at: DateTime<Utc>,
    #[serde(default)]
    pub category: EventCategory,
    /// Bout ids in card order, top of the card first.
    #[serde(default)]
    pub bouts: Vec<BoutId>,
}
