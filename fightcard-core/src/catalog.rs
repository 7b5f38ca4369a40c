//! Catalog read interface and an in-memory implementation.
//!
//! The catalog is owned elsewhere; the engine only reads it.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{Bout, BoutId, Competitor, CompetitorId, Event, EventId};

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("read catalog file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("parse catalog: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("event {0} not found")]
    EventNotFound(EventId),
}

pub trait Catalog {
    fn competitor(&self, id: &CompetitorId) -> Option<Competitor>;
    fn bout(&self, id: &BoutId) -> Option<Bout>;
    /// Bouts on an event's card, top of the card first.
    fn bouts_for_event(&self, event: &EventId) -> Vec<Bout>;
    fn event(&self, id: &EventId) -> Option<Event>;

    /// Both corners of every bout on the card that the catalog knows.
    fn competitors_for_event(&self, event: &EventId) -> Vec<Competitor> {
        self.bouts_for_event(event)
            .iter()
            .flat_map(|b| [&b.red.competitor, &b.blue.competitor])
            .filter_map(|id| self.competitor(id))
            .collect()
    }
}

/// Whole catalog held in memory, loadable from a JSON document of the form
/// `{ "competitors": [...], "events": [...], "bouts": [...] }`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InMemoryCatalog {
    pub competitors: Vec<Competitor>,
    pub events: Vec<Event>,
    pub bouts: Vec<Bout>,
}

impl InMemoryCatalog {
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_file(path: &Path) -> Result<Self, CatalogError> {
        let json = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&json)
    }

    pub fn require_event(&self, id: &EventId) -> Result<Event, CatalogError> {
        self.event(id)
            .ok_or_else(|| CatalogError::EventNotFound(id.clone()))
    }
}

impl Catalog for InMemoryCatalog {
    fn competitor(&self, id: &CompetitorId) -> Option<Competitor> {
        self.competitors.iter().find(|c| c.id == *id).cloned()
    }

    fn bout(&self, id: &BoutId) -> Option<Bout> {
        self.bouts.iter().find(|b| b.id == *id).cloned()
    }

    fn bouts_for_event(&self, event: &EventId) -> Vec<Bout> {
        let mut card: Vec<Bout> = self
            .bouts
            .iter()
            .filter(|b| b.event_id == *event)
            .cloned()
            .collect();

        let order = self
            .events
            .iter()
            .find(|e| e.id == *event)
            .map(|e| e.bouts.as_slice())
            .unwrap_or_default();
        card.sort_by_key(|b| {
            let listed = order.iter().position(|id| *id == b.id).unwrap_or(usize::MAX);
            (listed, b.card_position)
        });
        card
    }

    fn event(&self, id: &EventId) -> Option<Event> {
        self.events.iter().find(|e| e.id == *id).cloned()
    }
}
