//! Outcome ingestion — admin-supplied records into typed `Outcome`s.
//!
//! A batch is accepted whole or not at all: one malformed record rejects
//! every record, before any scoring runs.

use std::collections::{BTreeMap, HashMap, HashSet};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{
    BonusAwards, Bout, BoutId, BoutStatus, CompetitorId, Method, Outcome, PerformanceStats,
};

/// Longest bout the ingestion boundary accepts, in rounds.
pub const MAX_ROUNDS: u32 = 10;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("outcome batch is not a JSON array of records: {0}")]
    NotABatch(#[source] serde_json::Error),

    #[error("record {index}: {source}")]
    Shape {
        index: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("record {index}: unknown method '{method}'")]
    UnknownMethod { index: usize, method: String },

    #[error("record {index}: time '{time}' is not m:ss")]
    BadTime { index: usize, time: String },

    #[error("record {index}: round {round} is outside 1..={max}")]
    BadRound { index: usize, round: u32, max: u32 },

    #[error("record {index}: {method:?} needs both a winner and a loser")]
    MissingResult { index: usize, method: Method },

    #[error("record {index}: {method:?} must not name a winner or loser")]
    UnexpectedResult { index: usize, method: Method },

    #[error("record {index}: winner and loser are both {competitor}")]
    SameCompetitor { index: usize, competitor: CompetitorId },

    #[error("record {index}: fight {fight} appears more than once")]
    DuplicateFight { index: usize, fight: BoutId },

    #[error("fight {0} is not on the event card")]
    UnknownBout(BoutId),

    #[error("fight {0} was cancelled and cannot have a result")]
    CancelledBout(BoutId),

    #[error("fight {fight}: {competitor} is not in this bout")]
    NotInBout { fight: BoutId, competitor: CompetitorId },

    #[error("fight {fight}: round {round} is past the scheduled {scheduled}")]
    PastDistance { fight: BoutId, round: u32, scheduled: u32 },
}

/// One result row as entered by an administrator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutcomeRecord {
    pub fight_id: BoutId,
    #[serde(default)]
    pub winner_id: Option<CompetitorId>,
    #[serde(default)]
    pub loser_id: Option<CompetitorId>,
    pub method: String,
    pub round: u32,
    /// Elapsed time in the ending round, `m:ss`.
    pub time: String,
    #[serde(default)]
    pub stats: BTreeMap<CompetitorId, PerformanceStats>,
    #[serde(default)]
    pub bonuses: BonusAwards,
}

/// Method names as they show up on results sheets.
pub fn parse_method(raw: &str) -> Option<Method> {
    let normalized = raw.trim().to_ascii_lowercase();
    let method = match normalized.as_str() {
        "ko" | "tko" | "ko/tko" | "stoppage" | "doctor stoppage" | "corner stoppage" => {
            Method::Stoppage
        }
        "sub" | "submission" | "technical submission" => Method::Submission,
        "dec" | "decision" | "u-dec" | "s-dec" | "m-dec" | "unanimous decision"
        | "split decision" | "majority decision" => Method::Decision,
        "dq" | "disqualification" => Method::Disqualification,
        "draw" | "split draw" | "majority draw" | "unanimous draw" => Method::Draw,
        "nc" | "no contest" | "no-contest" => Method::NoContest,
        _ => return None,
    };
    Some(method)
}

/// `m:ss` into seconds.
pub fn parse_time(raw: &str) -> Option<u32> {
    let (minutes, seconds) = raw.trim().split_once(':')?;
    if seconds.len() != 2 {
        return None;
    }
    let minutes: u32 = minutes.parse().ok()?;
    let seconds: u32 = seconds.parse().ok()?;
    (seconds < 60 && minutes <= 10).then_some(minutes * 60 + seconds)
}

impl OutcomeRecord {
    fn into_outcome(self, index: usize) -> Result<Outcome, IngestError> {
        let method = parse_method(&self.method).ok_or_else(|| IngestError::UnknownMethod {
            index,
            method: self.method.clone(),
        })?;
        let time_seconds = parse_time(&self.time).ok_or_else(|| IngestError::BadTime {
            index,
            time: self.time.clone(),
        })?;
        if self.round == 0 || self.round > MAX_ROUNDS {
            return Err(IngestError::BadRound {
                index,
                round: self.round,
                max: MAX_ROUNDS,
            });
        }

        match (&self.winner_id, &self.loser_id) {
            (Some(w), Some(l)) if method.is_decisive() => {
                if w == l {
                    return Err(IngestError::SameCompetitor {
                        index,
                        competitor: w.clone(),
                    });
                }
            }
            (None, None) if !method.is_decisive() => {}
            _ if method.is_decisive() => return Err(IngestError::MissingResult { index, method }),
            _ => return Err(IngestError::UnexpectedResult { index, method }),
        }

        Ok(Outcome {
            bout_id: self.fight_id,
            winner: self.winner_id,
            loser: self.loser_id,
            method,
            round: self.round,
            time_seconds,
            stats: self.stats,
            bonuses: self.bonuses,
        })
    }
}

/// Parse a batch of untyped records. Any bad record rejects the batch.
pub fn parse_batch(records: &[serde_json::Value]) -> Result<Vec<Outcome>, IngestError> {
    let mut seen = HashSet::new();
    let mut outcomes = Vec::with_capacity(records.len());
    for (index, value) in records.iter().enumerate() {
        let record: OutcomeRecord = serde_json::from_value(value.clone())
            .map_err(|source| IngestError::Shape { index, source })?;
        if !seen.insert(record.fight_id.clone()) {
            return Err(IngestError::DuplicateFight {
                index,
                fight: record.fight_id,
            });
        }
        outcomes.push(record.into_outcome(index)?);
    }
    Ok(outcomes)
}

/// Parse a JSON array of records.
pub fn parse_batch_str(json: &str) -> Result<Vec<Outcome>, IngestError> {
    let records: Vec<serde_json::Value> = serde_json::from_str(json).map_err(IngestError::NotABatch)?;
    parse_batch(&records)
}

/// Structural check an ingestion form runs before submitting for scoring.
pub fn is_well_formed(records: &[serde_json::Value]) -> bool {
    parse_batch(records).is_ok()
}

/// Check parsed outcomes against the card they claim to describe.
pub fn check_against_card(outcomes: &[Outcome], bouts: &[Bout]) -> Result<(), IngestError> {
    let by_id: HashMap<&BoutId, &Bout> = bouts.iter().map(|b| (&b.id, b)).collect();
    for outcome in outcomes {
        let bout = by_id
            .get(&outcome.bout_id)
            .ok_or_else(|| IngestError::UnknownBout(outcome.bout_id.clone()))?;
        if bout.status == BoutStatus::Cancelled {
            return Err(IngestError::CancelledBout(outcome.bout_id.clone()));
        }
        let named = outcome
            .winner
            .iter()
            .chain(outcome.loser.iter())
            .chain(outcome.stats.keys())
            .chain(outcome.bonuses.performance_of_the_night.iter());
        for competitor in named {
            if !bout.involves(competitor) {
                return Err(IngestError::NotInBout {
                    fight: outcome.bout_id.clone(),
                    competitor: competitor.clone(),
                });
            }
        }
        if outcome.round > bout.scheduled_rounds {
            return Err(IngestError::PastDistance {
                fight: outcome.bout_id.clone(),
                round: outcome.round,
                scheduled: bout.scheduled_rounds,
            });
        }
    }
    Ok(())
}
