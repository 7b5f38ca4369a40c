//! Roster lifecycle: `Draft → Locked → Scored`.
//!
//! - `Draft` is the only editable state.
//! - A roster locks on explicit submission of a valid roster, or
//!   automatically once `now >= event start − lock lead`.
//! - `Locked → Scored` happens when the event's results are processed.
//! - Transitions only move forward.
//!
//! Every entry point reads "now" once from the injected [`Clock`], applies any
//! due auto-lock, and only then acts. A mutation racing the deadline by a few
//! milliseconds may land on either side of it; that is accepted.

use chrono::{DateTime, Duration, Utc};
use thiserror::Error;
use tracing::{debug, info};

use crate::clock::Clock;
use crate::domain::{
    Bout, CompetitorId, Event, EventId, PricedCompetitor, Roster, RosterId, RosterPick,
    RosterStatus,
};
use crate::rules::LeagueSettings;
use crate::validation::{validate, ValidationReport};

#[derive(Debug, Error, PartialEq)]
pub enum LifecycleError {
    #[error("roster {roster} is {status:?} and can no longer be changed")]
    Locked { roster: RosterId, status: RosterStatus },

    #[error("roster {roster} is not valid: {}", .report.messages().join("; "))]
    Invalid {
        roster: RosterId,
        report: ValidationReport,
    },

    #[error("roster {roster} already holds {size} picks")]
    RosterFull { roster: RosterId, size: usize },

    #[error("competitor {0} is not priced for this event")]
    NotInPool(CompetitorId),

    #[error("competitor {0} is already on the roster")]
    AlreadyPicked(CompetitorId),

    #[error("competitor {0} is not on the roster")]
    NotPicked(CompetitorId),

    #[error("this league does not allow boosted picks")]
    BoostDisabled,

    #[error("roster {roster} belongs to event {roster_event}, not {event}")]
    WrongEvent {
        roster: RosterId,
        roster_event: EventId,
        event: EventId,
    },

    #[error("roster {roster} is {status:?}; only locked rosters can be scored")]
    NotLocked { roster: RosterId, status: RosterStatus },
}

/// Result of a successful submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Submission {
    Submitted { at: DateTime<Utc> },
    /// The roster was already submitted; nothing changed.
    AlreadySubmitted,
}

/// The instant after which rosters for `event` can no longer change.
pub fn lock_deadline(event: &Event, settings: &LeagueSettings) -> DateTime<Utc> {
    event
        .starts_at
        .checked_sub_signed(settings.lock_lead())
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

pub fn remaining_budget(roster: &Roster, settings: &LeagueSettings) -> i64 {
    let budget = i64::try_from(settings.budget).unwrap_or(i64::MAX);
    let spent = i64::try_from(roster.total_salary()).unwrap_or(i64::MAX);
    budget.saturating_sub(spent)
}

/// Lifecycle operations for rosters of one event under one league's settings.
pub struct RosterLifecycle<'a> {
    clock: &'a dyn Clock,
    settings: &'a LeagueSettings,
    event: &'a Event,
    bouts: &'a [Bout],
}

impl<'a> RosterLifecycle<'a> {
    pub fn new(
        clock: &'a dyn Clock,
        settings: &'a LeagueSettings,
        event: &'a Event,
        bouts: &'a [Bout],
    ) -> Self {
        Self {
            clock,
            settings,
            event,
            bouts,
        }
    }

    pub fn deadline(&self) -> DateTime<Utc> {
        lock_deadline(self.event, self.settings)
    }

    pub fn is_past_deadline(&self) -> bool {
        self.clock.now() >= self.deadline()
    }

    /// Time left before lock, `None` once the deadline has passed.
    pub fn time_until_lock(&self) -> Option<Duration> {
        let left = self.deadline() - self.clock.now();
        (left > Duration::zero()).then_some(left)
    }

    /// Budget left after current picks; negative when over.
    pub fn remaining_budget(&self, roster: &Roster) -> i64 {
        remaining_budget(roster, self.settings)
    }

    /// Apply a due auto-lock. Returns true if this call locked the roster.
    pub fn refresh_lock(&self, roster: &mut Roster) -> bool {
        self.lock_if_due(roster, self.clock.now())
    }

    fn lock_if_due(&self, roster: &mut Roster, now: DateTime<Utc>) -> bool {
        if roster.status != RosterStatus::Draft || now < self.deadline() {
            return false;
        }
        roster.status = RosterStatus::Locked;
        roster.locked_at = Some(now);
        info!(roster = %roster.id, event = %self.event.id, "roster auto-locked at deadline");
        true
    }

    fn ensure_editable(&self, roster: &mut Roster) -> Result<DateTime<Utc>, LifecycleError> {
        self.ensure_event(roster)?;
        let now = self.clock.now();
        self.lock_if_due(roster, now);
        if !roster.status.is_editable() {
            return Err(LifecycleError::Locked {
                roster: roster.id.clone(),
                status: roster.status,
            });
        }
        Ok(now)
    }

    fn ensure_event(&self, roster: &Roster) -> Result<(), LifecycleError> {
        if roster.event_id != self.event.id {
            return Err(LifecycleError::WrongEvent {
                roster: roster.id.clone(),
                roster_event: roster.event_id.clone(),
                event: self.event.id.clone(),
            });
        }
        Ok(())
    }

    pub fn validate(&self, roster: &Roster) -> ValidationReport {
        validate(&roster.picks, self.settings, self.bouts)
    }

    /// Add a pick at the current salary, frozen into the roster.
    ///
    /// Returns the validation report of the roster after the change, so a
    /// caller can surface rule problems without blocking the edit.
    pub fn add_pick(
        &self,
        roster: &mut Roster,
        priced: &PricedCompetitor,
    ) -> Result<ValidationReport, LifecycleError> {
        self.ensure_editable(roster)?;
        if priced.event_id != self.event.id {
            return Err(LifecycleError::NotInPool(priced.id().clone()));
        }
        if roster.contains(priced.id()) {
            return Err(LifecycleError::AlreadyPicked(priced.id().clone()));
        }
        if roster.picks.len() >= self.settings.roster_size {
            return Err(LifecycleError::RosterFull {
                roster: roster.id.clone(),
                size: self.settings.roster_size,
            });
        }

        let slot = roster.next_free_slot();
        roster.picks.push(RosterPick {
            competitor: priced.id().clone(),
            salary: priced.salary,
            slot,
            boosted: false,
        });
        roster.picks.sort_by_key(|p| p.slot);
        debug!(roster = %roster.id, competitor = %priced.id(), slot, "pick added");
        Ok(self.validate(roster))
    }

    pub fn remove_pick(
        &self,
        roster: &mut Roster,
        competitor: &CompetitorId,
    ) -> Result<ValidationReport, LifecycleError> {
        self.ensure_editable(roster)?;
        let before = roster.picks.len();
        roster.picks.retain(|p| p.competitor != *competitor);
        if roster.picks.len() == before {
            return Err(LifecycleError::NotPicked(competitor.clone()));
        }
        Ok(self.validate(roster))
    }

    /// Move the boost to `competitor`, or clear it with `None`.
    pub fn set_boost(
        &self,
        roster: &mut Roster,
        competitor: Option<&CompetitorId>,
    ) -> Result<ValidationReport, LifecycleError> {
        self.ensure_editable(roster)?;
        if let Some(target) = competitor {
            if !self.settings.boost_enabled {
                return Err(LifecycleError::BoostDisabled);
            }
            if !roster.contains(target) {
                return Err(LifecycleError::NotPicked(target.clone()));
            }
        }
        for pick in &mut roster.picks {
            pick.boosted = competitor == Some(&pick.competitor);
        }
        Ok(self.validate(roster))
    }

    /// Submit the roster, locking it.
    ///
    /// Re-submitting a submitted roster is a no-op success. Submitting after
    /// the deadline, or a roster that was auto-locked, is a lock error.
    pub fn submit(&self, roster: &mut Roster) -> Result<Submission, LifecycleError> {
        self.ensure_event(roster)?;
        if !roster.status.is_editable() && roster.submitted_at.is_some() {
            return Ok(Submission::AlreadySubmitted);
        }
        let now = self.ensure_editable(roster)?;

        let report = self.validate(roster);
        if !report.valid {
            return Err(LifecycleError::Invalid {
                roster: roster.id.clone(),
                report,
            });
        }

        roster.status = RosterStatus::Locked;
        roster.submitted_at = Some(now);
        roster.locked_at = Some(now);
        info!(roster = %roster.id, user = %roster.user_id, "roster submitted");
        Ok(Submission::Submitted { at: now })
    }

    /// `Locked → Scored`. Already-scored rosters stay scored.
    pub fn mark_scored(&self, roster: &mut Roster) -> Result<(), LifecycleError> {
        self.ensure_event(roster)?;
        self.refresh_lock(roster);
        match roster.status {
            RosterStatus::Locked => {
                roster.status = RosterStatus::Scored;
                Ok(())
            }
            RosterStatus::Scored => Ok(()),
            RosterStatus::Draft => Err(LifecycleError::NotLocked {
                roster: roster.id.clone(),
                status: roster.status,
            }),
        }
    }
}
