//! Persistence interfaces for priced pools and rosters, with in-memory
//! implementations.
//!
//! - [`SalaryBook`] keeps one priced pool per event together with the
//!   fingerprint of the inputs it was generated from.
//! - [`RosterStore`] is the user-facing CRUD surface. `update` and `delete`
//!   only touch `Draft` rosters; lifecycle moves go through
//!   [`RosterStore::record_transition`], which only accepts forward moves.

use std::collections::BTreeMap;

use thiserror::Error;
use tracing::{debug, info};

use crate::domain::{
    Bout, Competitor, EventId, Fingerprint, PricedCompetitor, Roster, RosterId, RosterStatus,
};
use crate::fingerprint::pricing_fingerprint;
use crate::pricing::generate_salaries;
use crate::rules::PricingRules;

#[derive(Debug, Error, PartialEq)]
pub enum StoreError {
    #[error("roster {0} not found")]
    NotFound(RosterId),

    #[error("roster {0} already exists")]
    AlreadyExists(RosterId),

    #[error("roster {roster} is {status:?} and can no longer be changed")]
    Locked { roster: RosterId, status: RosterStatus },

    #[error("roster {roster} cannot move from {from:?} to {to:?}")]
    Backwards {
        roster: RosterId,
        from: RosterStatus,
        to: RosterStatus,
    },
}

// ─── Salaries ────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct SalaryPool {
    pub fingerprint: Fingerprint,
    pub salaries: Vec<PricedCompetitor>,
}

/// Priced pools keyed by event.
#[derive(Debug, Default)]
pub struct SalaryBook {
    pools: BTreeMap<EventId, SalaryPool>,
}

impl SalaryBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stored salaries for an event; empty when the event was never priced.
    pub fn salaries(&self, event: &EventId) -> &[PricedCompetitor] {
        self.pools
            .get(event)
            .map(|p| p.salaries.as_slice())
            .unwrap_or_default()
    }

    pub fn fingerprint(&self, event: &EventId) -> Option<&Fingerprint> {
        self.pools.get(event).map(|p| &p.fingerprint)
    }

    /// Return the stored pool for `event`, regenerating it only when the
    /// pricing inputs have changed since it was stored.
    ///
    /// Salaries already frozen into roster picks are unaffected either way.
    pub fn ensure_salaries(
        &mut self,
        event: &EventId,
        bouts: &[Bout],
        competitors: &[Competitor],
        rules: &PricingRules,
    ) -> &[PricedCompetitor] {
        let fingerprint = pricing_fingerprint(event, bouts, competitors, rules);
        let fresh = self
            .pools
            .get(event)
            .is_some_and(|p| p.fingerprint == fingerprint);

        if fresh {
            debug!(event = %event, "salary pool unchanged");
        } else {
            let salaries = generate_salaries(event, bouts, competitors, rules);
            info!(event = %event, priced = salaries.len(), %fingerprint, "salary pool regenerated");
            self.pools.insert(
                event.clone(),
                SalaryPool {
                    fingerprint,
                    salaries,
                },
            );
        }
        self.salaries(event)
    }
}

// ─── Rosters ─────────────────────────────────────────────────────────

pub trait RosterStore {
    fn create(&mut self, roster: Roster) -> Result<(), StoreError>;
    fn get(&self, id: &RosterId) -> Option<Roster>;
    /// Replace a roster's content. Rejected unless the stored roster is a draft.
    fn update(&mut self, roster: Roster) -> Result<(), StoreError>;
    /// Rejected unless the stored roster is a draft.
    fn delete(&mut self, id: &RosterId) -> Result<Roster, StoreError>;
    /// Persist a lifecycle move made by the engine (auto-lock, submit, scored).
    fn record_transition(&mut self, roster: Roster) -> Result<(), StoreError>;
    fn rosters_for_event(&self, event: &EventId) -> Vec<Roster>;
}

fn stage(status: RosterStatus) -> u8 {
    match status {
        RosterStatus::Draft => 0,
        RosterStatus::Locked => 1,
        RosterStatus::Scored => 2,
    }
}

#[derive(Debug, Default)]
pub struct InMemoryRosterStore {
    rosters: BTreeMap<RosterId, Roster>,
}

impl InMemoryRosterStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.rosters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rosters.is_empty()
    }

    fn stored_draft(&self, id: &RosterId) -> Result<&Roster, StoreError> {
        let stored = self
            .rosters
            .get(id)
            .ok_or_else(|| StoreError::NotFound(id.clone()))?;
        if !stored.status.is_editable() {
            return Err(StoreError::Locked {
                roster: id.clone(),
                status: stored.status,
            });
        }
        Ok(stored)
    }
}

impl FromIterator<Roster> for InMemoryRosterStore {
    fn from_iter<I: IntoIterator<Item = Roster>>(iter: I) -> Self {
        Self {
            rosters: iter.into_iter().map(|r| (r.id.clone(), r)).collect(),
        }
    }
}

impl RosterStore for InMemoryRosterStore {
    fn create(&mut self, roster: Roster) -> Result<(), StoreError> {
        if self.rosters.contains_key(&roster.id) {
            return Err(StoreError::AlreadyExists(roster.id));
        }
        self.rosters.insert(roster.id.clone(), roster);
        Ok(())
    }

    fn get(&self, id: &RosterId) -> Option<Roster> {
        self.rosters.get(id).cloned()
    }

    fn update(&mut self, roster: Roster) -> Result<(), StoreError> {
        self.stored_draft(&roster.id)?;
        if !roster.status.is_editable() {
            return Err(StoreError::Locked {
                roster: roster.id,
                status: roster.status,
            });
        }
        self.rosters.insert(roster.id.clone(), roster);
        Ok(())
    }

    fn delete(&mut self, id: &RosterId) -> Result<Roster, StoreError> {
        self.stored_draft(id)?;
        self.rosters
            .remove(id)
            .ok_or_else(|| StoreError::NotFound(id.clone()))
    }

    fn record_transition(&mut self, roster: Roster) -> Result<(), StoreError> {
        let stored = self
            .rosters
            .get(&roster.id)
            .ok_or_else(|| StoreError::NotFound(roster.id.clone()))?;
        if stage(roster.status) < stage(stored.status) {
            return Err(StoreError::Backwards {
                roster: roster.id,
                from: stored.status,
                to: roster.status,
            });
        }
        if !stored.status.is_editable() && roster.picks != stored.picks {
            return Err(StoreError::Locked {
                roster: roster.id,
                status: stored.status,
            });
        }
        self.rosters.insert(roster.id.clone(), roster);
        Ok(())
    }

    fn rosters_for_event(&self, event: &EventId) -> Vec<Roster> {
        self.rosters
            .values()
            .filter(|r| r.event_id == *event)
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{BoutId, BoutStatus, Corner, RosterPick};

    fn card() -> (Vec<Bout>, Vec<Competitor>) {
        let bout = Bout {
            id: BoutId::new("b1"),
            event_id: EventId::new("e1"),
            red: Corner::new("a", Some(-200)),
            blue: Corner::new("b", Some(170)),
            weight_class: "Bantamweight".into(),
            title: false,
            interim_title: false,
            headliner: true,
            co_headliner: false,
            card_position: 1,
            scheduled_rounds: 5,
            status: BoutStatus::Scheduled,
        };
        let fighters = vec![
            Competitor::new("a", "A", "Bantamweight"),
            Competitor::new("b", "B", "Bantamweight"),
        ];
        (vec![bout], fighters)
    }

    #[test]
    fn salary_pool_is_reused_until_inputs_change() {
        let (bouts, mut fighters) = card();
        let rules = PricingRules::default();
        let event = EventId::new("e1");
        let mut book = SalaryBook::new();

        let first = book.ensure_salaries(&event, &bouts, &fighters, &rules).to_vec();
        let fp = book.fingerprint(&event).cloned();
        assert_eq!(first.len(), 2);

        book.ensure_salaries(&event, &bouts, &fighters, &rules);
        assert_eq!(book.fingerprint(&event).cloned(), fp);

        fighters[0].champion = true;
        let second = book.ensure_salaries(&event, &bouts, &fighters, &rules).to_vec();
        assert_ne!(book.fingerprint(&event).cloned(), fp);
        assert!(second[0].salary > first[0].salary);
    }

    #[test]
    fn unpriced_event_has_no_salaries() {
        assert!(SalaryBook::new().salaries(&EventId::new("nope")).is_empty());
    }

    #[test]
    fn update_only_touches_drafts() {
        let mut store = InMemoryRosterStore::new();
        let mut roster = Roster::new("r1", "u1", "l1", "e1");
        store.create(roster.clone()).unwrap();

        roster.picks.push(RosterPick::new("a", 2000, 0));
        store.update(roster.clone()).unwrap();
        assert_eq!(store.get(&roster.id).unwrap().picks.len(), 1);

        roster.status = RosterStatus::Locked;
        store.record_transition(roster.clone()).unwrap();

        roster.picks.clear();
        roster.status = RosterStatus::Draft;
        assert_eq!(
            store.update(roster.clone()),
            Err(StoreError::Locked {
                roster: roster.id.clone(),
                status: RosterStatus::Locked
            })
        );
        assert!(matches!(store.delete(&roster.id), Err(StoreError::Locked { .. })));
    }

    #[test]
    fn transitions_only_move_forward() {
        let mut roster = Roster::new("r1", "u1", "l1", "e1");
        roster.status = RosterStatus::Scored;
        let mut store: InMemoryRosterStore = [roster.clone()].into_iter().collect();

        roster.status = RosterStatus::Locked;
        assert!(matches!(
            store.record_transition(roster),
            Err(StoreError::Backwards { .. })
        ));
    }

    #[test]
    fn create_rejects_duplicate_ids() {
        let mut store = InMemoryRosterStore::new();
        store.create(Roster::new("r1", "u1", "l1", "e1")).unwrap();
        assert_eq!(
            store.create(Roster::new("r1", "u2", "l1", "e1")),
            Err(StoreError::AlreadyExists("r1".into()))
        );
        assert_eq!(store.rosters_for_event(&"e1".into()).len(), 1);
    }
}
