//! Roster validation — every rule, every time.
//!
//! `validate` never fails and never stops early: the report lists every
//! violation so a roster builder can show all problems at once.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::{Bout, BoutId, CompetitorId, RosterPick};
use crate::rules::LeagueSettings;

/// A single broken rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Violation {
    RosterSize { expected: usize, actual: usize },
    OverBudget { budget: u64, spent: u64 },
    DuplicateCompetitor { competitor: CompetitorId },
    SameBout { bout: BoutId, picks: usize, allowed: usize },
    MultipleBoosts { count: usize },
    BoostDisabled,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RosterSize { expected, actual } => {
                write!(f, "roster needs exactly {expected} picks, has {actual}")
            }
            Self::OverBudget { budget, spent } => {
                write!(f, "salary total {spent} exceeds budget {budget} by {}", spent - budget)
            }
            Self::DuplicateCompetitor { competitor } => {
                write!(f, "competitor {competitor} is picked more than once")
            }
            Self::SameBout { bout, picks, allowed } => write!(
                f,
                "{picks} picks from bout {bout}; opposing competitors are exclusive (max {allowed})"
            ),
            Self::MultipleBoosts { count } => {
                write!(f, "only one pick may be boosted, {count} are")
            }
            Self::BoostDisabled => write!(f, "this league does not allow boosted picks"),
        }
    }
}

/// Validation result: `valid` is true exactly when `violations` is empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub valid: bool,
    pub violations: Vec<Violation>,
}

impl ValidationReport {
    fn from_violations(violations: Vec<Violation>) -> Self {
        Self {
            valid: violations.is_empty(),
            violations,
        }
    }

    /// Human-readable messages, one per violation.
    pub fn messages(&self) -> Vec<String> {
        self.violations.iter().map(ToString::to_string).collect()
    }

    pub fn count(&self, matches: impl Fn(&Violation) -> bool) -> usize {
        self.violations.iter().filter(|v| matches(v)).count()
    }
}

/// Check a candidate roster against league rules.
///
/// `bouts` is the event card; it is only used to find which picks share a
/// bout. Picks on competitors not found on the card are not exclusive with
/// anything.
pub fn validate(picks: &[RosterPick], settings: &LeagueSettings, bouts: &[Bout]) -> ValidationReport {
    let mut violations = Vec::new();

    check_size(picks, settings, &mut violations);
    check_budget(picks, settings, &mut violations);
    check_unique(picks, &mut violations);
    check_same_bout(picks, settings, bouts, &mut violations);
    check_boost(picks, settings, &mut violations);

    ValidationReport::from_violations(violations)
}

fn check_size(picks: &[RosterPick], settings: &LeagueSettings, out: &mut Vec<Violation>) {
    if picks.len() != settings.roster_size {
        out.push(Violation::RosterSize {
            expected: settings.roster_size,
            actual: picks.len(),
        });
    }
}

fn check_budget(picks: &[RosterPick], settings: &LeagueSettings, out: &mut Vec<Violation>) {
    let spent: u64 = picks.iter().map(|p| u64::from(p.salary)).sum();
    if spent > settings.budget {
        out.push(Violation::OverBudget {
            budget: settings.budget,
            spent,
        });
    }
}

fn check_unique(picks: &[RosterPick], out: &mut Vec<Violation>) {
    let mut counts: BTreeMap<&CompetitorId, usize> = BTreeMap::new();
    for pick in picks {
        *counts.entry(&pick.competitor).or_default() += 1;
    }
    out.extend(
        counts
            .into_iter()
            .filter(|(_, n)| *n > 1)
            .map(|(c, _)| Violation::DuplicateCompetitor {
                competitor: c.clone(),
            }),
    );
}

fn check_same_bout(
    picks: &[RosterPick],
    settings: &LeagueSettings,
    bouts: &[Bout],
    out: &mut Vec<Violation>,
) {
    let bout_of: HashMap<&CompetitorId, &BoutId> = bouts
        .iter()
        .flat_map(|b| [(&b.red.competitor, &b.id), (&b.blue.competitor, &b.id)])
        .collect();

    // Distinct competitors per bout, so a duplicate pick is not also an exclusivity hit.
    let mut per_bout: BTreeMap<&BoutId, BTreeSet<&CompetitorId>> = BTreeMap::new();
    for pick in picks {
        if let Some(bout) = bout_of.get(&pick.competitor) {
            per_bout.entry(*bout).or_default().insert(&pick.competitor);
        }
    }

    out.extend(
        per_bout
            .into_iter()
            .filter(|(_, picked)| picked.len() > settings.max_picks_per_bout)
            .map(|(bout, picked)| Violation::SameBout {
                bout: bout.clone(),
                picks: picked.len(),
                allowed: settings.max_picks_per_bout,
            }),
    );
}

fn check_boost(picks: &[RosterPick], settings: &LeagueSettings, out: &mut Vec<Violation>) {
    let boosted = picks.iter().filter(|p| p.boosted).count();
    if boosted == 0 {
        return;
    }
    if !settings.boost_enabled {
        out.push(Violation::BoostDisabled);
    } else if boosted > 1 {
        out.push(Violation::MultipleBoosts { count: boosted });
    }
}
