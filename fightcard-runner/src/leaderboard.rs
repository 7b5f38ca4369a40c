//! Event leaderboard — rosters ranked by final total.
//!
//! Ordering:
//! - Descending `final_total`.
//! - Equal totals: the earlier submission ranks higher. Rosters that were
//!   auto-locked without a submission sort after every submitted roster.
//! - Equal totals and equal submission instants (including both unsubmitted)
//!   share a rank and are flagged `tied`. Within such a group, display order
//!   falls back to roster id so output is stable.
//!
//! Ranks use competition numbering: `1, 2, 2, 4`.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use fightcard_core::domain::{EventId, RosterId, UserId};
use fightcard_core::scoring::RosterScore;

fn submission_order(a: &RosterScore, b: &RosterScore) -> Ordering {
    match (a.submitted_at, b.submitted_at) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Ordering that decides rank. `Equal` means an unresolved tie.
fn rank_order(a: &RosterScore, b: &RosterScore) -> Ordering {
    b.final_total
        .total_cmp(&a.final_total)
        .then_with(|| submission_order(a, b))
}

/// Sort and rank scores. `rank` and `tied` are overwritten.
pub fn rank(mut scores: Vec<RosterScore>) -> Vec<RosterScore> {
    scores.sort_by(|a, b| rank_order(a, b).then_with(|| a.roster_id.cmp(&b.roster_id)));

    let mut start = 0;
    while start < scores.len() {
        let mut end = start + 1;
        while end < scores.len() && rank_order(&scores[start], &scores[end]) == Ordering::Equal {
            end += 1;
        }
        let tied = end - start > 1;
        // Competition rank: one more than the number of rosters strictly ahead.
        let position = u32::try_from(start + 1).unwrap_or(u32::MAX);
        for score in &mut scores[start..end] {
            score.rank = Some(position);
            score.tied = tied;
        }
        start = end;
    }
    scores
}

/// Ranked scores for one event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Leaderboard {
    pub event_id: EventId,
    entries: Vec<RosterScore>,
}

impl Leaderboard {
    pub fn new(event_id: EventId, scores: Vec<RosterScore>) -> Self {
        Self {
            event_id,
            entries: rank(scores),
        }
    }

    pub fn entries(&self) -> &[RosterScore] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<RosterScore> {
        self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn top(&self, n: usize) -> &[RosterScore] {
        &self.entries[..n.min(self.entries.len())]
    }

    pub fn get(&self, roster: &RosterId) -> Option<&RosterScore> {
        self.entries.iter().find(|s| s.roster_id == *roster)
    }

    pub fn for_user<'a>(&'a self, user: &'a UserId) -> impl Iterator<Item = &'a RosterScore> + 'a {
        self.entries.iter().filter(move |s| s.user_id == *user)
    }

    /// Groups of rosters that share a rank.
    pub fn unresolved_ties(&self) -> Vec<Vec<&RosterScore>> {
        let mut groups: Vec<Vec<&RosterScore>> = Vec::new();
        for score in self.entries.iter().filter(|s| s.tied) {
            match groups.last_mut() {
                Some(group) if group[0].rank == score.rank => group.push(score),
                _ => groups.push(vec![score]),
            }
        }
        groups
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Duration, TimeZone, Utc};

    fn at(minutes: i64) -> Option<DateTime<Utc>> {
        Some(Utc.with_ymd_and_hms(2024, 4, 13, 20, 0, 0).unwrap() + Duration::minutes(minutes))
    }

    fn score(id: &str, total: f64, submitted_at: Option<DateTime<Utc>>) -> RosterScore {
        RosterScore {
            roster_id: RosterId::new(id),
            user_id: UserId::new(format!("user-{id}")),
            league_id: "l1".into(),
            event_id: EventId::new("e1"),
            fighters: vec![],
            raw_total: total,
            category_multiplier: 1.0,
            final_total: total,
            submitted_at,
            rank: None,
            tied: false,
        }
    }

    fn ids(scores: &[RosterScore]) -> Vec<&str> {
        scores.iter().map(|s| s.roster_id.as_str()).collect()
    }

    #[test]
    fn sorts_by_total_descending() {
        let ranked = rank(vec![
            score("a", 120.5, at(0)),
            score("b", 310.0, at(5)),
            score("c", 200.25, at(1)),
        ]);
        assert_eq!(ids(&ranked), vec!["b", "c", "a"]);
        assert_eq!(
            ranked.iter().map(|s| s.rank).collect::<Vec<_>>(),
            vec![Some(1), Some(2), Some(3)]
        );
        assert!(ranked.iter().all(|s| !s.tied));
    }

    #[test]
    fn earlier_submission_breaks_equal_totals() {
        let ranked = rank(vec![score("late", 150.0, at(9)), score("early", 150.0, at(2))]);
        assert_eq!(ids(&ranked), vec!["early", "late"]);
        assert_eq!(ranked[0].rank, Some(1));
        assert_eq!(ranked[1].rank, Some(2));
        assert!(!ranked[0].tied && !ranked[1].tied);
    }

    #[test]
    fn unsubmitted_rosters_lose_the_tie_break() {
        let ranked = rank(vec![score("auto", 150.0, None), score("sent", 150.0, at(30))]);
        assert_eq!(ids(&ranked), vec!["sent", "auto"]);
    }

    #[test]
    fn identical_keys_share_a_rank() {
        let ranked = rank(vec![
            score("z", 99.0, at(0)),
            score("y", 180.0, at(4)),
            score("x", 180.0, at(4)),
            score("w", 40.0, None),
            score("v", 40.0, None),
        ]);
        assert_eq!(ids(&ranked), vec!["x", "y", "z", "v", "w"]);
        let ranks: Vec<_> = ranked.iter().map(|s| s.rank.unwrap()).collect();
        assert_eq!(ranks, vec![1, 1, 3, 4, 4]);
        let tied: Vec<_> = ranked.iter().map(|s| s.tied).collect();
        assert_eq!(tied, vec![true, true, false, true, true]);

        let board = Leaderboard::new("e1".into(), ranked);
        let groups = board.unresolved_ties();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[1].len(), 2);
    }

    #[test]
    fn rerank_overwrites_stale_flags() {
        let mut stale = score("a", 10.0, at(0));
        stale.rank = Some(7);
        stale.tied = true;
        let ranked = rank(vec![stale]);
        assert_eq!(ranked[0].rank, Some(1));
        assert!(!ranked[0].tied);
    }

    #[test]
    fn leaderboard_lookups() {
        let board = Leaderboard::new(
            "e1".into(),
            vec![score("a", 10.0, at(0)), score("b", 20.0, at(0))],
        );
        assert_eq!(board.top(1)[0].roster_id.as_str(), "b");
        assert_eq!(board.top(10).len(), 2);
        assert_eq!(board.get(&"a".into()).and_then(|s| s.rank), Some(2));
        assert_eq!(board.for_user(&"user-a".into()).count(), 1);
        assert!(rank(vec![]).is_empty());
    }
}
