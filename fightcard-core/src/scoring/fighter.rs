//! Per-competitor scoring for one bout.
//!
//! Order of computation:
//! 1. base (participation + win or loss award)
//! 2. finish bonus (winners, by method)
//! 3. round bonus (winners by stoppage or submission, by ending round)
//! 4. title bonus (winners of title bouts)
//! 5. performance points (everyone)
//! 6. penalties
//!
//! then `final = raw × underdog multiplier × boost multiplier`.
//! A score is always rebuilt from its inputs; there is no incremental update.

use serde::{Deserialize, Serialize};

use crate::domain::{Bout, BoutId, CompetitorId, Method, Outcome, PerformanceStats};
use crate::rules::{ScoringRules, UnderdogTier};

/// How the bout went for this competitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FightResult {
    Win,
    Loss,
    Draw,
    NoContest,
    /// No outcome processed yet, or the pick could not be matched to the card.
    Pending,
}

/// Point decomposition for one competitor on one roster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FighterScore {
    pub competitor: CompetitorId,
    pub bout: Option<BoutId>,
    pub result: FightResult,
    pub boosted: bool,
    pub base: f64,
    pub finish_bonus: f64,
    pub round_bonus: f64,
    pub title_bonus: f64,
    pub performance: f64,
    /// Zero or negative.
    pub penalties: f64,
    pub underdog_multiplier: f64,
    pub boost_multiplier: f64,
    pub raw_total: f64,
    pub final_total: f64,
}

impl FighterScore {
    /// All-zero score for a pick whose bout has not been processed.
    /// Multipliers are neutral.
    pub fn pending(competitor: CompetitorId, bout: Option<BoutId>, boosted: bool) -> Self {
        Self {
            competitor,
            bout,
            result: FightResult::Pending,
            boosted,
            base: 0.0,
            finish_bonus: 0.0,
            round_bonus: 0.0,
            title_bonus: 0.0,
            performance: 0.0,
            penalties: 0.0,
            underdog_multiplier: 1.0,
            boost_multiplier: 1.0,
            raw_total: 0.0,
            final_total: 0.0,
        }
    }
}

/// Score one competitor's bout.
///
/// `boost_multiplier` is applied only when `boosted` is set.
pub fn score_fighter(
    rules: &ScoringRules,
    bout: &Bout,
    outcome: &Outcome,
    competitor: &CompetitorId,
    stats: &PerformanceStats,
    boosted: bool,
    boost_multiplier: f64,
) -> FighterScore {
    let result = fight_result(outcome, competitor);
    let won = result == FightResult::Win;

    let base = rules.participation
        + match result {
            FightResult::Win => rules.win,
            FightResult::Loss => rules.loss,
            _ => 0.0,
        };

    let finish_bonus = if won { finish_award(rules, outcome.method) } else { 0.0 };

    let round_bonus = if won && outcome.method.is_finish() {
        round_award(rules, outcome.round, bout.scheduled_rounds)
    } else {
        0.0
    };

    let title_bonus = if won && bout.is_title_fight() {
        rules.title_bonus
    } else {
        0.0
    };

    let performance = performance_points(rules, outcome, competitor, stats);

    let mut penalties = penalty_points(rules, stats);
    if result == FightResult::Loss && outcome.method == Method::Disqualification {
        penalties -= rules.penalties.disqualification_loss;
    }

    let raw_total =
        round2(base + finish_bonus + round_bonus + title_bonus + performance + penalties);

    let underdog = if won {
        underdog_multiplier(&rules.underdog_tiers, bout.line_for(competitor))
    } else {
        1.0
    };
    let boost = if boosted { boost_multiplier } else { 1.0 };

    FighterScore {
        competitor: competitor.clone(),
        bout: Some(bout.id.clone()),
        result,
        boosted,
        base,
        finish_bonus,
        round_bonus,
        title_bonus,
        performance: round2(performance),
        penalties,
        underdog_multiplier: underdog,
        boost_multiplier: boost,
        raw_total,
        final_total: round2(raw_total * underdog * boost),
    }
}

fn fight_result(outcome: &Outcome, competitor: &CompetitorId) -> FightResult {
    match outcome.method {
        Method::Draw => FightResult::Draw,
        Method::NoContest => FightResult::NoContest,
        _ if outcome.is_winner(competitor) => FightResult::Win,
        _ => FightResult::Loss,
    }
}

fn finish_award(rules: &ScoringRules, method: Method) -> f64 {
    match method {
        Method::Stoppage => rules.finish.stoppage,
        Method::Submission => rules.finish.submission,
        Method::Decision => rules.finish.decision,
        Method::Disqualification => rules.finish.disqualification,
        Method::Draw | Method::NoContest => 0.0,
    }
}

/// Award for ending in `round`; nothing past the scheduled distance.
fn round_award(rules: &ScoringRules, round: u32, scheduled_rounds: u32) -> f64 {
    if round == 0 || round > scheduled_rounds {
        return 0.0;
    }
    rules
        .round_bonus
        .get(round as usize - 1)
        .copied()
        .unwrap_or(0.0)
}

fn performance_points(
    rules: &ScoringRules,
    outcome: &Outcome,
    competitor: &CompetitorId,
    stats: &PerformanceStats,
) -> f64 {
    let p = &rules.performance;
    let strikes = (stats.significant_strikes as f64 * p.significant_strike).min(p.significant_strike_cap);
    let submissions =
        (stats.submission_attempts as f64 * p.submission_attempt).min(p.submission_attempt_cap);

    let mut points = stats.knockdowns as f64 * p.knockdown
        + strikes
        + stats.takedowns_landed as f64 * p.takedown
        + stats.control_minutes() * p.control_minute
        + submissions;

    if outcome.bonuses.performance_of_the_night.contains(competitor) {
        points += p.performance_of_the_night;
    }
    if outcome.bonuses.fight_of_the_night {
        points += p.fight_of_the_night;
    }
    points
}

fn penalty_points(rules: &ScoringRules, stats: &PerformanceStats) -> f64 {
    let mut points = -(stats.point_deductions as f64 * rules.penalties.point_deduction);
    if stats.missed_weight {
        points -= rules.penalties.weight_miss;
    }
    points
}

/// Highest tier whose line the competitor's line met or exceeded.
///
/// Favorites (negative lines) and competitors without a line get 1.0.
pub fn underdog_multiplier(tiers: &[UnderdogTier], line: Option<i32>) -> f64 {
    match line {
        Some(line) if line >= 0 => tiers
            .iter()
            .filter(|t| line >= t.line)
            .map(|t| t.multiplier)
            .fold(1.0, f64::max),
        _ => 1.0,
    }
}

pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{BonusAwards, BoutStatus, Corner, EventId};
    use std::collections::BTreeMap;

    fn bout(title: bool, red_line: Option<i32>, blue_line: Option<i32>) -> Bout {
        Bout {
            id: BoutId::new("b1"),
            event_id: EventId::new("e1"),
            red: Corner::new("red", red_line),
            blue: Corner::new("blue", blue_line),
            weight_class: "Middleweight".into(),
            title,
            interim_title: false,
            headliner: title,
            co_headliner: false,
            card_position: 1,
            scheduled_rounds: if title { 5 } else { 3 },
            status: BoutStatus::Completed,
        }
    }

    fn outcome(method: Method, round: u32) -> Outcome {
        let decisive = method.is_decisive();
        Outcome {
            bout_id: BoutId::new("b1"),
            winner: decisive.then(|| CompetitorId::new("red")),
            loser: decisive.then(|| CompetitorId::new("blue")),
            method,
            round,
            time_seconds: 95,
            stats: BTreeMap::new(),
            bonuses: BonusAwards::default(),
        }
    }

    fn score(b: &Bout, o: &Outcome, who: &str, stats: &PerformanceStats, boosted: bool) -> FighterScore {
        score_fighter(
            &ScoringRules::default(),
            b,
            o,
            &CompetitorId::new(who),
            stats,
            boosted,
            1.5,
        )
    }

    #[test]
    fn round_one_title_stoppage_accrues_every_winner_bonus() {
        let rules = ScoringRules::default();
        let s = score(&bout(true, None, None), &outcome(Method::Stoppage, 1), "red", &PerformanceStats::default(), false);
        let expected = rules.participation
            + rules.win
            + rules.finish.stoppage
            + rules.round_bonus[0]
            + rules.title_bonus;
        assert_eq!(s.result, FightResult::Win);
        assert_eq!(s.raw_total, expected);
        assert_eq!(s.final_total, expected);
    }

    #[test]
    fn decision_win_gets_no_round_bonus() {
        let rules = ScoringRules::default();
        let s = score(&bout(false, None, None), &outcome(Method::Decision, 3), "red", &PerformanceStats::default(), false);
        assert_eq!(s.round_bonus, 0.0);
        assert_eq!(s.raw_total, rules.participation + rules.win + rules.finish.decision);
    }

    #[test]
    fn round_bonus_decreases_by_round() {
        let b = bout(true, None, None);
        let bonuses: Vec<f64> = (1..=5)
            .map(|r| score(&b, &outcome(Method::Submission, r), "red", &PerformanceStats::default(), false).round_bonus)
            .collect();
        assert!(bonuses.windows(2).all(|w| w[0] > w[1]), "{bonuses:?}");
    }

    #[test]
    fn round_past_scheduled_distance_earns_nothing() {
        let s = score(&bout(false, None, None), &outcome(Method::Stoppage, 4), "red", &PerformanceStats::default(), false);
        assert_eq!(s.round_bonus, 0.0);
    }

    #[test]
    fn loser_keeps_performance_points() {
        let stats = PerformanceStats {
            knockdowns: 1,
            significant_strikes: 40,
            takedowns_landed: 2,
            control_seconds: 120,
            ..Default::default()
        };
        let s = score(&bout(false, None, None), &outcome(Method::Decision, 3), "blue", &stats, false);
        assert_eq!(s.result, FightResult::Loss);
        // 10 + 10 + 10 + 2
        assert_eq!(s.performance, 32.0);
        assert_eq!(s.finish_bonus, 0.0);
        assert_eq!(s.raw_total, 10.0 - 5.0 + 32.0);
    }

    #[test]
    fn strike_and_submission_awards_are_capped() {
        let stats = PerformanceStats {
            significant_strikes: 400,
            submission_attempts: 20,
            ..Default::default()
        };
        let s = score(&bout(false, None, None), &outcome(Method::Decision, 3), "blue", &stats, false);
        assert_eq!(s.performance, 25.0 + 12.0);
    }

    #[test]
    fn penalties_stack_on_disqualification_loss() {
        let stats = PerformanceStats {
            point_deductions: 2,
            missed_weight: true,
            ..Default::default()
        };
        let s = score(&bout(false, None, None), &outcome(Method::Disqualification, 2), "blue", &stats, false);
        assert_eq!(s.penalties, -(2.0 * 10.0) - 15.0 - 20.0);
        assert_eq!(s.base, 10.0 - 5.0);
    }

    #[test]
    fn draw_has_no_win_or_loss_award() {
        let s = score(&bout(false, None, None), &outcome(Method::Draw, 3), "red", &PerformanceStats::default(), false);
        assert_eq!(s.result, FightResult::Draw);
        assert_eq!(s.base, 10.0);
    }

    #[test]
    fn underdog_winner_is_multiplied_then_boosted() {
        let b = bout(false, Some(250), Some(-300));
        let s = score(&b, &outcome(Method::Decision, 3), "red", &PerformanceStats::default(), true);
        assert_eq!(s.underdog_multiplier, 1.4);
        assert_eq!(s.boost_multiplier, 1.5);
        assert_eq!(s.final_total, round2(s.raw_total * 1.4 * 1.5));
    }

    #[test]
    fn favorite_and_loser_get_neutral_underdog_multiplier() {
        let b = bout(false, Some(-300), Some(250));
        let winner = score(&b, &outcome(Method::Decision, 3), "red", &PerformanceStats::default(), false);
        let loser = score(&b, &outcome(Method::Decision, 3), "blue", &PerformanceStats::default(), false);
        assert_eq!(winner.underdog_multiplier, 1.0);
        assert_eq!(loser.underdog_multiplier, 1.0);
    }

    #[test]
    fn underdog_tiers_take_highest_met() {
        let tiers = ScoringRules::default().underdog_tiers;
        assert_eq!(underdog_multiplier(&tiers, None), 1.0);
        assert_eq!(underdog_multiplier(&tiers, Some(-150)), 1.0);
        assert_eq!(underdog_multiplier(&tiers, Some(50)), 1.0);
        assert_eq!(underdog_multiplier(&tiers, Some(100)), 1.2);
        assert_eq!(underdog_multiplier(&tiers, Some(299)), 1.4);
        assert_eq!(underdog_multiplier(&tiers, Some(300)), 1.6);
        assert_eq!(underdog_multiplier(&tiers, Some(900)), 2.0);
    }

    #[test]
    fn bonus_awards_count_as_performance() {
        let mut o = outcome(Method::Stoppage, 2);
        o.bonuses.performance_of_the_night.push(CompetitorId::new("red"));
        o.bonuses.fight_of_the_night = true;
        let b = bout(false, None, None);
        let red = score(&b, &o, "red", &PerformanceStats::default(), false);
        let blue = score(&b, &o, "blue", &PerformanceStats::default(), false);
        assert_eq!(red.performance, 25.0);
        assert_eq!(blue.performance, 10.0);
    }

    #[test]
    fn same_inputs_same_score() {
        let b = bout(true, Some(180), Some(-220));
        let o = outcome(Method::Submission, 2);
        let stats = PerformanceStats {
            significant_strikes: 37,
            control_seconds: 211,
            submission_attempts: 3,
            ..Default::default()
        };
        assert_eq!(score(&b, &o, "red", &stats, true), score(&b, &o, "red", &stats, true));
    }
}
