//! Salary pricing — competitor profile + bout context → capped salary.
//!
//! Five independent awards are added onto a fixed base:
//! ranking, card position, market line, form, recognition.
//! The sum is rounded to the nearest `rounding_unit` (halves round up)
//! and clamped to `[min_salary, max_salary]`.
//!
//! Pricing is pure. Historical picks carry a frozen salary, and re-pricing
//! the same inputs must reproduce it exactly.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::domain::{Bout, BoutStatus, Competitor, CompetitorId, EventId, PricedCompetitor, Salary};
use crate::rules::PricingRules;

/// Every award that went into a salary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalaryBreakdown {
    pub base: i64,
    pub ranking: i64,
    pub card: i64,
    pub market: i64,
    pub form: i64,
    pub recognition: i64,
    /// Sum before rounding and clamping.
    pub raw: i64,
    pub salary: Salary,
}

/// Price one competitor for the bout they are entered in.
pub fn price(competitor: &Competitor, bout: &Bout, rules: &PricingRules) -> Salary {
    price_breakdown(competitor, bout, rules).salary
}

pub fn price_breakdown(competitor: &Competitor, bout: &Bout, rules: &PricingRules) -> SalaryBreakdown {
    let ranking = ranking_award(competitor, rules);
    let card = card_award(bout, rules);
    let market = market_award(bout.line_for(&competitor.id), rules);
    let form = form_award(competitor, rules);
    let recognition = recognition_award(competitor, rules);

    let raw = rules.base + ranking + card + market + form + recognition;

    SalaryBreakdown {
        base: rules.base,
        ranking,
        card,
        market,
        form,
        recognition,
        raw,
        salary: round_and_clamp(raw, rules),
    }
}

pub fn ranking_award(competitor: &Competitor, rules: &PricingRules) -> i64 {
    let awards = &rules.ranking;
    if competitor.champion {
        return awards.champion;
    }
    competitor
        .ranking
        .and_then(|rank| awards.tiers.iter().find(|t| rank <= t.max_rank))
        .map_or(awards.unranked, |t| t.award)
}

pub fn card_award(bout: &Bout, rules: &PricingRules) -> i64 {
    let awards = &rules.card;
    if bout.headliner {
        awards.headliner
    } else if bout.is_title_fight() {
        awards.title
    } else if bout.co_headliner {
        awards.co_headliner
    } else {
        awards
            .undercard
            .iter()
            .find(|t| bout.card_position <= t.max_position)
            .map_or(awards.undercard_floor, |t| t.award)
    }
}

pub fn market_award(line: Option<i32>, rules: &PricingRules) -> i64 {
    let awards = &rules.market;
    let Some(line) = line else {
        return awards.no_line;
    };
    if let Some(tier) = awards.favorite.iter().find(|t| line <= t.line) {
        return tier.award;
    }
    if let Some(tier) = awards.underdog.iter().find(|t| line >= t.line) {
        return tier.award;
    }
    awards.pick_em
}

pub fn form_award(competitor: &Competitor, rules: &PricingRules) -> i64 {
    let awards = &rules.form;
    let Some(win_rate) = competitor.record.win_rate() else {
        return awards.no_history;
    };

    let from_wins = awards
        .win_rate
        .iter()
        .find(|t| win_rate >= t.min_rate)
        .map_or(0, |t| t.award);

    let from_finishes = competitor
        .record
        .finish_rate()
        .and_then(|rate| awards.finish_rate.iter().find(|t| rate > t.min_rate))
        .map_or(0, |t| t.award);

    from_wins + from_finishes
}

pub fn recognition_award(competitor: &Competitor, rules: &PricingRules) -> i64 {
    let awards = &rules.recognition;
    if competitor.champion || competitor.pound_for_pound.is_some() {
        awards.elite
    } else if competitor
        .ranking
        .is_some_and(|rank| rank <= awards.contender_max_rank)
    {
        awards.contender
    } else if competitor.record.wins >= awards.veteran_min_wins {
        awards.veteran
    } else {
        awards.baseline
    }
}

fn round_and_clamp(raw: i64, rules: &PricingRules) -> Salary {
    let unit = i64::from(rules.rounding_unit.max(1));
    let rounded = (raw + unit / 2).div_euclid(unit) * unit;
    let clamped = rounded.clamp(i64::from(rules.min_salary), i64::from(rules.max_salary));
    // Bounds are u32, so the clamped value always fits.
    Salary::try_from(clamped).unwrap_or(rules.min_salary)
}

/// Price both corners of every live bout on a card.
///
/// Cancelled bouts are skipped. A corner whose competitor is missing from
/// `competitors` is logged and left out of the pool. The result is ordered
/// by card position, red corner first.
pub fn generate_salaries(
    event_id: &EventId,
    bouts: &[Bout],
    competitors: &[Competitor],
    rules: &PricingRules,
) -> Vec<PricedCompetitor> {
    let by_id: HashMap<&CompetitorId, &Competitor> =
        competitors.iter().map(|c| (&c.id, c)).collect();

    let mut card: Vec<&Bout> = bouts
        .iter()
        .filter(|b| b.event_id == *event_id && b.status != BoutStatus::Cancelled)
        .collect();
    card.sort_by_key(|b| b.card_position);

    let mut pool = Vec::with_capacity(card.len() * 2);
    for bout in card {
        for corner in [&bout.red, &bout.blue] {
            let Some(competitor) = by_id.get(&corner.competitor) else {
                warn!(
                    bout = %bout.id,
                    competitor = %corner.competitor,
                    "competitor missing from catalog, not priced"
                );
                continue;
            };
            pool.push(PricedCompetitor {
                competitor: (*competitor).clone(),
                bout_id: bout.id.clone(),
                event_id: event_id.clone(),
                salary: price(competitor, bout, rules),
            });
        }
    }
    pool
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{BoutId, Corner, FightRecord};

    fn bout(position: u32) -> Bout {
        Bout {
            id: BoutId::new(format!("b{position}")),
            event_id: EventId::new("e1"),
            red: Corner::new("red", None),
            blue: Corner::new("blue", None),
            weight_class: "Lightweight".into(),
            title: false,
            interim_title: false,
            headliner: false,
            co_headliner: false,
            card_position: position,
            scheduled_rounds: 3,
            status: BoutStatus::Scheduled,
        }
    }

    fn ranked(rank: Option<u32>) -> Competitor {
        let mut c = Competitor::new("red", "Red", "Lightweight");
        c.ranking = rank;
        c
    }

    #[test]
    fn ranking_bands_strictly_decrease() {
        let rules = PricingRules::default();
        let awards: Vec<i64> = [1, 2, 4, 7, 12, 20]
            .iter()
            .map(|r| ranking_award(&ranked(Some(*r)), &rules))
            .collect();
        assert_eq!(awards, vec![600, 500, 400, 300, 200, 100]);
        assert_eq!(ranking_award(&ranked(None), &rules), 100);

        let mut champ = ranked(None);
        champ.champion = true;
        assert_eq!(ranking_award(&champ, &rules), 700);
    }

    #[test]
    fn card_position_ordering() {
        let rules = PricingRules::default();
        let mut main = bout(1);
        main.headliner = true;
        main.title = true;
        let mut title = bout(3);
        title.title = true;
        let mut co = bout(2);
        co.co_headliner = true;

        let a = card_award(&main, &rules);
        let b = card_award(&title, &rules);
        let c = card_award(&co, &rules);
        let d = card_award(&bout(3), &rules);
        let e = card_award(&bout(12), &rules);
        assert!(a > b && b > c && c > d && d > e);
    }

    #[test]
    fn market_line_bands() {
        let rules = PricingRules::default();
        assert_eq!(market_award(None, &rules), 100);
        assert_eq!(market_award(Some(-500), &rules), 400);
        assert_eq!(market_award(Some(-250), &rules), 300);
        assert_eq!(market_award(Some(-110), &rules), 150);
        assert_eq!(market_award(Some(50), &rules), 100);
        assert_eq!(market_award(Some(100), &rules), 50);
        assert_eq!(market_award(Some(240), &rules), -50);
        assert_eq!(market_award(Some(650), &rules), -150);
    }

    #[test]
    fn form_adds_finish_bonus() {
        let rules = PricingRules::default();
        let mut c = ranked(None);
        c.record = FightRecord {
            wins: 18,
            losses: 2,
            stoppage_wins: 10,
            submission_wins: 4,
            decision_wins: 4,
            ..Default::default()
        };
        // 90% win rate, 77.8% finish rate
        assert_eq!(form_award(&c, &rules), 400 + 150);

        c.record.stoppage_wins = 6;
        c.record.decision_wins = 8;
        // 55.6% finish rate
        assert_eq!(form_award(&c, &rules), 400 + 75);
    }

    #[test]
    fn missing_form_degrades_to_no_history_band() {
        let rules = PricingRules::default();
        assert_eq!(form_award(&ranked(None), &rules), rules.form.no_history);
    }

    #[test]
    fn recognition_ladder() {
        let rules = PricingRules::default();
        let mut p4p = ranked(Some(8));
        p4p.pound_for_pound = Some(12);
        assert_eq!(recognition_award(&p4p, &rules), 300);
        assert_eq!(recognition_award(&ranked(Some(4)), &rules), 200);

        let mut vet = ranked(None);
        vet.record.wins = 14;
        assert_eq!(recognition_award(&vet, &rules), 100);
        assert_eq!(recognition_award(&ranked(None), &rules), 0);
    }

    #[test]
    fn rounds_half_up_to_unit() {
        let rules = PricingRules {
            min_salary: 0,
            max_salary: 100_000,
            ..Default::default()
        };
        assert_eq!(round_and_clamp(1049, &rules), 1000);
        assert_eq!(round_and_clamp(1050, &rules), 1100);
        assert_eq!(round_and_clamp(1151, &rules), 1200);
    }

    #[test]
    fn weak_underdog_prices_near_floor() {
        let rules = PricingRules::default();
        let mut b = bout(11);
        b.red.line = Some(350);
        let breakdown = price_breakdown(&ranked(None), &b, &rules);
        // 1000 base + 100 unranked + 100 floor - 150 line + 0 + 0
        assert_eq!(breakdown.raw, 1050);
        assert_eq!(breakdown.salary, 1100);
    }

    #[test]
    fn generate_salaries_skips_missing_and_cancelled() {
        let rules = PricingRules::default();
        let live = bout(2);
        let mut cancelled = bout(1);
        cancelled.id = BoutId::new("cancelled");
        cancelled.status = BoutStatus::Cancelled;

        let competitors = vec![ranked(Some(3))];
        let pool = generate_salaries(
            &EventId::new("e1"),
            &[cancelled, live],
            &competitors,
            &rules,
        );

        assert_eq!(pool.len(), 1);
        assert_eq!(pool[0].id().as_str(), "red");
        assert_eq!(pool[0].bout_id.as_str(), "b2");
    }
}
