//! Property tests for engine invariants.
//!
//! Uses proptest to verify:
//! 1. Validator soundness — a roster reported valid satisfies every rule
//! 2. Pricing purity — same inputs, same salary, always within bounds
//! 3. Scoring idempotence — identical inputs give bit-identical scores
//! 4. Underdog monotonicity — richer line never lowers the multiplier
//! 5. Lock monotonicity — no operation sequence returns a roster to draft

use std::collections::{BTreeMap, HashSet};

use chrono::{DateTime, Duration, TimeZone, Utc};
use proptest::prelude::*;

use fightcard_core::clock::ManualClock;
use fightcard_core::domain::{
    BonusAwards, Bout, BoutId, BoutStatus, Competitor, CompetitorId, Corner, Event,
    EventCategory, EventId, FightRecord, Method, Outcome, PerformanceStats, PricedCompetitor,
    Roster, RosterPick, RosterStatus,
};
use fightcard_core::lifecycle::RosterLifecycle;
use fightcard_core::pricing::price;
use fightcard_core::rules::{LeagueSettings, PricingRules, ScoringRules};
use fightcard_core::scoring::{score_fighter, underdog_multiplier};
use fightcard_core::validation::validate;

// ── Fixtures ─────────────────────────────────────────────────────────

const BOUTS: usize = 6;

fn card() -> Vec<Bout> {
    (0..BOUTS as u32)
        .map(|i| Bout {
            id: BoutId::new(format!("b{i}")),
            event_id: EventId::new("e1"),
            red: Corner::new(format!("r{i}"), Some(-150)),
            blue: Corner::new(format!("u{i}"), Some(130)),
            weight_class: "Lightweight".into(),
            title: i == 0,
            interim_title: false,
            headliner: i == 0,
            co_headliner: i == 1,
            card_position: i + 1,
            scheduled_rounds: if i == 0 { 5 } else { 3 },
            status: BoutStatus::Scheduled,
        })
        .collect()
}

/// Competitor id for corner `c` (0 red, 1 blue) of bout `b`.
fn fighter(b: usize, c: usize) -> String {
    if c == 0 {
        format!("r{b}")
    } else {
        format!("u{b}")
    }
}

fn start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 7, 13, 2, 0, 0).unwrap()
}

fn event() -> Event {
    Event {
        id: EventId::new("e1"),
        name: "Summer Card".into(),
        starts_at: start(),
        category: EventCategory::Marquee,
        bouts: (0..BOUTS).map(|i| BoutId::new(format!("b{i}"))).collect(),
    }
}

// ── Strategies (proptest) ────────────────────────────────────────────

fn arb_pick() -> impl Strategy<Value = RosterPick> {
    (0..BOUTS, 0..2usize, 1000u32..=3000, any::<bool>()).prop_map(|(b, c, salary, boosted)| {
        RosterPick {
            competitor: CompetitorId::new(fighter(b, c)),
            salary,
            slot: 0,
            boosted,
        }
    })
}

fn arb_picks() -> impl Strategy<Value = Vec<RosterPick>> {
    prop::collection::vec(arb_pick(), 3..8).prop_map(|mut picks| {
        for (slot, pick) in picks.iter_mut().enumerate() {
            pick.slot = slot;
        }
        picks
    })
}

fn arb_settings() -> impl Strategy<Value = LeagueSettings> {
    (3usize..=6, 6_000u64..=16_000, any::<bool>()).prop_map(|(size, budget, boost)| {
        LeagueSettings {
            roster_size: size,
            budget,
            boost_enabled: boost,
            ..Default::default()
        }
    })
}

fn arb_competitor() -> impl Strategy<Value = Competitor> {
    (
        any::<bool>(),
        prop::option::of(1u32..40),
        prop::option::of(1u32..20),
        0u32..30,
        0u32..15,
        0u32..5,
        0u32..=100,
    )
        .prop_map(|(champion, ranking, p4p, wins, losses, draws, finish_pct)| {
            let finishes = wins * finish_pct / 100;
            let mut c = Competitor::new("c1", "Prop Fighter", "Lightweight");
            c.champion = champion;
            c.ranking = ranking;
            c.pound_for_pound = p4p;
            c.record = FightRecord {
                wins,
                losses,
                draws,
                stoppage_wins: finishes / 2,
                submission_wins: finishes - finishes / 2,
                decision_wins: wins - finishes,
                ..Default::default()
            };
            c
        })
}

fn arb_bout() -> impl Strategy<Value = Bout> {
    (
        any::<bool>(),
        any::<bool>(),
        any::<bool>(),
        1u32..16,
        prop::option::of(-900i32..900),
    )
        .prop_map(|(headliner, title, co, position, line)| Bout {
            id: BoutId::new("b1"),
            event_id: EventId::new("e1"),
            red: Corner::new("c1", line),
            blue: Corner::new("c2", line.map(|l| -l)),
            weight_class: "Lightweight".into(),
            title,
            interim_title: false,
            headliner,
            co_headliner: co && !headliner,
            card_position: position,
            scheduled_rounds: 3,
            status: BoutStatus::Scheduled,
        })
}

fn arb_method() -> impl Strategy<Value = Method> {
    prop_oneof![
        Just(Method::Stoppage),
        Just(Method::Submission),
        Just(Method::Decision),
        Just(Method::Disqualification),
        Just(Method::Draw),
        Just(Method::NoContest),
    ]
}

fn arb_stats() -> impl Strategy<Value = PerformanceStats> {
    (0u32..4, 0u32..200, 0u32..8, 0u32..900, 0u32..6, 0u32..3, any::<bool>()).prop_map(
        |(kd, sig, td, control, subs, deductions, missed)| PerformanceStats {
            knockdowns: kd,
            significant_strikes: sig,
            takedowns_landed: td,
            control_seconds: control,
            submission_attempts: subs,
            point_deductions: deductions,
            missed_weight: missed,
            ..Default::default()
        },
    )
}

fn outcome(method: Method, round: u32) -> Outcome {
    let decisive = method.is_decisive();
    Outcome {
        bout_id: BoutId::new("b1"),
        winner: decisive.then(|| CompetitorId::new("c1")),
        loser: decisive.then(|| CompetitorId::new("c2")),
        method,
        round,
        time_seconds: 120,
        stats: BTreeMap::new(),
        bonuses: BonusAwards::default(),
    }
}

// ── 1. Validator soundness ───────────────────────────────────────────

proptest! {
    #[test]
    fn valid_roster_satisfies_every_rule(picks in arb_picks(), settings in arb_settings()) {
        let bouts = card();
        let report = validate(&picks, &settings, &bouts);
        prop_assert_eq!(report.valid, report.violations.is_empty());

        if report.valid {
            prop_assert_eq!(picks.len(), settings.roster_size);

            let spent: u64 = picks.iter().map(|p| u64::from(p.salary)).sum();
            prop_assert!(spent <= settings.budget);

            let ids: HashSet<&CompetitorId> = picks.iter().map(|p| &p.competitor).collect();
            prop_assert_eq!(ids.len(), picks.len());

            for bout in &bouts {
                let both = picks.iter().any(|p| p.competitor == bout.red.competitor)
                    && picks.iter().any(|p| p.competitor == bout.blue.competitor);
                prop_assert!(!both, "opposing corners of {} both picked", bout.id);
            }

            let boosted = picks.iter().filter(|p| p.boosted).count();
            prop_assert!(boosted <= 1);
            if !settings.boost_enabled {
                prop_assert_eq!(boosted, 0);
            }
        }
    }

    /// The validator never stops at the first problem.
    #[test]
    fn validator_reports_are_stable(picks in arb_picks(), settings in arb_settings()) {
        let bouts = card();
        prop_assert_eq!(validate(&picks, &settings, &bouts), validate(&picks, &settings, &bouts));
    }
}

// ── 2. Pricing purity ────────────────────────────────────────────────

proptest! {
    #[test]
    fn price_is_pure_and_bounded(competitor in arb_competitor(), bout in arb_bout()) {
        let rules = PricingRules::default();
        let first = price(&competitor, &bout, &rules);
        let second = price(&competitor, &bout, &rules);
        prop_assert_eq!(first, second);
        prop_assert!(first >= rules.min_salary && first <= rules.max_salary);
        prop_assert_eq!(first % rules.rounding_unit, 0);
    }
}

// ── 3. Scoring idempotence ───────────────────────────────────────────

proptest! {
    #[test]
    fn scoring_is_bit_identical_on_rerun(
        method in arb_method(),
        round in 1u32..=3,
        stats in arb_stats(),
        bout in arb_bout(),
        boosted in any::<bool>(),
        as_winner in any::<bool>(),
    ) {
        let rules = ScoringRules::default();
        let o = outcome(method, round);
        let who = CompetitorId::new(if as_winner { "c1" } else { "c2" });

        let a = score_fighter(&rules, &bout, &o, &who, &stats, boosted, 1.5);
        let b = score_fighter(&rules, &bout, &o, &who, &stats, boosted, 1.5);
        prop_assert_eq!(a.final_total.to_bits(), b.final_total.to_bits());
        prop_assert_eq!(a.raw_total.to_bits(), b.raw_total.to_bits());
        prop_assert_eq!(&a, &b);
    }
}

// ── 4. Underdog monotonicity ─────────────────────────────────────────

proptest! {
    #[test]
    fn underdog_multiplier_non_decreasing(a in 0i32..1200, b in 0i32..1200) {
        let tiers = ScoringRules::default().underdog_tiers;
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(underdog_multiplier(&tiers, Some(lo)) <= underdog_multiplier(&tiers, Some(hi)));
    }

    #[test]
    fn favorites_get_no_underdog_multiplier(line in -2000i32..0) {
        let tiers = ScoringRules::default().underdog_tiers;
        prop_assert_eq!(underdog_multiplier(&tiers, Some(line)), 1.0);
    }

    #[test]
    fn losers_get_no_underdog_multiplier(
        line in 100i32..900,
        stats in arb_stats(),
        method in prop_oneof![Just(Method::Stoppage), Just(Method::Decision), Just(Method::Submission)],
    ) {
        let mut bout = card()[0].clone();
        bout.id = BoutId::new("b1");
        bout.red = Corner::new("c1", Some(-line));
        bout.blue = Corner::new("c2", Some(line));
        let score = score_fighter(
            &ScoringRules::default(),
            &bout,
            &outcome(method, 1),
            &CompetitorId::new("c2"),
            &stats,
            false,
            1.5,
        );
        prop_assert_eq!(score.underdog_multiplier, 1.0);
    }
}

// ── 5. Lock monotonicity ─────────────────────────────────────────────

#[derive(Debug, Clone)]
enum Op {
    Add(usize, usize),
    Remove(usize, usize),
    Boost(Option<(usize, usize)>),
    Submit,
    Advance(i64),
    Refresh,
    Score,
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => (0..BOUTS, 0..2usize).prop_map(|(b, c)| Op::Add(b, c)),
        1 => (0..BOUTS, 0..2usize).prop_map(|(b, c)| Op::Remove(b, c)),
        1 => prop::option::of((0..BOUTS, 0..2usize)).prop_map(Op::Boost),
        2 => Just(Op::Submit),
        2 => (1i64..120).prop_map(Op::Advance),
        1 => Just(Op::Refresh),
        1 => Just(Op::Score),
    ]
}

fn priced(b: usize, c: usize) -> PricedCompetitor {
    let id = fighter(b, c);
    PricedCompetitor {
        competitor: Competitor::new(id.as_str(), id.as_str(), "Lightweight"),
        bout_id: BoutId::new(format!("b{b}")),
        event_id: EventId::new("e1"),
        salary: 1800,
    }
}

proptest! {
    #[test]
    fn lock_is_monotonic(ops in prop::collection::vec(arb_op(), 1..40)) {
        let settings = LeagueSettings::default();
        let (ev, bouts) = (event(), card());
        let clock = ManualClock::new(start() - Duration::hours(3));
        let lc = RosterLifecycle::new(&clock, &settings, &ev, &bouts);
        let mut roster = Roster::new("r1", "u1", "l1", "e1");
        let mut left_draft = false;

        for op in ops {
            let _ = match op {
                Op::Add(b, c) => lc.add_pick(&mut roster, &priced(b, c)).map(|_| ()),
                Op::Remove(b, c) => lc
                    .remove_pick(&mut roster, &CompetitorId::new(fighter(b, c)))
                    .map(|_| ()),
                Op::Boost(target) => {
                    let id = target.map(|(b, c)| CompetitorId::new(fighter(b, c)));
                    lc.set_boost(&mut roster, id.as_ref()).map(|_| ())
                }
                Op::Submit => lc.submit(&mut roster).map(|_| ()),
                Op::Advance(minutes) => {
                    clock.advance(Duration::minutes(minutes));
                    Ok(())
                }
                Op::Refresh => {
                    lc.refresh_lock(&mut roster);
                    Ok(())
                }
                Op::Score => lc.mark_scored(&mut roster),
            };

            if left_draft {
                prop_assert_ne!(roster.status, RosterStatus::Draft);
            }
            left_draft |= roster.status != RosterStatus::Draft;
        }
    }
}
