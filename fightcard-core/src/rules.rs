//! Rule sets for pricing, scoring and league play.
//!
//! Engines never read global constants: every number they use comes from one
//! of these values, so a league or season can carry its own rules and tests
//! can swap them freely. All fields default, which lets a TOML file override
//! only what it cares about.

use chrono::Duration;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum RulesError {
    #[error("min_salary {min} exceeds max_salary {max}")]
    SalaryBounds { min: u32, max: u32 },
    #[error("rounding unit must be positive")]
    RoundingUnit,
    #[error("{0} tiers are not ordered")]
    TierOrder(&'static str),
    #[error("{name} multiplier must be positive, got {value}")]
    Multiplier { name: &'static str, value: f64 },
    #[error("roster size must be positive")]
    RosterSize,
    #[error("lock lead must be between 0 and {max} minutes, got {minutes}")]
    LockLead { minutes: i64, max: i64 },
    #[error("opposing competitors are exclusive: max picks per bout must be 1, got {0}")]
    PicksPerBout(usize),
}

// ─── Pricing ─────────────────────────────────────────────────────────

/// Award for ranks at or better than `max_rank`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RankTier {
    pub max_rank: u32,
    pub award: i64,
}

/// Award for undercard positions at or above `max_position`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CardTier {
    pub max_position: u32,
    pub award: i64,
}

/// Award keyed on an American betting line.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LineTier {
    pub line: i32,
    pub award: i64,
}

/// Award for a rate at or above `min_rate`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RateTier {
    pub min_rate: f64,
    pub award: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RankingAwards {
    pub champion: i64,
    /// Most selective first.
    pub tiers: Vec<RankTier>,
    pub unranked: i64,
}

impl Default for RankingAwards {
    fn default() -> Self {
        Self {
            champion: 700,
            tiers: vec![
                RankTier { max_rank: 1, award: 600 },
                RankTier { max_rank: 3, award: 500 },
                RankTier { max_rank: 5, award: 400 },
                RankTier { max_rank: 10, award: 300 },
                RankTier { max_rank: 15, award: 200 },
            ],
            unranked: 100,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CardAwards {
    pub headliner: i64,
    pub title: i64,
    pub co_headliner: i64,
    /// Higher on the card first.
    pub undercard: Vec<CardTier>,
    pub undercard_floor: i64,
}

impl Default for CardAwards {
    fn default() -> Self {
        Self {
            headliner: 500,
            title: 400,
            co_headliner: 350,
            undercard: vec![
                CardTier { max_position: 3, award: 250 },
                CardTier { max_position: 5, award: 200 },
                CardTier { max_position: 8, award: 150 },
            ],
            undercard_floor: 100,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarketAwards {
    /// Matched when `line <= tier.line`; heaviest favorite first.
    pub favorite: Vec<LineTier>,
    /// Matched when `line >= tier.line`; heaviest underdog first.
    pub underdog: Vec<LineTier>,
    /// Lines that fall between the two ladders.
    pub pick_em: i64,
    pub no_line: i64,
}

impl Default for MarketAwards {
    fn default() -> Self {
        Self {
            favorite: vec![
                LineTier { line: -400, award: 400 },
                LineTier { line: -250, award: 300 },
                LineTier { line: -150, award: 200 },
                LineTier { line: -1, award: 150 },
            ],
            underdog: vec![
                LineTier { line: 300, award: -150 },
                LineTier { line: 200, award: -50 },
                LineTier { line: 100, award: 50 },
            ],
            pick_em: 100,
            no_line: 100,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormAwards {
    /// Matched when `win_rate >= min_rate`; best first.
    pub win_rate: Vec<RateTier>,
    /// Matched when `finish_rate > min_rate`; best first.
    pub finish_rate: Vec<RateTier>,
    pub no_history: i64,
}

impl Default for FormAwards {
    fn default() -> Self {
        Self {
            win_rate: vec![
                RateTier { min_rate: 0.85, award: 400 },
                RateTier { min_rate: 0.75, award: 300 },
                RateTier { min_rate: 0.65, award: 200 },
                RateTier { min_rate: 0.50, award: 100 },
                RateTier { min_rate: 0.35, award: 50 },
            ],
            finish_rate: vec![
                RateTier { min_rate: 0.70, award: 150 },
                RateTier { min_rate: 0.50, award: 75 },
            ],
            no_history: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecognitionAwards {
    /// Champions and pound-for-pound ranked fighters.
    pub elite: i64,
    pub contender: i64,
    pub contender_max_rank: u32,
    pub veteran: i64,
    pub veteran_min_wins: u32,
    pub baseline: i64,
}

impl Default for RecognitionAwards {
    fn default() -> Self {
        Self {
            elite: 300,
            contender: 200,
            contender_max_rank: 5,
            veteran: 100,
            veteran_min_wins: 10,
            baseline: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PricingRules {
    pub base: i64,
    pub min_salary: u32,
    pub max_salary: u32,
    pub rounding_unit: u32,
    pub ranking: RankingAwards,
    pub card: CardAwards,
    pub market: MarketAwards,
    pub form: FormAwards,
    pub recognition: RecognitionAwards,
}

impl Default for PricingRules {
    fn default() -> Self {
        Self {
            base: 1000,
            min_salary: 1000,
            max_salary: 3000,
            rounding_unit: 100,
            ranking: RankingAwards::default(),
            card: CardAwards::default(),
            market: MarketAwards::default(),
            form: FormAwards::default(),
            recognition: RecognitionAwards::default(),
        }
    }
}

impl PricingRules {
    pub fn check(&self) -> Result<(), RulesError> {
        if self.min_salary > self.max_salary {
            return Err(RulesError::SalaryBounds {
                min: self.min_salary,
                max: self.max_salary,
            });
        }
        if self.rounding_unit == 0 {
            return Err(RulesError::RoundingUnit);
        }
        if !is_sorted_by(&self.ranking.tiers, |a, b| a.max_rank < b.max_rank) {
            return Err(RulesError::TierOrder("ranking"));
        }
        if !is_sorted_by(&self.card.undercard, |a, b| a.max_position < b.max_position) {
            return Err(RulesError::TierOrder("undercard"));
        }
        if !is_sorted_by(&self.market.favorite, |a, b| a.line < b.line) {
            return Err(RulesError::TierOrder("favorite line"));
        }
        if !is_sorted_by(&self.market.underdog, |a, b| a.line > b.line) {
            return Err(RulesError::TierOrder("underdog line"));
        }
        if !is_sorted_by(&self.form.win_rate, |a, b| a.min_rate > b.min_rate)
            || !is_sorted_by(&self.form.finish_rate, |a, b| a.min_rate > b.min_rate)
        {
            return Err(RulesError::TierOrder("form"));
        }
        Ok(())
    }
}

// ─── Scoring ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FinishAwards {
    pub stoppage: f64,
    pub submission: f64,
    pub decision: f64,
    pub disqualification: f64,
}

impl Default for FinishAwards {
    fn default() -> Self {
        Self {
            stoppage: 30.0,
            submission: 25.0,
            decision: 10.0,
            disqualification: 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PerformanceAwards {
    pub knockdown: f64,
    pub significant_strike: f64,
    pub significant_strike_cap: f64,
    pub takedown: f64,
    pub control_minute: f64,
    pub submission_attempt: f64,
    pub submission_attempt_cap: f64,
    pub performance_of_the_night: f64,
    pub fight_of_the_night: f64,
}

impl Default for PerformanceAwards {
    fn default() -> Self {
        Self {
            knockdown: 10.0,
            significant_strike: 0.25,
            significant_strike_cap: 25.0,
            takedown: 5.0,
            control_minute: 1.0,
            submission_attempt: 3.0,
            submission_attempt_cap: 12.0,
            performance_of_the_night: 15.0,
            fight_of_the_night: 10.0,
        }
    }
}

/// Penalty magnitudes. Subtracted from the raw total.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PenaltyRules {
    pub weight_miss: f64,
    pub point_deduction: f64,
    pub disqualification_loss: f64,
}

impl Default for PenaltyRules {
    fn default() -> Self {
        Self {
            weight_miss: 15.0,
            point_deduction: 10.0,
            disqualification_loss: 20.0,
        }
    }
}

/// Multiplier for winners whose line met or exceeded `line`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UnderdogTier {
    pub line: i32,
    pub multiplier: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringRules {
    pub participation: f64,
    pub win: f64,
    pub loss: f64,
    pub finish: FinishAwards,
    /// Indexed by ending round minus one.
    pub round_bonus: Vec<f64>,
    pub title_bonus: f64,
    pub performance: PerformanceAwards,
    pub penalties: PenaltyRules,
    /// Ascending by line.
    pub underdog_tiers: Vec<UnderdogTier>,
}

impl Default for ScoringRules {
    fn default() -> Self {
        Self {
            participation: 10.0,
            win: 40.0,
            loss: -5.0,
            finish: FinishAwards::default(),
            round_bonus: vec![25.0, 20.0, 15.0, 10.0, 5.0],
            title_bonus: 20.0,
            performance: PerformanceAwards::default(),
            penalties: PenaltyRules::default(),
            underdog_tiers: vec![
                UnderdogTier { line: 100, multiplier: 1.2 },
                UnderdogTier { line: 200, multiplier: 1.4 },
                UnderdogTier { line: 300, multiplier: 1.6 },
                UnderdogTier { line: 500, multiplier: 2.0 },
            ],
        }
    }
}

impl ScoringRules {
    pub fn check(&self) -> Result<(), RulesError> {
        if !is_sorted_by(&self.underdog_tiers, |a, b| {
            a.line < b.line && a.multiplier <= b.multiplier
        }) {
            return Err(RulesError::TierOrder("underdog multiplier"));
        }
        if !is_sorted_by(&self.round_bonus, |a, b| a > b) {
            return Err(RulesError::TierOrder("round bonus"));
        }
        if let Some(tier) = self.underdog_tiers.iter().find(|t| t.multiplier <= 0.0) {
            return Err(RulesError::Multiplier {
                name: "underdog",
                value: tier.multiplier,
            });
        }
        Ok(())
    }
}

// ─── League ──────────────────────────────────────────────────────────

/// One week.
pub const MAX_LOCK_LEAD_MINUTES: i64 = 7 * 24 * 60;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LeagueSettings {
    pub budget: u64,
    pub roster_size: usize,
    /// Opposing competitors are mutually exclusive; `check` requires 1.
    pub max_picks_per_bout: usize,
    pub lock_lead_minutes: i64,
    pub boost_enabled: bool,
    pub boost_multiplier: f64,
    pub category_multiplier_enabled: bool,
    pub marquee_multiplier: f64,
}

impl Default for LeagueSettings {
    fn default() -> Self {
        Self {
            budget: 10_000,
            roster_size: 5,
            max_picks_per_bout: 1,
            lock_lead_minutes: 30,
            boost_enabled: true,
            boost_multiplier: 1.5,
            category_multiplier_enabled: true,
            marquee_multiplier: 1.25,
        }
    }
}

impl LeagueSettings {
    /// Lock lead, clamped to `0..=MAX_LOCK_LEAD_MINUTES` for unchecked values.
    pub fn lock_lead(&self) -> Duration {
        let minutes = self.lock_lead_minutes.clamp(0, MAX_LOCK_LEAD_MINUTES);
        Duration::try_minutes(minutes).unwrap_or_else(Duration::zero)
    }

    pub fn check(&self) -> Result<(), RulesError> {
        if self.roster_size == 0 {
            return Err(RulesError::RosterSize);
        }
        if self.max_picks_per_bout != 1 {
            return Err(RulesError::PicksPerBout(self.max_picks_per_bout));
        }
        if !(0..=MAX_LOCK_LEAD_MINUTES).contains(&self.lock_lead_minutes) {
            return Err(RulesError::LockLead {
                minutes: self.lock_lead_minutes,
                max: MAX_LOCK_LEAD_MINUTES,
            });
        }
        if self.boost_multiplier <= 0.0 {
            return Err(RulesError::Multiplier {
                name: "boost",
                value: self.boost_multiplier,
            });
        }
        if self.marquee_multiplier <= 0.0 {
            return Err(RulesError::Multiplier {
                name: "marquee",
                value: self.marquee_multiplier,
            });
        }
        Ok(())
    }
}

fn is_sorted_by<T>(items: &[T], ordered: impl Fn(&T, &T) -> bool) -> bool {
    items.windows(2).all(|w| ordered(&w[0], &w[1]))
}
