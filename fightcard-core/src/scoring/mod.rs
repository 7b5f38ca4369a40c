//! Scoring engine — outcomes into fantasy points.

pub mod fighter;
pub mod roster;

pub use fighter::{score_fighter, underdog_multiplier, FightResult, FighterScore};
pub use roster::{category_multiplier, score_pick, score_roster, CardIndex, RosterScore};
