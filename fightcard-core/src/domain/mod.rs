//! Domain records shared by pricing, validation, lifecycle and scoring.

pub mod bout;
pub mod competitor;
pub mod event;
pub mod ids;
pub mod outcome;
pub mod roster;

pub use bout::{Bout, BoutStatus, Corner};
pub use competitor::{Competitor, FightRecord};
pub use event::{Event, EventCategory};
pub use ids::{BoutId, CompetitorId, EventId, Fingerprint, LeagueId, RosterId, UserId};
pub use outcome::{BonusAwards, Method, Outcome, PerformanceStats};
pub use roster::{PricedCompetitor, Roster, RosterPick, RosterStatus, Salary};
