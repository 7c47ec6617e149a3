//! Data structures for a judo bout: competitors, match descriptor, rules, outcome.

mod bout;
mod competitor;
mod outcome;
mod rules;

pub use bout::{MatchDescriptor, MatchId, Side};
pub use competitor::{Competitor, CompetitorId};
pub use outcome::{Decision, MatchUpdate, WinMethod};
pub use rules::{
    LateMutationPolicy, ScoreKind, ScoringRules, DEFAULT_DURATION_SECS, DEFAULT_IPPON_POINTS,
    DEFAULT_MAX_PENALTIES, DEFAULT_WAZAARI_POINTS, DEFAULT_YUKO_POINTS,
};
