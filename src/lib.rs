//! Judo match scoreboard: library with models, live scoring logic and the store seam.

pub mod logic;
pub mod models;
pub mod store;

pub use logic::{
    ClockState, ClockTicker, MatchClock, MatchSession, MatchStatus, ScoreBoard, SessionSnapshot,
    TickControl, TICK_PERIOD,
};
pub use models::{
    Competitor, CompetitorId, Decision, LateMutationPolicy, MatchDescriptor, MatchId, MatchUpdate,
    ScoreKind, ScoringRules, Side, WinMethod,
};
pub use store::{InMemoryMatchStore, MatchStore, StoreError, StoredMatch};
