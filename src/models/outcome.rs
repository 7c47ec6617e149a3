//! How a bout was decided, and the result payload handed to the data layer on save.

use crate::models::bout::Side;
use crate::models::competitor::CompetitorId;
use serde::{Deserialize, Serialize};

/// Reason a bout ended.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WinMethod {
    /// Ippon.
    FullWin,
    /// Hansoku-make: the opponent reached the penalty limit.
    PenaltyDisqualification,
    /// Referee call after regulation time ran out.
    TimeExpiry,
    /// Operator-declared decision (judges, golden score, withdrawal).
    #[default]
    Decision,
}

/// Winner of a bout and how they won.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Decision {
    pub side: Side,
    pub winner_id: CompetitorId,
    pub method: WinMethod,
}

/// Result row for the update-by-id call. Field names follow the matches table.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct MatchUpdate {
    pub score1: u32,
    pub score2: u32,
    pub penalties1: u32,
    pub penalties2: u32,
    /// None while the bout is undecided.
    pub winner_id: Option<CompetitorId>,
    pub win_method: Option<WinMethod>,
    pub remaining_seconds: u32,
}
