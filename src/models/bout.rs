//! Match descriptor and the two sides of a bout.

use crate::models::competitor::Competitor;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a match (key for the update-by-id call on save).
pub type MatchId = Uuid;

/// One of the two sides of a bout. Serialized as `1` / `2`.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Side {
    One,
    Two,
}

impl Side {
    /// The opposing side.
    pub fn other(self) -> Self {
        match self {
            Side::One => Side::Two,
            Side::Two => Side::One,
        }
    }

    /// Array index for per-side counters.
    pub(crate) fn index(self) -> usize {
        match self {
            Side::One => 0,
            Side::Two => 1,
        }
    }
}

impl From<Side> for u8 {
    fn from(side: Side) -> u8 {
        match side {
            Side::One => 1,
            Side::Two => 2,
        }
    }
}

impl TryFrom<u8> for Side {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Side::One),
            2 => Ok(Side::Two),
            other => Err(format!("side must be 1 or 2 (got {})", other)),
        }
    }
}

/// Read-only description of a scheduled match, as handed over by the data layer.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct MatchDescriptor {
    pub id: MatchId,
    /// Weight/age category label, e.g. "U18 -73kg".
    pub category: String,
    /// Round label, e.g. "Quarter-final".
    pub round: String,
    #[serde(rename = "competitor1")]
    pub competitor_1: Competitor,
    #[serde(rename = "competitor2")]
    pub competitor_2: Competitor,
    pub tatami: u32,
}

impl MatchDescriptor {
    pub fn new(
        category: impl Into<String>,
        round: impl Into<String>,
        competitor_1: Competitor,
        competitor_2: Competitor,
        tatami: u32,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            category: category.into(),
            round: round.into(),
            competitor_1,
            competitor_2,
            tatami,
        }
    }

    /// Competitor fighting on the given side.
    pub fn competitor(&self, side: Side) -> &Competitor {
        match side {
            Side::One => &self.competitor_1,
            Side::Two => &self.competitor_2,
        }
    }
}
