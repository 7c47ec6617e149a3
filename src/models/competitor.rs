//! Competitor as supplied by the data layer when a match view opens.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a competitor (used as the match winner id).
pub type CompetitorId = Uuid;

/// A registered judoka: identity plus club affiliation.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Competitor {
    pub id: CompetitorId,
    pub name: String,
    /// Club name; empty when the competitor is unaffiliated.
    #[serde(default)]
    pub club: String,
}

impl Competitor {
    /// Create a competitor with a fresh id.
    pub fn new(name: impl Into<String>, club: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            club: club.into(),
        }
    }
}
