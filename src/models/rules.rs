//! Combat rules for a single bout: duration, score values and penalty limit.

use serde::{Deserialize, Serialize};

/// Default regulation time in seconds.
pub const DEFAULT_DURATION_SECS: u32 = 240;
pub const DEFAULT_IPPON_POINTS: u32 = 10;
pub const DEFAULT_WAZAARI_POINTS: u32 = 7;
pub const DEFAULT_YUKO_POINTS: u32 = 1;
/// Penalties (shido) that add up to hansoku-make.
pub const DEFAULT_MAX_PENALTIES: u32 = 3;

/// Kind of score event the operator records.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreKind {
    Yuko,
    #[serde(alias = "wazaari")]
    WazaAri,
    /// Full win: ends the bout as soon as it is recorded.
    Ippon,
}

/// What happens to score/penalty mutations once the bout has a winner.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LateMutationPolicy {
    /// Keep accepting score and penalty changes; the recorded winner stays as is.
    #[default]
    Permissive,
    /// Ignore score and penalty changes after the bout ended.
    Locked,
}

/// Tunables for one bout. Every field falls back to its default when missing
/// from a serialized override.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringRules {
    /// Regulation time in seconds.
    pub duration: u32,
    pub ippon_points: u32,
    pub wazaari_points: u32,
    pub yuko_points: u32,
    /// Penalty count at which the penalized side loses. 0 disables disqualification
    /// by penalties; counts then have no upper bound.
    pub max_penalties: u32,
    pub late_mutations: LateMutationPolicy,
}

impl Default for ScoringRules {
    fn default() -> Self {
        Self {
            duration: DEFAULT_DURATION_SECS,
            ippon_points: DEFAULT_IPPON_POINTS,
            wazaari_points: DEFAULT_WAZAARI_POINTS,
            yuko_points: DEFAULT_YUKO_POINTS,
            max_penalties: DEFAULT_MAX_PENALTIES,
            late_mutations: LateMutationPolicy::Permissive,
        }
    }
}

impl ScoringRules {
    /// Points credited for a score event of the given kind.
    pub fn points(&self, kind: ScoreKind) -> u32 {
        match kind {
            ScoreKind::Yuko => self.yuko_points,
            ScoreKind::WazaAri => self.wazaari_points,
            ScoreKind::Ippon => self.ippon_points,
        }
    }
}
