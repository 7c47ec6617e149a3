//! Score and penalty ledger for one bout. Match-ending conditions are detected
//! as a side effect of each mutation.

use crate::models::{
    CompetitorId, Decision, LateMutationPolicy, MatchDescriptor, ScoreKind, ScoringRules, Side,
    WinMethod,
};
use serde::{Deserialize, Serialize};

/// Whether the bout still needs a decision.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    #[default]
    InProgress,
    Ended,
}

/// Per-side scores and penalties plus the decision, once there is one.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct ScoreBoard {
    competitors: [CompetitorId; 2],
    rules: ScoringRules,
    scores: [u32; 2],
    penalties: [u32; 2],
    decision: Option<Decision>,
}

impl ScoreBoard {
    /// Empty board for the two competitors of `descriptor`.
    pub fn new(descriptor: &MatchDescriptor, rules: ScoringRules) -> Self {
        Self {
            competitors: [descriptor.competitor_1.id, descriptor.competitor_2.id],
            rules,
            scores: [0; 2],
            penalties: [0; 2],
            decision: None,
        }
    }

    pub fn score(&self, side: Side) -> u32 {
        self.scores[side.index()]
    }

    pub fn penalties(&self, side: Side) -> u32 {
        self.penalties[side.index()]
    }

    pub fn decision(&self) -> Option<Decision> {
        self.decision
    }

    pub fn status(&self) -> MatchStatus {
        if self.decision.is_some() {
            MatchStatus::Ended
        } else {
            MatchStatus::InProgress
        }
    }

    /// Credit a score event. An ippon ends the bout for `side` whatever the totals are.
    ///
    /// Returns the decision if this call ended the bout.
    pub fn add_score(&mut self, side: Side, kind: ScoreKind) -> Option<Decision> {
        if !self.accepts_mutation() {
            return None;
        }
        let points = self.rules.points(kind);
        let score = &mut self.scores[side.index()];
        *score = score.saturating_add(points);
        if kind == ScoreKind::Ippon {
            return self.finalize(side, WinMethod::FullWin);
        }
        None
    }

    /// Take back a score event, floored at zero. Never reopens a decided bout.
    pub fn remove_score(&mut self, side: Side, kind: ScoreKind) {
        if !self.accepts_mutation() {
            return;
        }
        let points = self.rules.points(kind);
        let score = &mut self.scores[side.index()];
        *score = score.saturating_sub(points);
    }

    /// Add one penalty. Reaching the limit disqualifies `side`: the other side wins.
    /// A limit of 0 means penalties are only counted.
    ///
    /// Returns the decision if this call ended the bout.
    pub fn add_penalty(&mut self, side: Side) -> Option<Decision> {
        if !self.accepts_mutation() {
            return None;
        }
        let max = self.rules.max_penalties;
        let count = &mut self.penalties[side.index()];
        if max != 0 && *count >= max {
            return None;
        }
        *count = count.saturating_add(1);
        if *count == max {
            return self.finalize(side.other(), WinMethod::PenaltyDisqualification);
        }
        None
    }

    pub fn remove_penalty(&mut self, side: Side) {
        if !self.accepts_mutation() {
            return;
        }
        let count = &mut self.penalties[side.index()];
        *count = count.saturating_sub(1);
    }

    /// Operator override. Overwrites any earlier decision (last call wins).
    pub fn declare_winner(&mut self, side: Side, method: WinMethod) -> Decision {
        let decision = self.decision_for(side, method);
        if let Some(previous) = self.decision.replace(decision) {
            log::info!(
                "Decision overridden: side {} ({:?}) -> side {} ({:?})",
                u8::from(previous.side),
                previous.method,
                u8::from(side),
                method
            );
        } else {
            log::info!("Winner declared: side {} ({:?})", u8::from(side), method);
        }
        decision
    }

    /// Side ahead on points, then on fewer penalties. None on a full tie.
    pub fn leader(&self) -> Option<Side> {
        let (s1, s2) = (self.scores[0], self.scores[1]);
        if s1 != s2 {
            return Some(if s1 > s2 { Side::One } else { Side::Two });
        }
        let (p1, p2) = (self.penalties[0], self.penalties[1]);
        if p1 != p2 {
            return Some(if p1 < p2 { Side::One } else { Side::Two });
        }
        None
    }

    /// Single guard for mutations after the bout has been decided.
    fn accepts_mutation(&self) -> bool {
        self.decision.is_none() || self.rules.late_mutations == LateMutationPolicy::Permissive
    }

    /// Record the automatic decision unless the bout is already decided.
    fn finalize(&mut self, side: Side, method: WinMethod) -> Option<Decision> {
        if self.decision.is_some() {
            return None;
        }
        let decision = self.decision_for(side, method);
        self.decision = Some(decision);
        log::info!("Match ended: side {} wins by {:?}", u8::from(side), method);
        Some(decision)
    }

    fn decision_for(&self, side: Side, method: WinMethod) -> Decision {
        Decision {
            side,
            winner_id: self.competitors[side.index()],
            method,
        }
    }
}
