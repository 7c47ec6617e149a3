//! Match session: one clock and one ledger for the bout an operator console controls.

use crate::logic::clock::{ClockState, MatchClock};
use crate::logic::ledger::{MatchStatus, ScoreBoard};
use crate::models::{
    Decision, MatchDescriptor, MatchId, MatchUpdate, ScoreKind, ScoringRules, Side, WinMethod,
};
use crate::store::{MatchStore, StoreError};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Live state of one bout. Owned by the caller; all methods are synchronous and total.
#[derive(Clone, Debug)]
pub struct MatchSession {
    descriptor: MatchDescriptor,
    rules: ScoringRules,
    clock: MatchClock,
    board: ScoreBoard,
    opened_at: DateTime<Utc>,
}

/// Everything the operator console shows for a session.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SessionSnapshot {
    #[serde(rename = "match")]
    pub descriptor: MatchDescriptor,
    pub rules: ScoringRules,
    pub clock_state: ClockState,
    pub remaining_seconds: u32,
    pub score1: u32,
    pub score2: u32,
    pub penalties1: u32,
    pub penalties2: u32,
    pub status: MatchStatus,
    pub decision: Option<Decision>,
    /// Side currently ahead, as a hint for a decision after time expiry.
    pub leader: Option<Side>,
    pub opened_at: DateTime<Utc>,
}

impl MatchSession {
    /// Fresh session: paused clock at full duration, empty board.
    pub fn new(descriptor: MatchDescriptor, rules: ScoringRules) -> Self {
        let clock = MatchClock::new(rules.duration);
        let board = ScoreBoard::new(&descriptor, rules.clone());
        Self {
            descriptor,
            rules,
            clock,
            board,
            opened_at: Utc::now(),
        }
    }

    /// Fetch the match from the store and open a session for it.
    pub async fn open<S: MatchStore>(
        store: &S,
        match_id: MatchId,
        rules: ScoringRules,
    ) -> Result<Self, StoreError> {
        let descriptor = store.fetch_match(match_id).await?;
        log::info!(
            "Opened match {} on tatami {}: {} vs {}",
            descriptor.id,
            descriptor.tatami,
            descriptor.competitor_1.name,
            descriptor.competitor_2.name
        );
        Ok(Self::new(descriptor, rules))
    }

    pub fn id(&self) -> MatchId {
        self.descriptor.id
    }

    pub fn descriptor(&self) -> &MatchDescriptor {
        &self.descriptor
    }

    pub fn rules(&self) -> &ScoringRules {
        &self.rules
    }

    pub fn clock(&self) -> &MatchClock {
        &self.clock
    }

    pub fn board(&self) -> &ScoreBoard {
        &self.board
    }

    pub fn status(&self) -> MatchStatus {
        self.board.status()
    }

    pub fn decision(&self) -> Option<Decision> {
        self.board.decision()
    }

    pub fn leader(&self) -> Option<Side> {
        self.board.leader()
    }

    pub fn start(&mut self) {
        self.clock.start();
    }

    pub fn pause(&mut self) {
        self.clock.pause();
    }

    pub fn reset(&mut self) {
        self.clock.reset();
    }

    pub fn adjust(&mut self, delta_seconds: i64) {
        self.clock.adjust(delta_seconds);
    }

    /// One-second callback. Expiry only stops the clock; the operator still has to decide.
    pub fn tick(&mut self) -> ClockState {
        let before = self.clock.state();
        let after = self.clock.tick();
        if before == ClockState::Running && after == ClockState::Expired {
            log::info!("Regulation time over for match {}", self.descriptor.id);
        }
        after
    }

    pub fn add_score(&mut self, side: Side, kind: ScoreKind) -> Option<Decision> {
        let decision = self.board.add_score(side, kind);
        if decision.is_some() {
            self.clock.pause();
        }
        decision
    }

    pub fn remove_score(&mut self, side: Side, kind: ScoreKind) {
        self.board.remove_score(side, kind);
    }

    pub fn add_penalty(&mut self, side: Side) -> Option<Decision> {
        let decision = self.board.add_penalty(side);
        if decision.is_some() {
            self.clock.pause();
        }
        decision
    }

    pub fn remove_penalty(&mut self, side: Side) {
        self.board.remove_penalty(side);
    }

    pub fn declare_winner(&mut self, side: Side, method: WinMethod) -> Decision {
        let decision = self.board.declare_winner(side, method);
        self.clock.pause();
        decision
    }

    /// Result payload for the store; depends only on ledger and clock state.
    pub fn outcome(&self) -> MatchUpdate {
        let decision = self.board.decision();
        MatchUpdate {
            score1: self.board.score(Side::One),
            score2: self.board.score(Side::Two),
            penalties1: self.board.penalties(Side::One),
            penalties2: self.board.penalties(Side::Two),
            winner_id: decision.map(|d| d.winner_id),
            win_method: decision.map(|d| d.method),
            remaining_seconds: self.clock.remaining_seconds(),
        }
    }

    /// Write the outcome through the store. Failures go back to the caller untouched;
    /// the session is unchanged either way, so the save can simply be repeated.
    pub async fn save<S: MatchStore>(&self, store: &S) -> Result<MatchUpdate, StoreError> {
        let update = self.outcome();
        store.update_match(self.descriptor.id, &update).await?;
        log::info!("Saved match {}", self.descriptor.id);
        Ok(update)
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            descriptor: self.descriptor.clone(),
            rules: self.rules.clone(),
            clock_state: self.clock.state(),
            remaining_seconds: self.clock.remaining_seconds(),
            score1: self.board.score(Side::One),
            score2: self.board.score(Side::Two),
            penalties1: self.board.penalties(Side::One),
            penalties2: self.board.penalties(Side::Two),
            status: self.board.status(),
            decision: self.board.decision(),
            leader: self.board.leader(),
            opened_at: self.opened_at,
        }
    }
}
