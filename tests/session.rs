//! Integration tests for the match session: clock/ledger wiring, outcome payload, save.

use judo_scoreboard_web::{
    ClockState, Competitor, InMemoryMatchStore, MatchDescriptor, MatchSession, MatchStatus,
    MatchUpdate, ScoreKind, ScoringRules, Side, StoreError, WinMethod,
};
use uuid::Uuid;

fn descriptor() -> MatchDescriptor {
    MatchDescriptor::new(
        "Juniors -66kg",
        "Semi-final",
        Competitor::new("Chloe", "Ippon Dojo"),
        Competitor::new("Dario", "Tomoe Judo"),
        2,
    )
}

fn running_session() -> MatchSession {
    let mut s = MatchSession::new(descriptor(), ScoringRules::default());
    s.start();
    s
}

#[test]
fn end_to_end_bout_decided_by_penalties() {
    let mut s = running_session();
    for _ in 0..53 {
        s.tick();
    }
    assert_eq!(s.clock().remaining_seconds(), 187);

    s.add_score(Side::One, ScoreKind::WazaAri);
    assert_eq!(s.board().score(Side::One), 7);
    assert_eq!(s.status(), MatchStatus::InProgress);

    for _ in 0..3 {
        s.add_penalty(Side::Two);
    }
    assert_eq!(s.status(), MatchStatus::Ended);
    let decision = s.decision().unwrap();
    assert_eq!(decision.winner_id, s.descriptor().competitor_1.id);
    assert_eq!(decision.method, WinMethod::PenaltyDisqualification);

    assert!(!s.clock().is_running());
    s.tick();
    assert_eq!(s.clock().remaining_seconds(), 187);
}

#[test]
fn ippon_stops_the_clock() {
    let mut s = running_session();
    s.tick();
    s.add_score(Side::Two, ScoreKind::Ippon);
    assert_eq!(s.clock().state(), ClockState::Paused);
    s.tick();
    assert_eq!(s.clock().remaining_seconds(), 239);
}

#[test]
fn declare_winner_stops_the_clock_and_keeps_expired_state() {
    let mut s = running_session();
    s.declare_winner(Side::One, WinMethod::Decision);
    assert_eq!(s.clock().state(), ClockState::Paused);

    let rules = ScoringRules {
        duration: 2,
        ..ScoringRules::default()
    };
    let mut s = MatchSession::new(descriptor(), rules);
    s.start();
    s.tick();
    s.tick();
    assert_eq!(s.clock().state(), ClockState::Expired);
    s.declare_winner(Side::Two, WinMethod::TimeExpiry);
    assert_eq!(s.clock().state(), ClockState::Expired);
}

#[test]
fn expiry_alone_does_not_decide_the_match() {
    let rules = ScoringRules {
        duration: 3,
        ..ScoringRules::default()
    };
    let mut s = MatchSession::new(descriptor(), rules);
    s.start();
    s.add_score(Side::One, ScoreKind::Yuko);
    for _ in 0..3 {
        s.tick();
    }
    assert_eq!(s.clock().state(), ClockState::Expired);
    assert_eq!(s.status(), MatchStatus::InProgress);
    assert!(s.outcome().winner_id.is_none());
    assert_eq!(s.leader(), Some(Side::One));
}

#[test]
fn outcome_is_a_pure_function_of_state() {
    let mut s = running_session();
    for _ in 0..53 {
        s.tick();
    }
    s.add_score(Side::Two, ScoreKind::Yuko);
    s.add_score(Side::Two, ScoreKind::Yuko);
    s.add_score(Side::Two, ScoreKind::Yuko);
    s.add_penalty(Side::One);
    s.add_score(Side::One, ScoreKind::Ippon);

    let expected = MatchUpdate {
        score1: 10,
        score2: 3,
        penalties1: 1,
        penalties2: 0,
        winner_id: Some(s.descriptor().competitor_1.id),
        win_method: Some(WinMethod::FullWin),
        remaining_seconds: 187,
    };
    assert_eq!(s.outcome(), expected);
    assert_eq!(s.outcome(), expected);

    let json = serde_json::to_value(s.outcome()).unwrap();
    assert_eq!(json["score1"], 10);
    assert_eq!(json["penalties1"], 1);
    assert_eq!(json["win_method"], "full-win");
    assert_eq!(json["remaining_seconds"], 187);
}

#[test]
fn snapshot_reflects_session_state() {
    let mut s = running_session();
    s.tick();
    s.add_score(Side::One, ScoreKind::WazaAri);
    let snap = s.snapshot();
    assert_eq!(snap.clock_state, ClockState::Running);
    assert_eq!(snap.remaining_seconds, 239);
    assert_eq!(snap.score1, 7);
    assert_eq!(snap.status, MatchStatus::InProgress);
    assert_eq!(snap.leader, Some(Side::One));
    assert!(snap.decision.is_none());

    let json = serde_json::to_value(&snap).unwrap();
    assert_eq!(json["match"]["competitor1"]["name"], "Chloe");
    assert_eq!(json["clock_state"], "running");
}

#[tokio::test]
async fn open_fetches_descriptor_from_store() {
    let d = descriptor();
    let store = InMemoryMatchStore::with_matches(vec![d.clone()]);
    let s = MatchSession::open(&store, d.id, ScoringRules::default())
        .await
        .unwrap();
    assert_eq!(s.descriptor(), &d);
    assert_eq!(s.clock().remaining_seconds(), 240);

    let missing = Uuid::new_v4();
    let err = MatchSession::open(&store, missing, ScoringRules::default())
        .await
        .unwrap_err();
    assert_eq!(err, StoreError::MatchNotFound(missing));
}

#[tokio::test]
async fn save_writes_outcome_to_store() {
    let d = descriptor();
    let store = InMemoryMatchStore::with_matches(vec![d.clone()]);
    let mut s = MatchSession::open(&store, d.id, ScoringRules::default())
        .await
        .unwrap();
    s.add_score(Side::Two, ScoreKind::Ippon);

    let saved = s.save(&store).await.unwrap();
    let stored = store.get(d.id).await.unwrap();
    assert_eq!(stored.result, Some(saved));
    assert!(stored.updated_at.is_some());
    assert_eq!(store.match_count().await, 1);
}

#[tokio::test]
async fn failed_save_is_reported_and_can_be_retried() {
    let d = descriptor();
    let store = InMemoryMatchStore::with_matches(vec![d.clone()]);
    let mut s = MatchSession::new(d.clone(), ScoringRules::default());
    s.add_score(Side::One, ScoreKind::WazaAri);

    store.set_offline(true);
    let err = s.save(&store).await.unwrap_err();
    assert!(matches!(err, StoreError::Unavailable(_)));
    assert!(store.get(d.id).await.unwrap().result.is_none());
    assert_eq!(s.board().score(Side::One), 7);

    store.set_offline(false);
    let saved = s.save(&store).await.unwrap();
    assert_eq!(saved.score1, 7);
}

#[tokio::test]
async fn save_for_unknown_match_fails() {
    let store = InMemoryMatchStore::new();
    let s = MatchSession::new(descriptor(), ScoringRules::default());
    let err = s.save(&store).await.unwrap_err();
    assert_eq!(err, StoreError::MatchNotFound(s.id()));
}
