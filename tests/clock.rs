//! Integration tests for the match clock: countdown, expiry, manual adjustment.

use judo_scoreboard_web::{ClockState, MatchClock};

#[test]
fn new_clock_is_paused_at_full_duration() {
    let c = MatchClock::new(240);
    assert_eq!(c.state(), ClockState::Paused);
    assert_eq!(c.remaining_seconds(), 240);
    assert!(!c.is_running());
}

#[test]
fn tick_only_moves_a_running_clock() {
    let mut c = MatchClock::new(240);
    c.tick();
    assert_eq!(c.remaining_seconds(), 240);

    c.start();
    c.tick();
    assert_eq!(c.remaining_seconds(), 239);

    c.pause();
    c.tick();
    c.tick();
    assert_eq!(c.remaining_seconds(), 239);
    assert_eq!(c.state(), ClockState::Paused);
}

#[test]
fn ticks_count_down_by_one_until_expired() {
    let mut c = MatchClock::new(5);
    c.start();
    for expected in (1..5).rev() {
        assert_eq!(c.tick(), ClockState::Running);
        assert_eq!(c.remaining_seconds(), expected);
    }
    assert_eq!(c.tick(), ClockState::Expired);
    assert_eq!(c.remaining_seconds(), 0);

    // Stays at zero once expired.
    c.tick();
    assert_eq!(c.remaining_seconds(), 0);
    assert_eq!(c.state(), ClockState::Expired);
}

#[test]
fn start_is_a_no_op_when_running_or_expired() {
    let mut c = MatchClock::new(1);
    c.start();
    c.start();
    assert_eq!(c.state(), ClockState::Running);
    c.tick();
    assert_eq!(c.state(), ClockState::Expired);
    c.start();
    assert_eq!(c.state(), ClockState::Expired);
}

#[test]
fn reset_restores_duration_from_any_state() {
    let mut c = MatchClock::new(3);
    c.start();
    c.tick();
    c.reset();
    assert_eq!(c.state(), ClockState::Paused);
    assert_eq!(c.remaining_seconds(), 3);

    c.start();
    for _ in 0..3 {
        c.tick();
    }
    assert_eq!(c.state(), ClockState::Expired);
    c.reset();
    assert_eq!(c.state(), ClockState::Paused);
    assert_eq!(c.remaining_seconds(), 3);
}

#[test]
fn adjust_is_floored_at_zero_in_every_state() {
    let deltas: [i64; 6] = [-300, -30, -10, 0, 10, 30];

    let mut paused = MatchClock::new(20);
    let mut running = MatchClock::new(20);
    running.start();
    let mut expired = MatchClock::new(1);
    expired.start();
    expired.tick();

    for clock in [&mut paused, &mut running, &mut expired] {
        let state = clock.state();
        for delta in deltas {
            let before = i64::from(clock.remaining_seconds());
            clock.adjust(delta);
            assert_eq!(i64::from(clock.remaining_seconds()), (before + delta).max(0));
            assert_eq!(clock.state(), state);
        }
    }
}

#[test]
fn adjusting_to_zero_does_not_expire_but_next_tick_does() {
    let mut c = MatchClock::new(240);
    c.start();
    c.adjust(-300);
    assert_eq!(c.remaining_seconds(), 0);
    assert_eq!(c.state(), ClockState::Running);

    assert_eq!(c.tick(), ClockState::Expired);
    assert_eq!(c.remaining_seconds(), 0);
}

#[test]
fn adjust_has_no_upper_bound() {
    let mut c = MatchClock::new(240);
    c.adjust(30);
    c.adjust(30);
    assert_eq!(c.remaining_seconds(), 300);
    assert_eq!(c.duration(), 240);
}
