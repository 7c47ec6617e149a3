//! Match clock: fixed one-second countdown driven by explicit `tick()` calls.

use serde::{Deserialize, Serialize};

/// Phase of the match clock.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClockState {
    /// Not counting down (initial state, or after pause/reset).
    #[default]
    Paused,
    Running,
    /// Counted down to zero. Only `reset()` leaves this state.
    Expired,
}

/// Countdown for a single bout.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct MatchClock {
    duration: u32,
    remaining_seconds: u32,
    state: ClockState,
}

impl MatchClock {
    /// New paused clock showing the full duration.
    pub fn new(duration: u32) -> Self {
        Self {
            duration,
            remaining_seconds: duration,
            state: ClockState::Paused,
        }
    }

    pub fn duration(&self) -> u32 {
        self.duration
    }

    pub fn remaining_seconds(&self) -> u32 {
        self.remaining_seconds
    }

    pub fn state(&self) -> ClockState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == ClockState::Running
    }

    /// Paused -> Running. No-op when running or expired.
    pub fn start(&mut self) {
        if self.state == ClockState::Paused {
            self.state = ClockState::Running;
        }
    }

    /// Running -> Paused. No-op otherwise.
    pub fn pause(&mut self) {
        if self.state == ClockState::Running {
            self.state = ClockState::Paused;
        }
    }

    /// One second elapsed. Only a running clock moves; hitting zero expires it.
    pub fn tick(&mut self) -> ClockState {
        if self.state != ClockState::Running {
            return self.state;
        }
        self.remaining_seconds = self.remaining_seconds.saturating_sub(1);
        if self.remaining_seconds == 0 {
            self.state = ClockState::Expired;
        }
        self.state
    }

    /// Back to the full duration, paused, from any state.
    pub fn reset(&mut self) {
        self.remaining_seconds = self.duration;
        self.state = ClockState::Paused;
    }

    /// Manual correction by `delta_seconds`, floored at zero. Never changes the state:
    /// reaching zero here does not expire the clock.
    pub fn adjust(&mut self, delta_seconds: i64) {
        let adjusted = i64::from(self.remaining_seconds).saturating_add(delta_seconds);
        self.remaining_seconds = adjusted.clamp(0, i64::from(u32::MAX)) as u32;
    }
}
