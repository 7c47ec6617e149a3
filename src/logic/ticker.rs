//! One-second cadence for a running match clock, as an explicit cancellable task.

use crate::logic::clock::ClockState;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

/// Clock cadence.
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Returned by the tick callback: keep the ticker alive or let it finish.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TickControl {
    Continue,
    Stop,
}

impl TickControl {
    /// Keep ticking only while the clock is still running.
    pub fn after(state: ClockState) -> Self {
        if state == ClockState::Running {
            TickControl::Continue
        } else {
            TickControl::Stop
        }
    }
}

/// Handle to a spawned tick task. Dropping it (or calling `cancel`) aborts the task,
/// so no tick fires after the owning session is gone.
#[derive(Debug)]
pub struct ClockTicker {
    handle: JoinHandle<()>,
}

impl ClockTicker {
    /// Spawn a task calling `on_tick` every `period`, first call one period from now.
    /// Fixed interval: late ticks are delayed, not bunched up to catch up.
    pub fn spawn<F>(period: Duration, mut on_tick: F) -> Self
    where
        F: FnMut() -> TickControl + Send + 'static,
    {
        let handle = tokio::spawn(async move {
            let mut interval = interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                if on_tick() == TickControl::Stop {
                    break;
                }
            }
            log::debug!("Clock ticker finished");
        });
        Self { handle }
    }

    /// Tick a session once per second until its clock stops running.
    ///
    /// `tick_session` locates the session, ticks it and returns the resulting clock state.
    /// Returning None (session gone, lock poisoned, ticker superseded) ends the task.
    pub fn drive_with<F>(mut tick_session: F) -> Self
    where
        F: FnMut() -> Option<ClockState> + Send + 'static,
    {
        Self::spawn(TICK_PERIOD, move || match tick_session() {
            Some(state) => TickControl::after(state),
            None => TickControl::Stop,
        })
    }

    /// True once the task stopped on its own (clock no longer running).
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    pub fn cancel(self) {
        drop(self);
    }
}

impl Drop for ClockTicker {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
