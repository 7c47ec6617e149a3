//! Live bout logic: clock, score/penalty ledger, session coordinator, tick scheduling.

mod clock;
mod ledger;
mod session;
mod ticker;

pub use clock::{ClockState, MatchClock};
pub use ledger::{MatchStatus, ScoreBoard};
pub use session::{MatchSession, SessionSnapshot};
pub use ticker::{ClockTicker, TickControl, TICK_PERIOD};
