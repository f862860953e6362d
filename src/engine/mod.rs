//! Pure ordering, filtering and countdown logic. Nothing in here touches the
//! terminal, the store, or the system clock directly; callers pass in "now"
//! so every function can be tested with a fixed instant.

mod countdown;
mod digits;
mod filter;
mod ranking;

use chrono::{DateTime, Utc};

pub use countdown::{countdown, Countdown, CountdownTimer, TICK_INTERVAL_MS};
pub use digits::{format_countdown, localize_digits, pad2, COMPLETED_LABEL};
pub use filter::filter_subjects;
pub use ranking::{is_completed, rank_schedule};

/// Source of the current instant.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
