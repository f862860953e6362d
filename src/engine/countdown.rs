use chrono::{DateTime, TimeDelta, Utc};

/// Cadence at which a running countdown recomputes its breakdown.
pub const TICK_INTERVAL_MS: i64 = 1_000;

/// Remaining time until an exam, split into display components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Countdown {
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
    pub completed: bool,
}

impl Countdown {
    pub fn completed() -> Self {
        Self {
            completed: true,
            ..Self::default()
        }
    }
}

/// Break the time left until `target` into days, hours, minutes and seconds.
/// Each component is an integer quotient of the signed duration, never
/// rounded. A missing target or one at or before `now` is completed.
pub fn countdown(target: Option<DateTime<Utc>>, now: DateTime<Utc>) -> Countdown {
    let Some(target) = target else {
        return Countdown::completed();
    };

    let remaining = target.signed_duration_since(now);
    if remaining <= TimeDelta::zero() {
        return Countdown::completed();
    }

    Countdown {
        days: remaining.num_days(),
        hours: remaining.num_hours() % 24,
        minutes: remaining.num_minutes() % 60,
        seconds: remaining.num_seconds() % 60,
        completed: false,
    }
}

/// A periodic countdown for one visible row. The presentation layer calls
/// [`CountdownTimer::tick`] as often as it likes; the breakdown only moves on
/// the one-second cadence and stops for good once the exam has started.
/// Dropping the timer is all it takes to cancel it.
#[derive(Debug, Clone)]
pub struct CountdownTimer {
    target: Option<DateTime<Utc>>,
    current: Countdown,
    last_tick: DateTime<Utc>,
}

impl CountdownTimer {
    pub fn start(target: Option<DateTime<Utc>>, now: DateTime<Utc>) -> Self {
        Self {
            target,
            current: countdown(target, now),
            last_tick: now,
        }
    }

    /// Recompute if a full interval has passed. Returns whether the
    /// breakdown was refreshed.
    ///
    /// Ticks stay on the grid laid down by [`CountdownTimer::start`]: a late
    /// call advances by whole intervals and the breakdown is taken at the grid
    /// instant, so a slow caller never skips a displayed second.
    pub fn tick(&mut self, now: DateTime<Utc>) -> bool {
        if !self.is_running() {
            return false;
        }
        let elapsed = now.signed_duration_since(self.last_tick);
        let steps = elapsed.num_milliseconds() / TICK_INTERVAL_MS;
        if steps < 1 {
            return false;
        }
        self.last_tick += TimeDelta::milliseconds(steps * TICK_INTERVAL_MS);
        self.current = countdown(self.target, self.last_tick);
        true
    }

    pub fn current(&self) -> Countdown {
        self.current
    }

    pub fn target(&self) -> Option<DateTime<Utc>> {
        self.target
    }

    pub fn is_running(&self) -> bool {
        !self.current.completed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn now() -> DateTime<Utc> {
        "2026-10-17T12:00:00Z".parse().unwrap()
    }

    #[test]
    fn one_of_each_component() {
        let target = now() + TimeDelta::milliseconds(90_061_000);
        assert_eq!(
            countdown(Some(target), now()),
            Countdown {
                days: 1,
                hours: 1,
                minutes: 1,
                seconds: 1,
                completed: false,
            }
        );
    }

    #[test]
    fn past_or_missing_target_is_completed() {
        let past = now() - TimeDelta::milliseconds(1_000);
        assert!(countdown(Some(past), now()).completed);
        assert!(countdown(Some(now()), now()).completed);
        assert_eq!(countdown(None, now()), Countdown::completed());
    }

    #[test]
    fn components_truncate_instead_of_rounding() {
        let target = now() + TimeDelta::milliseconds(86_399_999);
        let left = countdown(Some(target), now());
        assert_eq!((left.days, left.hours, left.minutes, left.seconds), (0, 23, 59, 59));
        assert!(!left.completed);
    }

    #[test]
    fn timer_moves_once_per_second_and_stops_when_done() {
        let target = now() + TimeDelta::seconds(2);
        let mut timer = CountdownTimer::start(Some(target), now());
        assert_eq!(timer.current().seconds, 2);

        assert!(!timer.tick(now() + TimeDelta::milliseconds(250)));
        assert_eq!(timer.current().seconds, 2);

        assert!(timer.tick(now() + TimeDelta::seconds(1)));
        assert_eq!(timer.current().seconds, 1);

        assert!(timer.tick(now() + TimeDelta::seconds(2)));
        assert!(timer.current().completed);
        assert!(!timer.is_running());

        assert!(!timer.tick(now() + TimeDelta::seconds(10)));
    }

    #[test]
    fn late_passes_do_not_skip_seconds() {
        let target = now() + TimeDelta::milliseconds(10_100);
        let mut timer = CountdownTimer::start(Some(target), now());
        let mut shown = vec![timer.current().seconds];

        let mut elapsed = 0;
        while timer.is_running() {
            elapsed += 260;
            if timer.tick(now() + TimeDelta::milliseconds(elapsed)) && timer.is_running() {
                shown.push(timer.current().seconds);
            }
        }

        assert_eq!(shown, (0..=10).rev().collect::<Vec<i64>>());
        assert!(elapsed < 11_260);
    }

    #[test]
    fn long_stall_catches_up_in_whole_intervals() {
        let target = now() + TimeDelta::seconds(60);
        let mut timer = CountdownTimer::start(Some(target), now());

        assert!(timer.tick(now() + TimeDelta::milliseconds(3_700)));
        assert_eq!(timer.current().seconds, 57);
        assert!(!timer.tick(now() + TimeDelta::milliseconds(3_900)));
        assert!(timer.tick(now() + TimeDelta::milliseconds(4_000)));
        assert_eq!(timer.current().seconds, 56);
    }

    #[test]
    fn timer_without_target_never_runs() {
        let mut timer = CountdownTimer::start(None, now());
        assert!(!timer.is_running());
        assert!(!timer.tick(now() + TimeDelta::seconds(5)));
    }
}
