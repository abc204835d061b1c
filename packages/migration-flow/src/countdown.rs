use std::fmt;

use cosmwasm_std::Timestamp;

const SECONDS_PER_MINUTE: u64 = 60;
const SECONDS_PER_HOUR: u64 = 60 * SECONDS_PER_MINUTE;
const SECONDS_PER_DAY: u64 = 24 * SECONDS_PER_HOUR;

/// Time left until a window boundary, broken into display units.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TimeRemaining {
    pub days: u64,
    pub hours: u64,
    pub minutes: u64,
    pub seconds: u64,
}

impl TimeRemaining {
    /// All zero once `target` is at or before `now`.
    pub fn until(target: Timestamp, now: Timestamp) -> Self {
        let remaining = target.seconds().saturating_sub(now.seconds());

        TimeRemaining {
            days: remaining / SECONDS_PER_DAY,
            hours: remaining % SECONDS_PER_DAY / SECONDS_PER_HOUR,
            minutes: remaining % SECONDS_PER_HOUR / SECONDS_PER_MINUTE,
            seconds: remaining % SECONDS_PER_MINUTE,
        }
    }

    pub fn is_expired(&self) -> bool {
        *self == TimeRemaining::default()
    }

    pub fn total_seconds(&self) -> u64 {
        self.days * SECONDS_PER_DAY
            + self.hours * SECONDS_PER_HOUR
            + self.minutes * SECONDS_PER_MINUTE
            + self.seconds
    }
}

impl fmt::Display for TimeRemaining {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.days > 0 {
            write!(f, "{}d ", self.days)?;
        }
        write!(
            f,
            "{:02}h {:02}m {:02}s",
            self.hours, self.minutes, self.seconds
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_into_units() {
        let now = Timestamp::from_seconds(1_000);
        let target = now.plus_seconds(2 * SECONDS_PER_DAY + 3 * SECONDS_PER_HOUR + 4 * 60 + 5);

        let remaining = TimeRemaining::until(target, now);

        assert_eq!(
            remaining,
            TimeRemaining {
                days: 2,
                hours: 3,
                minutes: 4,
                seconds: 5,
            }
        );
        assert!(!remaining.is_expired());
        assert_eq!(remaining.total_seconds(), target.seconds() - now.seconds());
        assert_eq!(remaining.to_string(), "2d 03h 04m 05s");
    }

    #[test]
    fn zero_once_elapsed() {
        let now = Timestamp::from_seconds(10_000);

        for target in [now, now.minus_seconds(1), Timestamp::from_seconds(0)] {
            let remaining = TimeRemaining::until(target, now);
            assert!(remaining.is_expired());
            assert_eq!(remaining.to_string(), "00h 00m 00s");
        }
    }

    #[test]
    fn one_hour_window() {
        let now = Timestamp::from_seconds(1_700_000_000);

        let remaining = TimeRemaining::until(now.plus_seconds(3_600), now);

        assert_eq!(remaining.hours, 1);
        assert_eq!(remaining.minutes, 0);
        assert_eq!(remaining.to_string(), "01h 00m 00s");
    }
}
