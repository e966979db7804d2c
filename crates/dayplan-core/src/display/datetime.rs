//! DateTime and duration display utilities.

use std::fmt;

use jiff::{civil::Time, tz::TimeZone, Timestamp};

use crate::codec::format_time;

/// A wrapper around `Timestamp` that formats it in the system time zone.
///
/// The display format follows the pattern: `YYYY-MM-DD HH:MM:SS TZ`
pub struct LocalDateTime<'a>(pub &'a Timestamp);

impl fmt::Display for LocalDateTime<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            self.0
                .to_zoned(TimeZone::system())
                .strftime("%Y-%m-%d %H:%M:%S %Z")
        )
    }
}

/// A time-of-day interval, `HH:MM-HH:MM`, marked with `(+1)` when it runs
/// past midnight.
pub struct TimeRange(pub Time, pub Time);

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", format_time(self.0), format_time(self.1))?;
        if self.1 <= self.0 {
            write!(f, " (+1)")?;
        }
        Ok(())
    }
}

/// Minutes as `45m` or `1h 30m`.
pub struct Minutes(pub u32);

impl fmt::Display for Minutes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (hours, minutes) = (self.0 / 60, self.0 % 60);
        match (hours, minutes) {
            (0, m) => write!(f, "{m}m"),
            (h, 0) => write!(f, "{h}h"),
            (h, m) => write!(f, "{h}h {m}m"),
        }
    }
}

/// A ratio as a percentage with one decimal.
pub struct Percent(pub f64);

impl fmt::Display for Percent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}%", self.0 * 100.0)
    }
}
