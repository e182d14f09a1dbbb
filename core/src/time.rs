use std::fmt;

use anyhow::{anyhow, Result};
use chrono::Duration;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Largest minute or second count a dataset clock may carry. Anything bigger
/// is treated as malformed.
pub const MAX_CLOCK_MINUTES: u64 = 1_000_000_000;

/// A `minutes:seconds` statistic such as time on ice.
///
/// Minutes are unbounded (season totals run into the thousands) and seconds
/// are kept as written, so `Clock` is not normalized until it is carried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "serde_json::Value", into = "String")]
pub struct Clock {
    pub minutes: u64,
    pub seconds: u64,
}

impl Clock {
    pub fn new(minutes: u64, seconds: u64) -> Self {
        Self { minutes, seconds }
    }

    /// Builds a clock from separately summed minutes and seconds, moving
    /// every whole 60 seconds into the minutes column.
    pub fn carried(minutes: u64, seconds: u64) -> Self {
        Self {
            minutes: minutes.saturating_add(seconds / 60),
            seconds: seconds % 60,
        }
    }

    pub fn from_seconds(total: u64) -> Self {
        Self::carried(0, total)
    }

    /// Saturates at `Duration::MAX` instead of overflowing.
    pub fn to_duration(&self) -> Duration {
        Duration::try_seconds(self.total_seconds()).unwrap_or(Duration::MAX)
    }

    /// Saturates at `i64::MAX`.
    pub fn total_seconds(&self) -> i64 {
        let total = self.minutes.saturating_mul(60).saturating_add(self.seconds);
        i64::try_from(total).unwrap_or(i64::MAX)
    }
}

impl fmt::Display for Clock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{:02}", self.minutes, self.seconds)
    }
}

impl From<Clock> for String {
    fn from(clock: Clock) -> Self {
        clock.to_string()
    }
}

// Lenient on purpose: a bad clock in the dataset must not abort loading.
impl From<serde_json::Value> for Clock {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::String(s) => parse_clock(&s).unwrap_or_else(|e| {
                warn!(value = %s, error = %e, "malformed clock, using 0:00");
                Clock::default()
            }),
            other => {
                warn!(value = %other, "expected clock to be a string, using 0:00");
                Clock::default()
            }
        }
    }
}

/// Parses `M:SS` (any number of minute digits).
pub fn parse_clock(input: &str) -> Result<Clock> {
    let input = input.trim();
    if input.is_empty() {
        return Err(anyhow!("Empty clock string"));
    }

    let (min_str, sec_str) = input
        .split_once(':')
        .ok_or_else(|| anyhow!("Missing ':' in clock '{}'", input))?;

    let minutes: u64 = min_str
        .trim()
        .parse()
        .map_err(|_| anyhow!("Invalid minutes in clock '{}'", input))?;
    let seconds: u64 = sec_str
        .trim()
        .parse()
        .map_err(|_| anyhow!("Invalid seconds in clock '{}'", input))?;

    if minutes > MAX_CLOCK_MINUTES || seconds > MAX_CLOCK_MINUTES {
        return Err(anyhow!("Clock '{}' is out of range", input));
    }
    Ok(Clock::new(minutes, seconds))
}

/// Formats a number of seconds as `M:SS`.
pub fn format_seconds(total: i64) -> String {
    let minutes = total.div_euclid(60);
    let seconds = total.rem_euclid(60);
    format!("{}:{:02}", minutes, seconds)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_clock() {
        assert_eq!(parse_clock("18:45").unwrap(), Clock::new(18, 45));
        assert_eq!(parse_clock("1835:26").unwrap(), Clock::new(1835, 26));
        assert_eq!(parse_clock(" 7:05 ").unwrap(), Clock::new(7, 5));

        assert!(parse_clock("").is_err());
        assert!(parse_clock("18").is_err());
        assert!(parse_clock("ab:cd").is_err());
        assert!(parse_clock("-3:10").is_err());
    }

    #[test]
    fn test_total_seconds_and_format() {
        let clock = Clock::new(18, 45);
        assert_eq!(clock.total_seconds(), 18 * 60 + 45);
        assert_eq!(format_seconds(clock.total_seconds()), "18:45");
        assert_eq!(format_seconds(65), "1:05");
        assert_eq!(format_seconds(0), "0:00");
    }

    #[test]
    fn test_oversized_clocks_do_not_overflow() {
        assert!(parse_clock("200000000000000000:00").is_err());
        assert!(parse_clock("0:200000000000000000").is_err());
        assert!(parse_clock("1000000000:59").is_ok());

        let huge: Clock = serde_json::from_str("\"200000000000000000:00\"").unwrap();
        assert_eq!(huge, Clock::default());

        let built = Clock::new(u64::MAX, u64::MAX);
        assert_eq!(built.total_seconds(), i64::MAX);
        assert_eq!(built.to_duration(), Duration::MAX);
        assert_eq!(Clock::carried(u64::MAX, 120).minutes, u64::MAX);
        assert_eq!(Clock::new(2, 5).to_duration(), Duration::seconds(125));
    }

    #[test]
    fn test_carried() {
        assert_eq!(Clock::carried(28, 75), Clock::new(29, 15));
        assert_eq!(Clock::carried(14, 37), Clock::new(14, 37));
        assert_eq!(Clock::from_seconds(3725).to_string(), "62:05");
    }

    #[test]
    fn test_lenient_deserialize() {
        let good: Clock = serde_json::from_str("\"10:30\"").unwrap();
        assert_eq!(good, Clock::new(10, 30));

        let garbage: Clock = serde_json::from_str("\"ten:thirty\"").unwrap();
        assert_eq!(garbage, Clock::default());

        let not_a_string: Clock = serde_json::from_str("630").unwrap();
        assert_eq!(not_a_string, Clock::default());

        assert_eq!(serde_json::to_string(&Clock::new(3, 7)).unwrap(), "\"3:07\"");
    }
}
