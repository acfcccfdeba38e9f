//! Wall-clock times and travel-time calculation.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Minutes in one day; arrivals before departure roll over by this much.
pub const MINUTES_PER_DAY: u16 = 24 * 60;

/// Errors from parsing an `HH:MM` string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimeFormatError {
    #[error("invalid time '{0}' (expected HH:MM, 24-hour)")]
    Malformed(String),
}

fn time_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^([0-1]?[0-9]|2[0-3]):([0-5][0-9])$").expect("time pattern is valid")
    })
}

/// A 24-hour wall-clock time, stored as minutes since midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeOfDay(u16);

impl TimeOfDay {
    /// Build from hour and minute, rejecting out-of-range values.
    pub fn from_hm(hour: u16, minute: u16) -> Option<Self> {
        (hour < 24 && minute < 60).then_some(Self(hour * 60 + minute))
    }

    /// Parse an `HH:MM` string. The hour may omit its leading zero.
    pub fn parse(s: &str) -> Result<Self, TimeFormatError> {
        let malformed = || TimeFormatError::Malformed(s.to_string());
        let caps = time_pattern().captures(s.trim()).ok_or_else(malformed)?;

        let hour: u16 = caps[1].parse().map_err(|_| malformed())?;
        let minute: u16 = caps[2].parse().map_err(|_| malformed())?;
        Self::from_hm(hour, minute).ok_or_else(malformed)
    }

    pub fn minutes_since_midnight(&self) -> u16 {
        self.0
    }

    pub fn hour(&self) -> u16 {
        self.0 / 60
    }

    pub fn minute(&self) -> u16 {
        self.0 % 60
    }
}

impl FromStr for TimeOfDay {
    type Err = TimeFormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

/// Elapsed time between a departure and an arrival.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TravelTime {
    pub hours: u16,
    pub minutes: u16,
    pub total_minutes: u16,
}

impl TravelTime {
    pub fn from_total_minutes(total_minutes: u16) -> Self {
        Self {
            hours: total_minutes / 60,
            minutes: total_minutes % 60,
            total_minutes,
        }
    }

    /// Time from `departure` to `arrival`. An arrival earlier than the
    /// departure is taken to be on the next day.
    pub fn between(departure: TimeOfDay, arrival: TimeOfDay) -> Self {
        let dep = i32::from(departure.minutes_since_midnight());
        let arr = i32::from(arrival.minutes_since_midnight());

        let mut delta = arr - dep;
        if delta < 0 {
            delta += i32::from(MINUTES_PER_DAY);
        }

        // delta is in [0, 1439] here
        Self::from_total_minutes(delta as u16)
    }
}

impl fmt::Display for TravelTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.hours > 0 {
            write!(f, "{}h {}m", self.hours, self.minutes)
        } else {
            write!(f, "{}m", self.minutes)
        }
    }
}

/// Compute the travel time between two `HH:MM` strings.
///
/// Returns `Ok(None)` when either side is absent or blank, which callers treat
/// as "not enough information yet" rather than an error.
pub fn compute_duration(
    departure: Option<&str>,
    arrival: Option<&str>,
) -> Result<Option<TravelTime>, TimeFormatError> {
    let departure = departure.map(str::trim).filter(|s| !s.is_empty());
    let arrival = arrival.map(str::trim).filter(|s| !s.is_empty());

    match (departure, arrival) {
        (Some(dep), Some(arr)) => {
            let dep = TimeOfDay::parse(dep)?;
            let arr = TimeOfDay::parse(arr)?;
            Ok(Some(TravelTime::between(dep, arr)))
        }
        _ => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn duration(dep: &str, arr: &str) -> TravelTime {
        compute_duration(Some(dep), Some(arr)).unwrap().unwrap()
    }

    #[test]
    fn test_parse_accepts_optional_leading_zero() {
        assert_eq!(TimeOfDay::parse("9:05").unwrap().minutes_since_midnight(), 545);
        assert_eq!(TimeOfDay::parse("09:05").unwrap().minutes_since_midnight(), 545);
        assert_eq!(TimeOfDay::parse("23:59").unwrap().minutes_since_midnight(), 1439);
        assert_eq!(TimeOfDay::parse("0:00").unwrap().minutes_since_midnight(), 0);
    }

    #[test]
    fn test_parse_rejects_malformed() {
        for bad in ["24:00", "12:60", "1200", "12:5", "ab:cd", "-1:00", "12:00:00", "123:00"] {
            assert!(TimeOfDay::parse(bad).is_err(), "{} should be rejected", bad);
        }
    }

    #[test]
    fn test_display_pads() {
        assert_eq!(TimeOfDay::from_hm(7, 5).unwrap().to_string(), "07:05");
    }

    #[test]
    fn test_same_day_duration() {
        let t = duration("09:15", "11:45");
        assert_eq!(t, TravelTime { hours: 2, minutes: 30, total_minutes: 150 });
    }

    #[test]
    fn test_equal_times_are_zero_not_none() {
        assert_eq!(duration("09:00", "09:00"), TravelTime::from_total_minutes(0));
    }

    #[test]
    fn test_midnight_rollover() {
        assert_eq!(
            duration("23:30", "00:15"),
            TravelTime { hours: 0, minutes: 45, total_minutes: 45 }
        );
    }

    #[test]
    fn test_all_pairs_hold_invariants() {
        for dep in (0..MINUTES_PER_DAY).step_by(37) {
            for arr in (0..MINUTES_PER_DAY).step_by(41) {
                let t = TravelTime::between(TimeOfDay(dep), TimeOfDay(arr));
                let expected = if arr >= dep {
                    arr - dep
                } else {
                    arr + MINUTES_PER_DAY - dep
                };
                assert_eq!(t.total_minutes, expected);
                assert_eq!(t.hours * 60 + t.minutes, t.total_minutes);
                assert!(t.total_minutes < MINUTES_PER_DAY);
            }
        }
    }

    #[test]
    fn test_missing_side_is_none() {
        assert_eq!(compute_duration(None, Some("10:00")).unwrap(), None);
        assert_eq!(compute_duration(Some("10:00"), Some("  ")).unwrap(), None);
        assert_eq!(compute_duration(Some(""), None).unwrap(), None);
    }

    #[test]
    fn test_malformed_side_is_error() {
        let err = compute_duration(Some("10:00"), Some("25:00")).unwrap_err();
        assert_eq!(err, TimeFormatError::Malformed("25:00".to_string()));
    }

    #[test]
    fn test_travel_time_wire_shape() {
        let json = serde_json::to_value(TravelTime::from_total_minutes(95)).unwrap();
        assert_eq!(json, serde_json::json!({"hours": 1, "minutes": 35, "totalMinutes": 95}));
    }
}
