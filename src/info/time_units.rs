//! Numeric timestamps described by a `"<unit> since <reference>"` string and
//! a calendar name.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, Utc};

use crate::error::{ProjectError, Result};

/// Units written into new containers.
pub const DEFAULT_TIME_UNITS: &str = "seconds since 1970-01-01 00:00:00";
/// Calendar written into new containers.
pub const DEFAULT_TIME_CALENDAR: &str = "gregorian";

const SUPPORTED_CALENDARS: [&str; 3] = ["gregorian", "standard", "proleptic_gregorian"];

const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeUnit {
    Seconds,
    Minutes,
    Hours,
    Days,
}

impl TimeUnit {
    fn parse(unit: &str) -> Option<Self> {
        match unit.to_ascii_lowercase().as_str() {
            "seconds" | "second" | "secs" | "sec" | "s" => Some(TimeUnit::Seconds),
            "minutes" | "minute" | "mins" | "min" => Some(TimeUnit::Minutes),
            "hours" | "hour" | "hrs" | "hr" | "h" => Some(TimeUnit::Hours),
            "days" | "day" | "d" => Some(TimeUnit::Days),
            _ => None,
        }
    }

    fn in_seconds(&self) -> f64 {
        match self {
            TimeUnit::Seconds => 1.0,
            TimeUnit::Minutes => 60.0,
            TimeUnit::Hours => 3600.0,
            TimeUnit::Days => 86400.0,
        }
    }
}

/// A parsed unit/calendar pair.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeReference {
    unit: TimeUnit,
    epoch: DateTime<Utc>,
    units: String,
}

impl TimeReference {
    pub fn parse(units: &str, calendar: &str) -> Result<Self> {
        let calendar_name = calendar.trim().to_ascii_lowercase();
        if !SUPPORTED_CALENDARS.contains(&calendar_name.as_str()) {
            return Err(ProjectError::UnsupportedCalendar {
                calendar: calendar.to_string(),
            });
        }

        let invalid = || ProjectError::InvalidTimeUnits {
            units: units.to_string(),
        };

        let (unit, reference) = units.trim().split_once(" since ").ok_or_else(invalid)?;
        let unit = TimeUnit::parse(unit.trim()).ok_or_else(invalid)?;
        let epoch = parse_reference(reference.trim()).ok_or_else(invalid)?;

        Ok(Self {
            unit,
            epoch,
            units: units.to_string(),
        })
    }

    pub fn unit(&self) -> TimeUnit {
        self.unit
    }

    pub fn epoch(&self) -> DateTime<Utc> {
        self.epoch
    }

    /// Express `datetime` as a number of units since the epoch.
    pub fn to_num(&self, datetime: DateTime<Utc>) -> f64 {
        let elapsed = datetime - self.epoch;
        let seconds = elapsed.num_seconds() as f64 + elapsed.subsec_nanos() as f64 * 1e-9;
        seconds / self.unit.in_seconds()
    }

    /// Turn a number of units since the epoch back into a date.
    pub fn to_date(&self, value: f64) -> Result<DateTime<Utc>> {
        let out_of_range = || ProjectError::TimestampOutOfRange {
            value,
            units: self.units.clone(),
        };

        let millis = (value * self.unit.in_seconds() * 1000.0).round();
        // keeps the cast below inside i64 and chrono's range
        if !millis.is_finite() || millis.abs() > 1e17 {
            return Err(out_of_range());
        }

        let delta = Duration::try_milliseconds(millis as i64).ok_or_else(out_of_range)?;
        self.epoch.checked_add_signed(delta).ok_or_else(out_of_range)
    }
}

/// Convert a date into a number using `units` and `calendar`.
pub fn date2num(datetime: DateTime<Utc>, units: &str, calendar: &str) -> Result<f64> {
    Ok(TimeReference::parse(units, calendar)?.to_num(datetime))
}

/// Convert a number back into a date using `units` and `calendar`.
pub fn num2date(value: f64, units: &str, calendar: &str) -> Result<DateTime<Utc>> {
    TimeReference::parse(units, calendar)?.to_date(value)
}

fn parse_reference(reference: &str) -> Option<DateTime<Utc>> {
    let reference = reference
        .trim_end_matches(" UTC")
        .trim_end_matches('Z')
        .trim();

    for format in DATETIME_FORMATS {
        if let Ok(datetime) = NaiveDateTime::parse_from_str(reference, format) {
            return Some(datetime.and_utc());
        }
    }

    NaiveDate::parse_from_str(reference, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|datetime| datetime.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::TimeZone;
    use test_case::test_case;

    #[test]
    fn test_default_units_are_unix_seconds() {
        let reference = TimeReference::parse(DEFAULT_TIME_UNITS, DEFAULT_TIME_CALENDAR).unwrap();
        let datetime = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
        assert_relative_eq!(reference.to_num(datetime), 1_577_836_800.0);
        assert_eq!(reference.to_date(1_577_836_800.0).unwrap(), datetime);
    }

    #[test_case("days since 2000-01-01", 1.5, (2000, 1, 2, 12, 0, 0))]
    #[test_case("hours since 2000-01-01T06:00:00", 2.0, (2000, 1, 1, 8, 0, 0))]
    #[test_case("minutes since 2000-01-01 00:00", 90.0, (2000, 1, 1, 1, 30, 0))]
    #[test_case("seconds since 2000-01-01 00:00:00Z", -60.0, (1999, 12, 31, 23, 59, 0))]
    fn test_num2date(units: &str, value: f64, expected: (i32, u32, u32, u32, u32, u32)) {
        let (y, mo, d, h, mi, s) = expected;
        let expected = Utc.with_ymd_and_hms(y, mo, d, h, mi, s).unwrap();
        assert_eq!(num2date(value, units, "standard").unwrap(), expected);
        assert_relative_eq!(date2num(expected, units, "standard").unwrap(), value);
    }

    #[test_case("seconds"; "missing reference")]
    #[test_case("fortnights since 2000-01-01"; "unknown unit")]
    #[test_case("days since yesterday"; "bad reference")]
    fn test_invalid_units(units: &str) {
        let err = TimeReference::parse(units, "gregorian").unwrap_err();
        assert!(matches!(err, ProjectError::InvalidTimeUnits { .. }));
    }

    #[test]
    fn test_unsupported_calendar() {
        let err = TimeReference::parse(DEFAULT_TIME_UNITS, "360_day").unwrap_err();
        assert!(matches!(err, ProjectError::UnsupportedCalendar { .. }));
    }

    #[test]
    fn test_out_of_range() {
        let reference = TimeReference::parse(DEFAULT_TIME_UNITS, DEFAULT_TIME_CALENDAR).unwrap();
        assert!(reference.to_date(f64::NAN).is_err());
        assert!(reference.to_date(1e300).is_err());
    }
}
