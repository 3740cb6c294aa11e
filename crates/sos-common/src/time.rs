//! Time handling for CF-style time coordinates.
//!
//! Dataset time coordinates are numeric offsets described by a units string
//! such as `"hours since 1970-01-01 00:00:00"`. This module converts those
//! offsets into UTC instants and renders them as ISO 8601 timestamps.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum TimeParseError {
    #[error("Invalid time format: {0}")]
    InvalidFormat(String),

    #[error("Invalid time units: {0}")]
    InvalidUnits(String),
}

/// Calendar-independent step size of a time coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeStep {
    Seconds,
    Minutes,
    Hours,
    Days,
}

impl TimeStep {
    fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "second" | "seconds" | "sec" | "secs" | "s" => Some(TimeStep::Seconds),
            "minute" | "minutes" | "min" | "mins" => Some(TimeStep::Minutes),
            "hour" | "hours" | "hr" | "hrs" | "h" => Some(TimeStep::Hours),
            "day" | "days" | "d" => Some(TimeStep::Days),
            _ => None,
        }
    }

    fn seconds(&self) -> f64 {
        match self {
            TimeStep::Seconds => 1.0,
            TimeStep::Minutes => 60.0,
            TimeStep::Hours => 3600.0,
            TimeStep::Days => 86400.0,
        }
    }
}

/// A parsed `"<step> since <reference>"` units string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeUnit {
    pub step: TimeStep,
    pub reference: DateTime<Utc>,
}

impl TimeUnit {
    /// Parse a CF units string, e.g. `"seconds since 1970-01-01T00:00:00Z"`.
    pub fn parse(units: &str) -> Result<Self, TimeParseError> {
        let units = units.trim();
        let (step, reference) = units
            .split_once(" since ")
            .ok_or_else(|| TimeParseError::InvalidUnits(units.to_string()))?;

        let step = TimeStep::from_name(step.trim())
            .ok_or_else(|| TimeParseError::InvalidUnits(units.to_string()))?;
        let reference = parse_reference(reference.trim())
            .ok_or_else(|| TimeParseError::InvalidUnits(units.to_string()))?;

        Ok(Self { step, reference })
    }

    /// Convert a coordinate value into a UTC instant.
    ///
    /// Returns `None` for non-finite values and for offsets chrono cannot
    /// represent, e.g. the NetCDF default fill `9.969e36`.
    pub fn try_to_datetime(&self, value: f64) -> Option<DateTime<Utc>> {
        if !value.is_finite() {
            return None;
        }
        let millis = (value * self.step.seconds() * 1000.0).round();
        if millis < i64::MIN as f64 || millis >= i64::MAX as f64 {
            return None;
        }
        let delta = Duration::try_milliseconds(millis as i64)?;
        self.reference.checked_add_signed(delta)
    }

    /// Convert a coordinate value into its standard ISO 8601 string.
    pub fn try_to_iso8601(&self, value: f64) -> Option<String> {
        self.try_to_datetime(value).map(|dt| format_iso8601(&dt))
    }
}

/// Reference times show up in many shapes in the wild; accept the common ones.
fn parse_reference(s: &str) -> Option<DateTime<Utc>> {
    let s = s
        .trim_end_matches("UTC")
        .trim_end_matches("GMT")
        .trim_end_matches('Z')
        .trim()
        .replace('T', " ");

    for fmt in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"] {
        if let Ok(ndt) = NaiveDateTime::parse_from_str(&s, fmt) {
            return Some(Utc.from_utc_datetime(&ndt));
        }
    }

    NaiveDate::parse_from_str(&s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|ndt| Utc.from_utc_datetime(&ndt))
}

/// Render an instant as `YYYY-MM-DDTHH:MM:SSZ`.
pub fn format_iso8601(dt: &DateTime<Utc>) -> String {
    dt.format("%Y-%m-%dT%H:%M:%SZ").to_string()
}

/// Parse an ISO 8601 timestamp into UTC.
pub fn parse_iso8601(s: &str) -> Result<DateTime<Utc>, TimeParseError> {
    let s = s.trim();

    // Try full datetime with timezone
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }

    // Try without timezone (assume UTC)
    if let Ok(ndt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S") {
        return Ok(Utc.from_utc_datetime(&ndt));
    }

    // Try date only
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        if let Some(ndt) = date.and_hms_opt(0, 0, 0) {
            return Ok(Utc.from_utc_datetime(&ndt));
        }
    }

    Err(TimeParseError::InvalidFormat(s.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hours_since() {
        let unit = TimeUnit::parse("hours since 1970-01-01 00:00:00").unwrap();
        assert_eq!(unit.step, TimeStep::Hours);
        assert_eq!(unit.try_to_iso8601(24.0).as_deref(), Some("1970-01-02T00:00:00Z"));
    }

    #[test]
    fn test_parse_seconds_since_iso_reference() {
        let unit = TimeUnit::parse("seconds since 2020-01-01T00:00:00Z").unwrap();
        assert_eq!(unit.try_to_iso8601(90.0).as_deref(), Some("2020-01-01T00:01:30Z"));
    }

    #[test]
    fn test_parse_days_since_date_only() {
        let unit = TimeUnit::parse("days since 2000-01-01").unwrap();
        assert_eq!(unit.try_to_iso8601(1.5).as_deref(), Some("2000-01-02T12:00:00Z"));
    }

    #[test]
    fn test_parse_reference_with_utc_suffix() {
        let unit = TimeUnit::parse("minutes since 2010-06-01 00:00:00 UTC").unwrap();
        assert_eq!(unit.try_to_iso8601(30.0).as_deref(), Some("2010-06-01T00:30:00Z"));
    }

    #[test]
    fn test_unrepresentable_offsets() {
        let unit = TimeUnit::parse("hours since 2020-01-01").unwrap();
        assert_eq!(unit.try_to_datetime(9.969209968386869e36), None);
        assert_eq!(unit.try_to_datetime(-9.969209968386869e36), None);
        assert_eq!(unit.try_to_datetime(f64::NAN), None);
        assert_eq!(unit.try_to_datetime(f64::INFINITY), None);
        assert_eq!(unit.try_to_iso8601(-999.0).as_deref(), Some("2019-11-20T09:00:00Z"));
    }

    #[test]
    fn test_invalid_units() {
        assert!(matches!(
            TimeUnit::parse("meters"),
            Err(TimeParseError::InvalidUnits(_))
        ));
        assert!(matches!(
            TimeUnit::parse("fortnights since 2000-01-01"),
            Err(TimeParseError::InvalidUnits(_))
        ));
    }

    #[test]
    fn test_parse_iso8601_variants() {
        let a = parse_iso8601("2024-01-15T12:00:00Z").unwrap();
        let b = parse_iso8601("2024-01-15T12:00:00").unwrap();
        assert_eq!(a, b);
        assert_eq!(format_iso8601(&parse_iso8601("2024-01-15").unwrap()), "2024-01-15T00:00:00Z");
        assert!(parse_iso8601("yesterday").is_err());
    }
}
