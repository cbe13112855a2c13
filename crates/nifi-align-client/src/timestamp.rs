//! NiFi timestamp strings
//!
//! The REST API renders dates in several shapes depending on the field. Each
//! shape is tried in order and the first success wins; when none match the
//! error lists every attempt.

use chrono::{DateTime, FixedOffset, NaiveDateTime, NaiveTime, TimeZone, Timelike, Utc};
use serde::{Deserialize, Deserializer};
use thiserror::Error;
use tracing::debug;

/// None of the known formats matched
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unable to parse value {input} ({})", attempts.join("; "))]
pub struct TimestampParseError {
    /// Rejected input
    pub input: String,
    /// One message per format tried
    pub attempts: Vec<String>,
}

type Attempt = fn(&str, DateTime<Utc>) -> Result<DateTime<Utc>, String>;

/// Formats in the order they are tried
const ATTEMPTS: [(&str, Attempt); 4] = [
    ("HH:mm:ss z", parse_time),
    ("MM/dd/yyyy HH:mm:ss z", parse_date_time),
    ("MM/dd/yyyy HH:mm:ss.SSS z", parse_timestamp),
    ("z", parse_zone),
];

/// Parse a NiFi timestamp; missing date or time parts default from `now`
pub fn parse_nifi_timestamp(value: &str, now: DateTime<Utc>) -> Result<DateTime<Utc>, TimestampParseError> {
    let value = value.trim();
    let mut attempts = Vec::with_capacity(ATTEMPTS.len());

    for (pattern, attempt) in ATTEMPTS {
        match attempt(value, now) {
            Ok(parsed) => return Ok(parsed),
            Err(reason) => attempts.push(format!("{}: {}", pattern, reason)),
        }
    }

    Err(TimestampParseError {
        input: value.to_string(),
        attempts,
    })
}

/// Serde adapter for optional, informational timestamp fields
///
/// A value in an unknown format decodes as `None` so it cannot fail the
/// surrounding payload.
pub fn deserialize_option<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(raw) = Option::<String>::deserialize(deserializer)? else {
        return Ok(None);
    };

    match parse_nifi_timestamp(&raw, Utc::now()) {
        Ok(parsed) => Ok(Some(parsed)),
        Err(e) => {
            debug!("Ignoring timestamp: {}", e);
            Ok(None)
        }
    }
}

fn split_zone(value: &str) -> Result<(&str, FixedOffset), String> {
    let (rest, zone) = value
        .rsplit_once(' ')
        .ok_or_else(|| "missing time zone".to_string())?;
    Ok((rest.trim_end(), zone_offset(zone)?))
}

fn zone_offset(zone: &str) -> Result<FixedOffset, String> {
    let utc = FixedOffset::east_opt(0).ok_or("invalid offset")?;
    match zone {
        "UTC" | "GMT" | "UT" | "Z" => return Ok(utc),
        _ => {}
    }

    if let Some(sign) = zone.chars().next().filter(|c| *c == '+' || *c == '-') {
        let digits: String = zone[1..].chars().filter(|c| *c != ':').collect();
        if digits.len() != 4 || !digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(format!("invalid offset '{}'", zone));
        }
        let hours: i32 = digits[..2].parse().map_err(|_| format!("invalid offset '{}'", zone))?;
        let minutes: i32 = digits[2..].parse().map_err(|_| format!("invalid offset '{}'", zone))?;
        let seconds = (hours * 3600 + minutes * 60) * if sign == '-' { -1 } else { 1 };
        return FixedOffset::east_opt(seconds).ok_or_else(|| format!("offset out of range '{}'", zone));
    }

    // Abbreviations such as CET are ambiguous; read them as UTC
    if (2..=5).contains(&zone.len()) && zone.chars().all(|c| c.is_ascii_alphabetic()) {
        return Ok(utc);
    }

    Err(format!("unknown time zone '{}'", zone))
}

fn to_utc(offset: FixedOffset, local: NaiveDateTime) -> Result<DateTime<Utc>, String> {
    offset
        .from_local_datetime(&local)
        .single()
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or_else(|| "ambiguous local time".to_string())
}

fn parse_time(value: &str, now: DateTime<Utc>) -> Result<DateTime<Utc>, String> {
    let (rest, offset) = split_zone(value)?;
    let time = NaiveTime::parse_from_str(rest, "%H:%M:%S").map_err(|e| e.to_string())?;
    let today = now.with_timezone(&offset).date_naive();
    to_utc(offset, today.and_time(time))
}

fn parse_date_time(value: &str, _now: DateTime<Utc>) -> Result<DateTime<Utc>, String> {
    let (rest, offset) = split_zone(value)?;
    let local = NaiveDateTime::parse_from_str(rest, "%m/%d/%Y %H:%M:%S").map_err(|e| e.to_string())?;
    to_utc(offset, local)
}

fn parse_timestamp(value: &str, _now: DateTime<Utc>) -> Result<DateTime<Utc>, String> {
    let (rest, offset) = split_zone(value)?;
    let local = NaiveDateTime::parse_from_str(rest, "%m/%d/%Y %H:%M:%S%.3f").map_err(|e| e.to_string())?;
    to_utc(offset, local)
}

fn parse_zone(value: &str, now: DateTime<Utc>) -> Result<DateTime<Utc>, String> {
    zone_offset(value)?;
    Ok(now.with_nanosecond(0).unwrap_or(now))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 15, 12, 30, 45).unwrap()
    }

    #[test]
    fn test_time_only_uses_todays_date() {
        let parsed = parse_nifi_timestamp("10:20:30 UTC", now()).unwrap();
        assert_eq!((parsed.year(), parsed.month(), parsed.day()), (2024, 3, 15));
        assert_eq!((parsed.hour(), parsed.minute(), parsed.second()), (10, 20, 30));
    }

    #[test]
    fn test_full_date_time() {
        let parsed = parse_nifi_timestamp("01/02/2023 03:04:05 GMT", now()).unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2023, 1, 2, 3, 4, 5).unwrap());
    }

    #[test]
    fn test_date_time_with_millis_and_offset() {
        let parsed = parse_nifi_timestamp("01/02/2023 03:04:05.678 +0100", now()).unwrap();
        assert_eq!(parsed.hour(), 2);
        assert_eq!(parsed.timestamp_subsec_millis(), 678);
    }

    #[test]
    fn test_zone_only_defaults_to_now() {
        let parsed = parse_nifi_timestamp("UTC", now()).unwrap();
        assert_eq!(parsed, now());
    }

    #[test]
    fn test_garbage_lists_every_attempt() {
        let err = parse_nifi_timestamp("not a date", now()).unwrap_err();
        assert_eq!(err.input, "not a date");
        assert_eq!(err.attempts.len(), 4);
        assert!(err.to_string().starts_with("Unable to parse value not a date"));
    }

    #[test]
    fn test_colon_offset() {
        let parsed = parse_nifi_timestamp("01/02/2023 05:34:05 +05:30", now()).unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2023, 1, 2, 0, 4, 5).unwrap());
    }
}
