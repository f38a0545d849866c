// In crates/core-types/src/lenient.rs

//! Forgiving deserializers for upstream rows whose numeric columns arrive as
//! numbers, numeric strings, `null`, or garbage depending on the query.
//!
//! Every helper degrades to `None` instead of failing the whole row.

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::str::FromStr;

/// Timestamps above this are treated as milliseconds.
const MILLIS_THRESHOLD: i64 = 100_000_000_000;

pub fn decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(decimal_from_value))
}

pub fn text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(Value::Bool(b)) => Some(b.to_string()),
        _ => None,
    })
}

pub fn timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(timestamp_from_value))
}

/// Converts a JSON scalar into a `Decimal`, if it holds something numeric.
pub fn decimal_from_value(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .map(Decimal::from)
            .or_else(|| n.as_u64().map(Decimal::from))
            .or_else(|| n.as_f64().and_then(Decimal::from_f64)),
        Value::String(s) => {
            let s = s.trim();
            Decimal::from_str(s)
                .or_else(|_| Decimal::from_scientific(s))
                .ok()
        }
        _ => None,
    }
}

pub fn timestamp_from_value(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(s) => parse_timestamp(s),
        Value::Number(n) => n.as_i64().and_then(timestamp_from_epoch),
        _ => None,
    }
}

/// Parses RFC 3339 as well as the `2024-01-31 12:00:00.000 UTC` form Dune emits.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    let naive = raw.trim_end_matches("UTC").trim_end();
    ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(naive, fmt).ok())
        .map(|dt| Utc.from_utc_datetime(&dt))
        .or_else(|| naive.parse::<i64>().ok().and_then(timestamp_from_epoch))
}

fn timestamp_from_epoch(value: i64) -> Option<DateTime<Utc>> {
    if value.abs() >= MILLIS_THRESHOLD {
        Utc.timestamp_millis_opt(value).single()
    } else {
        Utc.timestamp_opt(value, 0).single()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[test]
    fn numbers_and_numeric_strings_become_decimals() {
        assert_eq!(decimal_from_value(&json!(100)), Some(dec!(100)));
        assert_eq!(decimal_from_value(&json!(1.5)), Some(dec!(1.5)));
        assert_eq!(decimal_from_value(&json!(" 42.25 ")), Some(dec!(42.25)));
        assert_eq!(decimal_from_value(&json!("1e3")), Some(dec!(1000)));
    }

    #[test]
    fn garbage_degrades_to_none() {
        assert_eq!(decimal_from_value(&json!("n/a")), None);
        assert_eq!(decimal_from_value(&json!(null)), None);
        assert_eq!(decimal_from_value(&json!({"value": 1})), None);
        assert_eq!(decimal_from_value(&json!([1, 2])), None);
    }

    #[test]
    fn parses_dune_and_rfc3339_timestamps() {
        let expected = Utc.with_ymd_and_hms(2024, 1, 31, 12, 0, 0).unwrap();
        assert_eq!(parse_timestamp("2024-01-31 12:00:00.000 UTC"), Some(expected));
        assert_eq!(parse_timestamp("2024-01-31T12:00:00Z"), Some(expected));
        assert_eq!(parse_timestamp("2024-01-31T12:00:00"), Some(expected));
        assert_eq!(parse_timestamp("not a date"), None);
        assert_eq!(parse_timestamp(""), None);
    }

    #[test]
    fn epoch_seconds_and_millis_are_both_accepted() {
        let expected = Utc.with_ymd_and_hms(2024, 1, 31, 12, 0, 0).unwrap();
        let secs = expected.timestamp();
        assert_eq!(timestamp_from_value(&json!(secs)), Some(expected));
        assert_eq!(timestamp_from_value(&json!(secs * 1000)), Some(expected));
    }
}
