//! 📅 Dates — the forge speaks at least four date dialects and we have to understand all of them.
//!
//! `2023-01-01T10:00:00Z`, `2023-01-01T10:00:00`, `2023-01-01 10:00`,
//! `2023-01-01`, and the fetcher's epoch floats. Everything without an
//! offset is taken to be UTC. Everything unparseable is `None`, which
//! lands in the document as `null` rather than taking the item down.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::Value;

/// 🗣️ Offset-less formats, most common first.
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// 🔍 Parse a date string in any dialect we have seen in the wild.
pub(crate) fn parse_datetime(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S %z") {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// 🔍 Same, for JSON values: strings are parsed, numbers are epoch seconds.
pub(crate) fn parse_value(raw: &Value) -> Option<DateTime<Utc>> {
    match raw {
        Value::String(s) => parse_datetime(s),
        Value::Number(n) => {
            let secs = n.as_f64()?;
            let whole = secs.trunc() as i64;
            let nanos = ((secs - secs.trunc()) * 1e9).round() as u32;
            DateTime::from_timestamp(whole, nanos.min(999_999_999))
        }
        _ => None,
    }
}

/// ⏳ Whole days from `from` to `to`, truncated toward zero. `None` if either end is unknown.
pub(crate) fn days_between(from: Option<DateTime<Utc>>, to: Option<DateTime<Utc>>) -> Option<i64> {
    Some((to? - from?).num_days())
}

/// 🧾 Canonical ISO-8601 with an explicit `+00:00`, the shape dashboards sort on.
pub(crate) fn to_iso(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339()
}
