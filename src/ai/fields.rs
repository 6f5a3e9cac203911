//! Defensive reads from untrusted dream records.
//!
//! Records reach the prompt builders from files, the relay and older stores,
//! so any field may be missing, null, or of an unexpected type. Every function
//! here is total: it returns display text or the caller's fallback.

use crate::constants::LIST_SEPARATOR;
use chrono::{DateTime, NaiveDate, Utc};
use serde_json::Value;

/// Returns the value at `path` as display text, or `fallback`.
///
/// - A missing key, or a non-object on the way down, yields `fallback`.
/// - A null or object terminal yields `fallback`.
/// - An array is joined with `", "`, skipping non-scalar elements.
/// - Any result that comes out empty yields `fallback`.
///
/// # Examples
///
/// ```
/// use reverie::ai::fields::field_text;
/// use serde_json::json;
///
/// let dream = json!({ "keywords": { "objects": ["红色的钥匙", "钟表"] } });
/// assert_eq!(field_text(&dream, &["keywords", "objects"], "未提供"), "红色的钥匙, 钟表");
/// assert_eq!(field_text(&dream, &["decoding", "movieTheme"], "未提供"), "未提供");
/// ```
pub fn field_text(record: &Value, path: &[&str], fallback: &str) -> String {
    resolve(record, path)
        .and_then(display_text)
        .unwrap_or_else(|| fallback.to_string())
}

fn resolve<'a>(record: &'a Value, path: &[&str]) -> Option<&'a Value> {
    path.iter()
        .try_fold(record, |node, key| node.as_object()?.get(*key))
}

fn display_text(value: &Value) -> Option<String> {
    let text = match value {
        Value::Array(items) => items
            .iter()
            .filter_map(scalar_text)
            .collect::<Vec<_>>()
            .join(LIST_SEPARATOR),
        other => scalar_text(other)?,
    };

    (!text.is_empty()).then_some(text)
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Reads `timestamp` as a UTC moment.
///
/// Accepts epoch milliseconds as an integer, a float, or a numeric string,
/// and RFC 3339 or `YYYY-MM-DD` strings. Anything else, including values
/// outside chrono's range, is `None`.
pub fn timestamp(record: &Value) -> Option<DateTime<Utc>> {
    match record.get("timestamp")? {
        Value::Number(n) => match n.as_i64() {
            Some(millis) => DateTime::from_timestamp_millis(millis),
            None => n.as_f64().and_then(millis_from_f64),
        },
        Value::String(s) => parse_timestamp_str(s.trim()),
        _ => None,
    }
}

fn millis_from_f64(millis: f64) -> Option<DateTime<Utc>> {
    if !millis.is_finite() || millis.abs() > i64::MAX as f64 {
        return None;
    }
    DateTime::from_timestamp_millis(millis.trunc() as i64)
}

fn parse_timestamp_str(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(millis) = s.parse::<i64>() {
        return DateTime::from_timestamp_millis(millis);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}
