//! Ingestion guards for numeric fields.
//!
//! Upstream payloads (live API responses, synthesized fixtures, hand-edited
//! JSON) are coerced here so the synthesis and scoring paths never see NaN,
//! infinities or negative counters.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Returns `value` when it is finite, otherwise `fallback`.
pub fn to_finite_number(value: f64, fallback: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        fallback
    }
}

/// Like [`to_finite_number`] but also rejects negative values.
pub fn to_non_negative(value: f64, fallback: f64) -> f64 {
    let value = to_finite_number(value, fallback);
    if value < 0.0 {
        fallback
    } else {
        value
    }
}

/// Coerces an arbitrary JSON value into a finite number.
///
/// Numbers pass through, numeric strings are parsed, anything else
/// (null, bool, objects, unparsable text) yields `fallback`.
pub fn finite_from_json(value: &Value, fallback: f64) -> f64 {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.map_or(fallback, |v| to_finite_number(v, fallback))
}

/// Division that returns 0 for a zero or non-finite denominator.
pub fn safe_div(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 || !denominator.is_finite() {
        return 0.0;
    }
    to_finite_number(numerator / denominator, 0.0)
}

pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Serde adapter for counters: accepts numbers, numeric strings or null and
/// degrades everything else to 0. Negative values also become 0.
pub fn lenient_count<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value
        .as_ref()
        .map_or(0.0, |v| to_non_negative(finite_from_json(v, 0.0), 0.0)))
}
