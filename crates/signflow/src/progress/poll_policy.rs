//! Pure decisions over raw cache reads.
//!
//! Writers may store a status as a JSON number or as a numeric string;
//! anything else reads as absent.

use serde_json::Value;

/// Reads a cached status code.
pub fn normalize_status(value: &Value) -> Option<i32> {
    match value {
        Value::Number(n) => n.as_i64().and_then(|v| i32::try_from(v).ok()),
        Value::String(s) => s.trim().parse::<i32>().ok(),
        _ => None,
    }
}

/// The first cache read of a poll.
pub fn baseline(cached: Option<&Value>) -> Option<i32> {
    cached.and_then(normalize_status)
}

/// Returns the new status when `current` is present and differs from the
/// baseline.
pub fn status_change(baseline: Option<i32>, current: Option<&Value>) -> Option<i32> {
    let current = current.and_then(normalize_status)?;
    (Some(current) != baseline).then_some(current)
}
