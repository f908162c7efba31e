//! Lenient conversions from stored or user-entered JSON values.

use backoffice_types::Value;
use chrono::{DateTime, Utc};

use crate::ledger::{Counter, SlotId, is_valid_slot};

/// Numbers and numeric strings; everything else, NaN and infinities are 0.
pub fn number(value: Option<&Value>) -> f64 {
    let parsed = match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|n| n.is_finite()).unwrap_or(0.0)
}

/// Counter readings: negatives become 0, fractions are truncated.
pub fn counter(value: Option<&Value>) -> Counter {
    let n = number(value);
    if n <= 0.0 {
        0
    } else if n >= f64::from(Counter::MAX) {
        Counter::MAX
    } else {
        n.trunc() as Counter
    }
}

/// Monetary values, never negative.
pub fn amount(value: Option<&Value>) -> f64 {
    number(value).max(0.0)
}

pub fn slot_id(value: Option<&Value>) -> Option<SlotId> {
    let n = match value? {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    if n.fract() != 0.0 || !(0.0..=f64::from(SlotId::MAX)).contains(&n) {
        return None;
    }
    let slot_id = n as SlotId;
    is_valid_slot(slot_id).then_some(slot_id)
}

/// RFC 3339 strings, epoch milliseconds, or `{ seconds, nanoseconds }`.
pub fn timestamp(value: Option<&Value>) -> Option<DateTime<Utc>> {
    match value? {
        Value::String(s) => DateTime::parse_from_rfc3339(s.trim())
            .ok()
            .map(|dt| dt.with_timezone(&Utc)),
        Value::Number(n) => DateTime::from_timestamp_millis(n.as_i64()?),
        Value::Object(obj) => {
            let seconds = obj.get("seconds").and_then(Value::as_i64)?;
            let nanos = obj
                .get("nanoseconds")
                .and_then(Value::as_u64)
                .and_then(|n| u32::try_from(n).ok())
                .unwrap_or(0);
            DateTime::from_timestamp(seconds, nanos)
        }
        _ => None,
    }
}

pub fn array(value: Option<&Value>) -> &[Value] {
    value
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default()
}
