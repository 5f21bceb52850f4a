//! JSON request bodies.

use serde_json::{Number, Value};

use crate::error::ClientError;
use crate::Fields;

/// Pretty-printed JSON object built from `fields`, with numeric strings
/// coerced to numbers at every depth.
pub fn encode_json_fields(fields: &Fields) -> Result<Vec<u8>, ClientError> {
    let coerced: Fields = fields
        .iter()
        .map(|(k, v)| (k.clone(), coerce_numeric(v.clone())))
        .collect();
    Ok(serde_json::to_vec_pretty(&Value::Object(coerced))?)
}

fn coerce_numeric(value: Value) -> Value {
    match value {
        Value::String(s) => match parse_number(&s) {
            Some(n) => Value::Number(n),
            None => Value::String(s),
        },
        Value::Array(items) => Value::Array(items.into_iter().map(coerce_numeric).collect()),
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(k, v)| (k, coerce_numeric(v)))
                .collect(),
        ),
        other => other,
    }
}

fn parse_number(s: &str) -> Option<Number> {
    if let Ok(i) = s.parse::<i64>() {
        return Some(Number::from(i));
    }
    if let Ok(u) = s.parse::<u64>() {
        return Some(Number::from(u));
    }
    // Rust's float parser accepts "inf" and "NaN"; JSON numbers may not.
    if !s.bytes().any(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse::<f64>().ok().and_then(Number::from_f64)
}
