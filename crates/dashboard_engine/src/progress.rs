use serde_json::Value;

const MAX_PROGRESS: u64 = 100;

/// Extracts a progress percentage from a notification payload.
///
/// Accepts a bare integer, the first element of an argument list, or an
/// object with a `progress` field. Values outside `0..=100` are rejected.
pub fn parse_progress(value: &Value) -> Option<u8> {
    match value {
        Value::Number(number) => number
            .as_u64()
            .filter(|v| *v <= MAX_PROGRESS)
            .and_then(|v| u8::try_from(v).ok()),
        Value::Array(items) => items.first().and_then(parse_progress),
        Value::Object(fields) => fields.get("progress").and_then(parse_progress),
        _ => None,
    }
}
