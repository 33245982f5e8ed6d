//! Read-or-default extraction for loosely-typed record fields
//!
//! Exports are not consistent about value types: durations show up as
//! numbers or numeric strings, flags as booleans, numbers or null. Each
//! helper here reads one field with an explicit fallback instead of failing.

use crate::types::RawRecord;
use serde_json::Value;

/// Read a string field, trimmed. Missing or non-string values read as empty.
pub fn read_string(raw: &RawRecord, key: &str) -> String {
    match raw.get(key) {
        Some(Value::String(s)) => s.trim().to_string(),
        _ => String::new(),
    }
}

/// Read a numeric field.
///
/// Numbers pass through, numeric strings are parsed, booleans read as 1/0,
/// and missing, null or blank values read as 0. Anything unparsable reads
/// as NaN so that [`round_ms`] can clamp it.
pub fn read_number(raw: &RawRecord, key: &str) -> f64 {
    match raw.get(key) {
        None | Some(Value::Null) => 0.0,
        Some(Value::Bool(b)) => {
            if *b {
                1.0
            } else {
                0.0
            }
        }
        Some(Value::Number(n)) => n.as_f64().unwrap_or(f64::NAN),
        Some(Value::String(s)) => {
            let s = s.trim();
            if s.is_empty() {
                0.0
            } else {
                s.parse::<f64>().unwrap_or(f64::NAN)
            }
        }
        Some(Value::Array(_)) | Some(Value::Object(_)) => f64::NAN,
    }
}

/// Read a field by truthiness.
///
/// `false`, `null`, `0`, `""` and missing are false; everything else is true.
pub fn read_truthy(raw: &RawRecord, key: &str) -> bool {
    match raw.get(key) {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().map(|v| v != 0.0 && !v.is_nan()).unwrap_or(true),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(_)) | Some(Value::Object(_)) => true,
    }
}

/// Sanitize a played duration to whole milliseconds.
///
/// Non-finite and negative values clamp to 0; everything else rounds to
/// the nearest integer with halves rounding up. Values beyond `u64::MAX`
/// saturate there.
pub fn round_ms(value: f64) -> u64 {
    if !value.is_finite() || value < 0.0 {
        return 0;
    }
    (value + 0.5).floor() as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: serde_json::Value) -> RawRecord {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_read_string() {
        let raw = record(json!({ "a": "  padded  ", "b": 12, "c": null }));
        assert_eq!(read_string(&raw, "a"), "padded");
        assert_eq!(read_string(&raw, "b"), "");
        assert_eq!(read_string(&raw, "c"), "");
        assert_eq!(read_string(&raw, "missing"), "");
    }

    #[test]
    fn test_read_number() {
        let raw = record(json!({
            "int": 1500,
            "float": 120.9,
            "text": " 120.9 ",
            "blank": "",
            "junk": "abc",
            "flag": true,
            "null": null,
            "list": [1]
        }));
        assert_eq!(read_number(&raw, "int"), 1500.0);
        assert_eq!(read_number(&raw, "float"), 120.9);
        assert_eq!(read_number(&raw, "text"), 120.9);
        assert_eq!(read_number(&raw, "blank"), 0.0);
        assert!(read_number(&raw, "junk").is_nan());
        assert_eq!(read_number(&raw, "flag"), 1.0);
        assert_eq!(read_number(&raw, "null"), 0.0);
        assert_eq!(read_number(&raw, "missing"), 0.0);
        assert!(read_number(&raw, "list").is_nan());
    }

    #[test]
    fn test_round_ms_rounds_rather_than_truncates() {
        assert_eq!(round_ms(120.9), 121);
        assert_eq!(round_ms(120.4), 120);
        assert_eq!(round_ms(120.5), 121);
        assert_eq!(round_ms(0.0), 0);
    }

    #[test]
    fn test_round_ms_clamps_bad_values() {
        assert_eq!(round_ms(-500.0), 0);
        assert_eq!(round_ms(f64::NAN), 0);
        assert_eq!(round_ms(f64::INFINITY), 0);
        assert_eq!(round_ms(f64::NEG_INFINITY), 0);
        assert_eq!(round_ms(1e20), u64::MAX);
    }

    #[test]
    fn test_read_truthy() {
        let raw = record(json!({
            "t": true,
            "f": false,
            "zero": 0,
            "one": 1,
            "empty": "",
            "word": "false",
            "null": null,
            "obj": {}
        }));
        assert!(read_truthy(&raw, "t"));
        assert!(!read_truthy(&raw, "f"));
        assert!(!read_truthy(&raw, "zero"));
        assert!(read_truthy(&raw, "one"));
        assert!(!read_truthy(&raw, "empty"));
        assert!(read_truthy(&raw, "word"));
        assert!(!read_truthy(&raw, "null"));
        assert!(read_truthy(&raw, "obj"));
        assert!(!read_truthy(&raw, "missing"));
    }
}
