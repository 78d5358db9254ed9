//! Canonical request hashing.
//!
//! Records are hashed as `hex(BLAKE3(canonical_json))`, where the canonical
//! form sorts object keys and drops insignificant whitespace. Two requests that
//! differ only in key order or formatting hash identically.

use crate::error::RequestError;
use crate::request::MidiRecord;

/// Computes the canonical BLAKE3 hash of a validated record.
///
/// # Returns
/// * A 64-character lowercase hexadecimal string
pub fn canonical_record_hash(record: &MidiRecord) -> Result<String, RequestError> {
    let value = record.to_value()?;
    Ok(canonical_value_hash(&value))
}

/// Computes the canonical BLAKE3 hash of a JSON value.
pub fn canonical_value_hash(value: &serde_json::Value) -> String {
    let canonical = canonicalize_json(value);
    blake3::hash(canonical.as_bytes()).to_hex().to_string()
}

/// Canonicalizes a JSON value: sorted object keys, no whitespace.
pub fn canonicalize_json(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::Null => "null".to_string(),
        serde_json::Value::Bool(b) => b.to_string(),
        serde_json::Value::Number(n) => format_number(n),
        serde_json::Value::String(s) => format_string(s),
        serde_json::Value::Array(arr) => {
            let items: Vec<String> = arr.iter().map(canonicalize_json).collect();
            format!("[{}]", items.join(","))
        }
        serde_json::Value::Object(obj) => {
            let mut entries: Vec<(&String, &serde_json::Value)> = obj.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));

            let pairs: Vec<String> = entries
                .into_iter()
                .map(|(k, v)| format!("{}:{}", format_string(k), canonicalize_json(v)))
                .collect();
            format!("{{{}}}", pairs.join(","))
        }
    }
}

/// Integer-valued floats are written without a fractional part, so `60` and
/// `60.0` canonicalize the same way.
fn format_number(n: &serde_json::Number) -> String {
    if let Some(i) = n.as_i64() {
        return i.to_string();
    }
    if let Some(u) = n.as_u64() {
        return u.to_string();
    }
    match n.as_f64() {
        Some(f) if !f.is_finite() => "null".to_string(),
        Some(f) if f == 0.0 => "0".to_string(),
        Some(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", f as i64),
        Some(f) => format!("{}", f),
        None => "null".to_string(),
    }
}

fn format_string(s: &str) -> String {
    let mut result = String::with_capacity(s.len() + 2);
    result.push('"');
    for c in s.chars() {
        match c {
            '"' => result.push_str("\\\""),
            '\\' => result.push_str("\\\\"),
            '\n' => result.push_str("\\n"),
            '\r' => result.push_str("\\r"),
            '\t' => result.push_str("\\t"),
            c if c < '\x20' => result.push_str(&format!("\\u{:04x}", c as u32)),
            c => result.push(c),
        }
    }
    result.push('"');
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::CreateRequest;
    use serde_json::json;

    fn record(json: &str) -> MidiRecord {
        CreateRequest::from_json(json).unwrap().validate().unwrap()
    }

    #[test]
    fn test_record_hash_is_stable() {
        let r = record(r#"{"parameters": {"NOTE_ON": 1}, "programs": [], "notes": []}"#);
        let hash1 = canonical_record_hash(&r).unwrap();
        let hash2 = canonical_record_hash(&r).unwrap();
        assert_eq!(hash1.len(), 64);
        assert_eq!(hash1, hash2);
    }

    #[test]
    fn test_formatting_does_not_change_hash() {
        let a = record(r#"{"notes": [], "programs": [], "parameters": {"NOTE_OFF": 0, "NOTE_ON": 1}}"#);
        let b = record(
            r#"{
                "parameters": {"NOTE_ON": 1, "NOTE_OFF": 0},
                "programs": [],
                "notes": []
            }"#,
        );
        assert_eq!(
            canonical_record_hash(&a).unwrap(),
            canonical_record_hash(&b).unwrap()
        );
    }

    #[test]
    fn test_different_notes_different_hash() {
        let a = record(
            r#"{"parameters": {}, "programs": [], "notes": [{"time": 0, "event": 1, "channel": 0, "pitch": 60}]}"#,
        );
        let b = record(
            r#"{"parameters": {}, "programs": [], "notes": [{"time": 0, "event": 1, "channel": 0, "pitch": 61}]}"#,
        );
        assert_ne!(
            canonical_record_hash(&a).unwrap(),
            canonical_record_hash(&b).unwrap()
        );
    }

    #[test]
    fn test_canonicalize_sorts_keys() {
        let value = json!({"z": 1, "a": [true, null], "m": "x\ny"});
        assert_eq!(canonicalize_json(&value), r#"{"a":[true,null],"m":"x\ny","z":1}"#);
    }

    #[test]
    fn test_canonicalize_integer_valued_floats() {
        assert_eq!(canonicalize_json(&json!(60.0)), "60");
        assert_eq!(canonicalize_json(&json!(0.5)), "0.5");
        assert_eq!(canonicalize_json(&json!(-0.0)), "0");
    }
}
