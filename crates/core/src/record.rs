//! Schema-less patient record.
//!
//! A record is a JSON object. The store only inspects `id`, `requestId`, `createdAt` and
//! `lastUpdate`; every other key is passed through untouched and in the order the caller sent it.

use crate::constants::{CREATED_AT_FIELD, ID_FIELD, LAST_UPDATE_FIELD, REQUEST_ID_FIELD};
use crate::error::{PatientError, PatientResult};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

/// One patient entry.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(Map<String, Value>);

impl Record {
    /// Creates an empty record.
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Parses a raw request body into a record.
    ///
    /// # Errors
    ///
    /// Returns [`PatientError::InvalidFormat`] if the body is not valid JSON or if the top-level
    /// value is anything other than an object.
    pub fn from_json_slice(body: &[u8]) -> PatientResult<Self> {
        let value: Value = serde_json::from_slice(body)?;
        Self::try_from(value)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Sets `key`, returning the previous value if there was one.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(key.into(), value.into())
    }

    /// True when `key` is absent or explicitly `null`.
    pub fn is_missing(&self, key: &str) -> bool {
        matches!(self.0.get(key), None | Some(Value::Null))
    }

    /// Integer value of `id`, if it holds one.
    ///
    /// Floats with no fractional part (`3.0`) count as integers.
    pub fn id(&self) -> Option<i64> {
        match self.0.get(ID_FIELD) {
            Some(Value::Number(n)) => number_as_i64(n),
            _ => None,
        }
    }

    /// True when this record's `id` equals `id`.
    pub fn has_id(&self, id: i64) -> bool {
        self.id() == Some(id)
    }

    /// The `requestId`, when present and a string.
    pub fn request_id(&self) -> Option<&str> {
        self.0.get(REQUEST_ID_FIELD).and_then(Value::as_str)
    }

    pub fn created_at(&self) -> Option<&str> {
        self.0.get(CREATED_AT_FIELD).and_then(Value::as_str)
    }

    pub fn last_update(&self) -> Option<&str> {
        self.0.get(LAST_UPDATE_FIELD).and_then(Value::as_str)
    }

    /// Shallow merge: every key in `patch` overwrites or extends this record.
    ///
    /// Nested objects are replaced wholesale, not merged.
    pub fn merge(&mut self, patch: Record) {
        for (key, value) in patch.0 {
            self.0.insert(key, value);
        }
    }
}

impl TryFrom<Value> for Record {
    type Error = PatientError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            other => Err(PatientError::InvalidFormat(format!(
                "expected a JSON object, found {}",
                json_kind(&other)
            ))),
        }
    }
}

impl From<Record> for Value {
    fn from(record: Record) -> Self {
        Value::Object(record.0)
    }
}

fn number_as_i64(n: &Number) -> Option<i64> {
    if let Some(v) = n.as_i64() {
        return Some(v);
    }
    let f = n.as_f64()?;
    if f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 {
        Some(f as i64)
    } else {
        None
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> Record {
        Record::try_from(value).expect("object literal")
    }

    #[test]
    fn test_from_json_slice_accepts_object() {
        let rec = Record::from_json_slice(br#"{"name":"Alice","requestId":"r1"}"#).unwrap();
        assert_eq!(rec.get("name"), Some(&json!("Alice")));
        assert_eq!(rec.request_id(), Some("r1"));
    }

    #[test]
    fn test_from_json_slice_rejects_non_object() {
        for body in [&b"[1,2]"[..], b"null", b"\"text\"", b"42"] {
            match Record::from_json_slice(body) {
                Err(PatientError::InvalidFormat(msg)) => {
                    assert!(msg.contains("expected a JSON object"), "{msg}")
                }
                other => panic!("Expected InvalidFormat, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_from_json_slice_rejects_malformed_json() {
        assert!(matches!(
            Record::from_json_slice(b"{\"name\":"),
            Err(PatientError::InvalidFormat(_))
        ));
        assert!(matches!(
            Record::from_json_slice(b""),
            Err(PatientError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_id_matching_accepts_integral_numbers_only() {
        assert!(record(json!({"id": 3})).has_id(3));
        assert!(record(json!({"id": 3.0})).has_id(3));
        assert!(!record(json!({"id": 3.5})).has_id(3));
        assert!(!record(json!({"id": "3"})).has_id(3));
        assert_eq!(record(json!({"name": "x"})).id(), None);
    }

    #[test]
    fn test_request_id_ignores_non_string_values() {
        assert_eq!(record(json!({"requestId": 7})).request_id(), None);
        assert_eq!(record(json!({})).request_id(), None);
    }

    #[test]
    fn test_is_missing_treats_null_as_absent() {
        let rec = record(json!({"createdAt": null, "lastUpdate": "x"}));
        assert!(rec.is_missing("createdAt"));
        assert!(rec.is_missing("id"));
        assert!(!rec.is_missing("lastUpdate"));
    }

    #[test]
    fn test_merge_is_shallow() {
        let mut rec = record(json!({
            "name": "Alice",
            "address": {"city": "Leeds", "postcode": "LS1"},
            "age": 40
        }));
        rec.merge(record(json!({"name": "Alicia", "address": {"city": "York"}, "ward": "B"})));

        assert_eq!(
            Value::from(rec),
            json!({
                "name": "Alicia",
                "address": {"city": "York"},
                "age": 40,
                "ward": "B"
            })
        );
    }

    #[test]
    fn test_serialises_transparently_in_insertion_order() {
        let rec = Record::from_json_slice(br#"{"z":1,"a":2}"#).unwrap();
        assert_eq!(serde_json::to_string(&rec).unwrap(), r#"{"z":1,"a":2}"#);
    }
}
