//! sensorframe core library: schema-driven decoding of fixed-layout sensor
//! reports.
//!
//! A report arrives as a hex string. A [`Schema`](schema::Schema) names every
//! field, where its bytes live, how to interpret them (`uint8`, `int16`,
//! `uint16`, `hex`, `mac`) and an optional scale. [`decode`] walks the schema
//! and returns a [`DecodedRecord`] whose keys follow schema order.
//!
//! Invariants:
//! - Decoding is pure and deterministic; schemas are immutable once built.
//! - Output keys are exactly the schema's field names, in schema order.
//! - A field window past the end of the buffer is an error, never a silently
//!   dropped field.
//! - Schemas with a length gate turn wrong-length input into `Ok(None)`.
//!
//! # Examples
//! ```
//! use sensorframe_core::{decode, schema::presets};
//!
//! let record = decode("08108b8182342d580104de00af01020164", &presets::mac())?
//!     .expect("34 hex characters pass the gate");
//! let json = serde_json::to_string(&record).expect("record json");
//! assert!(json.starts_with(r#"{"length":8,"messageType":16,"mac":"58:2d:34:82:81:8b""#));
//! # Ok::<(), sensorframe_core::DecodeError>(())
//! ```

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

pub mod decoder;
pub mod schema;

pub use decoder::{DecodeError, decode, decode_bytes};
pub use schema::{ByteOrder, FieldDescriptor, FieldType, Schema, SchemaError};

/// A single decoded value.
///
/// Unscaled numeric fields are integers, scaled ones are floats rounded to
/// one decimal, `hex` and `mac` fields are text. Serializes untagged.
///
/// # Examples
/// ```
/// use sensorframe_core::FieldValue;
///
/// assert_eq!(serde_json::to_string(&FieldValue::Integer(8)).unwrap(), "8");
/// assert_eq!(serde_json::to_string(&FieldValue::Float(22.2)).unwrap(), "22.2");
/// assert_eq!(
///     serde_json::to_string(&FieldValue::Text("8b81".to_string())).unwrap(),
///     r#""8b81""#
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Integer(i64),
    Float(f64),
    Text(String),
}

impl FieldValue {
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            FieldValue::Integer(value) => Some(*value),
            _ => None,
        }
    }

    /// Numeric view; integers widen to `f64`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Integer(value) => Some(*value as f64),
            FieldValue::Float(value) => Some(*value),
            FieldValue::Text(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Text(value) => Some(value),
            _ => None,
        }
    }
}

impl std::fmt::Display for FieldValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldValue::Integer(value) => write!(f, "{value}"),
            FieldValue::Float(value) => write!(f, "{value}"),
            FieldValue::Text(value) => f.write_str(value),
        }
    }
}

/// Ordered mapping from field name to decoded value.
///
/// Serializes as a JSON object whose keys keep schema order.
///
/// # Examples
/// ```
/// use sensorframe_core::{decode_bytes, schema::presets};
///
/// let bytes = [0x08, 0x10, 0x8b, 0x81, 0, 0, 0, 0, 0x01, 0, 0x00, 0xde, 0x01, 0xaf];
/// let record = decode_bytes(&bytes, &presets::device_id()).unwrap();
/// assert_eq!(record.len(), 6);
/// assert_eq!(record.get("temperature").and_then(|v| v.as_f64()), Some(22.2));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DecodedRecord {
    entries: Vec<(String, FieldValue)>,
}

impl DecodedRecord {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
        }
    }

    pub(crate) fn push(&mut self, name: String, value: FieldValue) {
        self.entries.push((name, value));
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.entries
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }

    /// Field names in schema order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.entries
            .iter()
            .map(|(key, value)| (key.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn into_entries(self) -> Vec<(String, FieldValue)> {
        self.entries
    }
}

impl Serialize for DecodedRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_serializes_in_insertion_order() {
        let mut record = DecodedRecord::with_capacity(3);
        record.push("zeta".to_string(), FieldValue::Integer(1));
        record.push("alpha".to_string(), FieldValue::Float(-0.5));
        record.push("mid".to_string(), FieldValue::Text("ab:cd".to_string()));

        let json = serde_json::to_string(&record).expect("record json");
        assert_eq!(json, r#"{"zeta":1,"alpha":-0.5,"mid":"ab:cd"}"#);
    }

    #[test]
    fn field_value_accessors() {
        assert_eq!(FieldValue::Integer(3).as_f64(), Some(3.0));
        assert_eq!(FieldValue::Float(1.5).as_i64(), None);
        assert_eq!(FieldValue::Text("x".to_string()).as_str(), Some("x"));
        assert_eq!(FieldValue::Float(43.1).to_string(), "43.1");
    }

    #[test]
    fn iter_yields_pairs_in_order() {
        let mut record = DecodedRecord::with_capacity(2);
        record.push("b".to_string(), FieldValue::Integer(2));
        record.push("a".to_string(), FieldValue::Text("x".to_string()));

        let pairs: Vec<_> = record.iter().collect();
        assert_eq!(
            pairs,
            [
                ("b", &FieldValue::Integer(2)),
                ("a", &FieldValue::Text("x".to_string())),
            ]
        );
    }

    #[test]
    fn into_entries_hands_over_ownership() {
        let mut record = DecodedRecord::with_capacity(1);
        record.push("battery".to_string(), FieldValue::Integer(1));
        assert_eq!(
            record.into_entries(),
            vec![("battery".to_string(), FieldValue::Integer(1))]
        );
    }

    #[test]
    fn empty_record() {
        let record = DecodedRecord::default();
        assert!(record.is_empty());
        assert_eq!(serde_json::to_string(&record).unwrap(), "{}");
    }
}
