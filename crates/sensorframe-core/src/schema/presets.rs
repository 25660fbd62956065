//! Built-in schemas for the two sensor report layouts seen in the field.
//!
//! Both share the same header (`length`, `messageType`) and sensor block
//! (`battery`, `temperature`, `humidity`); they differ in the identifier
//! field, the byte order, and whether the whole message length is gated.

use super::error::SchemaError;
use super::model::{ByteOrder, FieldDescriptor, FieldType, Schema};

pub const DEVICE_ID: &str = "device-id";
pub const MAC: &str = "mac";

/// Preset names accepted by [`by_name`].
pub const NAMES: [&str; 2] = [DEVICE_ID, MAC];

/// Expected hex length of a MAC report (17 bytes).
pub const MAC_REPORT_HEX_LEN: usize = 34;

const TENTHS: f64 = 0.1;

/// Big-endian report carrying a 2-byte device id, decoded leniently.
pub fn device_id() -> Schema {
    Schema::from_trusted_parts(
        ByteOrder::Big,
        None,
        vec![
            FieldDescriptor::new("length", 0, 1, FieldType::Uint8),
            FieldDescriptor::new("messageType", 1, 1, FieldType::Uint8),
            FieldDescriptor::new("deviceId", 2, 2, FieldType::Hex),
            FieldDescriptor::new("temperature", 10, 2, FieldType::Int16).with_scale(TENTHS),
            FieldDescriptor::new("humidity", 12, 2, FieldType::Uint16).with_scale(TENTHS),
            FieldDescriptor::new("battery", 8, 1, FieldType::Uint8),
        ],
    )
}

/// Little-endian report carrying a 6-byte MAC, gated to exactly 17 bytes.
pub fn mac() -> Schema {
    Schema::from_trusted_parts(
        ByteOrder::Little,
        Some(MAC_REPORT_HEX_LEN),
        vec![
            FieldDescriptor::new("length", 0, 1, FieldType::Uint8),
            FieldDescriptor::new("messageType", 1, 1, FieldType::Uint8),
            FieldDescriptor::new("mac", 2, 6, FieldType::Mac),
            FieldDescriptor::new("battery", 8, 1, FieldType::Uint8),
            FieldDescriptor::new("temperature", 10, 2, FieldType::Int16).with_scale(TENTHS),
            FieldDescriptor::new("humidity", 12, 2, FieldType::Uint16).with_scale(TENTHS),
        ],
    )
}

/// Resolve a preset by name.
///
/// # Examples
/// ```
/// use sensorframe_core::schema::presets;
///
/// let schema = presets::by_name("mac").unwrap();
/// assert_eq!(schema.length_gate(), Some(34));
/// assert!(presets::by_name("nope").is_none());
/// ```
pub fn by_name(name: &str) -> Option<Schema> {
    match name {
        DEVICE_ID => Some(device_id()),
        MAC => Some(mac()),
        _ => None,
    }
}

/// Same as [`by_name`] but reports the unknown name as a schema error.
pub fn require(name: &str) -> Result<Schema, SchemaError> {
    by_name(name).ok_or_else(|| SchemaError::UnknownPreset {
        name: name.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn device_id_is_lenient_big_endian() {
        let schema = device_id();
        assert_eq!(schema.byte_order(), ByteOrder::Big);
        assert_eq!(schema.length_gate(), None);
        assert_eq!(schema.min_buffer_len(), 14);
    }

    #[test]
    fn mac_is_gated_little_endian() {
        let schema = mac();
        assert_eq!(schema.byte_order(), ByteOrder::Little);
        assert_eq!(schema.length_gate(), Some(MAC_REPORT_HEX_LEN));
        assert_eq!(schema.field("mac").map(|f| f.length), Some(6));
    }

    #[test]
    fn presets_pass_validation() {
        for name in NAMES {
            let schema = require(name).unwrap();
            let json = schema.to_json_string().unwrap();
            assert_eq!(Schema::from_json_str(&json).unwrap(), schema);
        }
    }

    #[test]
    fn every_name_resolves() {
        for name in NAMES {
            assert!(by_name(name).is_some(), "missing preset {name}");
        }
    }

    #[test]
    fn require_reports_unknown_name() {
        let err = require("ble").unwrap_err();
        assert!(err.to_string().contains("unknown schema preset 'ble'"));
    }
}
