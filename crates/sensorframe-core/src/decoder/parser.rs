use super::error::DecodeError;
use super::reader::FieldReader;
use super::scale::scale_reading;
use crate::schema::{FieldDescriptor, FieldType, Schema};
use crate::{DecodedRecord, FieldValue};

/// Decode one hex-encoded message against `schema`.
///
/// Returns `Ok(None)` when the schema carries a length gate and the input is
/// empty or of a different length. The gate compares the raw input length,
/// whitespace included, and runs before the hex is parsed. Trim line-oriented
/// input with [`message_lines`] first.
///
/// # Errors
/// Returns `DecodeError` for malformed hex or when a field window falls
/// outside the buffer. No partial record is produced.
///
/// # Examples
/// ```
/// use sensorframe_core::{FieldValue, decode, schema::presets};
///
/// let record = decode("08108b8182342d580104de00af01020164", &presets::device_id())?
///     .expect("lenient schemas always produce a record");
/// assert_eq!(record.get("deviceId"), Some(&FieldValue::Text("8b81".to_string())));
/// assert_eq!(record.get("temperature"), Some(&FieldValue::Float(-870.4)));
///
/// assert!(decode("0810", &presets::mac())?.is_none());
/// # Ok::<(), sensorframe_core::DecodeError>(())
/// ```
pub fn decode(input: &str, schema: &Schema) -> Result<Option<DecodedRecord>, DecodeError> {
    if let Some(hex_len) = schema.length_gate() {
        if input.is_empty() || input.len() != hex_len {
            return Ok(None);
        }
    }

    let payload = parse_hex(input)?;
    decode_bytes(&payload, schema).map(Some)
}

/// Decode an already-parsed buffer. The length gate does not apply here.
pub fn decode_bytes(payload: &[u8], schema: &Schema) -> Result<DecodedRecord, DecodeError> {
    let reader = FieldReader::new(payload, schema.byte_order());
    let mut record = DecodedRecord::with_capacity(schema.len());
    for field in schema.fields() {
        let value = decode_field(&reader, field)?;
        record.push(field.name.clone(), value);
    }
    Ok(record)
}

/// Messages of a line-oriented batch: one hex message per line, blank lines
/// and `#` comments skipped.
///
/// # Examples
/// ```
/// use sensorframe_core::decoder::message_lines;
///
/// let text = "# captured 2024-03-01\n0810\n\n  0811  \n";
/// assert_eq!(message_lines(text).collect::<Vec<_>>(), ["0810", "0811"]);
/// ```
pub fn message_lines(text: &str) -> impl Iterator<Item = &str> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
}

/// Parse a hex string (either case) into bytes.
pub fn parse_hex(input: &str) -> Result<Vec<u8>, DecodeError> {
    hex::decode(input).map_err(|err| match err {
        hex::FromHexError::InvalidHexCharacter { c, index } => DecodeError::InvalidHexCharacter {
            character: c,
            index,
        },
        _ => DecodeError::OddLength { len: input.len() },
    })
}

fn decode_field(reader: &FieldReader<'_>, field: &FieldDescriptor) -> Result<FieldValue, DecodeError> {
    let window = reader.read_window(field)?;
    let raw = match field.field_type {
        FieldType::Uint8 => i64::from(reader.read_u8(field)?),
        FieldType::Int16 => i64::from(reader.read_i16(field)?),
        FieldType::Uint16 => i64::from(reader.read_u16(field)?),
        FieldType::Hex => return Ok(FieldValue::Text(hex::encode(window))),
        FieldType::Mac => return Ok(FieldValue::Text(format_mac(window))),
    };
    Ok(scale_reading(raw, field.effective_scale()))
}

/// Reverse the window and join lowercase byte pairs with `:`.
fn format_mac(window: &[u8]) -> String {
    window
        .iter()
        .rev()
        .map(|b| format!("{:02x}", b))
        .collect::<Vec<_>>()
        .join(":")
}
