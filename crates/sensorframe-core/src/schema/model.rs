use std::collections::HashSet;
use std::fmt;
use std::ops::Range;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::error::SchemaError;

/// Byte order shared by every multi-byte integer field of a schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ByteOrder {
    /// Most-significant byte first.
    Big,
    /// Least-significant byte first.
    Little,
}

/// Closed set of field interpretations understood by the decoder.
///
/// # Examples
/// ```
/// use sensorframe_core::schema::FieldType;
///
/// let ty: FieldType = "int16".parse().unwrap();
/// assert_eq!(ty, FieldType::Int16);
/// assert!("unknown".parse::<FieldType>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldType {
    /// One unsigned byte.
    Uint8,
    /// Two bytes, two's complement.
    Int16,
    /// Two bytes, unsigned.
    Uint16,
    /// Raw window rendered as lowercase hex.
    Hex,
    /// Raw window reversed and rendered as `aa:bb:..`.
    Mac,
}

impl FieldType {
    pub const ALL: [FieldType; 5] = [
        FieldType::Uint8,
        FieldType::Int16,
        FieldType::Uint16,
        FieldType::Hex,
        FieldType::Mac,
    ];

    /// Wire name used in schema documents.
    pub fn as_str(self) -> &'static str {
        match self {
            FieldType::Uint8 => "uint8",
            FieldType::Int16 => "int16",
            FieldType::Uint16 => "uint16",
            FieldType::Hex => "hex",
            FieldType::Mac => "mac",
        }
    }

    /// Whether values of this type are integers (and therefore scalable).
    pub fn is_numeric(self) -> bool {
        matches!(self, FieldType::Uint8 | FieldType::Int16 | FieldType::Uint16)
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldType {
    type Err = SchemaError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        FieldType::ALL
            .into_iter()
            .find(|ty| ty.as_str() == value)
            .ok_or_else(|| SchemaError::UnsupportedType {
                type_name: value.to_string(),
            })
    }
}

impl Serialize for FieldType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for FieldType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// One field within a record layout.
///
/// # Examples
/// ```
/// use sensorframe_core::schema::{FieldDescriptor, FieldType};
///
/// let field = FieldDescriptor::new("temperature", 10, 2, FieldType::Int16).with_scale(0.1);
/// assert_eq!(field.window(), Some(10..12));
/// assert_eq!(field.effective_scale(), Some(0.1));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    /// Output key; unique within a schema.
    pub name: String,
    /// Byte offset of the first byte of the field.
    pub offset: usize,
    /// Number of bytes occupied by the field.
    pub length: usize,
    /// Interpretation of the bytes.
    #[serde(rename = "type")]
    pub field_type: FieldType,
    /// Optional multiplier for numeric fields.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<f64>,
}

impl FieldDescriptor {
    pub fn new(
        name: impl Into<String>,
        offset: usize,
        length: usize,
        field_type: FieldType,
    ) -> Self {
        Self {
            name: name.into(),
            offset,
            length,
            field_type,
            scale: None,
        }
    }

    pub fn with_scale(mut self, scale: f64) -> Self {
        self.scale = Some(scale);
        self
    }

    /// Byte range `[offset, offset + length)`, or `None` on overflow.
    pub fn window(&self) -> Option<Range<usize>> {
        let end = self.offset.checked_add(self.length)?;
        Some(self.offset..end)
    }

    /// Scale actually applied when decoding.
    ///
    /// A scale of exactly `0.0` is treated as "no scaling", same as an absent
    /// one. Non-numeric types are never scaled.
    pub fn effective_scale(&self) -> Option<f64> {
        if !self.field_type.is_numeric() {
            return None;
        }
        self.scale.filter(|scale| *scale != 0.0)
    }
}

/// Immutable record layout: ordered fields plus the variant properties.
///
/// A schema without a length gate decodes leniently; with one, inputs whose
/// hex length differs are rejected with a "no result" outcome.
///
/// # Examples
/// ```
/// use sensorframe_core::schema::{ByteOrder, FieldDescriptor, FieldType, Schema};
///
/// let schema = Schema::new(
///     ByteOrder::Big,
///     vec![
///         FieldDescriptor::new("kind", 0, 1, FieldType::Uint8),
///         FieldDescriptor::new("id", 1, 2, FieldType::Hex),
///     ],
/// )?
/// .with_length_gate(6)?;
/// assert_eq!(schema.min_buffer_len(), 3);
/// assert_eq!(schema.length_gate(), Some(6));
/// # Ok::<(), sensorframe_core::schema::SchemaError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "SchemaDocument", into = "SchemaDocument")]
pub struct Schema {
    byte_order: ByteOrder,
    length_gate: Option<usize>,
    fields: Vec<FieldDescriptor>,
}

impl Schema {
    /// Build a lenient schema, validating names, lengths and scales.
    ///
    /// # Errors
    /// Returns `SchemaError` for empty or duplicate names, zero-length
    /// fields, windows that overflow `usize`, and non-finite scales.
    pub fn new(byte_order: ByteOrder, fields: Vec<FieldDescriptor>) -> Result<Self, SchemaError> {
        validate_fields(&fields)?;
        Ok(Self {
            byte_order,
            length_gate: None,
            fields,
        })
    }

    /// Presets are fixed layouts checked by their own tests.
    pub(crate) fn from_trusted_parts(
        byte_order: ByteOrder,
        length_gate: Option<usize>,
        fields: Vec<FieldDescriptor>,
    ) -> Self {
        debug_assert!(validate_fields(&fields).is_ok());
        Self {
            byte_order,
            length_gate,
            fields,
        }
    }

    /// Switch to strict-length mode with the expected input length in hex
    /// characters.
    pub fn with_length_gate(mut self, hex_len: usize) -> Result<Self, SchemaError> {
        if hex_len == 0 || hex_len % 2 != 0 {
            return Err(SchemaError::InvalidLengthGate { hex_len });
        }
        self.length_gate = Some(hex_len);
        Ok(self)
    }

    pub fn byte_order(&self) -> ByteOrder {
        self.byte_order
    }

    pub fn length_gate(&self) -> Option<usize> {
        self.length_gate
    }

    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|field| field.name == name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Smallest buffer length that satisfies every field window.
    pub fn min_buffer_len(&self) -> usize {
        self.fields
            .iter()
            .filter_map(|field| field.window())
            .map(|window| window.end)
            .max()
            .unwrap_or(0)
    }

    /// Parse and validate a JSON schema document.
    ///
    /// # Errors
    /// Returns `SchemaError::Json` for malformed JSON and the matching
    /// validation error otherwise (e.g. `UnsupportedType`).
    pub fn from_json_str(json: &str) -> Result<Self, SchemaError> {
        let document: SchemaDocument = serde_json::from_str(json)?;
        Schema::try_from(document)
    }

    pub fn to_json_string(&self) -> Result<String, SchemaError> {
        Ok(serde_json::to_string(&SchemaDocument::from(self.clone()))?)
    }

    pub fn to_json_string_pretty(&self) -> Result<String, SchemaError> {
        Ok(serde_json::to_string_pretty(&SchemaDocument::from(
            self.clone(),
        ))?)
    }
}

fn validate_fields(fields: &[FieldDescriptor]) -> Result<(), SchemaError> {
    let mut seen = HashSet::with_capacity(fields.len());
    for (index, field) in fields.iter().enumerate() {
        if field.name.is_empty() {
            return Err(SchemaError::EmptyName { index });
        }
        if !seen.insert(field.name.as_str()) {
            return Err(SchemaError::DuplicateField {
                name: field.name.clone(),
            });
        }
        if field.length == 0 {
            return Err(SchemaError::ZeroLength {
                name: field.name.clone(),
            });
        }
        if field.window().is_none() {
            return Err(SchemaError::OffsetOverflow {
                name: field.name.clone(),
            });
        }
        if let Some(scale) = field.scale {
            if !scale.is_finite() {
                return Err(SchemaError::NonFiniteScale {
                    name: field.name.clone(),
                    scale,
                });
            }
        }
    }
    Ok(())
}

/// Serialized form of a schema. Field types stay strings here so an unknown
/// type is reported as `SchemaError::UnsupportedType`, not as a JSON error.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct SchemaDocument {
    byte_order: ByteOrder,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    length_gate: Option<usize>,
    fields: Vec<FieldDocument>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct FieldDocument {
    name: String,
    offset: usize,
    length: usize,
    #[serde(rename = "type")]
    field_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    scale: Option<f64>,
}

impl TryFrom<SchemaDocument> for Schema {
    type Error = SchemaError;

    fn try_from(document: SchemaDocument) -> Result<Self, Self::Error> {
        let fields = document
            .fields
            .into_iter()
            .map(|field| {
                Ok(FieldDescriptor {
                    field_type: field.field_type.parse()?,
                    name: field.name,
                    offset: field.offset,
                    length: field.length,
                    scale: field.scale,
                })
            })
            .collect::<Result<Vec<_>, SchemaError>>()?;
        let schema = Schema::new(document.byte_order, fields)?;
        match document.length_gate {
            Some(hex_len) => schema.with_length_gate(hex_len),
            None => Ok(schema),
        }
    }
}

impl From<Schema> for SchemaDocument {
    fn from(schema: Schema) -> Self {
        Self {
            byte_order: schema.byte_order,
            length_gate: schema.length_gate,
            fields: schema
                .fields
                .into_iter()
                .map(|field| FieldDocument {
                    name: field.name,
                    offset: field.offset,
                    length: field.length,
                    field_type: field.field_type.as_str().to_string(),
                    scale: field.scale,
                })
                .collect(),
        }
    }
}
