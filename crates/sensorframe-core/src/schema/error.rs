use thiserror::Error;

/// Errors returned while building or loading a schema.
///
/// # Examples
/// ```
/// use sensorframe_core::schema::SchemaError;
///
/// let err = SchemaError::UnsupportedType {
///     type_name: "unknown".to_string(),
/// };
/// assert!(err.to_string().contains("unsupported field type"));
/// ```
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("unsupported field type '{type_name}'")]
    UnsupportedType { type_name: String },
    #[error("field #{index} has an empty name")]
    EmptyName { index: usize },
    #[error("duplicate field name '{name}'")]
    DuplicateField { name: String },
    #[error("field '{name}' has zero length")]
    ZeroLength { name: String },
    #[error("field '{name}' offset + length overflows")]
    OffsetOverflow { name: String },
    #[error("field '{name}' has a non-finite scale: {scale}")]
    NonFiniteScale { name: String, scale: f64 },
    #[error("invalid length gate: {hex_len} (must be a positive, even hex length)")]
    InvalidLengthGate { hex_len: usize },
    #[error("unknown schema preset '{name}'")]
    UnknownPreset { name: String },
    #[error("invalid schema JSON: {0}")]
    Json(#[from] serde_json::Error),
}
