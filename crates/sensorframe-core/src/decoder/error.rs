use thiserror::Error;

/// Errors returned by message decoding.
///
/// # Examples
/// ```
/// use sensorframe_core::decoder::DecodeError;
///
/// let err = DecodeError::OutOfBounds {
///     field: "humidity".to_string(),
///     needed: 14,
///     actual: 13,
/// };
/// assert_eq!(
///     err.to_string(),
///     "field 'humidity' out of bounds: need 14 bytes, got 13"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("malformed hex input: odd number of digits ({len})")]
    OddLength { len: usize },
    #[error("malformed hex input: invalid character {character:?} at position {index}")]
    InvalidHexCharacter { character: char, index: usize },
    #[error("field '{field}' out of bounds: need {needed} bytes, got {actual}")]
    OutOfBounds {
        field: String,
        needed: usize,
        actual: usize,
    },
}

impl DecodeError {
    /// True when the input could not be turned into bytes at all.
    pub fn is_malformed_input(&self) -> bool {
        matches!(
            self,
            DecodeError::OddLength { .. } | DecodeError::InvalidHexCharacter { .. }
        )
    }
}
