//! Schema-driven message decoding.
//!
//! Layered like the schema it serves:
//! - `reader`: bounds-checked byte access in the schema's byte order
//! - `scale`: scaling and one-decimal rounding of numeric readings
//! - `parser`: the per-field walk producing a [`DecodedRecord`]
//! - `error`: explicit decode failures
//!
//! Decoding is a pure function of (schema, input): no I/O, no logging, no
//! shared state.
//!
//! [`DecodedRecord`]: crate::DecodedRecord

pub mod error;
pub mod parser;
pub mod reader;
mod scale;

pub use error::DecodeError;
pub use parser::{decode, decode_bytes, message_lines, parse_hex};
