//! Record layouts.
//!
//! A [`Schema`] is an ordered list of [`FieldDescriptor`]s plus the two
//! properties that distinguish report variants: the byte order of multi-byte
//! integers and an optional length gate on the whole input. Schemas are
//! validated once when built or loaded and are immutable afterwards, so they
//! can be shared freely between decode calls and threads.
//!
//! Schemas round-trip through JSON (`from_json_str` / `to_json_string`);
//! reading files is left to callers.

pub mod error;
mod model;
pub mod presets;

pub use error::SchemaError;
pub use model::{ByteOrder, FieldDescriptor, FieldType, Schema};
