use super::error::DecodeError;
use crate::schema::{ByteOrder, FieldDescriptor};

/// Bounds-checked access to a message buffer, keyed by field descriptors.
///
/// Every read reports the offending field by name so a short buffer points
/// straight at the schema entry that could not be satisfied.
pub struct FieldReader<'a> {
    payload: &'a [u8],
    byte_order: ByteOrder,
}

impl<'a> FieldReader<'a> {
    pub fn new(payload: &'a [u8], byte_order: ByteOrder) -> Self {
        Self {
            payload,
            byte_order,
        }
    }

    /// The field's full `[offset, offset + length)` window.
    pub fn read_window(&self, field: &FieldDescriptor) -> Result<&'a [u8], DecodeError> {
        let end = field.offset.saturating_add(field.length);
        self.read_slice(field, field.offset..end)
    }

    pub fn read_u8(&self, field: &FieldDescriptor) -> Result<u8, DecodeError> {
        let [byte] = self.read_array::<1>(field)?;
        Ok(byte)
    }

    pub fn read_u16(&self, field: &FieldDescriptor) -> Result<u16, DecodeError> {
        let bytes = self.read_array::<2>(field)?;
        Ok(match self.byte_order {
            ByteOrder::Big => u16::from_be_bytes(bytes),
            ByteOrder::Little => u16::from_le_bytes(bytes),
        })
    }

    pub fn read_i16(&self, field: &FieldDescriptor) -> Result<i16, DecodeError> {
        let bytes = self.read_array::<2>(field)?;
        Ok(match self.byte_order {
            ByteOrder::Big => i16::from_be_bytes(bytes),
            ByteOrder::Little => i16::from_le_bytes(bytes),
        })
    }

    fn read_array<const N: usize>(&self, field: &FieldDescriptor) -> Result<[u8; N], DecodeError> {
        let end = field.offset.saturating_add(N);
        let bytes = self.read_slice(field, field.offset..end)?;
        let mut out = [0u8; N];
        out.copy_from_slice(bytes);
        Ok(out)
    }

    fn read_slice(
        &self,
        field: &FieldDescriptor,
        range: std::ops::Range<usize>,
    ) -> Result<&'a [u8], DecodeError> {
        self.payload
            .get(range.clone())
            .ok_or_else(|| DecodeError::OutOfBounds {
                field: field.name.clone(),
                needed: range.end,
                actual: self.payload.len(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::FieldReader;
    use crate::decoder::DecodeError;
    use crate::schema::{ByteOrder, FieldDescriptor, FieldType};

    #[test]
    fn reads_u16_in_schema_byte_order() {
        let payload = [0x01, 0x02];
        let field = FieldDescriptor::new("w", 0, 2, FieldType::Uint16);
        let big = FieldReader::new(&payload, ByteOrder::Big);
        let little = FieldReader::new(&payload, ByteOrder::Little);
        assert_eq!(big.read_u16(&field).unwrap(), 0x0102);
        assert_eq!(little.read_u16(&field).unwrap(), 0x0201);
    }

    #[test]
    fn reads_i16_sign() {
        let payload = [0xff, 0xfe];
        let field = FieldDescriptor::new("t", 0, 2, FieldType::Int16);
        let reader = FieldReader::new(&payload, ByteOrder::Big);
        assert_eq!(reader.read_i16(&field).unwrap(), -2);
    }

    #[test]
    fn window_past_end_names_field() {
        let payload = [0u8; 3];
        let field = FieldDescriptor::new("id", 2, 2, FieldType::Hex);
        let reader = FieldReader::new(&payload, ByteOrder::Big);
        let err = reader.read_window(&field).unwrap_err();
        assert_eq!(
            err,
            DecodeError::OutOfBounds {
                field: "id".to_string(),
                needed: 4,
                actual: 3,
            }
        );
    }

    #[test]
    fn numeric_read_checks_natural_width() {
        // Declared length 1 but int16 still reads two bytes.
        let payload = [0u8; 1];
        let field = FieldDescriptor::new("t", 0, 1, FieldType::Int16);
        let reader = FieldReader::new(&payload, ByteOrder::Big);
        assert!(reader.read_window(&field).is_ok());
        assert!(matches!(
            reader.read_i16(&field),
            Err(DecodeError::OutOfBounds { needed: 2, .. })
        ));
    }
}
