//! Generic serialization/deserialization engine driven by static payload
//! schemas. It controls the byte-level readers/writers and turns dynamic
//! `FieldValue`s into strongly typed domain structures and back.
use super::bytes::{ByteReader, ByteWriter};
use super::traits::FieldAccess;
use crate::core::{FieldDescriptor, FieldKind, FieldValue, PayloadSchema};
use crate::error::{DeserializationError, SerializationError};

/// Serializes `instance` into `buffer` following `schema`.
///
/// # Parameters
/// * `instance` – structure exposing its fields through [`FieldAccess`]
/// * `buffer` – output buffer, at least `schema.len()` bytes
/// * `schema` – static layout description
///
/// # Return value
/// Number of bytes written (always `schema.len()` on success).
pub fn serialize<T: FieldAccess>(
    instance: &T,
    buffer: &mut [u8],
    schema: &'static PayloadSchema,
) -> Result<usize, SerializationError> {
    let needed = schema.len();
    if buffer.len() < needed {
        return Err(SerializationError::BufferTooSmall {
            needed,
            available: buffer.len(),
        });
    }

    let mut writer = ByteWriter::new(&mut buffer[..needed]);

    for field_desc in schema.fields {
        let raw = match field_desc.kind {
            FieldKind::Constant(value) => value as i64,
            FieldKind::Unsigned | FieldKind::Signed => instance
                .field(field_desc.id)
                .ok_or(SerializationError::FieldNotFound {
                    field_id: field_desc.id,
                })?
                .as_i64(),
        };
        write_field(&mut writer, field_desc, raw)?;
    }

    Ok(writer.position())
}

/// Deserializes `payload` into `instance` following `schema`.
///
/// Marker bytes are checked against their constants; every other field is
/// handed to [`FieldAccess::field_mut`] as the narrowest matching
/// [`FieldValue`].
pub fn deserialize_into<T: FieldAccess>(
    instance: &mut T,
    payload: &[u8],
    schema: &'static PayloadSchema,
) -> Result<(), DeserializationError> {
    let expected = schema.len();
    if payload.len() != expected {
        return Err(DeserializationError::InvalidDataLength {
            expected,
            actual: payload.len(),
        });
    }

    let mut reader = ByteReader::new(payload);

    for field_desc in schema.fields {
        match field_desc.kind {
            FieldKind::Constant(value) => {
                let raw = reader
                    .read_be(field_desc.width)
                    .map_err(|err| DeserializationError::ByteReaderError { err })?;
                if raw != value {
                    return Err(DeserializationError::MarkerMismatch {
                        field_id: field_desc.id,
                    });
                }
            }
            FieldKind::Unsigned => {
                let raw = reader
                    .read_be(field_desc.width)
                    .map_err(|err| DeserializationError::ByteReaderError { err })?;
                let value = match field_desc.width {
                    1 => FieldValue::U8(raw as u8),
                    2 => FieldValue::U16(raw as u16),
                    _ => FieldValue::U32(raw),
                };
                assign(instance, field_desc, value)?;
            }
            FieldKind::Signed => {
                let raw = reader
                    .read_be_signed(field_desc.width)
                    .map_err(|err| DeserializationError::ByteReaderError { err })?;
                let value = match field_desc.width {
                    1 => FieldValue::I8(raw as i8),
                    2 => FieldValue::I16(raw as i16),
                    _ => FieldValue::I32(raw),
                };
                assign(instance, field_desc, value)?;
            }
        }
    }

    Ok(())
}

/// Read one field of an encoded payload and apply its resolution.
///
/// Returns `None` when the field is unknown, is a marker, or lies outside `payload`.
pub fn read_physical(payload: &[u8], schema: &'static PayloadSchema, id: &str) -> Option<f32> {
    let desc = schema.field(id)?;
    let offset = schema.offset_of(id)?;
    let bytes = payload.get(offset..offset + desc.width as usize)?;
    let mut reader = ByteReader::new(bytes);
    let raw = match desc.kind {
        FieldKind::Constant(_) => return None,
        FieldKind::Unsigned => reader.read_be(desc.width).ok()? as i64,
        FieldKind::Signed => reader.read_be_signed(desc.width).ok()? as i64,
    };
    Some(desc.physical(raw))
}

fn assign<T: FieldAccess>(
    instance: &mut T,
    field_desc: &'static FieldDescriptor,
    value: FieldValue,
) -> Result<(), DeserializationError> {
    instance
        .field_mut(field_desc.id, value)
        .ok_or(DeserializationError::FieldAssignmentFailed {
            desc: field_desc.id,
        })
}

/// Range-check `raw` against the field width and signedness, then write it.
fn write_field(
    writer: &mut ByteWriter,
    field_desc: &'static FieldDescriptor,
    raw: i64,
) -> Result<(), SerializationError> {
    if !(1..=4).contains(&field_desc.width) {
        return Err(SerializationError::InvalidFieldWidth {
            field_id: field_desc.id,
        });
    }

    let bits = field_desc.width as u32 * 8;
    let in_range = match field_desc.kind {
        FieldKind::Signed => {
            let min = -(1i64 << (bits - 1));
            let max = (1i64 << (bits - 1)) - 1;
            (min..=max).contains(&raw)
        }
        FieldKind::Unsigned | FieldKind::Constant(_) => (0..(1i64 << bits)).contains(&raw),
    };
    if !in_range {
        return Err(SerializationError::ValueOutOfRange {
            field_id: field_desc.id,
        });
    }

    // Two's complement truncation keeps the low `width` bytes of negative values.
    writer
        .write_be(raw as u32, field_desc.width)
        .map_err(|err| SerializationError::ByteWriterError { err })
}
