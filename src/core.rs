//! Defines the "data contract" between the static payload schemas and the
//! packing engine.
//!
//! Schemas (`protocol::telemetry::schema`) are `'static` descriptor tables that
//! implement this contract. The `engine` module consumes them to build or parse
//! fixed-layout uplink payloads.

/// Largest response accepted from the serial channel. A full 10-register block
/// reply is 25 bytes; anything longer is drained and dropped.
pub const MAX_RESPONSE_BYTES: usize = 64;

/// Largest uplink payload any schema may describe.
pub const MAX_PAYLOAD_BYTES: usize = 51;

/// Semantic type of a field within a payload.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum FieldKind {
    /// Fixed marker bytes (channel/type tags). The value is part of the schema,
    /// never read from the instance.
    Constant(u32),
    /// Unsigned integer, big-endian.
    Unsigned,
    /// Two's complement signed integer, big-endian.
    Signed,
}

/// Descriptor for a single payload field.
#[derive(Debug)]
pub struct FieldDescriptor {
    /// 1. Field identifier, resolved through `FieldAccess`.
    pub id: &'static str,
    /// 2. Human-readable name.
    pub name: &'static str,
    /// 3. Semantic type for the field.
    pub kind: FieldKind,
    /// 4. Width in bytes (1 to 4).
    pub width: u8,
    /// 5. Resolution factor turning the raw value into physical units.
    pub scale: Option<f32>,
    /// 6. Physical unit (e.g. "V", "A", "%").
    pub unit: Option<&'static str>,
}

impl FieldDescriptor {
    /// Marker field carrying a constant tag.
    pub const fn marker(id: &'static str, value: u8) -> Self {
        Self {
            id,
            name: id,
            kind: FieldKind::Constant(value as u32),
            width: 1,
            scale: None,
            unit: None,
        }
    }

    /// Apply the declared resolution to a raw value.
    pub fn physical(&self, raw: i64) -> f32 {
        match self.scale {
            Some(scale) => raw as f32 * scale,
            None => raw as f32,
        }
    }
}

/// Descriptor for an entire fixed-layout payload.
#[derive(Debug)]
pub struct PayloadSchema {
    /// 1. Layout name (diagnostics).
    pub name: &'static str,
    /// 2. Ordered list of field descriptors.
    pub fields: &'static [FieldDescriptor],
}

impl PayloadSchema {
    /// Total encoded length in bytes.
    pub const fn len(&self) -> usize {
        let mut total = 0;
        let mut idx = 0;
        while idx < self.fields.len() {
            total += self.fields[idx].width as usize;
            idx += 1;
        }
        total
    }

    /// Checks whether the schema describes no bytes at all.
    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Look up a field descriptor by identifier.
    pub fn field(&self, id: &str) -> Option<&'static FieldDescriptor> {
        self.fields.iter().find(|desc| desc.id == id)
    }

    /// Byte offset of a field inside the encoded payload.
    pub fn offset_of(&self, id: &str) -> Option<usize> {
        let mut offset = 0;
        for desc in self.fields {
            if desc.id == id {
                return Some(offset);
            }
            offset += desc.width as usize;
        }
        None
    }
}

/// Bytes collected from the serial channel during one exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResponseBuffer {
    pub len: usize,
    pub data: [u8; MAX_RESPONSE_BYTES],
}

impl Default for ResponseBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl ResponseBuffer {
    /// Create an empty buffer.
    pub const fn new() -> Self {
        Self {
            len: 0,
            data: [0; MAX_RESPONSE_BYTES],
        }
    }

    /// Number of valid bytes stored.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Checks whether the buffer is empty (nothing answered).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Append one byte. Returns `false` once the buffer is full.
    #[inline]
    pub fn push(&mut self, byte: u8) -> bool {
        if self.len >= MAX_RESPONSE_BYTES {
            return false;
        }
        self.data[self.len] = byte;
        self.len += 1;
        true
    }

    /// Copy bytes into the buffer and update `len`.
    #[inline]
    pub fn copy_from_slice(&mut self, slice: &[u8]) {
        let clamped = slice.len().min(MAX_RESPONSE_BYTES);
        self.data[..clamped].copy_from_slice(&slice[..clamped]);
        self.len = clamped;
    }

    /// Immutable view over the populated bytes.
    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        &self.data[..self.len]
    }
}

/// Dynamic value exchanged between schema-driven code and typed structures.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FieldValue {
    U32(u32),
    U16(u16),
    U8(u8),
    I32(i32),
    I16(i16),
    I8(i8),
}

impl FieldValue {
    /// Widen to `i64` for range checks and scaling.
    pub fn as_i64(&self) -> i64 {
        match *self {
            FieldValue::U32(v) => v as i64,
            FieldValue::U16(v) => v as i64,
            FieldValue::U8(v) => v as i64,
            FieldValue::I32(v) => v as i64,
            FieldValue::I16(v) => v as i64,
            FieldValue::I8(v) => v as i64,
        }
    }
}
