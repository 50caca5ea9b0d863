//! Big-endian byte cursors used by the payload engine and the RTU decoders.
//! Uplink fields and Modbus registers are always byte aligned and sent MSB
//! first, so the cursors work in whole bytes (1 to 4 per access).
use crate::error::{ByteReaderError, ByteWriterError};

/// Reader extracting big-endian integers from a `&[u8]` without copies.
pub struct ByteReader<'a> {
    /// Shared source buffer.
    buffer: &'a [u8],
    /// Number of bytes consumed so far.
    cursor: usize,
}

impl<'a> ByteReader<'a> {
    /// Create a reader positioned at the start of the provided buffer.
    pub fn new(buffer: &'a [u8]) -> Self {
        Self { buffer, cursor: 0 }
    }

    /// Read `width` bytes (1 to 4) as an unsigned big-endian integer.
    pub fn read_be(&mut self, width: u8) -> Result<u32, ByteReaderError> {
        if !(1..=4).contains(&width) {
            return Err(ByteReaderError::TooLongForType {
                max: 4,
                asked: width,
            });
        }
        let end = self.cursor + width as usize;
        if end > self.buffer.len() {
            return Err(ByteReaderError::OutOfBounds {
                asked: width as usize,
                available: self.remaining(),
            });
        }

        let value = self.buffer[self.cursor..end]
            .iter()
            .fold(0u32, |acc, &byte| (acc << 8) | byte as u32);
        self.cursor = end;
        Ok(value)
    }

    /// Read `width` bytes as a two's complement signed integer.
    pub fn read_be_signed(&mut self, width: u8) -> Result<i32, ByteReaderError> {
        let raw = self.read_be(width)?;
        Ok(sign_extend(raw, width))
    }

    /// Read one 16-bit register.
    pub fn read_u16(&mut self) -> Result<u16, ByteReaderError> {
        self.read_be(2).map(|val| val as u16)
    }

    /// Read one byte.
    pub fn read_u8(&mut self) -> Result<u8, ByteReaderError> {
        self.read_be(1).map(|val| val as u8)
    }

    /// Skip `len` bytes.
    pub fn advance(&mut self, len: usize) -> Result<(), ByteReaderError> {
        if self.cursor + len > self.buffer.len() {
            return Err(ByteReaderError::OutOfBounds {
                asked: len,
                available: self.remaining(),
            });
        }
        self.cursor += len;
        Ok(())
    }

    /// Bytes left to read.
    pub fn remaining(&self) -> usize {
        self.buffer.len() - self.cursor
    }

    /// Current read position.
    pub fn position(&self) -> usize {
        self.cursor
    }
}

/// Writer packing big-endian integers into a caller-provided buffer.
pub struct ByteWriter<'a> {
    buffer: &'a mut [u8],
    cursor: usize,
}

impl<'a> ByteWriter<'a> {
    /// Create a writer positioned at the start of `buffer`.
    pub fn new(buffer: &'a mut [u8]) -> Self {
        Self { buffer, cursor: 0 }
    }

    /// Write the low `width` bytes (1 to 4) of `value`, MSB first.
    pub fn write_be(&mut self, value: u32, width: u8) -> Result<(), ByteWriterError> {
        if !(1..=4).contains(&width) {
            return Err(ByteWriterError::TooLongForType {
                max: 4,
                asked: width,
            });
        }
        let end = self.cursor + width as usize;
        if end > self.buffer.len() {
            return Err(ByteWriterError::OutOfBounds {
                asked: width as usize,
                available: self.buffer.len() - self.cursor,
            });
        }

        let bytes = value.to_be_bytes();
        self.buffer[self.cursor..end].copy_from_slice(&bytes[4 - width as usize..]);
        self.cursor = end;
        Ok(())
    }

    /// Write one 16-bit register.
    pub fn write_u16(&mut self, value: u16) -> Result<(), ByteWriterError> {
        self.write_be(value as u32, 2)
    }

    /// Write one byte.
    pub fn write_u8(&mut self, value: u8) -> Result<(), ByteWriterError> {
        self.write_be(value as u32, 1)
    }

    /// Number of bytes written so far.
    pub fn position(&self) -> usize {
        self.cursor
    }
}

/// Sign-extend the low `width` bytes of `raw`.
#[inline]
pub fn sign_extend(raw: u32, width: u8) -> i32 {
    let shift = 32 - (width as u32 * 8);
    ((raw << shift) as i32) >> shift
}
