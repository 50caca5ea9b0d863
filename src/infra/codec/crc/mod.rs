//! CRC-16/Modbus checksum used to terminate every RTU frame.
//!
//! Reflected polynomial `0xA001`, initial value `0xFFFF`, no final XOR. On the
//! wire the result is sent low byte first.
use crc::{Crc, CRC_16_MODBUS};

const MODBUS: Crc<u16> = Crc::<u16>::new(&CRC_16_MODBUS);

/// Compute the CRC over the whole slice.
#[inline]
pub const fn crc16(bytes: &[u8]) -> u16 {
    MODBUS.checksum(bytes)
}

/// CRC split in transmission order: `[low, high]`.
#[inline]
pub const fn crc16_bytes(bytes: &[u8]) -> [u8; 2] {
    let crc = crc16(bytes);
    [(crc & 0xFF) as u8, (crc >> 8) as u8]
}

/// Read the trailing CRC of a frame (low byte first).
/// Returns `None` when the frame cannot hold one.
#[inline]
pub fn trailing_crc(frame: &[u8]) -> Option<u16> {
    let len = frame.len();
    if len < 2 {
        return None;
    }
    Some(u16::from_le_bytes([frame[len - 2], frame[len - 1]]))
}
