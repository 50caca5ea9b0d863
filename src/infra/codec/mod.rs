//! Codec layer: CRC-16/Modbus, big-endian byte cursors, the generic packer
//! and the traits that connect typed structures to it.
pub mod bytes;
pub mod crc;
pub mod engine;
pub mod traits;
