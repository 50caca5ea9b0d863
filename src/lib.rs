//! `rtu-telemetry` library: the pieces a periodic LPWAN telemetry node needs
//! to poll a solar charge controller over a half-duplex Modbus RTU link and
//! to pack its readings into byte-exact uplink payloads, in a `no_std`
//! environment. The crate exposes the infrastructure modules (CRC, byte
//! cursors, schema-driven packer), the protocol logic (RTU framing, bounded
//! transport, register polling, status decoding, node scheduling), and the
//! deployment configuration.
#![no_std]
//==================================================================================
/// Shared data types: payload schema descriptors, field values, byte buffers.
pub mod core;
/// Deployment configuration (slave address, dialect, timings, payload layout).
pub mod config;
/// Codec, transport, and polling errors.
pub mod error;
/// Checksums, byte cursors, and the schema-driven packing engine.
pub mod infra;
/// RTU framing, transport session, register poller, telemetry snapshot,
/// status decoding, and the node scheduler.
pub mod protocol;
//==================================================================================
