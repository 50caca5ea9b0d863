//! Abstraction traits used by the transport layer (serial channel and timer).
pub mod rtu_timer;
pub mod serial_channel;
