//! Protocol components of the telemetry node: RTU framing, the bounded serial
//! transport, register polling, the telemetry snapshot and its payloads,
//! status decoding, and the periodic node scheduler.
pub mod node;
pub mod poller;
pub mod rtu;
pub mod status;
pub mod telemetry;
pub mod transport;
