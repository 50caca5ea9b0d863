//! Protocol-agnostic building blocks: checksums, byte cursors, and the
//! schema-driven payload engine.
pub mod codec;
