//! Error definitions shared across library modules.
//! Each type models a specific failure scenario (frame validation, one polled
//! group, payload serialization/deserialization, cursor bounds).
//!
//! None of them is fatal for a node: the poller turns every `PollError` into a
//! retained field and moves on to the next group.
use thiserror_no_std::Error;

//==================================================================================FRAME_ERROR
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Reasons a response frame is discarded.
pub enum FrameError {
    /// Fewer bytes than the smallest valid frame for the request.
    #[error("Frame too short: {len} bytes")]
    TooShort { len: usize },
    /// Trailing CRC does not match the recomputed one.
    #[error("CRC mismatch: computed {computed:#06X}, received {received:#06X}")]
    CrcMismatch { computed: u16, received: u16 },
    /// Reply comes from another slave address.
    #[error("Unexpected slave address {found:#04X}, expected {expected:#04X}")]
    UnexpectedAddress { expected: u8, found: u8 },
    /// Reply carries another function code.
    #[error("Unexpected function code {found:#04X}, expected {expected:#04X}")]
    UnexpectedFunction { expected: u8, found: u8 },
    /// Slave answered with an exception (function | 0x80).
    #[error("Exception response, code {code}")]
    Exception { code: u8 },
    /// Byte-count field disagrees with the request.
    #[error("Byte count mismatch: declared {declared}, expected {expected}")]
    ByteCountMismatch { declared: usize, expected: usize },
    /// Frame length differs from the one implied by the request.
    #[error("Frame length {found}, expected {expected}")]
    LengthMismatch { expected: usize, found: usize },
    /// Write-single echo differs from the request.
    #[error("Write echo does not match the request")]
    EchoMismatch,
}

//==================================================================================POLL_ERROR
#[derive(Error, Debug)]
/// Failure of one register group round trip.
pub enum PollError<E: core::fmt::Debug> {
    /// No byte arrived within the timeout policy.
    #[error("No response within the timeout bound")]
    Timeout,
    /// Response was received but rejected by the codec.
    #[error("Invalid response frame: {0}")]
    Frame(#[from] FrameError),
    /// Serial channel refused the write or the read.
    #[error("Serial channel error: {0:?}")]
    Channel(E),
}

//================================================================================CODEC_ERROR

#[derive(Debug, Error)]
/// Issues encountered while serializing an instance into a payload buffer.
pub enum SerializationError {
    /// Provided buffer is too small for the payload.
    #[error("Buffer too small: need {needed}, have {available}")]
    BufferTooSmall { needed: usize, available: usize },
    /// Expected field was missing from the domain structure.
    #[error("Field {field_id} not found")]
    FieldNotFound { field_id: &'static str },
    /// Value does not fit in the field width.
    #[error("Value out of range for {field_id}")]
    ValueOutOfRange { field_id: &'static str },
    /// Descriptor declares an unsupported width.
    #[error("Invalid field width for {field_id}")]
    InvalidFieldWidth { field_id: &'static str },
    /// Byte-level write failed.
    #[error("ByteWriter error: {err}")]
    ByteWriterError { err: ByteWriterError },
}

#[derive(Error, Debug)]
/// Errors raised while deserializing a payload into a typed structure.
pub enum DeserializationError {
    /// Payload size does not match the schema.
    #[error("Invalid data length: expected {expected}, got {actual}")]
    InvalidDataLength { expected: usize, actual: usize },
    /// Marker byte differs from the schema constant.
    #[error("Marker mismatch for {field_id}")]
    MarkerMismatch { field_id: &'static str },
    /// Could not assign value into the target structure.
    #[error("Field assignment failed {desc}")]
    FieldAssignmentFailed { desc: &'static str },
    /// Byte-level read failed.
    #[error("ByteReader error: {err}")]
    ByteReaderError { err: ByteReaderError },
}

//==================================================================================BYTEREADER_ERRORS
#[derive(Debug, Error)]
/// Errors raised during big-endian buffer reads.
pub enum ByteReaderError {
    /// Attempted to read past the end of the buffer.
    #[error("Attempted to read out of bounds -> asked: {asked}, available: {available}")]
    OutOfBounds { asked: usize, available: usize },
    /// Requested width is outside 1..=4 bytes.
    #[error("Cannot read more than {max} bytes. Requested: {asked}")]
    TooLongForType { max: u8, asked: u8 },
}
//==================================================================================BYTEWRITER_ERRORS
#[derive(Debug, Error)]
/// Errors raised during big-endian buffer writes.
pub enum ByteWriterError {
    /// Attempted to write beyond the provided capacity.
    #[error("Attempted to write out of bounds -> asked: {asked}, available: {available}")]
    OutOfBounds { asked: usize, available: usize },
    /// Requested width is outside 1..=4 bytes.
    #[error("Cannot write more than {max} bytes. Requested: {asked}")]
    TooLongForType { max: u8, asked: u8 },
}
