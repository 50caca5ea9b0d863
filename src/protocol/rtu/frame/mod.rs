//! Request frame builder and response frame parser.
//!
//! # Request layout (8 bytes)
//!
//! ```text
//! [slave][function][reg_hi][reg_lo][operand_hi][operand_lo][crc_lo][crc_hi]
//! ```
//!
//! # Response layouts
//!
//! ```text
//! read  : [slave][0x03][byte_count][data …][crc_lo][crc_hi]
//! write : 8-byte echo of the request
//! error : [slave][function | 0x80][exception][crc_lo][crc_hi]
//! ```
use super::{FunctionCode, RegisterGroup, MIN_FRAME_LEN, REQUEST_FRAME_LEN};
use crate::error::FrameError;
use crate::infra::codec::crc::{crc16, crc16_bytes, trailing_crc};

/// Offset of the first data byte in a read response.
pub const READ_DATA_OFFSET: usize = 3;

//==================================================================================REQUEST_FRAME
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Complete request, CRC included.
pub struct RequestFrame(pub [u8; REQUEST_FRAME_LEN]);

impl RequestFrame {
    /// Raw bytes, ready to write on the channel.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Slave address the request targets.
    #[inline]
    pub fn slave(&self) -> u8 {
        self.0[0]
    }

    /// Function code byte.
    #[inline]
    pub fn function(&self) -> u8 {
        self.0[1]
    }
}

/// Assemble the six header bytes for `group` and append CRC low then high.
pub const fn build_request(slave: u8, group: &RegisterGroup) -> RequestFrame {
    let [reg_hi, reg_lo] = group.address.to_be_bytes();
    let [op_hi, op_lo] = group.operand().to_be_bytes();
    let header = [slave, group.function().code(), reg_hi, reg_lo, op_hi, op_lo];
    let [crc_lo, crc_hi] = crc16_bytes(&header);

    RequestFrame([
        header[0], header[1], header[2], header[3], header[4], header[5], crc_lo, crc_hi,
    ])
}

/// Recompute the CRC over everything but the trailing two bytes and compare.
///
/// Returns `false` on mismatch or when the slice is too short to hold a CRC
/// and at least one covered byte.
pub fn verify(bytes: &[u8]) -> bool {
    check_crc(bytes).is_ok()
}

fn check_crc(bytes: &[u8]) -> Result<(), FrameError> {
    if bytes.len() < 3 {
        return Err(FrameError::TooShort { len: bytes.len() });
    }
    let received = trailing_crc(bytes).ok_or(FrameError::TooShort { len: bytes.len() })?;
    let computed = crc16(&bytes[..bytes.len() - 2]);
    if computed != received {
        return Err(FrameError::CrcMismatch { computed, received });
    }
    Ok(())
}

//==================================================================================RESPONSE_FRAME
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// Validated response, borrowing the receive buffer.
pub struct ResponseFrame<'a> {
    /// Whole frame, CRC included.
    raw: &'a [u8],
    /// Payload: register bytes for reads, address + value for write echoes.
    data: &'a [u8],
}

impl<'a> ResponseFrame<'a> {
    /// Whole frame as received.
    pub fn raw(&self) -> &'a [u8] {
        self.raw
    }

    /// Data section without header and CRC.
    pub fn data(&self) -> &'a [u8] {
        self.data
    }

    /// Big-endian 16-bit registers carried by a read response.
    pub fn registers(&self) -> impl Iterator<Item = u16> + 'a {
        self.data
            .chunks_exact(2)
            .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
    }

    /// Register at `index` in a read response.
    pub fn register(&self, index: usize) -> Option<u16> {
        let pair = self.data.get(index * 2..index * 2 + 2)?;
        Some(u16::from_be_bytes([pair[0], pair[1]]))
    }
}

/// Validate `bytes` as the answer to `group` sent to `slave`.
///
/// Checks, in order: minimum length, CRC, slave address, exception flag,
/// function code, then the exact length implied by the request (byte count
/// for reads, full echo for writes).
pub fn parse_response<'a>(
    bytes: &'a [u8],
    slave: u8,
    group: &RegisterGroup,
) -> Result<ResponseFrame<'a>, FrameError> {
    if bytes.len() < MIN_FRAME_LEN {
        return Err(FrameError::TooShort { len: bytes.len() });
    }
    check_crc(bytes)?;

    if bytes[0] != slave {
        return Err(FrameError::UnexpectedAddress {
            expected: slave,
            found: bytes[0],
        });
    }

    let function = group.function();
    if bytes[1] == function.exception_code() {
        return Err(FrameError::Exception { code: bytes[2] });
    }
    if bytes[1] != function.code() {
        return Err(FrameError::UnexpectedFunction {
            expected: function.code(),
            found: bytes[1],
        });
    }

    if function == FunctionCode::ReadHoldingRegisters {
        let declared = bytes[2] as usize;
        let expected = group.register_count() * 2;
        if declared != expected {
            return Err(FrameError::ByteCountMismatch { declared, expected });
        }
    }

    let expected_len = group.expected_response_len();
    if bytes.len() != expected_len {
        return Err(FrameError::LengthMismatch {
            expected: expected_len,
            found: bytes.len(),
        });
    }

    let data = match function {
        FunctionCode::ReadHoldingRegisters => &bytes[READ_DATA_OFFSET..expected_len - 2],
        FunctionCode::WriteSingleRegister => {
            if bytes != build_request(slave, group).as_bytes() {
                return Err(FrameError::EchoMismatch);
            }
            &bytes[2..6]
        }
    };
    Ok(ResponseFrame { raw: bytes, data })
}

/// Legacy single-value decode: the register sits at offsets 3 and 4, MSB first.
pub fn value_at_fixed_offset(bytes: &[u8]) -> Option<u16> {
    let pair = bytes.get(READ_DATA_OFFSET..READ_DATA_OFFSET + 2)?;
    Some(u16::from_be_bytes([pair[0], pair[1]]))
}
