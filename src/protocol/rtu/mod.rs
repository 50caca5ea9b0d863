//! Modbus-style RTU request/response framing for the charge controller link:
//! register group definitions, request frame construction, CRC validation and
//! response parsing.
pub mod frame;

/// Smallest frame that can carry a CRC and a function code (exception reply).
pub const MIN_FRAME_LEN: usize = 5;

/// Length of every request this crate emits.
pub const REQUEST_FRAME_LEN: usize = 8;

//==================================================================================FUNCTION_CODE
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Function codes used on the controller link.
pub enum FunctionCode {
    /// Read one or more 16-bit holding registers.
    ReadHoldingRegisters = 0x03,
    /// Write one 16-bit holding register; the slave echoes the request.
    WriteSingleRegister = 0x06,
}

impl FunctionCode {
    /// Raw wire value.
    #[inline]
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Function code a slave answers with when it rejects the request.
    #[inline]
    pub const fn exception_code(self) -> u8 {
        self as u8 | 0x80
    }
}

//==================================================================================REGISTER_GROUP
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Read or write, with the operand the request carries.
pub enum GroupKind {
    /// Read `count` consecutive registers.
    ReadHolding { count: u16 },
    /// Write `value` into a single register.
    WriteSingle { value: u16 },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Named, immutable request definition. Dialects declare their groups as
/// `'static` tables.
pub struct RegisterGroup {
    /// Diagnostic label.
    pub name: &'static str,
    /// First register addressed by the request.
    pub address: u16,
    /// Read count or written value.
    pub kind: GroupKind,
}

impl RegisterGroup {
    /// Read `count` holding registers starting at `address`.
    pub const fn read(name: &'static str, address: u16, count: u16) -> Self {
        Self {
            name,
            address,
            kind: GroupKind::ReadHolding { count },
        }
    }

    /// Write `value` into the register at `address`.
    pub const fn write(name: &'static str, address: u16, value: u16) -> Self {
        Self {
            name,
            address,
            kind: GroupKind::WriteSingle { value },
        }
    }

    /// Function code carried by the request.
    pub const fn function(&self) -> FunctionCode {
        match self.kind {
            GroupKind::ReadHolding { .. } => FunctionCode::ReadHoldingRegisters,
            GroupKind::WriteSingle { .. } => FunctionCode::WriteSingleRegister,
        }
    }

    /// Second operand of the request (register count or value).
    pub const fn operand(&self) -> u16 {
        match self.kind {
            GroupKind::ReadHolding { count } => count,
            GroupKind::WriteSingle { value } => value,
        }
    }

    /// Number of registers a successful read returns (0 for writes).
    pub const fn register_count(&self) -> usize {
        match self.kind {
            GroupKind::ReadHolding { count } => count as usize,
            GroupKind::WriteSingle { .. } => 0,
        }
    }

    /// Exact byte length of a successful response.
    ///
    /// Reads: address, function, byte count, `2 × count` data bytes, CRC.
    /// Writes: the 8-byte echo of the request.
    pub const fn expected_response_len(&self) -> usize {
        match self.kind {
            GroupKind::ReadHolding { count } => 5 + 2 * count as usize,
            GroupKind::WriteSingle { .. } => REQUEST_FRAME_LEN,
        }
    }
}
