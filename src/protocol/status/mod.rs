//! Decoding of the controller's status words.
//!
//! - [`ErrorCategory`]: fault code reported in the error status register.
//! - [`LoadStatus`]: load switch, street-light brightness and charging state
//!   packed in register `0x0120`.
use core::fmt;

//==================================================================================ERROR_CATEGORY
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Fault reported by the controller.
pub enum ErrorCategory {
    NoError,
    BatteryOverDischarged,
    BatteryOverVoltage,
    LoadShortCircuit,
    LoadOverloaded,
    ControllerOverTemperature,
    PvInputOverCurrent,
    PvOverVoltage,
    PvReversePolarity,
    BatteryReversePolarity,
    /// Reserved code or code outside the table.
    Unknown,
}

/// Fault codes indexed by value; `None` marks reserved slots.
const ERROR_TABLE: [Option<ErrorCategory>; 15] = [
    Some(ErrorCategory::NoError),
    Some(ErrorCategory::BatteryOverDischarged),
    Some(ErrorCategory::BatteryOverVoltage),
    None,
    Some(ErrorCategory::LoadShortCircuit),
    Some(ErrorCategory::LoadOverloaded),
    Some(ErrorCategory::ControllerOverTemperature),
    None,
    Some(ErrorCategory::PvInputOverCurrent),
    None,
    Some(ErrorCategory::PvOverVoltage),
    None,
    None,
    Some(ErrorCategory::PvReversePolarity),
    Some(ErrorCategory::BatteryReversePolarity),
];

impl ErrorCategory {
    /// Map a status code to its category. Reserved codes and codes above 14
    /// are [`ErrorCategory::Unknown`].
    pub fn decode(code: u16) -> Self {
        ERROR_TABLE
            .get(code as usize)
            .copied()
            .flatten()
            .unwrap_or(ErrorCategory::Unknown)
    }

    /// Human-readable description.
    pub const fn as_str(self) -> &'static str {
        match self {
            ErrorCategory::NoError => "No error detected",
            ErrorCategory::BatteryOverDischarged => "Battery over-discharged",
            ErrorCategory::BatteryOverVoltage => "Battery over-voltage",
            ErrorCategory::LoadShortCircuit => "Load short circuit",
            ErrorCategory::LoadOverloaded => "Load overloaded",
            ErrorCategory::ControllerOverTemperature => "Controller over-temperature",
            ErrorCategory::PvInputOverCurrent => "PV input over-current",
            ErrorCategory::PvOverVoltage => "PV over-voltage",
            ErrorCategory::PvReversePolarity => "PV reverse polarity",
            ErrorCategory::BatteryReversePolarity => "Battery reverse polarity",
            ErrorCategory::Unknown => "Unknown error",
        }
    }

    /// `true` for anything but [`ErrorCategory::NoError`].
    pub const fn is_fault(self) -> bool {
        !matches!(self, ErrorCategory::NoError)
    }
}

/// Free-function form of [`ErrorCategory::decode`].
pub fn decode(code: u16) -> ErrorCategory {
    ErrorCategory::decode(code)
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

//==================================================================================LOAD_STATUS
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Charging stage, low byte of the load status register.
pub enum ChargingState {
    Deactivated,
    Activated,
    Mppt,
    Equalizing,
    Boost,
    Floating,
    CurrentLimiting,
    Unknown(u8),
}

impl From<u8> for ChargingState {
    fn from(raw: u8) -> Self {
        match raw {
            0 => ChargingState::Deactivated,
            1 => ChargingState::Activated,
            2 => ChargingState::Mppt,
            3 => ChargingState::Equalizing,
            4 => ChargingState::Boost,
            5 => ChargingState::Floating,
            6 => ChargingState::CurrentLimiting,
            other => ChargingState::Unknown(other),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Decoded load status register.
pub struct LoadStatus {
    /// Load output switched on (bit 15).
    pub load_on: bool,
    /// Street-light brightness, 0 to 100 % (bits 8 to 14).
    pub brightness: u8,
    /// Charging stage (bits 0 to 7).
    pub charging: ChargingState,
}

impl LoadStatus {
    /// Split the raw register into its parts.
    pub fn from_raw(word: u16) -> Self {
        Self {
            load_on: word & 0x8000 != 0,
            brightness: ((word >> 8) & 0x7F) as u8,
            charging: ChargingState::from((word & 0x00FF) as u8),
        }
    }
}
