//! Half-duplex serial transport: channel and timer abstractions plus the
//! session that runs one bounded request/response exchange at a time.
//!
//! ## Timing Constants
//!
//! The defaults below reproduce the behaviour expected by the charge
//! controllers this crate targets. They can be overridden per deployment
//! through [`TimeoutPolicy`] (see [`crate::config::NodeConfig`]).

pub mod session;
pub mod traits;

/// Line speed the controllers ship with (8N1).
///
/// The channel implementation configures the UART; the value is exposed so
/// hosts and HAL glue share one constant.
pub const DEFAULT_BAUD_RATE: u32 = 9600;

/// Number of times the session checks for a first response byte (default).
///
/// At 9600 baud one byte takes ~1.04 ms on the wire. A 25-byte block reply
/// needs ~26 ms once the controller starts answering, but the session only
/// waits for the *first* byte; the rest is drained as it arrives.
pub const DEFAULT_MAX_CHECKS: u8 = 10;

/// Sleep between two availability checks (ms).
///
/// # Recommended Values
///
/// - **5 ms**: Default, 50 ms total bound with [`DEFAULT_MAX_CHECKS`].
/// - **10 ms**: Slow controllers or long RS-485 runs.
pub const DEFAULT_CHECK_INTERVAL_MS: u32 = 5;

//==================================================================================TIMEOUT_POLICY
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
/// Bound on how long the session waits for the first response byte.
pub struct TimeoutPolicy {
    /// Number of availability checks before giving up.
    pub max_checks: u8,
    /// Sleep between two checks, in milliseconds.
    pub check_interval_ms: u32,
}

impl Default for TimeoutPolicy {
    fn default() -> Self {
        Self {
            max_checks: DEFAULT_MAX_CHECKS,
            check_interval_ms: DEFAULT_CHECK_INTERVAL_MS,
        }
    }
}

impl TimeoutPolicy {
    /// Worst-case wait before a timeout is declared (ms).
    pub const fn bound_ms(&self) -> u32 {
        self.max_checks as u32 * self.check_interval_ms
    }
}
