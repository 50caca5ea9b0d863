//! Deployment configuration of a telemetry node.
//!
//! Every field has a default matching the stock hardware, so firmware usually
//! starts from [`NodeConfig::default`] and overrides a few values with the
//! builder-style setters. With the `serde` feature, hosts can load the same
//! structure from JSON or YAML; missing fields fall back to their defaults.
use crate::protocol::poller::dialect::DialectKind;
use crate::protocol::telemetry::TrackerLayout;
use crate::protocol::transport::TimeoutPolicy;

/// Broadcast-style address the controllers answer on out of the box.
pub const DEFAULT_SLAVE_ADDRESS: u8 = 0xFF;
/// Fifteen minutes between two uplinks.
pub const DEFAULT_SEND_INTERVAL_MS: u32 = 900_000;
/// Radio port carrying remote commands.
pub const DEFAULT_COMMAND_PORT: u8 = 2;
/// Consecutive unacknowledged uplinks before a reset is requested.
pub const DEFAULT_MAX_SEND_FAILURES: u8 = 10;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct NodeConfig {
    /// Modbus slave address of the charge controller.
    pub slave_address: u8,
    /// Register map spoken by the controller.
    pub dialect: DialectKind,
    /// Response wait bound of the transport session.
    pub timeout: TimeoutPolicy,
    /// Optional blocks of the tracker frame.
    pub tracker: TrackerLayout,
    /// Period of the uplink tick.
    pub send_interval_ms: u32,
    /// Downlinks on other ports are ignored.
    pub command_port: u8,
    /// Threshold of the send-failure counter.
    pub max_send_failures: u8,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            slave_address: DEFAULT_SLAVE_ADDRESS,
            dialect: DialectKind::default(),
            timeout: TimeoutPolicy::default(),
            tracker: TrackerLayout::default(),
            send_interval_ms: DEFAULT_SEND_INTERVAL_MS,
            command_port: DEFAULT_COMMAND_PORT,
            max_send_failures: DEFAULT_MAX_SEND_FAILURES,
        }
    }
}

impl NodeConfig {
    pub fn with_slave_address(mut self, address: u8) -> Self {
        self.slave_address = address;
        self
    }

    pub fn with_dialect(mut self, dialect: DialectKind) -> Self {
        self.dialect = dialect;
        self
    }

    pub fn with_timeout(mut self, timeout: TimeoutPolicy) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_tracker(mut self, tracker: TrackerLayout) -> Self {
        self.tracker = tracker;
        self
    }

    pub fn with_send_interval_ms(mut self, interval: u32) -> Self {
        self.send_interval_ms = interval;
        self
    }

    pub fn with_command_port(mut self, port: u8) -> Self {
        self.command_port = port;
        self
    }

    /// A threshold of 0 is raised to 1.
    pub fn with_max_send_failures(mut self, max: u8) -> Self {
        self.max_send_failures = max.max(1);
        self
    }
}
