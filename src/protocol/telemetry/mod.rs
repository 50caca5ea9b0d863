//! In-memory telemetry state of the node.
//!
//! [`TelemetrySnapshot`] holds the latest raw register value of every field
//! the poller knows about, plus the received-downlink flag. Values stay raw
//! until [`TelemetrySnapshot::reading`] applies the field resolution; the
//! uplink carries them untouched.
pub mod environment;
pub mod schema;

use crate::core::{FieldValue, PayloadSchema};
use crate::error::SerializationError;
use crate::infra::codec::{engine, traits::FieldAccess};
use schema::RECEIVED_DOWNLINK_ID;

pub use environment::{EnvironmentReadings, GnssFix, TrackerLayout};

//==================================================================================SNAPSHOT_FIELD
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Every register-backed value a dialect can fill.
pub enum SnapshotField {
    PanelVoltage,
    PanelCurrent,
    PanelPower,
    BatteryVoltage,
    BatteryCurrent,
    BatteryPercent,
    BatteryCapacity,
    LoadVoltage,
    LoadCurrent,
    LoadPower,
    LoadStatus,
    ControllerTemperature,
    BatteryTemperature,
    ErrorStatus,
    ErrorStatus2,
}

impl SnapshotField {
    /// All fields, in declaration order.
    pub const ALL: [SnapshotField; 15] = [
        SnapshotField::PanelVoltage,
        SnapshotField::PanelCurrent,
        SnapshotField::PanelPower,
        SnapshotField::BatteryVoltage,
        SnapshotField::BatteryCurrent,
        SnapshotField::BatteryPercent,
        SnapshotField::BatteryCapacity,
        SnapshotField::LoadVoltage,
        SnapshotField::LoadCurrent,
        SnapshotField::LoadPower,
        SnapshotField::LoadStatus,
        SnapshotField::ControllerTemperature,
        SnapshotField::BatteryTemperature,
        SnapshotField::ErrorStatus,
        SnapshotField::ErrorStatus2,
    ];

    /// Identifier used by payload schemas.
    pub const fn id(self) -> &'static str {
        match self {
            SnapshotField::PanelVoltage => "PanelVoltage",
            SnapshotField::PanelCurrent => "PanelCurrent",
            SnapshotField::PanelPower => "PanelPower",
            SnapshotField::BatteryVoltage => "BatteryVoltage",
            SnapshotField::BatteryCurrent => "BatteryCurrent",
            SnapshotField::BatteryPercent => "BatteryPercent",
            SnapshotField::BatteryCapacity => "BatteryCapacity",
            SnapshotField::LoadVoltage => "LoadVoltage",
            SnapshotField::LoadCurrent => "LoadCurrent",
            SnapshotField::LoadPower => "LoadPower",
            SnapshotField::LoadStatus => "LoadStatus",
            SnapshotField::ControllerTemperature => "ControllerTemperature",
            SnapshotField::BatteryTemperature => "BatteryTemperature",
            SnapshotField::ErrorStatus => "ErrorStatus",
            SnapshotField::ErrorStatus2 => "ErrorStatus2",
        }
    }

    /// Human-readable name.
    pub const fn name(self) -> &'static str {
        match self {
            SnapshotField::PanelVoltage => "Panel voltage",
            SnapshotField::PanelCurrent => "Panel current",
            SnapshotField::PanelPower => "Panel power",
            SnapshotField::BatteryVoltage => "Battery voltage",
            SnapshotField::BatteryCurrent => "Battery current",
            SnapshotField::BatteryPercent => "Battery percent",
            SnapshotField::BatteryCapacity => "Battery capacity (SOC)",
            SnapshotField::LoadVoltage => "Load voltage",
            SnapshotField::LoadCurrent => "Load current",
            SnapshotField::LoadPower => "Load power",
            SnapshotField::LoadStatus => "Load status",
            SnapshotField::ControllerTemperature => "Controller temperature",
            SnapshotField::BatteryTemperature => "Battery temperature",
            SnapshotField::ErrorStatus => "Error status",
            SnapshotField::ErrorStatus2 => "Error status 2",
        }
    }

    /// Resolution of one raw count.
    pub const fn scale(self) -> f32 {
        match self {
            SnapshotField::PanelVoltage
            | SnapshotField::BatteryVoltage
            | SnapshotField::LoadVoltage => 0.1,
            SnapshotField::PanelCurrent
            | SnapshotField::BatteryCurrent
            | SnapshotField::LoadCurrent => 0.01,
            _ => 1.0,
        }
    }

    /// Physical unit, `None` for bit fields.
    pub const fn unit(self) -> Option<&'static str> {
        match self {
            SnapshotField::PanelVoltage
            | SnapshotField::BatteryVoltage
            | SnapshotField::LoadVoltage => Some("V"),
            SnapshotField::PanelCurrent
            | SnapshotField::BatteryCurrent
            | SnapshotField::LoadCurrent => Some("A"),
            SnapshotField::PanelPower | SnapshotField::LoadPower => Some("W"),
            SnapshotField::BatteryPercent | SnapshotField::BatteryCapacity => Some("%"),
            SnapshotField::ControllerTemperature | SnapshotField::BatteryTemperature => Some("C"),
            SnapshotField::LoadStatus
            | SnapshotField::ErrorStatus
            | SnapshotField::ErrorStatus2 => None,
        }
    }

    /// Reverse lookup of [`id`](Self::id).
    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|field| field.id() == id)
    }
}

//==================================================================================TELEMETRY_SNAPSHOT
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Latest raw values read from the controller.
pub struct TelemetrySnapshot {
    pub panel_voltage: u16,
    pub panel_current: u16,
    pub panel_power: u16,
    pub battery_voltage: u16,
    pub battery_current: u16,
    pub battery_percent: u16,
    pub battery_capacity: u16,
    pub load_voltage: u16,
    pub load_current: u16,
    pub load_power: u16,
    pub load_status: u16,
    pub controller_temperature: u16,
    pub battery_temperature: u16,
    pub error_status: u16,
    pub error_status_2: u16,
    /// A downlink was processed since the last controller frame left.
    pub received_downlink: bool,
}

impl TelemetrySnapshot {
    /// Zeroed snapshot, as at startup.
    pub const fn new() -> Self {
        Self {
            panel_voltage: 0,
            panel_current: 0,
            panel_power: 0,
            battery_voltage: 0,
            battery_current: 0,
            battery_percent: 0,
            battery_capacity: 0,
            load_voltage: 0,
            load_current: 0,
            load_power: 0,
            load_status: 0,
            controller_temperature: 0,
            battery_temperature: 0,
            error_status: 0,
            error_status_2: 0,
            received_downlink: false,
        }
    }

    /// Raw value of `field`.
    pub fn get(&self, field: SnapshotField) -> u16 {
        match field {
            SnapshotField::PanelVoltage => self.panel_voltage,
            SnapshotField::PanelCurrent => self.panel_current,
            SnapshotField::PanelPower => self.panel_power,
            SnapshotField::BatteryVoltage => self.battery_voltage,
            SnapshotField::BatteryCurrent => self.battery_current,
            SnapshotField::BatteryPercent => self.battery_percent,
            SnapshotField::BatteryCapacity => self.battery_capacity,
            SnapshotField::LoadVoltage => self.load_voltage,
            SnapshotField::LoadCurrent => self.load_current,
            SnapshotField::LoadPower => self.load_power,
            SnapshotField::LoadStatus => self.load_status,
            SnapshotField::ControllerTemperature => self.controller_temperature,
            SnapshotField::BatteryTemperature => self.battery_temperature,
            SnapshotField::ErrorStatus => self.error_status,
            SnapshotField::ErrorStatus2 => self.error_status_2,
        }
    }

    /// Overwrite the raw value of `field`.
    pub fn set(&mut self, field: SnapshotField, raw: u16) {
        let slot = match field {
            SnapshotField::PanelVoltage => &mut self.panel_voltage,
            SnapshotField::PanelCurrent => &mut self.panel_current,
            SnapshotField::PanelPower => &mut self.panel_power,
            SnapshotField::BatteryVoltage => &mut self.battery_voltage,
            SnapshotField::BatteryCurrent => &mut self.battery_current,
            SnapshotField::BatteryPercent => &mut self.battery_percent,
            SnapshotField::BatteryCapacity => &mut self.battery_capacity,
            SnapshotField::LoadVoltage => &mut self.load_voltage,
            SnapshotField::LoadCurrent => &mut self.load_current,
            SnapshotField::LoadPower => &mut self.load_power,
            SnapshotField::LoadStatus => &mut self.load_status,
            SnapshotField::ControllerTemperature => &mut self.controller_temperature,
            SnapshotField::BatteryTemperature => &mut self.battery_temperature,
            SnapshotField::ErrorStatus => &mut self.error_status,
            SnapshotField::ErrorStatus2 => &mut self.error_status_2,
        };
        *slot = raw;
    }

    /// Physical value of `field`.
    ///
    /// Temperatures are sign-magnitude bytes (bit 7 set means below zero).
    pub fn reading(&self, field: SnapshotField) -> f32 {
        let raw = self.get(field);
        match field {
            SnapshotField::ControllerTemperature | SnapshotField::BatteryTemperature => {
                let magnitude = (raw & 0x7F) as f32;
                if raw & 0x80 != 0 {
                    -magnitude
                } else {
                    magnitude
                }
            }
            _ => raw as f32 * field.scale(),
        }
    }

    /// Serialize into `buffer` with `schema`, then clear the received-downlink
    /// flag. The flag is kept when serialization fails.
    pub fn take_uplink(
        &mut self,
        schema: &'static PayloadSchema,
        buffer: &mut [u8],
    ) -> Result<usize, SerializationError> {
        let written = engine::serialize(&*self, buffer, schema)?;
        self.received_downlink = false;
        Ok(written)
    }
}

impl FieldAccess for TelemetrySnapshot {
    fn field(&self, id: &'static str) -> Option<FieldValue> {
        if id == RECEIVED_DOWNLINK_ID {
            return Some(FieldValue::U8(self.received_downlink as u8));
        }
        SnapshotField::from_id(id).map(|field| FieldValue::U16(self.get(field)))
    }

    fn field_mut(&mut self, id: &'static str, value: FieldValue) -> Option<()> {
        match value {
            FieldValue::U8(flag) if id == RECEIVED_DOWNLINK_ID => {
                self.received_downlink = flag != 0;
            }
            FieldValue::U16(raw) => self.set(SnapshotField::from_id(id)?, raw),
            _ => return None,
        }
        Some(())
    }
}
