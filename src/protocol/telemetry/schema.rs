//! Static uplink layouts.
//!
//! Controller frames carry raw register values; the decoding side applies the
//! resolutions declared here. Tracker frames follow the channel/type tagging
//! of the environment sensors (GNSS `0x01 0x88`, battery `0x08 0x02`,
//! humidity `0x07 0x68`, temperature `0x02 0x67`).
use super::SnapshotField;
use crate::core::{FieldDescriptor, FieldKind, PayloadSchema};

/// Identifier of the received-downlink byte closing every controller frame.
pub const RECEIVED_DOWNLINK_ID: &str = "ReceivedDownlink";

/// Controller frame channel tag.
pub const CONTROLLER_CHANNEL: u8 = 0x0C;
/// Type tag of the legacy (per-field) controller frame.
pub const CONTROLLER_LEGACY_TYPE: u8 = 0x02;
/// Type tag of the holding-block controller frame.
pub const CONTROLLER_BLOCK_TYPE: u8 = 0x03;

//==================================================================================DESCRIPTORS
const fn register(field: SnapshotField) -> FieldDescriptor {
    FieldDescriptor {
        id: field.id(),
        name: field.name(),
        kind: FieldKind::Unsigned,
        width: 2,
        scale: Some(field.scale()),
        unit: field.unit(),
    }
}

const RECEIVED_DOWNLINK: FieldDescriptor = FieldDescriptor {
    id: RECEIVED_DOWNLINK_ID,
    name: "Received downlink",
    kind: FieldKind::Unsigned,
    width: 1,
    scale: None,
    unit: None,
};

const LATITUDE: FieldDescriptor = FieldDescriptor {
    id: "Latitude",
    name: "GNSS latitude",
    kind: FieldKind::Signed,
    width: 3,
    scale: Some(0.0001),
    unit: Some("deg"),
};

const LONGITUDE: FieldDescriptor = FieldDescriptor {
    id: "Longitude",
    name: "GNSS longitude",
    kind: FieldKind::Signed,
    width: 3,
    scale: Some(0.0001),
    unit: Some("deg"),
};

const ALTITUDE: FieldDescriptor = FieldDescriptor {
    id: "Altitude",
    name: "GNSS altitude",
    kind: FieldKind::Signed,
    width: 3,
    scale: Some(0.01),
    unit: Some("m"),
};

const BATTERY_LEVEL: FieldDescriptor = FieldDescriptor {
    id: "BatteryLevel",
    name: "Node battery level",
    kind: FieldKind::Unsigned,
    width: 2,
    scale: Some(0.01),
    unit: Some("V"),
};

const HUMIDITY: FieldDescriptor = FieldDescriptor {
    id: "Humidity",
    name: "Relative humidity",
    kind: FieldKind::Unsigned,
    width: 1,
    scale: Some(0.5),
    unit: Some("%"),
};

const TEMPERATURE: FieldDescriptor = FieldDescriptor {
    id: "Temperature",
    name: "Ambient temperature",
    kind: FieldKind::Signed,
    width: 2,
    scale: Some(0.1),
    unit: Some("C"),
};

//==================================================================================CONTROLLER_SCHEMAS
/// Legacy dialect frame (25 bytes).
pub static CONTROLLER_LEGACY_SCHEMA: PayloadSchema = PayloadSchema {
    name: "controller_legacy",
    fields: &[
        FieldDescriptor::marker("Channel", CONTROLLER_CHANNEL),
        FieldDescriptor::marker("Type", CONTROLLER_LEGACY_TYPE),
        register(SnapshotField::PanelVoltage),
        register(SnapshotField::PanelCurrent),
        register(SnapshotField::PanelPower),
        register(SnapshotField::BatteryVoltage),
        register(SnapshotField::BatteryCurrent),
        register(SnapshotField::BatteryPercent),
        register(SnapshotField::LoadVoltage),
        register(SnapshotField::LoadCurrent),
        register(SnapshotField::LoadPower),
        register(SnapshotField::LoadStatus),
        register(SnapshotField::ErrorStatus),
        RECEIVED_DOWNLINK,
    ],
};

/// Holding-block dialect frame (29 bytes), fields in register order.
pub static CONTROLLER_BLOCK_SCHEMA: PayloadSchema = PayloadSchema {
    name: "controller_block",
    fields: &[
        FieldDescriptor::marker("Channel", CONTROLLER_CHANNEL),
        FieldDescriptor::marker("Type", CONTROLLER_BLOCK_TYPE),
        register(SnapshotField::BatteryCapacity),
        register(SnapshotField::BatteryVoltage),
        register(SnapshotField::BatteryCurrent),
        register(SnapshotField::ControllerTemperature),
        register(SnapshotField::BatteryTemperature),
        register(SnapshotField::LoadVoltage),
        register(SnapshotField::LoadCurrent),
        register(SnapshotField::LoadPower),
        register(SnapshotField::PanelVoltage),
        register(SnapshotField::PanelCurrent),
        register(SnapshotField::PanelPower),
        register(SnapshotField::ErrorStatus),
        register(SnapshotField::ErrorStatus2),
        RECEIVED_DOWNLINK,
    ],
};

//==================================================================================TRACKER_SCHEMAS
/// GNSS, battery and environment blocks (22 bytes).
pub static TRACKER_FULL_SCHEMA: PayloadSchema = PayloadSchema {
    name: "tracker_full",
    fields: &[
        FieldDescriptor::marker("GnssChannel", 0x01),
        FieldDescriptor::marker("GnssType", 0x88),
        LATITUDE,
        LONGITUDE,
        ALTITUDE,
        FieldDescriptor::marker("BatteryChannel", 0x08),
        FieldDescriptor::marker("BatteryType", 0x02),
        BATTERY_LEVEL,
        FieldDescriptor::marker("HumidityChannel", 0x07),
        FieldDescriptor::marker("HumidityType", 0x68),
        HUMIDITY,
        FieldDescriptor::marker("TemperatureChannel", 0x02),
        FieldDescriptor::marker("TemperatureType", 0x67),
        TEMPERATURE,
    ],
};

/// GNSS and battery blocks (15 bytes).
pub static TRACKER_GNSS_SCHEMA: PayloadSchema = PayloadSchema {
    name: "tracker_gnss",
    fields: &[
        FieldDescriptor::marker("GnssChannel", 0x01),
        FieldDescriptor::marker("GnssType", 0x88),
        LATITUDE,
        LONGITUDE,
        ALTITUDE,
        FieldDescriptor::marker("BatteryChannel", 0x08),
        FieldDescriptor::marker("BatteryType", 0x02),
        BATTERY_LEVEL,
    ],
};

/// Battery and environment blocks (11 bytes).
pub static TRACKER_ENVIRONMENT_SCHEMA: PayloadSchema = PayloadSchema {
    name: "tracker_environment",
    fields: &[
        FieldDescriptor::marker("BatteryChannel", 0x08),
        FieldDescriptor::marker("BatteryType", 0x02),
        BATTERY_LEVEL,
        FieldDescriptor::marker("HumidityChannel", 0x07),
        FieldDescriptor::marker("HumidityType", 0x68),
        HUMIDITY,
        FieldDescriptor::marker("TemperatureChannel", 0x02),
        FieldDescriptor::marker("TemperatureType", 0x67),
        TEMPERATURE,
    ],
};

/// Battery block only (4 bytes).
pub static TRACKER_BATTERY_SCHEMA: PayloadSchema = PayloadSchema {
    name: "tracker_battery",
    fields: &[
        FieldDescriptor::marker("BatteryChannel", 0x08),
        FieldDescriptor::marker("BatteryType", 0x02),
        BATTERY_LEVEL,
    ],
};
