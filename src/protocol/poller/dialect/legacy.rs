//! Legacy command set: one single-register read per field. The value is taken
//! from offsets 3 and 4 of the reply.
use super::Dialect;
use crate::core::PayloadSchema;
use crate::protocol::rtu::{
    frame::{value_at_fixed_offset, ResponseFrame},
    RegisterGroup,
};
use crate::protocol::telemetry::{
    schema::CONTROLLER_LEGACY_SCHEMA, SnapshotField, TelemetrySnapshot,
};

/// Poll order of the legacy command set.
pub static LEGACY_GROUPS: [RegisterGroup; 11] = [
    RegisterGroup::read("panel_voltage", 0x0107, 1),
    RegisterGroup::read("panel_current", 0x0108, 1),
    RegisterGroup::read("panel_power", 0x0109, 1),
    RegisterGroup::read("battery_voltage", 0x0101, 1),
    RegisterGroup::read("battery_current", 0x0102, 1),
    RegisterGroup::read("battery_percent", 0x0100, 1),
    RegisterGroup::read("load_voltage", 0x0104, 1),
    RegisterGroup::read("load_current", 0x0105, 1),
    RegisterGroup::read("load_power", 0x0106, 1),
    RegisterGroup::read("load_status", 0x0120, 1),
    // Two registers are requested; only the first word is kept.
    RegisterGroup::read("error_status", 0x0121, 2),
];

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LegacyDialect;

impl LegacyDialect {
    /// Snapshot field filled by the group reading `address`.
    pub const fn target(address: u16) -> Option<SnapshotField> {
        match address {
            0x0107 => Some(SnapshotField::PanelVoltage),
            0x0108 => Some(SnapshotField::PanelCurrent),
            0x0109 => Some(SnapshotField::PanelPower),
            0x0101 => Some(SnapshotField::BatteryVoltage),
            0x0102 => Some(SnapshotField::BatteryCurrent),
            0x0100 => Some(SnapshotField::BatteryPercent),
            0x0104 => Some(SnapshotField::LoadVoltage),
            0x0105 => Some(SnapshotField::LoadCurrent),
            0x0106 => Some(SnapshotField::LoadPower),
            0x0120 => Some(SnapshotField::LoadStatus),
            0x0121 => Some(SnapshotField::ErrorStatus),
            _ => None,
        }
    }
}

impl Dialect for LegacyDialect {
    fn groups(&self) -> &'static [RegisterGroup] {
        &LEGACY_GROUPS
    }

    fn apply(
        &self,
        group: &RegisterGroup,
        response: &ResponseFrame<'_>,
        snapshot: &mut TelemetrySnapshot,
    ) {
        let Some(field) = Self::target(group.address) else {
            return;
        };
        if let Some(value) = value_at_fixed_offset(response.raw()) {
            snapshot.set(field, value);
        }
    }

    fn uplink_schema(&self) -> &'static PayloadSchema {
        &CONTROLLER_LEGACY_SCHEMA
    }
}
