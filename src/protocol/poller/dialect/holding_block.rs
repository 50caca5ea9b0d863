//! Standard holding-register map: one 10-register block starting at `0x0100`
//! and the two error status words at `0x0121`.
use super::Dialect;
use crate::core::PayloadSchema;
use crate::protocol::rtu::{frame::ResponseFrame, RegisterGroup};
use crate::protocol::telemetry::{
    schema::CONTROLLER_BLOCK_SCHEMA, SnapshotField, TelemetrySnapshot,
};

/// Main data block start address.
pub const DATA_BLOCK_ADDRESS: u16 = 0x0100;
/// Error status words start address.
pub const ERROR_BLOCK_ADDRESS: u16 = 0x0121;

/// Poll order of the holding-block dialect.
pub static HOLDING_BLOCK_GROUPS: [RegisterGroup; 2] = [
    RegisterGroup::read("data_block", DATA_BLOCK_ADDRESS, 10),
    RegisterGroup::read("error_block", ERROR_BLOCK_ADDRESS, 2),
];

/// Where one register of a block lands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Slot {
    Word(SnapshotField),
    /// High byte and low byte go to two fields.
    Split {
        high: SnapshotField,
        low: SnapshotField,
    },
}

const DATA_BLOCK_SLOTS: [Slot; 10] = [
    Slot::Word(SnapshotField::BatteryCapacity),
    Slot::Word(SnapshotField::BatteryVoltage),
    Slot::Word(SnapshotField::BatteryCurrent),
    Slot::Split {
        high: SnapshotField::ControllerTemperature,
        low: SnapshotField::BatteryTemperature,
    },
    Slot::Word(SnapshotField::LoadVoltage),
    Slot::Word(SnapshotField::LoadCurrent),
    Slot::Word(SnapshotField::LoadPower),
    Slot::Word(SnapshotField::PanelVoltage),
    Slot::Word(SnapshotField::PanelCurrent),
    Slot::Word(SnapshotField::PanelPower),
];

const ERROR_BLOCK_SLOTS: [Slot; 2] = [
    Slot::Word(SnapshotField::ErrorStatus),
    Slot::Word(SnapshotField::ErrorStatus2),
];

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HoldingBlockDialect;

impl Dialect for HoldingBlockDialect {
    fn groups(&self) -> &'static [RegisterGroup] {
        &HOLDING_BLOCK_GROUPS
    }

    fn apply(
        &self,
        group: &RegisterGroup,
        response: &ResponseFrame<'_>,
        snapshot: &mut TelemetrySnapshot,
    ) {
        let slots: &[Slot] = match group.address {
            DATA_BLOCK_ADDRESS => &DATA_BLOCK_SLOTS,
            ERROR_BLOCK_ADDRESS => &ERROR_BLOCK_SLOTS,
            _ => return,
        };

        for (slot, word) in slots.iter().zip(response.registers()) {
            match *slot {
                Slot::Word(field) => snapshot.set(field, word),
                Slot::Split { high, low } => {
                    snapshot.set(high, word >> 8);
                    snapshot.set(low, word & 0x00FF);
                }
            }
        }
    }

    fn uplink_schema(&self) -> &'static PayloadSchema {
        &CONTROLLER_BLOCK_SCHEMA
    }
}
