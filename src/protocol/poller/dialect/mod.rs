//! Query dialects: which register groups to poll and how each validated
//! response lands in the snapshot.
//!
//! Two controller families are supported. They are selected by configuration
//! ([`DialectKind`]), never by probing the controller.
pub mod holding_block;
pub mod legacy;

use crate::core::PayloadSchema;
use crate::protocol::rtu::{frame::ResponseFrame, RegisterGroup};
use crate::protocol::telemetry::TelemetrySnapshot;

pub use holding_block::HoldingBlockDialect;
pub use legacy::LegacyDialect;

/// Strategy describing one controller family.
pub trait Dialect {
    /// Groups polled by one cycle, in order.
    fn groups(&self) -> &'static [RegisterGroup];

    /// Write the values carried by `response` (answer to `group`) into
    /// `snapshot`. Unknown groups are ignored.
    fn apply(
        &self,
        group: &RegisterGroup,
        response: &ResponseFrame<'_>,
        snapshot: &mut TelemetrySnapshot,
    );

    /// Layout of the controller uplink frame.
    fn uplink_schema(&self) -> &'static PayloadSchema;
}

//==================================================================================DIALECT_KIND
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
/// Configuration-level dialect selector.
pub enum DialectKind {
    /// One command per field, value at fixed offsets.
    #[default]
    Legacy,
    /// Standard holding-register block reads.
    HoldingBlock,
}

//==================================================================================ANY_DIALECT
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// Either built-in dialect, dispatched without allocation.
pub enum AnyDialect {
    Legacy(LegacyDialect),
    HoldingBlock(HoldingBlockDialect),
}

impl From<DialectKind> for AnyDialect {
    fn from(kind: DialectKind) -> Self {
        match kind {
            DialectKind::Legacy => AnyDialect::Legacy(LegacyDialect),
            DialectKind::HoldingBlock => AnyDialect::HoldingBlock(HoldingBlockDialect),
        }
    }
}

impl AnyDialect {
    /// Selector this dialect was built from.
    pub fn kind(&self) -> DialectKind {
        match self {
            AnyDialect::Legacy(_) => DialectKind::Legacy,
            AnyDialect::HoldingBlock(_) => DialectKind::HoldingBlock,
        }
    }
}

impl Dialect for AnyDialect {
    fn groups(&self) -> &'static [RegisterGroup] {
        match self {
            AnyDialect::Legacy(dialect) => dialect.groups(),
            AnyDialect::HoldingBlock(dialect) => dialect.groups(),
        }
    }

    fn apply(
        &self,
        group: &RegisterGroup,
        response: &ResponseFrame<'_>,
        snapshot: &mut TelemetrySnapshot,
    ) {
        match self {
            AnyDialect::Legacy(dialect) => dialect.apply(group, response, snapshot),
            AnyDialect::HoldingBlock(dialect) => dialect.apply(group, response, snapshot),
        }
    }

    fn uplink_schema(&self) -> &'static PayloadSchema {
        match self {
            AnyDialect::Legacy(dialect) => dialect.uplink_schema(),
            AnyDialect::HoldingBlock(dialect) => dialect.uplink_schema(),
        }
    }
}
