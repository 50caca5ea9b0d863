//! Public traits exposed by the codec engine. They decouple typed structures
//! (telemetry snapshot, environment readings) from the schema-driven
//! serialization logic and provide a uniform API to upper layers.
use crate::core::FieldValue;

//==================================================================================FIELD_ACCESS
/// Lets the engine access fields by their `'static str` identifier without
/// knowing the concrete type.
///
/// ```rust, ignore
/// let mut snapshot = TelemetrySnapshot::new();
/// snapshot.field_mut("PanelVoltage", FieldValue::U16(182));
/// assert_eq!(snapshot.field("PanelVoltage"), Some(FieldValue::U16(182)));
/// ```
pub trait FieldAccess {
    /// Read the value of a field.
    ///
    /// Returns `Some(FieldValue)` if the field exists, `None` otherwise.
    fn field(&self, id: &'static str) -> Option<FieldValue>;

    /// Write the value of a field.
    ///
    /// Returns `Some(())` on success, `None` if the field does not exist or the
    /// value cannot be represented. Read-only structures keep the default.
    fn field_mut(&mut self, _id: &'static str, _value: FieldValue) -> Option<()> {
        None
    }
}
