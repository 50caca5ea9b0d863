//! Node-side sensor readings packed into the tracker frame.
use super::schema::{
    TRACKER_BATTERY_SCHEMA, TRACKER_ENVIRONMENT_SCHEMA, TRACKER_FULL_SCHEMA, TRACKER_GNSS_SCHEMA,
};
use crate::core::{FieldValue, PayloadSchema};
use crate::infra::codec::traits::FieldAccess;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Position reported by the GNSS receiver.
pub struct GnssFix {
    /// Degrees, positive north.
    pub latitude: f32,
    /// Degrees, positive east.
    pub longitude: f32,
    /// Metres above sea level.
    pub altitude: f32,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// One sample of the node's own sensors.
pub struct EnvironmentReadings {
    /// Node battery in millivolts.
    pub battery_mv: u16,
    /// Relative humidity in percent.
    pub humidity: f32,
    /// Ambient temperature in degrees Celsius.
    pub temperature: f32,
    /// Last fix, `None` while the receiver has none.
    pub gnss: Option<GnssFix>,
}

/// Bounds of the signed 24-bit GNSS fields.
const GNSS_MIN: i32 = -0x80_0000;
const GNSS_MAX: i32 = 0x7F_FFFF;

/// Scale a GNSS value and clamp it into its 24-bit field. NaN maps to 0.
fn gnss_wire(value: f32, factor: f32) -> i32 {
    ((value * factor) as i32).clamp(GNSS_MIN, GNSS_MAX)
}

// Float to wire conversions truncate toward zero and saturate at the field bounds.
impl FieldAccess for EnvironmentReadings {
    fn field(&self, id: &'static str) -> Option<FieldValue> {
        let fix = self.gnss.unwrap_or_default();
        match id {
            "BatteryLevel" => Some(FieldValue::U16(self.battery_mv / 10)),
            "Humidity" => Some(FieldValue::U8((self.humidity * 2.0) as u8)),
            "Temperature" => Some(FieldValue::I16((self.temperature * 10.0) as i16)),
            "Latitude" => Some(FieldValue::I32(gnss_wire(fix.latitude, 10_000.0))),
            "Longitude" => Some(FieldValue::I32(gnss_wire(fix.longitude, 10_000.0))),
            "Altitude" => Some(FieldValue::I32(gnss_wire(fix.altitude, 100.0))),
            _ => None,
        }
    }
}

//==================================================================================TRACKER_LAYOUT
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
/// Optional blocks of the tracker frame. The battery block is always present.
pub struct TrackerLayout {
    /// Prepend the GNSS block.
    pub gnss: bool,
    /// Append the humidity and temperature blocks.
    pub environment: bool,
}

impl Default for TrackerLayout {
    fn default() -> Self {
        Self {
            gnss: false,
            environment: true,
        }
    }
}

impl TrackerLayout {
    /// Schema matching the enabled blocks.
    pub fn schema(&self) -> &'static PayloadSchema {
        match (self.gnss, self.environment) {
            (true, true) => &TRACKER_FULL_SCHEMA,
            (true, false) => &TRACKER_GNSS_SCHEMA,
            (false, true) => &TRACKER_ENVIRONMENT_SCHEMA,
            (false, false) => &TRACKER_BATTERY_SCHEMA,
        }
    }
}
