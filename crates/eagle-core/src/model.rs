// ── Domain model ──

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Wind-speed unit reported to the host.
///
/// The device has no anemometer; the unit is a fixed default.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum WindSpeedUnit {
    #[default]
    Kph,
    Mps,
    Mph,
}

/// One view of the cached readings.
///
/// Assembled field by field from independent cells, so two fields may come
/// from different refresh cycles.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Readings {
    /// Ambient temperature, °C.
    pub temperature: f64,
    /// Relative humidity, %.
    pub humidity: f64,
    /// Dew point, °C.
    pub dew_point: f64,
    /// Barometric pressure, mbar.
    pub pressure: f64,
}
