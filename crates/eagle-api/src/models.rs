// Wire models for the device's JSON endpoints.
//
// Every endpoint answers with a `result` field ("OK" on success). Sensor
// fields are optional on the wire: the device omits them while its
// sensor subsystem is not reporting.

use serde::Deserialize;

const RESULT_OK: &str = "OK";
const ECCO_CONNECTED: &str = "Connected";

/// Body of `GET /getecco`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EccoResponse {
    pub result: String,
    #[serde(default)]
    pub ecco: Option<String>,
    #[serde(default)]
    pub temp: Option<f64>,
    #[serde(default)]
    pub hum: Option<f64>,
    #[serde(default)]
    pub pressure: Option<f64>,
    #[serde(default)]
    pub dew: Option<f64>,
}

/// The four numeric readings carried by a connected `/getecco` answer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SensorValues {
    pub temperature: f64,
    pub humidity: f64,
    pub pressure: f64,
    pub dew_point: f64,
}

impl EccoResponse {
    pub fn is_ok(&self) -> bool {
        self.result == RESULT_OK
    }

    /// `true` once the device's sensor subsystem reports "Connected".
    pub fn is_sensor_connected(&self) -> bool {
        self.ecco.as_deref() == Some(ECCO_CONNECTED)
    }

    /// All four readings, or `None` if any of them is missing.
    pub fn values(&self) -> Option<SensorValues> {
        Some(SensorValues {
            temperature: self.temp?,
            humidity: self.hum?,
            pressure: self.pressure?,
            dew_point: self.dew?,
        })
    }
}

/// Body of `GET /getinfo`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct InfoResponse {
    pub result: String,
    #[serde(default, rename = "firmwareversion")]
    pub firmware_version: Option<String>,
}

impl InfoResponse {
    pub fn is_ok(&self) -> bool {
        self.result == RESULT_OK
    }
}
