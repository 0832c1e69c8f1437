// ── Cached readings ──
//
// Lock-free storage for the latest values pulled from the device. Each
// numeric reading lives in its own atomic cell and is written on its own;
// there is no group update, so a reader racing a refresh can observe a mix
// of old and new values. Refresh timestamps are broadcast via `watch`.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use arc_swap::ArcSwapOption;
use chrono::{DateTime, Utc};
use eagle_api::SensorValues;
use tokio::sync::watch;

use crate::model::Readings;

/// An `f64` stored as its bit pattern in an `AtomicU64`.
#[derive(Debug)]
pub struct AtomicF64(AtomicU64);

impl AtomicF64 {
    pub fn new(value: f64) -> Self {
        Self(AtomicU64::new(value.to_bits()))
    }

    pub fn load(&self) -> f64 {
        f64::from_bits(self.0.load(Ordering::Relaxed))
    }

    pub fn store(&self, value: f64) {
        self.0.store(value.to_bits(), Ordering::Relaxed);
    }
}

impl Default for AtomicF64 {
    fn default() -> Self {
        Self::new(0.0)
    }
}

/// Latest readings and firmware string for one device.
pub struct ReadingsCache {
    temperature: AtomicF64,
    humidity: AtomicF64,
    dew_point: AtomicF64,
    pressure: AtomicF64,
    firmware: ArcSwapOption<String>,
    last_refresh: watch::Sender<Option<DateTime<Utc>>>,
}

impl ReadingsCache {
    pub fn new() -> Self {
        let (last_refresh, _) = watch::channel(None);

        Self {
            temperature: AtomicF64::default(),
            humidity: AtomicF64::default(),
            dew_point: AtomicF64::default(),
            pressure: AtomicF64::default(),
            firmware: ArcSwapOption::empty(),
            last_refresh,
        }
    }

    // ── Numeric cells ────────────────────────────────────────────────

    pub fn temperature(&self) -> f64 {
        self.temperature.load()
    }

    pub fn humidity(&self) -> f64 {
        self.humidity.load()
    }

    pub fn dew_point(&self) -> f64 {
        self.dew_point.load()
    }

    pub fn pressure(&self) -> f64 {
        self.pressure.load()
    }

    pub fn snapshot(&self) -> Readings {
        Readings {
            temperature: self.temperature(),
            humidity: self.humidity(),
            dew_point: self.dew_point(),
            pressure: self.pressure(),
        }
    }

    /// Write all four cells, one after the other, and stamp the refresh.
    pub(crate) fn apply(&self, values: SensorValues) {
        self.temperature.store(values.temperature);
        self.humidity.store(values.humidity);
        self.pressure.store(values.pressure);
        self.dew_point.store(values.dew_point);

        self.last_refresh.send_replace(Some(Utc::now()));
    }

    // ── Firmware ─────────────────────────────────────────────────────

    /// Firmware version, empty until fetched.
    pub fn firmware(&self) -> String {
        self.firmware
            .load()
            .as_deref()
            .cloned()
            .unwrap_or_default()
    }

    pub(crate) fn has_firmware(&self) -> bool {
        self.firmware.load().is_some()
    }

    pub(crate) fn set_firmware(&self, version: String) {
        self.firmware.store(Some(Arc::new(version)));
    }

    pub(crate) fn clear_firmware(&self) {
        self.firmware.store(None);
    }

    // ── Refresh notifications ────────────────────────────────────────

    pub fn last_refresh(&self) -> Option<DateTime<Utc>> {
        *self.last_refresh.borrow()
    }

    pub fn subscribe_refresh(&self) -> watch::Receiver<Option<DateTime<Utc>>> {
        self.last_refresh.subscribe()
    }
}

impl Default for ReadingsCache {
    fn default() -> Self {
        Self::new()
    }
}
