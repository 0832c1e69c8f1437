// ── Device session ──
//
// Lifecycle management for one sensor device: the connect handshake, the
// refresh operation, and the background poller that keeps the readings
// cache warm. Getters read the cache and never wait on the network.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::{DateTime, Utc};
use eagle_api::EagleClient;
use tokio::sync::{Mutex, watch};
use tracing::{debug, info, warn};

use crate::config::{Endpoint, SessionConfig};
use crate::error::CoreError;
use crate::model::{Readings, WindSpeedUnit};
use crate::poller::{Poller, PollerState};
use crate::store::ReadingsCache;

// ── Shared state ─────────────────────────────────────────────────

/// State reachable from both the caller and the poller task.
pub(crate) struct Shared {
    /// Access lock around the transport handle. `Some` exactly while the
    /// session is connected; every refresh runs with this lock held.
    pub(crate) session: Mutex<Option<EagleClient>>,
    /// Mirror of `session.is_some()` for lock-free reads.
    connected: AtomicBool,
    pub(crate) readings: ReadingsCache,
}

impl Shared {
    fn new() -> Self {
        Self {
            session: Mutex::new(None),
            connected: AtomicBool::new(false),
            readings: ReadingsCache::new(),
        }
    }

    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::Acquire)
    }

    /// Install or release the transport handle. Callers hold the lock.
    fn set_session(&self, session: &mut Option<EagleClient>, client: Option<EagleClient>) {
        let connected = client.is_some();
        *session = client;
        self.connected.store(connected, Ordering::Release);
    }

    /// One round of fetching and caching readings.
    ///
    /// `session` is the contents of the access lock, which the caller
    /// holds for the duration of the call.
    pub(crate) async fn refresh(&self, session: &Option<EagleClient>) -> Result<(), CoreError> {
        let client = match session {
            Some(client) if self.is_connected() => client,
            _ => return Err(CoreError::no_comm_link("session is not connected")),
        };

        if !self.readings.has_firmware() {
            self.fetch_firmware(client).await;
        }

        let ecco = client.get_ecco().await.inspect_err(|e| {
            if e.is_deserialization() {
                warn!(error = %e, "could not parse /getecco answer");
            }
        })?;

        if !ecco.is_ok() {
            warn!(result = %ecco.result, "/getecco returned an error result");
            return Err(CoreError::command_failed(format!(
                "/getecco returned result '{}'",
                ecco.result
            )));
        }

        if !ecco.is_sensor_connected() {
            debug!(ecco = ?ecco.ecco, "sensor subsystem not reporting, keeping cached readings");
            return Ok(());
        }

        let values = ecco
            .values()
            .ok_or_else(|| CoreError::command_failed("/getecco answer is missing readings"))?;
        self.readings.apply(values);

        debug!(
            temperature = values.temperature,
            humidity = values.humidity,
            pressure = values.pressure,
            dew_point = values.dew_point,
            "readings updated"
        );
        Ok(())
    }

    /// Query `/getinfo` once per session. Failures are logged and ignored.
    async fn fetch_firmware(&self, client: &EagleClient) {
        match client.get_info().await {
            Ok(info) if info.is_ok() => match info.firmware_version {
                Some(version) => {
                    debug!(%version, "firmware version cached");
                    self.readings.set_firmware(version);
                }
                None => warn!("/getinfo answered OK without a firmware version"),
            },
            Ok(info) => warn!(result = %info.result, "/getinfo returned an error result"),
            Err(e) => warn!(error = %e, "firmware query failed (non-fatal)"),
        }
    }
}

// ── WeatherEagle ─────────────────────────────────────────────────

/// Driver for one Weather Eagle sensor.
///
/// Configure the endpoint, call [`connect()`](Self::connect), then read
/// values through the getters. While connected, a background task refreshes
/// the cache every [`SessionConfig::poll_interval`].
pub struct WeatherEagle {
    config: SessionConfig,
    shared: Arc<Shared>,
    poller: Option<Poller>,
}

impl WeatherEagle {
    /// Create a driver. Does NOT connect.
    pub fn new(config: SessionConfig) -> Self {
        Self {
            config,
            shared: Arc::new(Shared::new()),
            poller: None,
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    // ── Endpoint ─────────────────────────────────────────────────

    /// Point the driver at a device. Takes effect on the next connect.
    pub fn set_endpoint(&mut self, address: impl Into<String>, port: u16) {
        self.config.endpoint = Endpoint::new(address, port);
        if self.is_connected() {
            debug!("endpoint changed while connected; applies after reconnect");
        }
        debug!(base_url = %self.config.endpoint.base_url(), "endpoint updated");
    }

    pub fn endpoint(&self) -> (&str, u16) {
        (&self.config.endpoint.address, self.config.endpoint.port)
    }

    pub fn base_url(&self) -> String {
        self.config.endpoint.base_url()
    }

    // ── Connection lifecycle ─────────────────────────────────────

    /// Open a session with the device.
    ///
    /// Triggers the device's sensor subsystem, waits for it to report
    /// "Connected", performs a first refresh, and starts the poller. Any
    /// failure leaves the driver disconnected. Calling this on a connected
    /// driver does nothing.
    pub async fn connect(&mut self) -> Result<(), CoreError> {
        if self.is_connected() {
            debug!("connect called while already connected");
            return Ok(());
        }

        let endpoint = &self.config.endpoint;
        if !endpoint.is_configured() {
            return Err(CoreError::no_comm_link("no device address configured"));
        }
        if self.config.poll_interval.is_zero() {
            return Err(CoreError::Config {
                message: "poll interval must be greater than zero".into(),
            });
        }

        let base_url = endpoint.parse_base_url()?;
        info!(url = %base_url, "connecting to device");
        let client = EagleClient::new(base_url, &self.config.transport)?;

        let shared = Arc::clone(&self.shared);
        let mut session = shared.session.lock().await;
        shared.set_session(&mut session, Some(client));

        if let Err(err) = self.establish(&shared, &session).await {
            warn!(error = %err, "connect failed");
            shared.set_session(&mut session, None);
            shared.readings.clear_firmware();
            return Err(err);
        }
        drop(session);

        if self.poller.is_none() {
            self.poller = Some(Poller::spawn(
                Arc::clone(&self.shared),
                self.config.poll_interval,
            ));
        }

        info!(firmware = %self.shared.readings.firmware(), "connected to device");
        Ok(())
    }

    /// Handshake plus the first refresh, with the access lock held.
    async fn establish(
        &self,
        shared: &Shared,
        session: &Option<EagleClient>,
    ) -> Result<(), CoreError> {
        let client = session.as_ref().ok_or(CoreError::NotConnected)?;
        handshake(&self.config, client).await?;
        shared.refresh(session).await
    }

    /// Close the session.
    ///
    /// Stops the poller and waits for it to exit before releasing the
    /// transport handle. A no-op when not connected.
    pub async fn disconnect(&mut self) {
        if !self.is_connected() {
            return;
        }

        let shared = Arc::clone(&self.shared);
        let mut session = shared.session.lock().await;

        if let Some(poller) = self.poller.take() {
            debug!("waiting for poller to exit");
            poller.stop().await;
        }

        shared.set_session(&mut session, None);
        shared.readings.clear_firmware();
        info!("disconnected from device");
    }

    pub fn is_connected(&self) -> bool {
        self.shared.is_connected()
    }

    /// Refresh the cache now, waiting for any in-flight refresh to finish.
    pub async fn refresh(&self) -> Result<(), CoreError> {
        let session = self.shared.session.lock().await;
        self.shared.refresh(&session).await
    }

    // ── Poller observation ───────────────────────────────────────

    pub fn poller_state(&self) -> PollerState {
        self.poller.as_ref().map_or(PollerState::Idle, Poller::state)
    }

    pub fn is_polling(&self) -> bool {
        self.poller_state() == PollerState::Running
    }

    // ── Cached values ────────────────────────────────────────────

    /// Firmware version, empty until the first successful query.
    pub fn firmware_version(&self) -> String {
        self.shared.readings.firmware()
    }

    pub fn ambient_temperature(&self) -> f64 {
        self.shared.readings.temperature()
    }

    pub fn humidity(&self) -> f64 {
        self.shared.readings.humidity()
    }

    pub fn dew_point(&self) -> f64 {
        self.shared.readings.dew_point()
    }

    pub fn barometric_pressure(&self) -> f64 {
        self.shared.readings.pressure()
    }

    pub fn wind_speed_unit(&self) -> WindSpeedUnit {
        WindSpeedUnit::Kph
    }

    pub fn readings(&self) -> Readings {
        self.shared.readings.snapshot()
    }

    /// When the readings were last updated from the device.
    pub fn last_refresh(&self) -> Option<DateTime<Utc>> {
        self.shared.readings.last_refresh()
    }

    /// Subscribe to refresh timestamps.
    pub fn subscribe_refresh(&self) -> watch::Receiver<Option<DateTime<Utc>>> {
        self.shared.readings.subscribe_refresh()
    }
}

impl Drop for WeatherEagle {
    fn drop(&mut self) {
        // The task cannot be joined here; cancelling lets it exit on its own.
        if let Some(poller) = &self.poller {
            poller.cancel();
        }
    }
}

// ── Handshake ────────────────────────────────────────────────────

/// Start the sensor subsystem and wait for it to report "Connected".
///
/// Answers that fail to parse or report anything other than OK/Connected
/// count as "not ready yet". A transport failure aborts immediately.
async fn handshake(config: &SessionConfig, client: &EagleClient) -> Result<(), CoreError> {
    client.connect_ecco().await?;
    tokio::time::sleep(config.startup_delay).await;

    for attempt in 1..=config.connect_attempts {
        match client.get_ecco().await {
            Ok(ecco) if ecco.is_ok() && ecco.is_sensor_connected() => {
                debug!(attempt, "sensor subsystem connected");
                return Ok(());
            }
            Ok(ecco) => {
                debug!(attempt, result = %ecco.result, ecco = ?ecco.ecco, "sensor subsystem not ready");
            }
            Err(e) if e.is_deserialization() => {
                debug!(attempt, error = %e, "unparseable handshake answer");
            }
            Err(e) => return Err(e.into()),
        }

        if attempt < config.connect_attempts {
            tokio::time::sleep(config.retry_delay).await;
        }
    }

    Err(CoreError::command_failed(format!(
        "sensor subsystem did not report Connected after {} attempts",
        config.connect_attempts
    )))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn connect_without_address_fails_fast() {
        let mut eagle = WeatherEagle::new(SessionConfig::default());

        let err = eagle.connect().await.unwrap_err();

        assert!(matches!(err, CoreError::NoCommLink { .. }), "got {err:?}");
        assert!(!eagle.is_connected());
        assert_eq!(eagle.poller_state(), PollerState::Idle);
    }

    #[tokio::test]
    async fn refresh_while_disconnected_is_no_comm_link() {
        let eagle = WeatherEagle::new(SessionConfig::default());
        let err = eagle.refresh().await.unwrap_err();
        assert!(matches!(err, CoreError::NoCommLink { .. }), "got {err:?}");
    }

    #[tokio::test]
    async fn disconnect_when_idle_is_noop() {
        let mut eagle = WeatherEagle::new(SessionConfig::default());
        eagle.disconnect().await;
        eagle.disconnect().await;
        assert!(!eagle.is_connected());
    }

    #[test]
    fn fresh_driver_reports_defaults() {
        let eagle = WeatherEagle::new(SessionConfig::default().with_endpoint("10.1.1.5", 443));

        assert_eq!(eagle.endpoint(), ("10.1.1.5", 443));
        assert_eq!(eagle.base_url(), "https://10.1.1.5");
        assert_eq!(eagle.firmware_version(), "");
        assert_eq!(eagle.wind_speed_unit(), WindSpeedUnit::Kph);
        assert_eq!(eagle.last_refresh(), None);
        assert!(!eagle.is_polling());
    }

    #[test]
    fn set_endpoint_recomputes_base_url() {
        let mut eagle = WeatherEagle::new(SessionConfig::default());
        eagle.set_endpoint("192.168.0.9", 80);
        assert_eq!(eagle.base_url(), "http://192.168.0.9");
        eagle.set_endpoint("192.168.0.9", 1380);
        assert_eq!(eagle.base_url(), "http://192.168.0.9:1380");
    }
}
