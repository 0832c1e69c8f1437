// ── Runtime session configuration ──
//
// These types describe *where* the device lives and how the session paces
// itself. They never touch disk: eagle-config (or any other host) builds a
// `SessionConfig` and hands it to `WeatherEagle::new`.

use std::time::Duration;

use eagle_api::TransportConfig;
use url::Url;

use crate::error::CoreError;

/// Web port the device firmware listens on out of the box.
pub const DEFAULT_PORT: u16 = 1380;

/// Handshake polls of `/getecco` before the connect attempt is abandoned.
pub const MAX_CONNECT_ATTEMPTS: u32 = 5;

/// Device address and TCP port.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub address: String,
    pub port: u16,
}

impl Default for Endpoint {
    fn default() -> Self {
        Self {
            address: String::new(),
            port: DEFAULT_PORT,
        }
    }
}

impl Endpoint {
    pub fn new(address: impl Into<String>, port: u16) -> Self {
        Self {
            address: address.into(),
            port,
        }
    }

    /// An endpoint is usable once an address has been set.
    pub fn is_configured(&self) -> bool {
        !self.address.is_empty()
    }

    /// Base URL for the current address and port.
    ///
    /// Port 443 selects HTTPS, port 80 gives a bare HTTP URL, any other
    /// port is written out explicitly.
    pub fn base_url(&self) -> String {
        match self.port {
            443 => format!("https://{}", self.address),
            80 => format!("http://{}", self.address),
            port => format!("http://{}:{port}", self.address),
        }
    }

    pub(crate) fn parse_base_url(&self) -> Result<Url, CoreError> {
        let raw = self.base_url();
        Url::parse(&raw).map_err(|e| CoreError::Config {
            message: format!("invalid device address '{raw}': {e}"),
        })
    }
}

/// Configuration for one driver instance.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub endpoint: Endpoint,
    /// Cadence of the background poller.
    pub poll_interval: Duration,
    /// Handshake polls before giving up.
    pub connect_attempts: u32,
    /// Pause after `/connectecco` before the first status poll.
    pub startup_delay: Duration,
    /// Pause between handshake polls that did not report "Connected".
    pub retry_delay: Duration,
    pub transport: TransportConfig,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            endpoint: Endpoint::default(),
            poll_interval: Duration::from_secs(5),
            connect_attempts: MAX_CONNECT_ATTEMPTS,
            startup_delay: Duration::from_millis(250),
            retry_delay: Duration::from_secs(1),
            transport: TransportConfig::default(),
        }
    }
}

impl SessionConfig {
    pub fn with_endpoint(mut self, address: impl Into<String>, port: u16) -> Self {
        self.endpoint = Endpoint::new(address, port);
        self
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn https_on_443_without_port() {
        assert_eq!(Endpoint::new("10.0.0.7", 443).base_url(), "https://10.0.0.7");
    }

    #[test]
    fn http_on_80_without_port() {
        assert_eq!(Endpoint::new("10.0.0.7", 80).base_url(), "http://10.0.0.7");
    }

    #[test]
    fn other_ports_are_explicit() {
        for port in [1, 8080, 1380, 8443, 65535] {
            assert_eq!(
                Endpoint::new("10.0.0.7", port).base_url(),
                format!("http://10.0.0.7:{port}")
            );
        }
    }

    #[test]
    fn base_url_follows_every_change() {
        let mut ep = Endpoint::new("10.0.0.7", 80);
        ep.port = 443;
        assert_eq!(ep.base_url(), "https://10.0.0.7");
        ep.address = "sensor.lan".into();
        assert_eq!(ep.base_url(), "https://sensor.lan");
        ep.port = 1380;
        assert_eq!(ep.base_url(), "http://sensor.lan:1380");
    }

    #[test]
    fn default_endpoint_is_unconfigured() {
        let ep = Endpoint::default();
        assert!(!ep.is_configured());
        assert_eq!(ep.port, DEFAULT_PORT);
    }

    #[test]
    fn default_session_uses_device_cadence() {
        let cfg = SessionConfig::default();
        assert_eq!(cfg.poll_interval, Duration::from_secs(5));
        assert_eq!(cfg.connect_attempts, 5);
        assert_eq!(cfg.startup_delay, Duration::from_millis(250));
        assert_eq!(cfg.retry_delay, Duration::from_secs(1));
    }

    #[test]
    fn garbage_address_is_config_error() {
        let err = Endpoint::new("not a host", 80).parse_base_url().unwrap_err();
        assert!(matches!(err, CoreError::Config { .. }));
    }
}
