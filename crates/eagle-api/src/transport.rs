// Transport configuration for building the device's reqwest::Client.
//
// The sensor serves plain HTTP on a LAN address, or HTTPS with a
// self-signed certificate, so peer verification is off unless asked for.

use std::time::Duration;

use reqwest::redirect::Policy;

use crate::error::Error;

const USER_AGENT: &str = concat!("eagle/", env!("CARGO_PKG_VERSION"));

/// Maximum redirect hops followed before the request is failed.
const MAX_REDIRECTS: usize = 10;

/// Shared transport configuration for building HTTP clients.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportConfig {
    /// Time allowed to establish the TCP (and TLS) connection.
    pub connect_timeout: Duration,
    /// Time allowed for the whole request, body included.
    pub timeout: Duration,
    /// Accept any certificate presented by the device.
    pub accept_invalid_certs: bool,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(3),
            timeout: Duration::from_secs(30),
            accept_invalid_certs: true,
        }
    }
}

impl TransportConfig {
    /// Build a `reqwest::Client` from this config.
    pub fn build_client(&self) -> Result<reqwest::Client, Error> {
        reqwest::Client::builder()
            .connect_timeout(self.connect_timeout)
            .timeout(self.timeout)
            .user_agent(USER_AGENT)
            .redirect(Policy::limited(MAX_REDIRECTS))
            .danger_accept_invalid_certs(self.accept_invalid_certs)
            .build()
            .map_err(|e| Error::ClientInit(e.to_string()))
    }
}
