// Device HTTP client
//
// Wraps `reqwest::Client` with the device's fixed endpoint paths and the
// body cleanup every answer needs before it can be parsed. This is the
// transport handle owned by a connected session; it performs no retries.

use serde::de::DeserializeOwned;
use tracing::{debug, trace};
use url::Url;

use crate::error::Error;
use crate::models::{EccoResponse, InfoResponse};
use crate::response::cleanup_response;
use crate::transport::TransportConfig;

pub const PATH_CONNECT_ECCO: &str = "/connectecco";
pub const PATH_GET_ECCO: &str = "/getecco";
pub const PATH_GET_INFO: &str = "/getinfo";

/// Raw HTTP client for one sensor device.
#[derive(Debug, Clone)]
pub struct EagleClient {
    http: reqwest::Client,
    base_url: Url,
}

impl EagleClient {
    /// Create a new client from a `TransportConfig`.
    ///
    /// `base_url` is the device root, e.g. `http://192.168.1.40:1380`.
    pub fn new(base_url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self { http, base_url })
    }

    /// Create a client with a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: Url) -> Self {
        Self { http, base_url }
    }

    /// The device base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── URL builder ──────────────────────────────────────────────────

    /// `{base}{path}`, with exactly one slash between them.
    pub(crate) fn url(&self, path: &str) -> Result<Url, Error> {
        let full = format!(
            "{}/{}",
            self.base_url.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        Ok(Url::parse(&full)?)
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// GET `path` and return the cleaned-up body.
    ///
    /// Non-2xx statuses are reported as [`Error::Transport`].
    pub async fn get_text(&self, path: &str) -> Result<String, Error> {
        let url = self.url(path)?;
        debug!("GET {}", url);

        let body = self
            .http
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        trace!(raw = %body, "device response");

        let cleaned = cleanup_response(&body);
        debug!(body = %cleaned, "cleaned response");
        Ok(cleaned)
    }

    /// GET `path` and decode the cleaned body as JSON.
    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
        let body = self.get_text(path).await?;
        serde_json::from_str(&body).map_err(|e| Error::Deserialization {
            message: e.to_string(),
            body,
        })
    }

    // ── Endpoints ────────────────────────────────────────────────────

    /// Ask the device to start its sensor subsystem. The body is ignored.
    pub async fn connect_ecco(&self) -> Result<(), Error> {
        self.get_text(PATH_CONNECT_ECCO).await.map(drop)
    }

    /// Sensor subsystem status and current readings.
    pub async fn get_ecco(&self) -> Result<EccoResponse, Error> {
        self.get_json(PATH_GET_ECCO).await
    }

    /// Device information (firmware version).
    pub async fn get_info(&self) -> Result<InfoResponse, Error> {
        self.get_json(PATH_GET_INFO).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn client(base: &str) -> EagleClient {
        EagleClient::with_client(reqwest::Client::new(), Url::parse(base).unwrap())
    }

    #[test]
    fn url_joins_bare_host() {
        let c = client("http://192.168.1.40");
        assert_eq!(c.url("/getecco").unwrap().as_str(), "http://192.168.1.40/getecco");
    }

    #[test]
    fn url_keeps_explicit_port() {
        let c = client("http://192.168.1.40:1380");
        assert_eq!(c.url(PATH_GET_INFO).unwrap().as_str(), "http://192.168.1.40:1380/getinfo");
    }

    #[test]
    fn url_keeps_base_path_prefix() {
        let c = client("https://sensor.lan/eagle/");
        assert_eq!(c.url("getecco").unwrap().as_str(), "https://sensor.lan/eagle/getecco");
    }
}
