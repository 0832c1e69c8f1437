//! Shared configuration for Weather Eagle tools.
//!
//! A TOML file in the platform config directory, overridden by `EAGLE_`
//! environment variables, and translated to `eagle_core::SessionConfig`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use eagle_core::{DEFAULT_PORT, Endpoint, MAX_CONNECT_ATTEMPTS, SessionConfig, TransportConfig};

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

impl ConfigError {
    fn invalid(field: &str, reason: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub device: DeviceConfig,

    #[serde(default)]
    pub polling: PollingConfig,

    #[serde(default)]
    pub transport: TransportSection,
}

/// Where the sensor lives.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct DeviceConfig {
    #[serde(default = "default_address")]
    pub address: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            address: default_address(),
            port: default_port(),
        }
    }
}

fn default_address() -> String {
    "127.0.0.1".into()
}
fn default_port() -> u16 {
    DEFAULT_PORT
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct PollingConfig {
    /// Seconds between background refreshes.
    #[serde(default = "default_interval")]
    pub interval_secs: u64,

    /// `/getecco` polls during the connect handshake.
    #[serde(default = "default_attempts")]
    pub connect_attempts: u32,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_interval(),
            connect_attempts: default_attempts(),
        }
    }
}

fn default_interval() -> u64 {
    5
}
fn default_attempts() -> u32 {
    MAX_CONNECT_ATTEMPTS
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct TransportSection {
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,

    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Accept self-signed device certificates on port 443.
    #[serde(default = "default_insecure")]
    pub insecure: bool,
}

impl Default for TransportSection {
    fn default() -> Self {
        Self {
            connect_timeout_secs: default_connect_timeout(),
            timeout_secs: default_timeout(),
            insecure: default_insecure(),
        }
    }
}

fn default_connect_timeout() -> u64 {
    3
}
fn default_timeout() -> u64 {
    30
}
fn default_insecure() -> bool {
    true
}

// ── Validation & translation ────────────────────────────────────────

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.device.port == 0 {
            return Err(ConfigError::invalid("device.port", "must be between 1 and 65535"));
        }
        if self.polling.interval_secs == 0 {
            return Err(ConfigError::invalid("polling.interval_secs", "must be at least 1"));
        }
        if self.polling.connect_attempts == 0 {
            return Err(ConfigError::invalid("polling.connect_attempts", "must be at least 1"));
        }
        if self.transport.timeout_secs == 0 {
            return Err(ConfigError::invalid("transport.timeout_secs", "must be at least 1"));
        }
        Ok(())
    }

    /// Build the session settings for `eagle_core::WeatherEagle::new`.
    pub fn to_session_config(&self) -> Result<SessionConfig, ConfigError> {
        self.validate()?;

        Ok(SessionConfig {
            endpoint: Endpoint::new(self.device.address.clone(), self.device.port),
            poll_interval: Duration::from_secs(self.polling.interval_secs),
            connect_attempts: self.polling.connect_attempts,
            transport: TransportConfig {
                connect_timeout: Duration::from_secs(self.transport.connect_timeout_secs),
                timeout: Duration::from_secs(self.transport.timeout_secs),
                accept_invalid_certs: self.transport.insecure,
            },
            ..SessionConfig::default()
        })
    }
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "weather-eagle", "eagle").map_or_else(
        || dirs_fallback().join("config.toml"),
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("eagle");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the config from the canonical path plus environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load the config from `path` plus environment. A missing file is not an
/// error; defaults apply.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("EAGLE_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<PathBuf, ConfigError> {
    let path = config_path();
    save_config_to(cfg, &path)?;
    Ok(path)
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}
