// ── Core error types ──
//
// The three failure classes a host sees from the driver. Transport-layer
// errors from eagle-api are folded into them by the `From` impl below;
// consumers never match on HTTP status codes or serde errors directly.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    /// No endpoint configured, the device could not be reached, or a
    /// refresh was requested while the session is down.
    #[error("No communication link to device: {reason}")]
    NoCommLink { reason: String },

    /// The device was reached but the exchange did not succeed: client
    /// setup failure, handshake timeout, unparseable answer, or a non-OK
    /// protocol result.
    #[error("Device command failed: {message}")]
    CommandFailed { message: String },

    /// A transport call was attempted without a transport handle.
    #[error("Not connected to device")]
    NotConnected,

    /// The configured endpoint does not form a usable URL.
    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl CoreError {
    pub(crate) fn command_failed(message: impl Into<String>) -> Self {
        Self::CommandFailed {
            message: message.into(),
        }
    }

    pub(crate) fn no_comm_link(reason: impl Into<String>) -> Self {
        Self::NoCommLink {
            reason: reason.into(),
        }
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<eagle_api::Error> for CoreError {
    fn from(err: eagle_api::Error) -> Self {
        if err.is_connect_failure() {
            return CoreError::NoCommLink {
                reason: err.to_string(),
            };
        }

        match err {
            eagle_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            eagle_api::Error::Deserialization { message, body: _ } => CoreError::CommandFailed {
                message: format!("unparseable device response: {message}"),
            },
            other @ (eagle_api::Error::Transport(_) | eagle_api::Error::ClientInit(_)) => {
                CoreError::CommandFailed {
                    message: other.to_string(),
                }
            }
        }
    }
}
