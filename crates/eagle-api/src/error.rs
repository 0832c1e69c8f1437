use thiserror::Error;

/// Top-level error type for the `eagle-api` crate.
///
/// Separates transport failures (the device could not be reached or
/// answered with an HTTP error) from payload failures (the device answered
/// but the body was not the JSON we expected). `eagle-core` maps these into
/// its session-level taxonomy.
#[derive(Debug, Error)]
pub enum Error {
    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, non-2xx status, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Base URL or request path did not form a valid URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The HTTP client could not be constructed.
    #[error("Failed to initialise HTTP client: {0}")]
    ClientInit(String),

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the cleaned body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Returns `true` if the host could not be reached at all: a refused
    /// connection or a failed name lookup.
    ///
    /// Connect timeouts are excluded; reqwest reports those as connect
    /// errors too.
    pub fn is_connect_failure(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_connect() && !e.is_timeout(),
            _ => false,
        }
    }

    /// Returns `true` if the device answered but the payload was unusable.
    pub fn is_deserialization(&self) -> bool {
        matches!(self, Self::Deserialization { .. })
    }

    /// HTTP status code, if the failure came from a non-2xx response.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
