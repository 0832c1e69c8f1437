// eagle-core: Session driver and reading cache between eagle-api and consumers.

pub mod config;
pub mod error;
pub mod model;
pub mod poller;
pub mod session;
pub mod store;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::{DEFAULT_PORT, Endpoint, MAX_CONNECT_ATTEMPTS, SessionConfig};
pub use error::CoreError;
pub use model::{Readings, WindSpeedUnit};
pub use poller::PollerState;
pub use session::WeatherEagle;
pub use store::{AtomicF64, ReadingsCache};

pub use eagle_api::TransportConfig;
