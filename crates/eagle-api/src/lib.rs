// eagle-api: Async HTTP client for the Weather Eagle sensor device

pub mod client;
pub mod error;
pub mod models;
pub mod response;
pub mod transport;

pub use client::EagleClient;
pub use error::Error;
pub use models::{EccoResponse, InfoResponse, SensorValues};
pub use response::cleanup_response;
pub use transport::TransportConfig;
