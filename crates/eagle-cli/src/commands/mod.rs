//! Command dispatch: bridges CLI args -> driver calls -> output formatting.

pub mod config_cmd;
pub mod status;
pub mod watch;

use chrono::{DateTime, Utc};
use serde::Serialize;

use eagle_core::{Readings, WeatherEagle, WindSpeedUnit};

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a device-bound command to its handler.
pub async fn dispatch(
    cmd: Command,
    eagle: WeatherEagle,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Status => status::handle(eagle, global).await,
        Command::Watch(args) => watch::handle(eagle, args, global).await,
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => unreachable!(),
    }
}

/// What the driver currently reports, ready for rendering.
#[derive(Debug, Serialize)]
pub struct Sample {
    pub refreshed_at: Option<DateTime<Utc>>,
    pub firmware: String,
    #[serde(flatten)]
    pub readings: Readings,
    pub wind_speed_unit: WindSpeedUnit,
}

impl Sample {
    pub fn capture(eagle: &WeatherEagle) -> Self {
        Self {
            refreshed_at: eagle.last_refresh(),
            firmware: eagle.firmware_version(),
            readings: eagle.readings(),
            wind_speed_unit: eagle.wind_speed_unit(),
        }
    }
}
