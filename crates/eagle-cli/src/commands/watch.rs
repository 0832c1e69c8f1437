//! `eagle watch`: stream samples as the background poller refreshes them.

use eagle_core::WeatherEagle;
use tracing::{debug, info};

use super::Sample;
use crate::cli::{GlobalOpts, WatchArgs};
use crate::error::CliError;
use crate::output;

pub async fn handle(
    mut eagle: WeatherEagle,
    args: WatchArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    eagle.connect().await?;
    let mut updates = eagle.subscribe_refresh();
    let result = stream(&eagle, &mut updates, args.count, global).await;
    eagle.disconnect().await;
    result
}

async fn stream(
    eagle: &WeatherEagle,
    updates: &mut tokio::sync::watch::Receiver<Option<chrono::DateTime<chrono::Utc>>>,
    count: Option<u64>,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    // connect() already refreshed once
    updates.mark_unchanged();
    let mut printed = 0_u64;

    loop {
        let rendered = output::render_line(global.output, &Sample::capture(eagle), line)?;
        output::print_output(&rendered)?;
        printed += 1;
        if count.is_some_and(|n| printed >= n) {
            debug!(printed, "sample count reached");
            return Ok(());
        }

        tokio::select! {
            changed = updates.changed() => {
                if changed.is_err() {
                    return Ok(());
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("interrupted");
                return Ok(());
            }
        }
    }
}

fn line(sample: &Sample) -> String {
    let at = sample
        .refreshed_at
        .map_or_else(|| "-".to_owned(), |t| t.format("%Y-%m-%dT%H:%M:%SZ").to_string());
    format!(
        "{at}  temp {:.1} °C  hum {:.1} %  dew {:.1} °C  pressure {:.1} mbar",
        sample.readings.temperature,
        sample.readings.humidity,
        sample.readings.dew_point,
        sample.readings.pressure,
    )
}
