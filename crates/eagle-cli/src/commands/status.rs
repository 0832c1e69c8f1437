//! `eagle status`: one connect, one snapshot, one disconnect.

use eagle_core::WeatherEagle;

use super::Sample;
use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

pub async fn handle(mut eagle: WeatherEagle, global: &GlobalOpts) -> Result<(), CliError> {
    eagle.connect().await?;
    let sample = Sample::capture(&eagle);
    let (address, port) = eagle.endpoint();
    let device = format!("{address}:{port}");
    eagle.disconnect().await;

    let rendered = output::render_single(global.output, &sample, |s| detail(s, &device))?;
    output::print_output(&rendered)
}

fn detail(sample: &Sample, device: &str) -> String {
    let firmware = if sample.firmware.is_empty() {
        "unknown".to_owned()
    } else {
        sample.firmware.clone()
    };
    let refreshed = sample
        .refreshed_at
        .map_or_else(|| "never".to_owned(), |t| t.to_rfc3339());

    output::key_values(&[
        ("Device", device.to_owned()),
        ("Firmware", firmware),
        ("Temperature", format!("{:.1} °C", sample.readings.temperature)),
        ("Humidity", format!("{:.1} %", sample.readings.humidity)),
        ("Dew point", format!("{:.1} °C", sample.readings.dew_point)),
        ("Pressure", format!("{:.1} mbar", sample.readings.pressure)),
        ("Wind unit", sample.wind_speed_unit.to_string()),
        ("Refreshed", refreshed),
    ])
}
