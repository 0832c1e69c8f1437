//! Output formatting: aligned text or JSON, selected by `--output`.

use std::io::{self, Write};

use serde::Serialize;

use crate::cli::OutputFormat;
use crate::error::CliError;

/// Render a single item: `detail_fn` for text, serde for JSON.
pub fn render_single<T>(
    format: OutputFormat,
    data: &T,
    detail_fn: impl Fn(&T) -> String,
) -> Result<String, CliError>
where
    T: Serialize,
{
    match format {
        OutputFormat::Table => Ok(detail_fn(data)),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(data)?),
    }
}

/// Render one line of a stream: `line_fn` for text, compact JSON otherwise.
pub fn render_line<T>(
    format: OutputFormat,
    data: &T,
    line_fn: impl Fn(&T) -> String,
) -> Result<String, CliError>
where
    T: Serialize,
{
    match format {
        OutputFormat::Table => Ok(line_fn(data)),
        OutputFormat::Json => Ok(serde_json::to_string(data)?),
    }
}

/// Left-align keys into a two-column block.
pub fn key_values(rows: &[(&str, String)]) -> String {
    let width = rows.iter().map(|(k, _)| k.len()).max().unwrap_or(0);
    rows.iter()
        .map(|(key, value)| format!("{key:<width$}  {value}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Print to stdout and flush so `watch` lines appear immediately.
pub fn print_output(output: &str) -> Result<(), CliError> {
    if output.is_empty() {
        return Ok(());
    }
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{output}")?;
    stdout.flush()?;
    Ok(())
}
