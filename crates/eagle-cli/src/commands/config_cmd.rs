//! Config subcommand handlers.

use eagle_config::{self as config, Config};

use crate::cli::{ConfigArgs, ConfigCommand, ConfigSetArgs, GlobalOpts, OutputFormat};
use crate::error::CliError;
use crate::output;

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Show => {
            let cfg = config::load_config()?;
            let rendered = match global.output {
                OutputFormat::Table => toml::to_string_pretty(&cfg).map_err(|e| {
                    CliError::Validation {
                        field: "config".into(),
                        reason: format!("failed to serialize config: {e}"),
                    }
                })?,
                OutputFormat::Json => serde_json::to_string_pretty(&cfg)?,
            };
            output::print_output(rendered.trim_end())
        }

        ConfigCommand::Path => output::print_output(&config::config_path().display().to_string()),

        ConfigCommand::Set(set) => {
            let mut cfg = config::load_config()?;
            if !apply(&mut cfg, &set, global) {
                return Err(CliError::Validation {
                    field: "config set".into(),
                    reason: "nothing to set; pass --address, --port or --interval".into(),
                });
            }
            cfg.validate()?;
            let path = config::save_config(&cfg)?;
            eprintln!("Saved {}", path.display());
            Ok(())
        }
    }
}

/// Copy the requested values into `cfg`. Returns whether anything changed.
fn apply(cfg: &mut Config, set: &ConfigSetArgs, global: &GlobalOpts) -> bool {
    let mut changed = false;
    if let Some(address) = &global.address {
        cfg.device.address.clone_from(address);
        changed = true;
    }
    if let Some(port) = global.port {
        cfg.device.port = port;
        changed = true;
    }
    if let Some(interval) = set.interval {
        cfg.polling.interval_secs = interval;
        changed = true;
    }
    changed
}
