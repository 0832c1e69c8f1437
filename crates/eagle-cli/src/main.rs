mod cli;
mod commands;
mod error;
mod output;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use eagle_core::{SessionConfig, WeatherEagle};

use crate::cli::{Cli, Command, GlobalOpts};
use crate::error::CliError;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_tracing(cli.global.verbose);

    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        // Config commands never talk to the device
        Command::Config(args) => commands::config_cmd::handle(args, &cli.global),

        Command::Completions(args) => {
            use clap::CommandFactory;
            use clap_complete::generate;

            let mut cmd = Cli::command();
            generate(args.shell, &mut cmd, "eagle", &mut std::io::stdout());
            Ok(())
        }

        cmd => {
            let session = build_session_config(&cli.global)?;
            let eagle = WeatherEagle::new(session);

            tracing::debug!(command = ?cmd, base_url = %eagle.base_url(), "dispatching command");
            commands::dispatch(cmd, eagle, &cli.global).await
        }
    }
}

/// Config file and environment, then `--address` / `--port` on top.
fn build_session_config(global: &GlobalOpts) -> Result<SessionConfig, CliError> {
    let mut cfg = eagle_config::load_config()?;
    if let Some(address) = &global.address {
        cfg.device.address.clone_from(address);
    }
    if let Some(port) = global.port {
        cfg.device.port = port;
    }
    Ok(cfg.to_session_config()?)
}
