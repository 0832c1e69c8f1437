//! Clap derive structures for the `eagle` CLI.

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// eagle -- read a Weather Eagle environmental sensor
#[derive(Debug, Parser)]
#[command(
    name = "eagle",
    version,
    about = "Read a Weather Eagle environmental sensor from the command line",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Device address (overrides the config file)
    #[arg(long, short = 'a', env = "EAGLE_ADDRESS", global = true)]
    pub address: Option<String>,

    /// Device web port (overrides the config file)
    #[arg(long, short = 'P', env = "EAGLE_PORT", global = true)]
    pub port: Option<u16>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "EAGLE_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Aligned key/value text (default)
    Table,
    /// Pretty-printed JSON; one compact object per line for `watch`
    Json,
}

// ── Commands ─────────────────────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Connect, print the current readings, and disconnect
    #[command(alias = "st")]
    Status,

    /// Print readings each time the background poller refreshes them
    #[command(alias = "w")]
    Watch(WatchArgs),

    /// Inspect or edit the configuration file
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Debug, Args)]
pub struct WatchArgs {
    /// Stop after this many samples (default: until Ctrl-C)
    #[arg(long, short = 'n', value_parser = clap::value_parser!(u64).range(1..))]
    pub count: Option<u64>,
}

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show the effective configuration (file plus environment)
    Show,

    /// Print the config file location
    Path,

    /// Update values in the config file
    ///
    /// `--address` and `--port` (or `EAGLE_ADDRESS` / `EAGLE_PORT`) are
    /// written to the `[device]` section.
    Set(ConfigSetArgs),
}

#[derive(Debug, Args)]
pub struct ConfigSetArgs {
    /// Seconds between background refreshes
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub interval: Option<u64>,
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
