//! Clap derive structures for the `ontwatch` CLI.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use ontwatch_config::Overrides;

// ── Top-Level CLI ────────────────────────────────────────────────────

/// ontwatch -- scrape telemetry from an ONT / home router web console
#[derive(Debug, Parser)]
#[command(
    name = "ontwatch",
    version,
    about = "Scrape status and traffic telemetry from an ONT web console",
    long_about = "Logs in to the web console of a fiber ONT or home router, walks its\n\
        status pages, and prints device, WAN, LAN, Wi-Fi and DHCP records.",
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
    /// Appliance base URL (e.g. http://192.168.1.1)
    #[arg(long, short = 'e', global = true)]
    pub endpoint: Option<String>,

    /// Console username
    #[arg(long, short = 'u', env = "ONT_USERNAME", global = true)]
    pub username: Option<String>,

    /// Console password
    #[arg(long, env = "ONT_PASSWORD", global = true, hide_env_values = true)]
    pub password: Option<String>,

    /// Config file (defaults to the platform config dir)
    #[arg(long, env = "ONTWATCH_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Request timeout in seconds
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    /// TCP connect timeout in seconds
    #[arg(long, global = true)]
    pub connect_timeout: Option<u64>,

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', global = true)]
    pub insecure: bool,

    /// Seconds to wait after a fatal collection failure before exiting
    #[arg(long, global = true)]
    pub sleep_quit: Option<u64>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Log line format (logs go to stderr)
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Record output format
    #[arg(long, short = 'o', default_value = "plain", global = true)]
    pub output: OutputFormat,
}

impl GlobalOpts {
    /// Flag values that take precedence over file and environment.
    pub fn overrides(&self) -> Overrides {
        Overrides {
            endpoint: self.endpoint.clone(),
            username: self.username.clone(),
            password: self.password.clone(),
            sleep_quit: self.sleep_quit,
            timeout: self.timeout,
            connect_timeout: self.connect_timeout,
            insecure: self.insecure.then_some(true),
        }
    }
}

// ── Format Enums ─────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty-printed JSON, one document per record
    Json,
    /// Compact JSON, one record per line
    JsonCompact,
    /// Flattened metric samples, one per line
    Plain,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Human-readable lines
    Text,
    /// One JSON object per event
    Json,
}

// ── Commands ─────────────────────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Log in and report whether the handshake succeeded
    Login,

    /// Log in, run one collection cycle, and print the records
    Scrape,

    /// Log in once and collect on a fixed interval until interrupted
    Watch(WatchArgs),
}

#[derive(Debug, Args)]
pub struct WatchArgs {
    /// Seconds between collection cycles
    #[arg(long, short = 'i', default_value = "60")]
    pub interval: u64,
}
