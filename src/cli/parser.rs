//! CLI argument parsing with clap

use clap::{Parser, Subcommand};
use serde_json::Value;
use std::path::PathBuf;

use crate::config::Environment;

/// Send notification events to a notification service
#[derive(Parser, Debug)]
#[command(name = "notifier-client")]
#[command(about = "Send notification events to a notification service")]
#[command(long_about = "
Sends a single notification event (name, recipients, data) to the configured
notification service over HTTP, authenticating with a static access token.

Configuration is read from config/default.toml, config/{env}.toml and
config/local.toml, then NOTIFIER_* environment variables
(e.g. NOTIFIER_CLIENT__TOKEN), then the flags below.

EXAMPLES:
    # Send a signup event to bob
    notifier-client send --event signup --to bob

    # Several recipients and extra data
    notifier-client send --event digest --to ann --to bob --data count=3

    # Explicit endpoint and token
    notifier-client send --event signup --to bob \\
        --url http://localhost:9001/api/events --token abc

    # Show whether the configuration is usable
    notifier-client check
")]
#[command(version = crate::clap_long_version())]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file path
    ///
    /// Load this TOML file instead of the layered configuration directory.
    #[arg(short, long, value_name = "FILE", value_parser = super::validation::validate_config_file_path)]
    pub config: Option<PathBuf>,

    /// Override environment detection
    ///
    /// Selects which {env}.toml layer is loaded.
    #[arg(short, long, value_enum)]
    pub env: Option<Environment>,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Only log errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

/// Endpoint overrides shared by every subcommand
#[derive(clap::Args, Debug, Clone, Default)]
pub struct EndpointArgs {
    /// Notification service URL, e.g. http://localhost:9001/api/events
    #[arg(long, value_name = "URL")]
    pub url: Option<String>,

    /// Access token sent as the access_token query parameter
    #[arg(long, value_name = "TOKEN", env = "NOTIFIER_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Dispatch timeout in seconds (0 waits indefinitely)
    #[arg(long, value_name = "SECONDS", value_parser = super::validation::validate_timeout)]
    pub timeout: Option<u64>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Send one notification event
    ///
    /// Prints the service's JSON response on success. Exits non-zero when the
    /// client is misconfigured, the service is unreachable or it rejects the
    /// event.
    Send {
        /// Event name
        #[arg(long, value_name = "NAME")]
        event: String,

        /// Recipient; repeat for several
        #[arg(long = "to", value_name = "USER")]
        to: Vec<String>,

        /// Extra data as key=value; values are parsed as JSON when possible
        #[arg(long = "data", value_name = "KEY=VALUE", value_parser = super::validation::parse_data_pair)]
        data: Vec<(String, Value)>,

        #[command(flatten)]
        endpoint: EndpointArgs,
    },
    /// Resolve the configuration and report whether notifications are enabled
    Check {
        #[command(flatten)]
        endpoint: EndpointArgs,
    },
}

impl Commands {
    pub fn endpoint(&self) -> &EndpointArgs {
        match self {
            Commands::Send { endpoint, .. } | Commands::Check { endpoint } => endpoint,
        }
    }
}
