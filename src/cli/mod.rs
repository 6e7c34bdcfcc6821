//! CLI module for notifier-client
//!
//! Parses arguments, layers flag overrides on top of the loaded configuration
//! and dispatches the `send` and `check` commands.

pub mod executor;
pub mod parser;
pub mod validation;

pub use executor::execute_command;
pub use parser::{Cli, Commands, EndpointArgs};

use anyhow::Context;

use crate::config::{ConfigLoader, Settings};
use crate::logger::init_logger;

/// Load configuration and apply CLI overrides
///
/// Precedence, lowest first: configuration files, `NOTIFIER_*` environment
/// variables, command-line flags.
///
/// # Errors
/// Returns error if configuration loading or validation fails
pub fn load_and_merge_config(cli: &Cli) -> anyhow::Result<Settings> {
    let loader = match &cli.config {
        Some(path) => ConfigLoader::from_file(path),
        None => ConfigLoader::new(),
    }
    .context("Configuration error")?;

    let loader = match cli.env {
        Some(env) => loader.with_environment(env),
        None => loader,
    };

    let mut settings = loader.load().context("Failed to load configuration")?;
    apply_cli_overrides(cli, &mut settings);
    settings
        .validate()
        .context("Invalid configuration after applying command-line flags")?;

    Ok(settings)
}

fn apply_cli_overrides(cli: &Cli, settings: &mut Settings) {
    let endpoint = cli.command.endpoint();

    if let Some(url) = &endpoint.url {
        settings.client.url = Some(url.clone());
    }
    if let Some(token) = &endpoint.token {
        settings.client.token = Some(token.clone());
    }
    if let Some(timeout) = endpoint.timeout {
        settings.client.timeout_seconds = timeout;
    }

    if cli.verbose {
        settings.logger.level = "debug".to_string();
    } else if cli.quiet {
        settings.logger.level = "error".to_string();
    }
}

/// Initialize logger from settings
///
/// # Errors
/// Returns error if logger configuration is invalid or a subscriber is
/// already installed
pub fn init_logger_from_settings(settings: &Settings) -> anyhow::Result<()> {
    let logger_config = settings
        .logger
        .clone()
        .into_logger_config()
        .context("Logger configuration error")?;

    init_logger(logger_config).context("Logger initialization error")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_env::EnvGuard;
    use clap::Parser;
    use std::fs;

    fn write_config(dir: &tempfile::TempDir, body: &str) -> String {
        let path = dir.path().join("client.toml");
        fs::write(&path, body).unwrap();
        path.to_str().unwrap().to_string()
    }

    #[test]
    fn test_flags_override_file_values() {
        let mut env = EnvGuard::scrubbed();
        env.set("NOTIFIER_CLIENT__TOKEN", "from-env");
        let dir = tempfile::TempDir::new().unwrap();
        let path = write_config(
            &dir,
            r#"
[client]
url = "http://file.example/api/events"
token = "from-file"
timeout_seconds = 10
"#,
        );

        let cli = Cli::try_parse_from([
            "notifier-client",
            "--config",
            path.as_str(),
            "--verbose",
            "send",
            "--event",
            "signup",
            "--url",
            "http://flag.example/api/events",
            "--token",
            "from-flag",
            "--timeout",
            "0",
        ])
        .unwrap();

        let settings = load_and_merge_config(&cli).unwrap();
        assert_eq!(
            settings.client.url.as_deref(),
            Some("http://flag.example/api/events")
        );
        assert_eq!(settings.client.token.as_deref(), Some("from-flag"));
        assert_eq!(settings.client.timeout_seconds, 0);
        assert_eq!(settings.logger.level, "debug");
    }

    #[test]
    fn test_file_values_kept_without_flags() {
        let _env = EnvGuard::scrubbed();
        let dir = tempfile::TempDir::new().unwrap();
        let path = write_config(
            &dir,
            r#"
[client]
host = "notify.internal"
port = "8080"
token = "abc"
"#,
        );

        let cli =
            Cli::try_parse_from(["notifier-client", "-c", path.as_str(), "-q", "check"]).unwrap();

        let settings = load_and_merge_config(&cli).unwrap();
        assert_eq!(settings.client.host.as_deref(), Some("notify.internal"));
        assert_eq!(settings.client.port, Some(8080));
        assert_eq!(settings.logger.level, "error");
    }

    #[test]
    fn test_env_token_overrides_file() {
        let mut env = EnvGuard::scrubbed();
        env.set("NOTIFIER_CLIENT__TOKEN", "0042");
        let dir = tempfile::TempDir::new().unwrap();
        let path = write_config(&dir, "[client]\ntoken = \"from-file\"\n");

        let cli = Cli::try_parse_from(["notifier-client", "-c", path.as_str(), "check"]).unwrap();

        let settings = load_and_merge_config(&cli).unwrap();
        assert_eq!(settings.client.token.as_deref(), Some("0042"));
    }

    #[test]
    fn test_invalid_url_flag_is_rejected() {
        let _env = EnvGuard::scrubbed();
        let dir = tempfile::TempDir::new().unwrap();
        let path = write_config(&dir, "[client]\ntoken = \"abc\"\n");

        let cli = Cli::try_parse_from([
            "notifier-client",
            "--config",
            path.as_str(),
            "check",
            "--url",
            "not a url",
        ])
        .unwrap();

        assert!(load_and_merge_config(&cli).is_err());
    }
}
