//! Command executor for dispatching CLI commands
//!
//! Runs after parsing, configuration loading and logger setup.

use anyhow::{Context, bail};
use serde_json::{Map, Value};
use tracing::info;

use super::parser::{Cli, Commands};
use crate::LOG_TARGET;
use crate::config::{ConfigResolver, Settings};
use crate::notifications::{ClientState, NotificationClient};

/// Execute a CLI command with the given settings
///
/// # Errors
/// Returns an error when the client is disabled or delivery fails
pub async fn execute_command(cli: &Cli, settings: Settings) -> anyhow::Result<()> {
    match &cli.command {
        Commands::Send { event, to, data, .. } => {
            let response = send_event(settings, event, to, data).await?;
            println!("{}", serde_json::to_string_pretty(&response)?);
            Ok(())
        }
        Commands::Check { .. } => {
            let report = check_configuration(settings)?;
            println!("{}", report);
            Ok(())
        }
    }
}

async fn send_event(
    settings: Settings,
    event: &str,
    to: &[String],
    data: &[(String, Value)],
) -> anyhow::Result<Value> {
    let mut client = NotificationClient::new(settings.client);

    client.notify(event);
    match to {
        [] => {}
        [one] => {
            client.to(one.as_str());
        }
        many => {
            client.to(many.to_vec());
        }
    }
    if !data.is_empty() {
        let fields: Map<String, Value> = data.iter().cloned().collect();
        client.with_data(Value::Object(fields));
    }

    info!(target: LOG_TARGET, event = %event, recipients = to.len(), "Sending event");

    client
        .send()
        .await
        .with_context(|| format!("Failed to send event '{}'", event))
}

/// Describe how the settings resolve, failing when the client would be disabled
fn check_configuration(settings: Settings) -> anyhow::Result<String> {
    let mode = ConfigResolver::default().mode(&settings.client);
    let client = NotificationClient::new(settings.client);

    if let ClientState::Disabled(reason) = client.state() {
        bail!("Notifications are disabled ({:?} mode): {}", mode, reason);
    }

    let mut report = format!("mode: {:?}\nenabled: true", mode);
    if let Some(url) = client.redacted_request_url() {
        report.push_str(&format!("\nurl: {}", url));
    }
    match client.timeout() {
        Some(limit) => report.push_str(&format!("\ntimeout: {}s", limit.as_secs())),
        None => report.push_str("\ntimeout: none"),
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClientOptions;

    fn settings_with(client: ClientOptions) -> Settings {
        Settings {
            client,
            ..Default::default()
        }
    }

    #[test]
    fn test_check_reports_redacted_url() {
        let settings = settings_with(ClientOptions::with_url(
            "http://localhost:9001/api/events",
            "secret",
        ));

        let report = check_configuration(settings).unwrap();
        assert!(report.contains("mode: SingleUrl"));
        assert!(report.contains("enabled: true"));
        assert!(report.contains("access_token=***"));
        assert!(!report.contains("secret"));
        assert!(report.contains("timeout: 30s"));
    }

    #[test]
    fn test_check_fails_without_token() {
        let settings = settings_with(ClientOptions {
            url: Some("http://localhost:9001/api/events".to_string()),
            ..Default::default()
        });

        let err = check_configuration(settings).unwrap_err();
        assert!(err.to_string().contains("disabled"));
    }

    #[test]
    fn test_check_reports_disabled_timeout() {
        let mut options = ClientOptions::with_url("http://localhost:9001/api/events", "t");
        options.timeout_seconds = 0;

        let report = check_configuration(settings_with(options)).unwrap();
        assert!(report.contains("timeout: none"));
    }

    #[tokio::test]
    async fn test_send_fails_when_disabled() {
        let err = send_event(Settings::default(), "signup", &["bob".to_string()], &[])
            .await
            .unwrap_err();
        assert!(err.to_string().contains("signup"));
    }
}
