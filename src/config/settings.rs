//! Configuration settings structures for notifier-client
//!
//! `ClientOptions` is the construction-time surface of a client. It can be
//! built in code or loaded (together with the logger settings) from TOML files
//! and environment variables through [`crate::config::ConfigLoader`].

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use serde::{Deserialize, Deserializer, Serialize};

use crate::config::error::ConfigError;
use crate::logger::{ConsoleConfig, FileConfig, LogFormat, LoggerConfig};
use crate::notifications::Notifier;

// ============================================================================
// Default value functions
// ============================================================================

pub(crate) const DEFAULT_PROTOCOL: &str = "http";
pub(crate) const DEFAULT_HOST: &str = "localhost";
pub(crate) const DEFAULT_PORT: u16 = 80;
pub(crate) const DEFAULT_PATH: &str = "/api/events";
pub(crate) const DEFAULT_URL: &str = "http://localhost:9001/api/events";

fn default_timeout_seconds() -> u64 {
    30
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_log_path() -> String {
    "logs/notifier.log".to_string()
}

fn default_log_format() -> String {
    "json".to_string()
}

// ============================================================================
// Client Options
// ============================================================================

/// Which built-in defaults fill the gaps when the caller leaves the endpoint
/// unspecified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DefaultProfile {
    /// `http://localhost:9001/api/events`
    #[default]
    SingleUrl,
    /// `{protocol: http, host: localhost, port: 80, path: /api/events}`
    Discrete,
}

/// Whether the canonical port of a protocol is written into request URLs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PortPolicy {
    /// Omit `:80` for http and `:443` for https
    #[default]
    ElideDefault,
    /// Always write the port
    Always,
}

/// The `notifier` option: either an in-process notifier or a connection
/// string naming a remote one.
#[derive(Clone)]
pub enum NotifierOption {
    /// In-process notifier; selects embedded mode
    Embedded(Arc<dyn Notifier>),
    /// Connection string; treated as the endpoint URL
    Address(String),
}

impl NotifierOption {
    pub fn embedded<N: Notifier + 'static>(notifier: N) -> Self {
        NotifierOption::Embedded(Arc::new(notifier))
    }
}

impl fmt::Debug for NotifierOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NotifierOption::Embedded(n) => f.debug_tuple("Embedded").field(&n.name()).finish(),
            NotifierOption::Address(a) => f.debug_tuple("Address").field(a).finish(),
        }
    }
}

/// Construction-time options of a [`crate::NotificationClient`].
///
/// Every endpoint field is optional; the resolver merges what is set over the
/// built-in defaults and decides whether the result is usable.
#[derive(Debug, Clone, Deserialize)]
pub struct ClientOptions {
    #[serde(default)]
    pub protocol: Option<String>,

    #[serde(default)]
    pub host: Option<String>,

    /// Alias of `host`; `host` wins when both are set
    #[serde(default)]
    pub hostname: Option<String>,

    /// Accepts a number or a numeric string
    #[serde(default, deserialize_with = "deserialize_port")]
    pub port: Option<u16>,

    #[serde(default)]
    pub path: Option<String>,

    /// Static access token, sent as the `access_token` query parameter
    #[serde(default)]
    pub token: Option<String>,

    /// Single endpoint URL, alternative to the discrete fields
    #[serde(default)]
    pub url: Option<String>,

    /// Only the connection-string form can come from files or env
    #[serde(default, deserialize_with = "deserialize_notifier")]
    pub notifier: Option<NotifierOption>,

    /// Upper bound on a single dispatch; 0 disables the timeout.
    /// Accepts a number or a numeric string
    #[serde(
        default = "default_timeout_seconds",
        deserialize_with = "deserialize_timeout_seconds"
    )]
    pub timeout_seconds: u64,

    #[serde(default)]
    pub port_policy: PortPolicy,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            protocol: None,
            host: None,
            hostname: None,
            port: None,
            path: None,
            token: None,
            url: None,
            notifier: None,
            timeout_seconds: default_timeout_seconds(),
            port_policy: PortPolicy::default(),
        }
    }
}

impl ClientOptions {
    /// Options for the single-URL form
    pub fn with_url(url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            token: Some(token.into()),
            ..Default::default()
        }
    }

    /// Options for an in-process notifier
    pub fn with_notifier<N: Notifier + 'static>(notifier: N) -> Self {
        Self {
            notifier: Some(NotifierOption::embedded(notifier)),
            ..Default::default()
        }
    }

    /// Whether the caller set any of the discrete endpoint fields
    pub fn has_discrete_fields(&self) -> bool {
        self.protocol.is_some()
            || self.host.is_some()
            || self.hostname.is_some()
            || self.port.is_some()
            || self.path.is_some()
    }
}

fn deserialize_port<'de, D>(deserializer: D) -> Result<Option<u16>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum PortValue {
        Number(u16),
        Text(String),
    }

    match Option::<PortValue>::deserialize(deserializer)? {
        None => Ok(None),
        Some(PortValue::Number(port)) => Ok(Some(port)),
        Some(PortValue::Text(text)) if text.trim().is_empty() => Ok(None),
        Some(PortValue::Text(text)) => text
            .trim()
            .parse::<u16>()
            .map(Some)
            .map_err(|_| serde::de::Error::custom(format!("invalid port '{}'", text))),
    }
}

fn deserialize_timeout_seconds<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum SecondsValue {
        Number(u64),
        Text(String),
    }

    match SecondsValue::deserialize(deserializer)? {
        SecondsValue::Number(secs) => Ok(secs),
        SecondsValue::Text(text) => text.trim().parse::<u64>().map_err(|_| {
            serde::de::Error::custom(format!("invalid timeout_seconds '{}'", text))
        }),
    }
}

fn deserialize_notifier<'de, D>(deserializer: D) -> Result<Option<NotifierOption>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.map(NotifierOption::Address))
}

// ============================================================================
// Logger Settings
// ============================================================================

/// Console output settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsoleSettings {
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default = "default_true")]
    pub colored: bool,
}

impl Default for ConsoleSettings {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            colored: default_true(),
        }
    }
}

/// File output settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileSettings {
    #[serde(default)]
    pub enabled: bool,

    #[serde(default = "default_log_path")]
    pub path: String,

    /// Whether to append to an existing file
    #[serde(default = "default_true")]
    pub append: bool,

    /// Log format: "full", "compact", or "json"
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for FileSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            path: default_log_path(),
            append: default_true(),
            format: default_log_format(),
        }
    }
}

/// Logger configuration settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggerSettings {
    /// Log level: "trace", "debug", "info", "warn", "error"
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default)]
    pub console: ConsoleSettings,

    #[serde(default)]
    pub file: FileSettings,
}

impl Default for LoggerSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            console: ConsoleSettings::default(),
            file: FileSettings::default(),
        }
    }
}

impl LoggerSettings {
    /// Convert the file representation into the runtime `LoggerConfig`
    pub fn into_logger_config(self) -> Result<LoggerConfig, ConfigError> {
        let console_config = ConsoleConfig::new(self.console.enabled, self.console.colored);
        let file_config = self.file.into_file_config()?;

        LoggerConfig::new(console_config, file_config, self.level).map_err(|e| {
            ConfigError::ValidationError {
                field: "logger".to_string(),
                message: e.to_string(),
            }
        })
    }
}

impl FileSettings {
    pub fn into_file_config(self) -> Result<FileConfig, ConfigError> {
        let format = self.parse_format()?;

        FileConfig::new(self.enabled, PathBuf::from(self.path), self.append, format).map_err(
            |e| ConfigError::ValidationError {
                field: "logger.file".to_string(),
                message: e.to_string(),
            },
        )
    }

    fn parse_format(&self) -> Result<LogFormat, ConfigError> {
        self.format
            .parse::<LogFormat>()
            .map_err(|e| ConfigError::ValidationError {
                field: "logger.file.format".to_string(),
                message: e.to_string(),
            })
    }
}

// ============================================================================
// Main Settings Structure
// ============================================================================

/// Everything [`crate::config::ConfigLoader`] produces
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Settings {
    #[serde(default)]
    pub client: ClientOptions,

    #[serde(default)]
    pub logger: LoggerSettings,
}
