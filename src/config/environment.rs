//! Deployment stage, which picks the `{stage}.toml` configuration layer

use std::fmt;
use std::str::FromStr;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::config::error::ConfigError;

/// Deployment stage of the process embedding the client
///
/// Also accepted by the CLI's `--env` flag, with the same aliases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    #[value(alias = "dev")]
    Development,
    Test,
    #[value(alias = "stage")]
    Staging,
    #[value(alias = "prod")]
    Production,
}

impl Environment {
    /// Selects the stage when no `--env` flag is given
    pub const ENV_VAR: &'static str = "NOTIFIER_APP_ENV";

    const ALL: [Environment; 4] = [
        Environment::Development,
        Environment::Test,
        Environment::Staging,
        Environment::Production,
    ];

    /// Stage named by `NOTIFIER_APP_ENV`, or `Development` when unset.
    /// An unrecognised value is an error.
    pub fn from_env() -> Result<Self, ConfigError> {
        match std::env::var(Self::ENV_VAR) {
            Ok(value) if !value.trim().is_empty() => value.parse(),
            _ => Ok(Self::default()),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Test => "test",
            Environment::Staging => "staging",
            Environment::Production => "production",
        }
    }

    fn short_name(&self) -> Option<&'static str> {
        match self {
            Environment::Development => Some("dev"),
            Environment::Staging => Some("stage"),
            Environment::Production => Some("prod"),
            Environment::Test => None,
        }
    }

    /// File name of this stage's configuration layer
    pub fn layer_file(&self) -> String {
        format!("{}.toml", self.as_str())
    }
}

impl FromStr for Environment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();

        Self::ALL
            .into_iter()
            .find(|env| env.as_str() == wanted || env.short_name() == Some(wanted.as_str()))
            .ok_or_else(|| {
                let names: Vec<&str> = Self::ALL.iter().map(Environment::as_str).collect();
                ConfigError::EnvVarError(format!(
                    "{}='{}' is not a known stage (expected one of: {})",
                    Self::ENV_VAR,
                    s,
                    names.join(", ")
                ))
            })
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
