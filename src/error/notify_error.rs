use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use thiserror::Error;

use crate::config::error::ConfigError;

/// Every outcome of a dispatch that is not a success.
///
/// Errors are never raised out of band: a disabled client, a refused
/// connection and a rejecting server all arrive through the same `Result`
/// that carries the response body on success.
#[derive(Error, Debug)]
pub enum NotifyError {
    /// The client configuration is incomplete, nothing was dispatched
    #[error("Notifier disabled: {0}")]
    ConfigurationIncomplete(#[source] Arc<ConfigError>),

    /// Connection-level failure (refused connection, DNS failure, TLS, ...)
    #[error("Transport error: {0}")]
    Transport(#[source] reqwest::Error),

    /// The dispatch did not complete within the configured timeout
    #[error("Notification timed out after {0:?}")]
    Timeout(Duration),

    /// The service answered but signaled failure
    #[error("Notification rejected with status {status}: {body}")]
    Application { status: u16, body: Value },

    /// A successful response whose body is not valid JSON
    #[error("Failed to decode response body: {0}")]
    Decode(#[source] serde_json::Error),

    /// An embedded notifier failed without a structured body
    #[error("Embedded notifier failed: {0}")]
    Embedded(String),
}

impl NotifyError {
    /// Structured error body returned by the service, if any
    pub fn body(&self) -> Option<&Value> {
        match self {
            NotifyError::Application { body, .. } => Some(body),
            _ => None,
        }
    }

    /// HTTP status code of an application failure
    pub fn status(&self) -> Option<u16> {
        match self {
            NotifyError::Application { status, .. } => Some(*status),
            NotifyError::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    pub fn is_disabled(&self) -> bool {
        matches!(self, NotifyError::ConfigurationIncomplete(_))
    }
}

impl From<reqwest::Error> for NotifyError {
    fn from(error: reqwest::Error) -> Self {
        NotifyError::Transport(error)
    }
}

impl From<ConfigError> for NotifyError {
    fn from(error: ConfigError) -> Self {
        NotifyError::ConfigurationIncomplete(Arc::new(error))
    }
}

/// Type alias for Result with NotifyError
pub type NotifyResult<T> = Result<T, NotifyError>;
