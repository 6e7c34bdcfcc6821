//! Notifier Client Library
//!
//! Fluent client for submitting notification events (recipient, event name,
//! payload) to a notification service, either over HTTP or through an
//! in-process notifier.
//!
//! ```ignore
//! use notifier_client::{ClientOptions, NotificationClient};
//!
//! let mut client = NotificationClient::new(ClientOptions {
//!     url: Some("http://localhost:9001/api/events".to_string()),
//!     token: Some("abc".to_string()),
//!     ..Default::default()
//! });
//!
//! let response = client.notify("signup").to("bob").send().await?;
//! ```

use shadow_rs::shadow;
shadow!(build);

pub mod cli;
pub mod config;
pub mod error;
pub mod external;
pub mod logger;
pub mod notifications;

pub use config::{ClientOptions, DefaultProfile, NotifierOption, PortPolicy};
pub use error::{NotifyError, NotifyResult};
pub use notifications::{ClientState, Event, NotificationClient, Notifier, Recipient};

/// Target used by every log line this crate emits.
pub const LOG_TARGET: &str = "notifier_client";

pub fn pkg_version() -> &'static str {
    build::PKG_VERSION
}

pub fn clap_long_version() -> &'static str {
    build::CLAP_LONG_VERSION
}
