//! Notification events and the client that delivers them.
//!
//! Delivery goes either over HTTP to a remote service or straight to an
//! in-process [`Notifier`].

mod client;
mod dispatcher;
mod event;
mod notifier;

pub mod url;

pub use client::{ClientState, NotificationClient};
pub use event::{Event, Recipient};
pub use notifier::Notifier;
