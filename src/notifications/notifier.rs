//! In-process notifier abstraction.
//!
//! An embedded notifier is a drop-in substitute for the network path: the
//! client hands it the event and forwards its result unchanged.

use async_trait::async_trait;
use serde_json::Value;

use super::event::Event;
use crate::error::NotifyResult;

/// A notification service living in the same process
///
/// # Example Implementation
/// ```ignore
/// use async_trait::async_trait;
///
/// struct InboxNotifier {
///     inbox: tokio::sync::mpsc::UnboundedSender<Event>,
/// }
///
/// #[async_trait]
/// impl Notifier for InboxNotifier {
///     async fn notify(&self, event: &Event) -> NotifyResult<Value> {
///         self.inbox
///             .send(event.clone())
///             .map_err(|e| NotifyError::Embedded(e.to_string()))?;
///         Ok(serde_json::json!({}))
///     }
/// }
/// ```
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver one event.
    ///
    /// Same contract as the remote path: `Ok(body)` on success,
    /// `NotifyError::Application` when the service rejects the event.
    async fn notify(&self, event: &Event) -> NotifyResult<Value>;

    /// Name used in log lines
    fn name(&self) -> &'static str {
        "embedded"
    }
}
