//! The notification client: resolved configuration plus a fluent event builder.
//!
//! A client carries one in-flight event. Each chain starts with
//! [`NotificationClient::notify`] and ends with one of the `send` forms, which
//! move the event out of the client before dispatching it. Clones share the
//! configuration and HTTP pool but not the event; use one clone per
//! concurrent chain.

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tokio::task::JoinHandle;
use tracing::{debug, error, warn};

use super::dispatcher::post_event;
use super::event::{Event, Recipient};
use super::url::{build_url, redacted_url};
use crate::LOG_TARGET;
use crate::config::{ClientOptions, ConfigError, ConfigResolver, Configuration};
use crate::error::{NotifyError, NotifyResult};
use crate::external::HTTP_CLIENT;

/// Whether a client can dispatch at all
#[derive(Debug, Clone)]
pub enum ClientState {
    Ready(Configuration),
    /// Every send reports `NotifyError::ConfigurationIncomplete` with this reason
    Disabled(Arc<ConfigError>),
}

#[derive(Clone)]
struct Shared {
    state: ClientState,
    http: reqwest::Client,
    timeout: Option<Duration>,
}

#[derive(Clone)]
pub struct NotificationClient {
    shared: Arc<Shared>,
    event: Event,
}

impl NotificationClient {
    /// Create a client, tolerating incomplete configuration.
    ///
    /// An incomplete configuration is logged and leaves the client disabled;
    /// see [`NotificationClient::try_new`] for the strict form.
    pub fn new(options: ClientOptions) -> Self {
        Self::with_resolver(options, ConfigResolver::default())
    }

    /// Like [`NotificationClient::new`] with a specific default profile
    pub fn with_resolver(options: ClientOptions, resolver: ConfigResolver) -> Self {
        let state = match resolver.resolve(&options) {
            Ok(configuration) => ClientState::Ready(configuration),
            Err(reason) => {
                warn!(
                    target: LOG_TARGET,
                    reason = %reason,
                    "Notifier configuration incomplete, notifications are disabled"
                );
                ClientState::Disabled(Arc::new(reason))
            }
        };
        Self::from_state(state, &options)
    }

    /// Create a client, failing on incomplete configuration
    pub fn try_new(options: ClientOptions) -> Result<Self, ConfigError> {
        Self::try_with_resolver(options, ConfigResolver::default())
    }

    /// Like [`NotificationClient::try_new`] with a specific default profile
    pub fn try_with_resolver(
        options: ClientOptions,
        resolver: ConfigResolver,
    ) -> Result<Self, ConfigError> {
        let configuration = resolver.resolve(&options)?;
        Ok(Self::from_state(ClientState::Ready(configuration), &options))
    }

    fn from_state(state: ClientState, options: &ClientOptions) -> Self {
        let timeout = match options.timeout_seconds {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        };

        Self {
            shared: Arc::new(Shared {
                state,
                http: HTTP_CLIENT.clone(),
                timeout,
            }),
            event: Event::default(),
        }
    }

    /// Use a dedicated HTTP client instead of the shared one
    pub fn with_http_client(mut self, http: reqwest::Client) -> Self {
        Arc::make_mut(&mut self.shared).http = http;
        self
    }

    /// Override the dispatch timeout; `None` waits indefinitely
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        Arc::make_mut(&mut self.shared).timeout = timeout;
        self
    }

    /// `true` iff the configuration is complete for its mode
    pub fn enabled(&self) -> bool {
        matches!(self.shared.state, ClientState::Ready(_))
    }

    pub fn state(&self) -> &ClientState {
        &self.shared.state
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.shared.timeout
    }

    /// Full request URL including the token; `None` unless ready in remote mode
    pub fn request_url(&self) -> Option<String> {
        match &self.shared.state {
            ClientState::Ready(Configuration::Remote(endpoint)) => Some(build_url(endpoint)),
            _ => None,
        }
    }

    /// Request URL with the token masked
    pub fn redacted_request_url(&self) -> Option<String> {
        match &self.shared.state {
            ClientState::Ready(Configuration::Remote(endpoint)) => Some(redacted_url(endpoint)),
            _ => None,
        }
    }

    /// The event being built
    pub fn event(&self) -> &Event {
        &self.event
    }

    // ========================================================================
    // Event builder
    // ========================================================================

    /// Start a fresh event named `name`, discarding any partial one
    pub fn notify(&mut self, name: impl Into<String>) -> &mut Self {
        self.event = Event::new(name);
        self
    }

    pub fn to(&mut self, recipient: impl Into<Recipient>) -> &mut Self {
        self.event.set_recipient(recipient);
        self
    }

    /// Shallow-merge into the event's `data`; a non-mapping value lands
    /// under `"value"`
    pub fn with_data(&mut self, data: impl Into<Value>) -> &mut Self {
        self.event.merge_data(data);
        self
    }

    // ========================================================================
    // Dispatch
    // ========================================================================

    /// Replace the current event with `event` and dispatch it immediately
    pub async fn notify_event(&mut self, event: Event) -> NotifyResult<Value> {
        self.event = event;
        self.send().await
    }

    /// Dispatch the current event and wait for the outcome
    pub async fn send(&mut self) -> NotifyResult<Value> {
        let event = std::mem::take(&mut self.event);
        self.shared.dispatch(event).await
    }

    /// Dispatch the current event on the tokio runtime and hand the outcome
    /// to `callback`
    pub fn send_with<F>(&mut self, callback: F) -> JoinHandle<()>
    where
        F: FnOnce(NotifyResult<Value>) + Send + 'static,
    {
        let event = std::mem::take(&mut self.event);
        let shared = Arc::clone(&self.shared);

        tokio::spawn(async move {
            callback(shared.dispatch(event).await);
        })
    }

    /// Fire and forget; failures are logged at error level
    pub fn send_detached(&mut self) -> JoinHandle<()> {
        self.send_with(log_unhandled)
    }
}

impl Shared {
    async fn dispatch(&self, event: Event) -> NotifyResult<Value> {
        let configuration = match &self.state {
            ClientState::Ready(configuration) => configuration,
            ClientState::Disabled(reason) => {
                warn!(
                    target: LOG_TARGET,
                    event = ?event.event,
                    reason = %reason,
                    "Notifier disabled, notification not sent"
                );
                return Err(NotifyError::ConfigurationIncomplete(Arc::clone(reason)));
            }
        };

        let delivery = async {
            match configuration {
                Configuration::Embedded(notifier) => {
                    debug!(
                        target: LOG_TARGET,
                        notifier = notifier.name(),
                        event = ?event.event,
                        "Delivering notification in process"
                    );
                    let result = notifier.notify(&event).await;
                    if let Err(ref e) = result {
                        warn!(
                            target: LOG_TARGET,
                            notifier = notifier.name(),
                            event = ?event.event,
                            error = %e,
                            "Embedded notifier failed"
                        );
                    }
                    result
                }
                Configuration::Remote(endpoint) => post_event(&self.http, endpoint, &event).await,
            }
        };

        match self.timeout {
            Some(limit) => match tokio::time::timeout(limit, delivery).await {
                Ok(result) => result,
                Err(_) => {
                    warn!(
                        target: LOG_TARGET,
                        event = ?event.event,
                        timeout = ?limit,
                        "Notification timed out"
                    );
                    Err(NotifyError::Timeout(limit))
                }
            },
            None => delivery.await,
        }
    }
}

fn log_unhandled(result: NotifyResult<Value>) {
    if let Err(e) = result {
        error!(target: LOG_TARGET, error = %e, "Unhandled notification failure");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DefaultProfile, NotifierOption};
    use crate::notifications::Notifier;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Mutex;

    /// Records every event and answers with a fixed result
    #[derive(Default)]
    struct RecordingNotifier {
        events: Mutex<Vec<Event>>,
        reject: bool,
    }

    #[async_trait]
    impl Notifier for RecordingNotifier {
        async fn notify(&self, event: &Event) -> NotifyResult<Value> {
            self.events.lock().unwrap().push(event.clone());
            if self.reject {
                Err(NotifyError::Application {
                    status: 422,
                    body: json!({"error": "invalid"}),
                })
            } else {
                Ok(json!({"delivered": true}))
            }
        }

        fn name(&self) -> &'static str {
            "recording"
        }
    }

    fn embedded(notifier: &Arc<RecordingNotifier>) -> NotificationClient {
        NotificationClient::new(ClientOptions {
            notifier: Some(NotifierOption::Embedded(notifier.clone())),
            ..Default::default()
        })
    }

    #[test]
    fn test_enabled_reflects_configuration() {
        assert!(NotificationClient::new(ClientOptions::with_url(
            "http://localhost:9001/api/events",
            "abc"
        ))
        .enabled());

        let disabled = NotificationClient::new(ClientOptions::default());
        assert!(!disabled.enabled());
        assert!(matches!(disabled.state(), ClientState::Disabled(_)));
        assert!(disabled.request_url().is_none());
    }

    #[test]
    fn test_try_new_surfaces_reason() {
        let err = NotificationClient::try_new(ClientOptions {
            host: Some("notify.example.com".to_string()),
            ..Default::default()
        })
        .err()
        .unwrap();
        assert!(matches!(err, ConfigError::Missing { ref field } if field == "token"));
    }

    #[test]
    fn test_try_with_resolver_uses_profile() {
        let options = ClientOptions {
            token: Some("abc".to_string()),
            ..Default::default()
        };

        let discrete = NotificationClient::try_with_resolver(
            options.clone(),
            ConfigResolver::new(DefaultProfile::Discrete),
        )
        .unwrap();
        assert_eq!(
            discrete.request_url().as_deref(),
            Some("http://localhost/api/events?access_token=abc")
        );

        let single_url = NotificationClient::try_new(options).unwrap();
        assert_eq!(
            single_url.request_url().as_deref(),
            Some("http://localhost:9001/api/events?access_token=abc")
        );

        let err = NotificationClient::try_with_resolver(
            ClientOptions::default(),
            ConfigResolver::new(DefaultProfile::Discrete),
        )
        .err()
        .unwrap();
        assert!(matches!(err, ConfigError::Missing { ref field } if field == "token"));
    }

    #[test]
    fn test_request_url() {
        let client = NotificationClient::new(ClientOptions::with_url(
            "http://localhost:9001/api/events",
            "abc",
        ));
        assert_eq!(
            client.request_url().as_deref(),
            Some("http://localhost:9001/api/events?access_token=abc")
        );
        assert_eq!(
            client.redacted_request_url().as_deref(),
            Some("http://localhost:9001/api/events?access_token=***")
        );
    }

    #[test]
    fn test_timeout_configuration() {
        let client = NotificationClient::new(ClientOptions::default());
        assert_eq!(client.timeout(), Some(Duration::from_secs(30)));

        let client = NotificationClient::new(ClientOptions {
            timeout_seconds: 0,
            ..Default::default()
        });
        assert_eq!(client.timeout(), None);

        let client = client.with_timeout(Some(Duration::from_millis(250)));
        assert_eq!(client.timeout(), Some(Duration::from_millis(250)));
    }

    #[test]
    fn test_builder_chain() {
        let mut client = NotificationClient::new(ClientOptions::default());
        client
            .notify("signup")
            .to("bob")
            .with_data(json!({"a": 1}))
            .with_data(json!({"b": 2}));

        assert_eq!(
            serde_json::to_value(client.event()).unwrap(),
            json!({"event": "signup", "user": "bob", "data": {"a": 1, "b": 2}})
        );

        client.notify("other");
        assert_eq!(serde_json::to_value(client.event()).unwrap(), json!({"event": "other"}));
    }

    #[tokio::test]
    async fn test_disabled_send_reports_incomplete_configuration() {
        let mut client = NotificationClient::new(ClientOptions {
            url: Some("http://localhost:9001/api/events".to_string()),
            ..Default::default()
        });

        let err = client.notify("signup").to("bob").send().await.unwrap_err();
        assert!(err.is_disabled());
        assert!(client.event().is_empty());
    }

    #[tokio::test]
    async fn test_embedded_send_delivers_in_process() {
        let notifier = Arc::new(RecordingNotifier::default());
        let mut client = embedded(&notifier);
        assert!(client.enabled());
        assert!(client.request_url().is_none());

        let body = client.notify("signup").to("bob").send().await.unwrap();
        assert_eq!(body, json!({"delivered": true}));

        let events = notifier.events.lock().unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(
            serde_json::to_value(&events[0]).unwrap(),
            json!({"event": "signup", "user": "bob"})
        );
    }

    #[tokio::test]
    async fn test_embedded_wins_over_remote_fields() {
        let notifier = Arc::new(RecordingNotifier::default());
        let mut client = NotificationClient::new(ClientOptions {
            notifier: Some(NotifierOption::Embedded(notifier.clone())),
            url: Some("http://127.0.0.1:1/api/events".to_string()),
            token: Some("abc".to_string()),
            ..Default::default()
        });

        client.notify("x").send().await.unwrap();
        assert_eq!(notifier.events.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_embedded_rejection_is_forwarded() {
        let notifier = Arc::new(RecordingNotifier {
            reject: true,
            ..Default::default()
        });
        let mut client = embedded(&notifier);

        let err = client.notify("x").send().await.unwrap_err();
        assert_eq!(err.body(), Some(&json!({"error": "invalid"})));
    }

    #[tokio::test]
    async fn test_notify_event_and_chain_produce_same_body() {
        let notifier = Arc::new(RecordingNotifier::default());
        let mut client = embedded(&notifier);

        client
            .notify_event(Event::new("x").to("u"))
            .await
            .unwrap();
        client.notify("x").to("u").send().await.unwrap();

        let events = notifier.events.lock().unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0], events[1]);
    }

    #[tokio::test]
    async fn test_send_with_invokes_callback() {
        let notifier = Arc::new(RecordingNotifier::default());
        let mut client = embedded(&notifier);
        let (tx, rx) = tokio::sync::oneshot::channel();

        client.notify("x").send_with(move |result| {
            let _ = tx.send(result);
        });

        let result = rx.await.unwrap();
        assert_eq!(result.unwrap(), json!({"delivered": true}));
        assert!(client.event().is_empty());
    }

    #[tokio::test]
    async fn test_send_with_on_disabled_client_still_calls_back() {
        let mut client = NotificationClient::new(ClientOptions::default());
        let (tx, rx) = tokio::sync::oneshot::channel();

        client.notify("x").send_with(move |result| {
            let _ = tx.send(result);
        });

        assert!(rx.await.unwrap().unwrap_err().is_disabled());
    }

    #[tokio::test]
    async fn test_send_detached_completes() {
        let mut client = NotificationClient::new(ClientOptions::default());
        client.notify("x").send_detached().await.unwrap();
    }

    #[tokio::test]
    async fn test_embedded_timeout() {
        struct SlowNotifier;

        #[async_trait]
        impl Notifier for SlowNotifier {
            async fn notify(&self, _event: &Event) -> NotifyResult<Value> {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Ok(Value::Null)
            }
        }

        let mut client = NotificationClient::new(ClientOptions::with_notifier(SlowNotifier))
            .with_timeout(Some(Duration::from_millis(20)));

        let err = client.notify("x").send().await.unwrap_err();
        assert!(matches!(err, NotifyError::Timeout(d) if d == Duration::from_millis(20)));
    }
}
