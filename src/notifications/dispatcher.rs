//! Remote delivery: one POST per event and the mapping of its outcome.

use reqwest::header::ACCEPT;
use serde_json::Value;
use tracing::{debug, warn};

use super::event::Event;
use super::url::{build_url, redacted_url};
use crate::LOG_TARGET;
use crate::config::Endpoint;
use crate::error::{NotifyError, NotifyResult};

/// Highest status code still counted as accepted
const MAX_SUCCESS_STATUS: u16 = 201;

/// POST `event` to `endpoint` and map the response.
///
/// - transport failure → `NotifyError::Transport`
/// - status > 201 or a non-null `error` field → `NotifyError::Application`
/// - otherwise the decoded body
pub(crate) async fn post_event(
    http: &reqwest::Client,
    endpoint: &Endpoint,
    event: &Event,
) -> NotifyResult<Value> {
    debug!(
        target: LOG_TARGET,
        url = %redacted_url(endpoint),
        event = ?event.event,
        "Posting notification"
    );

    let response = http
        .post(build_url(endpoint))
        .header(ACCEPT, "application/json")
        .json(event)
        .send()
        .await
        .map_err(|e| transport_error(endpoint, event, e))?;

    let status = response.status().as_u16();
    let text = response
        .text()
        .await
        .map_err(|e| transport_error(endpoint, event, e))?;

    let body = decode_body(&text, status)?;

    if status > MAX_SUCCESS_STATUS || has_error_field(&body) {
        warn!(
            target: LOG_TARGET,
            status,
            event = ?event.event,
            error = %body,
            "Notification rejected by service"
        );
        return Err(NotifyError::Application { status, body });
    }

    Ok(body)
}

fn transport_error(endpoint: &Endpoint, event: &Event, error: reqwest::Error) -> NotifyError {
    warn!(
        target: LOG_TARGET,
        url = %redacted_url(endpoint),
        event = ?event.event,
        error = %error,
        "Notification transport failed"
    );
    NotifyError::Transport(error)
}

/// Empty bodies decode as `null`. A non-JSON error body is kept as a string
/// so the caller still sees what the service said.
fn decode_body(text: &str, status: u16) -> NotifyResult<Value> {
    if text.trim().is_empty() {
        return Ok(Value::Null);
    }

    match serde_json::from_str(text) {
        Ok(body) => Ok(body),
        Err(_) if status > MAX_SUCCESS_STATUS => Ok(Value::String(text.to_string())),
        Err(e) => Err(NotifyError::Decode(e)),
    }
}

fn has_error_field(body: &Value) -> bool {
    body.get("error").is_some_and(|e| !e.is_null())
}
