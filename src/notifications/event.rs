//! Notification event sent to the service.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Who receives a notification
///
/// Stored exactly as given: a single identifier serializes as a string, a
/// list as an array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Recipient {
    One(String),
    Many(Vec<String>),
}

impl Recipient {
    /// All identifiers, in order
    pub fn ids(&self) -> Vec<&str> {
        match self {
            Recipient::One(id) => vec![id.as_str()],
            Recipient::Many(ids) => ids.iter().map(String::as_str).collect(),
        }
    }
}

impl From<&str> for Recipient {
    fn from(id: &str) -> Self {
        Recipient::One(id.to_string())
    }
}

impl From<String> for Recipient {
    fn from(id: String) -> Self {
        Recipient::One(id)
    }
}

impl From<Vec<String>> for Recipient {
    fn from(ids: Vec<String>) -> Self {
        Recipient::Many(ids)
    }
}

impl From<Vec<&str>> for Recipient {
    fn from(ids: Vec<&str>) -> Self {
        Recipient::Many(ids.into_iter().map(str::to_string).collect())
    }
}

impl From<&[&str]> for Recipient {
    fn from(ids: &[&str]) -> Self {
        Recipient::Many(ids.iter().map(|id| id.to_string()).collect())
    }
}

/// The JSON body of a notification: `{event, user, data}`, absent keys omitted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Event name, e.g. `"signup"`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<Recipient>,

    /// Additional fields for the notification template
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub data: Map<String, Value>,
}

impl Event {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            event: Some(name.into()),
            ..Default::default()
        }
    }

    pub fn to(mut self, recipient: impl Into<Recipient>) -> Self {
        self.set_recipient(recipient);
        self
    }

    pub fn with_data(mut self, data: impl Into<Value>) -> Self {
        self.merge_data(data);
        self
    }

    pub fn set_recipient(&mut self, recipient: impl Into<Recipient>) {
        self.user = Some(recipient.into());
    }

    /// Shallow-merge `data` into the `data` namespace.
    ///
    /// Keys of a mapping overwrite existing keys. Any other value is stored
    /// under `"value"`.
    pub fn merge_data(&mut self, data: impl Into<Value>) {
        match data.into() {
            Value::Object(map) => self.data.extend(map),
            other => {
                self.data.insert("value".to_string(), other);
            }
        }
    }

    /// No name, no recipient and no data
    pub fn is_empty(&self) -> bool {
        self.event.is_none() && self.user.is_none() && self.data.is_empty()
    }
}
