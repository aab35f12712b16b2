//! Request and response types for the API.
//!
//! Only the fields the client relies on are modelled; unknown fields are
//! ignored so the API can grow without breaking deserialization.

use serde::{Deserialize, Serialize};

/// All API responses wrap their payload in a `data` field.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct Envelope<T> {
    pub data: T,
}

/// Response of `GET /v1/status`.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct ApiStatus {
    pub status: String,
    #[serde(default)]
    pub version: Option<String>,
}

/// A registered webhook endpoint.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct WebhookEndpoint {
    pub id: String,
    pub url: String,
    #[serde(default)]
    pub events: Vec<String>,
    #[serde(default)]
    pub description: Option<String>,
    /// Signing secret; the API only returns it when the endpoint is created.
    #[serde(default, skip_serializing)]
    pub secret: Option<String>,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

/// Body of `POST /v1/webhooks/endpoints`.
///
/// Optional fields are left out of the JSON entirely when absent or empty.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct NewWebhookEndpoint {
    pub url: String,
    #[serde(skip_serializing_if = "is_none_or_empty")]
    pub events: Option<Vec<String>>,
    #[serde(skip_serializing_if = "is_blank")]
    pub description: Option<String>,
}

impl NewWebhookEndpoint {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            events: None,
            description: None,
        }
    }

    pub fn with_events(mut self, events: Vec<String>) -> Self {
        self.events = Some(events);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

fn is_none_or_empty(events: &Option<Vec<String>>) -> bool {
    events.as_ref().map(|e| e.is_empty()).unwrap_or(true)
}

fn is_blank(description: &Option<String>) -> bool {
    description.as_ref().map(|d| d.is_empty()).unwrap_or(true)
}
