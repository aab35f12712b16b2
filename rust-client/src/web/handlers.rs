//! Webhook endpoint handlers.
//!
//! The delivery handler takes the body as raw bytes so the signature is
//! checked against exactly what was sent, then parses the JSON.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::Serialize;
use serde_json::Value;
use tracing::{info, warn};

use crate::signature::{is_signature_verification_enabled, WebhookVerifier, SIGNATURE_HEADER};
use crate::Config;

/// Shared application state.
#[derive(Clone, Debug, Default)]
pub struct AppState {
    pub verifier: Option<Arc<WebhookVerifier>>,
}

impl AppState {
    pub fn new(verifier: Option<WebhookVerifier>) -> Self {
        Self {
            verifier: verifier.map(Arc::new),
        }
    }

    /// Build the state from configuration; verification is off without a secret.
    pub fn from_config(config: &Config) -> Self {
        let verifier = if is_signature_verification_enabled(&config.webhook_secret) {
            config
                .webhook_secret
                .as_deref()
                .map(|secret| WebhookVerifier::new(secret).with_policy(config.prefix_policy))
        } else {
            None
        };
        Self::new(verifier)
    }
}

// =============================================================================
// Health Check
// =============================================================================

/// Health check response.
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Health check endpoint.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

// =============================================================================
// YT Tracker Webhook
// =============================================================================

/// Fields of a delivery the receiver logs.
///
/// Fields that are absent or not strings are left as `None`; other fields are ignored.
#[derive(Debug, Default, PartialEq)]
pub struct WebhookEvent {
    pub event: Option<String>,
    pub video_id: Option<String>,
    pub youtube_id: Option<String>,
    pub title: Option<String>,
}

impl WebhookEvent {
    /// Summarize any JSON value; non-object bodies yield an empty summary.
    pub fn from_value(value: &Value) -> Self {
        let field = |name: &str| value.get(name).and_then(Value::as_str).map(str::to_string);
        Self {
            event: field("event"),
            video_id: field("video_id"),
            youtube_id: field("youtube_id"),
            title: field("title"),
        }
    }
}

/// Webhook response.
#[derive(Serialize)]
pub struct WebhookResponse {
    pub status: &'static str,
}

fn respond(status: StatusCode, body: &'static str) -> (StatusCode, Json<WebhookResponse>) {
    (status, Json(WebhookResponse { status: body }))
}

/// YT Tracker webhook endpoint.
///
/// This endpoint:
/// 1. Verifies the X-Signature header over the raw body (if a secret is configured)
/// 2. Parses the JSON event
/// 3. Returns 200 OK
pub async fn tracker_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> impl IntoResponse {
    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok());

    info!(
        body_length = body.len(),
        has_signature = signature.is_some(),
        "tracker_webhook_received"
    );

    match (&state.verifier, signature) {
        (Some(verifier), Some(signature)) => {
            if !verifier.verify(&body, signature) {
                warn!(body_length = body.len(), "tracker_signature_invalid");
                return respond(StatusCode::UNAUTHORIZED, "unauthorized");
            }
        }
        (Some(_), None) => {
            warn!("tracker_signature_missing");
            return respond(StatusCode::UNAUTHORIZED, "unauthorized");
        }
        (None, _) => {
            // No secret configured, allow through
            warn!("tracker_signature_not_configured");
        }
    }

    let event = match serde_json::from_slice::<Value>(&body) {
        Ok(value) => WebhookEvent::from_value(&value),
        Err(e) => {
            warn!(error = %e, "tracker_webhook_invalid_payload");
            return respond(StatusCode::BAD_REQUEST, "invalid_payload");
        }
    };

    info!(
        event = ?event.event,
        video_id = ?event.video_id,
        youtube_id = ?event.youtube_id,
        title = ?event.title,
        "tracker_webhook_accepted"
    );

    respond(StatusCode::OK, "accepted")
}
