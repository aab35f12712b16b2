//! Web server module for receiving signed YT Tracker webhooks.
//!
//! Deliveries are authenticated against the shared secret before the body
//! is parsed. Unsigned or mis-signed deliveries get 401.

pub mod handlers;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

pub use handlers::{health, tracker_webhook, AppState, HealthResponse, WebhookEvent, WebhookResponse};

/// Build the receiver router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/webhooks/yt-tracker", post(tracker_webhook))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
