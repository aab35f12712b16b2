//! YT Tracker client library.
//!
//! This library provides shared modules for the two binaries:
//! - `yttracker-demo`: Walks through the API (status, webhook endpoints) and
//!   demonstrates signature verification
//! - `yttracker-receiver`: Thin web server that verifies signed webhook deliveries
//!
//! ## Architecture
//!
//! ```text
//! Demo → ApiClient → YT Tracker API → signed webhook → Receiver → WebhookVerifier
//! ```

pub mod client;
pub mod config;
pub mod signature;
pub mod web;

// Re-export commonly used types
pub use client::{ApiClient, ApiError, ClientConfig, NewWebhookEndpoint, WebhookEndpoint};
pub use config::Config;
pub use signature::{
    sign_payload, try_verify, verify, PrefixPolicy, SignatureError, WebhookVerifier,
    SIGNATURE_HEADER, SIGNATURE_PREFIX,
};
pub use web::AppState;
