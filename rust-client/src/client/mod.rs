//! Authenticated client for the YT Tracker REST API.
//!
//! Every request carries the bearer API key and the tenant header from an
//! explicit [`ClientConfig`] supplied at construction. Non-2xx responses are
//! mapped onto [`ApiError`] so callers can tell transport failures, rejected
//! credentials, and application errors apart.

pub mod api;
pub mod error;
pub mod types;

pub use api::{ApiClient, ClientConfig};
pub use error::{ApiError, ApiErrorBody};
pub use types::{ApiStatus, Envelope, NewWebhookEndpoint, WebhookEndpoint};
