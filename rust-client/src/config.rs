//! Configuration module for environment variable parsing.
//!
//! Reads all configuration from environment variables. Secrets are kept out
//! of the `Debug` representation.

use std::env;
use std::fmt;
use std::time::Duration;

use tracing::warn;

use crate::client::ClientConfig;
use crate::signature::PrefixPolicy;

/// Application configuration loaded from environment variables.
#[derive(Clone)]
pub struct Config {
    /// Base URL of the YT Tracker API, without a trailing slash
    pub base_url: String,

    /// API key sent as a bearer token
    pub api_key: String,

    /// Tenant sent in the X-Tenant-Id header
    pub tenant_id: String,

    /// HTTP request timeout in milliseconds
    pub request_timeout_ms: u64,

    // =========================================================================
    // Webhook Receiver Configuration
    // =========================================================================

    /// Port for the webhook receiver to listen on
    pub port: u16,

    /// Shared secret for webhook signature verification
    pub webhook_secret: Option<String>,

    /// Treatment of signature headers without the sha256= tag
    pub prefix_policy: PrefixPolicy,

    /// Public URL to register as a webhook endpoint (demo only)
    pub webhook_url: Option<String>,

    /// Event types to subscribe the registered endpoint to
    pub webhook_events: Option<Vec<String>>,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Config {
            base_url: env::var("YT_TRACKER_URL")
                .unwrap_or_else(|_| "http://localhost:4000".to_string())
                .trim_end_matches('/')
                .to_string(),

            api_key: env::var("YT_TRACKER_API_KEY")
                .unwrap_or_else(|_| "yttr_YOUR_KEY_HERE".to_string()),

            tenant_id: env::var("YT_TRACKER_TENANT_ID").unwrap_or_else(|_| "public".to_string()),

            request_timeout_ms: parse_timeout("REQUEST_TIMEOUT_MS", 10_000),

            port: env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(8080),

            webhook_secret: env::var("WEBHOOK_SECRET").ok().filter(|s| !s.trim().is_empty()),

            prefix_policy: parse_policy("SIGNATURE_PREFIX_POLICY"),

            webhook_url: env::var("WEBHOOK_URL").ok().filter(|s| !s.trim().is_empty()),

            webhook_events: parse_csv("WEBHOOK_EVENTS"),
        }
    }

    /// Build the API client settings from this configuration.
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            base_url: self.base_url.clone(),
            api_key: self.api_key.clone(),
            tenant_id: self.tenant_id.clone(),
            timeout: Duration::from_millis(self.request_timeout_ms),
        }
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("base_url", &self.base_url)
            .field("api_key_set", &!self.api_key.is_empty())
            .field("tenant_id", &self.tenant_id)
            .field("request_timeout_ms", &self.request_timeout_ms)
            .field("port", &self.port)
            .field("webhook_secret_set", &self.webhook_secret.is_some())
            .field("prefix_policy", &self.prefix_policy)
            .field("webhook_url", &self.webhook_url)
            .field("webhook_events", &self.webhook_events)
            .finish()
    }
}

/// Parse a timeout in milliseconds; zero or unparsable values fall back to the default.
fn parse_timeout(name: &str, default: u64) -> u64 {
    let raw = match env::var(name) {
        Ok(v) => v,
        Err(_) => return default,
    };

    match raw.trim().parse::<u64>() {
        Ok(ms) if ms > 0 => ms,
        _ => {
            warn!(env_var = name, value = %raw, "Invalid timeout, using default");
            default
        }
    }
}

/// Parse the signature prefix policy, falling back to permissive.
fn parse_policy(name: &str) -> PrefixPolicy {
    let raw = match env::var(name) {
        Ok(v) => v,
        Err(_) => return PrefixPolicy::default(),
    };

    PrefixPolicy::parse(&raw).unwrap_or_else(|| {
        warn!(env_var = name, value = %raw, "Invalid prefix policy, using default");
        PrefixPolicy::default()
    })
}

/// Parse a comma-separated list of strings.
fn parse_csv(name: &str) -> Option<Vec<String>> {
    env::var(name).ok().map(|raw| {
        raw.split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    })
}
