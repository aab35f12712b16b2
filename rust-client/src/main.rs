//! YT Tracker demo - walks through the API with an authenticated client.
//!
//! Checks API status, lists (and optionally registers) webhook endpoints,
//! then shows how a receiver verifies a signed delivery.

use anyhow::{Context, Result};
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use yttracker::{sign_payload, verify, ApiClient, Config, NewWebhookEndpoint};

/// Secret and delivery body used for the verification walkthrough.
const DEMO_SECRET: &str = "test_secret_12345";
const DEMO_PAYLOAD: &str =
    r#"{"video_id":"abc-123","youtube_id":"dQw4w9WgXcQ","title":"Test Video"}"#;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize structured JSON logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().json().flatten_event(true))
        .init();

    info!("demo_starting");

    // Load configuration from environment
    let config = Config::from_env();
    info!(
        base_url = %config.base_url,
        tenant_id = %config.tenant_id,
        request_timeout_ms = config.request_timeout_ms,
        webhook_url = ?config.webhook_url,
        "config_loaded"
    );

    let client = ApiClient::new(config.client_config()).context("Failed to create API client")?;

    // Check API status
    match client.get_status().await {
        Ok(status) => info!(
            status = %status.status,
            version = ?status.version,
            "api_status"
        ),
        Err(e) => error!(error = %e, status_code = ?e.status().map(|s| s.as_u16()), "api_status_failed"),
    }

    // Register a webhook endpoint if a public URL was provided
    if let Some(url) = &config.webhook_url {
        let mut endpoint = NewWebhookEndpoint::new(url.clone());
        if let Some(events) = &config.webhook_events {
            endpoint = endpoint.with_events(events.clone());
        }

        match client.create_webhook(&endpoint).await {
            Ok(created) => info!(
                endpoint_id = %created.id,
                url = %created.url,
                events = ?created.events,
                secret_returned = created.secret.is_some(),
                "webhook_registered"
            ),
            Err(e) => error!(error = %e, url = %url, "webhook_register_failed"),
        }
    }

    // List webhook endpoints
    match client.list_webhooks().await {
        Ok(endpoints) => {
            info!(total_endpoints = endpoints.len(), "webhooks_listed");
            for endpoint in &endpoints {
                info!(
                    endpoint_id = %endpoint.id,
                    url = %endpoint.url,
                    active = endpoint.active,
                    "webhook_endpoint"
                );
            }
        }
        Err(e) => error!(error = %e, "webhooks_list_failed"),
    }

    // Example webhook verification
    let signature = sign_payload(DEMO_PAYLOAD.as_bytes(), DEMO_SECRET.as_bytes())
        .context("Failed to sign demo payload")?;
    let is_valid = verify(DEMO_PAYLOAD.as_bytes(), &signature, DEMO_SECRET.as_bytes());
    info!(signature_valid = is_valid, "demo_signature_verified");

    let tampered = DEMO_PAYLOAD.replace("Test Video", "Tampered Video");
    let tampered_valid = verify(tampered.as_bytes(), &signature, DEMO_SECRET.as_bytes());
    if tampered_valid {
        warn!("demo_tampered_payload_accepted");
    } else {
        info!(signature_valid = tampered_valid, "demo_tampered_payload_rejected");
    }

    info!("demo_complete");

    Ok(())
}
