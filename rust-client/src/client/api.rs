//! HTTP client wrapper with explicit per-client configuration.

use std::time::{Duration, Instant};

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Method};
use serde::de::DeserializeOwned;
use tracing::{info, warn};
use url::Url;

use super::error::ApiError;
use super::types::{ApiStatus, Envelope, NewWebhookEndpoint, WebhookEndpoint};

/// Settings injected into an [`ApiClient`] once, at construction.
#[derive(Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub api_key: String,
    pub tenant_id: String,
    pub timeout: Duration,
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .field("tenant_id", &self.tenant_id)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Authenticated YT Tracker API client.
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Clone, Debug)]
pub struct ApiClient {
    http: Client,
    base_url: String,
}

impl ApiClient {
    /// Build a client that attaches the bearer key and tenant header to every request.
    pub fn new(config: ClientConfig) -> Result<Self, ApiError> {
        let base_url = config.base_url.trim_end_matches('/').to_string();
        Url::parse(&base_url)
            .map_err(|e| ApiError::Config(format!("invalid base url {}: {}", base_url, e)))?;

        let mut auth = HeaderValue::from_str(&format!("Bearer {}", config.api_key))
            .map_err(|_| ApiError::Config("api key is not a valid header value".to_string()))?;
        auth.set_sensitive(true);

        let tenant = HeaderValue::from_str(&config.tenant_id)
            .map_err(|_| ApiError::Config("tenant id is not a valid header value".to_string()))?;

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);
        headers.insert("X-Tenant-Id", tenant);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let http = Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()
            .map_err(|e| ApiError::Config(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Send an authenticated request and decode the JSON response body.
    ///
    /// `path` is appended verbatim to the base URL and must start with `/`.
    pub async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<&serde_json::Value>,
    ) -> Result<T, ApiError> {
        let url = Url::parse(&format!("{}{}", self.base_url, path))
            .map_err(|e| ApiError::Config(format!("invalid request path {}: {}", path, e)))?;

        let mut request = self.http.request(method.clone(), url);
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let started = Instant::now();
        let response = match request.send().await {
            Ok(resp) => resp,
            Err(e) => {
                warn!(
                    method = %method,
                    path = path,
                    is_timeout = e.is_timeout(),
                    error = %e,
                    "api_request_transport_error"
                );
                return Err(ApiError::Transport(e));
            }
        };

        let status = response.status();
        let text = response.text().await?;

        info!(
            method = %method,
            path = path,
            status_code = status.as_u16(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            body_length = text.len(),
            "api_request_complete"
        );

        if !status.is_success() {
            return Err(ApiError::from_response(status, text));
        }

        serde_json::from_str(&text).map_err(|e| ApiError::Decode(e.to_string()))
    }

    /// Fetch API status.
    pub async fn get_status(&self) -> Result<ApiStatus, ApiError> {
        let envelope: Envelope<ApiStatus> = self.request(Method::GET, "/v1/status", &[], None).await?;
        Ok(envelope.data)
    }

    /// Register a webhook endpoint.
    pub async fn create_webhook(
        &self,
        endpoint: &NewWebhookEndpoint,
    ) -> Result<WebhookEndpoint, ApiError> {
        let body = serde_json::to_value(endpoint).map_err(|e| ApiError::Decode(e.to_string()))?;
        let envelope: Envelope<WebhookEndpoint> = self
            .request(Method::POST, "/v1/webhooks/endpoints", &[], Some(&body))
            .await?;
        Ok(envelope.data)
    }

    /// List registered webhook endpoints.
    pub async fn list_webhooks(&self) -> Result<Vec<WebhookEndpoint>, ApiError> {
        let envelope: Envelope<Vec<WebhookEndpoint>> = self
            .request(Method::GET, "/v1/webhooks/endpoints", &[], None)
            .await?;
        Ok(envelope.data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::net::SocketAddr;

    use axum::{
        extract::Query,
        http::{HeaderMap as AxumHeaders, StatusCode},
        routing::get,
        Json, Router,
    };
    use serde_json::{json, Value};
    use tokio::net::TcpListener;

    /// Echoes back the auth headers so tests can assert on them.
    async fn status_handler(headers: AxumHeaders) -> (StatusCode, Json<Value>) {
        let auth = headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        if auth != "Bearer yttr_test" {
            return (StatusCode::UNAUTHORIZED, Json(json!({ "error": "invalid api key" })));
        }
        let tenant = headers
            .get("x-tenant-id")
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        (
            StatusCode::OK,
            Json(json!({ "data": { "status": "ok", "version": tenant } })),
        )
    }

    async fn list_endpoints() -> Json<Value> {
        Json(json!({
            "data": [
                { "id": "wh_1", "url": "https://a.example/hook", "events": ["video.published"] },
                { "id": "wh_2", "url": "https://b.example/hook", "active": false }
            ]
        }))
    }

    async fn create_endpoint(Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
        let url = body["url"].as_str().unwrap_or_default().to_string();
        if !url.starts_with("https://") {
            return (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(json!({ "errors": { "url": ["must be https"] } })),
            );
        }
        (
            StatusCode::CREATED,
            Json(json!({
                "data": {
                    "id": "wh_new",
                    "url": url,
                    "events": body.get("events").cloned().unwrap_or(json!([])),
                    "description": body.get("description").cloned(),
                    "secret": "whsec_generated"
                }
            })),
        )
    }

    async fn echo_query(Query(params): Query<Vec<(String, String)>>) -> Json<Value> {
        Json(json!({ "params": params }))
    }

    async fn spawn_api() -> SocketAddr {
        let app = Router::new()
            .route("/v1/status", get(status_handler))
            .route(
                "/v1/webhooks/endpoints",
                get(list_endpoints).post(create_endpoint),
            )
            .route("/v1/echo", get(echo_query))
            .route("/v1/broken", get(|| async { "not json" }))
            .route(
                "/v1/down",
                get(|| async { (StatusCode::SERVICE_UNAVAILABLE, "maintenance") }),
            );

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        addr
    }

    fn client_for(addr: SocketAddr, api_key: &str) -> ApiClient {
        ApiClient::new(ClientConfig {
            base_url: format!("http://{}/", addr),
            api_key: api_key.to_string(),
            tenant_id: "tenant-42".to_string(),
            timeout: Duration::from_secs(5),
        })
        .unwrap()
    }

    #[test]
    fn test_invalid_base_url_rejected() {
        let result = ApiClient::new(ClientConfig {
            base_url: "not a url".to_string(),
            api_key: "k".to_string(),
            tenant_id: "public".to_string(),
            timeout: Duration::from_secs(1),
        });
        assert!(matches!(result, Err(ApiError::Config(_))));
    }

    #[test]
    fn test_invalid_header_value_rejected() {
        let result = ApiClient::new(ClientConfig {
            base_url: "http://localhost:4000".to_string(),
            api_key: "line\nbreak".to_string(),
            tenant_id: "public".to_string(),
            timeout: Duration::from_secs(1),
        });
        assert!(matches!(result, Err(ApiError::Config(_))));
    }

    #[test]
    fn test_client_config_debug_redacts_key() {
        let config = ClientConfig {
            base_url: "http://localhost:4000".to_string(),
            api_key: "yttr_very_secret".to_string(),
            tenant_id: "public".to_string(),
            timeout: Duration::from_secs(1),
        };
        assert!(!format!("{:?}", config).contains("yttr_very_secret"));
    }

    #[tokio::test]
    async fn test_get_status_sends_auth_headers() {
        let addr = spawn_api().await;
        let client = client_for(addr, "yttr_test");
        assert_eq!(client.base_url(), format!("http://{}", addr));

        let status = client.get_status().await.unwrap();
        assert_eq!(status.status, "ok");
        assert_eq!(status.version.as_deref(), Some("tenant-42"));
    }

    #[tokio::test]
    async fn test_bad_key_is_unauthorized() {
        let addr = spawn_api().await;
        let client = client_for(addr, "yttr_wrong");

        let err = client.get_status().await.unwrap_err();
        assert!(matches!(err, ApiError::Unauthorized { .. }));
        assert_eq!(err.status().map(|s| s.as_u16()), Some(401));
    }

    #[tokio::test]
    async fn test_list_webhooks() {
        let addr = spawn_api().await;
        let client = client_for(addr, "yttr_test");

        let endpoints = client.list_webhooks().await.unwrap();
        assert_eq!(endpoints.len(), 2);
        assert_eq!(endpoints[0].events, vec!["video.published".to_string()]);
        assert!(!endpoints[1].active);
    }

    #[tokio::test]
    async fn test_create_webhook_returns_secret() {
        let addr = spawn_api().await;
        let client = client_for(addr, "yttr_test");

        let endpoint = NewWebhookEndpoint::new("https://me.example/hook")
            .with_events(vec!["video.published".to_string()])
            .with_description("uploads");
        let created = client.create_webhook(&endpoint).await.unwrap();

        assert_eq!(created.id, "wh_new");
        assert_eq!(created.url, "https://me.example/hook");
        assert_eq!(created.description.as_deref(), Some("uploads"));
        assert_eq!(created.secret.as_deref(), Some("whsec_generated"));
    }

    #[tokio::test]
    async fn test_create_webhook_application_error() {
        let addr = spawn_api().await;
        let client = client_for(addr, "yttr_test");

        let err = client
            .create_webhook(&NewWebhookEndpoint::new("http://insecure.example"))
            .await
            .unwrap_err();

        match err {
            ApiError::Api { status, body, .. } => {
                assert_eq!(status.as_u16(), 422);
                assert!(body.unwrap().errors.is_some());
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_request_passes_query() {
        let addr = spawn_api().await;
        let client = client_for(addr, "yttr_test");

        let value: Value = client
            .request(Method::GET, "/v1/echo", &[("limit", "5".to_string())], None)
            .await
            .unwrap();
        assert_eq!(value["params"], json!([["limit", "5"]]));
    }

    #[tokio::test]
    async fn test_non_json_success_is_decode_error() {
        let addr = spawn_api().await;
        let client = client_for(addr, "yttr_test");

        let err = client
            .request::<Value>(Method::GET, "/v1/broken", &[], None)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
    }

    #[tokio::test]
    async fn test_non_json_error_keeps_raw_body() {
        let addr = spawn_api().await;
        let client = client_for(addr, "yttr_test");

        let err = client
            .request::<Value>(Method::GET, "/v1/down", &[], None)
            .await
            .unwrap_err();
        match err {
            ApiError::Api { status, body, raw } => {
                assert_eq!(status.as_u16(), 503);
                assert!(body.is_none());
                assert_eq!(raw, "maintenance");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_connection_refused_is_transport_error() {
        // Bind then drop to get a port with nothing listening.
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = client_for(addr, "yttr_test");
        let err = client.get_status().await.unwrap_err();
        assert!(matches!(err, ApiError::Transport(_)));
        assert!(err.status().is_none());
    }
}
