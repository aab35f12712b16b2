//! Error types for API requests.

use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

/// Error payload returned by the API on non-2xx responses.
///
/// The API reports either a single `error` message or a map of field
/// `errors`; both are kept as raw JSON.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub error: Option<serde_json::Value>,
    #[serde(default)]
    pub errors: Option<serde_json::Value>,
}

impl ApiErrorBody {
    /// Best-effort single-line message.
    pub fn message(&self) -> Option<String> {
        let value = self.error.as_ref().or(self.errors.as_ref())?;
        Some(match value {
            serde_json::Value::String(s) => s.clone(),
            serde_json::Value::Object(map) => map
                .get("message")
                .and_then(|m| m.as_str())
                .map(str::to_string)
                .unwrap_or_else(|| value.to_string()),
            other => other.to_string(),
        })
    }
}

/// Errors that can occur while calling the API.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Client could not be built from the supplied settings
    #[error("Invalid client configuration: {0}")]
    Config(String),

    /// Request never produced an HTTP response (connect, TLS, timeout)
    #[error("HTTP transport failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// API key was rejected
    #[error("Authentication failed with status {status}")]
    Unauthorized { status: StatusCode },

    /// API answered with an application error
    #[error("API error {status}: {}", describe(.body, .raw))]
    Api {
        status: StatusCode,
        body: Option<ApiErrorBody>,
        raw: String,
    },

    /// Successful response whose body was not the expected JSON
    #[error("Failed to decode response: {0}")]
    Decode(String),
}

fn describe(body: &Option<ApiErrorBody>, raw: &str) -> String {
    body.as_ref()
        .and_then(|b| b.message())
        .unwrap_or_else(|| raw.to_string())
}

impl ApiError {
    /// HTTP status of the response, if one was received.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Unauthorized { status } | ApiError::Api { status, .. } => Some(*status),
            ApiError::Transport(e) => e.status(),
            _ => None,
        }
    }

    /// Map a non-2xx response to an error.
    pub(crate) fn from_response(status: StatusCode, raw: String) -> Self {
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return ApiError::Unauthorized { status };
        }

        let body = serde_json::from_str::<ApiErrorBody>(&raw)
            .ok()
            .filter(|b| b.error.is_some() || b.errors.is_some());

        ApiError::Api { status, body, raw }
    }
}
