//! Error taxonomy shared by the API client and the resilience wrapper.
//!
//! # Taxonomy
//! - Validation: raised locally before any network call, never retried
//! - Transport: the request was sent but no response came back
//! - Status: a response arrived with an error status code
//! - Decode: a complete body arrived but did not match the expected shape
//! - Unexpected: the request was never made (bad URL, unreadable file)

use serde_json::Value;
use thiserror::Error;

use crate::validation::ValidationError;

/// Errors produced by wrapped actions.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("no response received: {0}")]
    Transport(String),

    #[error("request failed with status {status}")]
    Status {
        status: u16,
        /// Parsed JSON body, when the server sent one.
        body: Option<Value>,
    },

    #[error("invalid response body: {0}")]
    Decode(String),

    #[error("{0}")]
    Unexpected(String),
}

impl ApiError {
    /// Build a status error from a raw response body.
    pub fn status(status: u16, raw_body: &str) -> Self {
        let body = serde_json::from_str::<Value>(raw_body).ok();
        ApiError::Status { status, body }
    }

    /// HTTP status code, if a response was received.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Message supplied by the server in the `error` or `message` field.
    pub fn server_message(&self) -> Option<&str> {
        let ApiError::Status { body: Some(body), .. } = self else {
            return None;
        };
        ["error", "message"]
            .iter()
            .filter_map(|key| body.get(*key))
            .find_map(|v| v.as_str().filter(|msg| !msg.is_empty()))
    }

    /// Non-empty string at `key` in the response body.
    pub fn body_str(&self, key: &str) -> Option<&str> {
        let ApiError::Status { body: Some(body), .. } = self else {
            return None;
        };
        body.get(key).and_then(Value::as_str).filter(|s| !s.is_empty())
    }

    /// Short label for logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            ApiError::Validation(_) => "validation",
            ApiError::Transport(_) => "transport",
            ApiError::Status { .. } => "status",
            ApiError::Decode(_) => "decode",
            ApiError::Unexpected(_) => "unexpected",
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            return ApiError::Status {
                status: status.as_u16(),
                body: None,
            };
        }
        if err.is_builder() {
            return ApiError::Unexpected(err.to_string());
        }
        // Body, decode and timeout errors: the response never fully arrived.
        ApiError::Transport(err.to_string())
    }
}
