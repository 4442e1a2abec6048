//! Mapping from a failed request to a user-facing message.
//!
//! # Design Decisions
//! - Pure function of the error: no I/O, no retries
//! - Server-supplied text wins where the backend explains itself (400, 500,
//!   unlisted statuses); fixed wording everywhere else
//! - A 401 carries a deferred redirect instead of performing it

use std::time::Duration;

use crate::error::ApiError;

pub const FALLBACK_MESSAGE: &str = "An error occurred. Please try again.";
pub const INVALID_REQUEST: &str = "Invalid request. Please check your input.";
pub const AUTH_REQUIRED: &str = "Authentication required. Please login.";
pub const PERMISSION_DENIED: &str = "You do not have permission to perform this action.";
pub const NOT_FOUND: &str = "Resource not found.";
pub const TOO_MANY_REQUESTS: &str = "Too many requests. Please wait a moment and try again.";
pub const SERVER_ERROR: &str = "Server error. Please try again later.";
pub const SERVICE_UNAVAILABLE: &str = "Service temporarily unavailable. Please try again later.";
pub const NETWORK_ERROR: &str = "Network error. Please check your connection and try again.";
pub const UNEXPECTED_ERROR: &str = "An unexpected error occurred.";

/// Appended when the AI backend behind the server is not running.
pub const AI_BACKEND_SETUP_HINT: &str =
    "\n\nMake sure Ollama is running:\n1. Open a terminal\n2. Run: ollama serve\n3. Reload the page";

/// Markers the backend uses when it cannot reach the local model server.
const AI_BACKEND_MARKERS: [&str; 2] = ["Ollama", "подключиться"];

/// A redirect to perform after the message has been shown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redirect {
    pub path: String,
    pub after: Duration,
}

/// Result of classifying a terminal failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedError {
    pub status: Option<u16>,
    pub server_message: Option<String>,
    /// Text shown to the user.
    pub message: String,
    pub redirect: Option<Redirect>,
}

/// Options for [`classify`] coming from configuration.
#[derive(Debug, Clone)]
pub struct ClassifyOptions {
    pub login_path: String,
    pub auth_redirect_delay: Duration,
}

impl Default for ClassifyOptions {
    fn default() -> Self {
        Self {
            login_path: "/api/auth/login/".to_string(),
            auth_redirect_delay: Duration::from_secs(2),
        }
    }
}

fn mentions_ai_backend(text: &str) -> bool {
    AI_BACKEND_MARKERS.iter().any(|marker| text.contains(marker))
}

/// Resolve the user-facing message for an error.
pub fn classify(error: &ApiError, options: &ClassifyOptions) -> ClassifiedError {
    let status = error.status_code();
    let server_message = error.server_message().map(str::to_string);
    let mut redirect = None;

    let message = match error {
        ApiError::Status { status: code, .. } => match *code {
            400 => server_message.clone().unwrap_or_else(|| INVALID_REQUEST.to_string()),
            401 => {
                redirect = Some(Redirect {
                    path: options.login_path.clone(),
                    after: options.auth_redirect_delay,
                });
                AUTH_REQUIRED.to_string()
            }
            403 => PERMISSION_DENIED.to_string(),
            404 => NOT_FOUND.to_string(),
            429 => TOO_MANY_REQUESTS.to_string(),
            500 => match (error.body_str("error"), server_message.as_deref()) {
                (Some(msg), _) if mentions_ai_backend(msg) => {
                    format!("{}{}", msg, AI_BACKEND_SETUP_HINT)
                }
                (_, Some(msg)) => msg.to_string(),
                (_, None) => SERVER_ERROR.to_string(),
            },
            503 => SERVICE_UNAVAILABLE.to_string(),
            other => server_message
                .clone()
                .unwrap_or_else(|| format!("Error {}: {}", other, error)),
        },
        ApiError::Transport(_) => NETWORK_ERROR.to_string(),
        ApiError::Validation(e) => e.to_string(),
        ApiError::Decode(msg) | ApiError::Unexpected(msg) => {
            if msg.is_empty() {
                UNEXPECTED_ERROR.to_string()
            } else {
                msg.clone()
            }
        }
    };

    ClassifiedError {
        status,
        server_message,
        message: if message.is_empty() {
            FALLBACK_MESSAGE.to_string()
        } else {
            message
        },
        redirect,
    }
}
