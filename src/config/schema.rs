//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the client.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the dashboard client.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ClientConfig {
    /// Backend connection settings.
    pub api: ApiConfig,

    /// Retry configuration for wrapped requests.
    pub retries: RetryConfig,

    /// File upload validation rules.
    pub upload: UploadConfig,

    /// Text input validation rules.
    pub text: TextConfig,

    /// Notification and redirect timing.
    pub notifications: NotificationConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Backend connection configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL of the backend (e.g., "http://127.0.0.1:8000").
    pub base_url: String,

    /// Total time allowed for one request/response in seconds.
    pub request_timeout_secs: u64,

    /// Login page the user is sent to when authentication is missing.
    pub login_path: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8000".to_string(),
            request_timeout_secs: 60,
            login_path: "/api/auth/login/".to_string(),
        }
    }
}

/// Retry configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Maximum number of attempts, including the first one.
    pub max_attempts: u32,

    /// Delay unit in milliseconds; attempt `n` waits `n` units.
    pub base_delay_ms: u64,

    /// Upper bound for a single delay in milliseconds.
    pub max_delay_ms: u64,

    /// Random jitter added to each delay, as a fraction of it.
    pub jitter_ratio: f64,

    /// Retry every failure except local validation. When false, only
    /// transport errors, 5xx, 408 and 429 are retried.
    pub retry_client_errors: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay_ms: 1000,
            max_delay_ms: 30_000,
            jitter_ratio: 0.0,
            retry_client_errors: true,
        }
    }
}

/// File upload rules.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UploadConfig {
    /// Largest accepted file in bytes.
    pub max_size_bytes: u64,

    /// Accepted MIME types.
    pub allowed_types: Vec<String>,

    /// Accepted file name extensions, with the leading dot.
    pub allowed_extensions: Vec<String>,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_size_bytes: 10 * 1024 * 1024, // 10MB
            allowed_types: [
                "audio/wav",
                "audio/mpeg",
                "audio/flac",
                "audio/ogg",
                "audio/webm",
                "audio/mp4",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            allowed_extensions: [".wav", ".mp3", ".flac", ".ogg", ".webm", ".m4a"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

/// Text input rules.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TextConfig {
    /// Minimum length in characters.
    pub min_length: usize,

    /// Maximum length in characters.
    pub max_length: usize,
}

impl Default for TextConfig {
    fn default() -> Self {
        Self {
            min_length: 1,
            max_length: 5000,
        }
    }
}

/// Notification timing.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct NotificationConfig {
    /// How long a notification stays visible in milliseconds.
    pub dismiss_after_ms: u64,

    /// Delay before redirecting to login after a 401, in milliseconds.
    pub auth_redirect_delay_ms: u64,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            dismiss_after_ms: 3000,
            auth_redirect_delay_ms: 2000,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config: ClientConfig = toml::from_str(
            r#"
            [api]
            base_url = "http://backend:9000"

            [retries]
            max_attempts = 5
            "#,
        )
        .unwrap();

        assert_eq!(config.api.base_url, "http://backend:9000");
        assert_eq!(config.api.login_path, "/api/auth/login/");
        assert_eq!(config.retries.max_attempts, 5);
        assert_eq!(config.retries.base_delay_ms, 1000);
        assert_eq!(config.upload.max_size_bytes, 10 * 1024 * 1024);
        assert_eq!(config.text.max_length, 5000);
    }

    #[test]
    fn test_empty_config_is_default() {
        let config: ClientConfig = toml::from_str("").unwrap();
        assert_eq!(config.retries.max_attempts, 3);
        assert_eq!(config.notifications.auth_redirect_delay_ms, 2000);
        assert_eq!(config.upload.allowed_extensions.len(), 6);
    }
}
