//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (attempts > 0, lengths ordered, ratios in range)
//! - Check that the base URL parses
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ClientConfig → Result<(), Vec<ConfigIssue>>

use std::fmt;

use url::Url;

use crate::config::schema::ClientConfig;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigIssue {
    /// Dotted path of the offending field.
    pub field: &'static str,
    pub message: String,
}

impl fmt::Display for ConfigIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

fn issue(field: &'static str, message: impl Into<String>) -> ConfigIssue {
    ConfigIssue {
        field,
        message: message.into(),
    }
}

/// Validate a parsed configuration.
pub fn validate_config(config: &ClientConfig) -> Result<(), Vec<ConfigIssue>> {
    let mut issues = Vec::new();

    match Url::parse(&config.api.base_url) {
        Ok(url) if url.cannot_be_a_base() => {
            issues.push(issue("api.base_url", "must be an absolute http(s) URL"));
        }
        Ok(url) if url.scheme() != "http" && url.scheme() != "https" => {
            issues.push(issue("api.base_url", format!("unsupported scheme '{}'", url.scheme())));
        }
        Ok(_) => {}
        Err(e) => issues.push(issue("api.base_url", e.to_string())),
    }
    if config.api.request_timeout_secs == 0 {
        issues.push(issue("api.request_timeout_secs", "must be greater than 0"));
    }
    if !config.api.login_path.starts_with('/') {
        issues.push(issue("api.login_path", "must start with '/'"));
    }

    let retries = &config.retries;
    if retries.max_attempts == 0 {
        issues.push(issue("retries.max_attempts", "must be at least 1"));
    }
    if retries.max_delay_ms < retries.base_delay_ms {
        issues.push(issue("retries.max_delay_ms", "must not be below base_delay_ms"));
    }
    if !(0.0..=1.0).contains(&retries.jitter_ratio) {
        issues.push(issue("retries.jitter_ratio", "must be between 0.0 and 1.0"));
    }

    if config.upload.max_size_bytes == 0 {
        issues.push(issue("upload.max_size_bytes", "must be greater than 0"));
    }
    if config.upload.allowed_types.is_empty() {
        issues.push(issue("upload.allowed_types", "must not be empty"));
    }
    if config.upload.allowed_extensions.is_empty() {
        issues.push(issue("upload.allowed_extensions", "must not be empty"));
    }
    if config
        .upload
        .allowed_extensions
        .iter()
        .any(|ext| !ext.starts_with('.'))
    {
        issues.push(issue("upload.allowed_extensions", "entries must start with '.'"));
    }

    if config.text.min_length == 0 {
        issues.push(issue("text.min_length", "must be at least 1"));
    }
    if config.text.max_length < config.text.min_length {
        issues.push(issue("text.max_length", "must not be below min_length"));
    }

    if config.notifications.dismiss_after_ms == 0 {
        issues.push(issue("notifications.dismiss_after_ms", "must be greater than 0"));
    }

    if issues.is_empty() {
        Ok(())
    } else {
        Err(issues)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&ClientConfig::default()).is_ok());
    }

    #[test]
    fn test_reports_every_issue() {
        let mut config = ClientConfig::default();
        config.api.base_url = "not a url".into();
        config.retries.max_attempts = 0;
        config.text.min_length = 10;
        config.text.max_length = 5;

        let issues = validate_config(&config).unwrap_err();
        let fields: Vec<_> = issues.iter().map(|i| i.field).collect();
        assert_eq!(
            fields,
            vec!["api.base_url", "retries.max_attempts", "text.max_length"]
        );
    }

    #[test]
    fn test_rejects_non_http_scheme() {
        let mut config = ClientConfig::default();
        config.api.base_url = "ftp://files.local".into();
        let issues = validate_config(&config).unwrap_err();
        assert_eq!(issues[0].field, "api.base_url");
        assert!(issues[0].message.contains("ftp"));
    }

    #[test]
    fn test_rejects_extension_without_dot() {
        let mut config = ClientConfig::default();
        config.upload.allowed_extensions.push("wav".into());
        let issues = validate_config(&config).unwrap_err();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].to_string(), "upload.allowed_extensions: entries must start with '.'");
    }
}
