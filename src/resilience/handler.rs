//! The request resilience wrapper.
//!
//! Runs a wrapped action, retries it according to [`RetryPolicy`], and on
//! terminal failure classifies the error, shows it to the user and logs it
//! before handing the error back to the caller.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::observability::metrics;
use crate::resilience::classify::{classify, ClassifiedError, ClassifyOptions};
use crate::resilience::retries::{AttemptState, RetryPolicy};
use crate::ui::{Navigator, Notifier, Severity};

/// Retries wrapped actions and surfaces their terminal failures.
#[derive(Clone)]
pub struct ErrorHandler {
    policy: RetryPolicy,
    options: ClassifyOptions,
    notifier: Arc<dyn Notifier>,
    navigator: Arc<dyn Navigator>,
}

impl ErrorHandler {
    pub fn new(
        policy: RetryPolicy,
        options: ClassifyOptions,
        notifier: Arc<dyn Notifier>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        Self {
            policy,
            options,
            notifier,
            navigator,
        }
    }

    pub fn from_config(
        config: &ClientConfig,
        notifier: Arc<dyn Notifier>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        let options = ClassifyOptions {
            login_path: config.api.login_path.clone(),
            auth_redirect_delay: Duration::from_millis(config.notifications.auth_redirect_delay_ms),
        };
        Self::new(RetryPolicy::from(&config.retries), options, notifier, navigator)
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Run `action` with the configured attempt ceiling.
    pub async fn handle_request<T, F, Fut>(&self, action: F) -> Result<T, ApiError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, ApiError>>,
    {
        self.handle_request_with(self.policy.max_attempts, action).await
    }

    /// Run `action` with at most `max_attempts` attempts.
    pub async fn handle_request_with<T, F, Fut>(
        &self,
        max_attempts: u32,
        mut action: F,
    ) -> Result<T, ApiError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, ApiError>>,
    {
        let max_attempts = max_attempts.max(1);
        let mut state = AttemptState::Idle.start();

        loop {
            let attempt = state.attempt().unwrap_or(max_attempts);
            metrics::record_attempt();

            match action().await {
                Ok(value) => {
                    state = state.succeed();
                    tracing::debug!(attempt, state = ?state, "Wrapped request succeeded");
                    return Ok(value);
                }
                Err(error) => {
                    let retry = attempt < max_attempts && self.policy.should_retry(&error);
                    state = state.fail(retry);

                    if retry {
                        let delay = self.policy.delay_for(attempt);
                        tracing::info!(
                            attempt,
                            max_attempts,
                            delay = ?delay,
                            error = %error,
                            "Retrying request"
                        );
                        metrics::record_retry();
                        tokio::time::sleep(delay).await;
                        continue;
                    }

                    tracing::debug!(attempt, state = ?state, "Wrapped request failed");
                    self.surface(&error);
                    return Err(error);
                }
            }
        }
    }

    /// Classify a terminal failure, notify the user and log it.
    pub fn surface(&self, error: &ApiError) -> ClassifiedError {
        let classified = classify(error, &self.options);

        self.notifier.notify(&classified.message, Severity::Error);
        tracing::error!(
            kind = error.kind(),
            status = ?classified.status,
            server_message = ?classified.server_message,
            error = %error,
            "Request failed"
        );
        metrics::record_failure(error.kind());

        if let Some(redirect) = &classified.redirect {
            self.navigator.redirect(&redirect.path, redirect.after);
        }
        classified
    }
}
