//! Retry logic.
//!
//! # Responsibilities
//! - Determine if a failed attempt is retryable
//! - Compute the delay before the next attempt
//! - Track the attempt state machine
//!
//! # State Transitions
//! ```text
//! Idle → Attempting(1): action started
//! Attempting(n) → Success: action resolved
//! Attempting(n) → Attempting(n+1): action failed, retry allowed
//! Attempting(n) → FailedSurfaced: action failed, error shown to the user
//! ```
//!
//! # Design Decisions
//! - Local validation errors never retry
//! - Connection errors, 5xx, 408 and 429 always retry
//! - Everything else retries unless `retry_client_errors` is turned off
//! - Delays grow linearly: attempt n waits base × n

use std::time::Duration;

use crate::config::RetryConfig;
use crate::error::ApiError;
use crate::resilience::backoff::calculate_backoff;

/// Where a wrapped action is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptState {
    Idle,
    Attempting(u32),
    Success,
    FailedSurfaced,
}

impl AttemptState {
    /// Begin the first attempt.
    pub fn start(self) -> Self {
        match self {
            AttemptState::Idle => AttemptState::Attempting(1),
            other => other,
        }
    }

    pub fn succeed(self) -> Self {
        match self {
            AttemptState::Attempting(_) => AttemptState::Success,
            other => other,
        }
    }

    /// Record a failed attempt; `retry` selects the next attempt over surfacing.
    pub fn fail(self, retry: bool) -> Self {
        match self {
            AttemptState::Attempting(n) if retry => AttemptState::Attempting(n + 1),
            AttemptState::Attempting(_) => AttemptState::FailedSurfaced,
            other => other,
        }
    }

    /// Current attempt number, 1-based.
    pub fn attempt(&self) -> Option<u32> {
        match self {
            AttemptState::Attempting(n) => Some(*n),
            _ => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, AttemptState::Success | AttemptState::FailedSurfaced)
    }
}

/// Returns true if another attempt may help.
pub fn is_retryable(error: &ApiError, retry_client_errors: bool) -> bool {
    match error {
        ApiError::Validation(_) => false,
        ApiError::Transport(_) => true,
        ApiError::Status { status, .. } => match *status {
            500..=599 | 408 | 429 => true,
            _ => retry_client_errors,
        },
        ApiError::Decode(_) | ApiError::Unexpected(_) => retry_client_errors,
    }
}

/// Bounded retry policy for wrapped actions.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
    pub jitter_ratio: f64,
    pub retry_client_errors: bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from(&RetryConfig::default())
    }
}

impl From<&RetryConfig> for RetryPolicy {
    fn from(config: &RetryConfig) -> Self {
        Self {
            max_attempts: config.max_attempts.max(1),
            base_delay: Duration::from_millis(config.base_delay_ms),
            max_delay: Duration::from_millis(config.max_delay_ms),
            jitter_ratio: config.jitter_ratio,
            retry_client_errors: config.retry_client_errors,
        }
    }
}

impl RetryPolicy {
    pub fn should_retry(&self, error: &ApiError) -> bool {
        is_retryable(error, self.retry_client_errors)
    }

    /// Delay after failed attempt `attempt` (1-based).
    pub fn delay_for(&self, attempt: u32) -> Duration {
        calculate_backoff(
            attempt,
            self.base_delay.as_millis() as u64,
            self.max_delay.as_millis() as u64,
            self.jitter_ratio,
        )
    }
}
