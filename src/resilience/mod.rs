//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Wrapped action:
//!     → handler.rs (run attempt)
//!     → On failure: retries.rs (check if retryable, wait with backoff.rs)
//!     → On terminal failure: classify.rs (resolve user message)
//!     → notifier + log + optional deferred redirect
//! ```
//!
//! # Design Decisions
//! - Retries wrap only the action; classification runs once
//! - Every terminal failure is surfaced, there is no silent path
//! - No cancellation: an attempt runs to completion or rejection

pub mod backoff;
pub mod classify;
pub mod handler;
pub mod retries;

pub use classify::{classify, ClassifiedError, ClassifyOptions, Redirect};
pub use handler::ErrorHandler;
pub use retries::{is_retryable, AttemptState, RetryPolicy};
