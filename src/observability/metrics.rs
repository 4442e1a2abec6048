//! Metrics collection.
//!
//! # Metrics
//! - `client_request_attempts_total` (counter): every attempt of a wrapped action
//! - `client_request_retries_total` (counter): attempts scheduled after a failure
//! - `client_request_failures_total` (counter): terminal failures by error class
//!
//! # Design Decisions
//! - Emits through the `metrics` facade; no recorder installed means no-op
//! - Labels limited to the error class to keep cardinality fixed

pub fn record_attempt() {
    ::metrics::counter!("client_request_attempts_total").increment(1);
}

pub fn record_retry() {
    ::metrics::counter!("client_request_retries_total").increment(1);
}

pub fn record_failure(class: &'static str) {
    ::metrics::counter!("client_request_failures_total", "class" => class).increment(1);
}
