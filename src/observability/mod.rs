//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters)
//!
//! Consumers:
//!     → stderr via tracing-subscriber
//!     → any `metrics` recorder the embedding application installs
//! ```

pub mod logging;
pub mod metrics;
