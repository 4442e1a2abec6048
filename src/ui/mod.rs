//! User-facing collaborators.
//!
//! # Data Flow
//! ```text
//! dashboard workflow / resilience wrapper
//!     → notify.rs   (transient messages with severity)
//!     → navigate.rs (redirects, optionally deferred)
//!     → progress.rs (determinate / indeterminate indicators)
//!     → modal.rs    (open/close by identifier)
//! ```
//!
//! # Design Decisions
//! - Every collaborator is a trait object held by `AppContext`
//! - Console implementations back the CLI, in-memory ones back tests

pub mod modal;
pub mod navigate;
pub mod notify;
pub mod progress;

pub use modal::{ModalError, ModalManager};
pub use navigate::{ConsoleNavigator, DeferredNavigator, Navigator};
pub use notify::{ConsoleNotifier, Notification, NotificationCenter, Notifier, Severity};
pub use progress::{LogProgress, ProgressHandle, ProgressMode, ProgressReporter, ProgressState};
