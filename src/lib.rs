//! Dashboard & CRM Client Library
//!
//! Typed client for the AI-assistant dashboard (speech recognition, chat,
//! speech synthesis) and the booking CRM, with a request resilience wrapper
//! that retries transient failures and surfaces the rest to the user.

pub mod api;
pub mod config;
pub mod context;
pub mod dashboard;
pub mod error;
pub mod media;
pub mod observability;
pub mod resilience;
pub mod ui;
pub mod validation;

pub use api::ApiClient;
pub use config::schema::ClientConfig;
pub use context::{AppContext, Collaborators, Session};
pub use dashboard::{Dashboard, DashboardError, Feature};
pub use error::ApiError;
pub use resilience::ErrorHandler;
