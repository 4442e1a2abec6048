//! Local input validation.
//!
//! Checks run before anything is sent to the backend. A failed check is a
//! [`ValidationError`]; the resilience layer never retries it.

pub mod file;
pub mod text;

pub use file::{validate_file, FileCandidate, FileRules};
pub use text::{validate_text, TextRules};

use thiserror::Error;

/// A rejected local input. The display text is the user-facing message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("File too large. Maximum size: {max_mb} MB")]
    FileTooLarge { size: u64, max_mb: u64 },

    #[error("Unsupported file type. Allowed: {allowed}")]
    UnsupportedType { mime: String, allowed: String },

    #[error("Unsupported file extension. Allowed: {allowed}")]
    UnsupportedExtension { name: String, allowed: String },

    #[error("{field} cannot be empty.")]
    EmptyText { field: String },

    #[error("{field} must be at least {min} characters.")]
    TextTooShort { field: String, min: usize },

    #[error("{field} is too long. Maximum {max} characters.")]
    TextTooLong { field: String, max: usize },

    #[error("{0}")]
    Unreadable(String),
}
