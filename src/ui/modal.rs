//! Modal dialogs addressed by identifier.
//!
//! # Design Decisions
//! - Known modals are registered up front; opening an unknown one fails
//! - The "currently open" slot is last-write-wins, no locking

use std::sync::Arc;

use arc_swap::ArcSwapOption;
use dashmap::DashMap;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModalError {
    #[error("Modal not found: {0}")]
    NotFound(String),
}

/// Tracks which modals exist and which one is open.
#[derive(Default)]
pub struct ModalManager {
    modals: DashMap<String, bool>,
    current: ArcSwapOption<String>,
}

impl ModalManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a manager with the given modals registered.
    pub fn with_modals<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let manager = Self::new();
        for id in ids {
            manager.register(id);
        }
        manager
    }

    pub fn register(&self, id: impl Into<String>) {
        self.modals.entry(id.into()).or_insert(false);
    }

    pub fn open(&self, id: &str) -> Result<(), ModalError> {
        let Some(mut open) = self.modals.get_mut(id) else {
            tracing::error!(modal = id, "Modal not found");
            return Err(ModalError::NotFound(id.to_string()));
        };
        *open = true;
        drop(open);
        self.current.store(Some(Arc::new(id.to_string())));
        tracing::debug!(modal = id, "Modal opened");
        Ok(())
    }

    /// Close a modal. Closing an unknown or closed modal is a no-op.
    pub fn close(&self, id: &str) {
        if let Some(mut open) = self.modals.get_mut(id) {
            *open = false;
        }
        let is_current = self.current.load().as_deref().map(String::as_str) == Some(id);
        if is_current {
            self.current.store(None);
        }
    }

    pub fn is_open(&self, id: &str) -> bool {
        self.modals.get(id).map(|open| *open).unwrap_or(false)
    }

    /// The most recently opened modal that is still open.
    pub fn current(&self) -> Option<String> {
        self.current.load_full().map(|id| id.as_ref().clone())
    }
}
