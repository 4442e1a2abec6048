//! Application context shared by workflows and the API client.
//!
//! # Design Decisions
//! - Replaces page-level globals: everything is passed explicitly
//! - Session tokens are read-mostly and last-write-wins (`ArcSwapOption`)
//! - Collaborators are required trait objects, never optional

use std::sync::Arc;

use arc_swap::ArcSwapOption;

use crate::config::ClientConfig;
use crate::resilience::ErrorHandler;
use crate::ui::{ModalManager, Navigator, Notifier, ProgressReporter};

/// Authentication state for the current user.
#[derive(Default)]
pub struct Session {
    token: ArcSwapOption<String>,
    csrf_token: ArcSwapOption<String>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        let session = Self::new();
        session.set_token(token);
        session
    }

    pub fn token(&self) -> Option<String> {
        self.token.load_full().map(|t| t.as_ref().clone())
    }

    pub fn set_token(&self, token: impl Into<String>) {
        self.token.store(Some(Arc::new(token.into())));
    }

    pub fn clear(&self) {
        self.token.store(None);
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.load().is_some()
    }

    pub fn csrf_token(&self) -> Option<String> {
        self.csrf_token.load_full().map(|t| t.as_ref().clone())
    }

    pub fn set_csrf_token(&self, token: impl Into<String>) {
        self.csrf_token.store(Some(Arc::new(token.into())));
    }
}

/// The UI collaborators a context needs.
pub struct Collaborators {
    pub notifier: Arc<dyn Notifier>,
    pub navigator: Arc<dyn Navigator>,
    pub progress: Arc<dyn ProgressReporter>,
}

/// Everything a workflow needs, built once per application.
pub struct AppContext {
    pub config: Arc<ClientConfig>,
    pub session: Arc<Session>,
    pub modals: ModalManager,
    pub notifier: Arc<dyn Notifier>,
    pub navigator: Arc<dyn Navigator>,
    pub progress: Arc<dyn ProgressReporter>,
}

impl AppContext {
    pub fn new(config: ClientConfig, collaborators: Collaborators) -> Self {
        Self {
            config: Arc::new(config),
            session: Arc::new(Session::new()),
            modals: ModalManager::new(),
            notifier: collaborators.notifier,
            navigator: collaborators.navigator,
            progress: collaborators.progress,
        }
    }

    /// Start from an existing session, e.g. a token saved by an earlier login.
    pub fn with_session(mut self, session: Arc<Session>) -> Self {
        self.session = session;
        self
    }

    /// Resilience wrapper wired to this context's collaborators.
    pub fn error_handler(&self) -> ErrorHandler {
        ErrorHandler::from_config(&self.config, self.notifier.clone(), self.navigator.clone())
    }
}
