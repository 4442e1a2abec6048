//! Page navigation.

use std::sync::Arc;
use std::time::Duration;

/// Sends the user to another page.
pub trait Navigator: Send + Sync {
    /// Navigate to `path` once `after` has elapsed. A zero delay means now.
    fn redirect(&self, path: &str, after: Duration);
}

/// Logs redirects; a terminal has no pages to switch.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleNavigator;

impl Navigator for ConsoleNavigator {
    fn redirect(&self, path: &str, after: Duration) {
        tracing::info!(path, delay_ms = after.as_millis() as u64, "Redirect requested");
        eprintln!("Please sign in at {}", path);
    }
}

/// Runs a callback for each redirect, deferred on the tokio runtime.
pub struct DeferredNavigator {
    on_navigate: Arc<dyn Fn(&str) + Send + Sync>,
}

impl DeferredNavigator {
    pub fn new<F>(on_navigate: F) -> Self
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        Self {
            on_navigate: Arc::new(on_navigate),
        }
    }
}

impl Navigator for DeferredNavigator {
    fn redirect(&self, path: &str, after: Duration) {
        if after.is_zero() {
            (self.on_navigate)(path);
            return;
        }

        let callback = self.on_navigate.clone();
        let path = path.to_string();
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn(async move {
                    tokio::time::sleep(after).await;
                    callback(&path);
                });
            }
            Err(_) => {
                tracing::warn!(path = %path, "No runtime for deferred redirect, navigating now");
                callback(&path);
            }
        }
    }
}
