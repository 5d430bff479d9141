//! Application state shared across handlers.

use std::sync::Arc;

use seva_sangam_client::ClientError;
use seva_sangam_core::SharedBackend;

use crate::config::AdminConfig;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: AdminConfig,
    backend: SharedBackend,
}

impl AppState {
    /// Create application state, connecting to the configured backend.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend client cannot be built.
    pub fn new(config: AdminConfig) -> Result<Self, ClientError> {
        let backend = seva_sangam_client::connect(&config.backend)?;
        Ok(Self::with_backend(config, backend))
    }

    #[must_use]
    pub fn with_backend(config: AdminConfig, backend: SharedBackend) -> Self {
        Self {
            inner: Arc::new(AppStateInner { config, backend }),
        }
    }

    #[must_use]
    pub fn config(&self) -> &AdminConfig {
        &self.inner.config
    }

    /// The marketplace backend. Privileged reads bypass its cache.
    #[must_use]
    pub fn backend(&self) -> &SharedBackend {
        &self.inner.backend
    }
}
