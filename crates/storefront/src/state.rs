//! Application state shared across handlers.

use std::sync::Arc;

use seva_sangam_client::ClientError;
use seva_sangam_core::SharedBackend;

use crate::config::StorefrontConfig;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to the
/// configuration and the (cached) marketplace backend.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    backend: SharedBackend,
}

impl AppState {
    /// Create application state, connecting to the configured backend.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend client cannot be built.
    pub fn new(config: StorefrontConfig) -> Result<Self, ClientError> {
        let backend = seva_sangam_client::connect(&config.backend)?;
        Ok(Self::with_backend(config, backend))
    }

    /// Create application state around an existing backend.
    #[must_use]
    pub fn with_backend(config: StorefrontConfig, backend: SharedBackend) -> Self {
        Self {
            inner: Arc::new(AppStateInner { config, backend }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the marketplace backend.
    #[must_use]
    pub fn backend(&self) -> &SharedBackend {
        &self.inner.backend
    }
}
