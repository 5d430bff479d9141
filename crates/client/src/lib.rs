//! SevaSangam backend client.
//!
//! Implementations of [`seva_sangam_core::MarketplaceBackend`] plus the query cache that sits
//! in front of them:
//!
//! - [`HttpBackend`] - JSON RPC over HTTP to the managed backend
//! - [`MemoryBackend`] - in-process backend for tests and local development
//! - [`CachedBackend`] - caches public reads and invalidates on mutations
//!
//! Services build their backend with [`connect`]:
//!
//! ```rust,ignore
//! let config = BackendConfig::from_env()?;
//! let backend = seva_sangam_client::connect(&config)?;
//! let categories = backend.get_all_categories().await?;
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cache;
pub mod config;
pub mod http;
pub mod memory;

use std::sync::Arc;

use seva_sangam_core::SharedBackend;
use tracing::info;

pub use cache::{CacheKey, CacheRoot, CachedBackend};
pub use config::{BackendConfig, BackendTarget, ConfigError};
pub use http::HttpBackend;
pub use memory::MemoryBackend;

/// Errors building a backend client.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}

/// Build the configured transport wrapped in the query cache.
///
/// # Errors
///
/// Returns an error if the HTTP client cannot be constructed.
pub fn connect(config: &BackendConfig) -> Result<SharedBackend, ClientError> {
    let transport: SharedBackend = match &config.target {
        BackendTarget::Http(url) => {
            info!(url = %url, "Using HTTP backend");
            Arc::new(HttpBackend::new(url, config)?)
        }
        BackendTarget::Memory => {
            info!("Using in-memory backend (development only)");
            let backend = config
                .dev_admin
                .as_ref()
                .map_or_else(MemoryBackend::new, |(username, password)| {
                    MemoryBackend::with_admin(username, password.clone())
                });
            Arc::new(backend)
        }
    };

    Ok(wrap_with_cache(transport, config))
}

/// Put the query cache in front of an existing backend.
#[must_use]
pub fn wrap_with_cache(inner: SharedBackend, config: &BackendConfig) -> SharedBackend {
    Arc::new(CachedBackend::new(
        inner,
        config.cache_ttl,
        config.cache_capacity,
    ))
}
