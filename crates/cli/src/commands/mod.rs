//! CLI command implementations.
//!
//! Every command talks to the backend through a [`Connection`], so the
//! same code drives the HTTP backend in production and the in-memory one
//! in tests.

pub mod categories;
pub mod inquiries;
pub mod workers;

use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;

use seva_sangam_client::config::validate_secret_strength;
use seva_sangam_client::{BackendConfig, BackendTarget, ClientError, ConfigError};
use seva_sangam_core::{
    AdminCredentials, BackendError, CategoryFormError, LifecycleError, ParseStatusError,
    SharedBackend,
};

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("client error: {0}")]
    Client(#[from] ClientError),

    #[error("backend call failed: {0}")]
    Backend(#[from] BackendError),

    #[error("ADMIN_USERNAME and ADMIN_PASSWORD (or --username/--password) are required")]
    MissingCredentials,

    #[error("{0}")]
    InvalidStatus(#[from] ParseStatusError),

    #[error("not allowed: {0}")]
    Lifecycle(#[from] LifecycleError),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("invalid seed file: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid category in seed file: {0}")]
    InvalidCategory(#[from] CategoryFormError),
}

/// A backend handle plus the admin credentials for privileged calls.
pub struct Connection {
    backend: SharedBackend,
    credentials: Option<AdminCredentials>,
}

impl Connection {
    /// Connect to `backend_url`.
    ///
    /// For `memory://` the given credentials also become the in-memory
    /// backend's admin account.
    ///
    /// # Errors
    ///
    /// Returns an error for an invalid URL, a weak API key, or a client
    /// that cannot be built.
    pub fn open(
        backend_url: &str,
        api_key: Option<&str>,
        username: Option<String>,
        password: Option<SecretString>,
    ) -> Result<Self, CliError> {
        let target = backend_url.parse::<BackendTarget>().map_err(|e| {
            ConfigError::InvalidEnvVar("BACKEND_URL".to_string(), e.to_string())
        })?;
        let api_key = api_key
            .map(|key| {
                validate_secret_strength(key, "BACKEND_API_KEY")?;
                Ok::<_, ConfigError>(SecretString::from(key.to_string()))
            })
            .transpose()?;
        let credentials = username
            .zip(password)
            .map(|(u, p)| AdminCredentials::new(u, p))
            .filter(AdminCredentials::is_complete);

        let dev_admin = match target {
            BackendTarget::Memory => credentials
                .as_ref()
                .map(|c| (c.username().to_string(), c.password().clone())),
            BackendTarget::Http(_) => None,
        };

        // One-shot process: a short cache TTL keeps reads after writes fresh.
        let config = BackendConfig {
            target,
            api_key,
            dev_admin,
            cache_ttl: Duration::from_secs(1),
            ..BackendConfig::memory()
        };

        Ok(Self::with_backend(
            seva_sangam_client::connect(&config)?,
            credentials,
        ))
    }

    #[must_use]
    pub fn with_backend(backend: SharedBackend, credentials: Option<AdminCredentials>) -> Self {
        Self {
            backend,
            credentials,
        }
    }

    #[must_use]
    pub fn backend(&self) -> &SharedBackend {
        &self.backend
    }

    /// Credentials for a privileged call.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::MissingCredentials`] if none were given.
    pub fn admin(&self) -> Result<&AdminCredentials, CliError> {
        self.credentials.as_ref().ok_or(CliError::MissingCredentials)
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;

    use secrecy::SecretString;
    use seva_sangam_client::MemoryBackend;
    use seva_sangam_core::AdminCredentials;

    use super::Connection;

    pub const PASSWORD: &str = "s3cret-Pass";

    pub fn credentials() -> AdminCredentials {
        AdminCredentials::new("admin", SecretString::from(PASSWORD.to_string()))
    }

    /// An in-memory backend and a connection that can administer it.
    pub fn connection() -> (MemoryBackend, Connection) {
        let memory = MemoryBackend::with_admin("admin", SecretString::from(PASSWORD.to_string()));
        let conn = Connection::with_backend(Arc::new(memory.clone()), Some(credentials()));
        (memory, conn)
    }
}
