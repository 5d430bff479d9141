//! Backend configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `BACKEND_URL` - Base URL of the marketplace backend, or `memory://` for
//!   the in-process development backend
//!
//! ## Optional
//! - `BACKEND_TIMEOUT_SECS` - Request timeout (default: 10)
//! - `BACKEND_API_KEY` - Bearer token sent to the backend (validated)
//! - `QUERY_CACHE_TTL_SECS` - Query cache time-to-live (default: 300)
//! - `QUERY_CACHE_CAPACITY` - Query cache entry limit (default: 1000)
//! - `DEV_ADMIN_USERNAME` / `DEV_ADMIN_PASSWORD` - Admin account of the
//!   in-memory backend
//!
//! The helper functions are shared with the service binaries so every crate
//! reads its environment the same way.

use std::collections::HashMap;
use std::str::FromStr;
use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;

/// Scheme selecting the in-memory backend.
pub const MEMORY_BACKEND_URL: &str = "memory://";

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "secret",
    "password",
    "xxx",
    "todo",
    "fixme",
    "insert",
    "enter-",
    "put-your",
    "add-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Where backend calls go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendTarget {
    Http(Url),
    /// In-process backend; state is lost on restart.
    Memory,
}

impl FromStr for BackendTarget {
    type Err = url::ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim() == MEMORY_BACKEND_URL {
            return Ok(Self::Memory);
        }
        Url::parse(s.trim()).map(Self::Http)
    }
}

/// Backend connection and query cache settings.
///
/// Implements `Debug` manually to redact secret fields.
#[derive(Clone)]
pub struct BackendConfig {
    pub target: BackendTarget,
    pub timeout: Duration,
    /// Bearer token for the backend gateway
    pub api_key: Option<SecretString>,
    pub cache_ttl: Duration,
    pub cache_capacity: u64,
    /// Admin account seeded into the in-memory backend
    pub dev_admin: Option<(String, SecretString)>,
}

impl std::fmt::Debug for BackendConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendConfig")
            .field("target", &self.target)
            .field("timeout", &self.timeout)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("cache_ttl", &self.cache_ttl)
            .field("cache_capacity", &self.cache_capacity)
            .field(
                "dev_admin",
                &self.dev_admin.as_ref().map(|(user, _)| (user, "[REDACTED]")),
            )
            .finish()
    }
}

impl BackendConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid, or
    /// if the API key fails validation.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();

        let target = get_required_env("BACKEND_URL")?
            .parse::<BackendTarget>()
            .map_err(|e| ConfigError::InvalidEnvVar("BACKEND_URL".to_string(), e.to_string()))?;
        let timeout = Duration::from_secs(parse_env_or_default("BACKEND_TIMEOUT_SECS", 10)?);
        let api_key = get_optional_env("BACKEND_API_KEY")
            .map(|key| {
                validate_secret_strength(&key, "BACKEND_API_KEY")?;
                Ok::<_, ConfigError>(SecretString::from(key))
            })
            .transpose()?;
        let cache_ttl = Duration::from_secs(parse_env_or_default("QUERY_CACHE_TTL_SECS", 300)?);
        let cache_capacity = parse_env_or_default("QUERY_CACHE_CAPACITY", 1000)?;

        let dev_admin = match target {
            BackendTarget::Memory => get_optional_env("DEV_ADMIN_USERNAME").zip(
                get_optional_env("DEV_ADMIN_PASSWORD").map(SecretString::from),
            ),
            BackendTarget::Http(_) => None,
        };

        Ok(Self {
            target,
            timeout,
            api_key,
            cache_ttl,
            cache_capacity,
            dev_admin,
        })
    }

    /// In-memory backend with default cache settings.
    #[must_use]
    pub const fn memory() -> Self {
        Self {
            target: BackendTarget::Memory,
            timeout: Duration::from_secs(10),
            api_key: None,
            cache_ttl: Duration::from_secs(300),
            cache_capacity: 1000,
            dev_admin: None,
        }
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
///
/// # Errors
///
/// Returns `ConfigError::MissingEnvVar` if the variable is unset.
pub fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable. Blank values count as unset.
#[must_use]
pub fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Get an environment variable with a default value.
#[must_use]
pub fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse an environment variable, falling back to `default` when unset.
///
/// # Errors
///
/// Returns `ConfigError::InvalidEnvVar` if the value does not parse.
pub fn parse_env_or_default<T>(key: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    get_optional_env(key).map_or(Ok(default), |raw| {
        raw.trim()
            .parse::<T>()
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
    })
}

/// Calculate Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut freq: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
    }

    #[allow(clippy::cast_precision_loss)] // String length will never exceed f64 precision
    let len = s.len() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)] // Character count will never exceed f64 precision
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Validate that a secret is not a placeholder and has sufficient entropy.
///
/// # Errors
///
/// Returns `ConfigError::InsecureSecret` describing the failed check.
pub fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();

    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1}). Use a randomly generated secret."
            ),
        ));
    }

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_shannon_entropy_empty() {
        assert!((shannon_entropy("") - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_shannon_entropy_two_chars() {
        let entropy = shannon_entropy("ab");
        assert!((entropy - 1.0).abs() < 0.01);
    }

    #[test]
    fn test_validate_secret_strength_placeholder() {
        let err = validate_secret_strength("your-api-key-here", "BACKEND_API_KEY").unwrap_err();
        assert!(matches!(err, ConfigError::InsecureSecret(_, _)));
    }

    #[test]
    fn test_validate_secret_strength_low_entropy() {
        assert!(validate_secret_strength("aaaaaaaaaaaaaaaaaaaaaaaa", "BACKEND_API_KEY").is_err());
    }

    #[test]
    fn test_validate_secret_strength_valid() {
        assert!(validate_secret_strength("aB3$xY9!mK2@nL5#pQ7&rT0*uW4^zC6", "BACKEND_API_KEY").is_ok());
    }

    #[test]
    fn test_backend_target_parse() {
        assert_eq!("memory://".parse::<BackendTarget>().unwrap(), BackendTarget::Memory);
        assert!(matches!(
            "https://backend.sevasangam.in".parse::<BackendTarget>().unwrap(),
            BackendTarget::Http(_)
        ));
        assert!("not a url".parse::<BackendTarget>().is_err());
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let config = BackendConfig {
            api_key: Some(SecretString::from("aB3$xY9!mK2@nL5#pQ7&rT0*uW4^zC6")),
            dev_admin: Some(("admin".to_string(), SecretString::from("pw-hidden-value"))),
            ..BackendConfig::memory()
        };
        let debug = format!("{config:?}");
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("aB3$"));
        assert!(!debug.contains("pw-hidden-value"));
    }
}
