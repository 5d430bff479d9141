//! Session-stored admin credentials.
//!
//! The backend has no session tokens: every privileged call carries the
//! admin's username and password. After a successful login they are kept
//! here, in the server-side session store, and never sent back to the
//! browser.

use chrono::{DateTime, Utc};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use seva_sangam_core::AdminCredentials;

/// The logged-in admin.
#[derive(Clone, Serialize, Deserialize)]
pub struct AdminSession {
    pub username: String,
    #[serde(serialize_with = "expose_password", deserialize_with = "secret_from_string")]
    pub password: SecretString,
    pub logged_in_at: DateTime<Utc>,
}

fn expose_password<S: Serializer>(password: &SecretString, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(password.expose_secret())
}

/// Deserialize a plain string into a [`SecretString`].
///
/// # Errors
///
/// Fails if the value is not a string.
pub fn secret_from_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<SecretString, D::Error> {
    String::deserialize(deserializer).map(SecretString::from)
}

impl AdminSession {
    #[must_use]
    pub fn new(credentials: &AdminCredentials, logged_in_at: DateTime<Utc>) -> Self {
        Self {
            username: credentials.username().to_string(),
            password: credentials.password().clone(),
            logged_in_at,
        }
    }

    /// Credentials to attach to a privileged backend call.
    #[must_use]
    pub fn credentials(&self) -> AdminCredentials {
        AdminCredentials::new(self.username.clone(), self.password.clone())
    }
}

impl std::fmt::Debug for AdminSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminSession")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("logged_in_at", &self.logged_in_at)
            .finish()
    }
}

/// Session keys for admin authentication data.
pub mod keys {
    /// Key for storing the logged-in admin.
    pub const ADMIN_SESSION: &str = "admin_session";
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_session_round_trips_through_store_format() {
        let creds = AdminCredentials::new("admin", SecretString::from("hunter2-long"));
        let session = AdminSession::new(&creds, Utc::now());

        let json = serde_json::to_value(&session).unwrap();
        let restored: AdminSession = serde_json::from_value(json).unwrap();

        assert_eq!(restored.username, "admin");
        assert_eq!(restored.credentials().password().expose_secret(), "hunter2-long");
    }

    #[test]
    fn test_debug_redacts_password() {
        let creds = AdminCredentials::new("admin", SecretString::from("hunter2-long"));
        let debug = format!("{:?}", AdminSession::new(&creds, Utc::now()));
        assert!(!debug.contains("hunter2"));
    }
}
