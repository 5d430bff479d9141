//! Admin login.
//!
//! The backend issues no session tokens, so a login is just a privileged
//! read (`get_all_inquiries`) made with the submitted credentials. If the
//! backend accepts it the credentials are cached in the session.

use chrono::Utc;
use secrecy::SecretString;
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use seva_sangam_core::{AdminCredentials, MarketplaceBackend};

use crate::error::{AppError, Result};
use crate::middleware::{clear_admin_session, set_admin_session};
use crate::models::AdminSession;
use crate::models::session::secret_from_string;

/// Login form body.
#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: String,
    #[serde(deserialize_with = "secret_from_string")]
    pub password: SecretString,
}

impl std::fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginRequest")
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

/// Validate credentials and cache them in the session.
///
/// Any failure clears a stale session first.
///
/// # Errors
///
/// Returns [`AppError::LoginFailed`] with the classified cause, or
/// [`AppError::BadRequest`] for a blank form.
#[instrument(skip(backend, session, request), fields(username = %request.username))]
pub async fn login(
    backend: &dyn MarketplaceBackend,
    session: &Session,
    request: LoginRequest,
) -> Result<AdminSession> {
    let credentials = AdminCredentials::new(request.username.trim(), request.password);
    if !credentials.is_complete() {
        return Err(AppError::BadRequest(
            "Username and password are required.".to_string(),
        ));
    }

    match backend.get_all_inquiries(&credentials).await {
        Ok(_) => {
            let admin = AdminSession::new(&credentials, Utc::now());
            set_admin_session(session, &admin).await?;
            tracing::info!("Admin logged in");
            Ok(admin)
        }
        Err(err) => {
            let class = err.login_class();
            tracing::warn!(error = %err, ?class, "Admin login failed");
            clear_admin_session(session).await?;
            Err(AppError::LoginFailed(class))
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use seva_sangam_client::MemoryBackend;
    use seva_sangam_core::ErrorClass;
    use tower_sessions::MemoryStore;

    use super::*;
    use crate::middleware::auth::current_admin;

    fn session() -> Session {
        Session::new(None, Arc::new(MemoryStore::default()), None)
    }

    fn request(password: &str) -> LoginRequest {
        LoginRequest {
            username: "admin".to_string(),
            password: SecretString::from(password.to_string()),
        }
    }

    fn backend() -> MemoryBackend {
        MemoryBackend::with_admin("admin", SecretString::from("s3cret-Pass".to_string()))
    }

    #[tokio::test]
    async fn test_login_caches_credentials() {
        let session = session();
        let admin = login(&backend(), &session, request("s3cret-Pass")).await.unwrap();

        assert_eq!(admin.username, "admin");
        assert_eq!(current_admin(&session).await.unwrap().username, "admin");
    }

    #[tokio::test]
    async fn test_wrong_password_is_unauthorized_and_clears_session() {
        let session = session();
        let backend = backend();
        login(&backend, &session, request("s3cret-Pass")).await.unwrap();

        let err = login(&backend, &session, request("wrong")).await.unwrap_err();

        assert!(matches!(err, AppError::LoginFailed(ErrorClass::Unauthorized)));
        assert!(current_admin(&session).await.is_none());
    }

    #[tokio::test]
    async fn test_offline_backend_is_network_failure() {
        let backend = backend();
        backend.set_offline(true);

        let err = login(&backend, &session(), request("s3cret-Pass")).await.unwrap_err();
        assert!(matches!(err, AppError::LoginFailed(ErrorClass::Network)));
    }

    #[tokio::test]
    async fn test_blank_form_rejected_without_backend_call() {
        let backend = backend();
        backend.set_offline(true);

        let err = login(&backend, &session(), request("")).await.unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }
}
