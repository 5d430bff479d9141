//! Authentication extractor for admin.
//!
//! The cached [`AdminSession`] is the only thing that makes a request
//! privileged. Handlers pass every privileged backend result through
//! [`AdminGuard::check`], which drops the session on an unauthorized answer
//! so the next page load lands on the login screen.

use axum::{
    extract::FromRequestParts,
    http::request::Parts,
    response::{IntoResponse, Response},
};
use tower_sessions::Session;

use seva_sangam_core::{AdminCredentials, BackendError};

use crate::error::{AppError, clear_sentry_user, set_sentry_user};
use crate::models::{AdminSession, session_keys};

/// The session and the admin cached in it.
#[derive(Debug, Clone)]
pub struct AdminGuard {
    session: Session,
    admin: AdminSession,
    /// Set for `/api/...` requests, which get JSON instead of redirects.
    api: bool,
}

impl AdminGuard {
    #[must_use]
    pub fn username(&self) -> &str {
        &self.admin.username
    }

    /// Credentials to attach to a privileged backend call.
    #[must_use]
    pub fn credentials(&self) -> AdminCredentials {
        self.admin.credentials()
    }

    /// Unwrap a privileged backend result.
    ///
    /// An unauthorized error clears the cached session and becomes
    /// [`AppError::SessionExpired`] for API requests or
    /// [`AppError::LoginRequired`] for pages. Other errors pass through
    /// unchanged.
    ///
    /// # Errors
    ///
    /// Returns the mapped backend error.
    pub async fn check<T>(&self, result: Result<T, BackendError>) -> Result<T, AppError> {
        match result {
            Ok(value) => Ok(value),
            Err(err) if err.is_unauthorized() => {
                tracing::warn!(
                    username = %self.admin.username,
                    error = %err,
                    "Backend rejected cached admin credentials, clearing session"
                );
                clear_admin_session(&self.session).await?;
                Err(if self.api {
                    AppError::SessionExpired
                } else {
                    AppError::LoginRequired
                })
            }
            Err(err) => Err(err.into()),
        }
    }
}

/// Extractor that requires a logged-in admin.
///
/// Page requests without a session are redirected to `/admin-login`; API
/// requests (`/api/...`) get a 401 JSON body naming the same redirect.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireAdminSession(admin): RequireAdminSession,
/// ) -> impl IntoResponse {
///     format!("Hello, {}!", admin.username())
/// }
/// ```
pub struct RequireAdminSession(pub AdminGuard);

/// Rejection when no admin session is present.
pub enum AdminAuthRejection {
    /// Redirect to login page (for page requests).
    RedirectToLogin,
    /// Unauthorized response (for API requests).
    Unauthorized,
}

impl IntoResponse for AdminAuthRejection {
    fn into_response(self) -> Response {
        match self {
            Self::RedirectToLogin => AppError::LoginRequired.into_response(),
            Self::Unauthorized => AppError::SessionExpired.into_response(),
        }
    }
}

impl<S> FromRequestParts<S> for RequireAdminSession
where
    S: Send + Sync,
{
    type Rejection = AdminAuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let api = parts.uri.path().starts_with("/api/");
        let rejection = || {
            if api {
                AdminAuthRejection::Unauthorized
            } else {
                AdminAuthRejection::RedirectToLogin
            }
        };

        // Set by SessionManagerLayer
        let session = parts
            .extensions
            .get::<Session>()
            .cloned()
            .ok_or_else(rejection)?;

        let admin: AdminSession = session
            .get(session_keys::ADMIN_SESSION)
            .await
            .ok()
            .flatten()
            .ok_or_else(rejection)?;

        set_sentry_user(&admin.username);

        Ok(Self(AdminGuard {
            session,
            admin,
            api,
        }))
    }
}

/// Cache the admin in the session.
///
/// Cycles the session ID first so a pre-login cookie cannot be reused.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_admin_session(
    session: &Session,
    admin: &AdminSession,
) -> Result<(), tower_sessions::session::Error> {
    session.cycle_id().await?;
    session.insert(session_keys::ADMIN_SESSION, admin).await
}

/// Remove the cached admin from the session (logout or expiry).
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn clear_admin_session(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session
        .remove::<AdminSession>(session_keys::ADMIN_SESSION)
        .await?;
    clear_sentry_user();
    Ok(())
}

/// Read the cached admin without rejecting the request.
pub async fn current_admin(session: &Session) -> Option<AdminSession> {
    session
        .get::<AdminSession>(session_keys::ADMIN_SESSION)
        .await
        .ok()
        .flatten()
}
