//! Unified error handling for admin.
//!
//! Every response is JSON. An unauthorized answer from a privileged backend
//! call becomes [`AppError::SessionExpired`] once the session has been
//! cleared (see [`crate::middleware::AdminGuard::check`]).

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use serde_json::json;
use thiserror::Error;

use seva_sangam_core::backend::SESSION_EXPIRED_MESSAGE;
use seva_sangam_core::{BackendError, ErrorClass, LifecycleError};

/// Where clients are sent to sign in again.
pub const LOGIN_PATH: &str = "/admin-login";

/// Application-level error type for the admin API.
#[derive(Debug, Error)]
pub enum AppError {
    /// Backend call failed.
    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),

    /// Session store failed.
    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    /// Login was refused; carries the classified cause.
    #[error("Login failed: {0:?}")]
    LoginFailed(ErrorClass),

    /// No admin session, or the backend rejected the cached credentials.
    #[error("Admin session expired")]
    SessionExpired,

    /// Same as [`Self::SessionExpired`], for page requests: redirects.
    #[error("Admin login required")]
    LoginRequired,

    /// The requested moderation action is not allowed from this state.
    #[error("Conflict: {0}")]
    Lifecycle(#[from] LifecycleError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            Self::Backend(err) => match err.class() {
                ErrorClass::Network => StatusCode::SERVICE_UNAVAILABLE,
                ErrorClass::Unauthorized => StatusCode::UNAUTHORIZED,
                ErrorClass::Generic => match err {
                    BackendError::Rejected(_) => StatusCode::UNPROCESSABLE_ENTITY,
                    _ => StatusCode::BAD_GATEWAY,
                },
            },
            Self::LoginFailed(ErrorClass::Network) => StatusCode::SERVICE_UNAVAILABLE,
            Self::LoginFailed(_) | Self::SessionExpired => StatusCode::UNAUTHORIZED,
            Self::LoginRequired => StatusCode::SEE_OTHER,
            Self::Lifecycle(_) => StatusCode::CONFLICT,
            Self::Session(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }

    const fn is_server_error(&self) -> bool {
        matches!(
            self,
            Self::Session(_) | Self::Backend(BackendError::InvalidResponse(_))
        )
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if matches!(self, Self::LoginRequired) {
            return Redirect::to(LOGIN_PATH).into_response();
        }

        if self.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Admin request error"
            );
        } else if let Self::Backend(err) = &self {
            tracing::warn!(error = %err, "Backend call failed");
        }

        let status = self.status();

        // Don't expose internal error details to clients
        let body = match &self {
            Self::Backend(err) => match err.class() {
                ErrorClass::Unauthorized => json!({
                    "error": SESSION_EXPIRED_MESSAGE,
                    "redirect": LOGIN_PATH,
                }),
                class => json!({
                    "error": class.session_message(),
                    "retryable": class.is_retryable(),
                }),
            },
            Self::LoginFailed(class) => json!({
                "error": class.login_message(),
                "retryable": class.is_retryable(),
            }),
            Self::SessionExpired | Self::LoginRequired => json!({
                "error": SESSION_EXPIRED_MESSAGE,
                "redirect": LOGIN_PATH,
            }),
            Self::Lifecycle(err) => json!({ "error": err.to_string() }),
            Self::Session(_) => json!({ "error": "Internal server error" }),
            Self::NotFound(msg) | Self::BadRequest(msg) => json!({ "error": msg }),
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Set the Sentry user context to the logged-in admin.
pub fn set_sentry_user(username: &str) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            username: Some(username.to_string()),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::body::to_bytes;
    use axum::http::header::LOCATION;
    use seva_sangam_core::WorkerStatus;

    use super::*;

    fn get_status(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_app_error_display() {
        let err = AppError::NotFound("worker-123".to_string());
        assert_eq!(err.to_string(), "Not found: worker-123");
    }

    #[test]
    fn test_app_error_status_codes() {
        assert_eq!(get_status(AppError::SessionExpired), StatusCode::UNAUTHORIZED);
        assert_eq!(
            get_status(AppError::LoginFailed(ErrorClass::Network)),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            get_status(AppError::LoginFailed(ErrorClass::Unauthorized)),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            get_status(LifecycleError::NotApproved(WorkerStatus::Pending).into()),
            StatusCode::CONFLICT
        );
        assert_eq!(
            get_status(BackendError::InvalidResponse("bad json".into()).into()),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn test_login_required_redirects() {
        let response = AppError::LoginRequired.into_response();
        assert!(response.status().is_redirection());
        assert_eq!(response.headers()[LOCATION], LOGIN_PATH);
    }

    #[tokio::test]
    async fn test_session_expired_body_points_at_login() {
        let response = AppError::SessionExpired.into_response();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();

        assert_eq!(json["error"], SESSION_EXPIRED_MESSAGE);
        assert_eq!(json["redirect"], LOGIN_PATH);
    }
}
