//! Authentication route handlers for admin.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::json;
use tower_sessions::Session;

use crate::error::Result;
use crate::middleware::auth::current_admin;
use crate::middleware::clear_admin_session;
use crate::services::{LoginRequest, login};
use crate::state::AppState;

/// Build the auth router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/admin-login", get(login_page))
        .route("/api/auth/login", post(login_action))
        .route("/api/auth/logout", post(logout))
        .route("/api/auth/session", get(session_status))
}

/// Public view of the cached admin.
#[derive(Debug, Serialize)]
pub struct SessionInfo {
    pub authenticated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logged_in_at: Option<DateTime<Utc>>,
}

/// Login landing.
///
/// GET /admin-login
async fn login_page(session: Session) -> Response {
    if current_admin(&session).await.is_some() {
        return Redirect::to("/admin").into_response();
    }
    Json(json!({ "login": "/api/auth/login" })).into_response()
}

/// Validate credentials and start a session.
///
/// POST /api/auth/login
async fn login_action(
    State(state): State<AppState>,
    session: Session,
    Json(request): Json<LoginRequest>,
) -> Result<Json<SessionInfo>> {
    let admin = login(state.backend().as_ref(), &session, request).await?;
    Ok(Json(SessionInfo {
        authenticated: true,
        username: Some(admin.username),
        logged_in_at: Some(admin.logged_in_at),
    }))
}

/// Logout and clear session.
///
/// POST /api/auth/logout
async fn logout(session: Session) -> Result<StatusCode> {
    clear_admin_session(&session).await?;
    tracing::info!("Admin logged out");
    Ok(StatusCode::NO_CONTENT)
}

/// Whether an admin is cached in this session.
///
/// GET /api/auth/session
async fn session_status(session: Session) -> Json<SessionInfo> {
    let admin = current_admin(&session).await;
    Json(SessionInfo {
        authenticated: admin.is_some(),
        username: admin.as_ref().map(|a| a.username.clone()),
        logged_in_at: admin.map(|a| a.logged_in_at),
    })
}
