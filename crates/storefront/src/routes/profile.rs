//! Account profile of the signed-in principal.

use axum::{Json, extract::State};
use tracing::instrument;

use seva_sangam_core::{UserProfile, UserProfileForm};

use crate::error::{AppError, Result, add_breadcrumb};
use crate::middleware::WorkerPrincipal;
use crate::state::AppState;

/// The caller's saved name and role.
#[instrument(skip(state, principal))]
pub async fn show(
    State(state): State<AppState>,
    WorkerPrincipal(principal): WorkerPrincipal,
) -> Result<Json<UserProfile>> {
    state
        .backend()
        .get_caller_user_profile(&principal)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound("You have not set up your profile yet.".to_string()))
}

/// Create or replace the caller's profile.
#[instrument(skip(state, principal, form))]
pub async fn save(
    State(state): State<AppState>,
    WorkerPrincipal(principal): WorkerPrincipal,
    Json(form): Json<UserProfileForm>,
) -> Result<Json<UserProfile>> {
    let profile = form
        .into_profile()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    state
        .backend()
        .save_caller_user_profile(&principal, profile.clone())
        .await?;
    add_breadcrumb("account", "Profile saved", Some(&[("role", profile.role.as_str())]));
    tracing::info!(role = %profile.role, "User profile saved");

    Ok(Json(profile))
}
