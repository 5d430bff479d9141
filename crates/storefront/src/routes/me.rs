//! Signed-in worker's own profile and jobs.

use axum::{Json, extract::State, http::StatusCode};
use tracing::instrument;

use seva_sangam_core::lifecycle;
use seva_sangam_core::{Principal, WorkerId, WorkerProfile, WorkerProfileEdit, WorkerRegistration};

use crate::error::{AppError, Result, add_breadcrumb};
use crate::middleware::WorkerPrincipal;
use crate::models::views::{EditOutcome, JobsView, REAPPROVAL_NOTICE, WorkerDashboard};
use crate::routes::categories::live_categories;
use crate::state::AppState;

/// The caller's profile, read past the cache so moderation done by the
/// admin shows up immediately.
async fn own_profile(state: &AppState, principal: &Principal) -> Result<WorkerProfile> {
    state
        .backend()
        .refresh_my_worker_profile(principal)
        .await?
        .ok_or_else(|| AppError::NotFound("You have not registered as a worker yet.".to_string()))
}

/// Dashboard for the signed-in worker.
#[instrument(skip(state, principal))]
pub async fn dashboard(
    State(state): State<AppState>,
    WorkerPrincipal(principal): WorkerPrincipal,
) -> Result<Json<WorkerDashboard>> {
    let profile = own_profile(&state, &principal).await?;
    let categories = live_categories(&state).await?;
    Ok(Json(WorkerDashboard::new(profile, &categories)))
}

/// Register the signed-in principal as a worker.
#[instrument(skip(state, principal, form))]
pub async fn register(
    State(state): State<AppState>,
    WorkerPrincipal(principal): WorkerPrincipal,
    Json(form): Json<WorkerRegistration>,
) -> Result<(StatusCode, Json<WorkerDashboard>)> {
    if state
        .backend()
        .refresh_my_worker_profile(&principal)
        .await?
        .is_some()
    {
        return Err(AppError::Conflict(
            "You already have a worker profile.".to_string(),
        ));
    }

    let profile = form
        .into_profile(WorkerId::generate(), principal.clone())
        .map_err(|e| AppError::BadRequest(e.to_string()))?;
    let id = profile.id.clone();

    state
        .backend()
        .register_worker(&principal, profile.clone())
        .await?;
    add_breadcrumb("worker", "Registered", Some(&[("worker_id", id.as_str())]));
    tracing::info!(worker_id = %id, "Worker registered");

    let categories = live_categories(&state).await?;
    Ok((
        StatusCode::CREATED,
        Json(WorkerDashboard::new(profile, &categories)),
    ))
}

/// Apply the signed-in worker's edits.
///
/// Changing name, phone, location, pricing or availability sends the
/// profile back to pending and hides it until re-approved.
#[instrument(skip(state, principal, form))]
pub async fn update(
    State(state): State<AppState>,
    WorkerPrincipal(principal): WorkerPrincipal,
    Json(form): Json<WorkerProfileEdit>,
) -> Result<Json<EditOutcome>> {
    let current = own_profile(&state, &principal).await?;
    let edited = form
        .apply_to(&current)
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let major = lifecycle::has_major_changes(&current, &edited);
    let stored = lifecycle::apply_worker_edit(&current, edited);

    state
        .backend()
        .update_worker_profile(&principal, &current.id, stored.clone())
        .await?;
    tracing::info!(worker_id = %current.id, major, "Worker profile updated");

    let saved = match state.backend().refresh_my_worker_profile(&principal).await {
        Ok(Some(saved)) => saved,
        Ok(None) => stored,
        Err(e) => {
            tracing::warn!(worker_id = %current.id, error = %e, "Re-reading saved profile failed");
            stored
        }
    };

    let categories = live_categories(&state).await?;
    Ok(Json(EditOutcome {
        dashboard: WorkerDashboard::new(saved, &categories),
        notice: major.then_some(REAPPROVAL_NOTICE),
    }))
}

/// Inquiries customers sent to the signed-in worker.
#[instrument(skip(state, principal))]
pub async fn jobs(
    State(state): State<AppState>,
    WorkerPrincipal(principal): WorkerPrincipal,
) -> Result<Json<JobsView>> {
    let profile = own_profile(&state, &principal).await?;
    let inquiries = state
        .backend()
        .get_worker_inquiries(&principal, &profile.id)
        .await?;

    Ok(Json(JobsView {
        worker_id: profile.id,
        inquiries,
    }))
}
