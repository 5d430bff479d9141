//! Worker moderation routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::Deserialize;
use tracing::instrument;

use seva_sangam_core::{
    ActionOutcome, Inquiry, ParseStatusError, StatusFilter, WorkerAction, WorkerId, WorkerStatus,
};

use crate::error::{AppError, Result};
use crate::middleware::{AdminGuard, RequireAdminSession};
use crate::models::views::AdminWorker;
use crate::services::moderate;
use crate::state::AppState;

/// Build the workers router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/workers", get(list))
        .route("/api/workers/{id}", get(show).delete(remove))
        .route("/api/workers/{id}/approve", post(approve))
        .route("/api/workers/{id}/reject", post(reject))
        .route("/api/workers/{id}/publish", post(publish))
        .route("/api/workers/{id}/unpublish", post(unpublish))
        .route("/api/workers/{id}/inquiries", get(inquiries))
}

/// `?status=` query shared by the admin list endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct StatusQuery {
    #[serde(default)]
    pub status: Option<String>,
}

impl StatusQuery {
    /// Parse into a filter; missing, blank or `all` means everything.
    pub(crate) fn filter<T>(&self) -> Result<StatusFilter<T>>
    where
        T: std::str::FromStr<Err = ParseStatusError>,
    {
        self.status
            .as_deref()
            .unwrap_or_default()
            .parse()
            .map_err(|e: ParseStatusError| AppError::BadRequest(e.to_string()))
    }
}

/// All workers, any status, optionally filtered.
///
/// GET /api/workers?status=
#[instrument(skip(state, admin), fields(admin = %admin.username()))]
async fn list(
    State(state): State<AppState>,
    RequireAdminSession(admin): RequireAdminSession,
    Query(query): Query<StatusQuery>,
) -> Result<Json<Vec<AdminWorker>>> {
    let filter = query.filter::<WorkerStatus>()?;
    let workers = admin
        .check(state.backend().get_all_workers_admin(&admin.credentials()).await)
        .await?;
    let categories = state.backend().get_all_categories().await?;

    let workers = workers
        .into_iter()
        .filter(|w| filter.matches(w.status))
        .collect();
    Ok(Json(AdminWorker::list(workers, &categories)))
}

/// GET /api/workers/{id}
#[instrument(skip(state, admin), fields(admin = %admin.username()))]
async fn show(
    State(state): State<AppState>,
    RequireAdminSession(admin): RequireAdminSession,
    Path(id): Path<String>,
) -> Result<Json<AdminWorker>> {
    let id = WorkerId::new(id);
    let worker = admin
        .check(
            state
                .backend()
                .get_worker_profile_admin(&admin.credentials(), &id)
                .await,
        )
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Worker not found: {id}")))?;
    let categories = state.backend().get_all_categories().await?;

    Ok(Json(AdminWorker::new(worker, &categories)))
}

/// Inquiries customers sent to one worker.
///
/// GET /api/workers/{id}/inquiries
#[instrument(skip(state, admin), fields(admin = %admin.username()))]
async fn inquiries(
    State(state): State<AppState>,
    RequireAdminSession(admin): RequireAdminSession,
    Path(id): Path<String>,
) -> Result<Json<Vec<Inquiry>>> {
    let inquiries = admin
        .check(
            state
                .backend()
                .get_worker_inquiries_admin(&admin.credentials(), &WorkerId::new(id))
                .await,
        )
        .await?;
    Ok(Json(inquiries))
}

async fn act(
    state: &AppState,
    admin: &AdminGuard,
    id: String,
    action: WorkerAction,
) -> Result<Response> {
    let id = WorkerId::new(id);
    match moderate(state.backend().as_ref(), admin, &id, action).await? {
        ActionOutcome::Updated(profile) => {
            let categories = state.backend().get_all_categories().await?;
            Ok(Json(AdminWorker::new(profile, &categories)).into_response())
        }
        ActionOutcome::Removed => Ok(StatusCode::NO_CONTENT.into_response()),
    }
}

/// POST /api/workers/{id}/approve
async fn approve(
    State(state): State<AppState>,
    RequireAdminSession(admin): RequireAdminSession,
    Path(id): Path<String>,
) -> Result<Response> {
    act(&state, &admin, id, WorkerAction::Approve).await
}

/// POST /api/workers/{id}/reject
async fn reject(
    State(state): State<AppState>,
    RequireAdminSession(admin): RequireAdminSession,
    Path(id): Path<String>,
) -> Result<Response> {
    act(&state, &admin, id, WorkerAction::Reject).await
}

/// POST /api/workers/{id}/publish
async fn publish(
    State(state): State<AppState>,
    RequireAdminSession(admin): RequireAdminSession,
    Path(id): Path<String>,
) -> Result<Response> {
    act(&state, &admin, id, WorkerAction::Publish).await
}

/// POST /api/workers/{id}/unpublish
async fn unpublish(
    State(state): State<AppState>,
    RequireAdminSession(admin): RequireAdminSession,
    Path(id): Path<String>,
) -> Result<Response> {
    act(&state, &admin, id, WorkerAction::Unpublish).await
}

/// Hard-delete a worker.
///
/// DELETE /api/workers/{id}
async fn remove(
    State(state): State<AppState>,
    RequireAdminSession(admin): RequireAdminSession,
    Path(id): Path<String>,
) -> Result<Response> {
    act(&state, &admin, id, WorkerAction::Remove).await
}
