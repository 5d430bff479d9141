//! Public worker route handlers.

use axum::{
    Json,
    extract::{Path, State},
};
use chrono::Utc;
use serde::Serialize;
use tower_sessions::Session;
use tracing::instrument;

use seva_sangam_core::{WorkerId, WorkerProfile};
use seva_sangam_core::call_marker::CallMarker;

use crate::error::{AppError, Result, add_breadcrumb};
use crate::models::session_keys;
use crate::models::views::PublicWorker;
use crate::routes::categories::live_categories;
use crate::state::AppState;

/// List every publicly visible worker.
#[instrument(skip(state))]
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<PublicWorker>>> {
    let categories = live_categories(&state).await?;
    let workers = state.backend().get_all_workers().await?;
    Ok(Json(PublicWorker::list(workers, &categories)))
}

/// Show one worker with contact links.
#[instrument(skip(state), fields(worker_id = %id))]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<PublicWorker>> {
    let categories = live_categories(&state).await?;
    let worker = visible_worker(&state, &WorkerId::new(id)).await?;
    Ok(Json(PublicWorker::new(worker, &categories)))
}

/// Response to starting a call.
#[derive(Debug, Serialize)]
pub struct CallStarted {
    pub tel: String,
}

/// Record that the visitor is calling a worker and return the `tel:` link.
#[instrument(skip(state, session), fields(worker_id = %id))]
pub async fn start_call(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
) -> Result<Json<CallStarted>> {
    let worker = visible_worker(&state, &WorkerId::new(id)).await?;

    let marker = CallMarker::start(Some(worker.id.clone()), Utc::now());
    session.insert(session_keys::CALL_MARKER, &marker).await?;
    add_breadcrumb("call", "Started call", Some(&[("worker_id", worker.id.as_str())]));

    Ok(Json(CallStarted {
        tel: worker.contact_links().tel,
    }))
}

async fn visible_worker(
    state: &AppState,
    id: &WorkerId,
) -> Result<WorkerProfile> {
    state
        .backend()
        .get_worker_profile(id)
        .await?
        .filter(WorkerProfile::is_publicly_visible)
        .ok_or_else(|| AppError::NotFound(format!("Worker not found: {id}")))
}
