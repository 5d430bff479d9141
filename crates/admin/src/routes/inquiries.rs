//! Inquiry management routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post, put},
};
use tracing::instrument;

use seva_sangam_core::{Inquiry, InquiryId, InquiryStatus, InquiryUpdate};

use crate::error::{AppError, Result};
use crate::middleware::{AdminGuard, RequireAdminSession};
use crate::routes::workers::StatusQuery;
use crate::state::AppState;

/// Build the inquiries router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/inquiries", get(list))
        .route("/api/inquiries/{id}", put(update).delete(remove))
        .route("/api/inquiries/{id}/complete", post(complete))
}

/// GET /api/inquiries?status=
#[instrument(skip(state, admin), fields(admin = %admin.username()))]
async fn list(
    State(state): State<AppState>,
    RequireAdminSession(admin): RequireAdminSession,
    Query(query): Query<StatusQuery>,
) -> Result<Json<Vec<Inquiry>>> {
    let filter = query.filter::<InquiryStatus>()?;
    let mut inquiries = admin
        .check(state.backend().get_all_inquiries(&admin.credentials()).await)
        .await?;

    inquiries.retain(|i| filter.matches(i.status));
    inquiries.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    Ok(Json(inquiries))
}

/// The backend has no single-inquiry read, so look it up in the full list.
async fn find(state: &AppState, admin: &AdminGuard, id: &InquiryId) -> Result<Inquiry> {
    admin
        .check(state.backend().get_all_inquiries(&admin.credentials()).await)
        .await?
        .into_iter()
        .find(|i| &i.id == id)
        .ok_or_else(|| AppError::NotFound(format!("Inquiry not found: {id}")))
}

async fn store(state: &AppState, admin: &AdminGuard, inquiry: Inquiry) -> Result<Inquiry> {
    admin
        .check(
            state
                .backend()
                .update_inquiry(&admin.credentials(), &inquiry.id, inquiry.clone())
                .await,
        )
        .await?;
    Ok(inquiry)
}

/// PUT /api/inquiries/{id}
#[instrument(skip(state, admin, update), fields(admin = %admin.username()))]
async fn update(
    State(state): State<AppState>,
    RequireAdminSession(admin): RequireAdminSession,
    Path(id): Path<String>,
    Json(update): Json<InquiryUpdate>,
) -> Result<Json<Inquiry>> {
    let current = find(&state, &admin, &InquiryId::new(id)).await?;
    let inquiry = store(&state, &admin, update.apply_to(&current)).await?;
    tracing::info!(inquiry_id = %inquiry.id, status = %inquiry.status, "Inquiry updated");
    Ok(Json(inquiry))
}

/// POST /api/inquiries/{id}/complete
#[instrument(skip(state, admin), fields(admin = %admin.username()))]
async fn complete(
    State(state): State<AppState>,
    RequireAdminSession(admin): RequireAdminSession,
    Path(id): Path<String>,
) -> Result<Json<Inquiry>> {
    let current = find(&state, &admin, &InquiryId::new(id)).await?;
    let inquiry = store(&state, &admin, current.completed()).await?;
    tracing::info!(inquiry_id = %inquiry.id, "Inquiry completed");
    Ok(Json(inquiry))
}

/// DELETE /api/inquiries/{id}
#[instrument(skip(state, admin), fields(admin = %admin.username()))]
async fn remove(
    State(state): State<AppState>,
    RequireAdminSession(admin): RequireAdminSession,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    let id = InquiryId::new(id);
    admin
        .check(state.backend().delete_inquiry(&admin.credentials(), &id).await)
        .await?;
    tracing::info!(inquiry_id = %id, "Inquiry deleted");
    Ok(StatusCode::NO_CONTENT)
}
