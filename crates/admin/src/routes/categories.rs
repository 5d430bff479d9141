//! Category management routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, put},
};
use tracing::instrument;

use seva_sangam_core::{Category, CategoryForm, CategoryId};

use crate::error::{AppError, Result};
use crate::middleware::RequireAdminSession;
use crate::state::AppState;

/// Build the categories router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/categories", get(list).post(create))
        .route("/api/categories/{id}", put(update).delete(remove))
}

/// Every category the backend holds, whatever its status.
///
/// GET /api/categories
#[instrument(skip(state, _admin))]
async fn list(
    State(state): State<AppState>,
    RequireAdminSession(_admin): RequireAdminSession,
) -> Result<Json<Vec<Category>>> {
    Ok(Json(state.backend().get_all_categories().await?))
}

/// POST /api/categories
#[instrument(skip(state, admin, form), fields(admin = %admin.username()))]
async fn create(
    State(state): State<AppState>,
    RequireAdminSession(admin): RequireAdminSession,
    Json(form): Json<CategoryForm>,
) -> Result<(StatusCode, Json<Category>)> {
    let category = form
        .into_category(None)
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    admin
        .check(
            state
                .backend()
                .create_category(&admin.credentials(), category.clone())
                .await,
        )
        .await?;
    tracing::info!(category_id = %category.id, "Category created");

    Ok((StatusCode::CREATED, Json(category)))
}

/// PUT /api/categories/{id}
#[instrument(skip(state, admin, form), fields(admin = %admin.username()))]
async fn update(
    State(state): State<AppState>,
    RequireAdminSession(admin): RequireAdminSession,
    Path(id): Path<String>,
    Json(form): Json<CategoryForm>,
) -> Result<Json<Category>> {
    let id = CategoryId::new(id);
    let category = form
        .into_category(Some(id.clone()))
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    admin
        .check(
            state
                .backend()
                .update_category(&admin.credentials(), &id, category.clone())
                .await,
        )
        .await?;
    tracing::info!(category_id = %id, "Category updated");

    Ok(Json(category))
}

/// Delete a category. Workers listed under it keep the id.
///
/// DELETE /api/categories/{id}
#[instrument(skip(state, admin), fields(admin = %admin.username()))]
async fn remove(
    State(state): State<AppState>,
    RequireAdminSession(admin): RequireAdminSession,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    let id = CategoryId::new(id);
    admin
        .check(
            state
                .backend()
                .delete_category(&admin.credentials(), &id)
                .await,
        )
        .await?;
    tracing::info!(category_id = %id, "Category deleted");

    Ok(StatusCode::NO_CONTENT)
}
