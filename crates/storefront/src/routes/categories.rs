//! Category route handlers.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Serialize;
use tracing::instrument;

use seva_sangam_core::catalog;
use seva_sangam_core::{Category, CategoryId};

use crate::error::Result;
use crate::models::views::{CategoryView, PublicWorker, visible_categories};
use crate::state::AppState;

/// Category detail with its visible workers.
#[derive(Debug, Serialize)]
pub struct CategoryDetail {
    pub category: CategoryView,
    pub workers: Vec<PublicWorker>,
}

/// Live categories from the backend, used for label resolution.
pub(crate) async fn live_categories(state: &AppState) -> Result<Vec<Category>> {
    Ok(state.backend().get_all_categories().await?)
}

/// List categories.
#[instrument(skip(state))]
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<CategoryView>>> {
    let categories = live_categories(&state).await?;
    Ok(Json(visible_categories(categories)))
}

/// Show one category and the workers listed under it.
///
/// Unknown ids still resolve: the name falls back to the built-in catalog
/// and then to the raw id.
#[instrument(skip(state), fields(category_id = %id))]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<CategoryDetail>> {
    let id = CategoryId::new(id);
    let categories = live_categories(&state).await?;

    let category = match state.backend().get_category(&id).await? {
        Some(category) => CategoryView::from(category),
        None => CategoryView {
            icon: catalog::icon_index(id.as_str()),
            name: catalog::category_label(&id, &categories),
            description: None,
            id: id.clone(),
        },
    };

    let workers = state.backend().get_workers_by_category(&id).await?;

    Ok(Json(CategoryDetail {
        category,
        workers: PublicWorker::list(workers, &categories),
    }))
}
