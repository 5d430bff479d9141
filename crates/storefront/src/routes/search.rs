//! Worker search handler.

use axum::{
    Json,
    extract::{Query, State},
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use seva_sangam_core::WorkerFilter;

use crate::error::{AppError, Result};
use crate::models::views::PublicWorker;
use crate::routes::categories::live_categories;
use crate::state::AppState;

/// Search query parameters. Blank values are ignored.
#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    pub category: Option<String>,
    pub location: Option<String>,
    pub availability: Option<String>,
}

/// Search results.
#[derive(Debug, Serialize)]
pub struct SearchResults {
    pub filtered: bool,
    pub count: usize,
    pub workers: Vec<PublicWorker>,
}

/// Filter the visible worker list.
#[instrument(skip(state))]
pub async fn search(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<SearchResults>> {
    let filter = WorkerFilter::from_query(
        query.category.as_deref(),
        query.location.as_deref(),
        query.availability.as_deref(),
    )
    .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let categories = live_categories(&state).await?;
    let workers = filter.apply(state.backend().get_all_workers().await?);
    let workers = PublicWorker::list(workers, &categories);

    Ok(Json(SearchResults {
        filtered: filter.is_active(),
        count: workers.len(),
        workers,
    }))
}
