//! Admin dashboard.

use axum::{Json, Router, extract::State, routing::get};
use tracing::instrument;

use crate::error::Result;
use crate::middleware::RequireAdminSession;
use crate::models::views::DashboardSummary;
use crate::state::AppState;

/// Build the dashboard router.
pub fn router() -> Router<AppState> {
    Router::new().route("/admin", get(dashboard))
}

/// Summary counts of workers, inquiries and categories.
///
/// GET /admin
#[instrument(skip(state, admin), fields(admin = %admin.username()))]
async fn dashboard(
    State(state): State<AppState>,
    RequireAdminSession(admin): RequireAdminSession,
) -> Result<Json<DashboardSummary>> {
    let creds = admin.credentials();
    let backend = state.backend();

    let workers = admin.check(backend.get_all_workers_admin(&creds).await).await?;
    let inquiries = admin.check(backend.get_all_inquiries(&creds).await).await?;
    let categories = backend.get_all_categories().await?;

    Ok(Json(DashboardSummary::new(
        admin.username().to_string(),
        &workers,
        &inquiries,
        &categories,
    )))
}
