//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                    - Health check
//!
//! # Browsing
//! GET  /api/categories            - Category listing
//! GET  /api/categories/{id}       - Category detail with its workers
//! GET  /api/workers               - Visible workers
//! GET  /api/workers/{id}          - Worker detail with contact links
//! GET  /api/search                - Filter by category, location, availability
//!
//! # Contact
//! POST   /api/inquiries           - Send an inquiry to a worker
//! POST   /api/workers/{id}/call   - Record a call, returns tel: link
//! GET    /api/call-alarm          - Check-and-trigger the post-call prompt
//! DELETE /api/call-alarm          - Clear the call marker
//!
//! # Worker self-service (requires x-seva-principal)
//! GET  /api/me/worker             - Dashboard
//! POST /api/me/worker             - Register
//! PUT  /api/me/worker             - Edit own profile
//! GET  /api/me/jobs               - Own inquiries
//! GET  /api/me/profile            - Account name and role
//! PUT  /api/me/profile            - Save account name and role
//! ```

pub mod call_alarm;
pub mod categories;
pub mod inquiries;
pub mod me;
pub mod profile;
pub mod search;
pub mod workers;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the `/api` router.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/categories", get(categories::list))
        .route("/categories/{id}", get(categories::show))
        .route("/workers", get(workers::list))
        .route("/workers/{id}", get(workers::show))
        .route("/workers/{id}/call", post(workers::start_call))
        .route("/search", get(search::search))
        .route("/inquiries", post(inquiries::create))
        .route(
            "/call-alarm",
            get(call_alarm::check).delete(call_alarm::clear),
        )
        .route(
            "/me/worker",
            get(me::dashboard).post(me::register).put(me::update),
        )
        .route("/me/jobs", get(me::jobs))
        .route("/me/profile", get(profile::show).put(profile::save))
}
