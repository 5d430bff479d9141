//! HTTP route handlers for admin.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                          - Health check
//!
//! # Auth
//! GET  /admin-login                     - Login landing (redirects to /admin when signed in)
//! POST /api/auth/login                  - {username, password}
//! POST /api/auth/logout
//! GET  /api/auth/session
//!
//! # Dashboard (requires auth)
//! GET  /admin                           - Summary counts
//!
//! # Workers (requires auth)
//! GET    /api/workers?status=
//! GET    /api/workers/{id}
//! DELETE /api/workers/{id}
//! POST   /api/workers/{id}/approve|reject|publish|unpublish
//! GET    /api/workers/{id}/inquiries
//!
//! # Categories (requires auth)
//! GET    /api/categories
//! POST   /api/categories
//! PUT    /api/categories/{id}
//! DELETE /api/categories/{id}
//!
//! # Inquiries (requires auth)
//! GET    /api/inquiries?status=
//! PUT    /api/inquiries/{id}
//! POST   /api/inquiries/{id}/complete
//! DELETE /api/inquiries/{id}
//! ```

pub mod auth;
pub mod categories;
pub mod dashboard;
pub mod inquiries;
pub mod workers;

use axum::Router;

use crate::state::AppState;

/// Build the complete admin router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(auth::router())
        .merge(dashboard::router())
        .merge(workers::router())
        .merge(categories::router())
        .merge(inquiries::router())
}
