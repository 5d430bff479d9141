//! HTTP middleware stack for admin.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (capture errors, transactions)
//! 2. `TraceLayer` (request span with status and latency)
//! 3. Request ID (fresh ID per request)
//! 4. Security headers (no caching, no indexing)
//! 5. Session layer (tower-sessions, in-process store, SameSite=Strict)
//!
//! Privileged handlers take the [`RequireAdminSession`] extractor.

pub mod auth;
pub mod request_id;
pub mod security_headers;
pub mod session;

pub use auth::{AdminGuard, RequireAdminSession, clear_admin_session, set_admin_session};
pub use request_id::request_id_middleware;
pub use security_headers::security_headers_middleware;
pub use session::create_session_layer;
