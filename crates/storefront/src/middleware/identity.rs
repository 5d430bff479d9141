//! Worker identity extractor.
//!
//! Workers sign in through an identity gateway in front of the storefront.
//! The gateway strips any client-supplied copy of [`PRINCIPAL_HEADER`] and
//! sets it to the authenticated principal.

use axum::{extract::FromRequestParts, http::request::Parts};

use seva_sangam_core::Principal;

use crate::error::AppError;

/// Header carrying the authenticated worker principal.
pub const PRINCIPAL_HEADER: &str = "x-seva-principal";

/// Extractor that requires a signed-in worker.
///
/// # Example
///
/// ```rust,ignore
/// async fn my_profile(WorkerPrincipal(principal): WorkerPrincipal) -> impl IntoResponse {
///     format!("Hello, {principal}!")
/// }
/// ```
pub struct WorkerPrincipal(pub Principal);

impl<S> FromRequestParts<S> for WorkerPrincipal
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let principal = parts
            .headers
            .get(PRINCIPAL_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .ok_or_else(|| AppError::Unauthorized("Please sign in to continue.".to_string()))?;

        sentry::configure_scope(|scope| {
            scope.set_user(Some(sentry::User {
                id: Some(principal.to_string()),
                ..Default::default()
            }));
        });

        Ok(Self(Principal::new(principal)))
    }
}
