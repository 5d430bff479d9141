//! Worker moderation.

use tracing::instrument;

use seva_sangam_core::lifecycle;
use seva_sangam_core::{ActionOutcome, MarketplaceBackend, WorkerAction, WorkerId};

use crate::error::{AppError, Result};
use crate::middleware::AdminGuard;

/// Apply a lifecycle action to a worker.
///
/// The transition is checked locally first so an illegal request (such as
/// publishing a pending worker) is refused without a backend round trip.
///
/// # Errors
///
/// Returns [`AppError::NotFound`] for an unknown worker,
/// [`AppError::Lifecycle`] for a disallowed transition, or the backend error.
#[instrument(skip(backend, admin), fields(admin = %admin.username()))]
pub async fn moderate(
    backend: &dyn MarketplaceBackend,
    admin: &AdminGuard,
    id: &WorkerId,
    action: WorkerAction,
) -> Result<ActionOutcome> {
    let creds = admin.credentials();

    let current = admin
        .check(backend.get_worker_profile_admin(&creds, id).await)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Worker not found: {id}")))?;

    let outcome = lifecycle::apply(current, action)?;

    let result = match action {
        WorkerAction::Approve => backend.approve_worker(&creds, id).await,
        WorkerAction::Reject => backend.reject_worker(&creds, id).await,
        WorkerAction::Publish => backend.publish_worker(&creds, id).await,
        WorkerAction::Unpublish => backend.unpublish_worker(&creds, id).await,
        WorkerAction::Remove => backend.remove_worker(&creds, id).await,
    };
    admin.check(result).await?;

    tracing::info!(worker_id = %id, action = %action, "Worker {}", action.past_tense());
    Ok(outcome)
}
