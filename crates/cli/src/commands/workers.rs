//! Worker moderation commands.

use tracing::info;

use seva_sangam_core::lifecycle;
use seva_sangam_core::{StatusFilter, WorkerAction, WorkerId, WorkerProfile, WorkerStatus};

use super::{CliError, Connection};

/// Workers matching `status` (`all` or a status name).
///
/// # Errors
///
/// Returns an error for an unknown status, missing credentials or a
/// failed backend call.
pub async fn fetch(conn: &Connection, status: &str) -> Result<Vec<WorkerProfile>, CliError> {
    let filter: StatusFilter<WorkerStatus> = status.parse()?;
    let workers = conn.backend().get_all_workers_admin(conn.admin()?).await?;
    Ok(workers
        .into_iter()
        .filter(|w| filter.matches(w.status))
        .collect())
}

/// Log workers matching `status`.
///
/// # Errors
///
/// See [`fetch`].
pub async fn list(conn: &Connection, status: &str) -> Result<(), CliError> {
    let workers = fetch(conn, status).await?;
    info!("{} workers", workers.len());
    for w in &workers {
        info!(
            "  {:<36} {:<24} {:<10} {:<9} {}",
            w.id,
            w.full_name,
            w.status,
            if w.published { "published" } else { "hidden" },
            w.location.label()
        );
    }
    Ok(())
}

/// Apply a moderation action to one worker.
///
/// The transition is checked before the backend is called.
///
/// # Errors
///
/// Returns an error if the worker does not exist, the transition is not
/// allowed, or a backend call fails.
pub async fn act(conn: &Connection, id: &str, action: WorkerAction) -> Result<(), CliError> {
    let creds = conn.admin()?;
    let backend = conn.backend();
    let id = WorkerId::new(id);

    let current = backend
        .get_worker_profile_admin(creds, &id)
        .await?
        .ok_or_else(|| CliError::NotFound(format!("worker {id}")))?;
    lifecycle::apply(current, action)?;

    match action {
        WorkerAction::Approve => backend.approve_worker(creds, &id).await?,
        WorkerAction::Reject => backend.reject_worker(creds, &id).await?,
        WorkerAction::Publish => backend.publish_worker(creds, &id).await?,
        WorkerAction::Unpublish => backend.unpublish_worker(creds, &id).await?,
        WorkerAction::Remove => backend.remove_worker(creds, &id).await?,
    }

    info!(worker_id = %id, "Worker {}", action.past_tense());
    Ok(())
}
