//! Post-call follow-up prompt.

use axum::{Json, http::StatusCode};
use chrono::Utc;
use serde::Serialize;
use tower_sessions::Session;
use tracing::instrument;

use seva_sangam_core::WorkerId;
use seva_sangam_core::call_marker::{AlarmCheck, CallMarker};

use crate::error::Result;
use crate::models::session_keys;

/// Whether the follow-up prompt should be shown now.
#[derive(Debug, Serialize)]
pub struct AlarmStatus {
    pub show_alarm: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub worker_id: Option<WorkerId>,
}

impl AlarmStatus {
    const QUIET: Self = Self {
        show_alarm: false,
        worker_id: None,
    };
}

/// Check the call marker, firing the prompt at most once per call.
#[instrument(skip(session))]
pub async fn check(session: Session) -> Result<Json<AlarmStatus>> {
    let marker = match session.get::<CallMarker>(session_keys::CALL_MARKER).await {
        Ok(marker) => marker,
        Err(e) => {
            tracing::warn!(error = %e, "Discarding unreadable call marker");
            session.remove_value(session_keys::CALL_MARKER).await?;
            None
        }
    };

    let Some(marker) = marker else {
        return Ok(Json(AlarmStatus::QUIET));
    };

    match marker.check(Utc::now()) {
        AlarmCheck::Trigger(fired) => {
            session.insert(session_keys::CALL_MARKER, &fired).await?;
            Ok(Json(AlarmStatus {
                show_alarm: true,
                worker_id: fired.worker_id,
            }))
        }
        AlarmCheck::AlreadyTriggered => Ok(Json(AlarmStatus::QUIET)),
        AlarmCheck::Stale => {
            session.remove_value(session_keys::CALL_MARKER).await?;
            Ok(Json(AlarmStatus::QUIET))
        }
    }
}

/// Forget the call marker.
#[instrument(skip(session))]
pub async fn clear(session: Session) -> Result<StatusCode> {
    session.remove_value(session_keys::CALL_MARKER).await?;
    Ok(StatusCode::NO_CONTENT)
}
