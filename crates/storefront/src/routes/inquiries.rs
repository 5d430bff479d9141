//! Inquiry submission handler.

use axum::{Json, extract::State, http::StatusCode};
use chrono::Utc;
use serde::Serialize;
use tracing::instrument;

use seva_sangam_core::{InquiryId, NewInquiry};

use crate::error::{AppError, Result, add_breadcrumb};
use crate::state::AppState;

/// Confirmation returned after an inquiry is stored.
#[derive(Debug, Serialize)]
pub struct InquiryCreated {
    pub id: InquiryId,
    pub message: &'static str,
}

/// Create an inquiry for a visible worker.
#[instrument(skip(state, form), fields(worker_id = %form.worker_id))]
pub async fn create(
    State(state): State<AppState>,
    Json(form): Json<NewInquiry>,
) -> Result<(StatusCode, Json<InquiryCreated>)> {
    let visible = state
        .backend()
        .get_worker_profile(&form.worker_id)
        .await?
        .is_some_and(|w| w.is_publicly_visible());
    if !visible {
        return Err(AppError::NotFound(format!(
            "Worker not found: {}",
            form.worker_id
        )));
    }

    let inquiry = form
        .into_inquiry(InquiryId::generate(), Utc::now())
        .map_err(|e| AppError::BadRequest(e.to_string()))?;
    let id = inquiry.id.clone();

    state.backend().create_inquiry(inquiry).await?;
    add_breadcrumb("inquiry", "Inquiry submitted", Some(&[("inquiry_id", id.as_str())]));
    tracing::info!(inquiry_id = %id, "Inquiry created");

    Ok((
        StatusCode::CREATED,
        Json(InquiryCreated {
            id,
            message: "Your inquiry has been sent. The worker will get back to you soon.",
        }),
    ))
}
