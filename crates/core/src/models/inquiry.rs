//! Customer inquiry model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{InquiryId, InquiryStatus, InquiryType, WorkerId};

/// Longest inquiry text accepted from a visitor.
pub const MAX_INQUIRY_TEXT_LEN: usize = 2000;

/// A contact request a customer left for a worker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inquiry {
    pub id: InquiryId,
    pub worker_id: WorkerId,
    pub inquiry_text: String,
    #[serde(default)]
    pub inquiry_type: InquiryType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_contact: Option<String>,
    #[serde(default)]
    pub status: InquiryStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_text: Option<String>,
    #[serde(default)]
    pub response_given: bool,
    pub created_at: DateTime<Utc>,
}

impl Inquiry {
    /// Copy of this inquiry marked completed.
    #[must_use]
    pub fn completed(&self) -> Self {
        Self {
            status: InquiryStatus::Completed,
            ..self.clone()
        }
    }
}

/// Validation failures for the inquiry form.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InquiryFormError {
    #[error("inquiry text is required")]
    EmptyText,
    #[error("inquiry text must be at most {max} characters")]
    TooLong { max: usize },
}

/// What a visitor submits to contact a worker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewInquiry {
    pub worker_id: WorkerId,
    pub inquiry_text: String,
    #[serde(default)]
    pub inquiry_type: InquiryType,
    #[serde(default)]
    pub customer_name: Option<String>,
    #[serde(default)]
    pub customer_contact: Option<String>,
}

impl NewInquiry {
    /// Validate the form and build a `new` inquiry.
    ///
    /// Whether the worker exists is checked by the backend.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is blank or too long.
    pub fn into_inquiry(
        self,
        id: InquiryId,
        created_at: DateTime<Utc>,
    ) -> Result<Inquiry, InquiryFormError> {
        let text = self.inquiry_text.trim();
        if text.is_empty() {
            return Err(InquiryFormError::EmptyText);
        }
        if text.chars().count() > MAX_INQUIRY_TEXT_LEN {
            return Err(InquiryFormError::TooLong {
                max: MAX_INQUIRY_TEXT_LEN,
            });
        }

        Ok(Inquiry {
            id,
            worker_id: self.worker_id,
            inquiry_text: text.to_string(),
            inquiry_type: self.inquiry_type,
            customer_name: non_blank(self.customer_name),
            customer_contact: non_blank(self.customer_contact),
            status: InquiryStatus::New,
            response_text: None,
            response_given: false,
            created_at,
        })
    }
}

/// Admin changes to an inquiry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InquiryUpdate {
    #[serde(default)]
    pub status: Option<InquiryStatus>,
    /// A non-blank response marks the inquiry as answered.
    #[serde(default)]
    pub response_text: Option<String>,
}

impl InquiryUpdate {
    /// Overlay the update on `current`.
    #[must_use]
    pub fn apply_to(self, current: &Inquiry) -> Inquiry {
        let mut updated = current.clone();
        if let Some(status) = self.status {
            updated.status = status;
        }
        if let Some(response) = non_blank(self.response_text) {
            updated.response_text = Some(response);
            updated.response_given = true;
        }
        updated
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
