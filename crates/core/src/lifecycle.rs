//! Worker approval and publication rules.
//!
//! Status moves `pending -> approved | rejected` and back and forth between
//! `approved` and `rejected` at an admin's discretion. There is no terminal
//! state. The `published` flag is independent of the status, except that it
//! may only be `true` while the status is `approved` or `featured`.

use serde::{Deserialize, Serialize};

use crate::models::WorkerProfile;
use crate::types::{ParseStatusError, WorkerStatus};

/// A moderation action an admin can take on a worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkerAction {
    Approve,
    Reject,
    Publish,
    Unpublish,
    Remove,
}

impl WorkerAction {
    /// Every action, in declaration order.
    pub const ALL: &'static [Self] = &[
        Self::Approve,
        Self::Reject,
        Self::Publish,
        Self::Unpublish,
        Self::Remove,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Approve => "approve",
            Self::Reject => "reject",
            Self::Publish => "publish",
            Self::Unpublish => "unpublish",
            Self::Remove => "remove",
        }
    }

    /// Past-tense verb for confirmation messages.
    #[must_use]
    pub const fn past_tense(self) -> &'static str {
        match self {
            Self::Approve => "approved",
            Self::Reject => "rejected",
            Self::Publish => "published",
            Self::Unpublish => "unpublished",
            Self::Remove => "removed",
        }
    }
}

impl std::fmt::Display for WorkerAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for WorkerAction {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|action| action.as_str() == s)
            .ok_or_else(|| ParseStatusError {
                kind: "worker action",
                value: s.to_string(),
            })
    }
}

/// Errors from applying a [`WorkerAction`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LifecycleError {
    /// Publishing requires an approved or featured status.
    #[error("worker must be approved before publishing (status: {0})")]
    NotApproved(WorkerStatus),
}

/// Result of applying an action to a profile.
#[derive(Debug, Clone, PartialEq)]
pub enum ActionOutcome {
    Updated(WorkerProfile),
    Removed,
}

/// Whether a worker with this state is visible to customers.
#[must_use]
pub const fn is_publicly_visible(status: WorkerStatus, published: bool) -> bool {
    published && status.is_approved()
}

/// Apply an admin action to `profile`.
///
/// # Errors
///
/// Returns [`LifecycleError::NotApproved`] when publishing a pending or
/// rejected worker.
pub fn apply(profile: WorkerProfile, action: WorkerAction) -> Result<ActionOutcome, LifecycleError> {
    let updated = match action {
        WorkerAction::Approve => match profile.status {
            WorkerStatus::Pending | WorkerStatus::Rejected => WorkerProfile {
                status: WorkerStatus::Approved,
                ..profile
            },
            WorkerStatus::Approved | WorkerStatus::Featured => profile,
        },
        WorkerAction::Reject => WorkerProfile {
            status: WorkerStatus::Rejected,
            published: false,
            ..profile
        },
        WorkerAction::Publish => {
            if !profile.status.is_approved() {
                return Err(LifecycleError::NotApproved(profile.status));
            }
            WorkerProfile {
                published: true,
                ..profile
            }
        }
        WorkerAction::Unpublish => WorkerProfile {
            published: false,
            ..profile
        },
        WorkerAction::Remove => return Ok(ActionOutcome::Removed),
    };
    Ok(ActionOutcome::Updated(updated))
}

/// Whether `edited` changes any field that requires re-approval.
#[must_use]
pub fn has_major_changes(current: &WorkerProfile, edited: &WorkerProfile) -> bool {
    current.full_name != edited.full_name
        || current.phone_number != edited.phone_number
        || current.location != edited.location
        || current.pricing != edited.pricing
        || current.availability != edited.availability
}

/// Merge a worker's own edit into the stored profile.
///
/// Identity, category and moderation fields always come from `current`. A
/// major change sends the profile back to review and hides it.
#[must_use]
pub fn apply_worker_edit(current: &WorkerProfile, edited: WorkerProfile) -> WorkerProfile {
    let major = has_major_changes(current, &edited);
    let (status, published) = if major {
        (WorkerStatus::Pending, false)
    } else {
        (current.status, current.published)
    };

    WorkerProfile {
        id: current.id.clone(),
        principal: current.principal.clone(),
        category_id: current.category_id.clone(),
        status,
        published,
        ..edited
    }
}
