//! Status enums for marketplace entities.
//!
//! All statuses serialize to the lowercase `snake_case` strings used by the
//! backend contract (`"pending"`, `"pending_approval"`, `"new"`, ...).

use serde::{Deserialize, Serialize};

/// Error returned when a status string is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid {kind}: {value}")]
pub struct ParseStatusError {
    /// Which status type was being parsed.
    pub kind: &'static str,
    /// The rejected input.
    pub value: String,
}

/// Generates `as_str`, `Display` and `FromStr` from one string table so the
/// wire names cannot drift from the parser.
macro_rules! status_strings {
    ($ty:ident, $kind:literal, { $($variant:ident => $s:literal),+ $(,)? }) => {
        impl $ty {
            /// Every variant, in declaration order.
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            /// The wire representation of this status.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }
        }

        impl std::fmt::Display for $ty {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $ty {
            type Err = ParseStatusError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok(Self::$variant),)+
                    _ => Err(ParseStatusError {
                        kind: $kind,
                        value: s.to_string(),
                    }),
                }
            }
        }
    };
}

/// Approval state of a worker profile.
///
/// See [`crate::lifecycle`] for the allowed transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum WorkerStatus {
    /// Awaiting admin review. Every new or majorly edited profile starts here.
    #[default]
    Pending,
    Approved,
    Rejected,
    /// Approved and promoted by the backend.
    Featured,
}

status_strings!(WorkerStatus, "worker status", {
    Pending => "pending",
    Approved => "approved",
    Rejected => "rejected",
    Featured => "featured",
});

impl WorkerStatus {
    /// Whether this status allows the profile to be published.
    #[must_use]
    pub const fn is_approved(self) -> bool {
        matches!(self, Self::Approved | Self::Featured)
    }

    /// Human-readable badge label shown on dashboards.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pending => "Pending Approval",
            Self::Approved => "Approved",
            Self::Rejected => "Rejected",
            Self::Featured => "Featured",
        }
    }

    /// Explanation shown to the worker on their own dashboard.
    #[must_use]
    pub const fn dashboard_message(self) -> Option<&'static str> {
        match self {
            Self::Pending => Some(
                "Your profile is currently under review by our admin team. You will be notified once approved.",
            ),
            Self::Approved => Some("Your profile is live and visible to customers!"),
            Self::Rejected => Some(
                "Your profile was not approved. Please contact support for more information.",
            ),
            Self::Featured => None,
        }
    }
}

/// Moderation state of a service category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CategoryStatus {
    #[default]
    Active,
    PendingApproval,
    Rejected,
    Suspended,
}

status_strings!(CategoryStatus, "category status", {
    Active => "active",
    PendingApproval => "pending_approval",
    Rejected => "rejected",
    Suspended => "suspended",
});

/// Handling state of a customer inquiry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum InquiryStatus {
    #[default]
    New,
    Pending,
    Completed,
}

status_strings!(InquiryStatus, "inquiry status", {
    New => "new",
    Pending => "pending",
    Completed => "completed",
});

/// What kind of contact the customer is making.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum InquiryType {
    #[default]
    Question,
    Feedback,
    Booking,
}

status_strings!(InquiryType, "inquiry type", {
    Question => "question",
    Feedback => "feedback",
    Booking => "booking",
});

/// Admin list filter: either everything or a single status.
///
/// Parses from the query-string values `"all"` (or empty) and any status
/// name accepted by `T::from_str`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter<T> {
    #[default]
    All,
    Only(T),
}

impl<T: PartialEq + Copy> StatusFilter<T> {
    /// Whether a record with `status` passes this filter.
    #[must_use]
    pub fn matches(&self, status: T) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => *wanted == status,
        }
    }
}

impl<T> std::str::FromStr for StatusFilter<T>
where
    T: std::str::FromStr<Err = ParseStatusError>,
{
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "" | "all" => Ok(Self::All),
            other => other.parse().map(Self::Only),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_worker_status_round_trips_through_strings() {
        for status in WorkerStatus::ALL {
            assert_eq!(status.as_str().parse::<WorkerStatus>().unwrap(), *status);
        }
        assert!("archived".parse::<WorkerStatus>().is_err());
    }

    #[test]
    fn test_serde_names_match_wire_strings() {
        assert_eq!(
            serde_json::to_string(&CategoryStatus::PendingApproval).unwrap(),
            "\"pending_approval\""
        );
        assert_eq!(serde_json::to_string(&InquiryStatus::New).unwrap(), "\"new\"");
        let parsed: WorkerStatus = serde_json::from_str("\"featured\"").unwrap();
        assert_eq!(parsed, WorkerStatus::Featured);
    }

    #[test]
    fn test_is_approved() {
        assert!(WorkerStatus::Approved.is_approved());
        assert!(WorkerStatus::Featured.is_approved());
        assert!(!WorkerStatus::Pending.is_approved());
        assert!(!WorkerStatus::Rejected.is_approved());
    }

    #[test]
    fn test_status_filter_parse_and_match() {
        let all: StatusFilter<InquiryStatus> = "all".parse().unwrap();
        assert!(all.matches(InquiryStatus::Completed));

        let empty: StatusFilter<WorkerStatus> = "".parse().unwrap();
        assert_eq!(empty, StatusFilter::All);

        let pending: StatusFilter<WorkerStatus> = "pending".parse().unwrap();
        assert!(pending.matches(WorkerStatus::Pending));
        assert!(!pending.matches(WorkerStatus::Approved));

        let err = "bogus".parse::<StatusFilter<WorkerStatus>>().unwrap_err();
        assert_eq!(err.kind, "worker status");
    }

    #[test]
    fn test_parse_error_message() {
        let err = "done".parse::<InquiryStatus>().unwrap_err();
        assert_eq!(err.to_string(), "invalid inquiry status: done");
    }
}
