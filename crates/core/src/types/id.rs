//! Newtype IDs for type-safe entity references.
//!
//! The backend identifies every entity by an opaque string. Use the
//! `define_id!` macro to create wrappers that prevent accidentally mixing IDs
//! from different entity types.

use chrono::Utc;
use rand::Rng;

/// Macro to define a type-safe string ID wrapper.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Ord`, `Hash`
/// - Conversion methods: `new()`, `as_str()`, `into_inner()`
/// - `From<String>`, `From<&str>` and `Into<String>` implementations
///
/// # Example
///
/// ```rust
/// # use seva_sangam_core::define_id;
/// define_id!(ReviewId);
/// define_id!(BookingId);
///
/// let review_id = ReviewId::new("review-1");
/// let booking_id = BookingId::new("review-1");
///
/// // These are different types, so this won't compile:
/// // let _: ReviewId = booking_id;
/// assert_eq!(review_id.as_str(), booking_id.as_str());
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            PartialEq,
            Eq,
            PartialOrd,
            Ord,
            Hash,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new ID from any string-like value.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Get the underlying string value.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the ID and return the underlying string.
            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl ::core::convert::AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id!(WorkerId);
define_id!(CategoryId);
define_id!(InquiryId);
define_id!(Principal);

/// Length of the random suffix on generated IDs.
const RANDOM_SUFFIX_LEN: usize = 9;

/// Build an ID of the form `<prefix>-<unix millis>-<9 base36 chars>`.
fn generate_with_prefix(prefix: &str) -> String {
    let mut rng = rand::rng();
    let suffix: String = (0..RANDOM_SUFFIX_LEN)
        .map(|_| char::from_digit(rng.random_range(0..36), 36).unwrap_or('0'))
        .collect();
    format!("{prefix}-{}-{suffix}", Utc::now().timestamp_millis())
}

impl WorkerId {
    /// Generate a fresh worker ID for a new registration.
    #[must_use]
    pub fn generate() -> Self {
        Self(generate_with_prefix("worker"))
    }
}

impl InquiryId {
    /// Generate a fresh inquiry ID.
    #[must_use]
    pub fn generate() -> Self {
        Self(generate_with_prefix("inquiry"))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_worker_id_shape() {
        let id = WorkerId::generate();
        let parts: Vec<&str> = id.as_str().split('-').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts.first().copied(), Some("worker"));
        assert!(parts.get(1).is_some_and(|p| p.parse::<i64>().is_ok()));
        assert!(parts.get(2).is_some_and(|p| {
            p.len() == RANDOM_SUFFIX_LEN
                && p.chars()
                    .all(|c| c.is_ascii_digit() || c.is_ascii_lowercase())
        }));
    }

    #[test]
    fn test_generated_ids_differ() {
        assert_ne!(InquiryId::generate(), InquiryId::generate());
        assert!(InquiryId::generate().as_str().starts_with("inquiry-"));
    }

    #[test]
    fn test_id_serializes_transparently() {
        let id = CategoryId::new("plumber");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"plumber\"");
        let back: CategoryId = serde_json::from_str("\"mason\"").unwrap();
        assert_eq!(back.as_str(), "mason");
    }
}
