//! In-memory worker search.
//!
//! A linear scan over an already fetched worker list. Input order is kept;
//! there is no ranking or pagination.

use serde::{Deserialize, Serialize};

use crate::models::WorkerProfile;
use crate::types::{CategoryId, ParseStatusError};

/// Coarse availability derived from a worker's schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AvailabilityBucket {
    /// Available all seven days.
    FullTime,
    PartTime,
}

impl AvailabilityBucket {
    /// Bucket for a schedule with `days` available days.
    #[must_use]
    pub const fn from_day_count(days: usize) -> Self {
        if days == 7 { Self::FullTime } else { Self::PartTime }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::FullTime => "full-time",
            Self::PartTime => "part-time",
        }
    }
}

impl std::fmt::Display for AvailabilityBucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for AvailabilityBucket {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "full-time" => Ok(Self::FullTime),
            "part-time" => Ok(Self::PartTime),
            other => Err(ParseStatusError {
                kind: "availability",
                value: other.to_string(),
            }),
        }
    }
}

/// Optional predicates applied to a worker list. Unset fields match all.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkerFilter {
    pub category: Option<CategoryId>,
    /// Stored lowercased.
    location: Option<String>,
    pub availability: Option<AvailabilityBucket>,
}

impl WorkerFilter {
    /// Build a filter from raw query values, treating blank values as unset.
    ///
    /// # Errors
    ///
    /// Returns an error if `availability` is neither `full-time` nor
    /// `part-time`.
    pub fn from_query(
        category: Option<&str>,
        location: Option<&str>,
        availability: Option<&str>,
    ) -> Result<Self, ParseStatusError> {
        let availability = non_blank(availability).map(str::parse).transpose()?;
        Ok(Self {
            category: non_blank(category).map(CategoryId::new),
            location: non_blank(location).map(str::to_lowercase),
            availability,
        })
    }

    /// Restrict to one category.
    #[must_use]
    pub fn with_category(mut self, category: impl Into<CategoryId>) -> Self {
        let category = category.into();
        self.category = (!category.as_str().trim().is_empty()).then_some(category);
        self
    }

    /// Restrict to workers whose city or district contains `text`.
    #[must_use]
    pub fn with_location(mut self, text: &str) -> Self {
        self.location = non_blank(Some(text)).map(str::to_lowercase);
        self
    }

    #[must_use]
    pub const fn with_availability(mut self, bucket: AvailabilityBucket) -> Self {
        self.availability = Some(bucket);
        self
    }

    /// The normalized location text, if set.
    #[must_use]
    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    /// Whether any predicate is set.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.category.is_some() || self.location.is_some() || self.availability.is_some()
    }

    /// Whether `worker` passes every set predicate.
    #[must_use]
    pub fn matches(&self, worker: &WorkerProfile) -> bool {
        if let Some(category) = &self.category
            && worker.category_id != *category
        {
            return false;
        }

        if let Some(needle) = &self.location {
            let contains = |field: Option<&str>| {
                field.is_some_and(|value| value.to_lowercase().contains(needle.as_str()))
            };
            if !contains(worker.location.city.as_deref())
                && !contains(worker.location.district.as_deref())
            {
                return false;
            }
        }

        self.availability
            .is_none_or(|bucket| worker.availability_bucket() == bucket)
    }

    /// Keep the workers that match, preserving order.
    #[must_use]
    pub fn apply(&self, workers: Vec<WorkerProfile>) -> Vec<WorkerProfile> {
        workers.into_iter().filter(|w| self.matches(w)).collect()
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
