//! JSON views returned by the admin API.

use std::collections::BTreeMap;

use serde::Serialize;

use seva_sangam_core::catalog;
use seva_sangam_core::{Category, Inquiry, InquiryStatus, WorkerProfile, WorkerStatus};

/// A worker as moderators see it, owner principal included.
#[derive(Debug, Clone, Serialize)]
pub struct AdminWorker {
    #[serde(flatten)]
    pub profile: WorkerProfile,
    pub category_label: String,
    pub status_label: &'static str,
    pub publicly_visible: bool,
}

impl AdminWorker {
    #[must_use]
    pub fn new(profile: WorkerProfile, categories: &[Category]) -> Self {
        Self {
            category_label: catalog::category_label(&profile.category_id, categories),
            status_label: profile.status.label(),
            publicly_visible: profile.is_publicly_visible(),
            profile,
        }
    }

    #[must_use]
    pub fn list(workers: Vec<WorkerProfile>, categories: &[Category]) -> Vec<Self> {
        workers
            .into_iter()
            .map(|w| Self::new(w, categories))
            .collect()
    }
}

/// Record counts keyed by status name. Every status is present, zero or not.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    pub total: usize,
    pub by_status: BTreeMap<&'static str, usize>,
}

impl StatusCounts {
    fn tally(all: impl IntoIterator<Item = &'static str>, seen: impl Iterator<Item = &'static str>) -> Self {
        let mut by_status: BTreeMap<&'static str, usize> = all.into_iter().map(|s| (s, 0)).collect();
        let mut total = 0;
        for status in seen {
            *by_status.entry(status).or_default() += 1;
            total += 1;
        }
        Self { total, by_status }
    }

    #[must_use]
    pub fn workers(workers: &[WorkerProfile]) -> Self {
        Self::tally(
            WorkerStatus::ALL.iter().map(|s| s.as_str()),
            workers.iter().map(|w| w.status.as_str()),
        )
    }

    #[must_use]
    pub fn inquiries(inquiries: &[Inquiry]) -> Self {
        Self::tally(
            InquiryStatus::ALL.iter().map(|s| s.as_str()),
            inquiries.iter().map(|i| i.status.as_str()),
        )
    }

    #[must_use]
    pub fn get(&self, status: &str) -> usize {
        self.by_status.get(status).copied().unwrap_or(0)
    }
}

/// Admin dashboard summary.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardSummary {
    pub username: String,
    pub workers: StatusCounts,
    /// Workers live on the storefront right now.
    pub publicly_visible: usize,
    pub inquiries: StatusCounts,
    pub categories: usize,
}

impl DashboardSummary {
    #[must_use]
    pub fn new(
        username: String,
        workers: &[WorkerProfile],
        inquiries: &[Inquiry],
        categories: &[Category],
    ) -> Self {
        Self {
            username,
            workers: StatusCounts::workers(workers),
            publicly_visible: workers.iter().filter(|w| w.is_publicly_visible()).count(),
            inquiries: StatusCounts::inquiries(inquiries),
            categories: categories.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_include_empty_statuses() {
        let counts = StatusCounts::workers(&[]);
        assert_eq!(counts.total, 0);
        assert_eq!(counts.by_status.len(), WorkerStatus::ALL.len());
        assert_eq!(counts.get("pending"), 0);
    }
}
