//! JSON views returned by the storefront API.

use serde::Serialize;

use seva_sangam_core::catalog;
use seva_sangam_core::{
    AvailabilityBucket, Category, CategoryId, CategoryStatus, ContactLinks, Inquiry, Integrations,
    Location, Pricing, Schedule, WorkerId, WorkerProfile, WorkerStatus,
};

/// A category card.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryView {
    pub id: CategoryId,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub icon: usize,
}

impl From<Category> for CategoryView {
    fn from(category: Category) -> Self {
        Self {
            icon: catalog::icon_index(category.id.as_str()),
            id: category.id,
            name: category.name,
            description: category.description,
        }
    }
}

/// Categories shown to visitors: the live active categories, or the
/// built-in catalog when the backend has none.
#[must_use]
pub fn visible_categories(live: Vec<Category>) -> Vec<CategoryView> {
    let active: Vec<Category> = live
        .into_iter()
        .filter(|c| c.status == CategoryStatus::Active)
        .collect();

    if active.is_empty() {
        catalog::default_categories()
            .into_iter()
            .map(CategoryView::from)
            .collect()
    } else {
        active.into_iter().map(CategoryView::from).collect()
    }
}

/// A worker as customers see it. The owner's principal is not exposed.
#[derive(Debug, Clone, Serialize)]
pub struct PublicWorker {
    pub id: WorkerId,
    pub full_name: String,
    pub phone_number: String,
    pub category_id: CategoryId,
    pub category_label: String,
    pub location: Location,
    pub location_label: String,
    pub pricing: Pricing,
    pub availability: Schedule,
    pub availability_bucket: AvailabilityBucket,
    pub integrations: Integrations,
    pub years_experience: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
    pub featured: bool,
    pub contact: ContactLinks,
}

impl PublicWorker {
    /// Build the view, resolving the category label against `categories`.
    #[must_use]
    pub fn new(worker: WorkerProfile, categories: &[Category]) -> Self {
        Self {
            category_label: catalog::category_label(&worker.category_id, categories),
            location_label: worker.location.label(),
            availability_bucket: worker.availability_bucket(),
            featured: worker.status == WorkerStatus::Featured,
            contact: worker.contact_links(),
            id: worker.id,
            full_name: worker.full_name,
            phone_number: worker.phone_number,
            category_id: worker.category_id,
            location: worker.location,
            pricing: worker.pricing,
            availability: worker.availability,
            integrations: worker.integrations,
            years_experience: worker.years_experience,
            photo: worker.photo,
        }
    }

    /// Views for every publicly visible worker, in input order.
    #[must_use]
    pub fn list(workers: Vec<WorkerProfile>, categories: &[Category]) -> Vec<Self> {
        workers
            .into_iter()
            .filter(WorkerProfile::is_publicly_visible)
            .map(|w| Self::new(w, categories))
            .collect()
    }
}

/// The signed-in worker's own dashboard.
#[derive(Debug, Clone, Serialize)]
pub struct WorkerDashboard {
    pub profile: WorkerProfile,
    pub category_label: String,
    pub status_label: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_message: Option<&'static str>,
    pub publicly_visible: bool,
}

impl WorkerDashboard {
    #[must_use]
    pub fn new(profile: WorkerProfile, categories: &[Category]) -> Self {
        Self {
            category_label: catalog::category_label(&profile.category_id, categories),
            status_label: profile.status.label(),
            status_message: profile.status.dashboard_message(),
            publicly_visible: profile.is_publicly_visible(),
            profile,
        }
    }
}

/// Result of a worker editing their profile.
#[derive(Debug, Clone, Serialize)]
pub struct EditOutcome {
    #[serde(flatten)]
    pub dashboard: WorkerDashboard,
    /// Set when the edit sent the profile back for review.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<&'static str>,
}

/// Notice shown when a major edit requires re-approval.
pub const REAPPROVAL_NOTICE: &str =
    "Your changes include important details, so your profile will be reviewed again before it is visible to customers.";

/// The worker's jobs list.
#[derive(Debug, Clone, Serialize)]
pub struct JobsView {
    pub worker_id: WorkerId,
    pub inquiries: Vec<Inquiry>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visible_categories_fall_back_to_catalog() {
        let views = visible_categories(vec![]);
        assert_eq!(views.len(), 9);

        let live = vec![
            Category::active("plumber", "Plumbing"),
            Category {
                status: CategoryStatus::Suspended,
                ..Category::active("mason", "Mason")
            },
        ];
        let views = visible_categories(live);
        assert_eq!(views.len(), 1);
        assert_eq!(views.first().map(|v| v.icon), Some(0));
    }
}
