//! Worker profile model and the forms that produce it.

use serde::{Deserialize, Serialize};

use crate::search::AvailabilityBucket;
use crate::types::phone::{self, PhoneError, PhoneNumber};
use crate::types::{CategoryId, Principal, WorkerId, WorkerStatus};

/// Days used for a full-time schedule.
pub const FULL_WEEK: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

/// Days used for a part-time schedule.
pub const WORK_WEEK: [&str; 5] = ["Mon", "Tue", "Wed", "Thu", "Fri"];

/// Currency attached to hourly rates entered through the forms.
pub const DEFAULT_CURRENCY: &str = "INR";

/// Where a worker operates.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Location {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub district: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
}

impl Location {
    /// "City, District" with missing parts omitted.
    #[must_use]
    pub fn label(&self) -> String {
        [self.city.as_deref(), self.district.as_deref()]
            .into_iter()
            .flatten()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// What a worker charges.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pricing {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rate_per_hour: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rate_per_day: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(default)]
    pub special_offers: Vec<String>,
}

/// When a worker is available.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule {
    #[serde(default)]
    pub available_days: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub open_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub close_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
}

impl Schedule {
    /// A schedule covering the given availability bucket.
    #[must_use]
    pub fn for_bucket(bucket: AvailabilityBucket) -> Self {
        let days: &[&str] = match bucket {
            AvailabilityBucket::FullTime => &FULL_WEEK,
            AvailabilityBucket::PartTime => &WORK_WEEK,
        };
        Self {
            available_days: days.iter().map(|d| (*d).to_string()).collect(),
            ..Self::default()
        }
    }

    /// The availability bucket derived from the number of available days.
    #[must_use]
    pub fn bucket(&self) -> AvailabilityBucket {
        AvailabilityBucket::from_day_count(self.available_days.len())
    }

    /// Replace the days with those of `bucket`, keeping times and timezone.
    #[must_use]
    pub fn with_bucket(self, bucket: AvailabilityBucket) -> Self {
        Self {
            available_days: Self::for_bucket(bucket).available_days,
            ..self
        }
    }
}

/// Third-party contact handles.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Integrations {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub whatsapp_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub facebook_username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instagram_handle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website_url: Option<String>,
}

/// A service provider listed in the marketplace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkerProfile {
    pub id: WorkerId,
    /// Identity of the worker who owns this profile.
    pub principal: Principal,
    pub full_name: String,
    pub phone_number: String,
    pub category_id: CategoryId,
    #[serde(default)]
    pub location: Location,
    #[serde(default)]
    pub pricing: Pricing,
    #[serde(default)]
    pub availability: Schedule,
    #[serde(default)]
    pub integrations: Integrations,
    #[serde(default)]
    pub years_experience: u32,
    /// Direct URL of the profile photo blob.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
    pub status: WorkerStatus,
    pub published: bool,
}

impl WorkerProfile {
    /// Whether customers may see this profile.
    #[must_use]
    pub const fn is_publicly_visible(&self) -> bool {
        crate::lifecycle::is_publicly_visible(self.status, self.published)
    }

    /// Availability bucket derived from the schedule.
    #[must_use]
    pub fn availability_bucket(&self) -> AvailabilityBucket {
        self.availability.bucket()
    }

    /// Call and chat links for this worker.
    ///
    /// WhatsApp uses the dedicated number when the worker set one.
    #[must_use]
    pub fn contact_links(&self) -> ContactLinks {
        let whatsapp_number = self
            .integrations
            .whatsapp_number
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or(&self.phone_number);

        ContactLinks {
            tel: phone::tel_link(&self.phone_number),
            whatsapp: phone::whatsapp_link(
                whatsapp_number,
                Some(&phone::whatsapp_greeting(&self.full_name)),
            ),
        }
    }
}

/// Links a customer uses to reach a worker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactLinks {
    pub tel: String,
    pub whatsapp: String,
}

/// Validation failures for worker forms.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProfileFormError {
    /// A required field was blank.
    #[error("{0} is required")]
    MissingField(&'static str),
    /// The phone number is malformed.
    #[error("invalid phone number: {0}")]
    InvalidPhone(#[from] PhoneError),
    /// The optional WhatsApp number is malformed.
    #[error("invalid WhatsApp number: {0}")]
    InvalidWhatsApp(PhoneError),
}

/// Data a worker submits to join the marketplace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerRegistration {
    pub full_name: String,
    pub phone_number: String,
    pub category_id: CategoryId,
    #[serde(default)]
    pub years_experience: u32,
    pub city: String,
    pub district: String,
    #[serde(default)]
    pub rate_per_hour: Option<u64>,
    pub availability: AvailabilityBucket,
    #[serde(default)]
    pub whatsapp_number: Option<String>,
    #[serde(default)]
    pub photo: Option<String>,
}

impl WorkerRegistration {
    /// Validate the form and build a new pending, unpublished profile.
    ///
    /// # Errors
    ///
    /// Returns an error if a required field is blank or a phone number is
    /// malformed.
    pub fn into_profile(
        self,
        id: WorkerId,
        principal: Principal,
    ) -> Result<WorkerProfile, ProfileFormError> {
        let full_name = required(&self.full_name, "full name")?;
        let phone = PhoneNumber::parse(&self.phone_number)?;
        required(self.category_id.as_str(), "service category")?;
        let city = required(&self.city, "city")?;
        let district = required(&self.district, "district")?;
        let whatsapp_number = optional_phone(self.whatsapp_number.as_deref())?;

        Ok(WorkerProfile {
            id,
            principal,
            full_name,
            phone_number: phone.as_str().to_string(),
            category_id: self.category_id,
            location: Location {
                city: Some(city),
                district: Some(district),
                ..Location::default()
            },
            pricing: pricing_for_rate(Pricing::default(), self.rate_per_hour),
            availability: Schedule::for_bucket(self.availability),
            integrations: Integrations {
                whatsapp_number,
                ..Integrations::default()
            },
            years_experience: self.years_experience,
            photo: self.photo.filter(|p| !p.trim().is_empty()),
            status: WorkerStatus::Pending,
            published: false,
        })
    }
}

/// Changes a worker submits from their dashboard.
///
/// The category cannot be changed here; workers must ask an admin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerProfileEdit {
    pub full_name: String,
    pub phone_number: String,
    #[serde(default)]
    pub years_experience: u32,
    pub city: String,
    pub district: String,
    #[serde(default)]
    pub rate_per_hour: Option<u64>,
    pub availability: AvailabilityBucket,
    #[serde(default)]
    pub whatsapp_number: Option<String>,
    #[serde(default)]
    pub photo: Option<String>,
}

impl WorkerProfileEdit {
    /// Prefill an edit form from an existing profile.
    #[must_use]
    pub fn from_profile(profile: &WorkerProfile) -> Self {
        Self {
            full_name: profile.full_name.clone(),
            phone_number: profile.phone_number.clone(),
            years_experience: profile.years_experience,
            city: profile.location.city.clone().unwrap_or_default(),
            district: profile.location.district.clone().unwrap_or_default(),
            rate_per_hour: profile.pricing.rate_per_hour,
            availability: profile.availability_bucket(),
            whatsapp_number: profile.integrations.whatsapp_number.clone(),
            photo: profile.photo.clone(),
        }
    }

    /// Validate the form and overlay it on `current`.
    ///
    /// The result is the profile as the worker wants it; run it through
    /// [`crate::lifecycle::apply_worker_edit`] to get the stored state.
    ///
    /// # Errors
    ///
    /// Returns an error if a required field is blank or a phone number is
    /// malformed.
    pub fn apply_to(self, current: &WorkerProfile) -> Result<WorkerProfile, ProfileFormError> {
        let full_name = required(&self.full_name, "full name")?;
        let phone = PhoneNumber::parse(&self.phone_number)?;
        let city = required(&self.city, "city")?;
        let district = required(&self.district, "district")?;
        let whatsapp_number = optional_phone(self.whatsapp_number.as_deref())?;

        Ok(WorkerProfile {
            full_name,
            phone_number: phone.as_str().to_string(),
            location: Location {
                city: Some(city),
                district: Some(district),
                ..current.location.clone()
            },
            pricing: pricing_for_rate(current.pricing.clone(), self.rate_per_hour),
            availability: current.availability.clone().with_bucket(self.availability),
            integrations: Integrations {
                whatsapp_number,
                ..current.integrations.clone()
            },
            years_experience: self.years_experience,
            photo: self.photo.filter(|p| !p.trim().is_empty()),
            ..current.clone()
        })
    }
}

fn required(value: &str, field: &'static str) -> Result<String, ProfileFormError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ProfileFormError::MissingField(field));
    }
    Ok(trimmed.to_string())
}

fn optional_phone(value: Option<&str>) -> Result<Option<String>, ProfileFormError> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        Some(number) => PhoneNumber::parse(number)
            .map(|p| Some(p.as_str().to_string()))
            .map_err(ProfileFormError::InvalidWhatsApp),
        None => Ok(None),
    }
}

/// An hourly rate implies the default currency; no rate clears it.
fn pricing_for_rate(base: Pricing, rate_per_hour: Option<u64>) -> Pricing {
    Pricing {
        rate_per_hour,
        currency: rate_per_hour.map(|_| DEFAULT_CURRENCY.to_string()),
        ..base
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn registration() -> WorkerRegistration {
        WorkerRegistration {
            full_name: "  Ravi Kumar ".to_string(),
            phone_number: "+91 98765 43210".to_string(),
            category_id: CategoryId::new("plumber"),
            years_experience: 6,
            city: "Guwahati".to_string(),
            district: "Kamrup".to_string(),
            rate_per_hour: Some(250),
            availability: AvailabilityBucket::FullTime,
            whatsapp_number: Some(String::new()),
            photo: None,
        }
    }

    #[test]
    fn test_registration_builds_pending_unpublished_profile() {
        let profile = registration()
            .into_profile(WorkerId::new("worker-1"), Principal::new("p-1"))
            .unwrap();

        assert_eq!(profile.full_name, "Ravi Kumar");
        assert_eq!(profile.status, WorkerStatus::Pending);
        assert!(!profile.published);
        assert_eq!(profile.availability.available_days.len(), 7);
        assert_eq!(profile.pricing.currency.as_deref(), Some("INR"));
        assert_eq!(profile.integrations.whatsapp_number, None);
        assert_eq!(profile.location.label(), "Guwahati, Kamrup");
    }

    #[test]
    fn test_registration_requires_fields() {
        let mut form = registration();
        form.district = "  ".to_string();
        let err = form
            .into_profile(WorkerId::new("w"), Principal::new("p"))
            .unwrap_err();
        assert_eq!(err, ProfileFormError::MissingField("district"));

        let mut form = registration();
        form.category_id = CategoryId::new("");
        assert_eq!(
            form.into_profile(WorkerId::new("w"), Principal::new("p"))
                .unwrap_err(),
            ProfileFormError::MissingField("service category")
        );
    }

    #[test]
    fn test_registration_rejects_bad_phone() {
        let mut form = registration();
        form.phone_number = "12".to_string();
        assert!(matches!(
            form.into_profile(WorkerId::new("w"), Principal::new("p")),
            Err(ProfileFormError::InvalidPhone(_))
        ));
    }

    #[test]
    fn test_edit_keeps_identity_and_category() {
        let current = registration()
            .into_profile(WorkerId::new("worker-1"), Principal::new("p-1"))
            .unwrap();
        let mut edit = WorkerProfileEdit::from_profile(&current);
        edit.availability = AvailabilityBucket::PartTime;
        edit.rate_per_hour = None;

        let edited = edit.apply_to(&current).unwrap();
        assert_eq!(edited.id, current.id);
        assert_eq!(edited.principal, current.principal);
        assert_eq!(edited.category_id, current.category_id);
        assert_eq!(edited.availability.available_days.len(), 5);
        assert_eq!(edited.pricing.currency, None);
    }

    #[test]
    fn test_contact_links_prefer_whatsapp_number() {
        let mut profile = registration()
            .into_profile(WorkerId::new("w"), Principal::new("p"))
            .unwrap();
        assert!(profile.contact_links().whatsapp.starts_with("https://wa.me/919876543210?text="));

        profile.integrations.whatsapp_number = Some("+91 70000 00001".to_string());
        let links = profile.contact_links();
        assert_eq!(links.tel, "tel:919876543210");
        assert!(links.whatsapp.starts_with("https://wa.me/917000000001?text=Hi%20Ravi%20Kumar"));
    }
}
