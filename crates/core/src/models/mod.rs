//! Marketplace records exchanged with the backend.

pub mod category;
pub mod inquiry;
pub mod user;
pub mod worker;

pub use category::{Category, CategoryForm, CategoryFormError};
pub use inquiry::{Inquiry, InquiryFormError, InquiryUpdate, NewInquiry};
pub use user::{UserProfile, UserProfileForm, UserProfileFormError};
pub use worker::{
    ContactLinks, Integrations, Location, Pricing, ProfileFormError, Schedule, WorkerProfile,
    WorkerProfileEdit, WorkerRegistration,
};
