//! The marketplace backend contract.
//!
//! The backend is an external service with a fixed RPC surface. Calls fall
//! into three groups: public reads, calls identified by the worker's
//! [`Principal`], and privileged calls that carry [`AdminCredentials`] on
//! every request. Implementations live in `seva-sangam-client`.

use std::sync::Arc;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};

use crate::models::{Category, Inquiry, UserProfile, WorkerProfile};
use crate::types::{CategoryId, InquiryId, Principal, WorkerId};

/// Message shown when a network failure interrupts login.
pub const LOGIN_NETWORK_MESSAGE: &str = "Connection problem. Please check your internet and try again.";
/// Message shown when the backend rejects admin credentials at login.
pub const LOGIN_UNAUTHORIZED_MESSAGE: &str =
    "Invalid username or password. Please check your credentials.";
/// Message shown for any other login failure.
pub const LOGIN_GENERIC_MESSAGE: &str = "Login failed. Please try again.";
/// Message shown when a privileged call is rejected after login.
pub const SESSION_EXPIRED_MESSAGE: &str = "Your admin session has expired. Please log in again.";
/// Message shown for unclassified failures.
pub const GENERIC_ERROR_MESSAGE: &str = "An error occurred. Please try again.";

const NETWORK_MARKERS: &[&str] = &["fetch", "network", "NetworkError", "timeout"];
/// Login failures that mean the credentials were refused.
const LOGIN_REJECTED_MARKERS: &[&str] = &["Unauthorized", "trap"];
/// Failures of a privileged call that mean the cached credentials no longer work.
const SESSION_REVOKED_MARKERS: &[&str] = &["Unauthorized", "Only admins", "Admin privileges"];

/// Errors returned by a [`MarketplaceBackend`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BackendError {
    /// The request never got a reply.
    #[error("network error: {0}")]
    Network(String),

    /// The backend replied with an error message.
    #[error("{0}")]
    Rejected(String),

    /// The reply could not be understood.
    #[error("invalid backend response: {0}")]
    InvalidResponse(String),
}

impl BackendError {
    /// Classification of a failed call made outside login.
    ///
    /// An actor trap is an ordinary failure here; only explicit
    /// authorization messages count as unauthorized.
    #[must_use]
    pub fn class(&self) -> ErrorClass {
        match self {
            Self::Network(_) => ErrorClass::Network,
            Self::Rejected(message) => ErrorClass::for_session(message),
            Self::InvalidResponse(_) => ErrorClass::Generic,
        }
    }

    /// Classification of a failed login attempt.
    #[must_use]
    pub fn login_class(&self) -> ErrorClass {
        match self {
            Self::Network(_) => ErrorClass::Network,
            Self::Rejected(message) => ErrorClass::for_login(message),
            Self::InvalidResponse(_) => ErrorClass::Generic,
        }
    }

    /// Whether the backend refused the caller's authority.
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        self.class() == ErrorClass::Unauthorized
    }
}

/// How an error is presented at the HTTP boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// Connectivity problem; the caller may retry.
    Network,
    /// Credentials missing, wrong or revoked.
    Unauthorized,
    Generic,
}

impl ErrorClass {
    /// Classify a login failure message. Network markers are checked first.
    #[must_use]
    pub fn for_login(message: &str) -> Self {
        if contains_any(message, NETWORK_MARKERS) {
            Self::Network
        } else if contains_any(message, LOGIN_REJECTED_MARKERS) {
            Self::Unauthorized
        } else {
            Self::Generic
        }
    }

    /// Classify the failure of a call made with cached credentials.
    /// Authorization markers are checked first.
    #[must_use]
    pub fn for_session(message: &str) -> Self {
        if contains_any(message, SESSION_REVOKED_MARKERS) {
            Self::Unauthorized
        } else if contains_any(message, NETWORK_MARKERS) {
            Self::Network
        } else {
            Self::Generic
        }
    }

    /// User-facing message for a failed login attempt.
    #[must_use]
    pub const fn login_message(self) -> &'static str {
        match self {
            Self::Network => LOGIN_NETWORK_MESSAGE,
            Self::Unauthorized => LOGIN_UNAUTHORIZED_MESSAGE,
            Self::Generic => LOGIN_GENERIC_MESSAGE,
        }
    }

    /// User-facing message for a failed call made with a cached session.
    #[must_use]
    pub const fn session_message(self) -> &'static str {
        match self {
            Self::Network => LOGIN_NETWORK_MESSAGE,
            Self::Unauthorized => SESSION_EXPIRED_MESSAGE,
            Self::Generic => GENERIC_ERROR_MESSAGE,
        }
    }

    #[must_use]
    pub const fn is_retryable(self) -> bool {
        matches!(self, Self::Network)
    }
}

fn contains_any(message: &str, markers: &[&str]) -> bool {
    markers.iter().any(|m| message.contains(m))
}

/// Admin username and password sent with every privileged call.
#[derive(Clone)]
pub struct AdminCredentials {
    username: String,
    password: SecretString,
}

impl AdminCredentials {
    #[must_use]
    pub fn new(username: impl Into<String>, password: SecretString) -> Self {
        Self {
            username: username.into(),
            password,
        }
    }

    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    #[must_use]
    pub const fn password(&self) -> &SecretString {
        &self.password
    }

    /// Whether both fields are non-blank.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        !self.username.trim().is_empty() && !self.password.expose_secret().is_empty()
    }
}

impl std::fmt::Debug for AdminCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminCredentials")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Shared handle to a backend implementation.
pub type SharedBackend = Arc<dyn MarketplaceBackend>;

/// The RPC surface of the marketplace backend.
#[async_trait]
pub trait MarketplaceBackend: Send + Sync {
    // Public reads

    async fn get_all_categories(&self) -> Result<Vec<Category>, BackendError>;

    async fn get_category(&self, id: &CategoryId) -> Result<Option<Category>, BackendError>;

    /// Workers the backend considers listable.
    async fn get_all_workers(&self) -> Result<Vec<WorkerProfile>, BackendError>;

    async fn get_workers_by_category(
        &self,
        category_id: &CategoryId,
    ) -> Result<Vec<WorkerProfile>, BackendError>;

    async fn get_worker_profile(&self, id: &WorkerId)
    -> Result<Option<WorkerProfile>, BackendError>;

    /// Fails if `inquiry.worker_id` does not exist.
    async fn create_inquiry(&self, inquiry: Inquiry) -> Result<(), BackendError>;

    // Caller calls

    async fn get_caller_user_profile(
        &self,
        caller: &Principal,
    ) -> Result<Option<UserProfile>, BackendError>;

    /// Creates or replaces the caller's account profile.
    async fn save_caller_user_profile(
        &self,
        caller: &Principal,
        profile: UserProfile,
    ) -> Result<(), BackendError>;

    async fn get_my_worker_profile(
        &self,
        caller: &Principal,
    ) -> Result<Option<WorkerProfile>, BackendError>;

    /// The caller's profile as the backend holds it right now.
    ///
    /// Moderation runs in another process, so a cached copy can carry a
    /// stale status. Caching implementations must skip their cache here and
    /// store the fresh answer.
    async fn refresh_my_worker_profile(
        &self,
        caller: &Principal,
    ) -> Result<Option<WorkerProfile>, BackendError> {
        self.get_my_worker_profile(caller).await
    }

    /// Fails if `caller` already has a profile.
    async fn register_worker(
        &self,
        caller: &Principal,
        profile: WorkerProfile,
    ) -> Result<(), BackendError>;

    /// Fails unless `caller` owns the profile.
    async fn update_worker_profile(
        &self,
        caller: &Principal,
        id: &WorkerId,
        profile: WorkerProfile,
    ) -> Result<(), BackendError>;

    async fn get_worker_inquiries(
        &self,
        caller: &Principal,
        worker_id: &WorkerId,
    ) -> Result<Vec<Inquiry>, BackendError>;

    // Privileged calls

    async fn get_all_workers_admin(
        &self,
        creds: &AdminCredentials,
    ) -> Result<Vec<WorkerProfile>, BackendError>;

    async fn get_worker_profile_admin(
        &self,
        creds: &AdminCredentials,
        id: &WorkerId,
    ) -> Result<Option<WorkerProfile>, BackendError>;

    async fn get_worker_inquiries_admin(
        &self,
        creds: &AdminCredentials,
        worker_id: &WorkerId,
    ) -> Result<Vec<Inquiry>, BackendError>;

    async fn approve_worker(&self, creds: &AdminCredentials, id: &WorkerId)
    -> Result<(), BackendError>;

    async fn reject_worker(&self, creds: &AdminCredentials, id: &WorkerId)
    -> Result<(), BackendError>;

    async fn publish_worker(&self, creds: &AdminCredentials, id: &WorkerId)
    -> Result<(), BackendError>;

    async fn unpublish_worker(
        &self,
        creds: &AdminCredentials,
        id: &WorkerId,
    ) -> Result<(), BackendError>;

    async fn remove_worker(&self, creds: &AdminCredentials, id: &WorkerId)
    -> Result<(), BackendError>;

    async fn create_category(
        &self,
        creds: &AdminCredentials,
        category: Category,
    ) -> Result<(), BackendError>;

    async fn update_category(
        &self,
        creds: &AdminCredentials,
        id: &CategoryId,
        category: Category,
    ) -> Result<(), BackendError>;

    async fn delete_category(
        &self,
        creds: &AdminCredentials,
        id: &CategoryId,
    ) -> Result<(), BackendError>;

    async fn get_all_inquiries(&self, creds: &AdminCredentials)
    -> Result<Vec<Inquiry>, BackendError>;

    async fn update_inquiry(
        &self,
        creds: &AdminCredentials,
        id: &InquiryId,
        inquiry: Inquiry,
    ) -> Result<(), BackendError>;

    async fn delete_inquiry(&self, creds: &AdminCredentials, id: &InquiryId)
    -> Result<(), BackendError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_network_markers_win() {
        assert_eq!(ErrorClass::for_login("Failed to fetch"), ErrorClass::Network);
        assert_eq!(ErrorClass::for_login("request timeout (Unauthorized?)"), ErrorClass::Network);
        assert_eq!(
            BackendError::Network("connection refused".into()).login_class(),
            ErrorClass::Network
        );
    }

    #[test]
    fn test_login_rejection_markers() {
        for message in [
            "Unauthorized: Only admins can perform this action",
            "Canister trapped explicitly: invalid admin password",
        ] {
            assert_eq!(ErrorClass::for_login(message), ErrorClass::Unauthorized, "{message}");
        }
        assert_eq!(ErrorClass::for_login("Admin privileges required"), ErrorClass::Generic);
    }

    #[test]
    fn test_session_trap_is_not_unauthorized() {
        let err = BackendError::Rejected("Canister trapped explicitly: Worker not found".into());
        assert_eq!(err.class(), ErrorClass::Generic);
        assert!(!err.is_unauthorized());
        assert_eq!(err.login_class(), ErrorClass::Unauthorized);
    }

    #[test]
    fn test_session_authorization_markers_win() {
        for message in [
            "Unauthorized: request timeout",
            "Only admins can perform this action",
            "Admin privileges required",
        ] {
            assert_eq!(ErrorClass::for_session(message), ErrorClass::Unauthorized, "{message}");
        }
        assert!(BackendError::Rejected("Unauthorized".into()).is_unauthorized());
        assert_eq!(ErrorClass::for_session("network unreachable"), ErrorClass::Network);
    }

    #[test]
    fn test_generic_fallback() {
        assert_eq!(ErrorClass::for_session("Worker not found"), ErrorClass::Generic);
        assert_eq!(ErrorClass::for_login("Worker not found"), ErrorClass::Generic);
        assert_eq!(
            BackendError::InvalidResponse("Unauthorized".into()).class(),
            ErrorClass::Generic
        );
    }

    #[test]
    fn test_messages() {
        assert_eq!(ErrorClass::Unauthorized.login_message(), LOGIN_UNAUTHORIZED_MESSAGE);
        assert_eq!(ErrorClass::Unauthorized.session_message(), SESSION_EXPIRED_MESSAGE);
        assert_eq!(ErrorClass::Generic.session_message(), GENERIC_ERROR_MESSAGE);
        assert!(ErrorClass::Network.is_retryable());
        assert!(!ErrorClass::Generic.is_retryable());
    }

    #[test]
    fn test_credentials_debug_redacts_password() {
        let creds = AdminCredentials::new("admin", SecretString::from("hunter2-very-secret"));
        let debug = format!("{creds:?}");
        assert!(debug.contains("admin"));
        assert!(!debug.contains("hunter2"));
        assert!(creds.is_complete());
        assert!(!AdminCredentials::new(" ", SecretString::from("x")).is_complete());
    }
}
