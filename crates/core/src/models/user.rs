//! Account-level profile of a signed-in principal.
//!
//! Separate from the worker listing: an account saves its name first and
//! registers a worker profile afterwards.

use serde::{Deserialize, Serialize};

/// Role given to accounts that do not name one.
pub const DEFAULT_ROLE: &str = "worker";

/// Longest accepted display name, in characters.
pub const MAX_NAME_LEN: usize = 100;

/// Name and role the backend keeps per principal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub name: String,
    pub role: String,
}

/// Validation failures for the user profile form.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserProfileFormError {
    #[error("name is required")]
    MissingName,
    #[error("name must be at most {MAX_NAME_LEN} characters")]
    NameTooLong,
}

/// What a signed-in account submits to save its profile.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfileForm {
    pub name: String,
    #[serde(default)]
    pub role: Option<String>,
}

impl UserProfileForm {
    /// Validate the form. A blank or missing role becomes [`DEFAULT_ROLE`].
    ///
    /// # Errors
    ///
    /// Returns an error if the name is blank or too long.
    pub fn into_profile(self) -> Result<UserProfile, UserProfileFormError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(UserProfileFormError::MissingName);
        }
        if name.chars().count() > MAX_NAME_LEN {
            return Err(UserProfileFormError::NameTooLong);
        }

        let role = self
            .role
            .map(|r| r.trim().to_lowercase())
            .filter(|r| !r.is_empty())
            .unwrap_or_else(|| DEFAULT_ROLE.to_string());

        Ok(UserProfile {
            name: name.to_string(),
            role,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_role_defaults_to_worker() {
        let profile = UserProfileForm {
            name: "  Meena Devi ".to_string(),
            role: Some(" ".to_string()),
        }
        .into_profile()
        .unwrap();
        assert_eq!(profile.name, "Meena Devi");
        assert_eq!(profile.role, DEFAULT_ROLE);
    }

    #[test]
    fn test_explicit_role_is_kept() {
        let profile = UserProfileForm {
            name: "Meena".to_string(),
            role: Some("Customer".to_string()),
        }
        .into_profile()
        .unwrap();
        assert_eq!(profile.role, "customer");
    }

    #[test]
    fn test_name_is_validated() {
        let blank = UserProfileForm::default().into_profile().unwrap_err();
        assert_eq!(blank, UserProfileFormError::MissingName);

        let long = UserProfileForm {
            name: "x".repeat(MAX_NAME_LEN + 1),
            role: None,
        };
        assert_eq!(long.into_profile().unwrap_err(), UserProfileFormError::NameTooLong);
    }
}
