//! Service category model.

use serde::{Deserialize, Serialize};

use crate::types::{CategoryId, CategoryStatus};

/// A kind of service workers can offer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub status: CategoryStatus,
}

impl Category {
    /// Build an active category.
    #[must_use]
    pub fn active(id: impl Into<CategoryId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: None,
            status: CategoryStatus::Active,
        }
    }

    /// Attach a description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Validation failures for the category form.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CategoryFormError {
    #[error("category name is required")]
    MissingName,
    #[error("category id must contain a letter or digit")]
    InvalidId,
}

/// What an admin submits to create or edit a category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryForm {
    /// Defaults to a slug of the name when creating.
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: CategoryStatus,
}

impl CategoryForm {
    /// Validate the form into a category. `id` overrides the form's own id.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is blank or no usable id can be formed.
    pub fn into_category(self, id: Option<CategoryId>) -> Result<Category, CategoryFormError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(CategoryFormError::MissingName);
        }

        let id = match id {
            Some(id) => id,
            None => {
                let raw = self.id.as_deref().filter(|i| !i.trim().is_empty()).unwrap_or(name);
                let slug = slugify(raw);
                if slug.is_empty() {
                    return Err(CategoryFormError::InvalidId);
                }
                CategoryId::new(slug)
            }
        };

        Ok(Category {
            id,
            name: name.to_string(),
            description: self
                .description
                .map(|d| d.trim().to_string())
                .filter(|d| !d.is_empty()),
            status: self.status,
        })
    }
}

/// Lowercase `value` and join its alphanumeric runs with `-`.
#[must_use]
pub fn slugify(value: &str) -> String {
    value
        .split(|c: char| !c.is_alphanumeric())
        .filter(|part| !part.is_empty())
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("-")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn form(name: &str) -> CategoryForm {
        CategoryForm {
            id: None,
            name: name.to_string(),
            description: Some("  ".to_string()),
            status: CategoryStatus::Active,
        }
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Garden / Backyard Cleaner"), "garden-backyard-cleaner");
        assert_eq!(slugify("  AC  repair!! "), "ac-repair");
        assert_eq!(slugify("--"), "");
    }

    #[test]
    fn test_form_derives_id_from_name() {
        let category = form("Tile Work").into_category(None).unwrap();
        assert_eq!(category.id.as_str(), "tile-work");
        assert_eq!(category.description, None);
    }

    #[test]
    fn test_path_id_wins() {
        let category = form("Tiles")
            .into_category(Some(CategoryId::new("tiler")))
            .unwrap();
        assert_eq!(category.id.as_str(), "tiler");
    }

    #[test]
    fn test_form_rejects_blank_name_and_unusable_id() {
        assert_eq!(form(" ").into_category(None).unwrap_err(), CategoryFormError::MissingName);
        let bad = CategoryForm {
            id: Some("!!".to_string()),
            ..form("Tiles")
        };
        assert_eq!(bad.into_category(None).unwrap_err(), CategoryFormError::InvalidId);
    }
}
