//! Built-in service categories and label resolution.

use crate::models::Category;
use crate::types::CategoryId;

/// A category the marketplace ships with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DefaultCategory {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
}

/// Default categories. The position of each entry is its icon index.
pub const DEFAULT_CATEGORIES: [DefaultCategory; 9] = [
    DefaultCategory {
        id: "plumber",
        name: "Plumber",
        description: "Pipes, taps, leaks and water fittings",
    },
    DefaultCategory {
        id: "electrician",
        name: "Electrician",
        description: "Wiring, fixtures and electrical repairs",
    },
    DefaultCategory {
        id: "mason",
        name: "Mason",
        description: "Brickwork, plastering and concrete",
    },
    DefaultCategory {
        id: "house-cleaner",
        name: "House Cleaner",
        description: "Home and deep cleaning",
    },
    DefaultCategory {
        id: "garden-cleaner",
        name: "Garden / Backyard Cleaner",
        description: "Garden upkeep and backyard clearing",
    },
    DefaultCategory {
        id: "carpenter",
        name: "Carpenter",
        description: "Furniture, doors and woodwork",
    },
    DefaultCategory {
        id: "painter",
        name: "Painter",
        description: "Interior and exterior painting",
    },
    DefaultCategory {
        id: "mechanic",
        name: "Mechanic",
        description: "Vehicle and appliance repairs",
    },
    DefaultCategory {
        id: "other",
        name: "Other Services",
        description: "Everything else",
    },
];

/// Icon used for ids that are not default categories.
pub const FALLBACK_ICON: usize = 8;

/// Icon index for a category id.
#[must_use]
pub fn icon_index(category_id: &str) -> usize {
    DEFAULT_CATEGORIES
        .iter()
        .position(|c| c.id == category_id)
        .unwrap_or(FALLBACK_ICON)
}

/// Display name of a default category.
#[must_use]
pub fn default_name(category_id: &str) -> Option<&'static str> {
    DEFAULT_CATEGORIES
        .iter()
        .find(|c| c.id == category_id)
        .map(|c| c.name)
}

/// Default categories as active [`Category`] records, ready for seeding.
#[must_use]
pub fn default_categories() -> Vec<Category> {
    DEFAULT_CATEGORIES
        .iter()
        .map(|c| Category::active(c.id, c.name).with_description(c.description))
        .collect()
}

/// Label shown for a worker's category.
///
/// Prefers the live category name, then the built-in name, then the raw id,
/// so workers whose category was deleted still show something.
#[must_use]
pub fn category_label(category_id: &CategoryId, live: &[Category]) -> String {
    live.iter()
        .find(|c| c.id == *category_id)
        .map(|c| c.name.clone())
        .or_else(|| default_name(category_id.as_str()).map(str::to_string))
        .unwrap_or_else(|| category_id.as_str().to_string())
}
