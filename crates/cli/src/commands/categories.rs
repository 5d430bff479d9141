//! Category commands.
//!
//! # Seed file format
//!
//! ```yaml
//! categories:
//!   - name: Plumber
//!     description: Pipes, taps, leaks and water fittings
//!   - id: ac-repair
//!     name: AC Repair
//! ```

use std::collections::HashSet;

use serde::Deserialize;
use tracing::{info, warn};

use seva_sangam_core::catalog;
use seva_sangam_core::{Category, CategoryForm};

use super::{CliError, Connection};

#[derive(Debug, Deserialize)]
struct SeedFile {
    categories: Vec<CategoryForm>,
}

/// Outcome of a seed run.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct SeedSummary {
    pub created: usize,
    pub skipped: usize,
}

/// The built-in categories.
#[must_use]
pub fn default_seed() -> Vec<Category> {
    catalog::default_categories()
}

/// Parse and validate a YAML seed document.
///
/// # Errors
///
/// Returns an error for malformed YAML or an invalid entry.
pub fn parse_seed(yaml: &str) -> Result<Vec<Category>, CliError> {
    let file: SeedFile = serde_yaml::from_str(yaml)?;
    file.categories
        .into_iter()
        .map(|form| form.into_category(None).map_err(CliError::from))
        .collect()
}

/// Read and validate a YAML seed file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or does not validate.
pub async fn load_seed_file(path: &str) -> Result<Vec<Category>, CliError> {
    info!(path, "Loading categories from file");
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| CliError::Io {
            path: path.to_string(),
            source,
        })?;
    parse_seed(&content)
}

/// Create every category whose id is not already present.
///
/// # Errors
///
/// Returns an error if credentials are missing or a backend call fails.
pub async fn seed(conn: &Connection, categories: Vec<Category>) -> Result<SeedSummary, CliError> {
    let creds = conn.admin()?;
    let mut existing: HashSet<_> = conn
        .backend()
        .get_all_categories()
        .await?
        .into_iter()
        .map(|c| c.id)
        .collect();

    let mut summary = SeedSummary::default();
    for category in categories {
        if !existing.insert(category.id.clone()) {
            warn!(category_id = %category.id, "Category exists, skipping");
            summary.skipped += 1;
            continue;
        }
        info!(category_id = %category.id, name = %category.name, "Creating category");
        conn.backend().create_category(creds, category).await?;
        summary.created += 1;
    }

    info!(
        created = summary.created,
        skipped = summary.skipped,
        "Seeding complete"
    );
    Ok(summary)
}

/// Log every category.
///
/// # Errors
///
/// Returns an error if the backend call fails.
pub async fn list(conn: &Connection) -> Result<(), CliError> {
    let categories = conn.backend().get_all_categories().await?;
    info!("{} categories", categories.len());
    for c in &categories {
        info!("  {:<20} {:<30} {}", c.id, c.name, c.status);
    }
    Ok(())
}
