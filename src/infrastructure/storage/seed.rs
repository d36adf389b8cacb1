//! Catalog seeding from a JSON file

use std::collections::HashSet;
use std::path::Path;

use thiserror::Error;
use tracing::info;
use validator::{Validate, ValidationErrors};

use crate::domain::CatalogItem;

#[derive(Debug, Error)]
pub enum CatalogLoadError {
    #[error("Failed to read catalog {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse catalog: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid catalog item {id}: {errors}")]
    Invalid { id: String, errors: ValidationErrors },

    #[error("Duplicate catalog item id: {0}")]
    Duplicate(String),
}

/// Parse and validate a catalog given as a JSON array of items.
///
/// The first invalid record aborts the load.
pub fn parse_catalog(json: &str) -> Result<Vec<CatalogItem>, CatalogLoadError> {
    let items: Vec<CatalogItem> = serde_json::from_str(json)?;

    let mut seen = HashSet::new();
    for item in &items {
        item.validate().map_err(|errors| CatalogLoadError::Invalid {
            id: item.id.clone(),
            errors,
        })?;
        if !seen.insert(item.id.as_str()) {
            return Err(CatalogLoadError::Duplicate(item.id.clone()));
        }
    }

    Ok(items)
}

pub fn load_catalog(path: impl AsRef<Path>) -> Result<Vec<CatalogItem>, CatalogLoadError> {
    let path = path.as_ref();
    let json = std::fs::read_to_string(path).map_err(|source| CatalogLoadError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let items = parse_catalog(&json)?;
    info!(path = %path.display(), items = items.len(), "Catalog loaded");
    Ok(items)
}
