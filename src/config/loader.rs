//! Load a catalog from a JSON file, or fall back to the built-in one.

use crate::config::{builtin_catalog, Catalog};
use crate::error::ConfigError;
use std::path::Path;

/// Parse catalog JSON: `{ "collections": [ ... ] }`. Validation happens when the catalog is run.
pub fn parse_catalog(json: &str) -> Result<Catalog, ConfigError> {
    serde_json::from_str(json).map_err(|e| ConfigError::Load(e.to_string()))
}

/// Read the catalog at `path`, or the built-in catalog when no path is given.
pub async fn load_catalog(path: Option<&Path>) -> Result<Catalog, ConfigError> {
    let Some(path) = path else {
        return Ok(builtin_catalog());
    };
    tracing::debug!(path = %path.display(), "reading catalog");
    let json = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| ConfigError::Load(format!("{}: {}", path.display(), e)))?;
    parse_catalog(&json)
}
