//! Catalog validation: naming, uniqueness, per-type option sanity and relation ordering.

use crate::config::{Catalog, FieldKind};
use crate::error::ConfigError;
use regex::Regex;
use std::collections::HashSet;
use std::sync::OnceLock;

fn identifier() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("identifier pattern"))
}

/// Field names the server reserves on every collection.
const RESERVED_FIELDS: &[&str] = &["id", "created", "updated", "collectionId", "collectionName", "expand"];

pub fn validate(catalog: &Catalog) -> Result<(), ConfigError> {
    let mut declared: HashSet<&str> = HashSet::new();

    for c in &catalog.collections {
        if !identifier().is_match(&c.name) {
            return Err(ConfigError::Validation(format!("invalid collection name '{}'", c.name)));
        }

        let mut field_names = HashSet::new();
        for f in &c.fields {
            if !identifier().is_match(&f.name) || RESERVED_FIELDS.contains(&f.name.as_str()) {
                return Err(ConfigError::Validation(format!(
                    "invalid field name '{}' in collection '{}'",
                    f.name, c.name
                )));
            }
            if !field_names.insert(f.name.as_str()) {
                return Err(ConfigError::DuplicateField {
                    collection: c.name.clone(),
                    field: f.name.clone(),
                });
            }
            match &f.kind {
                FieldKind::Select { max_select, values } => {
                    if values.is_empty() {
                        return Err(ConfigError::Validation(format!(
                            "{}.{}: select needs at least one value",
                            c.name, f.name
                        )));
                    }
                    if *max_select == 0 || *max_select as usize > values.len() {
                        return Err(ConfigError::Validation(format!(
                            "{}.{}: max_select must be between 1 and {}",
                            c.name,
                            f.name,
                            values.len()
                        )));
                    }
                }
                FieldKind::File { max_select, max_size, .. } => {
                    if *max_select == 0 || *max_size == 0 {
                        return Err(ConfigError::Validation(format!(
                            "{}.{}: file needs max_select and max_size greater than zero",
                            c.name, f.name
                        )));
                    }
                }
                FieldKind::Text { min: Some(min), max: Some(max), .. } if min > max => {
                    return Err(ConfigError::Validation(format!(
                        "{}.{}: text min {} exceeds max {}",
                        c.name, f.name, min, max
                    )));
                }
                FieldKind::Text { pattern: Some(p), .. } => {
                    Regex::new(p).map_err(|_| {
                        ConfigError::Validation(format!("{}.{}: invalid pattern", c.name, f.name))
                    })?;
                }
                FieldKind::Number { min: Some(min), max: Some(max), .. } if min > max => {
                    return Err(ConfigError::Validation(format!(
                        "{}.{}: number min {} exceeds max {}",
                        c.name, f.name, min, max
                    )));
                }
                FieldKind::Relation { collection, max_select, .. } => {
                    if *max_select == 0 {
                        return Err(ConfigError::Validation(format!(
                            "{}.{}: max_select must be at least 1",
                            c.name, f.name
                        )));
                    }
                    // Targets must already exist when this collection is created.
                    if !declared.contains(collection.as_str()) {
                        return Err(ConfigError::MissingReference {
                            kind: "relation target",
                            id: format!("{}.{} -> {}", c.name, f.name, collection),
                        });
                    }
                }
                _ => {}
            }
        }

        if !declared.insert(c.name.as_str()) {
            return Err(ConfigError::DuplicateCollection(c.name.clone()));
        }
    }

    Ok(())
}
