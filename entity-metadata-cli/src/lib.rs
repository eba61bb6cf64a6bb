//! Entity Metadata CLI Library
//!
//! Loads annotated entity definitions from Rust source, TOML or JSON and
//! extracts their table metadata. The binary (main.rs) uses this library.

pub mod definition;
pub mod document;
pub mod error;
pub mod loader;
pub mod source;

pub use definition::{DefinitionSet, EntityDefinition, FieldDefinition};
pub use error::{LoadError, Result};
pub use loader::{load_entities, load_path};

use entity_metadata::entity::EntityType;
use entity_metadata::resolve::type_mapping;
use entity_metadata::{MetadataCache, TableMetadata, TypeResolver};
use std::fmt::Write;
use std::sync::Arc;

/// Extract table metadata for `entities`, optionally restricted to one.
///
/// Entities without a table annotation are left out.
pub fn extract_tables(
    cache: &MetadataCache,
    entities: &[Arc<EntityType>],
    only: Option<&str>,
) -> Result<Vec<Arc<TableMetadata>>> {
    if let Some(name) = only {
        if !entities.iter().any(|e| e.name() == name) {
            return Err(LoadError::UnknownEntity(name.to_string()));
        }
    }

    let tables = entities
        .iter()
        .filter(|entity| only.map_or(true, |name| entity.name() == name))
        .filter_map(|entity| {
            let table = cache.get_or_extract(entity);
            if table.is_none() {
                log::debug!("{} has no table annotation", entity.name());
            }
            table
        })
        .collect();
    Ok(tables)
}

/// The static type mapping, then the resolution rules in the order they
/// are tried, then the fallback.
pub fn type_report() -> String {
    let mut report = String::from("Type mapping:\n");
    for (value_type, storage_type) in type_mapping::entries() {
        let _ = writeln!(report, "  {:<12} -> {}", value_type.to_string(), storage_type);
    }
    report.push_str("\nResolution rules (in order):\n");
    for (i, rule) in TypeResolver::global().rule_names().iter().enumerate() {
        let _ = writeln!(report, "  {}. {}", i + 1, rule);
    }
    report.push_str("  fallback -> OTHER\n");
    report
}
