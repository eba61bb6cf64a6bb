//! Entity type to table metadata extraction.

use crate::config::MetadataConfig;
use crate::entity::{CollectionTable, Column, EntityType, PropertyDescriptor, Table};
use crate::meta::{ColumnMetadata, TableMetadata};
use crate::resolve::TypeResolver;
use crate::walker::{find_annotation, find_type_annotation};
use once_cell::sync::Lazy;
use std::sync::Arc;

static DEFAULT_EXTRACTOR: Lazy<MetadataExtractor> = Lazy::new(MetadataExtractor::default);

/// True when `s` contains a non-whitespace character
fn has_text(s: &str) -> bool {
    s.chars().any(|c| !c.is_whitespace())
}

/// Turns annotated entity types into [`TableMetadata`].
///
/// Extraction is pure: the same entity type always yields the same metadata.
/// An extractor is immutable once built and can be shared between threads.
pub struct MetadataExtractor {
    config: MetadataConfig,
    resolver: Arc<TypeResolver>,
}

impl Default for MetadataExtractor {
    fn default() -> Self {
        Self::new(MetadataConfig::default())
    }
}

impl MetadataExtractor {
    /// Extractor using the process-wide [`TypeResolver`]
    pub fn new(config: MetadataConfig) -> Self {
        Self {
            config,
            resolver: Arc::clone(TypeResolver::global()),
        }
    }

    pub fn global() -> &'static MetadataExtractor {
        &DEFAULT_EXTRACTOR
    }

    pub fn with_resolver(mut self, resolver: Arc<TypeResolver>) -> Self {
        self.resolver = resolver;
        self
    }

    pub fn config(&self) -> &MetadataConfig {
        &self.config
    }

    pub fn resolver(&self) -> &TypeResolver {
        &self.resolver
    }

    /// Extract table metadata for `entity`.
    ///
    /// Returns `None` when neither `entity` nor any supertype carries a
    /// [`Table`] annotation, regardless of its column annotations.
    pub fn extract_table(&self, entity: &EntityType) -> Option<TableMetadata> {
        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!("extract_table", entity = entity.name()).entered();

        let Some(table) = find_type_annotation::<Table>(entity) else {
            log::debug!("{} has no table annotation, skipping", entity.name());
            return None;
        };

        let mut metadata = TableMetadata::new(table.name.clone());
        metadata.extend(self.extract_columns(None, None, entity));
        log::debug!(
            "Extracted table '{}' from {} ({} columns)",
            metadata.name,
            entity.name(),
            metadata.len()
        );
        Some(metadata)
    }

    /// Extract column metadata for every annotated property of `entity`.
    ///
    /// `path_prefix` qualifies aliases, `column_prefix` qualifies storage
    /// names; blank prefixes are ignored.
    pub fn extract_columns(
        &self,
        path_prefix: Option<&str>,
        column_prefix: Option<&str>,
        entity: &EntityType,
    ) -> Vec<ColumnMetadata> {
        let mut columns = Vec::new();
        let mut expanding = vec![entity];
        self.collect_columns(path_prefix, column_prefix, entity, &mut expanding, &mut columns);
        columns
    }

    /// `expanding` holds the types currently being expanded, compared by
    /// identity: distinct types that share a name are expanded independently.
    fn collect_columns<'a>(
        &self,
        path_prefix: Option<&str>,
        column_prefix: Option<&str>,
        entity: &'a EntityType,
        expanding: &mut Vec<&'a EntityType>,
        columns: &mut Vec<ColumnMetadata>,
    ) {
        for property in entity.properties() {
            let column = find_annotation::<Column>(entity, property);
            let collection = find_annotation::<CollectionTable>(entity, property);

            match (column, collection) {
                (Some(column), _) => columns.push(self.build_column(
                    entity,
                    property,
                    column,
                    path_prefix,
                    column_prefix,
                )),
                (None, Some(collection)) => {
                    self.expand_collection(property, collection, expanding, columns);
                }
                (None, None) => {
                    log::trace!("{}.{}: not mapped", entity.name(), property.name);
                }
            }
        }
    }

    fn expand_collection<'a>(
        &self,
        property: &'a PropertyDescriptor,
        collection: &CollectionTable,
        expanding: &mut Vec<&'a EntityType>,
        columns: &mut Vec<ColumnMetadata>,
    ) {
        let Some(nested) = property.value_type.entity_type() else {
            log::trace!(
                "{}: collection table '{}' has no entity value type ({})",
                property.name,
                collection.name,
                property.value_type
            );
            return;
        };

        if expanding.iter().any(|seen| std::ptr::eq(*seen, nested.as_ref())) {
            log::warn!(
                "{}: collection table '{}' refers back to {}, not expanded",
                property.name,
                collection.name,
                nested.name()
            );
            return;
        }
        if expanding.len() > self.config.max_nesting_depth {
            log::warn!(
                "{}: collection table '{}' exceeds nesting depth {}, not expanded",
                property.name,
                collection.name,
                self.config.max_nesting_depth
            );
            return;
        }

        expanding.push(nested.as_ref());
        self.collect_columns(
            Some(property.name.as_str()),
            Some(collection.name.as_str()),
            nested,
            expanding,
            columns,
        );
        expanding.pop();
    }

    fn build_column(
        &self,
        entity: &EntityType,
        property: &PropertyDescriptor,
        column: &Column,
        path_prefix: Option<&str>,
        column_prefix: Option<&str>,
    ) -> ColumnMetadata {
        let real_name = if has_text(&column.name) {
            column.name.as_str()
        } else {
            property.name.as_str()
        };

        let mut metadata = ColumnMetadata::new(
            self.qualify(column_prefix, real_name),
            self.qualify(path_prefix, &property.name),
            property.value_type.clone(),
        );
        metadata.length = column.length;
        metadata.precision = column.precision;
        metadata.not_null = !column.nullable;
        if !column.updatable {
            metadata.set_property(self.config.read_only_key.clone(), true);
        }
        if has_text(&column.column_definition) {
            metadata.column_definition = Some(column.column_definition.clone());
        }
        metadata.storage_type = self.resolver.resolve(entity, property);

        log::trace!(
            "{}.{}: column '{}' ({})",
            entity.name(),
            property.name,
            metadata.name,
            metadata.storage_type
        );
        metadata
    }

    fn qualify(&self, prefix: Option<&str>, name: &str) -> String {
        match prefix {
            Some(prefix) if has_text(prefix) => {
                format!("{}{}{}", prefix, self.config.separator, name)
            }
            _ => name.to_string(),
        }
    }
}

/// Extract table metadata with the process-wide extractor.
pub fn extract_table(entity: &EntityType) -> Option<TableMetadata> {
    MetadataExtractor::global().extract_table(entity)
}

/// Extract column metadata with the process-wide extractor.
pub fn extract_columns(
    path_prefix: Option<&str>,
    column_prefix: Option<&str>,
    entity: &EntityType,
) -> Vec<ColumnMetadata> {
    MetadataExtractor::global().extract_columns(path_prefix, column_prefix, entity)
}
