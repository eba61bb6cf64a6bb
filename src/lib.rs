//! # Entity Metadata
//!
//! Extracts relational table metadata from persistence-annotated entity
//! descriptions: a table name plus an ordered list of columns with resolved
//! storage types.
//!
//! The host ORM describes its entity types with the [`entity`] model
//! (fields, properties, accessors and annotations); [`extract_table`] turns a
//! description into [`TableMetadata`]. Extraction never fails: an entity
//! without a table annotation yields `None` and unknown value types resolve
//! to [`StorageType::Other`].
//!
//! ```
//! use entity_metadata::entity::{Column, EntityType, ValueType};
//! use entity_metadata::{extract_table, StorageType};
//!
//! let person = EntityType::builder("Person")
//!     .table("t_person")
//!     .field("age", ValueType::I32, vec![Column::default().into()])
//!     .build();
//!
//! let table = extract_table(&person).unwrap();
//! assert_eq!(table.name, "t_person");
//! assert_eq!(table.columns()[0].storage_type, StorageType::Integer);
//! ```

pub mod cache;
pub mod config;
pub mod entity;
pub mod extractor;
pub mod meta;
pub mod resolve;
pub mod walker;

#[cfg(test)]
mod test_fixtures;

pub use cache::MetadataCache;
pub use config::MetadataConfig;
pub use extractor::{extract_columns, extract_table, MetadataExtractor};
pub use meta::{ColumnMetadata, StorageType, TableMetadata};
pub use resolve::{TypeResolver, TypeRule};
pub use walker::{find_annotation, find_type_annotation};
