//! Host-side entity description model.
//!
//! # Structure
//!
//! - `annotation`: persistence annotations and typed lookup
//! - `descriptor`: entity types, declared fields and properties
//! - `value_type`: declared property value types and enumerations

pub mod annotation;
pub mod descriptor;
pub mod value_type;

pub use annotation::{
    Annotation, AnnotationKind, CollectionTable, Column, Composed, Enumerated, Lob, Table,
};
pub use descriptor::{Accessor, EntityType, EntityTypeBuilder, FieldDecl, PropertyDescriptor};
pub use value_type::{DictValue, EnumConstant, EnumDescriptor, ValueType};
