//! Entity types shared by unit tests.

use crate::entity::{CollectionTable, Column, EntityType, Lob, ValueType};
use std::sync::Arc;

/// `Person` mapped to `t_person` with a single `age` column
pub fn person() -> Arc<EntityType> {
    EntityType::builder("Person")
        .table("t_person")
        .field("age", ValueType::I32, vec![Column::default().into()])
        .build()
}

/// Annotated columns but no table annotation
pub fn unmapped() -> Arc<EntityType> {
    EntityType::builder("Draft")
        .field("title", ValueType::String, vec![Column::default().into()])
        .build()
}

/// `Document` with a large-object body of a type the static mapping lacks
pub fn document() -> Arc<EntityType> {
    EntityType::builder("Document")
        .table("t_document")
        .field(
            "body",
            ValueType::Named("Text".into()),
            vec![Column::default().into(), Lob.into()],
        )
        .build()
}

/// `Address` mapped to `table`
pub fn address(table: &str) -> Arc<EntityType> {
    EntityType::builder("Address")
        .table(table)
        .field("street", ValueType::String, vec![Column::default().into()])
        .build()
}

/// `Node` whose collection table refers to another type named `Node`
pub fn shadowed_node() -> Arc<EntityType> {
    let inner = EntityType::builder("Node")
        .field("label", ValueType::String, vec![Column::default().into()])
        .build();
    EntityType::builder("Node")
        .table("t_node")
        .field("label", ValueType::String, vec![Column::default().into()])
        .field(
            "child",
            ValueType::Entity(inner),
            vec![CollectionTable::new("child_tbl").into()],
        )
        .build()
}

/// `Top` -> `Mid` -> `Leaf`, each level adding one column
pub fn three_level_nesting() -> Arc<EntityType> {
    let leaf = EntityType::builder("Leaf")
        .field("leaf", ValueType::String, vec![Column::default().into()])
        .build();
    let mid = EntityType::builder("Mid")
        .field("mid", ValueType::String, vec![Column::default().into()])
        .field(
            "leaf",
            ValueType::Entity(leaf),
            vec![CollectionTable::new("leaf_tbl").into()],
        )
        .build();
    EntityType::builder("Top")
        .table("t_top")
        .field("top", ValueType::String, vec![Column::default().into()])
        .field(
            "mid",
            ValueType::Entity(mid),
            vec![CollectionTable::new("mid_tbl").into()],
        )
        .build()
}
