//! Column metadata produced by extraction.

use super::storage_type::StorageType;
use crate::entity::ValueType;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

/// Property bag key recording that a column must not be updated.
pub const READ_ONLY: &str = "read-only";

/// Normalized metadata for one relational column.
///
/// `name` is the storage name (dotted when the column comes from a nested
/// collection table), `alias` the dotted logical property path.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnMetadata {
    pub name: String,
    pub alias: String,
    pub length: i32,
    pub precision: i32,
    pub value_type: ValueType,
    pub storage_type: StorageType,
    pub not_null: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column_definition: Option<String>,
    /// Extension flags such as [`READ_ONLY`]
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: BTreeMap<String, Value>,
}

impl ColumnMetadata {
    pub fn new(name: impl Into<String>, alias: impl Into<String>, value_type: ValueType) -> Self {
        Self {
            name: name.into(),
            alias: alias.into(),
            length: 0,
            precision: 0,
            value_type,
            storage_type: StorageType::Other,
            not_null: false,
            column_definition: None,
            properties: BTreeMap::new(),
        }
    }

    pub fn set_property(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.properties.insert(key.into(), value.into());
    }

    pub fn property(&self, key: &str) -> Option<&Value> {
        self.properties.get(key)
    }

    /// True when the default [`READ_ONLY`] flag is set
    pub fn is_read_only(&self) -> bool {
        self.flag(READ_ONLY)
    }

    pub fn flag(&self, key: &str) -> bool {
        matches!(self.properties.get(key), Some(Value::Bool(true)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_defaults() {
        let column = ColumnMetadata::new("age", "age", ValueType::I32);
        assert_eq!(column.storage_type, StorageType::Other);
        assert!(!column.not_null);
        assert!(!column.is_read_only());
        assert!(column.column_definition.is_none());
    }

    #[test]
    fn test_read_only_flag() {
        let mut column = ColumnMetadata::new("id", "id", ValueType::I64);
        column.set_property(READ_ONLY, true);
        assert!(column.is_read_only());
        assert_eq!(column.property(READ_ONLY), Some(&Value::Bool(true)));
    }

    #[test]
    fn test_serialize_skips_empty_extras() {
        let column = ColumnMetadata::new("age", "age", ValueType::I32);
        let json = serde_json::to_value(&column).unwrap();
        assert_eq!(json["value_type"], "i32");
        assert_eq!(json["storage_type"], "OTHER");
        assert!(json.get("column_definition").is_none());
        assert!(json.get("properties").is_none());
    }
}
