//! Table metadata produced by extraction.

use super::column::ColumnMetadata;
use serde::Serialize;

/// Normalized metadata for one relational table.
///
/// Columns keep insertion order. Column names are unique: adding a column
/// whose name is already present replaces the earlier one in place.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableMetadata {
    pub name: String,
    columns: Vec<ColumnMetadata>,
}

impl TableMetadata {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: Vec::new(),
        }
    }

    /// Add `column`, returning the column it replaced, if any
    pub fn add_column(&mut self, column: ColumnMetadata) -> Option<ColumnMetadata> {
        match self.columns.iter_mut().find(|c| c.name == column.name) {
            Some(slot) => {
                log::warn!(
                    "Table '{}': column '{}' declared twice, keeping the later declaration",
                    self.name,
                    column.name
                );
                Some(std::mem::replace(slot, column))
            }
            None => {
                self.columns.push(column);
                None
            }
        }
    }

    pub fn columns(&self) -> &[ColumnMetadata] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&ColumnMetadata> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn column_by_alias(&self, alias: &str) -> Option<&ColumnMetadata> {
        self.columns.iter().find(|c| c.alias == alias)
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

impl Extend<ColumnMetadata> for TableMetadata {
    fn extend<I: IntoIterator<Item = ColumnMetadata>>(&mut self, iter: I) {
        for column in iter {
            self.add_column(column);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::ValueType;

    #[test]
    fn test_add_column_keeps_order() {
        let mut table = TableMetadata::new("t_person");
        table.add_column(ColumnMetadata::new("name", "name", ValueType::String));
        table.add_column(ColumnMetadata::new("age", "age", ValueType::I32));

        let names: Vec<&str> = table.columns().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["name", "age"]);
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_duplicate_name_replaced_in_place() {
        let mut table = TableMetadata::new("t");
        table.add_column(ColumnMetadata::new("a", "first", ValueType::String));
        table.add_column(ColumnMetadata::new("b", "b", ValueType::String));
        let replaced = table.add_column(ColumnMetadata::new("a", "second", ValueType::I32));

        assert_eq!(replaced.map(|c| c.alias), Some("first".to_string()));
        assert_eq!(table.len(), 2);
        assert_eq!(table.columns()[0].alias, "second");
        assert_eq!(table.column_by_alias("second").unwrap().name, "a");
    }

    #[test]
    fn test_empty_table() {
        let table = TableMetadata::new("t");
        assert!(table.is_empty());
        assert!(table.column("x").is_none());
    }
}
