//! Normalized storage type tags.

use serde::Serialize;
use std::fmt;

/// Canonical storage category of a column, independent of the source value type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum StorageType {
    Varchar,
    Tinyint,
    Integer,
    Char,
    Bigint,
    Decimal,
    Bit,
    Blob,
    Timestamp,
    Clob,
    Other,
}

impl StorageType {
    pub const ALL: [StorageType; 11] = [
        StorageType::Varchar,
        StorageType::Tinyint,
        StorageType::Integer,
        StorageType::Char,
        StorageType::Bigint,
        StorageType::Decimal,
        StorageType::Bit,
        StorageType::Blob,
        StorageType::Timestamp,
        StorageType::Clob,
        StorageType::Other,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            StorageType::Varchar => "VARCHAR",
            StorageType::Tinyint => "TINYINT",
            StorageType::Integer => "INTEGER",
            StorageType::Char => "CHAR",
            StorageType::Bigint => "BIGINT",
            StorageType::Decimal => "DECIMAL",
            StorageType::Bit => "BIT",
            StorageType::Blob => "BLOB",
            StorageType::Timestamp => "TIMESTAMP",
            StorageType::Clob => "CLOB",
            StorageType::Other => "OTHER",
        }
    }
}

impl fmt::Display for StorageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialized_name_matches_display() {
        for ty in StorageType::ALL {
            let json = serde_json::to_string(&ty).unwrap();
            assert_eq!(json, format!("\"{}\"", ty));
        }
    }
}
