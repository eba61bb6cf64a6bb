//! Static value type to storage type mapping.
//!
//! The table is built once on first use and never mutated. An exact entry
//! here always wins over the resolution rules.

use crate::entity::ValueType;
use crate::meta::StorageType;
use once_cell::sync::Lazy;

static TYPE_MAPPING: Lazy<Vec<(ValueType, StorageType)>> = Lazy::new(|| {
    vec![
        (ValueType::String, StorageType::Varchar),
        (ValueType::I8, StorageType::Tinyint),
        (ValueType::I16, StorageType::Integer),
        (ValueType::I32, StorageType::Integer),
        (ValueType::Char, StorageType::Char),
        (ValueType::I64, StorageType::Bigint),
        (ValueType::F64, StorageType::Decimal),
        (ValueType::F32, StorageType::Decimal),
        (ValueType::Bool, StorageType::Bit),
        (ValueType::bytes(), StorageType::Blob),
        (ValueType::BigDecimal, StorageType::Decimal),
        (ValueType::BigInteger, StorageType::Integer),
        (ValueType::Date, StorageType::Timestamp),
        (ValueType::SqlDate, StorageType::Timestamp),
        (ValueType::Time, StorageType::Timestamp),
        (ValueType::Timestamp, StorageType::Timestamp),
        (ValueType::Object, StorageType::Varchar),
    ]
});

/// Look up the storage type registered for `value_type`
pub fn lookup(value_type: &ValueType) -> Option<StorageType> {
    TYPE_MAPPING
        .iter()
        .find(|(registered, _)| registered == value_type)
        .map(|(_, storage)| *storage)
}

/// Registered mappings in registration order
pub fn entries() -> &'static [(ValueType, StorageType)] {
    &TYPE_MAPPING
}
