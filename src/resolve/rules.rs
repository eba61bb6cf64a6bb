//! Fallback resolution rules, consulted when the static mapping has no entry.

use super::type_mapping;
use crate::entity::{EntityType, Enumerated, Lob, PropertyDescriptor, ValueType};
use crate::meta::StorageType;
use crate::walker::find_annotation;

/// A single fallback rule of the resolution chain.
///
/// Rules are evaluated in registration order and the first `Some` wins.
pub trait TypeRule: Send + Sync {
    /// Rule name for diagnostics
    fn name(&self) -> &'static str;

    fn try_resolve(&self, entity: &EntityType, property: &PropertyDescriptor)
        -> Option<StorageType>;
}

/// `Enumerated` marker on the property maps to `VARCHAR`.
pub struct EnumeratedRule;

impl TypeRule for EnumeratedRule {
    fn name(&self) -> &'static str {
        "enumerated"
    }

    fn try_resolve(
        &self,
        entity: &EntityType,
        property: &PropertyDescriptor,
    ) -> Option<StorageType> {
        find_annotation::<Enumerated>(entity, property).map(|_| StorageType::Varchar)
    }
}

/// `Lob` marker on the property maps to `CLOB`.
pub struct LobRule;

impl TypeRule for LobRule {
    fn name(&self) -> &'static str {
        "lob"
    }

    fn try_resolve(
        &self,
        entity: &EntityType,
        property: &PropertyDescriptor,
    ) -> Option<StorageType> {
        find_annotation::<Lob>(entity, property).map(|_| StorageType::Clob)
    }
}

/// Dictionary enumerations.
///
/// Arrays of a dictionary enum are stored as a `BIGINT` bit set. A scalar
/// dictionary enum is stored like its backing value: the first constant's
/// backing value type goes through the static mapping, `VARCHAR` otherwise.
pub struct DictEnumRule;

impl TypeRule for DictEnumRule {
    fn name(&self) -> &'static str {
        "dict-enum"
    }

    fn try_resolve(
        &self,
        _entity: &EntityType,
        property: &PropertyDescriptor,
    ) -> Option<StorageType> {
        let descriptor = match property.value_type.element_type() {
            ValueType::Enum(descriptor) if descriptor.dictionary => descriptor,
            _ => return None,
        };
        if property.value_type.is_array() {
            return Some(StorageType::Bigint);
        }
        let resolved = descriptor
            .backing_value_type()
            .and_then(|backing| type_mapping::lookup(&backing))
            .unwrap_or(StorageType::Varchar);
        Some(resolved)
    }
}
