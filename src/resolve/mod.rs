//! Storage type resolution.
//!
//! # Structure
//!
//! - `type_mapping`: fixed value type to storage type table
//! - `rules`: ordered fallback rules for types the table does not know
//!
//! [`TypeResolver`] combines both: the table is consulted first, then the
//! rules in order, and `OTHER` is used when nothing matches.

pub mod rules;
pub mod type_mapping;

pub use rules::{DictEnumRule, EnumeratedRule, LobRule, TypeRule};

use crate::entity::{EntityType, PropertyDescriptor};
use crate::meta::StorageType;
use once_cell::sync::Lazy;
use std::sync::Arc;

static DEFAULT_RESOLVER: Lazy<Arc<TypeResolver>> = Lazy::new(|| Arc::new(TypeResolver::default()));

pub struct TypeResolver {
    rules: Vec<Box<dyn TypeRule>>,
}

impl Default for TypeResolver {
    /// Resolver with the built-in rules: enumerated, lob, dictionary enum
    fn default() -> Self {
        Self {
            rules: vec![
                Box::new(EnumeratedRule),
                Box::new(LobRule),
                Box::new(DictEnumRule),
            ],
        }
    }
}

impl TypeResolver {
    /// Process-wide resolver with the built-in rules
    pub fn global() -> &'static Arc<TypeResolver> {
        &DEFAULT_RESOLVER
    }

    /// Resolver without any fallback rules
    pub fn empty() -> Self {
        Self { rules: Vec::new() }
    }

    /// Append `rule` after the rules already registered
    pub fn with_rule(mut self, rule: impl TypeRule + 'static) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|rule| rule.name()).collect()
    }

    pub fn resolve(&self, entity: &EntityType, property: &PropertyDescriptor) -> StorageType {
        if let Some(mapped) = type_mapping::lookup(&property.value_type) {
            return mapped;
        }
        for rule in &self.rules {
            if let Some(resolved) = rule.try_resolve(entity, property) {
                log::trace!(
                    "{}.{}: storage type {} from rule '{}'",
                    entity.name(),
                    property.name,
                    resolved,
                    rule.name()
                );
                return resolved;
            }
        }
        StorageType::Other
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{DictValue, EnumConstant, EnumDescriptor, Enumerated, Lob, ValueType};

    fn resolve_with(resolver: &TypeResolver, property: PropertyDescriptor) -> StorageType {
        let entity = EntityType::builder("E").property(property.clone()).build();
        resolver.resolve(&entity, &property)
    }

    #[test]
    fn test_static_mapping_wins_over_rules() {
        let property = PropertyDescriptor::new("name", ValueType::String).getter_annotation(Lob);
        assert_eq!(
            resolve_with(TypeResolver::global(), property),
            StorageType::Varchar
        );
    }

    #[test]
    fn test_enumerated_checked_before_lob() {
        let property = PropertyDescriptor::new("state", ValueType::Named("State".into()))
            .getter_annotation(Lob)
            .getter_annotation(Enumerated);
        assert_eq!(
            resolve_with(TypeResolver::global(), property),
            StorageType::Varchar
        );
    }

    #[test]
    fn test_unmatched_falls_back_to_other() {
        let property = PropertyDescriptor::new("id", ValueType::Named("Uuid".into()));
        assert_eq!(resolve_with(TypeResolver::global(), property), StorageType::Other);
    }

    #[test]
    fn test_enumerated_short_circuits_dict_enum() {
        let level = Arc::new(EnumDescriptor::dictionary(
            "Level",
            vec![EnumConstant::with_value("Low", DictValue::I64(1))],
        ));
        let property = PropertyDescriptor::new("level", ValueType::Enum(level))
            .getter_annotation(Enumerated);
        assert_eq!(
            resolve_with(TypeResolver::global(), property),
            StorageType::Varchar
        );
    }

    struct UuidRule;

    impl TypeRule for UuidRule {
        fn name(&self) -> &'static str {
            "uuid"
        }

        fn try_resolve(
            &self,
            _entity: &EntityType,
            property: &PropertyDescriptor,
        ) -> Option<StorageType> {
            match &property.value_type {
                ValueType::Named(name) if name == "Uuid" => Some(StorageType::Char),
                _ => None,
            }
        }
    }

    #[test]
    fn test_appended_rule_runs_after_builtins() {
        let resolver = TypeResolver::default().with_rule(UuidRule);
        assert_eq!(resolver.rule_names(), vec!["enumerated", "lob", "dict-enum", "uuid"]);

        let property = PropertyDescriptor::new("id", ValueType::Named("Uuid".into()));
        assert_eq!(resolve_with(&resolver, property), StorageType::Char);

        let lob_uuid = PropertyDescriptor::new("id", ValueType::Named("Uuid".into()))
            .getter_annotation(Lob);
        assert_eq!(resolve_with(&resolver, lob_uuid), StorageType::Clob);
    }

    #[test]
    fn test_empty_resolver() {
        let property = PropertyDescriptor::new("body", ValueType::Named("Text".into()))
            .getter_annotation(Lob);
        assert_eq!(resolve_with(&TypeResolver::empty(), property), StorageType::Other);
    }
}
