//! Entity type descriptors supplied by the host.
//!
//! An [`EntityType`] mirrors what a reflective host model exposes: declared
//! fields with their annotations, bean-style properties with optional read and
//! write accessors, class-level annotations and a superclass link. `None` as
//! superclass stands for the universal root type.

use super::annotation::Annotation;
use super::value_type::ValueType;
use std::sync::Arc;

/// Field declared directly on an entity type.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDecl {
    pub name: String,
    pub annotations: Vec<Annotation>,
}

impl FieldDecl {
    pub fn new(name: impl Into<String>, annotations: Vec<Annotation>) -> Self {
        Self {
            name: name.into(),
            annotations,
        }
    }
}

/// Read or write accessor of a property.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Accessor {
    pub annotations: Vec<Annotation>,
}

impl Accessor {
    pub fn annotated(annotations: Vec<Annotation>) -> Self {
        Self { annotations }
    }
}

/// Readable and/or writable property of an entity type.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyDescriptor {
    pub name: String,
    pub value_type: ValueType,
    pub read: Option<Accessor>,
    pub write: Option<Accessor>,
}

impl PropertyDescriptor {
    /// Property with an unannotated getter and setter
    pub fn new(name: impl Into<String>, value_type: ValueType) -> Self {
        Self {
            name: name.into(),
            value_type,
            read: Some(Accessor::default()),
            write: Some(Accessor::default()),
        }
    }

    /// Getter-only property, typically computed from other state
    pub fn computed(name: impl Into<String>, value_type: ValueType) -> Self {
        Self {
            write: None,
            ..Self::new(name, value_type)
        }
    }

    pub fn getter_annotation(mut self, annotation: impl Into<Annotation>) -> Self {
        self.read
            .get_or_insert_with(Accessor::default)
            .annotations
            .push(annotation.into());
        self
    }

    pub fn setter_annotation(mut self, annotation: impl Into<Annotation>) -> Self {
        self.write
            .get_or_insert_with(Accessor::default)
            .annotations
            .push(annotation.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EntityType {
    name: String,
    superclass: Option<Arc<EntityType>>,
    annotations: Vec<Annotation>,
    fields: Vec<FieldDecl>,
    properties: Vec<PropertyDescriptor>,
}

impl EntityType {
    pub fn builder(name: impl Into<String>) -> EntityTypeBuilder {
        EntityTypeBuilder {
            entity: EntityType {
                name: name.into(),
                superclass: None,
                annotations: Vec::new(),
                fields: Vec::new(),
                properties: Vec::new(),
            },
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn superclass(&self) -> Option<&EntityType> {
        self.superclass.as_deref()
    }

    /// Class-level annotations declared on this type only
    pub fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }

    pub fn declared_fields(&self) -> &[FieldDecl] {
        &self.fields
    }

    pub fn declared_field(&self, name: &str) -> Option<&FieldDecl> {
        self.fields.iter().find(|field| field.name == name)
    }

    /// This type followed by its superclasses, nearest first
    pub fn hierarchy(&self) -> impl Iterator<Item = &EntityType> {
        std::iter::successors(Some(self), |entity| entity.superclass())
    }

    /// All properties visible on this type, inherited ones included.
    ///
    /// Properties are listed root type first, then in declaration order. A
    /// property redeclared by a subtype replaces the inherited one at the
    /// inherited position.
    pub fn properties(&self) -> Vec<&PropertyDescriptor> {
        let mut chain: Vec<&EntityType> = self.hierarchy().collect();
        chain.reverse();

        let mut properties: Vec<&PropertyDescriptor> = Vec::new();
        for entity in chain {
            for property in &entity.properties {
                match properties.iter_mut().find(|p| p.name == property.name) {
                    Some(slot) => *slot = property,
                    None => properties.push(property),
                }
            }
        }
        properties
    }
}

pub struct EntityTypeBuilder {
    entity: EntityType,
}

impl EntityTypeBuilder {
    pub fn extends(mut self, superclass: Arc<EntityType>) -> Self {
        self.entity.superclass = Some(superclass);
        self
    }

    /// Add a class-level annotation
    pub fn annotate(mut self, annotation: impl Into<Annotation>) -> Self {
        self.entity.annotations.push(annotation.into());
        self
    }

    pub fn table(self, name: impl Into<String>) -> Self {
        self.annotate(super::annotation::Table::new(name))
    }

    /// Declare an annotated field together with its getter/setter property
    pub fn field(
        mut self,
        name: impl Into<String>,
        value_type: ValueType,
        annotations: Vec<Annotation>,
    ) -> Self {
        let name = name.into();
        self.entity.fields.push(FieldDecl::new(name.clone(), annotations));
        self.entity
            .properties
            .push(PropertyDescriptor::new(name, value_type));
        self
    }

    /// Declare a field that is not exposed as a property
    pub fn declare_field(mut self, field: FieldDecl) -> Self {
        self.entity.fields.push(field);
        self
    }

    /// Add a property without a backing field on this type
    pub fn property(mut self, property: PropertyDescriptor) -> Self {
        self.entity.properties.push(property);
        self
    }

    pub fn build(self) -> Arc<EntityType> {
        Arc::new(self.entity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::annotation::{Column, Lob};

    #[test]
    fn test_hierarchy_nearest_first() {
        let root = EntityType::builder("Root").build();
        let middle = EntityType::builder("Middle").extends(root).build();
        let leaf = EntityType::builder("Leaf").extends(middle).build();

        let names: Vec<&str> = leaf.hierarchy().map(EntityType::name).collect();
        assert_eq!(names, vec!["Leaf", "Middle", "Root"]);
    }

    #[test]
    fn test_properties_inherited_first_and_overridden_in_place() {
        let base = EntityType::builder("Base")
            .field("id", ValueType::I64, vec![Column::default().into()])
            .field("note", ValueType::String, vec![])
            .build();
        let child = EntityType::builder("Child")
            .extends(base)
            .field("name", ValueType::String, vec![])
            .property(PropertyDescriptor::new("note", ValueType::Object))
            .build();

        let properties = child.properties();
        let names: Vec<&str> = properties.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["id", "note", "name"]);
        assert_eq!(properties[1].value_type, ValueType::Object);
    }

    #[test]
    fn test_accessor_annotations() {
        let property = PropertyDescriptor::computed("body", ValueType::Named("Text".into()))
            .getter_annotation(Lob);
        assert!(property.write.is_none());
        assert_eq!(property.read.unwrap().annotations.len(), 1);
    }

    #[test]
    fn test_declared_field_lookup() {
        let entity = EntityType::builder("E")
            .declare_field(FieldDecl::new("secret", vec![]))
            .build();
        assert!(entity.declared_field("secret").is_some());
        assert!(entity.declared_field("missing").is_none());
        assert!(entity.properties().is_empty());
    }
}
