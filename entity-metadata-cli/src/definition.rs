//! Intermediate entity definitions and their conversion to entity types.
//!
//! Rust sources and TOML/JSON documents are both read into a
//! [`DefinitionSet`]. [`DefinitionSet::build`] then resolves superclasses,
//! enumerations and nested struct types across everything that was read.

use crate::error::{LoadError, Result};
use entity_metadata::entity::{
    Accessor, Annotation, EntityType, EnumDescriptor, FieldDecl, PropertyDescriptor, ValueType,
};
use quote::ToTokens;
use std::collections::HashMap;
use std::sync::Arc;
use syn::{GenericArgument, PathArguments, PathSegment, Type};

/// Entity definition read from source
#[derive(Debug, Clone)]
pub struct EntityDefinition {
    pub name: String,
    pub table_name: Option<String>,
    pub extends: Option<String>,
    pub fields: Vec<FieldDefinition>,
}

/// Field within an entity definition
#[derive(Debug, Clone)]
pub struct FieldDefinition {
    pub name: String,
    pub ty: Type,
    pub annotations: Vec<Annotation>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessorKind {
    Getter,
    Setter,
}

/// Accessor method declared for an entity
#[derive(Debug, Clone)]
pub struct AccessorDefinition {
    pub property: String,
    pub kind: AccessorKind,
    pub ty: Type,
    pub annotations: Vec<Annotation>,
}

#[derive(Debug, Default)]
pub struct DefinitionSet {
    entities: Vec<EntityDefinition>,
    enums: HashMap<String, Arc<EnumDescriptor>>,
    accessors: HashMap<String, Vec<AccessorDefinition>>,
}

impl DefinitionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_entity(&mut self, entity: EntityDefinition) {
        self.entities.push(entity);
    }

    pub fn add_enum(&mut self, descriptor: EnumDescriptor) {
        self.enums
            .insert(descriptor.name.clone(), Arc::new(descriptor));
    }

    pub fn add_accessor(&mut self, entity: impl Into<String>, accessor: AccessorDefinition) {
        self.accessors.entry(entity.into()).or_default().push(accessor);
    }

    /// Take over everything read into `other`
    pub fn merge(&mut self, other: DefinitionSet) {
        self.entities.extend(other.entities);
        self.enums.extend(other.enums);
        for (entity, accessors) in other.accessors {
            self.accessors.entry(entity).or_default().extend(accessors);
        }
    }

    pub fn enum_descriptor(&self, name: &str) -> Option<&Arc<EnumDescriptor>> {
        self.enums.get(name)
    }

    /// Annotated accessors declared for `entity`
    pub fn accessors(&self, entity: &str) -> &[AccessorDefinition] {
        self.accessors.get(entity).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn entities(&self) -> &[EntityDefinition] {
        &self.entities
    }

    pub fn entity(&self, name: &str) -> Option<&EntityDefinition> {
        self.entities.iter().find(|e| e.name == name)
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Build entity types for every definition, in definition order
    pub fn build(&self) -> Result<Vec<Arc<EntityType>>> {
        let mut builder = TypeBuilder {
            definitions: self,
            built: HashMap::new(),
            stack: Vec::new(),
        };
        self.entities
            .iter()
            .map(|definition| builder.entity(&definition.name, false))
            .collect()
    }
}

/// Type under construction
struct Frame {
    name: String,
    /// Reached through an `extends` edge from the frame below
    via_superclass: bool,
    /// A reference back into the stack was cut somewhere below this type
    tainted: bool,
}

/// Builds immutable entity types from definitions.
///
/// A type may be under construction more than once at a time: a nested
/// field type can extend the type that declares the field. Such a type is
/// assembled again as a superclass, and any field leading back to a type
/// still under construction becomes a plain named type, which contributes no
/// nested columns. Types whose construction cut such a reference depend on
/// where they were reached from and are not reused.
struct TypeBuilder<'d> {
    definitions: &'d DefinitionSet,
    built: HashMap<String, Arc<EntityType>>,
    stack: Vec<Frame>,
}

impl<'d> TypeBuilder<'d> {
    fn entity(&mut self, name: &str, via_superclass: bool) -> Result<Arc<EntityType>> {
        if let Some(entity) = self.built.get(name) {
            return Ok(Arc::clone(entity));
        }
        let definitions = self.definitions;
        let definition = definitions
            .entity(name)
            .ok_or_else(|| LoadError::UnknownEntity(name.to_string()))?;

        self.stack.push(Frame {
            name: name.to_string(),
            via_superclass,
            tainted: false,
        });
        let entity = self.assemble(definition);
        let tainted = self.stack.pop().is_some_and(|frame| frame.tainted);

        let entity = entity?;
        if !tainted {
            self.built.insert(name.to_string(), Arc::clone(&entity));
        }
        Ok(entity)
    }

    /// Whether `name` is the current type or one of the subclasses it is
    /// being built for
    fn in_superclass_chain(&self, name: &str) -> bool {
        for frame in self.stack.iter().rev() {
            if frame.name == name {
                return true;
            }
            if !frame.via_superclass {
                break;
            }
        }
        false
    }

    fn assemble(&mut self, definition: &'d EntityDefinition) -> Result<Arc<EntityType>> {
        let definitions = self.definitions;
        let mut builder = EntityType::builder(&definition.name);

        if let Some(superclass) = &definition.extends {
            if definitions.entity(superclass).is_none() {
                return Err(LoadError::UnknownSuperclass {
                    entity: definition.name.clone(),
                    superclass: superclass.clone(),
                });
            }
            if self.in_superclass_chain(superclass) {
                return Err(LoadError::InheritanceCycle(superclass.clone()));
            }
            builder = builder.extends(self.entity(superclass, true)?);
        }
        if let Some(table_name) = &definition.table_name {
            builder = builder.table(table_name);
        }

        let accessors = definitions
            .accessors
            .get(&definition.name)
            .map(Vec::as_slice)
            .unwrap_or_default();

        for field in &definition.fields {
            let value_type = self.value_type(&field.ty)?;
            let mut property = PropertyDescriptor::new(&field.name, value_type);
            attach_accessors(&mut property, accessors);
            builder = builder
                .declare_field(FieldDecl::new(&field.name, field.annotations.clone()))
                .property(property);
        }

        // Accessors without a field on this type: computed or overriding properties
        let mut seen: Vec<&str> = definition.fields.iter().map(|f| f.name.as_str()).collect();
        for accessor in accessors {
            if seen.contains(&accessor.property.as_str()) {
                continue;
            }
            seen.push(&accessor.property);

            let value_type = self.value_type(&accessor.ty)?;
            let mut property = PropertyDescriptor::new(&accessor.property, value_type);
            property.read = None;
            property.write = None;
            attach_accessors(&mut property, accessors);
            builder = builder.property(property);
        }

        Ok(builder.build())
    }

    fn value_type(&mut self, ty: &Type) -> Result<ValueType> {
        match ty {
            Type::Array(array) => Ok(ValueType::array_of(self.value_type(&array.elem)?)),
            Type::Slice(slice) => Ok(ValueType::array_of(self.value_type(&slice.elem)?)),
            Type::Reference(reference) => self.value_type(&reference.elem),
            Type::Paren(paren) => self.value_type(&paren.elem),
            Type::Group(group) => self.value_type(&group.elem),
            Type::Path(path) => match path.path.segments.last() {
                Some(segment) => self.path_type(segment),
                None => Ok(ValueType::Named(ty.to_token_stream().to_string())),
            },
            _ => Ok(ValueType::Named(ty.to_token_stream().to_string())),
        }
    }

    fn path_type(&mut self, segment: &PathSegment) -> Result<ValueType> {
        let ident = segment.ident.to_string();
        let value_type = match ident.as_str() {
            "Option" | "Box" | "Arc" | "Rc" => {
                return match first_type_argument(segment) {
                    Some(inner) => self.value_type(inner),
                    None => Ok(ValueType::Named(ident)),
                };
            }
            "Vec" | "VecDeque" => {
                return match first_type_argument(segment) {
                    Some(inner) => Ok(ValueType::array_of(self.value_type(inner)?)),
                    None => Ok(ValueType::Named(ident)),
                };
            }
            "String" | "str" => ValueType::String,
            // u16 and wider have no mapping and resolve as named types (OTHER)
            "i8" | "u8" => ValueType::I8,
            "i16" => ValueType::I16,
            "i32" => ValueType::I32,
            "i64" => ValueType::I64,
            "char" => ValueType::Char,
            "f32" => ValueType::F32,
            "f64" => ValueType::F64,
            "bool" => ValueType::Bool,
            "Decimal" | "BigDecimal" => ValueType::BigDecimal,
            "BigInt" | "BigInteger" => ValueType::BigInteger,
            "NaiveDate" | "Date" => ValueType::Date,
            "SqlDate" => ValueType::SqlDate,
            "NaiveTime" | "Time" => ValueType::Time,
            "NaiveDateTime" | "DateTime" | "Timestamp" | "SystemTime" => ValueType::Timestamp,
            "Object" => ValueType::Object,
            _ => return self.named_type(ident),
        };
        Ok(value_type)
    }

    fn named_type(&mut self, ident: String) -> Result<ValueType> {
        if let Some(descriptor) = self.definitions.enums.get(&ident) {
            return Ok(ValueType::Enum(Arc::clone(descriptor)));
        }
        if self.definitions.entity(&ident).is_none() {
            log::trace!("{} is not a known value type or entity, kept as named", ident);
            return Ok(ValueType::Named(ident));
        }
        if self.stack.iter().any(|frame| frame.name == ident) {
            log::debug!(
                "{} is nested in itself, keeping the inner reference as a plain type",
                ident
            );
            for frame in &mut self.stack {
                frame.tainted = true;
            }
            return Ok(ValueType::Named(ident));
        }
        Ok(ValueType::Entity(self.entity(&ident, false)?))
    }
}

fn first_type_argument(segment: &PathSegment) -> Option<&Type> {
    match &segment.arguments {
        PathArguments::AngleBracketed(args) => args.args.iter().find_map(|arg| match arg {
            GenericArgument::Type(ty) => Some(ty),
            _ => None,
        }),
        _ => None,
    }
}

fn attach_accessors(property: &mut PropertyDescriptor, accessors: &[AccessorDefinition]) {
    for accessor in accessors.iter().filter(|a| a.property == property.name) {
        let slot = match accessor.kind {
            AccessorKind::Getter => &mut property.read,
            AccessorKind::Setter => &mut property.write,
        };
        slot.get_or_insert_with(Accessor::default)
            .annotations
            .extend(accessor.annotations.iter().cloned());
    }
}
