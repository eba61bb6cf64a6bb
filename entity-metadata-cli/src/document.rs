//! Entity definitions from TOML or JSON documents
//!
//! ```toml
//! [[enums]]
//! name = "Level"
//! dict = true
//! constants = [{ name = "Low", value = 1 }, { name = "High", value = 2 }]
//!
//! [[entities]]
//! name = "Customer"
//! table_name = "t_customer"
//! extends = "BaseEntity"
//!
//! [[entities.fields]]
//! name = "name"
//! type = "String"
//! column = { name = "customer_name", length = 64, nullable = false }
//!
//! [[entities.fields]]
//! name = "address"
//! type = "Address"
//! collection_table = "addr_tbl"
//! ```

use crate::definition::{
    AccessorDefinition, AccessorKind, DefinitionSet, EntityDefinition, FieldDefinition,
};
use crate::error::Result;
use entity_metadata::entity::{
    Annotation, CollectionTable, Column, DictValue, EnumConstant, EnumDescriptor, Enumerated, Lob,
};
use serde::Deserialize;
use syn::Type;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Document {
    enums: Vec<EnumConfig>,
    entities: Vec<EntityConfig>,
}

#[derive(Debug, Deserialize)]
struct EnumConfig {
    name: String,
    #[serde(default)]
    dict: bool,
    constants: Vec<ConstantConfig>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ConstantConfig {
    Name(String),
    Valued {
        name: String,
        value: Option<ValueConfig>,
    },
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ValueConfig {
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
}

#[derive(Debug, Deserialize)]
struct EntityConfig {
    name: String,
    #[serde(alias = "table")]
    table_name: Option<String>,
    extends: Option<String>,
    #[serde(default)]
    fields: Vec<FieldConfig>,
    #[serde(default)]
    accessors: Vec<AccessorConfig>,
}

#[derive(Debug, Deserialize)]
struct FieldConfig {
    name: String,
    #[serde(rename = "type")]
    type_str: String,
    #[serde(flatten)]
    annotations: AnnotationConfig,
}

#[derive(Debug, Deserialize)]
struct AccessorConfig {
    property: String,
    kind: AccessorKindConfig,
    #[serde(rename = "type")]
    type_str: String,
    #[serde(flatten)]
    annotations: AnnotationConfig,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "lowercase")]
enum AccessorKindConfig {
    Getter,
    Setter,
}

#[derive(Debug, Default, Deserialize)]
struct AnnotationConfig {
    column: Option<ColumnConfig>,
    collection_table: Option<String>,
    #[serde(default)]
    enumerated: bool,
    #[serde(default)]
    lob: bool,
}

/// `column = true` or `column = { name = "..", .. }`
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ColumnConfig {
    Flag(bool),
    Attributes(ColumnAttributes),
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ColumnAttributes {
    name: Option<String>,
    length: Option<i32>,
    precision: Option<i32>,
    nullable: Option<bool>,
    updatable: Option<bool>,
    column_definition: Option<String>,
}

pub fn parse_toml(content: &str) -> Result<DefinitionSet> {
    let document: Document = toml::from_str(content)?;
    convert_document(document)
}

pub fn parse_json(content: &str) -> Result<DefinitionSet> {
    let document: Document = serde_json::from_str(content)?;
    convert_document(document)
}

fn convert_document(document: Document) -> Result<DefinitionSet> {
    let mut set = DefinitionSet::new();

    for config in document.enums {
        set.add_enum(convert_enum(config));
    }

    for config in document.entities {
        for accessor in config.accessors {
            set.add_accessor(
                config.name.as_str(),
                AccessorDefinition {
                    property: accessor.property,
                    kind: match accessor.kind {
                        AccessorKindConfig::Getter => AccessorKind::Getter,
                        AccessorKindConfig::Setter => AccessorKind::Setter,
                    },
                    ty: syn::parse_str::<Type>(&accessor.type_str)?,
                    annotations: accessor.annotations.into_annotations(),
                },
            );
        }

        let fields = config
            .fields
            .into_iter()
            .map(|f| {
                Ok(FieldDefinition {
                    ty: syn::parse_str::<Type>(&f.type_str)?,
                    name: f.name,
                    annotations: f.annotations.into_annotations(),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        set.add_entity(EntityDefinition {
            name: config.name,
            table_name: config.table_name,
            extends: config.extends,
            fields,
        });
    }

    Ok(set)
}

fn convert_enum(config: EnumConfig) -> EnumDescriptor {
    let constants = config
        .constants
        .into_iter()
        .map(|constant| match constant {
            ConstantConfig::Name(name) => EnumConstant::new(name),
            ConstantConfig::Valued { name, value } => EnumConstant {
                name,
                value: value.map(ValueConfig::into_dict_value),
            },
        })
        .collect();

    EnumDescriptor {
        name: config.name,
        constants,
        dictionary: config.dict,
    }
}

impl ValueConfig {
    fn into_dict_value(self) -> DictValue {
        match self {
            ValueConfig::Bool(b) => DictValue::Bool(b),
            ValueConfig::Integer(i) => DictValue::I64(i),
            ValueConfig::Float(f) => DictValue::F64(f),
            ValueConfig::Text(s) => DictValue::String(s),
        }
    }
}

impl AnnotationConfig {
    fn into_annotations(self) -> Vec<Annotation> {
        let mut annotations = Vec::new();
        match self.column {
            Some(ColumnConfig::Flag(true)) => annotations.push(Column::default().into()),
            Some(ColumnConfig::Attributes(attrs)) => annotations.push(attrs.into_column().into()),
            Some(ColumnConfig::Flag(false)) | None => {}
        }
        if let Some(name) = self.collection_table {
            annotations.push(CollectionTable::new(name).into());
        }
        if self.enumerated {
            annotations.push(Enumerated.into());
        }
        if self.lob {
            annotations.push(Lob.into());
        }
        annotations
    }
}

impl ColumnAttributes {
    fn into_column(self) -> Column {
        let defaults = Column::default();
        Column {
            name: self.name.unwrap_or(defaults.name),
            length: self.length.unwrap_or(defaults.length),
            precision: self.precision.unwrap_or(defaults.precision),
            nullable: self.nullable.unwrap_or(defaults.nullable),
            updatable: self.updatable.unwrap_or(defaults.updatable),
            column_definition: self
                .column_definition
                .unwrap_or(defaults.column_definition),
        }
    }
}
