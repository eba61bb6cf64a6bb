//! Declared value types of entity properties.

use super::EntityType;
use rust_decimal::Decimal;
use serde::{Serialize, Serializer};
use std::fmt;
use std::sync::Arc;

/// Declared value type of a property.
///
/// Integer widths are kept apart because they resolve to different storage
/// types. Types the core has no knowledge of are carried as [`ValueType::Named`]
/// and fall through to the resolution rules.
#[derive(Debug, Clone, PartialEq)]
pub enum ValueType {
    String,
    I8,
    I16,
    I32,
    I64,
    Char,
    F32,
    F64,
    Bool,
    /// Arbitrary-precision decimal
    BigDecimal,
    /// Arbitrary-precision integer
    BigInteger,
    Date,
    SqlDate,
    Time,
    Timestamp,
    /// Unconstrained object type
    Object,
    Array(Box<ValueType>),
    Enum(Arc<EnumDescriptor>),
    /// Structured sub-entity, used by collection-table properties
    Entity(Arc<EntityType>),
    Named(String),
}

impl ValueType {
    pub fn array_of(element: ValueType) -> Self {
        ValueType::Array(Box::new(element))
    }

    /// `[i8]`, the raw byte sequence type
    pub fn bytes() -> Self {
        Self::array_of(ValueType::I8)
    }

    pub fn is_array(&self) -> bool {
        matches!(self, ValueType::Array(_))
    }

    /// Element type for arrays, the type itself otherwise
    pub fn element_type(&self) -> &ValueType {
        match self {
            ValueType::Array(element) => element,
            other => other,
        }
    }

    /// Entity type reachable from this value type (directly or as array element)
    pub fn entity_type(&self) -> Option<&Arc<EntityType>> {
        match self.element_type() {
            ValueType::Entity(entity) => Some(entity),
            _ => None,
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueType::String => f.write_str("String"),
            ValueType::I8 => f.write_str("i8"),
            ValueType::I16 => f.write_str("i16"),
            ValueType::I32 => f.write_str("i32"),
            ValueType::I64 => f.write_str("i64"),
            ValueType::Char => f.write_str("char"),
            ValueType::F32 => f.write_str("f32"),
            ValueType::F64 => f.write_str("f64"),
            ValueType::Bool => f.write_str("bool"),
            ValueType::BigDecimal => f.write_str("BigDecimal"),
            ValueType::BigInteger => f.write_str("BigInteger"),
            ValueType::Date => f.write_str("Date"),
            ValueType::SqlDate => f.write_str("SqlDate"),
            ValueType::Time => f.write_str("Time"),
            ValueType::Timestamp => f.write_str("Timestamp"),
            ValueType::Object => f.write_str("Object"),
            ValueType::Array(element) => write!(f, "[{}]", element),
            ValueType::Enum(descriptor) => f.write_str(&descriptor.name),
            ValueType::Entity(entity) => f.write_str(entity.name()),
            ValueType::Named(name) => f.write_str(name),
        }
    }
}

impl Serialize for ValueType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Backing value of a dictionary enumeration constant.
#[derive(Debug, Clone, PartialEq)]
pub enum DictValue {
    String(String),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    Char(char),
    F32(f32),
    F64(f64),
    Bool(bool),
    Decimal(Decimal),
}

impl DictValue {
    /// Runtime type of the backing value
    pub fn value_type(&self) -> ValueType {
        match self {
            DictValue::String(_) => ValueType::String,
            DictValue::I8(_) => ValueType::I8,
            DictValue::I16(_) => ValueType::I16,
            DictValue::I32(_) => ValueType::I32,
            DictValue::I64(_) => ValueType::I64,
            DictValue::Char(_) => ValueType::Char,
            DictValue::F32(_) => ValueType::F32,
            DictValue::F64(_) => ValueType::F64,
            DictValue::Bool(_) => ValueType::Bool,
            DictValue::Decimal(_) => ValueType::BigDecimal,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnumConstant {
    pub name: String,
    pub value: Option<DictValue>,
}

impl EnumConstant {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: None,
        }
    }

    pub fn with_value(name: impl Into<String>, value: DictValue) -> Self {
        Self {
            name: name.into(),
            value: Some(value),
        }
    }
}

/// Enumeration type description.
///
/// `dictionary` is set when the enumeration implements the dictionary
/// capability, i.e. every constant exposes a backing value.
#[derive(Debug, Clone, PartialEq)]
pub struct EnumDescriptor {
    pub name: String,
    pub constants: Vec<EnumConstant>,
    pub dictionary: bool,
}

impl EnumDescriptor {
    pub fn plain(name: impl Into<String>, constants: &[&str]) -> Self {
        Self {
            name: name.into(),
            constants: constants.iter().map(|c| EnumConstant::new(*c)).collect(),
            dictionary: false,
        }
    }

    pub fn dictionary(name: impl Into<String>, constants: Vec<EnumConstant>) -> Self {
        Self {
            name: name.into(),
            constants,
            dictionary: true,
        }
    }

    /// Type of the first constant's backing value
    pub fn backing_value_type(&self) -> Option<ValueType> {
        self.constants
            .first()
            .and_then(|constant| constant.value.as_ref())
            .map(DictValue::value_type)
    }
}
