//! Persistence annotations attached to entity types, fields and accessors.
//!
//! Annotations are plain data supplied by the host. Lookups are typed: every
//! annotation struct implements [`AnnotationKind`], so callers ask for a
//! `Column` or a `Lob` rather than matching on [`Annotation`] themselves.
//!
//! A [`Composed`] annotation stands for a host-defined annotation that is
//! itself annotated (a stereotype such as `@AuditColumn` carrying `@Column`).
//! Searches look through composed annotations, so a `Column` declared as a
//! meta-annotation is found the same way as a direct one.

/// Class-level table naming annotation.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Table {
    pub name: String,
}

impl Table {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Column mapping annotation.
///
/// Defaults mirror the usual persistence-annotation defaults: length 255,
/// precision 0, nullable and updatable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    /// Column name override; blank means "use the property name"
    pub name: String,
    pub length: i32,
    pub precision: i32,
    pub nullable: bool,
    pub updatable: bool,
    /// Raw column definition override; blank means "none"
    pub column_definition: String,
}

impl Default for Column {
    fn default() -> Self {
        Self {
            name: String::new(),
            length: 255,
            precision: 0,
            nullable: true,
            updatable: true,
            column_definition: String::new(),
        }
    }
}

impl Column {
    /// Column with a name override and default settings
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}

/// Marks a property whose value is a nested structure flattened into the
/// owning table under a column-name prefix.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CollectionTable {
    pub name: String,
}

impl CollectionTable {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Marker: the property holds an enumeration stored by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Enumerated;

/// Marker: the property is stored as a large character object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Lob;

/// Host-defined annotation carrying meta-annotations.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Composed {
    pub name: String,
    pub meta: Vec<Annotation>,
}

impl Composed {
    pub fn new(name: impl Into<String>, meta: Vec<Annotation>) -> Self {
        Self {
            name: name.into(),
            meta,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Annotation {
    Table(Table),
    Column(Column),
    CollectionTable(CollectionTable),
    Enumerated(Enumerated),
    Lob(Lob),
    Composed(Composed),
}

impl Annotation {
    /// Short name used in log output
    pub fn name(&self) -> &str {
        match self {
            Annotation::Table(_) => "Table",
            Annotation::Column(_) => "Column",
            Annotation::CollectionTable(_) => "CollectionTable",
            Annotation::Enumerated(_) => "Enumerated",
            Annotation::Lob(_) => "Lob",
            Annotation::Composed(c) => &c.name,
        }
    }
}

/// Typed view over [`Annotation`] used by the lookup functions.
pub trait AnnotationKind: Sized {
    /// Returns `Some` when `annotation` is of this kind (meta-annotations are
    /// not considered here, see [`find_in`]).
    fn extract(annotation: &Annotation) -> Option<&Self>;
}

macro_rules! impl_annotation_kind {
    ($($ty:ident),* $(,)?) => {
        $(
            impl AnnotationKind for $ty {
                fn extract(annotation: &Annotation) -> Option<&Self> {
                    match annotation {
                        Annotation::$ty(inner) => Some(inner),
                        _ => None,
                    }
                }
            }

            impl From<$ty> for Annotation {
                fn from(value: $ty) -> Self {
                    Annotation::$ty(value)
                }
            }
        )*
    };
}

impl_annotation_kind!(Table, Column, CollectionTable, Enumerated, Lob, Composed);

/// Search `annotations` for an annotation of kind `A`.
///
/// Direct annotations are checked first; only if none matches are the
/// meta-annotations of composed annotations searched, depth first in
/// declaration order.
pub fn find_in<A: AnnotationKind>(annotations: &[Annotation]) -> Option<&A> {
    if let Some(found) = annotations.iter().find_map(A::extract) {
        return Some(found);
    }
    annotations.iter().find_map(|annotation| match annotation {
        Annotation::Composed(composed) => find_in::<A>(&composed.meta),
        _ => None,
    })
}
