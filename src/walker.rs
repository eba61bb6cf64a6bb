//! Annotation lookup across the inheritance chain and property accessors.

use crate::entity::annotation::{find_in, AnnotationKind};
use crate::entity::{EntityType, PropertyDescriptor};

/// Find annotation `A` for `property` of `entity`.
///
/// Candidate sites are searched in order:
///
/// 1. the field named like the property on the nearest type in the hierarchy
///    that declares one (`entity` first, then its superclasses);
/// 2. the property's read accessor;
/// 3. the property's write accessor.
///
/// A field that exists but lacks the annotation does not continue the walk
/// upwards; the accessors are searched next. Meta-annotations are searched at
/// every site.
pub fn find_annotation<'a, A: AnnotationKind>(
    entity: &'a EntityType,
    property: &'a PropertyDescriptor,
) -> Option<&'a A> {
    let declared = entity
        .hierarchy()
        .find_map(|owner| owner.declared_field(&property.name).map(|field| (owner, field)));

    if let Some((owner, field)) = declared {
        if let Some(found) = find_in::<A>(&field.annotations) {
            log::trace!(
                "{}.{}: annotation found on field declared by {}",
                entity.name(),
                property.name,
                owner.name()
            );
            return Some(found);
        }
    }

    property
        .read
        .iter()
        .chain(property.write.iter())
        .find_map(|accessor| find_in::<A>(&accessor.annotations))
}

/// Find class-level annotation `A` on `entity` or the nearest supertype
/// carrying it.
pub fn find_type_annotation<A: AnnotationKind>(entity: &EntityType) -> Option<&A> {
    entity
        .hierarchy()
        .find_map(|owner| find_in::<A>(owner.annotations()))
}
