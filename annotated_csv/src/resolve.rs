use itertools::Itertools;

use crate::schema::{FieldDescriptor, InheritancePolicy, TypeSchema};

/// Resolve the fields of a record type, including inherited ones
///
/// - The type's own fields come first, in declaration order.
/// - [`InheritancePolicy::IncludeAncestors`]: the own fields of every ancestor
///   follow, nearest first. The ancestors' policies are not consulted.
/// - [`InheritancePolicy::IncludeParent`]: the parent is resolved the same way
///   (with its own policy) and appended.
/// - [`InheritancePolicy::OwnFields`]: nothing else.
///
/// Ignored fields are part of the result; they are dropped when columns are compiled.
pub fn resolve<T>(schema: &TypeSchema<T>) -> Vec<FieldDescriptor<T>> {
    let mut fields = schema.own_fields().to_vec();
    match schema.policy() {
        InheritancePolicy::IncludeAncestors => {
            let mut ancestor = schema.parent();
            while let Some(a) = ancestor {
                fields.extend_from_slice(a.own_fields());
                ancestor = a.parent();
            }
        }
        InheritancePolicy::IncludeParent => {
            if let Some(parent) = schema.parent() {
                fields.extend(resolve(parent));
            }
        }
        InheritancePolicy::OwnFields => {}
    }
    fields.into_iter().unique_by(FieldDescriptor::id).collect()
}
