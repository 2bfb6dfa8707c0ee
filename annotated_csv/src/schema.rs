//! Static per-type field metadata
//!
//! A [`TypeSchema`] is the metadata table of one record type: its own declared
//! fields (each a [`FieldDescriptor`]), its [`InheritancePolicy`] and, optionally,
//! the schema of its parent type.
//!
//! Rust has no struct inheritance, so a "parent" is a struct embedded in the record
//! (marked with `#[csv(parent)]` when deriving [`CsvRecord`](macro@crate::CsvRecord)).
//! The parent schema is lifted into the record type by composing its accessors
//! with the projection `&Child -> &Parent`.

use std::any::TypeId;
use std::fmt::Debug;
use std::sync::Arc;

use crate::cell::ToCell;
use crate::error::FieldAccessError;

/// Reads the (textual) value of one field from a record
///
/// `Ok(None)` is the null value.
pub type Accessor<T> =
    Arc<dyn Fn(&T) -> Result<Option<String>, FieldAccessError> + Send + Sync>;

/// Optional per-field output controls
///
/// The default value means: include the field, at its natural position,
/// named after the field, with its raw value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldMeta {
    /// Exclude the field from header and rows
    pub ignored: bool,
    /// Explicit zero-based output position
    pub order: Option<u32>,
    /// Header name used instead of the field name
    pub display_name: Option<String>,
    /// Literal value written instead of the real value
    pub mask: Option<String>,
}

impl FieldMeta {
    /// Metadata with all controls absent
    pub fn new() -> Self {
        Self::default()
    }

    /// Exclude the field from output
    pub fn ignored(mut self) -> Self {
        self.ignored = true;
        self
    }

    /// Place the field at the zero-based output position `order`
    pub fn order(mut self, order: u32) -> Self {
        self.order = Some(order);
        self
    }

    /// Use `name` as header cell
    pub fn display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    /// Always write `mask` instead of the field value
    pub fn mask(mut self, mask: impl Into<String>) -> Self {
        self.mask = Some(mask.into());
        self
    }
}

/// Identity of a declared field: declaring type and field name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FieldId {
    /// Type that declares the field
    pub declaring_type: TypeId,
    /// Field name
    pub name: &'static str,
}

/// One serializable field of record type `T`
///
/// For fields contributed by a parent type, `T` is the record type the parent
/// was lifted into, while [`FieldDescriptor::id`] still names the parent as
/// declaring type.
pub struct FieldDescriptor<T> {
    id: FieldId,
    declaring_type_name: &'static str,
    meta: FieldMeta,
    accessor: Accessor<T>,
}

impl<T> FieldDescriptor<T> {
    /// Identity of this field
    pub fn id(&self) -> FieldId {
        self.id
    }

    /// Field name as declared
    pub fn name(&self) -> &'static str {
        self.id.name
    }

    /// Name of the declaring type
    pub fn declaring_type_name(&self) -> &'static str {
        self.declaring_type_name
    }

    /// Output controls of this field
    pub fn meta(&self) -> &FieldMeta {
        &self.meta
    }

    /// Header cell: the display name if set, otherwise the field name
    pub fn column_name(&self) -> &str {
        self.meta.display_name.as_deref().unwrap_or(self.id.name)
    }

    /// Read the raw value of this field from `record`
    pub fn read(&self, record: &T) -> Result<Option<String>, FieldAccessError> {
        (self.accessor)(record)
    }

    fn lift<U: 'static>(self, projection: Arc<dyn Fn(&U) -> &T + Send + Sync>) -> FieldDescriptor<U>
    where
        T: 'static,
    {
        let inner = self.accessor;
        FieldDescriptor {
            id: self.id,
            declaring_type_name: self.declaring_type_name,
            meta: self.meta,
            accessor: Arc::new(move |record: &U| inner(projection(record))),
        }
    }
}

impl<T> Clone for FieldDescriptor<T> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            declaring_type_name: self.declaring_type_name,
            meta: self.meta.clone(),
            accessor: Arc::clone(&self.accessor),
        }
    }
}

impl<T> Debug for FieldDescriptor<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldDescriptor")
            .field("declaring_type", &self.declaring_type_name)
            .field("name", &self.id.name)
            .field("meta", &self.meta)
            .finish_non_exhaustive()
    }
}

/// Whether (and how) parent fields are folded into a record's output
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum InheritancePolicy {
    /// Only the type's own declared fields
    #[default]
    OwnFields,
    /// Include the parent's fields, resolved with the parent's own policy
    IncludeParent,
    /// Include the own declared fields of every ancestor, regardless of their policies
    IncludeAncestors,
}

/// Static field metadata of record type `T`
pub struct TypeSchema<T> {
    type_id: TypeId,
    type_name: &'static str,
    policy: InheritancePolicy,
    fields: Vec<FieldDescriptor<T>>,
    parent: Option<Box<TypeSchema<T>>>,
}

impl<T: 'static> TypeSchema<T> {
    /// Start building the schema of `T`, named `type_name` in messages
    pub fn builder(type_name: &'static str) -> TypeSchemaBuilder<T> {
        TypeSchemaBuilder {
            schema: TypeSchema {
                type_id: TypeId::of::<T>(),
                type_name,
                policy: InheritancePolicy::default(),
                fields: Vec::new(),
                parent: None,
            },
        }
    }

    fn lift<U: 'static>(self, projection: Arc<dyn Fn(&U) -> &T + Send + Sync>) -> TypeSchema<U> {
        TypeSchema {
            type_id: self.type_id,
            type_name: self.type_name,
            policy: self.policy,
            fields: self
                .fields
                .into_iter()
                .map(|f| f.lift(Arc::clone(&projection)))
                .collect(),
            parent: self.parent.map(|p| Box::new((*p).lift(projection))),
        }
    }
}

impl<T> TypeSchema<T> {
    /// Identity of the type this schema was declared for
    ///
    /// For a lifted parent schema this is the parent type.
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Name of the declaring type
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Inheritance policy of the declaring type
    pub fn policy(&self) -> InheritancePolicy {
        self.policy
    }

    /// Fields declared directly on this type, in declaration order
    pub fn own_fields(&self) -> &[FieldDescriptor<T>] {
        &self.fields
    }

    /// Schema of the parent type, if one is declared
    pub fn parent(&self) -> Option<&TypeSchema<T>> {
        self.parent.as_deref()
    }
}

impl<T> Debug for TypeSchema<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypeSchema")
            .field("type_name", &self.type_name)
            .field("policy", &self.policy)
            .field("fields", &self.fields)
            .field("parent", &self.parent)
            .finish()
    }
}

/// Builder for [`TypeSchema`]
///
/// This is what `#[derive(CsvRecord)]` expands to, and can be used directly
/// for types that cannot carry the derive.
///
/// ```
/// use annotated_csv::{CsvRecord, FieldMeta, TypeSchema};
///
/// struct Account {
///     id: u64,
///     token: String,
/// }
///
/// impl CsvRecord for Account {
///     fn schema() -> TypeSchema<Self> {
///         TypeSchema::builder("Account")
///             .field("id", FieldMeta::new(), |a: &Self| &a.id)
///             .field("token", FieldMeta::new().mask("***"), |a: &Self| &a.token)
///             .build()
///     }
/// }
///
/// let csv = annotated_csv::write(&[Account { id: 7, token: "secret".into() }], true).unwrap();
/// assert_eq!(csv, "\"id\",\"token\"\n\"7\",\"***\"\n");
/// ```
pub struct TypeSchemaBuilder<T> {
    schema: TypeSchema<T>,
}

impl<T: 'static> TypeSchemaBuilder<T> {
    /// Set the inheritance policy
    pub fn policy(mut self, policy: InheritancePolicy) -> Self {
        self.schema.policy = policy;
        self
    }

    /// Declare a field read through `get`
    pub fn field<V, F>(self, name: &'static str, meta: FieldMeta, get: F) -> Self
    where
        V: ToCell + ?Sized,
        F: Fn(&T) -> &V + Send + Sync + 'static,
    {
        self.push(
            name,
            meta,
            Arc::new(move |record: &T| -> Result<Option<String>, FieldAccessError> {
                Ok(get(record).to_cell())
            }),
        )
    }

    /// Declare a field whose value may be unreadable
    ///
    /// An `Err(reason)` from `get` aborts any write that reaches this field.
    pub fn try_field<F>(self, name: &'static str, meta: FieldMeta, get: F) -> Self
    where
        F: Fn(&T) -> Result<Option<String>, String> + Send + Sync + 'static,
    {
        let type_name = self.schema.type_name;
        self.push(
            name,
            meta,
            Arc::new(move |record: &T| {
                get(record).map_err(|reason| FieldAccessError::new(type_name, name, reason))
            }),
        )
    }

    /// Declare `P` as the parent type, embedded in `T` and reached through `get`
    pub fn parent<P, F>(mut self, get: F) -> Self
    where
        P: CsvRecord,
        F: Fn(&T) -> &P + Send + Sync + 'static,
    {
        self.schema.parent = Some(Box::new(P::schema().lift::<T>(Arc::new(get))));
        self
    }

    /// Finish the schema
    pub fn build(self) -> TypeSchema<T> {
        self.schema
    }

    fn push(mut self, name: &'static str, meta: FieldMeta, accessor: Accessor<T>) -> Self {
        self.schema.fields.push(FieldDescriptor {
            id: FieldId {
                declaring_type: self.schema.type_id,
                name,
            },
            declaring_type_name: self.schema.type_name,
            meta,
            accessor,
        });
        self
    }
}

impl<T> Debug for TypeSchemaBuilder<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypeSchemaBuilder")
            .field("schema", &self.schema)
            .finish()
    }
}

/// A record type with a static CSV schema
///
/// Usually derived with `#[derive(CsvRecord)]`.
pub trait CsvRecord: Sized + 'static {
    /// Metadata table of this type
    fn schema() -> TypeSchema<Self>;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Base {
        created: String,
    }

    impl CsvRecord for Base {
        fn schema() -> TypeSchema<Self> {
            TypeSchema::builder("Base")
                .field("created", FieldMeta::new(), |b: &Self| &b.created)
                .build()
        }
    }

    struct Item {
        id: u32,
        note: Option<String>,
        base: Base,
    }

    impl CsvRecord for Item {
        fn schema() -> TypeSchema<Self> {
            TypeSchema::builder("Item")
                .policy(InheritancePolicy::IncludeParent)
                .field("id", FieldMeta::new().order(1), |i: &Self| &i.id)
                .field("note", FieldMeta::new().display_name("Note"), |i: &Self| {
                    &i.note
                })
                .parent(|i: &Self| &i.base)
                .build()
        }
    }

    fn item() -> Item {
        Item {
            id: 3,
            note: None,
            base: Base {
                created: "2024-01-01".into(),
            },
        }
    }

    #[test]
    fn test_builder_records_declaration_order_and_meta() {
        let schema = Item::schema();
        assert_eq!(schema.type_name(), "Item");
        assert_eq!(schema.policy(), InheritancePolicy::IncludeParent);
        let names: Vec<_> = schema.own_fields().iter().map(|f| f.name()).collect();
        assert_eq!(names, vec!["id", "note"]);
        assert_eq!(schema.own_fields()[0].meta().order, Some(1));
        assert_eq!(schema.own_fields()[1].column_name(), "Note");
        assert_eq!(schema.own_fields()[0].column_name(), "id");
    }

    #[test]
    fn test_accessors_read_values() {
        let schema = Item::schema();
        let record = item();
        assert_eq!(schema.own_fields()[0].read(&record), Ok(Some("3".into())));
        assert_eq!(schema.own_fields()[1].read(&record), Ok(None));
    }

    #[test]
    fn test_lifted_parent_keeps_declaring_identity() {
        let schema = Item::schema();
        let parent = schema.parent().unwrap();
        assert_eq!(parent.type_name(), "Base");
        assert_eq!(parent.type_id(), TypeId::of::<Base>());
        let created = &parent.own_fields()[0];
        assert_eq!(created.id().declaring_type, TypeId::of::<Base>());
        assert_eq!(created.declaring_type_name(), "Base");
        assert_eq!(created.read(&item()), Ok(Some("2024-01-01".into())));
    }

    #[test]
    fn test_try_field_wraps_reason() {
        let schema = TypeSchema::<Item>::builder("Item")
            .try_field("secret", FieldMeta::new(), |_| Err("access denied".into()))
            .build();
        let err = schema.own_fields()[0].read(&item()).unwrap_err();
        assert_eq!(err, FieldAccessError::new("Item", "secret", "access denied"));
    }
}
