//! Process-wide cache of compiled columns, keyed by record type
//!
//! Entries are derived from static metadata only, so concurrent callers may
//! compile the same type at the same time: the first insert wins and the other
//! result is dropped.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::Arc;

use once_cell::sync::Lazy;
use parking_lot::RwLock;
use tracing::debug;

use crate::error::FieldAccessError;
use crate::order::plan;
use crate::resolve::resolve;
use crate::schema::{CsvRecord, FieldDescriptor, TypeSchema};
use crate::transform::transform;

/// Output columns of a record type: resolved, without ignored fields, in planned order
pub struct Columns<T> {
    type_name: &'static str,
    fields: Vec<FieldDescriptor<T>>,
}

impl<T> Columns<T> {
    /// Compile the columns of `schema`
    pub fn compile(schema: &TypeSchema<T>) -> Self {
        let visible = resolve(schema)
            .into_iter()
            .filter(|f| !f.meta().ignored)
            .collect();
        Self {
            type_name: schema.type_name(),
            fields: plan(visible),
        }
    }

    /// Name of the record type
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Columns in output order
    pub fn fields(&self) -> &[FieldDescriptor<T>] {
        &self.fields
    }

    /// Number of columns
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether there are no columns at all
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Header cells (display name or field name)
    pub fn header_cells(&self) -> Vec<String> {
        self.fields
            .iter()
            .map(|f| f.column_name().to_string())
            .collect()
    }

    /// Row cells of `record`
    ///
    /// Fails on the first unreadable field.
    pub fn row_cells(&self, record: &T) -> Result<Vec<String>, FieldAccessError> {
        self.fields
            .iter()
            .map(|f| Ok(transform(f.meta(), f.read(record)?)))
            .collect()
    }
}

impl<T> Debug for Columns<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Columns")
            .field("type_name", &self.type_name)
            .field(
                "columns",
                &self.fields.iter().map(|c| c.column_name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

static COLUMN_CACHE: Lazy<RwLock<HashMap<TypeId, Arc<dyn Any + Send + Sync>>>> =
    Lazy::new(|| RwLock::new(HashMap::new()));

/// Compiled columns of `T`, cached for the lifetime of the process
pub fn columns<T: CsvRecord>() -> Arc<Columns<T>> {
    let key = TypeId::of::<T>();
    if let Some(hit) = COLUMN_CACHE.read().get(&key).cloned() {
        if let Ok(columns) = hit.downcast::<Columns<T>>() {
            return columns;
        }
    }

    let compiled = Arc::new(Columns::compile(&T::schema()));
    debug!(
        record_type = compiled.type_name(),
        columns = compiled.len(),
        "compiled CSV columns"
    );
    let entry = COLUMN_CACHE
        .write()
        .entry(key)
        .or_insert_with(|| Arc::clone(&compiled) as Arc<dyn Any + Send + Sync>)
        .clone();
    entry.downcast::<Columns<T>>().unwrap_or(compiled)
}

/// Number of record types currently cached
pub fn cached_type_count() -> usize {
    COLUMN_CACHE.read().len()
}

/// Drop all cached columns; they are recompiled on next use
pub fn clear_column_cache() {
    COLUMN_CACHE.write().clear();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{FieldMeta, InheritancePolicy};

    struct Audit {
        created_by: String,
    }

    impl CsvRecord for Audit {
        fn schema() -> TypeSchema<Self> {
            TypeSchema::builder("Audit")
                .field("created_by", FieldMeta::new().order(0), |a: &Self| {
                    &a.created_by
                })
                .build()
        }
    }

    struct Invoice {
        number: u32,
        customer: String,
        internal_note: String,
        card: Option<String>,
        audit: Audit,
    }

    impl CsvRecord for Invoice {
        fn schema() -> TypeSchema<Self> {
            TypeSchema::builder("Invoice")
                .policy(InheritancePolicy::IncludeParent)
                .field("number", FieldMeta::new(), |i: &Self| &i.number)
                .field(
                    "customer",
                    FieldMeta::new().display_name("Customer Name"),
                    |i: &Self| &i.customer,
                )
                .field(
                    "internal_note",
                    FieldMeta::new().ignored().order(0).display_name("Note").mask("x"),
                    |i: &Self| &i.internal_note,
                )
                .field("card", FieldMeta::new().mask("****"), |i: &Self| &i.card)
                .parent(|i: &Self| &i.audit)
                .build()
        }
    }

    fn invoice() -> Invoice {
        Invoice {
            number: 17,
            customer: "ACME".into(),
            internal_note: "do not show".into(),
            card: None,
            audit: Audit {
                created_by: "alice".into(),
            },
        }
    }

    #[test]
    fn test_compile_drops_ignored_and_plans_order() {
        let cols = Columns::compile(&Invoice::schema());
        assert_eq!(
            cols.header_cells(),
            vec!["created_by", "number", "Customer Name", "card"]
        );
    }

    #[test]
    fn test_row_cells_apply_transform() {
        let cols = Columns::compile(&Invoice::schema());
        let row = cols.row_cells(&invoice()).unwrap();
        assert_eq!(row, vec!["alice", "17", "ACME", "****"]);
        assert_eq!(row.len(), cols.len());
    }

    #[test]
    fn test_cached_columns_are_shared() {
        let first = columns::<Invoice>();
        let second = columns::<Invoice>();
        assert!(Arc::ptr_eq(&first, &second));
        assert!(cached_type_count() >= 1);

        clear_column_cache();
        let recompiled = columns::<Invoice>();
        assert!(!Arc::ptr_eq(&first, &recompiled));
        assert_eq!(first.header_cells(), recompiled.header_cells());
        assert!(Arc::ptr_eq(&recompiled, &columns::<Invoice>()));
    }

    #[test]
    fn test_concurrent_population_is_consistent() {
        let handles: Vec<_> = (0..8)
            .map(|_| std::thread::spawn(|| columns::<Audit>().header_cells()))
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), vec!["created_by"]);
        }
    }
}
