#![warn(
    clippy::doc_markdown,
    missing_debug_implementations,
    rust_2018_idioms,
    missing_docs
)]
#![doc = include_str!("../README.md")]

// Lets `#[derive(CsvRecord)]` expand to `::annotated_csv::...` inside this crate as well
extern crate self as annotated_csv;

/// Field metadata, type schemas and the [`CsvRecord`] trait
pub mod schema;
/// Textual cell values ([`ToCell`])
pub mod cell;
/// Field Schema Resolver: own and inherited fields of a record type
pub mod resolve;
/// Field Order Planner: explicit output positions
pub mod order;
/// Value Transformer: masking and null handling
pub mod transform;
/// Compiled and cached columns per record type
pub mod cache;
/// Row Assembler: header, rows and write options
pub mod writer;
/// Text encoding with substitution of unmappable characters
pub mod encoding;
/// [`CsvText`] payload
pub mod entity;
/// File output
pub mod io;
/// Error types
pub mod error;

#[doc(inline)]
pub use cache::{columns, Columns};
#[doc(inline)]
pub use cell::ToCell;
#[doc(inline)]
pub use encoding::{decode, encode, TextEncoding};
#[doc(inline)]
pub use entity::CsvText;
#[doc(inline)]
pub use error::{CsvWriteError, FieldAccessError};
#[doc(inline)]
pub use io::output_to_file;
#[doc(inline)]
pub use order::plan;
#[doc(inline)]
pub use resolve::resolve;
#[doc(inline)]
pub use schema::{
    CsvRecord, FieldDescriptor, FieldId, FieldMeta, InheritancePolicy, TypeSchema,
    TypeSchemaBuilder,
};
#[doc(inline)]
pub use transform::transform;
#[doc(inline)]
pub use writer::{
    write, write_bytes, write_header, write_record, write_rows, write_rows_with_options,
    write_with_encoding, write_with_options, CsvRow, CsvWriteOptions, LineSeparator,
};

/// Derive [`CsvRecord`](trait@CsvRecord) from `#[csv(...)]` attributes
///
/// Field attributes:
/// - `#[csv(ignore)]`: never written
/// - `#[csv(order = n)]`: zero-based output position
/// - `#[csv(column_name = "...")]`: header cell instead of the field name
/// - `#[csv(mask = "...")]`: literal written instead of the value
/// - `#[csv(parent)]`: the embedded parent record (at most one)
///
/// Type attributes:
/// - `#[csv(include_parent)]`: append the parent's fields, resolved with the parent's own policy
/// - `#[csv(include_ancestors)]`: append the own fields of every ancestor
pub use macros_annotated_csv::CsvRecord;
