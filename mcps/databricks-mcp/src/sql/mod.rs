//! SQL text construction
//!
//! - [`Namespace`] resolves table references to `catalog.schema.table`
//! - [`SqlValue`] / [`RowData`] render caller values as SQL literals
//! - [`statement`] validates tool arguments and assembles one statement each
//!
//! Literal values are escaped by doubling single quotes. Identifiers and
//! caller-supplied WHERE clauses are interpolated as given; nothing here
//! protects against injection through those.

pub mod ident;
pub mod literal;
pub mod statement;

pub use ident::{Namespace, TableTarget, DEFAULT_SCHEMA};
pub use literal::{RowData, SqlValue};
