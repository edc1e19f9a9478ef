#![forbid(unsafe_code)]

//! In-memory relational query pipeline over semi-structured rows.
//!
//! A query is a chain of value-semantic stages. Ingestion ([`from`])
//! produces a [`Table`]; joins, filters and mutations keep it a table;
//! [`Table::group_by`] produces a [`GroupedTable`]; projecting with
//! [`GroupedTable::select`] produces a [`SelectedTable`], which supports
//! `distinct`, ordering and pagination. Terminal operations (`scan`,
//! `scan_column`, `first`) surface the result, or the first error raised
//! anywhere along the chain: errors stick to the stage that raised them and
//! short-circuit everything downstream.
//!
//! Expressions are small capability types (see [`expr`]): a value can act as
//! a per-row expression, a column projection, a predicate and/or a sort key,
//! and user code can extend any of those capabilities with its own types.

mod grouped;
mod grouping;
mod join;
mod selected;
mod table;

pub mod expr;

pub use grouped::{GroupedRecord, GroupedTable};
pub use grouping::{Cube, Grouping, GroupingSets};
pub use join::{Join, LeftJoin};
pub use selected::{SelectedRecord, SelectedTable};
pub use table::Table;

pub use rowset_model::{canonical_text, Kind, QueryError, Record, Value};

use serde::Serialize;

/// Ingest any serializable sequence of records as a [`Table`].
///
/// Column order is the union of keys in first-seen order; keys missing from
/// a record read as null. Ingestion snapshots the host structure, so
/// mutating it afterwards does not affect the pipeline.
pub fn from<T: Serialize>(rows: &T) -> Table {
    Table::from_rows(rows)
}
