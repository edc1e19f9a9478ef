//! Expression built-ins and the capability traits they implement.
//!
//! An expression type opts into one or more evaluation contracts:
//!
//! | Trait | Contract |
//! |---|---|
//! | [`Eval`] | one value, in the context of a single row |
//! | [`Project`] | a column name plus one value per output row |
//! | [`Predicate`] | a row/group predicate |
//! | [`SortKey`] | a pairwise comparator for `order_by` |
//!
//! (Grouping specs are the fifth capability; see
//! [`Grouping`](crate::Grouping).) All built-ins hold boxed trait objects,
//! so user code can extend any capability with its own types and mix them
//! into the same pipeline.

use std::cmp::Ordering;

use serde_json::Value;

use rowset_model::Result;

use crate::grouped::GroupedRecord;
use crate::selected::{SelectedRecord, SelectedTable};

mod aggregate;
mod order;
mod predicate;
mod scalar;

pub use aggregate::{ArrayAgg, Count, CountAll};
pub use order::{Asc, Desc};
pub use predicate::{And, Equals, Greater, Less, Or};
pub use scalar::{As, Concat, Ident, Literal};

/// Evaluate to a single value in the context of one row.
pub trait Eval {
    fn eval(&self, record: &SelectedRecord) -> Result<Value>;
}

/// Evaluate column-wise over a stage: a column name plus one value per
/// output row (per source row before aggregation, per group after).
pub trait Project {
    fn project(&self, table: &SelectedTable) -> Result<(String, Vec<Value>)>;
}

/// A row/group predicate.
pub trait Predicate {
    fn test(&self, record: &GroupedRecord) -> Result<bool>;
}

/// A pairwise comparator consulted by `order_by`.
///
/// `Less`/`Equal`/`Greater` order the two rows; `Equal` passes the decision
/// to the next sort key.
pub trait SortKey {
    fn compare(&self, i: &SelectedRecord, j: &SelectedRecord) -> Result<Ordering>;
}
