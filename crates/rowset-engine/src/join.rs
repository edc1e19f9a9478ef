//! Join clauses.

use serde_json::Value;

use rowset_model::Record;

use crate::expr::Predicate;
use crate::grouped::GroupedRecord;
use crate::table::{padded, Table};

/// One step of a [`Table::join`] chain: consumes the running left table and
/// returns the extended one.
pub trait Join {
    fn join(&self, left: Table) -> Table;
}

/// SQL-style left outer join against a fixed right side.
///
/// The right side is any table-like value, including a finished selection,
/// so sub-queries compose directly.
pub struct LeftJoin {
    right: Table,
    on: Box<dyn Predicate>,
}

impl LeftJoin {
    pub fn new(right: impl Into<Table>, on: impl Predicate + 'static) -> Self {
        Self {
            right: right.into(),
            on: Box::new(on),
        }
    }
}

impl Join for LeftJoin {
    /// Nested-loop application, left-major: every matching concatenation is
    /// emitted in right order; a left row with no match is emitted once,
    /// padded with nulls for the right columns. A right side with no columns
    /// passes the left through untouched.
    fn join(&self, left: Table) -> Table {
        if let Some(err) = left.err() {
            return Table::failed(err.clone());
        }
        if let Some(err) = self.right.err() {
            return Table::failed(err.clone());
        }
        if self.right.columns().is_empty() {
            return left;
        }

        let left_width = left.columns().len();
        let right_width = self.right.columns().len();

        let mut columns = left.columns().to_vec();
        columns.extend(self.right.columns().iter().cloned());
        let width = columns.len();

        let mut data = Vec::with_capacity(left.len());
        for left_row in left.rows() {
            let mut matched = false;
            for right_row in self.right.rows() {
                let mut candidate = padded(left_row, left_width);
                candidate.extend(padded(right_row, right_width));

                let context = GroupedRecord {
                    source: Record::new(columns.clone(), candidate.clone()),
                    grouped: Table::default(),
                };
                match self.on.test(&context) {
                    Ok(true) => {
                        matched = true;
                        data.push(candidate);
                    }
                    Ok(false) => {}
                    Err(err) => return Table::failed(err),
                }
            }

            if !matched {
                let mut row = padded(left_row, left_width);
                row.resize(width, Value::Null);
                data.push(row);
            }
        }

        Table::new(columns, data)
    }
}
