//! Sort keys with configurable null placement.

use std::cmp::Ordering;

use serde_json::Value;

use rowset_model::{compare, Result};

use crate::expr::{Eval, SortKey};
use crate::selected::SelectedRecord;

fn place_nulls(i: &Value, j: &Value, nulls_last: bool) -> Option<Ordering> {
    match (i.is_null(), j.is_null()) {
        (true, true) => Some(Ordering::Equal),
        (true, false) => Some(if nulls_last {
            Ordering::Greater
        } else {
            Ordering::Less
        }),
        (false, true) => Some(if nulls_last {
            Ordering::Less
        } else {
            Ordering::Greater
        }),
        (false, false) => None,
    }
}

/// Ascending sort key. Nulls sort first unless `nulls_last`; equal values
/// defer to the next key; mixed kinds are a type mismatch.
pub struct Asc {
    expr: Box<dyn Eval>,
    nulls_last: bool,
}

impl Asc {
    pub fn new(expr: impl Eval + 'static) -> Self {
        Self {
            expr: Box::new(expr),
            nulls_last: false,
        }
    }

    pub fn nulls_last(mut self) -> Self {
        self.nulls_last = true;
        self
    }
}

impl SortKey for Asc {
    fn compare(&self, i: &SelectedRecord, j: &SelectedRecord) -> Result<Ordering> {
        let vi = self.expr.eval(i)?;
        let vj = self.expr.eval(j)?;

        if let Some(order) = place_nulls(&vi, &vj, self.nulls_last) {
            return Ok(order);
        }
        compare(&vi, &vj)
    }
}

/// Descending sort key: [`Asc`] with the non-null comparison reversed. Null
/// placement is unaffected by the direction.
pub struct Desc {
    expr: Box<dyn Eval>,
    nulls_last: bool,
}

impl Desc {
    pub fn new(expr: impl Eval + 'static) -> Self {
        Self {
            expr: Box::new(expr),
            nulls_last: false,
        }
    }

    pub fn nulls_last(mut self) -> Self {
        self.nulls_last = true;
        self
    }
}

impl SortKey for Desc {
    fn compare(&self, i: &SelectedRecord, j: &SelectedRecord) -> Result<Ordering> {
        let vi = self.expr.eval(i)?;
        let vj = self.expr.eval(j)?;

        if let Some(order) = place_nulls(&vi, &vj, self.nulls_last) {
            return Ok(order);
        }
        Ok(compare(&vi, &vj)?.reverse())
    }
}
