//! Aggregate expressions, evaluated once per group bucket.

use std::collections::HashSet;

use serde_json::Value;

use rowset_model::{canonical_text, Result};

use crate::expr::{Eval, Ident, Project};
use crate::selected::{SelectedRecord, SelectedTable};

/// `COUNT(*)`: the number of rows in the group.
#[derive(Clone, Copy, Debug, Default)]
pub struct CountAll;

impl Eval for CountAll {
    fn eval(&self, record: &SelectedRecord) -> Result<Value> {
        Ok(Value::from(record.grouped.len() as u64))
    }
}

impl Project for CountAll {
    fn project(&self, table: &SelectedTable) -> Result<(String, Vec<Value>)> {
        let values = table
            .grouped()
            .iter()
            .map(|bucket| Value::from(bucket.len() as u64))
            .collect();
        Ok(("count".to_string(), values))
    }
}

/// `COUNT(column)`: the number of rows in the group that project the column.
///
/// Every row projects every resolvable column (nulls included), so this
/// equals the bucket size; it exists for the identifier-resolution failure
/// mode, not for null filtering.
#[derive(Clone, Debug)]
pub struct Count {
    column: String,
}

impl Count {
    pub fn new(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
        }
    }
}

impl Eval for Count {
    fn eval(&self, record: &SelectedRecord) -> Result<Value> {
        let context = SelectedTable::from_source(record.grouped.clone());
        let (_, values) = Ident::new(self.column.as_str()).project(&context)?;
        Ok(Value::from(values.len() as u64))
    }
}

impl Project for Count {
    fn project(&self, table: &SelectedTable) -> Result<(String, Vec<Value>)> {
        let mut values = Vec::with_capacity(table.grouped().len());
        for bucket in table.grouped() {
            let context = SelectedTable::from_source(bucket.clone());
            let (_, projected) = Ident::new(self.column.as_str()).project(&context)?;
            values.push(Value::from(projected.len() as u64));
        }
        Ok(("count".to_string(), values))
    }
}

/// `ARRAY_AGG(expr)`: collect the expression over the group.
///
/// An empty group yields null, not an empty array. With `distinct`,
/// duplicates (by canonical form) are dropped, keeping first occurrences.
pub struct ArrayAgg {
    expr: Box<dyn Project>,
    distinct: bool,
}

impl ArrayAgg {
    pub fn new(expr: impl Project + 'static) -> Self {
        Self {
            expr: Box::new(expr),
            distinct: false,
        }
    }

    pub fn distinct(mut self) -> Self {
        self.distinct = true;
        self
    }
}

impl Eval for ArrayAgg {
    fn eval(&self, record: &SelectedRecord) -> Result<Value> {
        let context = SelectedTable::from_source(record.grouped.clone());
        let (_, values) = self.expr.project(&context)?;
        if values.is_empty() {
            return Ok(Value::Null);
        }

        if self.distinct {
            let mut seen = HashSet::with_capacity(values.len());
            let unique = values
                .into_iter()
                .filter(|value| seen.insert(canonical_text(value)))
                .collect();
            return Ok(Value::Array(unique));
        }
        Ok(Value::Array(values))
    }
}

impl Project for ArrayAgg {
    fn project(&self, table: &SelectedTable) -> Result<(String, Vec<Value>)> {
        let mut values = Vec::with_capacity(table.grouped().len());
        for bucket in table.grouped() {
            let context = SelectedRecord {
                grouped: bucket.clone(),
                ..SelectedRecord::default()
            };
            values.push(self.eval(&context)?);
        }
        Ok(("array_agg".to_string(), values))
    }
}
