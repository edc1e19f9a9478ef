//! The grouped stage: group-key rows paired with their bucket sub-tables.

use std::collections::HashMap;

use serde_json::Value;

use rowset_model::{canonical_row, QueryError, Record};

use crate::expr::{Eval, Ident, Predicate, Project};
use crate::selected::{SelectedRecord, SelectedTable};
use crate::table::Table;

/// Evaluation context for a predicate: one row (or one group-key row) plus
/// the bucket it stands for. Ungrouped contexts carry an empty bucket.
#[derive(Clone, Debug, Default)]
pub struct GroupedRecord {
    pub source: Record,
    pub grouped: Table,
}

/// A table whose rows are group keys, each paired with the sub-table of
/// rows belonging to that group (`grouped[i]` for key row `i`).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GroupedTable {
    pub(crate) err: Option<QueryError>,
    pub(crate) source: Table,
    pub(crate) grouped: Vec<Table>,
}

impl GroupedTable {
    pub(crate) fn failed(err: QueryError) -> Self {
        Self {
            err: Some(err),
            source: Table::default(),
            grouped: Vec::new(),
        }
    }

    pub fn err(&self) -> Option<&QueryError> {
        self.err.as_ref()
    }

    /// The group-key table.
    pub fn source(&self) -> &Table {
        &self.source
    }

    /// The bucket sub-tables, one per group-key row.
    pub fn grouped(&self) -> &[Table] {
        &self.grouped
    }

    /// Append `other`'s group rows and buckets, widening the key columns to
    /// the union of both sides. Grouping-set expansion unions the per-set
    /// groupings through this.
    pub fn union_all(mut self, other: GroupedTable) -> Self {
        if self.err.is_some() {
            return self;
        }
        if let Some(err) = other.err {
            return Self::failed(err);
        }

        // Buckets must stay aligned with key rows before new rows land.
        let height = self.source.len();
        if self.grouped.len() < height {
            self.grouped.resize_with(height, Table::default);
        }

        self.source = self.source.union_all(other.source);
        if let Some(err) = self.source.err() {
            return Self::failed(err.clone());
        }
        self.grouped.extend(other.grouped);
        self
    }

    /// Keep the groups satisfying `condition`, which sees the group-key row
    /// as `source` and the bucket as `grouped`.
    pub fn having(mut self, condition: &dyn Predicate) -> Self {
        if self.err.is_some() {
            return self;
        }

        let columns = self.source.columns().to_vec();
        let mut kept_rows = Vec::with_capacity(self.source.len());
        let mut kept_buckets = Vec::with_capacity(self.grouped.len());

        for (index, row) in self.source.rows().iter().enumerate() {
            let bucket = self.grouped.get(index).cloned().unwrap_or_default();
            let context = GroupedRecord {
                source: Record::new(columns.clone(), row.clone()),
                grouped: bucket.clone(),
            };
            match condition.test(&context) {
                Ok(true) => {
                    kept_rows.push(row.clone());
                    kept_buckets.push(bucket);
                }
                Ok(false) => {}
                Err(err) => return Self::failed(err),
            }
        }

        self.source = Table::new(columns, kept_rows);
        self.grouped = kept_buckets;
        self
    }

    /// Project one column per spec.
    ///
    /// With no specs the projection is the source itself. Otherwise each
    /// spec yields a column name and one value per output row; per-row
    /// expressions produce one value per source row, aggregates one per
    /// group. An ungrouped stage is treated as a single group spanning all
    /// rows, which is what makes aggregation over a plain table work. The
    /// output height is the tallest projected column; shorter columns pad
    /// with null.
    pub fn select(mut self, specs: &[&dyn Project]) -> SelectedTable {
        if let Some(err) = self.err.take() {
            return SelectedTable::failed(err);
        }

        if specs.is_empty() {
            return SelectedTable {
                err: None,
                selected: self.source.clone(),
                source: self.source,
                grouped: self.grouped,
            };
        }

        if self.grouped.is_empty() {
            self.grouped = vec![self.source.clone()];
        }

        let context = SelectedTable {
            err: None,
            source: self.source.clone(),
            grouped: self.grouped.clone(),
            selected: Table::default(),
        };

        let mut columns = Vec::with_capacity(specs.len());
        let mut projected = Vec::with_capacity(specs.len());
        for spec in specs {
            match spec.project(&context) {
                Ok((name, values)) => {
                    columns.push(name);
                    projected.push(values);
                }
                Err(err) => return SelectedTable::failed(err),
            }
        }

        let height = projected.iter().map(Vec::len).max().unwrap_or(0);
        let mut data = vec![vec![Value::Null; specs.len()]; height];
        for (column, values) in projected.into_iter().enumerate() {
            for (row, value) in values.into_iter().enumerate() {
                data[row][column] = value;
            }
        }

        SelectedTable {
            err: None,
            source: self.source,
            grouped: self.grouped,
            selected: Table::new(columns, data),
        }
    }
}

/// Partition `table` by the given key columns.
///
/// Each key column is resolved per row like an identifier; rows whose key
/// tuples render to the same canonical text share a bucket. Key rows appear
/// in first-seen order. An empty column list produces a single bucket of all
/// rows keyed by one column-less row.
pub(crate) fn group_by_columns(table: Table, columns: &[String]) -> GroupedTable {
    if let Some(err) = table.err() {
        return GroupedTable::failed(err.clone());
    }

    if columns.is_empty() {
        return GroupedTable {
            err: None,
            source: Table::new(Vec::new(), vec![Vec::new()]),
            grouped: vec![table],
        };
    }

    let mut source = Table::new(columns.to_vec(), Vec::new());
    let mut grouped: Vec<Table> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();

    for row in table.rows() {
        let mut key = Vec::with_capacity(columns.len());
        for column in columns {
            let context = SelectedRecord {
                source: Record::new(table.columns().to_vec(), row.clone()),
                ..SelectedRecord::default()
            };
            match Ident::new(column.as_str()).eval(&context) {
                Ok(value) => key.push(value),
                Err(err) => return GroupedTable::failed(err),
            }
        }

        let key_text = canonical_row(&key);
        match positions.get(&key_text) {
            Some(&position) => grouped[position].data.push(row.clone()),
            None => {
                positions.insert(key_text, source.len());
                source.data.push(key);
                grouped.push(Table::new(table.columns().to_vec(), vec![row.clone()]));
            }
        }
    }

    GroupedTable {
        err: None,
        source,
        grouped,
    }
}
