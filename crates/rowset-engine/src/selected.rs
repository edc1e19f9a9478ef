//! The projection stage: source, groups and the projected table.

use std::cmp::Ordering;
use std::collections::HashSet;

use serde::de::DeserializeOwned;

use rowset_model::{canonical_row, QueryError, Record, Result};

use crate::expr::SortKey;
use crate::table::Table;

/// Evaluation context for a per-row expression: the pre-projection row, the
/// group bucket it belongs to (empty when ungrouped) and the projected row
/// built so far. Identifier resolution consults `source` first and falls
/// through to `selected`.
#[derive(Clone, Debug, Default)]
pub struct SelectedRecord {
    pub source: Record,
    pub grouped: Table,
    pub selected: Record,
}

/// A projected stage.
///
/// `source` and `grouped` stay available so later expressions can still see
/// the pre-projection rows; `order_by`, `limit` and `offset` clear them,
/// after which the projection is authoritative.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SelectedTable {
    pub(crate) err: Option<QueryError>,
    pub(crate) source: Table,
    pub(crate) grouped: Vec<Table>,
    pub(crate) selected: Table,
}

impl SelectedTable {
    pub(crate) fn failed(err: QueryError) -> Self {
        Self {
            err: Some(err),
            ..Self::default()
        }
    }

    /// A bare evaluation context over `source` (no groups, no projection).
    pub(crate) fn from_source(source: Table) -> Self {
        Self {
            err: None,
            source,
            grouped: Vec::new(),
            selected: Table::default(),
        }
    }

    pub fn err(&self) -> Option<&QueryError> {
        self.err.as_ref()
    }

    pub fn source(&self) -> &Table {
        &self.source
    }

    pub fn grouped(&self) -> &[Table] {
        &self.grouped
    }

    /// The projected table.
    pub fn selected(&self) -> &Table {
        &self.selected
    }

    /// The evaluation context for output row `index`.
    pub fn record(&self, index: usize) -> SelectedRecord {
        SelectedRecord {
            source: self.source.record(index),
            grouped: self.grouped.get(index).cloned().unwrap_or_default(),
            selected: self.selected.record(index),
        }
    }

    /// Drop rows whose canonical form was already seen, keeping first
    /// occurrences in order.
    pub fn distinct(mut self) -> Self {
        if self.err.is_some() {
            return self;
        }

        let data = std::mem::take(&mut self.selected.data);
        let mut seen = HashSet::with_capacity(data.len());
        self.selected.data = data
            .into_iter()
            .filter(|row| seen.insert(canonical_row(row)))
            .collect();
        self
    }

    /// Stable sort of the projection.
    ///
    /// Keys are consulted in order; the first non-equal comparison decides,
    /// and rows equal under every key keep their relative order. Sorting
    /// clears `source` and `grouped`.
    pub fn order_by(self, keys: &[&dyn SortKey]) -> Self {
        if self.err.is_some() {
            return self;
        }

        let mut records: Vec<SelectedRecord> =
            (0..self.selected.len()).map(|i| self.record(i)).collect();

        // `sort_by` cannot return a Result, so the first comparator error is
        // parked here and the remaining comparisons short out as equal.
        let mut failure: Option<QueryError> = None;
        records.sort_by(|a, b| {
            if failure.is_some() {
                return Ordering::Equal;
            }
            for key in keys {
                match key.compare(a, b) {
                    Ok(Ordering::Equal) => continue,
                    Ok(order) => return order,
                    Err(err) => {
                        failure = Some(err);
                        return Ordering::Equal;
                    }
                }
            }
            Ordering::Equal
        });

        if let Some(err) = failure {
            return Self::failed(err);
        }

        let columns = self.selected.columns().to_vec();
        let data = records
            .into_iter()
            .map(|record| record.selected.into_values())
            .collect();

        Self {
            err: None,
            source: Table::default(),
            grouped: Vec::new(),
            selected: Table::new(columns, data),
        }
    }

    /// Keep the first `limit` rows. Clears `source` and `grouped`.
    pub fn limit(mut self, limit: usize) -> Self {
        if self.err.is_some() {
            return self;
        }

        self.source = Table::default();
        self.grouped.clear();
        self.selected.data.truncate(limit);
        self
    }

    /// Drop the first `offset` rows; past the end the result keeps the
    /// columns with no rows. Clears `source` and `grouped`.
    pub fn offset(mut self, offset: usize) -> Self {
        if self.err.is_some() {
            return self;
        }

        self.source = Table::default();
        self.grouped.clear();
        if offset > self.selected.data.len() {
            self.selected.data.clear();
        } else {
            self.selected.data.drain(..offset);
        }
        self
    }

    /// Deserialize the projection into a caller type.
    pub fn scan<T: DeserializeOwned>(&self) -> Result<T> {
        if let Some(err) = &self.err {
            return Err(err.clone());
        }
        self.selected.scan()
    }

    /// Resolve one projected column and deserialize its values.
    pub fn scan_column<T: DeserializeOwned>(&self, column: &str) -> Result<T> {
        if let Some(err) = &self.err {
            return Err(err.clone());
        }
        self.selected.scan_column(column)
    }

    /// The first output row; a failed record carrying [`QueryError::NoRows`]
    /// when the projection is empty.
    pub fn first(&self) -> Record {
        if let Some(err) = &self.err {
            return Record::failed(err.clone());
        }
        if self.selected.is_empty() {
            return Record::failed(QueryError::NoRows);
        }
        self.selected.record(0)
    }

    /// The projection as a plain table, usable as a sub-query source.
    pub fn into_table(self) -> Table {
        self.into()
    }
}

impl From<SelectedTable> for Table {
    fn from(table: SelectedTable) -> Table {
        match table.err {
            Some(err) => Table::failed(err),
            None => table.selected,
        }
    }
}
