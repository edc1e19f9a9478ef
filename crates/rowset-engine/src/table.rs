//! The base relational stage: columns plus rows.

use std::collections::HashMap;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

use rowset_model::{QueryError, Record, Result};

use crate::expr::{Ident, Predicate, Project};
use crate::grouped::{group_by_columns, GroupedRecord, GroupedTable};
use crate::grouping::{Grouping, GroupingSets};
use crate::join::Join;
use crate::selected::SelectedTable;

/// Rows and columns flowing through the relational pipeline.
///
/// Stages are value-semantic: every operation consumes the stage and returns
/// a new one, and `Clone` is a deep copy (used when a pipeline forks, e.g.
/// grouping-set expansion). Rows may be shorter than the column list; the
/// missing tail reads as null.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Table {
    pub(crate) err: Option<QueryError>,
    pub(crate) columns: Vec<String>,
    pub(crate) data: Vec<Vec<Value>>,
}

/// Pad a row out to `width` with nulls.
pub(crate) fn padded(row: &[Value], width: usize) -> Vec<Value> {
    let mut out = row.to_vec();
    if out.len() < width {
        out.resize(width, Value::Null);
    }
    out
}

impl Table {
    pub fn new(columns: Vec<String>, data: Vec<Vec<Value>>) -> Self {
        Self {
            err: None,
            columns,
            data,
        }
    }

    /// A stage that failed before it was produced.
    pub(crate) fn failed(err: QueryError) -> Self {
        Self {
            err: Some(err),
            columns: Vec::new(),
            data: Vec::new(),
        }
    }

    pub(crate) fn from_rows<T: Serialize>(rows: &T) -> Self {
        let value = match serde_json::to_value(rows) {
            Ok(value) => value,
            Err(err) => return Self::failed(QueryError::Serialize(err.to_string())),
        };
        let Value::Array(rows) = value else {
            return Self::failed(QueryError::Serialize(
                "expected a sequence of records".to_string(),
            ));
        };

        let mut columns: Vec<String> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();
        let mut data = Vec::with_capacity(rows.len());

        for row in rows {
            let Value::Object(entries) = row else {
                return Self::failed(QueryError::Serialize(
                    "expected a record (a string-keyed map)".to_string(),
                ));
            };

            let mut values = vec![Value::Null; columns.len()];
            for (key, value) in entries {
                let slot = match index.get(&key) {
                    Some(&slot) => slot,
                    None => {
                        let slot = columns.len();
                        index.insert(key.clone(), slot);
                        columns.push(key);
                        slot
                    }
                };
                if values.len() <= slot {
                    values.resize(slot + 1, Value::Null);
                }
                values[slot] = value;
            }
            data.push(values);
        }

        Self {
            err: None,
            columns,
            data,
        }
    }

    pub fn err(&self) -> Option<&QueryError> {
        self.err.as_ref()
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.data
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Qualify every column with `alias`, replacing any previous alias:
    /// `x.y` and bare `y` both become `alias.y`. An empty alias leaves the
    /// table unchanged.
    pub fn alias(mut self, alias: &str) -> Self {
        if self.err.is_some() || alias.is_empty() {
            return self;
        }

        for column in &mut self.columns {
            let bare = match column.rsplit_once('.') {
                Some((_, bare)) => bare,
                None => column.as_str(),
            };
            *column = format!("{alias}.{bare}");
        }
        self
    }

    /// Append `other`'s rows after widening both tables to the union of
    /// their columns (new columns from `other` go last).
    pub fn union_all(mut self, other: Table) -> Self {
        if self.err.is_some() {
            return self;
        }
        if let Some(err) = other.err {
            return Self::failed(err);
        }

        let mut index: HashMap<String, usize> = self
            .columns
            .iter()
            .enumerate()
            .map(|(i, c)| (c.clone(), i))
            .collect();

        let mut transform = Vec::with_capacity(other.columns.len());
        for column in other.columns {
            let slot = match index.get(&column) {
                Some(&slot) => slot,
                None => {
                    let slot = self.columns.len();
                    index.insert(column.clone(), slot);
                    self.columns.push(column);
                    slot
                }
            };
            transform.push(slot);
        }

        let width = self.columns.len();
        for row in other.data {
            let mut values = vec![Value::Null; width];
            for (j, value) in row.into_iter().enumerate() {
                if let Some(&slot) = transform.get(j) {
                    values[slot] = value;
                }
            }
            self.data.push(values);
        }
        self
    }

    /// Fold-left application of join clauses.
    pub fn join(mut self, joins: &[&dyn Join]) -> Self {
        if self.err.is_some() {
            return self;
        }

        for join in joins {
            self = join.join(self);
            if self.err.is_some() {
                return self;
            }
        }
        self
    }

    /// Keep the rows satisfying `condition`.
    pub fn filter(mut self, condition: &dyn Predicate) -> Self {
        if self.err.is_some() {
            return self;
        }

        let columns = self.columns.clone();
        let mut kept = Vec::with_capacity(self.data.len());
        for row in self.data {
            let record = GroupedRecord {
                source: Record::new(columns.clone(), row.clone()),
                grouped: Table::default(),
            };
            match condition.test(&record) {
                Ok(true) => kept.push(row),
                Ok(false) => {}
                Err(err) => return Self::failed(err),
            }
        }
        self.data = kept;
        self
    }

    /// Partition the rows by grouping specs.
    ///
    /// Each spec expands to a [`GroupingSets`]; multiple specs combine by
    /// Cartesian concatenation, and the per-set groupings (each over a deep
    /// copy of this table) are unioned in order. With no specs at all the
    /// table passes through ungrouped.
    pub fn group_by(self, specs: &[&dyn Grouping]) -> GroupedTable {
        if let Some(err) = self.err {
            return GroupedTable::failed(err);
        }
        if specs.is_empty() {
            return GroupedTable {
                err: None,
                source: self,
                grouped: Vec::new(),
            };
        }

        let mut sets: Option<GroupingSets> = None;
        for spec in specs {
            let expanded = match spec.grouping_sets() {
                Ok(expanded) => expanded,
                Err(err) => return GroupedTable::failed(err),
            };
            sets = Some(match sets {
                None => expanded,
                Some(sets) => sets.cartesian(&expanded),
            });
        }

        let mut union: Option<GroupedTable> = None;
        for set in sets.unwrap_or_default().sets() {
            let grouped = group_by_columns(self.clone(), set);
            if grouped.err.is_some() {
                return grouped;
            }
            union = Some(match union {
                None => grouped,
                Some(union) => union.union_all(grouped),
            });
        }
        union.unwrap_or_default()
    }

    /// Project directly, treating the table as ungrouped.
    pub fn select(mut self, specs: &[&dyn Project]) -> SelectedTable {
        let err = self.err.take();
        GroupedTable {
            err,
            source: self,
            grouped: Vec::new(),
        }
        .select(specs)
    }

    /// Append one row. Columns missing from `record` become null; a column
    /// unknown to the table fails the stage.
    pub fn insert(mut self, record: Record) -> Self {
        if self.err.is_some() {
            return self;
        }
        if let Some(err) = record.err() {
            return Self::failed(err.clone());
        }

        let mut row = Record::new(self.columns.clone(), vec![Value::Null; self.columns.len()]);
        for (column, value) in record.entries() {
            row = row.set(column, value.clone());
        }
        if let Some(err) = row.err() {
            return Self::failed(err.clone());
        }

        self.data.push(row.into_values());
        self
    }

    /// Set `record`'s columns on every row matching `condition`, preserving
    /// row order.
    pub fn update(mut self, record: Record, condition: &dyn Predicate) -> Self {
        if self.err.is_some() {
            return self;
        }
        if let Some(err) = record.err() {
            return Self::failed(err.clone());
        }

        let columns = self.columns.clone();
        for row in &mut self.data {
            let context = GroupedRecord {
                source: Record::new(columns.clone(), row.clone()),
                grouped: Table::default(),
            };
            match condition.test(&context) {
                Ok(true) => {}
                Ok(false) => continue,
                Err(err) => return Self::failed(err),
            }

            let mut updated = Record::new(columns.clone(), row.clone());
            for (column, value) in record.entries() {
                updated = updated.set(column, value.clone());
            }
            if let Some(err) = updated.err() {
                return Self::failed(err.clone());
            }
            *row = updated.into_values();
        }
        self
    }

    /// Remove every row matching `condition`, preserving the order of the
    /// remainder.
    pub fn delete(mut self, condition: &dyn Predicate) -> Self {
        if self.err.is_some() {
            return self;
        }

        let columns = self.columns.clone();
        let mut kept = Vec::with_capacity(self.data.len());
        for row in self.data {
            let context = GroupedRecord {
                source: Record::new(columns.clone(), row.clone()),
                grouped: Table::default(),
            };
            match condition.test(&context) {
                Ok(true) => {}
                Ok(false) => kept.push(row),
                Err(err) => return Self::failed(err),
            }
        }
        self.data = kept;
        self
    }

    /// All rows as records (each carrying this stage's error, if any).
    pub fn records(&self) -> Vec<Record> {
        (0..self.data.len()).map(|i| self.record(i)).collect()
    }

    /// The row at `index` as a record; out of range yields an empty row.
    pub fn record(&self, index: usize) -> Record {
        if let Some(err) = &self.err {
            return Record::failed(err.clone());
        }
        let values = self.data.get(index).cloned().unwrap_or_default();
        Record::new(self.columns.clone(), values)
    }

    /// Deserialize the whole table into a caller type (a sequence of
    /// records). Columns beyond a short row are omitted from its object, so
    /// ingestion round-trips exactly.
    pub fn scan<T: DeserializeOwned>(&self) -> Result<T> {
        if let Some(err) = &self.err {
            return Err(err.clone());
        }

        let rows: Vec<Value> = self
            .data
            .iter()
            .map(|row| {
                let mut object = Map::new();
                for (i, column) in self.columns.iter().enumerate() {
                    if let Some(value) = row.get(i) {
                        object.insert(column.clone(), value.clone());
                    }
                }
                Value::Object(object)
            })
            .collect();

        serde_json::from_value(Value::Array(rows)).map_err(|err| QueryError::Scan(err.to_string()))
    }

    /// Resolve one column and deserialize its values as a sequence.
    pub fn scan_column<T: DeserializeOwned>(&self, column: &str) -> Result<T> {
        if let Some(err) = &self.err {
            return Err(err.clone());
        }

        let (_, values) = Ident::new(column).project(&SelectedTable::from_source(self.clone()))?;
        serde_json::from_value(Value::Array(values)).map_err(|err| QueryError::Scan(err.to_string()))
    }
}
