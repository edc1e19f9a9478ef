//! Column-aligned rows.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::columns;
use crate::error::{QueryError, Result};

/// A single column-aligned row.
///
/// `values` may be shorter than `columns`; the missing tail reads as null.
/// A record carries the error of the pipeline that produced it: once set,
/// every read fails with that error.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Record {
    err: Option<QueryError>,
    columns: Vec<String>,
    values: Vec<Value>,
}

impl Record {
    pub fn new(columns: Vec<String>, values: Vec<Value>) -> Self {
        Self {
            err: None,
            columns,
            values,
        }
    }

    /// A record that failed before it was produced.
    pub fn failed(err: QueryError) -> Self {
        Self {
            err: Some(err),
            columns: Vec::new(),
            values: Vec::new(),
        }
    }

    /// Build a record from any serializable map-like structure, keeping key
    /// insertion order as column order.
    pub fn from_row<T: Serialize>(row: &T) -> Self {
        let value = match serde_json::to_value(row) {
            Ok(value) => value,
            Err(err) => return Self::failed(QueryError::Serialize(err.to_string())),
        };
        let Value::Object(entries) = value else {
            return Self::failed(QueryError::Serialize(
                "expected a record (a string-keyed map)".to_string(),
            ));
        };

        let mut columns = Vec::with_capacity(entries.len());
        let mut values = Vec::with_capacity(entries.len());
        for (column, value) in entries {
            columns.push(column);
            values.push(value);
        }
        Self::new(columns, values)
    }

    pub fn err(&self) -> Option<&QueryError> {
        self.err.as_ref()
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn into_values(self) -> Vec<Value> {
        self.values
    }

    /// Value at `index`, null when the row is short.
    pub fn value(&self, index: usize) -> Value {
        self.values.get(index).cloned().unwrap_or(Value::Null)
    }

    /// The `(column, value)` pairs that are actually present (the short tail
    /// is not materialized).
    pub fn entries(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.columns
            .iter()
            .map(String::as_str)
            .zip(self.values.iter())
    }

    /// Set every column named `column` to `value`.
    ///
    /// Extends a short row as needed. Writing an unknown column turns the
    /// record into a failed one.
    pub fn set(mut self, column: &str, value: Value) -> Self {
        if self.err.is_some() {
            return self;
        }

        let mut found = false;
        for (index, name) in self.columns.iter().enumerate() {
            if name != column {
                continue;
            }
            found = true;
            if self.values.len() <= index {
                self.values.resize(index + 1, Value::Null);
            }
            self.values[index] = value.clone();
        }

        if !found {
            return Self::failed(QueryError::ColumnNotFound(column.to_string()));
        }
        self
    }

    /// Resolve one column by identifier and return its value.
    pub fn get(&self, column: &str) -> Result<Value> {
        if let Some(err) = &self.err {
            return Err(err.clone());
        }
        match columns::resolve(&self.columns, column)? {
            Some(index) => Ok(self.value(index)),
            None => Err(QueryError::UnknownIdent(column.to_string())),
        }
    }

    /// Deserialize the record into a caller type via its object form.
    pub fn scan<T: DeserializeOwned>(&self) -> Result<T> {
        if let Some(err) = &self.err {
            return Err(err.clone());
        }

        let mut object = Map::new();
        for (column, value) in self.entries() {
            object.insert(column.to_string(), value.clone());
        }
        serde_json::from_value(Value::Object(object)).map_err(|err| QueryError::Scan(err.to_string()))
    }

    /// Resolve one column and deserialize its value.
    pub fn scan_column<T: DeserializeOwned>(&self, column: &str) -> Result<T> {
        let value = self.get(column)?;
        serde_json::from_value(value).map_err(|err| QueryError::Scan(err.to_string()))
    }
}
