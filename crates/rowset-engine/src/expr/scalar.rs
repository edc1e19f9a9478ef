//! Per-row scalar expressions.

use serde_json::Value;

use rowset_model::{columns, plain_text, QueryError, Result};

use crate::expr::{Eval, Predicate, Project};
use crate::grouped::GroupedRecord;
use crate::grouping::{Grouping, GroupingSets};
use crate::selected::{SelectedRecord, SelectedTable};

/// A column reference.
///
/// Resolution consults the source columns first and falls through to the
/// projected columns; see [`rowset_model::columns::resolve`] for the
/// matching rules. As a grouping spec, an identifier seeds the single
/// one-column grouping set.
#[derive(Clone, Debug)]
pub struct Ident {
    name: String,
}

impl Ident {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Eval for Ident {
    fn eval(&self, record: &SelectedRecord) -> Result<Value> {
        if let Some(index) = columns::resolve(record.source.columns(), &self.name)? {
            return Ok(record.source.value(index));
        }
        if let Some(index) = columns::resolve(record.selected.columns(), &self.name)? {
            return Ok(record.selected.value(index));
        }
        Err(QueryError::UnknownIdent(self.name.clone()))
    }
}

impl Project for Ident {
    /// Column-wise resolution; the returned name is the canonical column
    /// name, not the identifier as written.
    fn project(&self, table: &SelectedTable) -> Result<(String, Vec<Value>)> {
        for source in [table.source(), table.selected()] {
            let Some(index) = columns::resolve(source.columns(), &self.name)? else {
                continue;
            };
            let values = source
                .rows()
                .iter()
                .map(|row| row.get(index).cloned().unwrap_or(Value::Null))
                .collect();
            return Ok((source.columns()[index].clone(), values));
        }
        Err(QueryError::UnknownIdent(self.name.clone()))
    }
}

impl Grouping for Ident {
    fn grouping_sets(&self) -> Result<GroupingSets> {
        Ok(GroupingSets::new(vec![vec![self.name.clone()]]))
    }
}

/// A constant value.
#[derive(Clone, Debug)]
pub struct Literal {
    value: Value,
}

impl Literal {
    pub fn new(value: impl Into<Value>) -> Self {
        Self {
            value: value.into(),
        }
    }

    pub fn null() -> Self {
        Self { value: Value::Null }
    }
}

impl Eval for Literal {
    fn eval(&self, _record: &SelectedRecord) -> Result<Value> {
        Ok(self.value.clone())
    }
}

impl Project for Literal {
    /// Replicates the constant once per source row, as column `literal`.
    fn project(&self, table: &SelectedTable) -> Result<(String, Vec<Value>)> {
        let values = vec![self.value.clone(); table.source().len()];
        Ok(("literal".to_string(), values))
    }
}

impl Predicate for Literal {
    /// Holds iff the constant is boolean `true`.
    fn test(&self, _record: &GroupedRecord) -> Result<bool> {
        Ok(self.value == Value::Bool(true))
    }
}

/// String concatenation.
///
/// Each operand is coerced to unquoted text ([`plain_text`]): strings stay
/// verbatim, everything else renders as its canonical form.
pub struct Concat {
    parts: Vec<Box<dyn Eval>>,
}

impl Concat {
    pub fn new(parts: Vec<Box<dyn Eval>>) -> Self {
        Self { parts }
    }
}

impl Eval for Concat {
    fn eval(&self, record: &SelectedRecord) -> Result<Value> {
        let mut out = String::new();
        for part in &self.parts {
            out.push_str(&plain_text(&part.eval(record)?));
        }
        Ok(Value::String(out))
    }
}

impl Project for Concat {
    fn project(&self, table: &SelectedTable) -> Result<(String, Vec<Value>)> {
        let mut values = Vec::with_capacity(table.source().len());
        for index in 0..table.source().len() {
            values.push(self.eval(&table.record(index))?);
        }
        Ok(("concat".to_string(), values))
    }
}

/// Rename a projection.
pub struct As {
    name: String,
    expr: Box<dyn Project>,
}

impl As {
    pub fn new(name: impl Into<String>, expr: impl Project + 'static) -> Self {
        Self {
            name: name.into(),
            expr: Box::new(expr),
        }
    }
}

impl Project for As {
    fn project(&self, table: &SelectedTable) -> Result<(String, Vec<Value>)> {
        let (_, values) = self.expr.project(table)?;
        Ok((self.name.clone(), values))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::Table;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn context() -> SelectedRecord {
        SelectedRecord {
            source: rowset_model::Record::new(
                vec!["users.id".to_string(), "users.name".to_string()],
                vec![json!(1), json!("Max")],
            ),
            ..SelectedRecord::default()
        }
    }

    #[test]
    fn ident_falls_through_to_the_projection() {
        let mut record = context();
        record.selected = rowset_model::Record::new(vec!["total".to_string()], vec![json!(9)]);

        assert_eq!(Ident::new("users.name").eval(&record).unwrap(), json!("Max"));
        assert_eq!(Ident::new("total").eval(&record).unwrap(), json!(9));
        assert_eq!(
            Ident::new("missing").eval(&record),
            Err(QueryError::UnknownIdent("missing".to_string()))
        );
    }

    #[test]
    fn ident_projects_the_canonical_column_name() {
        let table = SelectedTable::from_source(Table::from_rows(&json!([
            {"users.name": "Max"},
            {"users.name": "Tom"},
        ])));

        let (name, values) = Ident::new("name").project(&table).unwrap();
        assert_eq!(name, "users.name");
        assert_eq!(values, vec![json!("Max"), json!("Tom")]);
    }

    #[test]
    fn concat_coerces_scalars_to_text() {
        let concat = Concat::new(vec![
            Box::new(Ident::new("users.name")),
            Box::new(Literal::new(" #")),
            Box::new(Ident::new("users.id")),
        ]);

        assert_eq!(concat.eval(&context()).unwrap(), json!("Max #1"));
    }

    #[test]
    fn as_overrides_the_column_name() {
        let table = SelectedTable::from_source(Table::from_rows(&json!([{"a": 1}])));
        let (name, values) = As::new("renamed", Ident::new("a")).project(&table).unwrap();

        assert_eq!(name, "renamed");
        assert_eq!(values, vec![json!(1)]);
    }
}
