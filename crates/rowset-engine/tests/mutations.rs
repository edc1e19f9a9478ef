use pretty_assertions::assert_eq;
use serde_json::{json, Value};

use rowset_engine::expr::{Equals, Ident, Literal};
use rowset_engine::{from, QueryError, Record};

fn table() -> rowset_engine::Table {
    from(&json!([
        {"id": 1, "name": "A"},
        {"id": 2, "name": "B"},
    ]))
}

#[test]
fn insert_update_delete() {
    let out: Vec<Value> = table()
        .insert(Record::from_row(&json!({"id": 3, "name": "C"})))
        .update(
            Record::from_row(&json!({"name": "Z"})),
            &Equals::new(Ident::new("id"), Literal::new(2)),
        )
        .delete(&Equals::new(Ident::new("id"), Literal::new(1)))
        .scan()
        .unwrap();

    assert_eq!(
        out,
        vec![
            json!({"id": 2, "name": "Z"}),
            json!({"id": 3, "name": "C"}),
        ]
    );
}

#[test]
fn insert_fills_missing_columns_with_null() {
    let out: Vec<Value> = table()
        .insert(Record::from_row(&json!({"id": 3})))
        .scan()
        .unwrap();

    assert_eq!(out[2], json!({"id": 3, "name": null}));
}

#[test]
fn insert_rejects_unknown_columns() {
    let out = table().insert(Record::from_row(&json!({"id": 3, "age": 30})));
    assert_eq!(
        out.err(),
        Some(&QueryError::ColumnNotFound("age".to_string()))
    );
}

#[test]
fn update_rejects_unknown_columns() {
    let out = table().update(
        Record::from_row(&json!({"age": 30})),
        &Literal::new(true),
    );
    assert_eq!(
        out.err(),
        Some(&QueryError::ColumnNotFound("age".to_string()))
    );
}

#[test]
fn delete_consecutive_matches_preserves_the_rest() {
    let out: Vec<Value> = from(&json!([
        {"id": 1}, {"id": 1}, {"id": 2}, {"id": 1}, {"id": 3},
    ]))
    .delete(&Equals::new(Ident::new("id"), Literal::new(1)))
    .scan()
    .unwrap();

    assert_eq!(out, vec![json!({"id": 2}), json!({"id": 3})]);
}

#[test]
fn mutations_preserve_row_order() {
    let out: Vec<Value> = table()
        .update(
            Record::from_row(&json!({"name": "first"})),
            &Equals::new(Ident::new("id"), Literal::new(1)),
        )
        .scan()
        .unwrap();

    assert_eq!(
        out,
        vec![
            json!({"id": 1, "name": "first"}),
            json!({"id": 2, "name": "B"}),
        ]
    );
}
