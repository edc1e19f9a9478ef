use pretty_assertions::assert_eq;
use serde_json::{json, Value};

use rowset_engine::expr::{Equals, Ident, Literal};
use rowset_engine::{from, LeftJoin};

#[test]
fn unmatched_left_rows_are_padded_with_nulls() {
    let out: Vec<Value> = from(&json!([{"id": 1}]))
        .join(&[&LeftJoin::new(
            from(&json!([{"k": 9, "v": "x"}])),
            Literal::new(false),
        )])
        .scan()
        .unwrap();

    assert_eq!(out, vec![json!({"id": 1, "k": null, "v": null})]);
}

#[test]
fn every_left_row_survives() {
    let left = from(&json!([{"id": 1}, {"id": 2}, {"id": 3}]));
    let right = from(&json!([{"ref": 1}, {"ref": 1}, {"ref": 3}]));

    let out: Vec<Value> = left
        .join(&[&LeftJoin::new(
            right,
            Equals::new(Ident::new("id"), Ident::new("ref")),
        )])
        .scan()
        .unwrap();

    // id 1 matches twice, id 2 not at all, id 3 once; left-major order.
    assert_eq!(
        out,
        vec![
            json!({"id": 1, "ref": 1}),
            json!({"id": 1, "ref": 1}),
            json!({"id": 2, "ref": null}),
            json!({"id": 3, "ref": 3}),
        ]
    );
}

#[test]
fn a_right_side_without_columns_is_a_no_op() {
    let out: Vec<Value> = from(&json!([{"id": 1}]))
        .join(&[&LeftJoin::new(from(&json!([])), Literal::new(true))])
        .scan()
        .unwrap();

    assert_eq!(out, vec![json!({"id": 1})]);
}

#[test]
fn joins_fold_left_to_right() {
    let out: Vec<Value> = from(&json!([{"a": 1}]))
        .alias("l")
        .join(&[
            &LeftJoin::new(
                from(&json!([{"b": 1}, {"b": 2}])).alias("m"),
                Equals::new(Ident::new("l.a"), Ident::new("m.b")),
            ),
            &LeftJoin::new(
                from(&json!([{"c": 1}])).alias("r"),
                Equals::new(Ident::new("m.b"), Ident::new("r.c")),
            ),
        ])
        .scan()
        .unwrap();

    // The second join sees the columns produced by the first.
    assert_eq!(out, vec![json!({"l.a": 1, "m.b": 1, "r.c": 1})]);
}

#[test]
fn join_conditions_propagate_errors() {
    let out = from(&json!([{"id": 1}])).join(&[&LeftJoin::new(
        from(&json!([{"k": 1}])),
        Equals::new(Ident::new("missing"), Literal::new(1)),
    )]);

    assert_eq!(
        out.err(),
        Some(&rowset_engine::QueryError::UnknownIdent("missing".to_string()))
    );
}
