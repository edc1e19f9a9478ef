use pretty_assertions::assert_eq;
use serde_json::json;

use rowset_engine::expr::{Equals, Greater, Less, Literal, Predicate};
use rowset_engine::{GroupedRecord, Kind, QueryError};

fn holds(predicate: &dyn Predicate) -> Result<bool, QueryError> {
    predicate.test(&GroupedRecord::default())
}

#[test]
fn null_equals_only_null() {
    assert_eq!(holds(&Equals::new(Literal::null(), Literal::null())), Ok(true));
    assert_eq!(
        holds(&Equals::new(Literal::null(), Literal::new(1))),
        Ok(false)
    );
    // The string "null" is not the null value.
    assert_eq!(
        holds(&Equals::new(Literal::new("null"), Literal::null())),
        Ok(false)
    );
}

#[test]
fn equality_ignores_object_key_order() {
    assert_eq!(
        holds(&Equals::new(
            Literal::new(json!({"a": 1, "b": 2})),
            Literal::new(json!({"b": 2, "a": 1})),
        )),
        Ok(true)
    );
}

#[test]
fn ordering_is_false_on_nulls() {
    assert_eq!(holds(&Less::new(Literal::null(), Literal::new(1))), Ok(false));
    assert_eq!(holds(&Less::new(Literal::new(1), Literal::null())), Ok(false));
    assert_eq!(
        holds(&Greater::new(Literal::null(), Literal::null())),
        Ok(false)
    );
}

#[test]
fn ordering_across_kinds_is_a_type_mismatch() {
    assert_eq!(
        holds(&Less::new(Literal::new("a"), Literal::new(1))),
        Err(QueryError::TypeMismatch {
            left: Kind::String,
            right: Kind::Number,
        })
    );
    assert_eq!(
        holds(&Greater::new(Literal::new(1), Literal::new("a"))),
        Err(QueryError::TypeMismatch {
            left: Kind::Number,
            right: Kind::String,
        })
    );
}

#[test]
fn ordering_within_kinds() {
    assert_eq!(holds(&Less::new(Literal::new(1), Literal::new(2))), Ok(true));
    assert_eq!(
        holds(&Less::new(Literal::new(false), Literal::new(true))),
        Ok(true)
    );
    assert_eq!(
        holds(&Greater::new(Literal::new("b"), Literal::new("a"))),
        Ok(true)
    );
    assert_eq!(
        holds(&Less::new(
            Literal::new(json!([1, 2])),
            Literal::new(json!([1, 3])),
        )),
        Ok(true)
    );
    // Equal values are neither less nor greater.
    assert_eq!(holds(&Less::new(Literal::new(1), Literal::new(1.0))), Ok(false));
    assert_eq!(
        holds(&Greater::new(Literal::new(1), Literal::new(1.0))),
        Ok(false)
    );
}
