use std::cmp::Ordering;
use std::fmt;

use ordered_float::OrderedFloat;
use serde_json::{Number, Value};

use crate::canonical::canonical_text;
use crate::error::{QueryError, Result};

/// Coarse type classes used by the ordering predicates.
///
/// Equality works across kinds (two canonically different values are simply
/// unequal); ordering is only defined within a single kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Kind {
    Null,
    Bool,
    Number,
    String,
    Array,
    Object,
}

impl Kind {
    pub fn of(value: &Value) -> Kind {
        match value {
            Value::Null => Kind::Null,
            Value::Bool(_) => Kind::Bool,
            Value::Number(_) => Kind::Number,
            Value::String(_) => Kind::String,
            Value::Array(_) => Kind::Array,
            Value::Object(_) => Kind::Object,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Kind::Null => "null",
            Kind::Bool => "boolean",
            Kind::Number => "number",
            Kind::String => "string",
            Kind::Array => "array",
            Kind::Object => "object",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Compare two values of the same kind.
///
/// Numbers compare numerically, strings by codepoint, booleans with
/// `false < true`, arrays and objects by canonical text. Values of
/// different kinds do not order: the result is [`QueryError::TypeMismatch`].
pub fn compare(a: &Value, b: &Value) -> Result<Ordering> {
    let (ka, kb) = (Kind::of(a), Kind::of(b));
    if ka != kb {
        return Err(QueryError::TypeMismatch { left: ka, right: kb });
    }

    Ok(match (a, b) {
        (Value::Null, Value::Null) => Ordering::Equal,
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        (Value::Number(x), Value::Number(y)) => compare_numbers(x, y),
        (Value::String(x), Value::String(y)) => x.cmp(y),
        _ => canonical_text(a).cmp(&canonical_text(b)),
    })
}

fn compare_numbers(x: &Number, y: &Number) -> Ordering {
    // Exact integer paths first; mixed representations fall back to a total
    // order on f64.
    if let (Some(a), Some(b)) = (x.as_i64(), y.as_i64()) {
        return a.cmp(&b);
    }
    if let (Some(a), Some(b)) = (x.as_u64(), y.as_u64()) {
        return a.cmp(&b);
    }

    let a = x.as_f64().unwrap_or(f64::NAN);
    let b = y.as_f64().unwrap_or(f64::NAN);
    OrderedFloat(a).cmp(&OrderedFloat(b))
}

/// Unquoted scalar text, used when an expression coerces a value to a
/// string (e.g. concatenation).
///
/// Strings are returned verbatim; every other value renders as its
/// canonical text (`null`, `true`, `1`, `[1,2]`, ...).
pub fn plain_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => canonical_text(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn orders_within_each_kind() {
        assert_eq!(compare(&json!(1), &json!(2)).unwrap(), Ordering::Less);
        assert_eq!(compare(&json!(2.5), &json!(2)).unwrap(), Ordering::Greater);
        assert_eq!(compare(&json!("a"), &json!("b")).unwrap(), Ordering::Less);
        assert_eq!(compare(&json!(false), &json!(true)).unwrap(), Ordering::Less);
        assert_eq!(
            compare(&json!([1, 2]), &json!([1, 3])).unwrap(),
            Ordering::Less
        );
        assert_eq!(compare(&Value::Null, &Value::Null).unwrap(), Ordering::Equal);
    }

    #[test]
    fn integral_float_equals_integer() {
        assert_eq!(compare(&json!(1.0), &json!(1)).unwrap(), Ordering::Equal);
    }

    #[test]
    fn cross_kind_comparison_is_a_type_mismatch() {
        assert_eq!(
            compare(&json!("a"), &json!(1)),
            Err(QueryError::TypeMismatch {
                left: Kind::String,
                right: Kind::Number,
            })
        );
    }

    #[test]
    fn plain_text_leaves_strings_unquoted() {
        assert_eq!(plain_text(&json!("abc")), "abc");
        assert_eq!(plain_text(&json!(1)), "1");
        assert_eq!(plain_text(&Value::Null), "null");
        assert_eq!(plain_text(&json!([1, "a"])), r#"[1,"a"]"#);
    }
}
