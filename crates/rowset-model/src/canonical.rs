//! Canonical textual form for values.
//!
//! Equality, `distinct`, group keys and the within-kind ordering of arrays
//! and objects all compare this form byte for byte. Two properties matter:
//! the rendering is deterministic over the whole value domain, and `null`
//! never collides with the string `"null"` (string escaping guarantees it).

use std::fmt::Write as _;

use serde_json::{Map, Value};

// Integral floats above 2^53 are not exactly representable; past that point
// they keep their float rendering.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_992.0;

/// Render `value` as canonical JSON text.
///
/// Differences from plain `serde_json::to_string`:
/// - object keys are emitted in sorted order, so construction order does not
///   leak into equality or grouping;
/// - finite integral floats are emitted without a fractional part, so an
///   ingested `1` and a computed `1.0` form the same key.
pub fn canonical_text(value: &Value) -> String {
    let mut out = String::new();
    write_value(&mut out, value);
    out
}

/// Canonical text of a row, rendered as an array of its values.
///
/// Used for whole-row keys (`distinct`, group buckets) without wrapping the
/// slice into an owned `Value::Array` first.
pub fn canonical_row(values: &[Value]) -> String {
    let mut out = String::new();
    out.push('[');
    for (i, value) in values.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        write_value(&mut out, value);
    }
    out.push(']');
    out
}

fn write_value(out: &mut String, value: &Value) {
    match value {
        Value::Null => out.push_str("null"),
        Value::Bool(true) => out.push_str("true"),
        Value::Bool(false) => out.push_str("false"),
        Value::Number(number) => write_number(out, number),
        Value::String(text) => write_string(out, text),
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_value(out, item);
            }
            out.push(']');
        }
        Value::Object(entries) => write_object(out, entries),
    }
}

fn write_object(out: &mut String, entries: &Map<String, Value>) {
    let mut keys: Vec<&String> = entries.keys().collect();
    keys.sort();

    out.push('{');
    for (i, key) in keys.into_iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        write_string(out, key);
        out.push(':');
        if let Some(value) = entries.get(key) {
            write_value(out, value);
        }
    }
    out.push('}');
}

fn write_number(out: &mut String, number: &serde_json::Number) {
    if number.is_f64() {
        let f = number.as_f64().unwrap_or_default();
        if f.is_finite() && f.fract() == 0.0 && f.abs() <= MAX_SAFE_INTEGER {
            let _ = write!(out, "{}", f as i64);
            return;
        }
    }
    let _ = write!(out, "{number}");
}

fn write_string(out: &mut String, text: &str) {
    out.push('"');
    for c in text.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if (c as u32) < 0x20 => {
                let _ = write!(out, "\\u{:04x}", c as u32);
            }
            c => out.push(c),
        }
    }
    out.push('"');
}
