//! Boolean combinators and comparisons.

use std::cmp::Ordering;

use serde_json::Value;

use rowset_model::{canonical_text, compare, Record, Result};

use crate::expr::{Eval, Predicate};
use crate::grouped::GroupedRecord;
use crate::selected::SelectedRecord;

fn operands(
    left: &dyn Eval,
    right: &dyn Eval,
    record: &GroupedRecord,
) -> Result<(Value, Value)> {
    let context = SelectedRecord {
        source: record.source.clone(),
        grouped: record.grouped.clone(),
        selected: Record::default(),
    };
    Ok((left.eval(&context)?, right.eval(&context)?))
}

/// Short-circuit conjunction. Empty input holds.
pub struct And {
    conditions: Vec<Box<dyn Predicate>>,
}

impl And {
    pub fn new(conditions: Vec<Box<dyn Predicate>>) -> Self {
        Self { conditions }
    }
}

impl Predicate for And {
    fn test(&self, record: &GroupedRecord) -> Result<bool> {
        for condition in &self.conditions {
            if !condition.test(record)? {
                return Ok(false);
            }
        }
        Ok(true)
    }
}

/// Short-circuit disjunction.
pub struct Or {
    left: Box<dyn Predicate>,
    right: Box<dyn Predicate>,
}

impl Or {
    pub fn new(left: impl Predicate + 'static, right: impl Predicate + 'static) -> Self {
        Self {
            left: Box::new(left),
            right: Box::new(right),
        }
    }
}

impl Predicate for Or {
    fn test(&self, record: &GroupedRecord) -> Result<bool> {
        if self.left.test(record)? {
            return Ok(true);
        }
        self.right.test(record)
    }
}

/// Canonical-form equality. Null equals only null; values of different
/// kinds are simply unequal.
pub struct Equals {
    left: Box<dyn Eval>,
    right: Box<dyn Eval>,
}

impl Equals {
    pub fn new(left: impl Eval + 'static, right: impl Eval + 'static) -> Self {
        Self {
            left: Box::new(left),
            right: Box::new(right),
        }
    }
}

impl Predicate for Equals {
    fn test(&self, record: &GroupedRecord) -> Result<bool> {
        let (left, right) = operands(self.left.as_ref(), self.right.as_ref(), record)?;
        Ok(canonical_text(&left) == canonical_text(&right))
    }
}

/// Strict `<`. False when either operand is null; comparing different kinds
/// is a type mismatch.
pub struct Less {
    left: Box<dyn Eval>,
    right: Box<dyn Eval>,
}

impl Less {
    pub fn new(left: impl Eval + 'static, right: impl Eval + 'static) -> Self {
        Self {
            left: Box::new(left),
            right: Box::new(right),
        }
    }
}

impl Predicate for Less {
    fn test(&self, record: &GroupedRecord) -> Result<bool> {
        let (left, right) = operands(self.left.as_ref(), self.right.as_ref(), record)?;
        if left.is_null() || right.is_null() {
            return Ok(false);
        }
        Ok(compare(&left, &right)? == Ordering::Less)
    }
}

/// Strict `>`, with the same null and mismatch rules as [`Less`].
pub struct Greater {
    left: Box<dyn Eval>,
    right: Box<dyn Eval>,
}

impl Greater {
    pub fn new(left: impl Eval + 'static, right: impl Eval + 'static) -> Self {
        Self {
            left: Box::new(left),
            right: Box::new(right),
        }
    }
}

impl Predicate for Greater {
    fn test(&self, record: &GroupedRecord) -> Result<bool> {
        let (left, right) = operands(self.left.as_ref(), self.right.as_ref(), record)?;
        if left.is_null() || right.is_null() {
            return Ok(false);
        }
        Ok(compare(&left, &right)? == Ordering::Greater)
    }
}
