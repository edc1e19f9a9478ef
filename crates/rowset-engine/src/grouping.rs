//! Grouping-set algebra.

use rowset_model::Result;

/// Produces the grouping sets a `group_by` spec expands to.
pub trait Grouping {
    fn grouping_sets(&self) -> Result<GroupingSets>;
}

/// An ordered collection of grouping sets, each an ordered column list.
///
/// The expansion is a sequence, not a set: duplicates are kept, and the
/// grouping order decides the order of the unioned group rows.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GroupingSets(Vec<Vec<String>>);

impl GroupingSets {
    pub fn new(sets: Vec<Vec<String>>) -> Self {
        Self(sets)
    }

    pub fn sets(&self) -> &[Vec<String>] {
        &self.0
    }

    /// Cartesian concatenation: one set from `self` followed by one set from
    /// `other`, in `self`-major order. This is how multiple `group_by` specs
    /// combine.
    pub fn cartesian(&self, other: &GroupingSets) -> GroupingSets {
        let mut product = Vec::with_capacity(self.0.len() * other.0.len());
        for left in &self.0 {
            for right in &other.0 {
                let mut set = left.clone();
                set.extend(right.iter().cloned());
                product.push(set);
            }
        }
        GroupingSets(product)
    }
}

impl Grouping for GroupingSets {
    fn grouping_sets(&self) -> Result<GroupingSets> {
        Ok(self.clone())
    }
}

/// `CUBE(columns)`: every subset of `columns` in ascending bit-mask order
/// (`001`, `010`, `011`, ...), with the empty set last — `2^n` sets total.
#[derive(Clone, Debug)]
pub struct Cube(Vec<String>);

impl Cube {
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(columns.into_iter().map(Into::into).collect())
    }
}

impl Grouping for Cube {
    fn grouping_sets(&self) -> Result<GroupingSets> {
        let mut sets = Vec::with_capacity(1usize << self.0.len());

        for mask in 1..(1usize << self.0.len()) {
            let mut set = Vec::new();
            for (bit, column) in self.0.iter().enumerate() {
                if (mask >> bit) & 1 == 1 {
                    set.push(column.clone());
                }
            }
            sets.push(set);
        }
        sets.push(Vec::new());

        Ok(GroupingSets::new(sets))
    }
}
