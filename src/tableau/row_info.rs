use std::fmt::{Display, Formatter};
use std::ops::{MulAssign, Neg};

use fnv::FnvHashMap as HashMap;

use super::{near_zero, Column};
use crate::expression::Expression;

/// A sparse linear equation over tableau columns.
///
/// Stored under a basic [Row](super::Row), it reads
/// `basic = constant + sum(coefficient * column)`.
/// Before insertion it is the residual of a constraint, which must be `>= 0` or `== 0`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RowInfo {
    pub(crate) terms: HashMap<Column, f64>,
    pub(crate) constant: f64,
}

impl RowInfo {
    /// A row with no terms
    pub fn new(constant: f64) -> Self {
        RowInfo {
            terms: HashMap::default(),
            constant,
        }
    }

    /// The constant term, i.e. the value of the basic column when all parametric columns are zero
    pub fn constant(&self) -> f64 {
        self.constant
    }

    /// The coefficient of a column, zero if the column is absent
    pub fn coefficient(&self, column: Column) -> f64 {
        self.terms.get(&column).copied().unwrap_or(0.)
    }

    pub fn contains(&self, column: Column) -> bool {
        self.terms.contains_key(&column)
    }

    /// The terms, in column order
    pub fn sorted_terms(&self) -> Vec<(Column, f64)> {
        let mut terms: Vec<_> = self.terms.iter().map(|(&c, &v)| (c, v)).collect();
        terms.sort_by_key(|&(c, _)| c);
        terms
    }

    /// Adds `coefficient * column`, dropping the term if it cancels out
    pub fn add_term(&mut self, column: Column, coefficient: f64) {
        let value = self.terms.entry(column).or_insert(0.);
        *value += coefficient;
        if near_zero(*value) {
            self.terms.remove(&column);
        }
    }

    /// `self += multiplier * other`
    pub fn add_mul(&mut self, other: &RowInfo, multiplier: f64) {
        self.constant += other.constant * multiplier;
        for (&column, &coefficient) in &other.terms {
            self.add_term(column, coefficient * multiplier);
        }
    }

    /// Rewrites `0 = self` as `column = ...`, and removes `column` from the terms.
    ///
    /// Returns `1 / c`, where `c` was the coefficient of `column`.
    /// This is the coefficient the former basic column gets in the solved row during a pivot.
    pub fn solve(&mut self, column: Column) -> f64 {
        let coefficient = self.terms.remove(&column).unwrap_or(1.);
        *self *= -1. / coefficient;
        1. / coefficient
    }
}

impl From<&Expression> for RowInfo {
    fn from(expression: &Expression) -> Self {
        RowInfo {
            terms: expression
                .terms()
                .filter(|&(_, c)| !near_zero(c))
                .map(|(var, c)| (Column::External(var), c))
                .collect(),
            constant: expression.constant(),
        }
    }
}

impl Neg for RowInfo {
    type Output = RowInfo;

    fn neg(mut self) -> Self::Output {
        self *= -1.;
        self
    }
}

impl MulAssign<f64> for RowInfo {
    fn mul_assign(&mut self, rhs: f64) {
        self.constant *= rhs;
        for value in self.terms.values_mut() {
            *value *= rhs;
        }
    }
}

impl Display for RowInfo {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.constant)?;
        for (column, coefficient) in self.sorted_terms() {
            write!(f, " + {} {}", coefficient, column)?;
        }
        Ok(())
    }
}
