//! Affine expressions over [Variable]s, such as `3 left + width - 10`,
//! and the arithmetic operators that build them.
use std::fmt::{Debug, Formatter};
use std::ops::{Add, AddAssign, Div, Mul, MulAssign, Neg, Sub, SubAssign};

use fnv::FnvHashMap as HashMap;

use crate::affine_expression_trait::IntoAffineExpression;
use crate::constraint::{self, Constraint};
use crate::variable::{FormatWithVars, Variable};
use crate::Solution;

/// A sum of weighted variables plus a constant.
///
/// Expressions are usually built with operators:
///
/// ```
/// use cassowary_lp::{variables, Expression};
/// let mut vars = variables!();
/// let left = vars.add_variable();
/// let width = vars.add_variable();
/// let right: Expression = left + width;
/// let center = (left + right) / 2;
/// assert_eq!(center.coefficient(left), 1.);
/// assert_eq!(center.coefficient(width), 0.5);
/// ```
///
/// The solvers never work on expressions directly: each constraint is converted once
/// into a sparse tableau row.
#[derive(Clone, Default)]
pub struct Expression {
    pub(crate) terms: HashMap<Variable, f64>,
    pub(crate) constant: f64,
}

impl Expression {
    /// The zero expression, with room for `capacity` terms
    pub fn with_capacity(capacity: usize) -> Self {
        Expression {
            terms: HashMap::with_capacity_and_hasher(capacity, Default::default()),
            constant: 0.,
        }
    }

    /// Converts anything affine into an expression
    ///
    /// ```
    /// # use cassowary_lp::Expression;
    /// assert_eq!(Expression::from_other_affine(4).constant(), 4.);
    /// ```
    pub fn from_other_affine<E: IntoAffineExpression>(source: E) -> Self {
        source.into_expression()
    }

    /// The required constraint `self <= rhs`
    pub fn leq<RHS>(self, rhs: RHS) -> Constraint
    where
        Expression: Sub<RHS, Output = Expression>,
    {
        constraint::leq(self, rhs)
    }

    /// The required constraint `self >= rhs`
    pub fn geq<RHS>(self, rhs: RHS) -> Constraint
    where
        Expression: Sub<RHS, Output = Expression>,
    {
        constraint::geq(self, rhs)
    }

    /// The required constraint `self == rhs`
    pub fn eq<RHS>(self, rhs: RHS) -> Constraint
    where
        Expression: Sub<RHS, Output = Expression>,
    {
        constraint::eq(self, rhs)
    }

    /// `self += factor * other`
    #[inline]
    pub fn add_mul<N: Into<f64>, E: IntoAffineExpression>(&mut self, factor: N, other: E) {
        let factor = factor.into();
        self.constant += factor * other.constant();
        for (var, coefficient) in other.linear_coefficients() {
            *self.terms.entry(var).or_default() += factor * coefficient;
        }
    }

    /// The value of the expression in a solution.
    /// See [IntoAffineExpression::eval_with].
    pub fn eval_with<S: Solution>(&self, values: &S) -> f64 {
        IntoAffineExpression::eval_with(self, values)
    }

    /// `self += coefficient * var`
    pub fn add_term(&mut self, var: Variable, coefficient: f64) {
        *self.terms.entry(var).or_default() += coefficient;
    }

    /// `self += value`
    pub fn add_constant(&mut self, value: f64) {
        self.constant += value;
    }

    /// The coefficient of a variable, 0 if it does not appear
    pub fn coefficient(&self, var: Variable) -> f64 {
        self.terms.get(&var).copied().unwrap_or(0.)
    }

    pub fn constant(&self) -> f64 {
        self.constant
    }

    /// The variables of the expression with their coefficients, in no particular order
    pub fn terms(&self) -> Terms<'_> {
        Terms(self.terms.iter())
    }

    /// The terms ordered by variable, which keeps printed expressions stable
    pub(crate) fn sorted_terms(&self) -> Vec<(Variable, f64)> {
        let mut terms: Vec<_> = self.terms().collect();
        terms.sort_by_key(|&(var, _)| var);
        terms
    }

    /// Writes the non-zero terms, or `0` if there are none
    pub(crate) fn format_terms<FUN>(
        &self,
        f: &mut Formatter<'_>,
        mut variable_format: FUN,
    ) -> std::fmt::Result
    where
        FUN: FnMut(&mut Formatter<'_>, Variable) -> std::fmt::Result,
    {
        let mut written = 0;
        for (var, coefficient) in self.sorted_terms() {
            if coefficient == 0. {
                continue;
            }
            if written > 0 {
                write!(f, " + ")?;
            }
            if coefficient != 1. {
                write!(f, "{} ", coefficient)?;
            }
            variable_format(f, var)?;
            written += 1;
        }
        if written == 0 {
            write!(f, "0")?;
        }
        Ok(())
    }

    fn has_terms(&self) -> bool {
        self.terms.values().any(|&c| c != 0.)
    }
}

/// The terms of a borrowed [Expression]
pub struct Terms<'a>(std::collections::hash_map::Iter<'a, Variable, f64>);

impl Iterator for Terms<'_> {
    type Item = (Variable, f64);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.0.next().map(|(&var, &coefficient)| (var, coefficient))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

impl IntoAffineExpression for Expression {
    type Iter = std::collections::hash_map::IntoIter<Variable, f64>;

    #[inline]
    fn linear_coefficients(self) -> Self::Iter {
        self.terms.into_iter()
    }

    #[inline]
    fn constant(&self) -> f64 {
        self.constant
    }

    #[inline]
    fn into_expression(self) -> Expression {
        self
    }
}

impl<'a> IntoAffineExpression for &'a Expression {
    type Iter = Terms<'a>;

    #[inline]
    fn linear_coefficients(self) -> Self::Iter {
        self.terms()
    }

    #[inline]
    fn constant(&self) -> f64 {
        self.constant
    }
}

impl PartialEq for Expression {
    fn eq(&self, other: &Self) -> bool {
        self.constant == other.constant && self.terms == other.terms
    }
}

impl FormatWithVars for Expression {
    fn format_with<FUN>(&self, f: &mut Formatter<'_>, variable_format: FUN) -> std::fmt::Result
    where
        FUN: FnMut(&mut Formatter<'_>, Variable) -> std::fmt::Result,
    {
        if !self.has_terms() {
            return write!(f, "{}", self.constant);
        }
        self.format_terms(f, variable_format)?;
        if self.constant != 0. {
            write!(f, " + {}", self.constant)?;
        }
        Ok(())
    }
}

impl Debug for Expression {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        self.format_debug(f)
    }
}

impl<E: IntoAffineExpression> std::iter::Sum<E> for Expression {
    fn sum<I: Iterator<Item = E>>(iter: I) -> Self {
        let mut total = Expression::with_capacity(iter.size_hint().0);
        for item in iter {
            total += item;
        }
        total
    }
}

// Expression on the left

impl<RHS: IntoAffineExpression> AddAssign<RHS> for Expression {
    #[inline]
    fn add_assign(&mut self, rhs: RHS) {
        self.add_mul(1., rhs)
    }
}

impl<RHS: IntoAffineExpression> SubAssign<RHS> for Expression {
    #[inline]
    fn sub_assign(&mut self, rhs: RHS) {
        self.add_mul(-1., rhs)
    }
}

impl<N: Into<f64>> MulAssign<N> for Expression {
    #[inline]
    fn mul_assign(&mut self, rhs: N) {
        let factor = rhs.into();
        self.constant *= factor;
        for coefficient in self.terms.values_mut() {
            *coefficient *= factor;
        }
    }
}

impl<RHS: IntoAffineExpression> Add<RHS> for Expression {
    type Output = Expression;

    fn add(mut self, rhs: RHS) -> Expression {
        self += rhs;
        self
    }
}

impl<RHS: IntoAffineExpression> Sub<RHS> for Expression {
    type Output = Expression;

    fn sub(mut self, rhs: RHS) -> Expression {
        self -= rhs;
        self
    }
}

impl<N: Into<f64>> Mul<N> for Expression {
    type Output = Expression;

    fn mul(mut self, rhs: N) -> Expression {
        self *= rhs;
        self
    }
}

impl<N: Into<f64>> Div<N> for Expression {
    type Output = Expression;

    fn div(mut self, rhs: N) -> Expression {
        self *= 1. / rhs.into();
        self
    }
}

impl Neg for Expression {
    type Output = Expression;

    fn neg(mut self) -> Expression {
        self *= -1.;
        self
    }
}

// Variable on the left

impl<RHS: IntoAffineExpression> Add<RHS> for Variable {
    type Output = Expression;

    fn add(self, rhs: RHS) -> Expression {
        Expression::from(self) + rhs
    }
}

impl<RHS: IntoAffineExpression> Sub<RHS> for Variable {
    type Output = Expression;

    fn sub(self, rhs: RHS) -> Expression {
        Expression::from(self) - rhs
    }
}

impl<RHS: IntoAffineExpression> Add<RHS> for &Variable {
    type Output = Expression;

    fn add(self, rhs: RHS) -> Expression {
        *self + rhs
    }
}

impl<RHS: IntoAffineExpression> Sub<RHS> for &Variable {
    type Output = Expression;

    fn sub(self, rhs: RHS) -> Expression {
        *self - rhs
    }
}

impl<N: Into<f64>> Mul<N> for Variable {
    type Output = Expression;

    fn mul(self, rhs: N) -> Expression {
        let mut product = Expression::with_capacity(1);
        product.add_term(self, rhs.into());
        product
    }
}

impl<N: Into<f64>> Div<N> for Variable {
    type Output = Expression;

    fn div(self, rhs: N) -> Expression {
        self * (1. / rhs.into())
    }
}

impl Neg for Variable {
    type Output = Expression;

    fn neg(self) -> Expression {
        self * -1.
    }
}

// Number on the left

macro_rules! impl_num_lhs_ops {
    ($($num:ty),*) => {$(
        impl From<$num> for Expression {
            fn from(value: $num) -> Expression {
                Expression::from_other_affine(value)
            }
        }

        impl Add<Expression> for $num {
            type Output = Expression;
            fn add(self, rhs: Expression) -> Expression {
                rhs + self
            }
        }

        impl Sub<Expression> for $num {
            type Output = Expression;
            fn sub(self, rhs: Expression) -> Expression {
                -rhs + self
            }
        }

        impl Mul<Expression> for $num {
            type Output = Expression;
            fn mul(self, rhs: Expression) -> Expression {
                rhs * self
            }
        }

        impl Add<Variable> for $num {
            type Output = Expression;
            fn add(self, rhs: Variable) -> Expression {
                rhs + self
            }
        }

        impl Sub<Variable> for $num {
            type Output = Expression;
            fn sub(self, rhs: Variable) -> Expression {
                -rhs + self
            }
        }

        impl Mul<Variable> for $num {
            type Output = Expression;
            fn mul(self, rhs: Variable) -> Expression {
                rhs * self
            }
        }
    )*};
}

impl_num_lhs_ops!(f64, f32, u32, u16, u8, i32, i16, i8);

impl From<Variable> for Expression {
    fn from(var: Variable) -> Expression {
        Expression::from_other_affine(var)
    }
}
