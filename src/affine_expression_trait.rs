//! Anything of the form `2 left + width - 10` can be used where the solvers expect an expression:
//! numbers, variables, references to them, and [Expression](crate::Expression) itself.
use crate::constraint::{Constraint, Relation};
use crate::{Expression, Solution, Variable};

/// A linear combination of variables plus a constant
pub trait IntoAffineExpression {
    /// The iterator returned by [`linear_coefficients`](IntoAffineExpression::linear_coefficients).
    type Iter: IntoIterator<Item = (Variable, f64)>;

    /// The variables and their coefficients.
    /// `left + 2 width - 3 left - 7` yields `[(left, -2), (width, 2)]`
    fn linear_coefficients(self) -> Self::Iter;

    /// The constant term: `-7` for `left + 2 width - 7`
    #[inline]
    fn constant(&self) -> f64 {
        0.
    }

    /// Collects the terms into an [Expression]
    fn into_expression(self) -> Expression
    where
        Self: Sized,
    {
        let mut expression = Expression::with_capacity(0);
        expression.add_constant(self.constant());
        for (var, coefficient) in self.linear_coefficients() {
            expression.add_term(var, coefficient);
        }
        expression
    }

    /// The value of the expression for the given variable values
    ///
    /// ```rust
    /// use cassowary_lp::{constraint, variables, CassowarySolver, IntoAffineExpression};
    /// let mut vars = variables!();
    /// let left = vars.add_variable();
    /// let width = vars.add_variable();
    /// let mut solver = CassowarySolver::new();
    /// solver.add_constraints(&[constraint!(left == 15), constraint!(width == 30)])?;
    /// let values = solver.solve()?;
    /// assert_eq!((left + width).eval_with(&values), 45.);
    /// # use cassowary_lp::ResolutionError;
    /// # Ok::<_, ResolutionError>(())
    /// ```
    ///
    /// Any [std::collections::HashMap] from variables to numbers is a [Solution]:
    ///
    /// ```rust
    /// use std::collections::HashMap;
    /// use cassowary_lp::{variables, IntoAffineExpression};
    /// let mut vars = variables!();
    /// let a = vars.add_variable();
    /// let b = vars.add_variable();
    /// let values: HashMap<_, _> = vec![(a, 3), (b, 10)].into_iter().collect();
    /// assert_eq!((a + b / 2).eval_with(&values), 8.);
    /// ```
    fn eval_with<S: Solution>(self, values: &S) -> f64
    where
        Self: Sized,
    {
        let constant = self.constant();
        self.linear_coefficients()
            .into_iter()
            .fold(constant, |total, (var, coefficient)| {
                total + coefficient * values.value(var)
            })
    }

    /// The required constraint `self <= rhs`
    ///
    /// ```rust
    /// use cassowary_lp::{variables, IntoAffineExpression, Relation};
    /// let mut vars = variables!();
    /// let x = vars.add_variable();
    /// assert_eq!(x.leq(10).relation(), Relation::LessOrEqual);
    /// ```
    fn leq<R: IntoAffineExpression>(self, rhs: R) -> Constraint
    where
        Self: Sized,
    {
        Constraint::new(self.into_expression() - rhs.into_expression(), Relation::LessOrEqual)
    }

    /// The required constraint `self >= rhs`
    fn geq<R: IntoAffineExpression>(self, rhs: R) -> Constraint
    where
        Self: Sized,
    {
        Constraint::new(self.into_expression() - rhs.into_expression(), Relation::GreaterOrEqual)
    }

    /// The required constraint `self == rhs`
    fn equals<R: IntoAffineExpression>(self, rhs: R) -> Constraint
    where
        Self: Sized,
    {
        Constraint::new(self.into_expression() - rhs.into_expression(), Relation::Equal)
    }
}

macro_rules! impl_affine_for_num {
    ($($num:ty),*) => {$(
        impl IntoAffineExpression for $num {
            type Iter = std::iter::Empty<(Variable, f64)>;

            #[inline]
            fn linear_coefficients(self) -> Self::Iter {
                std::iter::empty()
            }

            #[inline]
            fn constant(&self) -> f64 {
                f64::from(*self)
            }
        }
    )*};
}

impl_affine_for_num!(f64, f32, u32, u16, u8, i32, i16, i8);
