//! Constraints define the equalities and inequalities that must (or should) hold in the solution.
use crate::expression::Expression;
use crate::priority::Priority;
use crate::tableau::RowInfo;
use crate::variable::{FormatWithVars, Variable};
use core::fmt::{Debug, Formatter};
use std::hash::{Hash, Hasher};
use std::ops::{Shl, Shr, Sub};
use std::sync::Arc;

/// How the two sides of a constraint compare
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Relation {
    /// `lhs <= rhs`
    LessOrEqual,
    /// `lhs == rhs`
    Equal,
    /// `lhs >= rhs`
    GreaterOrEqual,
}

impl Relation {
    fn symbol(self) -> &'static str {
        match self {
            Relation::LessOrEqual => "<=",
            Relation::Equal => "=",
            Relation::GreaterOrEqual => ">=",
        }
    }
}

struct ConstraintData {
    /// `lhs - rhs`
    expression: Expression,
    relation: Relation,
    priority: Priority,
    name: Option<String>,
}

/// A constraint represents a single (in)equality between two expressions.
///
/// A constraint is a handle: cloning it is cheap, and clones are the *same* constraint.
/// Two constraints built from identical expressions are still different constraints,
/// so keep the handle around if you want to remove the constraint from a solver later.
///
/// ```
/// # use cassowary_lp::*;
/// let mut vars = variables!();
/// let x = vars.add_variable();
/// let a = constraint!(x <= 10);
/// let b = constraint!(x <= 10);
/// assert_eq!(a, a.clone());
/// assert_ne!(a, b);
/// ```
#[derive(Clone)]
pub struct Constraint(Arc<ConstraintData>);

impl Constraint {
    pub(crate) fn new(expression: Expression, relation: Relation) -> Constraint {
        Constraint(Arc::new(ConstraintData {
            expression,
            relation,
            priority: Priority::Required,
            name: None,
        }))
    }

    fn rebuild(&self, priority: Priority, name: Option<String>) -> Constraint {
        Constraint(Arc::new(ConstraintData {
            expression: self.0.expression.clone(),
            relation: self.0.relation,
            priority,
            name,
        }))
    }

    /// Returns a new constraint with the same (in)equality and the given priority.
    /// Only the [CassowarySolver](crate::CassowarySolver) uses priorities;
    /// the [SimplexSolver](crate::SimplexSolver) treats every constraint as required.
    ///
    /// ```
    /// # use cassowary_lp::*;
    /// let mut vars = variables!();
    /// let x = vars.add_variable();
    /// let weak = constraint!(x == 4).with_priority(Priority::LOW);
    /// assert_eq!(weak.priority(), Priority::LOW);
    /// ```
    pub fn with_priority(self, priority: Priority) -> Self {
        self.rebuild(priority, self.0.name.clone())
    }

    /// Returns a new constraint with the same (in)equality and the given name
    pub fn set_name(self, name: String) -> Self {
        self.rebuild(self.0.priority, Some(name))
    }

    /// `lhs - rhs`
    pub fn expression(&self) -> &Expression {
        &self.0.expression
    }

    /// How `lhs` compares to `rhs`
    pub fn relation(&self) -> Relation {
        self.0.relation
    }

    /// The priority of the constraint, [Priority::Required] unless set with [Constraint::with_priority]
    pub fn priority(&self) -> Priority {
        self.0.priority
    }

    /// The name of the constraint, if any
    pub fn name(&self) -> Option<&str> {
        self.0.name.as_deref()
    }

    /// Whether this is an equality constraint
    pub fn is_equality(&self) -> bool {
        self.0.relation == Relation::Equal
    }

    /// The residual row of the constraint, oriented so that it must be `>= 0`
    /// (or `== 0` for equalities).
    pub(crate) fn row_info(&self) -> RowInfo {
        let row = RowInfo::from(self.expression());
        match self.relation() {
            Relation::LessOrEqual => -row,
            Relation::Equal | Relation::GreaterOrEqual => row,
        }
    }
}

impl PartialEq for Constraint {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for Constraint {}

impl Hash for Constraint {
    fn hash<H: Hasher>(&self, state: &mut H) {
        (Arc::as_ptr(&self.0) as usize).hash(state)
    }
}

impl FormatWithVars for Constraint {
    fn format_with<FUN>(&self, f: &mut Formatter<'_>, variable_format: FUN) -> std::fmt::Result
    where
        FUN: FnMut(&mut Formatter<'_>, Variable) -> std::fmt::Result,
    {
        let expression = self.expression();
        expression.format_terms(f, variable_format)?;
        write!(f, " {} ", self.relation().symbol())?;
        write!(f, "{}", -expression.constant)?;
        if let Priority::Optional(strength) = self.priority() {
            write!(f, " | {}", strength)?;
        }
        Ok(())
    }
}

impl Debug for Constraint {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        self.format_debug(f)
    }
}

/// equals
pub fn eq<B, A: Sub<B, Output = Expression>>(a: A, b: B) -> Constraint {
    Constraint::new(a - b, Relation::Equal)
}

/// less than or equal
pub fn leq<B, A: Sub<B, Output = Expression>>(a: A, b: B) -> Constraint {
    Constraint::new(a - b, Relation::LessOrEqual)
}

/// greater than or equal
pub fn geq<B, A: Sub<B, Output = Expression>>(a: A, b: B) -> Constraint {
    Constraint::new(a - b, Relation::GreaterOrEqual)
}

macro_rules! impl_shifts {
    ($($t:ty)*) => {$(
        impl< RHS> Shl<RHS> for $t where Self: Sub<RHS, Output=Expression> {
            type Output = Constraint;

            fn shl(self, rhs: RHS) -> Self::Output {
                leq(self, rhs)
            }
        }

        impl< RHS> Shr<RHS> for $t where Self: Sub<RHS, Output=Expression> {
            type Output = Constraint;

            fn shr(self, rhs: RHS) -> Self::Output {
                geq(self, rhs)
            }
        }
    )*}
}

impl_shifts!(Expression Variable);

/// This macro allows defining constraints using `a + b <= c + d`
/// instead of `(a + b).leq(c + d)` or `a + b << c + d`
///
/// # Example
///
/// ## Create a constraint
///
/// ```
/// # use cassowary_lp::*;
/// # let mut vars = variables!();
/// # let a = vars.add(variable().max(10));
/// # let b = vars.add(variable());
/// let my_inequality = constraint!(a + b >= 3 * b - a);
/// ```
///
/// ## Full example
///
/// ```
/// # use float_eq::assert_float_eq;
/// use cassowary_lp::*;
///
/// let mut vars = variables!();
/// let a = vars.add(variable().max(10));
/// let b = vars.add(variable());
/// let solution = vars
///     .maximise(a + b)
///     .using(simplex)
///     .with(constraint!(a - 5 <= b / 2))
///     .with(constraint!(b == a))
///     .solve().unwrap();
/// assert_float_eq!(10., solution.value(a), abs<=1e-8);
/// assert_float_eq!(10., solution.value(b), abs<=1e-8);
/// ```
#[macro_export]
macro_rules! constraint {
    ([$($left:tt)*] <= $($right:tt)*) => {
        $crate::constraint::leq($($left)*, $($right)*)
    };
    ([$($left:tt)*] >= $($right:tt)*) => {
        $crate::constraint::geq($($left)*, $($right)*)
    };
    ([$($left:tt)*] == $($right:tt)*) => {
        $crate::constraint::eq($($left)*, $($right)*)
    };
    // Stop condition: all token have been processed
    ([$($left:tt)*]) => {
        $($left:tt)*
    };
    // The next token is not a special one
    ([$($left:tt)*] $next:tt $($right:tt)*) => {
        $crate::constraint!([$($left)* $next] $($right)*)
    };
    // Initial rule: start the recursive calls
    ($($all:tt)*) => {
        $crate::constraint!([] $($all)*)
    };
}
