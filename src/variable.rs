//! Variables are handles into a [ProblemVariables] list, which stores their names and bounds.
//!
//! Only the [simplex](crate::simplex) problem builder reads the bounds.
//! The [CassowarySolver](crate::CassowarySolver) works with bare handles, and bounds
//! are expressed there as ordinary constraints.
use std::collections::Bound;
use std::fmt::{Display, Formatter};
use std::ops::RangeBounds;

use crate::affine_expression_trait::IntoAffineExpression;
use crate::expression::Expression;
use crate::solvers::ObjectiveDirection;

/// A variable of a problem.
///
/// Two variables are equal only if they are the same handle:
///
/// ```
/// # use cassowary_lp::{variable, variables};
/// let mut vars = variables!();
/// let v1 = vars.add(variable().min(1).max(8));
/// let v2 = vars.add(variable().min(1).max(8));
/// assert_ne!(v1, v2);
/// assert_eq!(v1, { v1 });
/// ```
///
/// Variables are ordered by creation. Solvers rely on this order to break ties,
/// which makes their results reproducible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Variable {
    index: usize,
}

impl Variable {
    fn at(index: usize) -> Self {
        Variable { index }
    }

    /// The creation rank of the variable in its [ProblemVariables]
    pub fn index(&self) -> usize {
        self.index
    }
}

impl IntoAffineExpression for Variable {
    type Iter = std::iter::Once<(Variable, f64)>;

    #[inline]
    fn linear_coefficients(self) -> Self::Iter {
        std::iter::once((self, 1.))
    }
}

impl IntoAffineExpression for &Variable {
    type Iter = std::iter::Once<(Variable, f64)>;

    #[inline]
    fn linear_coefficients(self) -> Self::Iter {
        std::iter::once((*self, 1.))
    }
}

/// Something that mentions variables, and can be printed once we know how to print them
pub trait FormatWithVars {
    fn format_with<FUN>(&self, f: &mut Formatter<'_>, variable_format: FUN) -> std::fmt::Result
    where
        FUN: FnMut(&mut Formatter<'_>, Variable) -> std::fmt::Result;

    /// Prints variables as `v0`, `v1`, ...
    fn format_debug(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        self.format_with(f, |f, var| write!(f, "v{}", var.index()))
    }
}

/// The name and bounds of a variable. Build one with [variable()].
#[derive(Clone, PartialEq, Debug)]
pub struct VariableDefinition {
    pub(crate) min: f64,
    pub(crate) max: f64,
    pub(crate) name: String,
}

impl VariableDefinition {
    /// An anonymous variable with no bounds
    pub fn new() -> Self {
        VariableDefinition {
            min: f64::NEG_INFINITY,
            max: f64::INFINITY,
            name: String::new(),
        }
    }

    /// Names the variable. The name is used by [ProblemVariables::display].
    ///
    /// ```
    /// # use cassowary_lp::{variable, variables};
    /// let mut vars = variables!();
    /// let right = vars.add(variable().name("right"));
    /// assert_eq!(vars.display(&(2 * right)).to_string(), "2 right");
    /// ```
    pub fn name<S: Into<String>>(mut self, name: S) -> Self {
        self.name = name.into();
        self
    }

    /// Sets both bounds from a range. Excluded ends are treated as included.
    ///
    /// ```
    /// # use cassowary_lp::variable;
    /// assert_eq!(variable().bounds(0..=10), variable().min(0).max(10));
    /// assert_eq!(variable().bounds(5..), variable().min(5));
    /// ```
    pub fn bounds<N: Into<f64> + Copy, B: RangeBounds<N>>(self, bounds: B) -> Self {
        let min = match bounds.start_bound() {
            Bound::Included(&x) | Bound::Excluded(&x) => x.into(),
            Bound::Unbounded => f64::NEG_INFINITY,
        };
        let max = match bounds.end_bound() {
            Bound::Included(&x) | Bound::Excluded(&x) => x.into(),
            Bound::Unbounded => f64::INFINITY,
        };
        self.min(min).max(max)
    }

    /// `variable >= min`
    pub fn min<N: Into<f64>>(mut self, min: N) -> Self {
        self.min = min.into();
        self
    }

    /// `variable <= max`
    pub fn max<N: Into<f64>>(mut self, max: N) -> Self {
        self.max = max.into();
        self
    }

    /// `min <= variable <= max`
    pub fn clamp<N1: Into<f64>, N2: Into<f64>>(self, min: N1, max: N2) -> Self {
        self.min(min).max(max)
    }
}

impl Default for VariableDefinition {
    fn default() -> Self {
        VariableDefinition::new()
    }
}

/// Starts the definition of a variable
pub fn variable() -> VariableDefinition {
    VariableDefinition::new()
}

/// The variables of a problem, usually created with the [variables!](crate::variables) macro.
#[derive(Default, Clone, Debug)]
pub struct ProblemVariables {
    definitions: Vec<VariableDefinition>,
}

impl ProblemVariables {
    pub fn new() -> Self {
        ProblemVariables::default()
    }

    /// Adds an anonymous unbounded variable
    pub fn add_variable(&mut self) -> Variable {
        self.add(variable())
    }

    /// Adds a variable. `variables!{vars: 2 <= x <= 3;}` is a shorthand for
    ///
    /// ```
    /// # use cassowary_lp::*;
    /// let mut vars = ProblemVariables::new();
    /// let x = vars.add(variable().min(2).max(3).name("x"));
    /// ```
    pub fn add(&mut self, definition: VariableDefinition) -> Variable {
        self.definitions.push(definition);
        Variable::at(self.definitions.len() - 1)
    }

    /// Adds `len` variables sharing the same definition
    ///
    /// ```
    /// use cassowary_lp::*;
    /// variables!{vars: 2 <= x <= 3;}
    /// let ys = vars.add_vector(variable().min(0), 10);
    /// let total: Expression = ys.iter().sum();
    /// let mut model = vars.minimise(total).using(simplex);
    /// for y in ys.iter() {
    ///     model = model.with(constraint!(y >= x));
    /// }
    /// let solution = model.solve().unwrap();
    /// assert!((solution.value(ys[3]) - 2.).abs() < 1e-8);
    /// ```
    pub fn add_vector(&mut self, definition: VariableDefinition, len: usize) -> Vec<Variable> {
        (0..len).map(|_| self.add(definition.clone())).collect()
    }

    /// Sets the objective of a linear program over these variables.
    /// The problem is solved once a solver is chosen with [UnsolvedProblem::using].
    ///
    /// ```
    /// use cassowary_lp::{variables, simplex, SolverModel, Solution};
    /// use cassowary_lp::solvers::ObjectiveDirection;
    /// fn solve(direction: ObjectiveDirection) -> f64 {
    ///     variables!{vars: 2 <= x <= 3;}
    ///     let solution = vars.optimise(direction, x).using(simplex).solve().unwrap();
    ///     solution.value(x)
    /// }
    /// assert_eq!(solve(ObjectiveDirection::Minimisation), 2.);
    /// assert_eq!(solve(ObjectiveDirection::Maximisation), 3.);
    /// ```
    pub fn optimise<E: IntoAffineExpression>(
        self,
        direction: ObjectiveDirection,
        objective: E,
    ) -> UnsolvedProblem {
        let objective = objective.into_expression();
        debug_assert!(
            objective.terms().all(|(var, _)| var.index() < self.len()),
            "the objective mentions a variable of another problem"
        );
        UnsolvedProblem {
            objective,
            direction,
            variables: self,
        }
    }

    /// ```
    /// use cassowary_lp::{variables, simplex, SolverModel, Solution};
    /// variables!{vars: x <= 7;}
    /// let solution = vars.maximise(x).using(simplex).solve().unwrap();
    /// assert_eq!(solution.value(x), 7.);
    /// ```
    pub fn maximise<E: IntoAffineExpression>(self, objective: E) -> UnsolvedProblem {
        self.optimise(ObjectiveDirection::Maximisation, objective)
    }

    /// ```
    /// use cassowary_lp::{variables, simplex, SolverModel, Solution};
    /// variables!{vars: x >= -8;}
    /// let solution = vars.minimise(x).using(simplex).solve().unwrap();
    /// assert_eq!(solution.value(x), -8.);
    /// ```
    pub fn minimise<E: IntoAffineExpression>(self, objective: E) -> UnsolvedProblem {
        self.optimise(ObjectiveDirection::Minimisation, objective)
    }

    /// The variables with their definitions, in creation order
    pub fn definitions(&self) -> impl Iterator<Item = (Variable, &VariableDefinition)> {
        self.definitions
            .iter()
            .enumerate()
            .map(|(index, definition)| (Variable::at(index), definition))
    }

    /// The name of a variable, `None` for anonymous ones
    pub fn name(&self, variable: Variable) -> Option<&str> {
        let definition = self.definitions.get(variable.index())?;
        Some(definition.name.as_str()).filter(|name| !name.is_empty())
    }

    /// Prints an expression or a constraint with variable names.
    /// Anonymous variables print as `v0`, `v1`, ...
    pub fn display<'a, T: FormatWithVars>(&'a self, value: &'a T) -> impl Display + 'a {
        NamedDisplay {
            variables: self,
            value,
        }
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

struct NamedDisplay<'a, T> {
    variables: &'a ProblemVariables,
    value: &'a T,
}

impl<T: FormatWithVars> Display for NamedDisplay<'_, T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        self.value.format_with(f, |f, var| match self.variables.name(var) {
            Some(name) => f.write_str(name),
            None => write!(f, "v{}", var.index()),
        })
    }
}

/// A linear program with an objective but no constraints yet
pub struct UnsolvedProblem {
    pub(crate) objective: Expression,
    pub(crate) direction: ObjectiveDirection,
    pub(crate) variables: ProblemVariables,
}

impl UnsolvedProblem {
    /// Hands the problem over to a solver, such as [simplex](crate::simplex)
    pub fn using<S, G>(self, solver: S) -> G
    where
        S: FnOnce(UnsolvedProblem) -> G,
    {
        solver(self)
    }
}
