//! The two solvers of this crate, and the traits they share.
//!
//! - [simplex](simplex::simplex) optimizes a linear objective under required constraints.
//! - [CassowarySolver](cassowary::CassowarySolver) satisfies required constraints exactly,
//!   optional ones as well as their priorities allow, and supports interactive edits.
pub mod cassowary;
pub mod simplex;

use crate::variable::Variable;
use crate::{Constraint, IntoAffineExpression};
use fnv::FnvHashMap;
use std::collections::HashMap;
use std::hash::BuildHasher;
use thiserror::Error;

/// Whether to search for the variable values that give the highest
/// or the lowest value of the objective function.
#[derive(Debug, Eq, PartialEq, Clone, Copy)]
pub enum ObjectiveDirection {
    Maximisation,
    Minimisation,
}

impl ObjectiveDirection {
    /// `1` when minimising, `-1` when maximising.
    /// The tableau always minimises `sign * objective`.
    pub(crate) fn sign(self) -> f64 {
        match self {
            ObjectiveDirection::Minimisation => 1.,
            ObjectiveDirection::Maximisation => -1.,
        }
    }
}

/// Represents an error that occurred while modifying or solving a problem
#[derive(Debug, PartialEq, Clone, Error)]
pub enum ResolutionError {
    /// The constraint was already added to this solver
    #[error("constraint already added: {0:?}")]
    ConstraintExists(Constraint),
    /// The variable is already a stay variable of an open edit session
    #[error("variable v{} is already a stay variable", .0.index())]
    StayVariableExists(Variable),
    /// The variable is already an edit variable of an open edit session
    #[error("variable v{} is already an edit variable", .0.index())]
    EditVariableExists(Variable),
    /// The constraint was never added to this solver, or was already removed
    #[error("constraint not found: {0:?}")]
    ConstraintNotFound(Constraint),
    ///  There exists no solution that satisfies all of the required constraints
    #[error("the constraints are infeasible")]
    Infeasible,
    /// The problem is [unbounded](https://www.matem.unam.mx/~omar/math340/unbounded.html).
    /// It doesn't have a finite optimal values for its variables.
    /// The objective can be made infinitely large without violating any constraints.
    #[error("the objective is unbounded")]
    Unbounded,
    /// Feasibility could not be restored after a suggestion:
    /// the suggested value conflicts with required constraints
    #[error("the dual simplex could not restore feasibility")]
    DualOptimizeFailed,
    /// A value was suggested for a variable that no open edit session registered
    #[error("v{} is not an edit variable (suggested value: {value})", .variable.index())]
    EditVariableNotFound {
        /// The variable that received a suggestion
        variable: Variable,
        /// The suggested value
        value: f64,
    },
}

/// A solver's own representation of a model, to which constraints can be added.
pub trait SolverModel {
    /// The type of the solution to the problem
    type Solution: Solution;
    /// The error that can occur while solving the problem
    type Error;

    /// Takes a model and adds a constraint to it
    fn with(mut self, constraint: Constraint) -> Self
    where
        Self: Sized,
    {
        self.add_constraint(constraint);
        self
    }

    /// Find the solution for the problem being modeled
    fn solve(self) -> Result<Self::Solution, Self::Error>;

    /// Adds a constraint to the model and returns its handle
    fn add_constraint(&mut self, c: Constraint) -> Constraint;

    /// Name of the solver, for display purposes
    fn name() -> &'static str;
}

/// A problem solution
pub trait Solution {
    /// Get the optimal value of a variable of the problem
    fn value(&self, variable: Variable) -> f64;

    /// ## Example
    ///
    /// ```rust
    /// use cassowary_lp::{variables, variable, simplex, SolverModel, Solution};
    /// let mut vars = variables!();
    /// let a = vars.add(variable().max(1));
    /// let b = vars.add(variable().max(4));
    /// let objective = a + b;
    /// let solution = vars.maximise(objective.clone()).using(simplex).solve().unwrap();
    /// assert_eq!(solution.eval(&objective), 5.);
    /// ```
    fn eval<E: IntoAffineExpression>(&self, expr: E) -> f64
    where
        Self: Sized,
    {
        expr.eval_with(self)
    }
}

/// Variables missing from the map are worth zero
impl<N: Into<f64> + Clone, S: BuildHasher> Solution for HashMap<Variable, N, S> {
    fn value(&self, variable: Variable) -> f64 {
        self.get(&variable).cloned().map_or(0., Into::into)
    }
}

/// The values of the solved variables
pub type VariableValues = FnvHashMap<Variable, f64>;
