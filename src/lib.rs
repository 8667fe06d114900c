//! Incremental linear constraint solving, with a well-typed modelling layer.
//!
//! Two solvers share the same variables, expressions and constraints:
//!
//! - [simplex] minimises or maximises a linear objective under required constraints,
//!   with a two-phase simplex method.
//! - [CassowarySolver] handles constraints with [priorities](Priority): required ones hold
//!   exactly, optional ones hold as well as their priorities allow. Constraints can be added
//!   and removed incrementally, and variables can be edited interactively, which makes it a
//!   good fit for user interface layout.
//!
//! ```rust
//! use cassowary_lp::{constraint, variables, simplex, SolverModel, Solution};
//!
//! let mut vars = variables!();
//! let a = vars.add_variable();
//! let b = vars.add_variable();
//! let solution = vars.maximise(9. * (a * 2 + b / 3))
//!     .using(simplex)
//!     .with(constraint!(a >= 0))
//!     .with((a + 2.) << b)
//!     .with((3. - a) >> b)
//!     .solve()?;
//!
//! println!("a={}   b={}", solution.value(a), solution.value(b));
//! # use cassowary_lp::ResolutionError;
//! # Ok::<_, ResolutionError>(())
//! ```
//!
//! ```rust
//! use cassowary_lp::{constraint, variables, CassowarySolver, Priority, Solution};
//!
//! let mut vars = variables!();
//! let left = vars.add_variable();
//! let mid = vars.add_variable();
//! let right = vars.add_variable();
//! let mut solver = CassowarySolver::new();
//! solver.add_constraints(&[
//!     constraint!(2 * mid == left + right),
//!     constraint!(left + 10 <= right),
//!     constraint!(right <= 100),
//!     constraint!(0 <= left),
//! ])?;
//! solver.add_constraint(&constraint!(mid == 50).with_priority(Priority::MEDIUM))?;
//! let values = solver.solve()?;
//! assert!((values.value(mid) - 50.).abs() < 1e-8);
//! # use cassowary_lp::ResolutionError;
//! # Ok::<_, ResolutionError>(())
//! ```

pub use affine_expression_trait::IntoAffineExpression;
pub use constraint::{Constraint, Relation};
pub use expression::Expression;
pub use priority::Priority;
pub use solvers::cassowary::{BeginEditProxy, CassowarySolver, SuggestProxy};
pub use solvers::simplex::{simplex, SimplexProblem, SimplexSolution, SimplexSolver};
pub use solvers::{ObjectiveDirection, ResolutionError, Solution, SolverModel, VariableValues};
pub use variable::{variable, FormatWithVars, ProblemVariables, Variable, VariableDefinition};

mod affine_expression_trait;
pub mod constraint;
mod expression;
pub mod priority;
pub mod solvers;
pub mod tableau;
pub mod variable;
mod variables_macro;
