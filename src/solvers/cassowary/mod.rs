//! The Cassowary constraint solver.
//!
//! Required constraints hold exactly. Each optional constraint gets error variables,
//! whose violation is penalised in the objective according to the constraint's [Priority](crate::Priority).
//! Constraints can be added and removed at any time, and the solution is kept optimal
//! incrementally.
//!
//! ```
//! use cassowary_lp::*;
//! let mut vars = variables!();
//! let x1 = vars.add_variable();
//! let x2 = vars.add_variable();
//! let mut solver = CassowarySolver::new();
//! solver
//!     .add_constraints(&[
//!         constraint!(x1 + x2 == 5).with_priority(Priority::HIGH),
//!         constraint!(x1 >= 2).with_priority(Priority::HIGH),
//!         constraint!(x2 >= 1).with_priority(Priority::HIGH),
//!         constraint!(x2 == 4).with_priority(Priority::LOW),
//!     ])
//!     .unwrap();
//! let solution = solver.solve().unwrap();
//! assert!((solution.value(x1) - 2.).abs() < 1e-8);
//! assert!((solution.value(x2) - 3.).abs() < 1e-8);
//! ```
use fnv::FnvHashMap as HashMap;

use crate::constraint::Constraint;
use crate::solvers::simplex::SimplexSolver;
use crate::solvers::{ObjectiveDirection, ResolutionError, VariableValues};
use crate::tableau::{Column, Row, RowInfo, SlackKind, Tableau};
use crate::{Expression, Variable};

pub use edit::{BeginEditProxy, SuggestProxy};
use edit::EditSession;

mod edit;

/// The columns synthesized for a constraint.
///
/// `main` is the marker registered in the simplex layer: the dummy of a required equality,
/// the positive error of an optional equality, or the slack of an inequality.
/// `sub` is the second error variable of an optional constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Markers {
    main: Column,
    sub: Option<Column>,
}

/// Incremental solver for prioritized linear constraints
#[derive(Clone, Debug)]
pub struct CassowarySolver {
    simplex: SimplexSolver,
    markers: HashMap<Constraint, Markers>,
    edit_sessions: Vec<EditSession>,
    cached_solution: VariableValues,
    needs_dual: bool,
}

impl Default for CassowarySolver {
    fn default() -> Self {
        CassowarySolver::new()
    }
}

impl CassowarySolver {
    /// A solver without constraints
    pub fn new() -> Self {
        CassowarySolver {
            simplex: SimplexSolver::new(ObjectiveDirection::Minimisation, Expression::default()),
            markers: HashMap::default(),
            edit_sessions: vec![],
            cached_solution: VariableValues::default(),
            needs_dual: false,
        }
    }

    /// Whether the constraint is currently part of the system
    pub fn has_constraint(&self, constraint: &Constraint) -> bool {
        self.markers.contains_key(constraint)
    }

    /// Adds a constraint and re-optimizes.
    ///
    /// On error the solver may be left partially modified:
    /// take a [snapshot](CassowarySolver::snapshot) first to be able to roll back.
    pub fn add_constraint(&mut self, constraint: &Constraint) -> Result<(), ResolutionError> {
        if self.has_constraint(constraint) {
            return Err(ResolutionError::ConstraintExists(constraint.clone()));
        }
        let (row, markers) = self.create_row(constraint);
        self.markers.insert(constraint.clone(), markers);
        let candidates: Vec<Column> = std::iter::once(markers.main).chain(markers.sub).collect();
        self.simplex.add_row_info(row, &candidates)?;
        self.simplex.optimize(Row::Objective)?;
        tracing::debug!(
            component = "cassowary",
            operation = "add_constraint",
            status = "success",
            marker = %markers.main,
            priority = %constraint.priority(),
            constraint = ?constraint,
            "Added constraint"
        );
        Ok(())
    }

    /// Adds constraints one by one, stopping at the first error
    pub fn add_constraints<'a, I>(&mut self, constraints: I) -> Result<(), ResolutionError>
    where
        I: IntoIterator<Item = &'a Constraint>,
    {
        constraints
            .into_iter()
            .try_for_each(|c| self.add_constraint(c))
    }

    /// Translates a constraint into a parametrized tableau row with its marker columns,
    /// and registers the penalties of its error variables in the objective.
    fn create_row(&mut self, constraint: &Constraint) -> (RowInfo, Markers) {
        let mut row = self
            .simplex
            .tableau()
            .parametrize_row_info(&constraint.row_info());
        let weight = constraint.priority().weight();
        let markers = match (constraint.is_equality(), weight) {
            (true, None) => {
                let dummy = self.simplex.new_dummy();
                row.add_term(dummy, 1.);
                Markers {
                    main: dummy,
                    sub: None,
                }
            }
            (true, Some(weight)) => {
                let plus = self.simplex.new_slack(SlackKind::Error);
                let minus = self.simplex.new_slack(SlackKind::Error);
                row.add_term(plus, -1.);
                row.add_term(minus, 1.);
                let tableau = self.simplex.tableau_mut();
                tableau.add_to_objective(plus, weight);
                tableau.add_to_objective(minus, weight);
                Markers {
                    main: plus,
                    sub: Some(minus),
                }
            }
            (false, weight) => {
                let slack = self.simplex.new_slack(SlackKind::Slack);
                row.add_term(slack, -1.);
                let sub = weight.map(|weight| {
                    let error = self.simplex.new_slack(SlackKind::Error);
                    row.add_term(error, 1.);
                    self.simplex.tableau_mut().add_to_objective(error, weight);
                    error
                });
                Markers { main: slack, sub }
            }
        };
        self.simplex.register_marker(constraint, markers.main);
        if row.constant() < 0. {
            row *= -1.;
        }
        (row, markers)
    }

    /// Removes a constraint and re-optimizes
    pub fn remove_constraint(&mut self, constraint: &Constraint) -> Result<(), ResolutionError> {
        let markers = self
            .markers
            .remove(constraint)
            .ok_or_else(|| ResolutionError::ConstraintNotFound(constraint.clone()))?;
        self.reset_stay_constants();
        if let Some(weight) = constraint.priority().weight() {
            for error in error_columns(constraint, markers) {
                self.remove_penalty(error, weight);
            }
        }
        self.simplex.remove_constraint(constraint)?;
        if let Some(sub) = markers.sub.filter(|&sub| sub != markers.main) {
            let tableau = self.simplex.tableau_mut();
            if tableau.is_basic(sub) {
                tableau.remove_row(Row::Basic(sub));
            } else {
                tableau.remove_column(sub);
            }
        }
        self.simplex.optimize(Row::Objective)?;
        tracing::debug!(
            component = "cassowary",
            operation = "remove_constraint",
            status = "success",
            marker = %markers.main,
            constraint = ?constraint,
            "Removed constraint"
        );
        Ok(())
    }

    /// Removes constraints one by one, stopping at the first error
    pub fn remove_constraints<'a, I>(&mut self, constraints: I) -> Result<(), ResolutionError>
    where
        I: IntoIterator<Item = &'a Constraint>,
    {
        constraints
            .into_iter()
            .try_for_each(|c| self.remove_constraint(c))
    }

    /// Subtracts `weight * error` from the objective
    fn remove_penalty(&mut self, error: Column, weight: f64) {
        let tableau = self.simplex.tableau_mut();
        match tableau.row(Row::Basic(error)).cloned() {
            Some(definition) => tableau.add_row_to_objective(&definition, -weight),
            None => tableau.add_to_objective(error, -weight),
        }
    }

    /// Sets the objective constant to the weighted sum of the basic error variables.
    /// Needed after row constants are shifted outside of a pivot.
    fn sync_objective_constant(&mut self) {
        let tableau = self.simplex.tableau();
        let penalty: f64 = self
            .markers
            .iter()
            .filter_map(|(constraint, &markers)| {
                let weight = constraint.priority().weight()?;
                Some((weight, error_columns(constraint, markers)))
            })
            .flat_map(|(weight, errors)| errors.into_iter().map(move |error| (weight, error)))
            .filter_map(|(weight, error)| {
                let row = tableau.row(Row::Basic(error))?;
                Some(weight * row.constant())
            })
            .sum();
        self.simplex
            .tableau_mut()
            .set_constant(Row::Objective, penalty);
    }

    /// Re-optimizes, and returns the values of all the variables in the system.
    ///
    /// After suggestions made with [CassowarySolver::suggest_value],
    /// the dual simplex restores feasibility instead.
    pub fn solve(&mut self) -> Result<VariableValues, ResolutionError> {
        if self.needs_dual {
            self.resolve_suggestions()?;
        } else {
            self.simplex.optimize(Row::Objective)?;
            self.cached_solution = self.simplex.evaluate_values();
        }
        Ok(self.cached_solution.clone())
    }

    /// The values computed by the last [solve](CassowarySolver::solve) or
    /// [suggest](CassowarySolver::suggest)
    pub fn cached_solution(&self) -> &VariableValues {
        &self.cached_solution
    }

    /// The current value of a variable in the tableau
    pub fn value(&self, variable: Variable) -> f64 {
        self.simplex.tableau().value(variable)
    }

    /// The current tableau, for inspection
    pub fn tableau(&self) -> &Tableau {
        self.simplex.tableau()
    }

    /// A deep copy of the solver, to [restore](CassowarySolver::restore) later
    pub fn snapshot(&self) -> CassowarySolver {
        self.clone()
    }

    /// Replaces the whole state of the solver with a snapshot
    pub fn restore(&mut self, snapshot: CassowarySolver) {
        *self = snapshot;
    }
}

/// The error variables of an optional constraint, which are weighted in the objective
fn error_columns(constraint: &Constraint, markers: Markers) -> Vec<Column> {
    if constraint.priority().is_required() {
        return vec![];
    }
    if constraint.is_equality() {
        std::iter::once(markers.main).chain(markers.sub).collect()
    } else {
        markers.sub.into_iter().collect()
    }
}
