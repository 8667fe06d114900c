//! Interactive editing: stay variables resist change, edit variables receive suggested values.
//!
//! ```
//! use cassowary_lp::*;
//! let mut vars = variables!();
//! let left = vars.add_variable();
//! let width = vars.add_variable();
//! let mut solver = CassowarySolver::new();
//! solver.add_constraint(&constraint!(width >= 10)).unwrap();
//! solver
//!     .begin_edit(|edit| {
//!         edit.add_stay_variable(width, 50., None)?;
//!         edit.add_edit_variable(left, None)
//!     })
//!     .unwrap();
//! let values = solver.suggest(|s| s.suggest_value(left, 120.)).unwrap();
//! assert!((values.value(left) - 120.).abs() < 1e-8);
//! assert!((values.value(width) - 50.).abs() < 1e-8);
//! solver.end_edit().unwrap();
//! ```
use std::collections::BTreeMap;

use super::{CassowarySolver, Markers};
use crate::constraint::{self, Constraint};
use crate::priority::Priority;
use crate::solvers::{ResolutionError, VariableValues};
use crate::tableau::{near_zero, Row};
use crate::Variable;

#[derive(Clone, Debug)]
struct StayInfo {
    constraint: Constraint,
}

#[derive(Clone, Debug)]
struct EditInfo {
    constraint: Constraint,
    /// The constant of the edit constraint, i.e. the last suggested value
    previous_constant: f64,
}

/// The stay and edit variables registered by one [begin_edit](CassowarySolver::begin_edit)
#[derive(Clone, Debug, Default)]
pub(super) struct EditSession {
    stays: BTreeMap<Variable, StayInfo>,
    edits: BTreeMap<Variable, EditInfo>,
}

/// Registers the stay and edit variables of a new edit session.
/// Passed to the closure given to [CassowarySolver::begin_edit].
pub struct BeginEditProxy {
    solver: CassowarySolver,
    session: EditSession,
}

impl BeginEditProxy {
    /// Pins a variable to a value (its current value when `value` is `None`),
    /// with the given priority ([Priority::LOW] when `None`).
    pub fn add_stay_variable(
        &mut self,
        variable: Variable,
        value: impl Into<Option<f64>>,
        priority: impl Into<Option<Priority>>,
    ) -> Result<(), ResolutionError> {
        let already_staying = self.session.stays.contains_key(&variable)
            || self
                .solver
                .edit_sessions
                .iter()
                .any(|s| s.stays.contains_key(&variable));
        if already_staying {
            return Err(ResolutionError::StayVariableExists(variable));
        }
        let value = value
            .into()
            .unwrap_or_else(|| self.solver.value(variable));
        let priority = priority.into().unwrap_or(Priority::LOW);
        let constraint = constraint::eq(variable, value).with_priority(priority);
        self.solver.add_constraint(&constraint)?;
        self.session.stays.insert(variable, StayInfo { constraint });
        Ok(())
    }

    /// Makes a variable suggestible, starting from its current value,
    /// with the given priority ([Priority::HIGH] when `None`).
    pub fn add_edit_variable(
        &mut self,
        variable: Variable,
        priority: impl Into<Option<Priority>>,
    ) -> Result<(), ResolutionError> {
        if self.solver.find_edit(variable).is_some() || self.session.edits.contains_key(&variable) {
            return Err(ResolutionError::EditVariableExists(variable));
        }
        let current = self.solver.value(variable);
        let priority = priority.into().unwrap_or(Priority::HIGH);
        let constraint = constraint::eq(current - variable, 0.).with_priority(priority);
        self.solver.add_constraint(&constraint)?;
        self.session.edits.insert(
            variable,
            EditInfo {
                constraint,
                previous_constant: current,
            },
        );
        Ok(())
    }
}

/// Collects suggested values for edit variables.
/// Passed to the closure given to [CassowarySolver::suggest].
pub struct SuggestProxy<'a> {
    solver: &'a CassowarySolver,
    suggestions: Vec<(Variable, f64)>,
}

impl SuggestProxy<'_> {
    /// Suggests a new value for an edit variable of any open session
    pub fn suggest_value(&mut self, variable: Variable, value: f64) -> Result<(), ResolutionError> {
        if self.solver.find_edit(variable).is_none() {
            return Err(ResolutionError::EditVariableNotFound { variable, value });
        }
        self.suggestions.push((variable, value));
        Ok(())
    }
}

impl CassowarySolver {
    /// Opens a nested edit session.
    ///
    /// The closure registers stay and edit variables. Registration is atomic:
    /// if the closure or the following optimization fails, the solver is left unchanged.
    pub fn begin_edit<F>(&mut self, register: F) -> Result<(), ResolutionError>
    where
        F: FnOnce(&mut BeginEditProxy) -> Result<(), ResolutionError>,
    {
        let mut proxy = BeginEditProxy {
            solver: self.clone(),
            session: EditSession::default(),
        };
        register(&mut proxy)?;
        let BeginEditProxy {
            mut solver,
            session,
        } = proxy;
        let (stays, edits) = (session.stays.len(), session.edits.len());
        solver.edit_sessions.push(session);
        solver.simplex.tableau_mut().clear_infeasible_rows();
        solver.reset_stay_constants();
        solver.simplex.optimize(Row::Objective)?;
        *self = solver;
        tracing::debug!(
            component = "cassowary",
            operation = "begin_edit",
            status = "success",
            depth = self.edit_sessions.len(),
            stays,
            edits,
            "Opened edit session"
        );
        Ok(())
    }

    /// Closes the innermost edit session, and removes the constraints of its
    /// stay and edit variables. Does nothing when no session is open.
    pub fn end_edit(&mut self) -> Result<(), ResolutionError> {
        let Some(session) = self.edit_sessions.pop() else {
            return Ok(());
        };
        for edit in session.edits.values() {
            self.remove_constraint(&edit.constraint)?;
        }
        for stay in session.stays.values() {
            self.remove_constraint(&stay.constraint)?;
        }
        self.cached_solution = self.simplex.evaluate_values();
        tracing::debug!(
            component = "cassowary",
            operation = "end_edit",
            status = "success",
            depth = self.edit_sessions.len(),
            "Closed edit session"
        );
        Ok(())
    }

    /// Suggests values for edit variables, then re-solves with the dual simplex.
    ///
    /// Every suggestion is checked before the tableau is modified,
    /// so an unknown edit variable leaves the solver unchanged.
    pub fn suggest<F>(&mut self, suggestions: F) -> Result<VariableValues, ResolutionError>
    where
        F: FnOnce(&mut SuggestProxy<'_>) -> Result<(), ResolutionError>,
    {
        let mut proxy = SuggestProxy {
            solver: self,
            suggestions: vec![],
        };
        suggestions(&mut proxy)?;
        let suggestions = proxy.suggestions;
        for (variable, value) in suggestions {
            self.apply_suggestion(variable, value)?;
        }
        self.resolve_suggestions()?;
        Ok(self.cached_solution.clone())
    }

    /// Suggests a value for one edit variable.
    /// The next [solve](CassowarySolver::solve) runs the dual simplex.
    pub fn suggest_value(&mut self, variable: Variable, value: f64) -> Result<(), ResolutionError> {
        self.apply_suggestion(variable, value)?;
        self.needs_dual = true;
        Ok(())
    }

    /// The edit constraint of a variable, innermost session first
    fn find_edit(&self, variable: Variable) -> Option<&EditInfo> {
        self.edit_sessions
            .iter()
            .rev()
            .find_map(|s| s.edits.get(&variable))
    }

    /// Shifts the constant of an edit constraint in the tableau
    fn apply_suggestion(&mut self, variable: Variable, value: f64) -> Result<(), ResolutionError> {
        let edit = self
            .edit_sessions
            .iter_mut()
            .rev()
            .find_map(|s| s.edits.get_mut(&variable))
            .ok_or(ResolutionError::EditVariableNotFound { variable, value })?;
        let delta = value - edit.previous_constant;
        edit.previous_constant = value;
        let constraint = edit.constraint.clone();
        let markers = self
            .markers
            .get(&constraint)
            .copied()
            .ok_or_else(|| ResolutionError::ConstraintNotFound(constraint.clone()))?;
        tracing::trace!(
            component = "cassowary",
            operation = "suggest_value",
            variable = variable.index(),
            value,
            delta,
            "Suggested value"
        );
        self.shift_constant(markers, delta)
    }

    /// Adds `delta` to the constant of an equality whose error columns are `markers`.
    ///
    /// A required equality has a single dummy column, with coefficient `+1`, like the
    /// negative error column of an optional equality.
    /// Fails when a basic dummy moves away from zero, since dummies never pivot.
    fn shift_constant(&mut self, markers: Markers, delta: f64) -> Result<(), ResolutionError> {
        let (plus, minus) = match markers.sub {
            Some(sub) => (Some(markers.main), sub),
            None => (None, markers.main),
        };
        let tableau = self.simplex.tableau_mut();
        let shifted = if let Some(plus) = plus.filter(|&p| tableau.is_basic(p)) {
            vec![(Row::Basic(plus), delta)]
        } else if tableau.is_basic(minus) {
            vec![(Row::Basic(minus), -delta)]
        } else {
            tableau
                .rows_with(minus)
                .into_iter()
                .map(|row| {
                    let coefficient = tableau.row(row).map_or(0., |r| r.coefficient(minus));
                    (row, coefficient * delta)
                })
                .collect()
        };
        let mut broken = false;
        for (row, row_delta) in shifted {
            let constant = tableau.add_to_constant(row, row_delta);
            let is_dummy_row = matches!(row, Row::Basic(column) if column.is_dummy());
            broken |= is_dummy_row && constant.map_or(false, |c| !near_zero(c));
        }
        self.sync_objective_constant();
        if broken {
            tracing::debug!(
                component = "cassowary",
                operation = "suggest_value",
                status = "failure",
                delta,
                "Suggestion breaks a required equality"
            );
            return Err(ResolutionError::DualOptimizeFailed);
        }
        Ok(())
    }

    /// Restores feasibility after suggestions, and caches the new solution
    pub(super) fn resolve_suggestions(&mut self) -> Result<(), ResolutionError> {
        self.needs_dual = false;
        self.simplex.dual_optimize()?;
        self.cached_solution = self.simplex.evaluate_values();
        self.simplex.tableau_mut().clear_infeasible_rows();
        self.reset_stay_constants();
        Ok(())
    }

    /// Sets the basic error variable of every stay constraint to zero,
    /// so that stays hold the variables at their current values.
    pub fn reset_stay_constants(&mut self) {
        let stays: Vec<Markers> = self
            .edit_sessions
            .iter()
            .flat_map(|s| s.stays.values())
            .filter_map(|stay| self.markers.get(&stay.constraint).copied())
            .filter(|markers| markers.sub.is_some())
            .collect();
        let tableau = self.simplex.tableau_mut();
        for markers in stays {
            let basic = std::iter::once(markers.main)
                .chain(markers.sub)
                .find(|&c| tableau.is_basic(c));
            if let Some(error) = basic {
                tableau.set_constant(Row::Basic(error), 0.);
            }
        }
        self.sync_objective_constant();
    }
}
