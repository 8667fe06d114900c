//! An incremental two-phase simplex solver.
//!
//! Constraints are added to (and removed from) a [SimplexSolver] one by one.
//! Each insertion keeps the tableau in solved form: when no column of the new row can be made
//! basic directly, a phase-one search with an artificial variable restores feasibility.
//! Every constraint is required: priorities are ignored by this solver.
use fnv::FnvHashMap as HashMap;

use crate::constraint::Constraint;
use crate::solvers::{ObjectiveDirection, ResolutionError, Solution, SolverModel, VariableValues};
use crate::tableau::{is_negative, near_zero, Column, Row, RowInfo, SlackKind, Tableau};
use crate::variable::{ProblemVariables, UnsolvedProblem};
use crate::{constraint, Expression, Variable};

/// The simplex solver, to be used with [UnsolvedProblem::using].
///
/// ```
/// use cassowary_lp::*;
/// let mut vars = variables!();
/// let x = vars.add(variable().min(0));
/// let y = vars.add(variable().min(0));
/// let solution = vars
///     .maximise(5 * x + 3 * y)
///     .using(simplex)
///     .with(constraint!(x + y <= 100))
///     .with(constraint!(4 * x + 2 * y <= 300))
///     .solve()
///     .unwrap();
/// assert!((solution.objective() - 400.).abs() < 1e-8);
/// assert!((solution.value(x) - 50.).abs() < 1e-8);
/// ```
pub fn simplex(to_solve: UnsolvedProblem) -> SimplexProblem {
    let UnsolvedProblem {
        objective,
        direction,
        variables,
    } = to_solve;
    SimplexProblem {
        objective,
        direction,
        variables,
        constraints: vec![],
        non_negative: false,
    }
}

/// A linear program waiting to be solved by the [SimplexSolver]
pub struct SimplexProblem {
    objective: Expression,
    direction: ObjectiveDirection,
    variables: ProblemVariables,
    constraints: Vec<Constraint>,
    non_negative: bool,
}

impl SimplexProblem {
    /// Constrains every variable of the problem to be non-negative,
    /// in addition to its own bounds.
    ///
    /// ```
    /// use cassowary_lp::*;
    /// let mut vars = variables!();
    /// let x = vars.add_variable();
    /// let solution = vars.minimise(x).using(simplex).non_negative().solve().unwrap();
    /// assert_eq!(solution.value(x), 0.);
    /// ```
    pub fn non_negative(mut self) -> Self {
        self.non_negative = true;
        self
    }

    /// The constraints derived from the variable definitions, in variable order
    fn bound_constraints(&self) -> Vec<Constraint> {
        let mut bounds = vec![];
        for (var, def) in self.variables.definitions() {
            if self.non_negative {
                bounds.push(constraint!(var >= 0));
            }
            if def.min.is_finite() {
                bounds.push(constraint!(var >= def.min));
            }
            if def.max.is_finite() {
                bounds.push(constraint!(var <= def.max));
            }
        }
        bounds
    }

    /// Builds an incremental solver containing the objective,
    /// the constraints added so far, then the variable bounds.
    ///
    /// The solver can be modified further before being solved.
    pub fn into_solver(self) -> Result<SimplexSolver, ResolutionError> {
        let bounds = self.bound_constraints();
        let mut solver = SimplexSolver::new(self.direction, self.objective);
        solver.add_constraints(self.constraints.iter().chain(bounds.iter()))?;
        Ok(solver)
    }
}

impl SolverModel for SimplexProblem {
    type Solution = SimplexSolution;
    type Error = ResolutionError;

    fn solve(self) -> Result<Self::Solution, Self::Error> {
        self.into_solver()?.solve()
    }

    fn add_constraint(&mut self, constraint: Constraint) -> Constraint {
        self.constraints.push(constraint.clone());
        constraint
    }

    fn name() -> &'static str {
        "Simplex"
    }
}

/// Linear program solver keeping a tableau in solved form across insertions and removals.
///
/// Cloning the solver is the way to try a modification and roll it back:
/// a failed insertion can leave the tableau partially pivoted.
///
/// ```
/// use cassowary_lp::*;
/// use cassowary_lp::solvers::ObjectiveDirection;
/// let mut vars = variables!();
/// let x = vars.add_variable();
/// let mut solver = SimplexSolver::new(ObjectiveDirection::Maximisation, x.into());
/// let limit = constraint!(x <= 10);
/// solver.add_constraint(&limit).unwrap();
/// assert_eq!(solver.solve().unwrap().value(x), 10.);
/// solver.remove_constraint(&limit).unwrap();
/// solver.add_constraint(&constraint!(x <= 4)).unwrap();
/// assert_eq!(solver.solve().unwrap().value(x), 4.);
/// ```
#[derive(Clone, Debug)]
pub struct SimplexSolver {
    direction: ObjectiveDirection,
    tableau: Tableau,
    marker_variables: HashMap<Constraint, Column>,
    next_column_id: usize,
    needs_optimize: bool,
}

impl SimplexSolver {
    /// Creates a solver with an objective and no constraints
    pub fn new(direction: ObjectiveDirection, objective: Expression) -> Self {
        let mut tableau = Tableau::new();
        let mut row = RowInfo::from(&objective);
        row *= direction.sign();
        tableau.insert_row(Row::Objective, row);
        SimplexSolver {
            direction,
            tableau,
            marker_variables: HashMap::default(),
            next_column_id: 0,
            needs_optimize: false,
        }
    }

    /// The current tableau, for inspection
    pub fn tableau(&self) -> &Tableau {
        &self.tableau
    }

    pub(crate) fn tableau_mut(&mut self) -> &mut Tableau {
        &mut self.tableau
    }

    /// Whether the constraint is currently part of the problem
    pub fn has_constraint(&self, constraint: &Constraint) -> bool {
        self.marker_variables.contains_key(constraint)
    }

    pub(crate) fn register_marker(&mut self, constraint: &Constraint, marker: Column) {
        self.marker_variables.insert(constraint.clone(), marker);
    }

    pub(crate) fn new_slack(&mut self, kind: SlackKind) -> Column {
        Column::Slack(kind, self.next_id())
    }

    pub(crate) fn new_dummy(&mut self) -> Column {
        Column::Dummy(self.next_id())
    }

    fn next_id(&mut self) -> usize {
        let id = self.next_column_id;
        self.next_column_id += 1;
        id
    }

    /// Adds a required constraint.
    /// The tableau is kept feasible, but the objective is only optimized by [SimplexSolver::solve].
    pub fn add_constraint(&mut self, constraint: &Constraint) -> Result<(), ResolutionError> {
        if self.has_constraint(constraint) {
            return Err(ResolutionError::ConstraintExists(constraint.clone()));
        }
        let mut row = self.tableau.parametrize_row_info(&constraint.row_info());
        let marker = if constraint.is_equality() {
            let dummy = self.new_dummy();
            row.add_term(dummy, 1.);
            dummy
        } else {
            let slack = self.new_slack(SlackKind::Slack);
            row.add_term(slack, -1.);
            slack
        };
        self.register_marker(constraint, marker);
        if row.constant() < 0. {
            row *= -1.;
        }
        self.add_row_info(row, &[marker])?;
        tracing::debug!(
            component = "simplex",
            operation = "add_constraint",
            status = "success",
            marker = %marker,
            constraint = ?constraint,
            "Added constraint"
        );
        Ok(())
    }

    /// Adds several constraints, stopping at the first error
    pub fn add_constraints<'a, I>(&mut self, constraints: I) -> Result<(), ResolutionError>
    where
        I: IntoIterator<Item = &'a Constraint>,
    {
        constraints
            .into_iter()
            .try_for_each(|c| self.add_constraint(c))
    }

    /// Inserts a parametrized row with a non-negative constant,
    /// solving it for one of its columns, or through a phase-one search.
    pub(crate) fn add_row_info(
        &mut self,
        mut row: RowInfo,
        candidates: &[Column],
    ) -> Result<(), ResolutionError> {
        self.needs_optimize = true;
        match self.find_basic_column(&row, candidates)? {
            Some(column) => {
                row.solve(column);
                self.tableau.parametrize_rows(column, &row);
                self.tableau.insert_row(Row::Basic(column), row);
                Ok(())
            }
            None => self.add_with_artificial_variable(row),
        }
    }

    /// A column of the row that can be made basic without breaking feasibility:
    /// any user variable (they are unrestricted), or a new slack whose coefficient is negative.
    fn find_basic_column(
        &self,
        row: &RowInfo,
        candidates: &[Column],
    ) -> Result<Option<Column>, ResolutionError> {
        let terms = row.sorted_terms();
        if let Some(&(external, _)) = terms.iter().find(|(c, _)| c.is_external()) {
            return Ok(Some(external));
        }
        let usable_candidate = candidates
            .iter()
            .copied()
            .find(|&c| matches!(c, Column::Slack(..)) && row.coefficient(c) < 0.);
        if usable_candidate.is_some() {
            return Ok(usable_candidate);
        }
        if terms.iter().any(|(c, _)| !c.is_dummy()) {
            return Ok(None);
        }
        // Only dummy terms: the equality is redundant, or contradicts the others.
        // Its own dummy is preferred, the markers of the other equalities stay parametric.
        let own_dummy = candidates
            .iter()
            .copied()
            .find(|&c| c.is_dummy() && row.contains(c));
        match own_dummy.or_else(|| terms.first().map(|&(dummy, _)| dummy)) {
            Some(dummy) if near_zero(row.constant()) => Ok(Some(dummy)),
            _ => Err(ResolutionError::Infeasible),
        }
    }

    fn add_with_artificial_variable(&mut self, row: RowInfo) -> Result<(), ResolutionError> {
        let artificial = Column::Artificial(self.next_id());
        tracing::trace!(
            component = "simplex",
            operation = "phase_one",
            status = "start",
            artificial = %artificial,
            row = %row,
            "Searching a feasible basis"
        );
        self.tableau.insert_row(Row::ArtificialObjective, row.clone());
        self.tableau.insert_row(Row::Basic(artificial), row);
        let optimized = self.optimize(Row::ArtificialObjective);
        let feasible = self
            .tableau
            .row(Row::ArtificialObjective)
            .map_or(true, |az| near_zero(az.constant()));
        let result = match optimized {
            Err(e) => Err(e),
            Ok(()) if !feasible => Err(ResolutionError::Infeasible),
            Ok(()) => {
                self.drive_out_artificial(artificial);
                Ok(())
            }
        };
        self.tableau.remove_row(Row::ArtificialObjective);
        self.tableau.remove_column(artificial);
        let status = if result.is_ok() { "success" } else { "failure" };
        tracing::trace!(
            component = "simplex",
            operation = "phase_one",
            status,
            tableau = %self.tableau,
            "Phase one done"
        );
        result
    }

    /// After a successful phase one, the artificial variable is zero.
    /// If it is still basic, exchange it with another column of its row.
    fn drive_out_artificial(&mut self, artificial: Column) {
        let Some(row) = self.tableau.row(Row::Basic(artificial)) else {
            return;
        };
        let terms = row.sorted_terms();
        let entry = terms
            .iter()
            .find(|(c, _)| c.is_pivotable())
            .or_else(|| terms.iter().find(|(c, _)| c.is_external()))
            .map(|&(c, _)| c);
        match entry {
            Some(entry) => self.tableau.pivot(entry, artificial),
            None => {
                self.tableau.remove_row(Row::Basic(artificial));
            }
        }
    }

    /// Primal simplex on the given objective row.
    /// Bland's rule (smallest column, then smallest row) chooses the pivots.
    pub(crate) fn optimize(&mut self, objective: Row) -> Result<(), ResolutionError> {
        loop {
            let Some(objective_row) = self.tableau.row(objective) else {
                return Ok(());
            };
            let entry = objective_row
                .sorted_terms()
                .into_iter()
                .find(|&(c, coefficient)| c.is_pivotable() && is_negative(coefficient))
                .map(|(c, _)| c);
            let Some(entry) = entry else {
                return Ok(());
            };
            let mut exit = None;
            let mut min_ratio = f64::INFINITY;
            for row in self.tableau.rows_with(entry) {
                if !row.is_pivotable() {
                    continue;
                }
                let Some(info) = self.tableau.row(row) else {
                    continue;
                };
                let coefficient = info.coefficient(entry);
                if coefficient < 0. {
                    let ratio = -info.constant() / coefficient;
                    if ratio < min_ratio {
                        min_ratio = ratio;
                        exit = row.column();
                    }
                }
            }
            let Some(exit) = exit else {
                tracing::debug!(
                    component = "simplex",
                    operation = "optimize",
                    status = "unbounded",
                    entry = %entry,
                    "No row limits the entering column"
                );
                return Err(ResolutionError::Unbounded);
            };
            tracing::trace!(
                component = "simplex",
                operation = "pivot",
                entry = %entry,
                exit = %exit,
                ratio = min_ratio,
                "Pivot"
            );
            self.tableau.pivot(entry, exit);
        }
    }

    /// Dual simplex: restores the feasibility of the rows marked infeasible,
    /// keeping the objective row optimal.
    pub(crate) fn dual_optimize(&mut self) -> Result<(), ResolutionError> {
        while let Some(row) = self.tableau.pop_infeasible_row() {
            let Some(info) = self.tableau.row(row) else {
                continue;
            };
            if !is_negative(info.constant()) {
                continue;
            }
            let Some(exit) = row.column() else {
                continue;
            };
            let objective = self.tableau.row(Row::Objective);
            let mut entry = None;
            let mut min_ratio = f64::INFINITY;
            for (column, coefficient) in info.sorted_terms() {
                if column.is_pivotable() && coefficient > 0. {
                    let cost = objective.map_or(0., |o| o.coefficient(column));
                    let ratio = cost / coefficient;
                    if ratio < min_ratio {
                        min_ratio = ratio;
                        entry = Some(column);
                    }
                }
            }
            let Some(entry) = entry else {
                tracing::debug!(
                    component = "simplex",
                    operation = "dual_optimize",
                    status = "failure",
                    row = %row,
                    tableau = %self.tableau,
                    "No column can restore the row"
                );
                return Err(ResolutionError::DualOptimizeFailed);
            };
            tracing::trace!(
                component = "simplex",
                operation = "dual_pivot",
                entry = %entry,
                exit = %exit,
                "Pivot"
            );
            self.tableau.pivot(entry, exit);
        }
        Ok(())
    }

    /// Removes a constraint added with [SimplexSolver::add_constraint]
    pub fn remove_constraint(&mut self, constraint: &Constraint) -> Result<(), ResolutionError> {
        let marker = self
            .marker_variables
            .remove(constraint)
            .ok_or_else(|| ResolutionError::ConstraintNotFound(constraint.clone()))?;
        self.needs_optimize = true;
        if !self.tableau.is_basic(marker) {
            match self.exit_row_for(marker) {
                Some(exit) => self.tableau.pivot(marker, exit),
                None => self.tableau.remove_column(marker),
            }
        }
        self.tableau.remove_row(Row::Basic(marker));
        tracing::debug!(
            component = "simplex",
            operation = "remove_constraint",
            status = "success",
            marker = %marker,
            constraint = ?constraint,
            "Removed constraint"
        );
        Ok(())
    }

    /// Chooses the row in which a parametric marker becomes basic, so that it can be dropped.
    /// Rows whose feasibility is at stake come first, then any other row.
    fn exit_row_for(&self, marker: Column) -> Option<Column> {
        let rows = self.tableau.rows_with(marker);
        let restricted = |negative: bool| {
            let mut exit = None;
            let mut min_ratio = f64::INFINITY;
            for &row in rows.iter().filter(|r| r.is_restricted()) {
                let Some(info) = self.tableau.row(row) else {
                    continue;
                };
                let coefficient = info.coefficient(marker);
                let ratio = if negative && coefficient < 0. {
                    -info.constant() / coefficient
                } else if !negative && coefficient > 0. {
                    info.constant() / coefficient
                } else {
                    continue;
                };
                if ratio < min_ratio {
                    min_ratio = ratio;
                    exit = row.column();
                }
            }
            exit
        };
        restricted(true)
            .or_else(|| restricted(false))
            .or_else(|| rows.iter().find_map(|row| row.column()))
    }

    /// Optimizes the objective if the problem changed, and reads the solution
    pub fn solve(&mut self) -> Result<SimplexSolution, ResolutionError> {
        if self.needs_optimize {
            self.optimize(Row::Objective)?;
            self.needs_optimize = false;
        }
        Ok(self.evaluate_solution())
    }

    pub(crate) fn evaluate_values(&self) -> VariableValues {
        self.tableau.external_values().collect()
    }

    fn evaluate_solution(&self) -> SimplexSolution {
        let constant = self
            .tableau
            .row(Row::Objective)
            .map_or(0., RowInfo::constant);
        SimplexSolution {
            objective: self.direction.sign() * constant,
            values: self.evaluate_values(),
        }
    }
}

/// The optimal values found by the [SimplexSolver]
#[derive(Clone, Debug, PartialEq)]
pub struct SimplexSolution {
    objective: f64,
    values: VariableValues,
}

impl SimplexSolution {
    /// The value of the objective function at the optimum
    pub fn objective(&self) -> f64 {
        self.objective
    }

    /// The variable values. Variables that appear in no constraint are absent.
    pub fn values(&self) -> &VariableValues {
        &self.values
    }

    pub fn into_values(self) -> VariableValues {
        self.values
    }
}

impl Solution for SimplexSolution {
    fn value(&self, variable: Variable) -> f64 {
        self.values.value(variable)
    }
}
