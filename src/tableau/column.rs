use std::fmt::{Display, Formatter};

use crate::Variable;

/// Slack-like variables: they are non-negative and can enter or leave the basis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SlackKind {
    /// Measures the violation of an optional constraint
    Error,
    /// Turns an inequality into an equality
    Slack,
}

/// A column of the tableau, i.e. a variable of the linear program.
///
/// The derived ordering (external variables, then error and slack variables,
/// then dummies, then artificial variables, each ordered by creation) is the
/// tie-break used when choosing pivots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Column {
    /// A variable created by the user, whose value is reported in solutions
    External(Variable),
    /// A synthesized slack or error variable
    Slack(SlackKind, usize),
    /// Marks an equality row. Never enters the basis.
    Dummy(usize),
    /// Exists only during a phase-one search
    Artificial(usize),
}

impl Column {
    /// Must be solved and reported
    pub fn is_external(&self) -> bool {
        matches!(self, Column::External(_))
    }

    /// Marks equality constraints, excluded from entering the basis
    pub fn is_dummy(&self) -> bool {
        matches!(self, Column::Dummy(_))
    }

    /// Eligible to enter or exit the basis during optimization
    pub fn is_pivotable(&self) -> bool {
        matches!(self, Column::Slack(..) | Column::Artificial(_))
    }

    /// Must remain non-negative
    pub fn is_restricted(&self) -> bool {
        !self.is_external()
    }

    /// The user variable behind an external column
    pub fn external(&self) -> Option<Variable> {
        match self {
            Column::External(var) => Some(*var),
            _ => None,
        }
    }
}

impl From<Variable> for Column {
    fn from(var: Variable) -> Self {
        Column::External(var)
    }
}

impl Display for Column {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Column::External(var) => write!(f, "v{}", var.index()),
            Column::Slack(SlackKind::Error, id) => write!(f, "e{}", id),
            Column::Slack(SlackKind::Slack, id) => write!(f, "s{}", id),
            Column::Dummy(id) => write!(f, "d{}", id),
            Column::Artificial(id) => write!(f, "a{}", id),
        }
    }
}

/// A row of the tableau: either the row defining a basic column,
/// or one of the two objective rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Row {
    /// `column = constant + sum(coefficient * parametric column)`
    Basic(Column),
    /// The function being minimised
    Objective,
    /// The sum of the infeasibilities, minimised during a phase-one search
    ArtificialObjective,
}

impl Row {
    /// The column this row defines, if it is not an objective row
    pub fn column(&self) -> Option<Column> {
        match self {
            Row::Basic(column) => Some(*column),
            Row::Objective | Row::ArtificialObjective => None,
        }
    }

    pub fn is_external(&self) -> bool {
        self.column().map_or(false, |c| c.is_external())
    }

    pub fn is_pivotable(&self) -> bool {
        self.column().map_or(false, |c| c.is_pivotable())
    }

    pub fn is_restricted(&self) -> bool {
        self.column().map_or(false, |c| c.is_restricted())
    }
}

impl From<Column> for Row {
    fn from(column: Column) -> Self {
        Row::Basic(column)
    }
}

impl Display for Row {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Row::Basic(column) => write!(f, "{}", column),
            Row::Objective => write!(f, "z"),
            Row::ArtificialObjective => write!(f, "az"),
        }
    }
}
