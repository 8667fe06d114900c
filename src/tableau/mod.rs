//! The simplex tableau: a sparse matrix of rows, each defining a basic column
//! in terms of the parametric (non-basic) columns.
//!
//! The tableau keeps an inverse index from every column to the rows that mention it,
//! so that a pivot only touches the rows it has to.
use std::collections::BTreeSet;
use std::fmt::{Display, Formatter};

use fnv::FnvHashMap as HashMap;

pub use column::{Column, Row, SlackKind};
pub use row_info::RowInfo;

use crate::Variable;

mod column;
mod row_info;

/// Absolute tolerance of every comparison to zero
pub const EPSILON: f64 = 1e-8;

/// Whether a value is zero, within [EPSILON]
pub fn near_zero(value: f64) -> bool {
    value.abs() < EPSILON
}

/// Whether a value is negative by more than [EPSILON]
pub(crate) fn is_negative(value: f64) -> bool {
    value < -EPSILON
}

/// The simplex matrix
#[derive(Clone, Debug, Default)]
pub struct Tableau {
    columns: HashMap<Column, BTreeSet<Row>>,
    rows: HashMap<Row, RowInfo>,
    infeasible_rows: BTreeSet<Row>,
    external_basic_rows: BTreeSet<Row>,
    external_parametric_columns: BTreeSet<Column>,
}

impl Tableau {
    pub fn new() -> Self {
        Tableau::default()
    }

    /// The definition of a row
    pub fn row(&self, row: Row) -> Option<&RowInfo> {
        self.rows.get(&row)
    }

    /// Whether a column is currently solved for in some row
    pub fn is_basic(&self, column: Column) -> bool {
        self.rows.contains_key(&Row::Basic(column))
    }

    /// The rows mentioning a parametric column, in row order
    pub fn rows_with(&self, column: Column) -> Vec<Row> {
        self.columns
            .get(&column)
            .map(|rows| rows.iter().copied().collect())
            .unwrap_or_default()
    }

    /// The number of rows, objective rows included
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// The current value of a user variable: the constant of its row if it is basic, else 0
    pub fn value(&self, variable: Variable) -> f64 {
        self.row(Row::Basic(Column::External(variable)))
            .map_or(0., RowInfo::constant)
    }

    /// Values of all the user variables known to the tableau
    pub fn external_values(&self) -> impl Iterator<Item = (Variable, f64)> + '_ {
        let parametric = self
            .external_parametric_columns
            .iter()
            .filter(move |&&c| !self.is_basic(c))
            .filter_map(Column::external)
            .map(|var| (var, 0.));
        let basic = self.external_basic_rows.iter().filter_map(move |&row| {
            let var = row.column()?.external()?;
            Some((var, self.rows.get(&row)?.constant))
        });
        parametric.chain(basic)
    }

    /// Stores a row and indexes all of its columns
    pub fn insert_row(&mut self, row: Row, info: RowInfo) {
        for &column in info.terms.keys() {
            self.columns.entry(column).or_default().insert(row);
            if column.is_external() {
                self.external_parametric_columns.insert(column);
            }
        }
        if row.is_external() {
            self.external_basic_rows.insert(row);
        }
        self.rows.insert(row, info);
    }

    /// Deletes a row and unindexes its columns
    pub fn remove_row(&mut self, row: Row) -> Option<RowInfo> {
        let info = self.rows.remove(&row)?;
        for column in info.terms.keys() {
            unindex(&mut self.columns, *column, row);
        }
        self.infeasible_rows.remove(&row);
        self.external_basic_rows.remove(&row);
        Some(info)
    }

    /// Deletes every reference to a parametric column. This amounts to setting it to zero.
    pub fn remove_column(&mut self, column: Column) {
        if let Some(rows) = self.columns.remove(&column) {
            for row in rows {
                if let Some(info) = self.rows.get_mut(&row) {
                    info.terms.remove(&column);
                }
            }
        }
        self.external_parametric_columns.remove(&column);
    }

    /// Adds `coefficient * column` to a row, keeping the index consistent
    pub fn add_term(&mut self, row: Row, column: Column, coefficient: f64) {
        let info = self.rows.entry(row).or_default();
        info.add_term(column, coefficient);
        if info.contains(column) {
            self.columns.entry(column).or_default().insert(row);
        } else {
            unindex(&mut self.columns, column, row);
        }
    }

    /// Adds a weighted term to the objective row
    pub fn add_to_objective(&mut self, column: Column, coefficient: f64) {
        self.add_term(Row::Objective, column, coefficient);
    }

    /// `objective += multiplier * info`
    pub fn add_row_to_objective(&mut self, info: &RowInfo, multiplier: f64) {
        for (column, coefficient) in info.sorted_terms() {
            self.add_term(Row::Objective, column, coefficient * multiplier);
        }
        self.rows.entry(Row::Objective).or_default().constant += info.constant * multiplier;
    }

    /// Adds `delta` to the constant of a row, and returns the new constant.
    /// A restricted row that becomes negative is marked infeasible.
    pub fn add_to_constant(&mut self, row: Row, delta: f64) -> Option<f64> {
        let info = self.rows.get_mut(&row)?;
        info.constant += delta;
        let constant = info.constant;
        if row.is_restricted() && is_negative(constant) {
            self.infeasible_rows.insert(row);
        }
        Some(constant)
    }

    pub fn set_constant(&mut self, row: Row, constant: f64) {
        if let Some(info) = self.rows.get_mut(&row) {
            info.constant = constant;
        }
    }

    pub fn pop_infeasible_row(&mut self) -> Option<Row> {
        self.infeasible_rows.pop_first()
    }

    pub fn clear_infeasible_rows(&mut self) {
        self.infeasible_rows.clear()
    }

    pub fn infeasible_rows(&self) -> impl Iterator<Item = Row> + '_ {
        self.infeasible_rows.iter().copied()
    }

    /// Makes `entry` basic in the row of `exit`, and substitutes its new definition
    /// in every other row.
    pub fn pivot(&mut self, entry: Column, exit: Column) {
        let Some(mut info) = self.remove_row(Row::Basic(exit)) else {
            return;
        };
        let reciprocal = info.solve(entry);
        info.add_term(exit, reciprocal);
        self.parametrize_rows(entry, &info);
        self.insert_row(Row::Basic(entry), info);
    }

    /// Substitutes `solved = info` in every row that mentions `solved`.
    /// `solved` is no longer parametric afterwards.
    pub fn parametrize_rows(&mut self, solved: Column, info: &RowInfo) {
        let dependents = self.columns.remove(&solved).unwrap_or_default();
        let Tableau {
            columns,
            rows,
            infeasible_rows,
            ..
        } = self;
        for row in dependents {
            let Some(target) = rows.get_mut(&row) else {
                continue;
            };
            let Some(coefficient) = target.terms.remove(&solved) else {
                continue;
            };
            target.constant += coefficient * info.constant;
            for (&column, &value) in &info.terms {
                target.add_term(column, coefficient * value);
                if target.contains(column) {
                    columns.entry(column).or_default().insert(row);
                } else {
                    unindex(columns, column, row);
                }
            }
            if row.is_restricted() && is_negative(target.constant) {
                infeasible_rows.insert(row);
            }
        }
        self.external_parametric_columns.remove(&solved);
    }

    /// Expresses a raw row in terms of parametric columns only,
    /// by substituting the definition of every basic column it mentions.
    pub fn parametrize_row_info(&self, info: &RowInfo) -> RowInfo {
        let mut result = RowInfo::new(info.constant);
        for (column, coefficient) in info.sorted_terms() {
            match self.rows.get(&Row::Basic(column)) {
                Some(definition) => result.add_mul(definition, coefficient),
                None => result.add_term(column, coefficient),
            }
        }
        result
    }
}

fn unindex(columns: &mut HashMap<Column, BTreeSet<Row>>, column: Column, row: Row) {
    if let Some(rows) = columns.get_mut(&column) {
        rows.remove(&row);
        if rows.is_empty() {
            columns.remove(&column);
        }
    }
}

impl Display for Tableau {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let mut rows: Vec<_> = self.rows.iter().collect();
        rows.sort_by_key(|&(row, _)| *row);
        for (row, info) in rows {
            writeln!(f, "{} = {}", row, info)?;
        }
        if !self.infeasible_rows.is_empty() {
            write!(f, "infeasible:")?;
            for row in &self.infeasible_rows {
                write!(f, " {}", row)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::variables;
    use float_eq::assert_float_eq;

    fn slack(id: usize) -> Column {
        Column::Slack(SlackKind::Slack, id)
    }

    #[test]
    fn pivot_exchanges_basic_column() {
        let mut vars = variables!();
        let x = Column::External(vars.add_variable());
        let (s0, s1) = (slack(0), slack(1));
        // s0 = 10 - x, s1 = 4 + x
        let mut r0 = RowInfo::new(10.);
        r0.add_term(x, -1.);
        let mut r1 = RowInfo::new(4.);
        r1.add_term(x, 1.);
        let mut tableau = Tableau::new();
        tableau.insert_row(Row::Basic(s0), r0);
        tableau.insert_row(Row::Basic(s1), r1);
        tableau.add_to_objective(x, -1.);

        tableau.pivot(x, s0);
        // x = 10 - s0, s1 = 14 - s0, z = -10 + s0
        assert!(tableau.is_basic(x) && !tableau.is_basic(s0));
        let s1_row = tableau.row(Row::Basic(s1)).unwrap();
        assert_float_eq!(s1_row.constant(), 14., abs <= 1e-12);
        assert_float_eq!(s1_row.coefficient(s0), -1., abs <= 1e-12);
        let objective = tableau.row(Row::Objective).unwrap();
        assert_float_eq!(objective.constant(), -10., abs <= 1e-12);
        assert_eq!(tableau.rows_with(s0).len(), 3);
        assert!(tableau.rows_with(x).is_empty());
        let values: Vec<_> = tableau.external_values().collect();
        assert_eq!(values.len(), 1);
        assert_float_eq!(values[0].1, 10., abs <= 1e-12);
    }

    #[test]
    fn negative_restricted_rows_are_infeasible() {
        let mut tableau = Tableau::new();
        tableau.insert_row(Row::Basic(slack(0)), RowInfo::new(1.));
        assert_eq!(tableau.add_to_constant(Row::Basic(slack(0)), -3.), Some(-2.));
        assert_eq!(tableau.infeasible_rows().collect::<Vec<_>>(), vec![Row::Basic(slack(0))]);
        tableau.remove_row(Row::Basic(slack(0)));
        assert_eq!(tableau.pop_infeasible_row(), None);
    }

    #[test]
    fn parametrize_a_new_row() {
        let mut vars = variables!();
        let x = Column::External(vars.add_variable());
        let y = Column::External(vars.add_variable());
        let mut tableau = Tableau::new();
        // x = 2 + 3 s0
        let mut definition = RowInfo::new(2.);
        definition.add_term(slack(0), 3.);
        tableau.insert_row(Row::Basic(x), definition);
        // 1 + x - y  becomes  3 + 3 s0 - y
        let mut raw = RowInfo::new(1.);
        raw.add_term(x, 1.);
        raw.add_term(y, -1.);
        let row = tableau.parametrize_row_info(&raw);
        assert_eq!(row.to_string(), "3 + -1 v1 + 3 s0");
    }
}
