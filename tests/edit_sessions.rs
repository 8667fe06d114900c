use cassowary_lp::{constraint, variables, CassowarySolver, Priority, ResolutionError, Solution};
use float_eq::assert_float_eq;
#[cfg(target_arch = "wasm32")]
use wasm_bindgen_test::*;

#[test]
#[cfg_attr(target_arch = "wasm32", wasm_bindgen_test)]
fn edit_a_midpoint() {
    let mut vars = variables!();
    let x1 = vars.add_variable();
    let x2 = vars.add_variable();
    let x3 = vars.add_variable();
    let mut solver = CassowarySolver::new();
    solver
        .add_constraints(&[
            constraint!(x3 == (x1 + x2) / 2),
            constraint!(x2 == x1 + 10),
            constraint!(x2 <= 100),
            constraint!(x1 >= 0),
        ])
        .unwrap();
    let solution = solver.solve().unwrap();
    assert_float_eq!(solution.value(x1), 90., abs <= 1e-8);
    assert_float_eq!(solution.value(x2), 100., abs <= 1e-8);
    assert_float_eq!(solution.value(x3), 95., abs <= 1e-8);

    solver.begin_edit(|edit| edit.add_edit_variable(x3, None)).unwrap();
    let values = solver.suggest(|s| s.suggest_value(x3, 90.)).unwrap();
    assert_float_eq!(values.value(x1), 85., abs <= 1e-8);
    assert_float_eq!(values.value(x2), 95., abs <= 1e-8);
    assert_float_eq!(values.value(x3), 90., abs <= 1e-8);
    solver.end_edit().unwrap();
}

#[test]
#[cfg_attr(target_arch = "wasm32", wasm_bindgen_test)]
fn drag_the_midpoint_with_stays() {
    let mut vars = variables!();
    let xl = vars.add_variable();
    let xm = vars.add_variable();
    let xr = vars.add_variable();
    let mut solver = CassowarySolver::new();
    solver
        .add_constraints(&[
            constraint!(2 * xm == xl + xr),
            constraint!(xl + 10 <= xr),
            constraint!(xr <= 100),
            constraint!(0 <= xl),
        ])
        .unwrap();
    solver
        .begin_edit(|edit| {
            edit.add_stay_variable(xl, 30., Priority::MEDIUM)?;
            edit.add_stay_variable(xr, 70., Priority::LOW)?;
            edit.add_edit_variable(xm, Priority::HIGH)
        })
        .unwrap();
    let solution = solver.solve().unwrap();
    assert_float_eq!(solution.value(xl), 90., abs <= 1e-8);
    assert_float_eq!(solution.value(xm), 95., abs <= 1e-8);
    assert_float_eq!(solution.value(xr), 100., abs <= 1e-8);

    let values = solver.suggest(|s| s.suggest_value(xm, 60.)).unwrap();
    assert_float_eq!(values.value(xl), 30., abs <= 1e-8);
    assert_float_eq!(values.value(xm), 60., abs <= 1e-8);
    assert_float_eq!(values.value(xr), 90., abs <= 1e-8);

    let values = solver.suggest(|s| s.suggest_value(xm, 90.)).unwrap();
    assert_float_eq!(values.value(xl), 80., abs <= 1e-8);
    assert_float_eq!(values.value(xm), 90., abs <= 1e-8);
    assert_float_eq!(values.value(xr), 100., abs <= 1e-8);
    solver.end_edit().unwrap();
}

#[test]
#[cfg_attr(target_arch = "wasm32", wasm_bindgen_test)]
fn successive_required_edits() {
    let mut vars = variables!();
    let x1 = vars.add_variable();
    let x2 = vars.add_variable();
    let mut solver = CassowarySolver::new();
    solver
        .begin_edit(|edit| edit.add_stay_variable(x1, None, None))
        .unwrap();
    solver.add_constraint(&constraint!(x1 == x2)).unwrap();

    solver
        .begin_edit(|edit| edit.add_edit_variable(x1, Priority::REQUIRED))
        .unwrap();
    let values = solver.suggest(|s| s.suggest_value(x1, 32.)).unwrap();
    assert_float_eq!(values.value(x1), 32., abs <= 1e-8);
    assert_float_eq!(values.value(x2), 32., abs <= 1e-8);
    solver.end_edit().unwrap();

    solver
        .begin_edit(|edit| edit.add_edit_variable(x1, Priority::REQUIRED))
        .unwrap();
    let values = solver.suggest(|s| s.suggest_value(x1, 10.)).unwrap();
    assert_float_eq!(values.value(x1), 10., abs <= 1e-8);
    assert_float_eq!(values.value(x2), 10., abs <= 1e-8);
    solver.end_edit().unwrap();
    solver.end_edit().unwrap();
}

#[test]
#[cfg_attr(target_arch = "wasm32", wasm_bindgen_test)]
fn nested_sessions() {
    let mut vars = variables!();
    let x = vars.add_variable();
    let y = vars.add_variable();
    let mut solver = CassowarySolver::new();
    solver.begin_edit(|edit| edit.add_edit_variable(x, None)).unwrap();
    let values = solver.suggest(|s| s.suggest_value(x, 10.)).unwrap();
    assert_float_eq!(values.value(x), 10., abs <= 1e-8);

    solver.begin_edit(|edit| edit.add_edit_variable(y, None)).unwrap();
    let values = solver
        .suggest(|s| {
            s.suggest_value(y, 20.)?;
            s.suggest_value(x, 30.)
        })
        .unwrap();
    assert_float_eq!(values.value(x), 30., abs <= 1e-8);
    assert_float_eq!(values.value(y), 20., abs <= 1e-8);
    solver.end_edit().unwrap();
    assert_float_eq!(solver.cached_solution().value(x), 30., abs <= 1e-8);

    let values = solver.suggest(|s| s.suggest_value(x, 50.)).unwrap();
    assert_float_eq!(values.value(x), 50., abs <= 1e-8);
    assert_eq!(
        solver.suggest(|s| s.suggest_value(y, 1.)),
        Err(ResolutionError::EditVariableNotFound {
            variable: y,
            value: 1.
        })
    );
    solver.end_edit().unwrap();
}

#[test]
#[cfg_attr(target_arch = "wasm32", wasm_bindgen_test)]
fn stays_keep_their_value() {
    let mut vars = variables!();
    let x = vars.add_variable();
    let y = vars.add_variable();
    let mut solver = CassowarySolver::new();
    solver
        .begin_edit(|edit| edit.add_stay_variable(x, 5., None))
        .unwrap();
    solver.add_constraint(&constraint!(y == x + 1)).unwrap();
    let solution = solver.solve().unwrap();
    assert_float_eq!(solution.value(x), 5., abs <= 1e-8);
    assert_float_eq!(solution.value(y), 6., abs <= 1e-8);
}

#[test]
#[cfg_attr(target_arch = "wasm32", wasm_bindgen_test)]
fn stay_with_each_relation() {
    let relations = ["==", ">=", "<="];
    for relation in relations {
        let mut vars = variables!();
        let left = vars.add_variable();
        let width = vars.add_variable();
        let mut solver = CassowarySolver::new();
        solver
            .begin_edit(|edit| edit.add_stay_variable(width, 10., None))
            .unwrap();
        let sum = match relation {
            "==" => constraint!(left + width == 100),
            ">=" => constraint!(left + width >= 100),
            _ => constraint!(left + width <= 100),
        };
        solver.add_constraint(&sum).unwrap();
        let solution = solver.solve().unwrap();
        assert_float_eq!(solution.value(left), 90., abs <= 1e-8);
        assert_float_eq!(solution.value(width), 10., abs <= 1e-8);
    }
}

#[test]
#[cfg_attr(target_arch = "wasm32", wasm_bindgen_test)]
fn duplicate_registrations() {
    let mut vars = variables!();
    let x = vars.add_variable();
    let mut solver = CassowarySolver::new();
    solver
        .begin_edit(|edit| {
            edit.add_stay_variable(x, None, None)?;
            edit.add_edit_variable(x, None)
        })
        .unwrap();
    assert_eq!(
        solver.begin_edit(|edit| edit.add_stay_variable(x, None, None)),
        Err(ResolutionError::StayVariableExists(x))
    );
    assert_eq!(
        solver.begin_edit(|edit| edit.add_edit_variable(x, None)),
        Err(ResolutionError::EditVariableExists(x))
    );
    solver.end_edit().unwrap();
    solver.end_edit().unwrap();
}
