use cassowary_lp::{constraint, variables, CassowarySolver, Priority, ResolutionError, Solution};
use float_eq::assert_float_eq;
#[cfg(target_arch = "wasm32")]
use wasm_bindgen_test::*;

#[test]
#[cfg_attr(target_arch = "wasm32", wasm_bindgen_test)]
fn optional_constraint_yields_to_required_ones() {
    let mut vars = variables!();
    let x1 = vars.add_variable();
    let x2 = vars.add_variable();
    let mut solver = CassowarySolver::new();
    solver
        .add_constraints(&[
            constraint!(x1 + x2 == 5),
            constraint!(x1 >= 2),
            constraint!(x2 >= 1),
            constraint!(x2 == 4).with_priority(Priority::LOW),
        ])
        .unwrap();
    let solution = solver.solve().unwrap();
    assert_float_eq!(solution.value(x1), 2., abs <= 1e-8);
    assert_float_eq!(solution.value(x2), 3., abs <= 1e-8);
}

#[test]
#[cfg_attr(target_arch = "wasm32", wasm_bindgen_test)]
fn midpoint_between_bounds() {
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
    let solution = solver.solve().unwrap();
    assert_float_eq!(solution.value(xl), 90., abs <= 1e-8);
    assert_float_eq!(solution.value(xm), 95., abs <= 1e-8);
    assert_float_eq!(solution.value(xr), 100., abs <= 1e-8);

    solver
        .add_constraints(&[
            constraint!(xm == 50).with_priority(Priority::MEDIUM),
            constraint!(xl == 30).with_priority(Priority::LOW),
            constraint!(xr == 60).with_priority(Priority::LOW),
        ])
        .unwrap();
    let solution = solver.solve().unwrap();
    assert_float_eq!(solution.value(xl), 30., abs <= 1e-8);
    assert_float_eq!(solution.value(xm), 50., abs <= 1e-8);
    assert_float_eq!(solution.value(xr), 70., abs <= 1e-8);
}

#[test]
#[cfg_attr(target_arch = "wasm32", wasm_bindgen_test)]
fn contradicting_required_constraints() {
    let mut vars = variables!();
    let x = vars.add_variable();
    let mut solver = CassowarySolver::new();
    solver.add_constraint(&constraint!(x >= 10)).unwrap();
    assert_eq!(
        solver.add_constraint(&constraint!(x <= 5)),
        Err(ResolutionError::Infeasible)
    );
}

#[test]
#[cfg_attr(target_arch = "wasm32", wasm_bindgen_test)]
fn incremental_bounds() {
    let mut vars = variables!();
    let x = vars.add_variable();
    let mut solver = CassowarySolver::new();
    solver
        .add_constraint(&constraint!(x == 100).with_priority(Priority::LOW))
        .unwrap();
    let below_20 = constraint!(x <= 20);
    let below_10 = constraint!(x <= 10);
    solver.add_constraint(&below_20).unwrap();
    assert_float_eq!(solver.solve().unwrap().value(x), 20., abs <= 1e-8);
    solver.add_constraint(&below_10).unwrap();
    assert_float_eq!(solver.solve().unwrap().value(x), 10., abs <= 1e-8);
    solver.remove_constraint(&below_10).unwrap();
    assert_float_eq!(solver.solve().unwrap().value(x), 20., abs <= 1e-8);
    solver.remove_constraint(&below_20).unwrap();
    assert_float_eq!(solver.solve().unwrap().value(x), 100., abs <= 1e-8);
}

#[test]
#[cfg_attr(target_arch = "wasm32", wasm_bindgen_test)]
fn removal_order_does_not_matter() {
    let mut vars = variables!();
    let x = vars.add_variable();
    let mut solver = CassowarySolver::new();
    solver
        .add_constraint(&constraint!(x == 100).with_priority(Priority::LOW))
        .unwrap();
    let below_20 = constraint!(x <= 20);
    let below_10 = constraint!(x <= 10);
    solver.add_constraints(&[below_20.clone(), below_10.clone()]).unwrap();
    solver.remove_constraint(&below_20).unwrap();
    assert_float_eq!(solver.solve().unwrap().value(x), 10., abs <= 1e-8);
    solver.remove_constraint(&below_10).unwrap();
    assert_float_eq!(solver.solve().unwrap().value(x), 100., abs <= 1e-8);
}

#[test]
#[cfg_attr(target_arch = "wasm32", wasm_bindgen_test)]
fn stronger_priority_wins() {
    for weak_first in [true, false] {
        let mut vars = variables!();
        let x = vars.add_variable();
        let weak = constraint!(x == 10).with_priority(Priority::LOW);
        let strong = constraint!(x == 20).with_priority(Priority::MEDIUM);
        let mut solver = CassowarySolver::new();
        if weak_first {
            solver.add_constraints(&[weak, strong]).unwrap();
        } else {
            solver.add_constraints(&[strong, weak]).unwrap();
        }
        assert_float_eq!(solver.solve().unwrap().value(x), 20., abs <= 1e-8);
    }
}

#[test]
#[cfg_attr(target_arch = "wasm32", wasm_bindgen_test)]
fn optional_inequalities() {
    let mut vars = variables!();
    let left = vars.add_variable();
    let width = vars.add_variable();
    let mut solver = CassowarySolver::new();
    solver
        .add_constraints(&[
            constraint!(width == 10),
            constraint!(left + width <= 100),
            constraint!(left >= 120).with_priority(Priority::LOW),
        ])
        .unwrap();
    let solution = solver.solve().unwrap();
    assert_float_eq!(solution.value(left), 90., abs <= 1e-8);
    assert_float_eq!(solution.value(width), 10., abs <= 1e-8);
}

#[test]
#[cfg_attr(target_arch = "wasm32", wasm_bindgen_test)]
fn constraint_handles() {
    let mut vars = variables!();
    let x = vars.add_variable();
    let mut solver = CassowarySolver::new();
    let limit = constraint!(x <= 10);
    let same_limit = constraint!(x <= 10);
    solver.add_constraint(&limit).unwrap();
    assert!(solver.has_constraint(&limit));
    assert!(!solver.has_constraint(&same_limit));
    assert_eq!(
        solver.add_constraint(&limit.clone()),
        Err(ResolutionError::ConstraintExists(limit.clone()))
    );
    assert_eq!(
        solver.remove_constraint(&same_limit),
        Err(ResolutionError::ConstraintNotFound(same_limit.clone()))
    );
    solver.remove_constraint(&limit).unwrap();
    assert!(!solver.has_constraint(&limit));
}

#[test]
#[cfg_attr(target_arch = "wasm32", wasm_bindgen_test)]
fn unconstrained_variables_are_zero() {
    let mut vars = variables!();
    let x = vars.add_variable();
    let y = vars.add_variable();
    let mut solver = CassowarySolver::new();
    solver.add_constraint(&constraint!(x == 3)).unwrap();
    let solution = solver.solve().unwrap();
    assert_float_eq!(solution.value(y), 0., abs <= 1e-8);
    assert_float_eq!(solver.value(y), 0., abs <= 1e-8);
    assert_float_eq!(solver.cached_solution().value(x), 3., abs <= 1e-8);
}
