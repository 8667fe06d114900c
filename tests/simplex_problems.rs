use cassowary_lp::{
    constraint, simplex, variable, variables, ResolutionError, Solution, SolverModel,
};
use float_eq::assert_float_eq;
#[cfg(target_arch = "wasm32")]
use wasm_bindgen_test::*;

#[test]
#[cfg_attr(target_arch = "wasm32", wasm_bindgen_test)]
fn constraints_added_after_a_solve() {
    let mut vars = variables!();
    let x1 = vars.add(variable().min(0));
    let x2 = vars.add(variable().min(0));
    let mut solver = vars
        .maximise(5 * x1 + 3 * x2)
        .using(simplex)
        .with(constraint!(x1 + x2 <= 100))
        .into_solver()
        .unwrap();

    let solution = solver.solve().unwrap();
    assert_float_eq!(solution.objective(), 500., abs <= 1e-8);
    assert_float_eq!(solution.value(x1), 100., abs <= 1e-8);
    assert_float_eq!(solution.value(x2), 0., abs <= 1e-8);

    solver.add_constraint(&constraint!(4 * x1 + 2 * x2 <= 300)).unwrap();
    let solution = solver.solve().unwrap();
    assert_float_eq!(solution.objective(), 400., abs <= 1e-8);
    assert_float_eq!(solution.value(x1), 50., abs <= 1e-8);
    assert_float_eq!(solution.value(x2), 50., abs <= 1e-8);

    solver.add_constraint(&constraint!(4 * x1 + 3 * x2 <= 330)).unwrap();
    let solution = solver.solve().unwrap();
    assert_float_eq!(solution.objective(), 390., abs <= 1e-8);
    assert_float_eq!(solution.value(x1), 60., abs <= 1e-8);
    assert_float_eq!(solution.value(x2), 30., abs <= 1e-8);
}

#[test]
#[cfg_attr(target_arch = "wasm32", wasm_bindgen_test)]
fn removing_a_constraint_relaxes_the_optimum() {
    let mut vars = variables!();
    let x1 = vars.add(variable().min(0));
    let x2 = vars.add(variable().min(0));
    let mut solver = vars
        .maximise(5 * x1 + 3 * x2)
        .using(simplex)
        .with(constraint!(x1 + x2 <= 100))
        .into_solver()
        .unwrap();
    let tight = constraint!(4 * x1 + 2 * x2 <= 300);
    solver.add_constraint(&tight).unwrap();
    assert_float_eq!(solver.solve().unwrap().objective(), 400., abs <= 1e-8);
    solver.remove_constraint(&tight).unwrap();
    assert!(!solver.has_constraint(&tight));
    assert_float_eq!(solver.solve().unwrap().objective(), 500., abs <= 1e-8);
}

#[test]
#[cfg_attr(target_arch = "wasm32", wasm_bindgen_test)]
fn unbounded_objective() {
    let mut vars = variables!();
    let x1 = vars.add(variable().min(0));
    let result = vars.maximise(x1).using(simplex).solve();
    assert_eq!(result.err(), Some(ResolutionError::Unbounded));
}

#[test]
#[cfg_attr(target_arch = "wasm32", wasm_bindgen_test)]
fn diet_problem() {
    // Two foods, minimum amounts of two nutrients
    let mut vars = variables!();
    let bread = vars.add(variable().min(0));
    let milk = vars.add(variable().min(0));
    let solution = vars
        .minimise(2 * bread + 3 * milk)
        .using(simplex)
        .with(constraint!(bread + 2 * milk >= 6))
        .with(constraint!(3 * bread + milk >= 8))
        .solve()
        .unwrap();
    assert_float_eq!(solution.value(bread), 2., abs <= 1e-8);
    assert_float_eq!(solution.value(milk), 2., abs <= 1e-8);
    assert_float_eq!(solution.objective(), 10., abs <= 1e-8);
    assert_float_eq!(solution.eval(bread + milk), 4., abs <= 1e-8);
}

#[test]
#[cfg_attr(target_arch = "wasm32", wasm_bindgen_test)]
fn equality_constraints() {
    let mut vars = variables!();
    let x = vars.add(variable().min(0));
    let y = vars.add(variable().min(0));
    let z = vars.add(variable().min(0));
    let solution = vars
        .maximise(x + 2 * y + 3 * z)
        .using(simplex)
        .with(constraint!(x + y + z == 10))
        .with(constraint!(z <= 4))
        .with(constraint!(y - x == 2))
        .solve()
        .unwrap();
    assert_float_eq!(solution.value(x), 2., abs <= 1e-8);
    assert_float_eq!(solution.value(y), 4., abs <= 1e-8);
    assert_float_eq!(solution.value(z), 4., abs <= 1e-8);
    assert_float_eq!(solution.objective(), 22., abs <= 1e-8);
}

#[test]
#[cfg_attr(target_arch = "wasm32", wasm_bindgen_test)]
fn infeasible_problem() {
    let mut vars = variables!();
    let x = vars.add(variable().min(0));
    let y = vars.add(variable().min(0));
    let result = vars
        .minimise(x + y)
        .using(simplex)
        .with(constraint!(x + y <= 3))
        .with(constraint!(x + y >= 5))
        .solve();
    assert_eq!(result.err(), Some(ResolutionError::Infeasible));
}

#[test]
#[cfg_attr(target_arch = "wasm32", wasm_bindgen_test)]
fn solver_name() {
    assert_eq!(cassowary_lp::SimplexProblem::name(), "Simplex");
}
