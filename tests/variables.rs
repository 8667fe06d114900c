use cassowary_lp::{variables, Expression};

#[cfg(target_arch = "wasm32")]
use wasm_bindgen_test::*;

#[test]
#[cfg_attr(target_arch = "wasm32", wasm_bindgen_test)]
fn complex_expression() {
    let mut vars = variables!();
    let left = vars.add_variable();
    let width = vars.add_variable();
    let right = vars.add_variable();
    let gap = vars.add_variable();
    assert_eq!(
        9. * (left - width * 2.) + 4 * right / 2 - gap,
        9. * left + (-18.) * width + 2. * right + (-1.) * gap
    )
}

#[test]
#[cfg_attr(target_arch = "wasm32", wasm_bindgen_test)]
fn large_sum() {
    let mut vars = variables!();
    let var_vec: Vec<_> = (0..100_000).map(|_i| vars.add_variable()).collect();
    let sum_right: Expression = var_vec.iter().sum();
    let sum_reverse: Expression = var_vec.iter().rev().sum();
    assert_eq!(sum_right, sum_reverse)
}

#[test]
#[cfg_attr(target_arch = "wasm32", wasm_bindgen_test)]
fn debug_format() {
    let mut vars = variables!();
    let a = vars.add_variable();
    let b = vars.add_variable();
    let constraint = (9_i32 * (1_f64 + a + b / 3)).leq(a + 1);
    assert_eq!(format!("{:?}", constraint), "8 v0 + 3 v1 <= -8");
}

#[test]
#[cfg_attr(target_arch = "wasm32", wasm_bindgen_test)]
fn named_variables_in_display() {
    variables! {
        vars:
            left;
            0 <= width <= 100;
    }
    let constraint = (left + 2 * width).geq(10);
    assert_eq!(vars.display(&constraint).to_string(), "left + 2 width >= 10");
    assert_eq!(vars.name(width), Some("width"));
}

#[test]
#[cfg_attr(target_arch = "wasm32", wasm_bindgen_test)]
fn variables_macro_bounds() {
    use cassowary_lp::{constraint, simplex, Solution, SolverModel};

    variables! {
        vars:
               a <= 1;
          2 <= b <= 4;
    }
    let solution = vars
        .maximise(10 * (a - b / 5) - b)
        .using(simplex)
        .with(constraint!(a + 2 <= b))
        .with(constraint!(1 + a >= 4 - b))
        .solve()
        .expect("solve");
    assert!((solution.value(a) - 1.).abs() < 1e-5);
    assert!((solution.value(b) - 3.).abs() < 1e-5);
}
