/// Creates a [ProblemVariables](crate::ProblemVariables) and declares variables in it.
///
/// ```
/// # use cassowary_lp::*;
/// variables! {
///     vars:
///         a;
///         2 <= b <= 4;
///         c >= 0;
///         d <= 10;
/// }
/// assert_eq!(vars.len(), 4);
/// assert_eq!(vars.name(b), Some("b"));
/// ```
///
/// Called without arguments, it returns an empty list of variables:
///
/// ```
/// # use cassowary_lp::variables;
/// let mut vars = variables!();
/// let x = vars.add_variable();
/// ```
#[macro_export]
macro_rules! variables {
    () => {
        $crate::ProblemVariables::new()
    };
    ($vars:ident : $($rest:tt)*) => {
        #[allow(unused_mut)]
        let mut $vars = $crate::ProblemVariables::new();
        $crate::__declare_variables!($vars; $($rest)*);
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __declare_variables {
    ($vars:ident;) => {};
    ($vars:ident; $min:literal <= $name:ident <= $max:literal; $($rest:tt)*) => {
        let $name = $vars.add($crate::variable().min($min).max($max).name(stringify!($name)));
        $crate::__declare_variables!($vars; $($rest)*);
    };
    ($vars:ident; $name:ident <= $max:literal; $($rest:tt)*) => {
        let $name = $vars.add($crate::variable().max($max).name(stringify!($name)));
        $crate::__declare_variables!($vars; $($rest)*);
    };
    ($vars:ident; $name:ident >= $min:literal; $($rest:tt)*) => {
        let $name = $vars.add($crate::variable().min($min).name(stringify!($name)));
        $crate::__declare_variables!($vars; $($rest)*);
    };
    ($vars:ident; $name:ident; $($rest:tt)*) => {
        let $name = $vars.add($crate::variable().name(stringify!($name)));
        $crate::__declare_variables!($vars; $($rest)*);
    };
}
