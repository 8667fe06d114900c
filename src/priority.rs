//! Priorities tell the [CassowarySolver](crate::CassowarySolver) which constraints
//! may be violated, and which ones should win when two of them conflict.
use std::fmt::{Display, Formatter};
use std::ops::Add;

/// The strength of a constraint.
///
/// A [Required](Priority::Required) constraint must hold exactly.
/// An [Optional](Priority::Optional) constraint is satisfied when possible; its violation
/// is penalised in the objective with a weight that grows exponentially with the strength,
/// so that a stronger constraint always wins against a weaker one.
///
/// ```
/// use cassowary_lp::Priority;
/// assert!(Priority::HIGH.weight() > Priority::LOW.weight());
/// assert_eq!(Priority::REQUIRED.weight(), None);
/// assert_eq!(Priority::new(-1), Priority::REQUIRED);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Priority {
    /// The constraint must hold
    Required,
    /// The constraint should hold, with the given strength
    Optional(u32),
}

impl Priority {
    /// A constraint that must hold
    pub const REQUIRED: Priority = Priority::Required;
    /// Default priority of edit variables
    pub const HIGH: Priority = Priority::Optional(750);
    /// A priority between [LOW](Priority::LOW) and [HIGH](Priority::HIGH)
    pub const MEDIUM: Priority = Priority::Optional(500);
    /// Default priority of stay variables
    pub const LOW: Priority = Priority::Optional(250);

    /// Strengths above this value all get the same weight, `1e9`.
    pub const MAX_STRENGTH: u32 = 1000;

    /// Creates a priority from a raw strength. Negative strengths mean [Required](Priority::Required).
    pub fn new(strength: i64) -> Self {
        if strength < 0 {
            Priority::Required
        } else {
            Priority::Optional(u32::try_from(strength).unwrap_or(u32::MAX))
        }
    }

    /// Whether the constraint must hold exactly
    pub fn is_required(&self) -> bool {
        matches!(self, Priority::Required)
    }

    /// The weight of the error variables of an optional constraint in the objective:
    /// `10^(3 * (strength / 250 - 1))`, so 250 weighs 1, 500 weighs 1e3 and 750 weighs 1e6.
    ///
    /// The strength is clamped to [MAX_STRENGTH](Priority::MAX_STRENGTH).
    /// Required constraints have no weight.
    pub fn weight(&self) -> Option<f64> {
        match *self {
            Priority::Required => None,
            Priority::Optional(strength) => {
                let strength = f64::from(strength.min(Self::MAX_STRENGTH));
                Some(10f64.powf(3. * (strength / 250. - 1.)))
            }
        }
    }
}

impl Default for Priority {
    fn default() -> Self {
        Priority::Required
    }
}

/// Adds the strengths of two optional priorities. Anything added to `Required` stays required.
impl Add for Priority {
    type Output = Priority;

    fn add(self, rhs: Priority) -> Self::Output {
        match (self, rhs) {
            (Priority::Optional(a), Priority::Optional(b)) => Priority::Optional(a.saturating_add(b)),
            _ => Priority::Required,
        }
    }
}

impl Display for Priority {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Priority::Required => write!(f, "required"),
            Priority::Optional(strength) => write!(f, "{}", strength),
        }
    }
}
