//! Utility maths functions

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use num_traits::Float;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Default tolerance for floating point equality.
pub const EPSILON: f64 = 1e-12;

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Returns true if `a` and `b` are within `epsilon` of each other (inclusive).
pub fn epsilon_equals<T>(a: T, b: T, epsilon: T) -> bool
where
    T: Float,
{
    a - epsilon <= b && a + epsilon >= b
}

/// Clamp a value into the range `[min, max]`.
pub fn clamp<T>(value: T, min: T, max: T) -> T
where
    T: Float,
{
    let mut ret = value;

    if ret > max {
        ret = max
    }
    if ret < min {
        ret = min
    }

    ret
}

/// Linearly interpolate between `a` and `b`.
///
/// `x` is clamped into `[0, 1]`, so the result never leaves the range between
/// the two values.
pub fn lin_interp<T>(a: T, b: T, x: T) -> T
where
    T: Float,
{
    let x = clamp(x, T::zero(), T::one());
    a + (b - a) * x
}

/// Returns true if every value in the list is within `epsilon` of `value`.
pub fn all_close_to<T>(values: &[T], value: T, epsilon: T) -> bool
where
    T: Float,
{
    values.iter().all(|v| epsilon_equals(*v, value, epsilon))
}
