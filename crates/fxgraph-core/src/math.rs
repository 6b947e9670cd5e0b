//! Scalar helpers shared by the parameter schema and the engine transforms.
//!
//! All functions are allocation-free and `no_std` compatible.
//!
//! - [`db_to_linear`] - decibels to linear gain
//! - [`round_half_up`] - `floor(v + 0.5)` rounding used for display
//! - [`unit`] / [`log_unit`] - map a range onto `[0, 1]`, linearly or logarithmically

use libm::{floorf, logf, powf};

/// Convert decibels to linear gain.
///
/// # Example
/// ```rust
/// use fxgraph_core::math::db_to_linear;
///
/// assert!((db_to_linear(0.0) - 1.0).abs() < 0.001);
/// assert!((db_to_linear(-6.02) - 0.5).abs() < 0.01);
/// ```
#[inline]
pub fn db_to_linear(db: f32) -> f32 {
    // Evaluated as written: the compressor threshold slot must match other
    // encoders bit for bit.
    powf(10.0, db / 20.0)
}

/// Rounds half away from negative infinity (`floor(v + 0.5)`).
///
/// Differs from [`f32::round`] for negative halves: `-2.5` rounds to `-2`.
#[inline]
pub fn round_half_up(value: f32) -> f32 {
    floorf(value + 0.5)
}

/// Maps `value` from `[lo, hi]` onto `[0, 1]`, clamped. Returns `0` when `hi <= lo`.
///
/// # Example
/// ```rust
/// use fxgraph_core::math::unit;
///
/// assert_eq!(unit(50.0, 0.0, 100.0), 0.5);
/// assert_eq!(unit(150.0, 0.0, 100.0), 1.0);
/// assert_eq!(unit(1.0, 5.0, 5.0), 0.0);
/// ```
#[inline]
pub fn unit(value: f32, lo: f32, hi: f32) -> f32 {
    if hi <= lo {
        return 0.0;
    }
    ((value - lo) / (hi - lo)).clamp(0.0, 1.0)
}

/// Maps `value` from `[lo, hi]` onto `[0, 1]` on a natural-log axis, clamped.
///
/// Returns `0` when the range is empty or not strictly positive.
#[inline]
pub fn log_unit(value: f32, lo: f32, hi: f32) -> f32 {
    if lo <= 0.0 || hi <= lo || value <= 0.0 {
        return 0.0;
    }
    let lo_ln = logf(lo);
    ((logf(value) - lo_ln) / (logf(hi) - lo_ln)).clamp(0.0, 1.0)
}
