//! pld::validation — shared scalar guards for privacy-loss inputs.
//!
//! Purpose
//! -------
//! Centralize the scalar domain checks that mechanism constructors, option
//! builders, and closed-form factories perform, so each constraint maps to
//! the same [`PLDError::InvalidParameter`] shape everywhere.
//!
//! Key behaviors
//! -------------
//! - Check positivity, non-negativity, probability ranges, and integrality
//!   of `f64` inputs.
//! - Report the parameter name, offending value, and a domain-level reason.
//!
//! Conventions
//! -----------
//! - NaN always fails validation; comparisons are written so that NaN falls
//!   through to the error branch.
//! - Helpers perform no allocation and never panic.

use crate::pld::errors::{PLDError, PLDResult};

/// Require `value` to be finite and strictly positive.
///
/// Errors
/// ------
/// - `PLDError::InvalidParameter` if `value` is NaN, ±∞, or ≤ 0.
pub fn require_positive(name: &'static str, value: f64) -> PLDResult<f64> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(PLDError::InvalidParameter {
            name,
            value,
            reason: "Must be a finite, strictly positive number.",
        })
    }
}

/// Require `value` to be non-negative (∞ allowed, NaN rejected).
pub fn require_non_negative(name: &'static str, value: f64) -> PLDResult<f64> {
    if value >= 0.0 {
        Ok(value)
    } else {
        Err(PLDError::InvalidParameter { name, value, reason: "Must be non-negative." })
    }
}

/// Require `value` to lie in the closed unit interval `[0, 1]`.
pub fn require_probability(name: &'static str, value: f64) -> PLDResult<f64> {
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(PLDError::InvalidParameter { name, value, reason: "Must lie in [0, 1]." })
    }
}

/// Require `value` to lie strictly inside `(0, 1)`.
pub fn require_open_unit(name: &'static str, value: f64) -> PLDResult<f64> {
    if value > 0.0 && value < 1.0 {
        Ok(value)
    } else {
        Err(PLDError::InvalidParameter { name, value, reason: "Must be strictly between 0 and 1." })
    }
}

/// Require `value` to be a finite, strictly positive integer.
///
/// Used for the sensitivity of discrete-noise mechanisms, which only shift
/// the noise support by whole units.
pub fn require_positive_integer(name: &'static str, value: f64) -> PLDResult<f64> {
    let value = require_positive(name, value)?;
    if value.fract() == 0.0 {
        Ok(value)
    } else {
        Err(PLDError::InvalidParameter { name, value, reason: "Must be an integer." })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover every accepting and rejecting branch of the guards,
    // including NaN handling.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Verify `require_positive` accepts positive finite values and rejects
    // zero, negatives, infinities, and NaN.
    //
    // Given
    // -----
    // - Inputs 1.5, 0.0, -2.0, +∞, NaN.
    //
    // Expect
    // ------
    // - Only 1.5 passes; the others return `InvalidParameter`.
    fn require_positive_accepts_only_finite_positive_values() {
        assert_eq!(require_positive("scale", 1.5), Ok(1.5));
        for bad in [0.0, -2.0, f64::INFINITY, f64::NAN] {
            match require_positive("scale", bad) {
                Err(PLDError::InvalidParameter { name, .. }) => assert_eq!(name, "scale"),
                other => panic!("expected InvalidParameter for {bad}, got {other:?}"),
            }
        }
    }

    #[test]
    // Purpose
    // -------
    // Verify the probability-range guards on both closed and open intervals.
    //
    // Given
    // -----
    // - Boundary values 0 and 1, an interior value, and out-of-range values.
    //
    // Expect
    // ------
    // - `require_probability` accepts 0, 0.5, 1; `require_open_unit` accepts
    //   only 0.5; both reject -0.1, 1.1, and NaN.
    fn probability_guards_respect_interval_boundaries() {
        for ok in [0.0, 0.5, 1.0] {
            assert!(require_probability("delta", ok).is_ok());
        }
        assert!(require_open_unit("noise_parameter", 0.5).is_ok());
        for bad in [0.0, 1.0] {
            assert!(require_open_unit("noise_parameter", bad).is_err());
        }
        for bad in [-0.1, 1.1, f64::NAN] {
            assert!(require_probability("delta", bad).is_err());
            assert!(require_open_unit("noise_parameter", bad).is_err());
        }
    }

    #[test]
    // Purpose
    // -------
    // Verify integrality and non-negativity guards.
    //
    // Given
    // -----
    // - 3.0 and 2.5 for the integer guard; 0.0, ∞, and -1e-9 for the
    //   non-negativity guard.
    //
    // Expect
    // ------
    // - 3.0 passes and 2.5 fails; 0.0 and ∞ pass and -1e-9 fails.
    fn integer_and_non_negative_guards() {
        assert_eq!(require_positive_integer("sensitivity", 3.0), Ok(3.0));
        assert!(require_positive_integer("sensitivity", 2.5).is_err());
        assert!(require_non_negative("epsilon", 0.0).is_ok());
        assert!(require_non_negative("epsilon", f64::INFINITY).is_ok());
        assert!(require_non_negative("epsilon", -1e-9).is_err());
    }
}
