//! Differential-privacy parameters `(epsilon, delta)`.
use crate::pld::{
    errors::PLDResult,
    validation::{require_non_negative, require_probability},
};

/// DifferentialPrivacyParameters — an `(epsilon, delta)` guarantee.
///
/// Immutable value describing either a target guarantee (for calibration) or
/// an achieved one (as reported by a privacy loss distribution).
///
/// Invariants
/// ----------
/// - `epsilon ≥ 0`. `+∞` is allowed as a reported value (no finite
///   guarantee) but has no worst-case PLD.
/// - `delta ∈ [0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DifferentialPrivacyParameters {
    epsilon: f64,
    delta: f64,
}

impl DifferentialPrivacyParameters {
    /// Build a validated `(epsilon, delta)` pair.
    ///
    /// Errors
    /// ------
    /// - `PLDError::InvalidParameter` if `epsilon` is negative or NaN, or if
    ///   `delta` lies outside `[0, 1]`.
    pub fn new(epsilon: f64, delta: f64) -> PLDResult<Self> {
        let epsilon = require_non_negative("epsilon", epsilon)?;
        let delta = require_probability("delta", delta)?;
        Ok(DifferentialPrivacyParameters { epsilon, delta })
    }

    /// Pure `epsilon`-DP, i.e. `delta = 0`.
    pub fn pure(epsilon: f64) -> PLDResult<Self> {
        Self::new(epsilon, 0.0)
    }

    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    pub fn delta(&self) -> f64 {
        self.delta
    }
}
