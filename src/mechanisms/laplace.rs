//! Laplace mechanism: `f(D) + Lap(0, b)`.
//!
//! With scale `b` and sensitivity `Δ`, the privacy loss at noise value `x` is
//! `(|x − Δ| − |x|) / b`: constant `Δ/b` for `x ≤ 0`, constant `−Δ/b` for
//! `x ≥ Δ`, and linear in between. Only `[0, Δ]` needs step-wise
//! discretization; both flat regions are exact point masses.
use statrs::distribution::{ContinuousCDF, Laplace};

use crate::{
    mechanisms::traits::{AdditiveNoiseMechanism, NoiseKind, TailPrivacyLossDistribution},
    pld::{
        errors::{PLDError, PLDResult},
        options::EstimateType,
        params::DifferentialPrivacyParameters,
        validation::require_positive,
    },
};

/// Laplace noise with scale `parameter` added to a function of sensitivity
/// `sensitivity`.
#[derive(Debug, Clone, PartialEq)]
pub struct LaplaceMechanism {
    parameter: f64,
    sensitivity: f64,
    noise: Laplace,
}

impl LaplaceMechanism {
    /// Errors
    /// ------
    /// - `PLDError::InvalidParameter` if `parameter` or `sensitivity` is not
    ///   finite and strictly positive.
    pub fn new(parameter: f64, sensitivity: f64) -> PLDResult<Self> {
        let parameter = require_positive("parameter", parameter)?;
        let sensitivity = require_positive("sensitivity", sensitivity)?;
        let noise = Laplace::new(0.0, parameter).map_err(|_| PLDError::InvalidParameter {
            name: "parameter",
            value: parameter,
            reason: "Must be a valid Laplace scale.",
        })?;
        Ok(LaplaceMechanism { parameter, sensitivity, noise })
    }

    /// Laplace mechanism that is `ε`-DP for the given sensitivity: `b = Δ/ε`.
    ///
    /// `delta` of the target is ignored; the Laplace mechanism is pure DP.
    ///
    /// Errors
    /// ------
    /// - `PLDError::InvalidParameter` if `ε = 0` or `ε = ∞`, or if the
    ///   sensitivity is invalid.
    pub fn from_privacy_guarantee(
        privacy_parameters: DifferentialPrivacyParameters, sensitivity: f64,
    ) -> PLDResult<Self> {
        let epsilon = require_positive("epsilon", privacy_parameters.epsilon())?;
        let sensitivity = require_positive("sensitivity", sensitivity)?;
        Self::new(sensitivity / epsilon, sensitivity)
    }

    /// Scale `b` of the Laplace noise.
    pub fn parameter(&self) -> f64 {
        self.parameter
    }
}

impl AdditiveNoiseMechanism for LaplaceMechanism {
    fn sensitivity(&self) -> f64 {
        self.sensitivity
    }

    fn noise_kind(&self) -> NoiseKind {
        NoiseKind::Continuous
    }

    fn privacy_loss(&self, x: f64) -> PLDResult<f64> {
        Ok(((x - self.sensitivity).abs() - x.abs()) / self.parameter)
    }

    fn inverse_privacy_loss(&self, privacy_loss: f64) -> f64 {
        let max_loss = self.sensitivity / self.parameter;
        if privacy_loss > max_loss {
            f64::NEG_INFINITY
        } else if privacy_loss <= -max_loss {
            f64::INFINITY
        } else {
            0.5 * (self.sensitivity - privacy_loss * self.parameter)
        }
    }

    fn noise_cdf(&self, x: f64) -> f64 {
        if x == f64::INFINITY {
            1.0
        } else if x == f64::NEG_INFINITY {
            0.0
        } else {
            self.noise.cdf(x)
        }
    }

    /// Body `[0, Δ]`; mass `1/2` at loss `Δ/b` (noise ≤ 0) and
    /// `CDF(−Δ)` at loss `−Δ/b` (noise ≥ Δ), for either estimate type.
    fn privacy_loss_tail(&self, _estimate: EstimateType) -> TailPrivacyLossDistribution {
        let max_loss = self.sensitivity / self.parameter;
        TailPrivacyLossDistribution {
            lower_x_truncation: 0.0,
            upper_x_truncation: self.sensitivity,
            tail_probability_mass_function: vec![
                (max_loss, 0.5),
                (-max_loss, self.noise_cdf(-self.sensitivity)),
            ],
        }
    }
}
