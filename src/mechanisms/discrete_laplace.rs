//! Discrete Laplace mechanism: integer-valued `f(D) + Z` with
//! `P(Z = k) ∝ e^{−a|k|}`.
//!
//! The noise lives on the integers, so the privacy loss
//! `a(|x − Δ| − |x|)` is only defined at integer `x` and the sensitivity
//! must be an integer. As with the continuous Laplace mechanism, the loss
//! is flat outside `[0, Δ]`; the integers `1..=Δ−1` are discretized one by
//! one and everything else is two exact point masses.
use crate::{
    mechanisms::traits::{AdditiveNoiseMechanism, NoiseKind, TailPrivacyLossDistribution},
    pld::{
        errors::{PLDError, PLDResult},
        options::EstimateType,
        params::DifferentialPrivacyParameters,
        validation::{require_positive, require_positive_integer},
    },
};

/// Discrete Laplace noise with decay `parameter` added to an integer-valued
/// function of integer sensitivity `sensitivity`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiscreteLaplaceMechanism {
    parameter: f64,
    sensitivity: f64,
}

impl DiscreteLaplaceMechanism {
    /// Errors
    /// ------
    /// - `PLDError::InvalidParameter` if `parameter` is not finite and
    ///   strictly positive, or if `sensitivity` is not a positive integer.
    pub fn new(parameter: f64, sensitivity: f64) -> PLDResult<Self> {
        let parameter = require_positive("parameter", parameter)?;
        let sensitivity = require_positive_integer("sensitivity", sensitivity)?;
        Ok(DiscreteLaplaceMechanism { parameter, sensitivity })
    }

    /// Discrete Laplace mechanism that is `ε`-DP: `a = ε / sensitivity`, with
    /// the sensitivity then rounded up to an integer.
    ///
    /// Errors
    /// ------
    /// - `PLDError::InvalidParameter` if `ε` is 0 or infinite, or the
    ///   sensitivity is not finite and positive.
    pub fn from_privacy_guarantee(
        privacy_parameters: DifferentialPrivacyParameters, sensitivity: f64,
    ) -> PLDResult<Self> {
        let epsilon = require_positive("epsilon", privacy_parameters.epsilon())?;
        let sensitivity = require_positive("sensitivity", sensitivity)?;
        Self::new(epsilon / sensitivity, sensitivity.ceil())
    }

    /// Decay parameter `a` of the noise.
    pub fn parameter(&self) -> f64 {
        self.parameter
    }
}

impl AdditiveNoiseMechanism for DiscreteLaplaceMechanism {
    fn sensitivity(&self) -> f64 {
        self.sensitivity
    }

    fn noise_kind(&self) -> NoiseKind {
        NoiseKind::Discrete
    }

    fn privacy_loss(&self, x: f64) -> PLDResult<f64> {
        if !x.is_finite() || x.fract() != 0.0 {
            return Err(PLDError::UndefinedInput { x });
        }
        Ok(((x - self.sensitivity).abs() - x.abs()) * self.parameter)
    }

    fn inverse_privacy_loss(&self, privacy_loss: f64) -> f64 {
        let max_loss = self.sensitivity * self.parameter;
        if privacy_loss > max_loss {
            f64::NEG_INFINITY
        } else if privacy_loss <= -max_loss {
            f64::INFINITY
        } else {
            (0.5 * (self.sensitivity - privacy_loss / self.parameter)).floor()
        }
    }

    /// `e^{a⌊x⌋} / (1 + e^{−a})` for `⌊x⌋ < 0`, otherwise
    /// `1 − e^{−a(⌊x⌋ + 1)} / (1 + e^{−a})`.
    fn noise_cdf(&self, x: f64) -> f64 {
        if x == f64::INFINITY {
            return 1.0;
        }
        if x == f64::NEG_INFINITY {
            return 0.0;
        }
        let k = x.floor();
        let normalizer = 1.0 + (-self.parameter).exp();
        if k < 0.0 {
            (self.parameter * k).exp() / normalizer
        } else {
            1.0 - (-self.parameter * (k + 1.0)).exp() / normalizer
        }
    }

    /// Body `1..=Δ−1`; mass `CDF(0)` at loss `Δa` (noise ≤ 0) and
    /// `CDF(−Δ)` at loss `−Δa` (noise ≥ Δ), for either estimate type.
    fn privacy_loss_tail(&self, _estimate: EstimateType) -> TailPrivacyLossDistribution {
        let max_loss = self.sensitivity * self.parameter;
        TailPrivacyLossDistribution {
            lower_x_truncation: 1.0,
            upper_x_truncation: self.sensitivity - 1.0,
            tail_probability_mass_function: vec![
                (max_loss, self.noise_cdf(0.0)),
                (-max_loss, self.noise_cdf(-self.sensitivity)),
            ],
        }
    }
}
