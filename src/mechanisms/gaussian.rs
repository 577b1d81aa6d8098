//! Gaussian mechanism: `f(D) + N(0, σ²)`.
//!
//! Purpose
//! -------
//! Describe the privacy loss of Gaussian noise with standard deviation `σ`
//! and sensitivity `Δ`. The loss `0.5·Δ(Δ − 2x)/σ²` is linear and unbounded
//! in both directions, so the body is truncated symmetrically at the point
//! `x₀` with `CDF(x₀) = 0.5·exp(log_mass_truncation_bound)`.
//!
//! Key behaviors
//! -------------
//! - Pessimistic tails: the mass below `x₀` is given infinite loss and the
//!   mass above `−x₀` is placed at the loss of `−x₀` (its largest value).
//! - Optimistic tails: the mass below `x₀` is placed at the loss of `x₀`
//!   (its smallest value); the mass above `−x₀` is dropped.
//! - Closed under composition: `k` runs equal one run with sensitivity
//!   `Δ·√k` ([`GaussianMechanism::self_composed`]).
//! - [`GaussianMechanism::from_privacy_guarantee`] calibrates `σ` with the
//!   search in [`crate::mechanisms::search`].
//!
//! Invariants & assumptions
//! ------------------------
//! - `σ > 0`, `Δ > 0`, and the truncation bound is finite and ≤ 0 with a
//!   positive tail mass `0.5·exp(bound)` and a finite truncation point.
use statrs::distribution::{ContinuousCDF, Normal};

use crate::{
    mechanisms::{
        search::{SearchOptions, minimal_standard_deviation},
        traits::{AdditiveNoiseMechanism, NoiseKind, TailPrivacyLossDistribution},
    },
    numerical_stability::DEFAULT_LOG_MASS_TRUNCATION_BOUND,
    pld::{
        errors::{PLDError, PLDResult},
        options::EstimateType,
        params::DifferentialPrivacyParameters,
        validation::require_positive,
    },
};

/// Gaussian noise with standard deviation `standard_deviation` added to a
/// function of sensitivity `sensitivity`.
#[derive(Debug, Clone, PartialEq)]
pub struct GaussianMechanism {
    standard_deviation: f64,
    sensitivity: f64,
    log_mass_truncation_bound: f64,
    noise: Normal,
}

impl GaussianMechanism {
    /// Gaussian mechanism with the default truncation bound (`-50`).
    pub fn new(standard_deviation: f64, sensitivity: f64) -> PLDResult<Self> {
        Self::with_log_mass_truncation_bound(
            standard_deviation,
            sensitivity,
            DEFAULT_LOG_MASS_TRUNCATION_BOUND,
        )
    }

    /// Gaussian mechanism with an explicit truncation bound.
    ///
    /// Errors
    /// ------
    /// - `PLDError::InvalidParameter` if `σ` or `Δ` is not finite and
    ///   strictly positive, if the bound is not finite or exceeds 0, or if
    ///   the bound is so small that `0.5·exp(bound)` underflows or the
    ///   truncation point is not finite.
    pub fn with_log_mass_truncation_bound(
        standard_deviation: f64, sensitivity: f64, log_mass_truncation_bound: f64,
    ) -> PLDResult<Self> {
        let standard_deviation = require_positive("standard_deviation", standard_deviation)?;
        let sensitivity = require_positive("sensitivity", sensitivity)?;
        if !(log_mass_truncation_bound.is_finite() && log_mass_truncation_bound <= 0.0) {
            return Err(PLDError::InvalidParameter {
                name: "log_mass_truncation_bound",
                value: log_mass_truncation_bound,
                reason: "Must be finite and at most 0.",
            });
        }
        let noise = Normal::new(0.0, standard_deviation).map_err(|_| PLDError::InvalidParameter {
            name: "standard_deviation",
            value: standard_deviation,
            reason: "Must be a valid normal standard deviation.",
        })?;
        let tail_mass = 0.5 * log_mass_truncation_bound.exp();
        if !(tail_mass > 0.0 && noise.inverse_cdf(tail_mass).is_finite()) {
            return Err(PLDError::InvalidParameter {
                name: "log_mass_truncation_bound",
                value: log_mass_truncation_bound,
                reason: "Tail mass underflows; the truncation point is not finite.",
            });
        }
        Ok(GaussianMechanism { standard_deviation, sensitivity, log_mass_truncation_bound, noise })
    }

    /// Gaussian mechanism with the smallest `σ` that is `(ε, δ)`-DP.
    ///
    /// Errors
    /// ------
    /// - See [`minimal_standard_deviation`].
    pub fn from_privacy_guarantee(
        privacy_parameters: DifferentialPrivacyParameters, sensitivity: f64,
        options: &SearchOptions,
    ) -> PLDResult<Self> {
        let standard_deviation = minimal_standard_deviation(privacy_parameters, sensitivity, options)?;
        Self::new(standard_deviation, sensitivity)
    }

    pub fn standard_deviation(&self) -> f64 {
        self.standard_deviation
    }

    pub fn log_mass_truncation_bound(&self) -> f64 {
        self.log_mass_truncation_bound
    }

    // ---- Helper Methods ----

    fn loss(&self, x: f64) -> f64 {
        0.5 * self.sensitivity * (self.sensitivity - 2.0 * x) / self.standard_deviation.powi(2)
    }
}

impl AdditiveNoiseMechanism for GaussianMechanism {
    fn sensitivity(&self) -> f64 {
        self.sensitivity
    }

    fn noise_kind(&self) -> NoiseKind {
        NoiseKind::Continuous
    }

    fn privacy_loss(&self, x: f64) -> PLDResult<f64> {
        Ok(self.loss(x))
    }

    fn inverse_privacy_loss(&self, privacy_loss: f64) -> f64 {
        0.5 * self.sensitivity - privacy_loss * self.standard_deviation.powi(2) / self.sensitivity
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

    fn privacy_loss_tail(&self, estimate: EstimateType) -> TailPrivacyLossDistribution {
        let tail_mass = 0.5 * self.log_mass_truncation_bound.exp();
        let lower_x_truncation = self.noise.inverse_cdf(tail_mass);
        let upper_x_truncation = -lower_x_truncation;

        let tail_probability_mass_function = match estimate {
            EstimateType::Pessimistic => {
                vec![(f64::INFINITY, tail_mass), (self.loss(upper_x_truncation), tail_mass)]
            }
            EstimateType::Optimistic => vec![(self.loss(lower_x_truncation), tail_mass)],
        };
        TailPrivacyLossDistribution { lower_x_truncation, upper_x_truncation, tail_probability_mass_function }
    }

    /// `k` runs with sensitivity `Δ` have the same PLD as one run with
    /// sensitivity `Δ·√k`.
    fn self_composed(&self, num_times: u32) -> Option<Self> {
        Self::with_log_mass_truncation_bound(
            self.standard_deviation,
            self.sensitivity * f64::from(num_times).sqrt(),
            self.log_mass_truncation_bound,
        )
        .ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Closed-form loss and inverse.
    // - Tail split for both estimate types and its total mass.
    // - Exact delta against the analytic Gaussian formula.
    // - Closed-form self-composition and guarantee-based construction.
    // -------------------------------------------------------------------------

    fn std_normal_cdf(x: f64) -> f64 {
        Normal::new(0.0, 1.0).unwrap().cdf(x)
    }

    #[test]
    // Purpose
    // -------
    // Verify the linear loss and that the inverse undoes it.
    //
    // Given
    // -----
    // - σ = 2, Δ = 1.
    //
    // Expect
    // ------
    // - loss(0.5) = 0, loss(0) = 0.125; inverse(loss(x)) = x.
    fn privacy_loss_and_inverse_are_consistent() {
        let m = GaussianMechanism::new(2.0, 1.0).unwrap();
        assert_abs_diff_eq!(m.privacy_loss(0.5).unwrap(), 0.0);
        assert_relative_eq!(m.privacy_loss(0.0).unwrap(), 0.125);
        for x in [-3.0, -0.25, 0.0, 1.5, 7.0] {
            let loss = m.privacy_loss(x).unwrap();
            assert_relative_eq!(m.inverse_privacy_loss(loss), x, max_relative = 1e-12, epsilon = 1e-12);
        }
    }

    #[test]
    // Purpose
    // -------
    // Verify the tail split and that it accounts for all truncated mass.
    //
    // Given
    // -----
    // - σ = 1, Δ = 1, truncation bound ln(0.02).
    //
    // Expect
    // ------
    // - x₀ = Φ⁻¹(0.01), symmetric body; pessimistic tail = {∞: 0.01,
    //   loss(−x₀): 0.01}; optimistic tail = {loss(x₀): 0.01}; body plus
    //   pessimistic tail sums to 1.
    fn tail_split_for_both_estimates() {
        // Arrange
        let m = GaussianMechanism::with_log_mass_truncation_bound(1.0, 1.0, 0.02f64.ln()).unwrap();

        // Act
        let pess = m.privacy_loss_tail(EstimateType::Pessimistic);
        let opt = m.privacy_loss_tail(EstimateType::Optimistic);

        // Assert
        assert_relative_eq!(m.noise_cdf(pess.lower_x_truncation), 0.01, max_relative = 1e-8);
        assert_eq!(pess.upper_x_truncation, -pess.lower_x_truncation);
        assert_eq!(pess.tail_probability_mass_function.len(), 2);
        assert_eq!(pess.tail_probability_mass_function[0].0, f64::INFINITY);
        assert_relative_eq!(
            pess.tail_probability_mass_function[1].0,
            m.privacy_loss(pess.upper_x_truncation).unwrap()
        );
        assert_eq!(opt.tail_probability_mass_function.len(), 1);
        assert_relative_eq!(
            opt.tail_probability_mass_function[0].0,
            m.privacy_loss(opt.lower_x_truncation).unwrap()
        );
        let body = m.noise_cdf(pess.upper_x_truncation) - m.noise_cdf(pess.lower_x_truncation);
        let tails: f64 = pess.tail_probability_mass_function.iter().map(|(_, p)| p).sum();
        assert_relative_eq!(body + tails, 1.0, max_relative = 1e-9);
    }

    #[test]
    // Purpose
    // -------
    // Verify the exact delta against
    // `Φ(Δ/2σ − εσ/Δ) − e^ε Φ(−Δ/2σ − εσ/Δ)`.
    //
    // Given
    // -----
    // - σ = 1.5, Δ = 1, ε ∈ {0, 0.3, 1, 2}.
    //
    // Expect
    // ------
    // - Agreement to 1e-12.
    fn exact_delta_matches_analytic_formula() {
        let (sigma, sens) = (1.5, 1.0);
        let m = GaussianMechanism::new(sigma, sens).unwrap();
        for eps in [0.0f64, 0.3, 1.0, 2.0] {
            let expected = std_normal_cdf(sens / (2.0 * sigma) - eps * sigma / sens)
                - eps.exp() * std_normal_cdf(-sens / (2.0 * sigma) - eps * sigma / sens);
            assert_abs_diff_eq!(m.exact_delta_for_epsilon(eps), expected, epsilon = 1e-12);
        }
    }

    #[test]
    // Purpose
    // -------
    // Verify the closed-form self-composition.
    //
    // Given
    // -----
    // - σ = 3, Δ = 2, k = 4.
    //
    // Expect
    // ------
    // - Same σ and truncation bound, sensitivity 4.
    fn self_composed_scales_sensitivity_by_sqrt_k() {
        let m = GaussianMechanism::new(3.0, 2.0).unwrap();
        let composed = m.self_composed(4).unwrap();
        assert_eq!(composed.standard_deviation(), 3.0);
        assert_relative_eq!(composed.sensitivity(), 4.0);
        assert_eq!(composed.log_mass_truncation_bound(), m.log_mass_truncation_bound());
    }

    #[test]
    // Purpose
    // -------
    // Verify construction from a guarantee and parameter validation.
    //
    // Given
    // -----
    // - (ε, δ) = (1, 1e-6), Δ = 1; invalid σ and truncation bounds.
    //
    // Expect
    // ------
    // - The calibrated mechanism meets the target; invalid inputs are
    //   rejected.
    fn from_privacy_guarantee_and_validation() {
        let params = DifferentialPrivacyParameters::new(1.0, 1e-6).unwrap();
        let m = GaussianMechanism::from_privacy_guarantee(params, 1.0, &SearchOptions::default()).unwrap();
        assert!(m.exact_delta_for_epsilon(1.0) <= 1e-6);
        assert_eq!(m.log_mass_truncation_bound(), DEFAULT_LOG_MASS_TRUNCATION_BOUND);

        assert!(GaussianMechanism::new(0.0, 1.0).is_err());
        assert!(GaussianMechanism::with_log_mass_truncation_bound(1.0, 1.0, 0.5).is_err());
        assert!(GaussianMechanism::with_log_mass_truncation_bound(1.0, 1.0, f64::NEG_INFINITY).is_err());
    }

    #[test]
    // Purpose
    // -------
    // Ensure a truncation bound whose tail mass underflows to zero is
    // refused, since its truncation point would be infinite.
    //
    // Given
    // -----
    // - Bounds -800 and -1000 (`exp(bound)` is 0 in `f64`), and the
    //   representable bound -700.
    //
    // Expect
    // ------
    // - `InvalidParameter` for the underflowing bounds; -700 is accepted and
    //   yields finite truncation points.
    fn underflowing_truncation_bound_is_rejected() {
        // Arrange / Act
        let rejected = [-800.0, -1000.0]
            .map(|bound| GaussianMechanism::with_log_mass_truncation_bound(1.0, 1.0, bound));
        let accepted = GaussianMechanism::with_log_mass_truncation_bound(1.0, 1.0, -700.0).unwrap();

        // Assert
        for result in rejected {
            assert!(matches!(result, Err(PLDError::InvalidParameter { name: "log_mass_truncation_bound", .. })));
        }
        let tail = accepted.privacy_loss_tail(EstimateType::Pessimistic);
        assert!(tail.lower_x_truncation.is_finite());
        assert_eq!(tail.upper_x_truncation, -tail.lower_x_truncation);
    }
}
