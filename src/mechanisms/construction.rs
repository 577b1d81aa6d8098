//! mechanisms::construction — discretized PLD of an additive-noise mechanism.
//!
//! Purpose
//! -------
//! Turn any [`AdditiveNoiseMechanism`] into a [`PrivacyLossDistribution`]
//! in one shared routine, parameterized by the mechanism's capabilities.
//!
//! Key behaviors
//! -------------
//! - Seed the histogram from the tail split: finite tail losses are rounded
//!   onto the grid, a `+∞` tail loss becomes the infinity mass.
//! - Discrete noise: every integer in the body gets its own point mass,
//!   bucketed by its rounded loss.
//! - Continuous noise: walk the body from `lower_x_truncation` upward in
//!   steps of exactly one grid unit of loss. Step `s` covers noise values
//!   whose loss lies in `[s·g, (s + 1)·g]`; its CDF mass goes to bucket
//!   `s + 1` (pessimistic) or `s` (optimistic).
//!
//! Invariants & assumptions
//! ------------------------
//! - The mechanism's loss is non-increasing in `x`, so each step's upper
//!   edge `inverse_privacy_loss(s·g)` is at or above its lower edge. The
//!   upper edge is clamped to that range anyway, since `s·g` can land a
//!   rounding error above the supremum loss.
//! - Both truncation points and the loss at `lower_x_truncation` are
//!   finite; a tail that breaks this is rejected before any walk starts.
//! - The walk terminates because each step either reaches
//!   `upper_x_truncation` or moves to a strictly smaller loss.
use std::collections::BTreeMap;

use crate::{
    mechanisms::traits::{AdditiveNoiseMechanism, NoiseKind},
    pld::{
        distribution::{PrivacyLossDistribution, add_mass},
        errors::{PLDError, PLDResult},
        options::{DiscretizationOptions, EstimateType},
    },
};

/// Discretize the privacy loss distribution of `mechanism`.
///
/// Parameters
/// ----------
/// - `mechanism`: any [`AdditiveNoiseMechanism`].
/// - `options`: grid width and rounding direction. The truncation bound of
///   `options` is not used here; each mechanism carries its own tail split.
///
/// Returns
/// -------
/// `PLDResult<PrivacyLossDistribution>`
///
/// Errors
/// ------
/// - `PLDError::InvalidParameter` if a truncation point or the loss at the
///   lower truncation point is not finite, or if a loss has no bucket key.
/// - Propagates `PLDError::UndefinedInput` if the mechanism rejects a body
///   point, which does not happen for well-formed tails.
pub fn discretize_additive_noise<M: AdditiveNoiseMechanism>(
    mechanism: &M, options: &DiscretizationOptions,
) -> PLDResult<PrivacyLossDistribution> {
    let estimate = options.estimate();
    let interval = options.value_discretization_interval();
    let tail = mechanism.privacy_loss_tail(estimate);
    for (name, value) in [
        ("lower_x_truncation", tail.lower_x_truncation),
        ("upper_x_truncation", tail.upper_x_truncation),
    ] {
        if !value.is_finite() {
            return Err(PLDError::InvalidParameter { name, value, reason: "Must be finite." });
        }
    }

    let mut pmf = BTreeMap::new();
    let mut infinity_mass = 0.0;
    for &(privacy_loss, mass) in &tail.tail_probability_mass_function {
        if privacy_loss == f64::INFINITY {
            infinity_mass += mass;
        } else {
            add_mass(&mut pmf, options.bucket(privacy_loss)?, mass);
        }
    }

    match mechanism.noise_kind() {
        NoiseKind::Discrete => {
            let start = tail.lower_x_truncation.ceil() as i64;
            let end = tail.upper_x_truncation.floor() as i64;
            for x in start..=end {
                let x = x as f64;
                let mass = mechanism.noise_cdf(x) - mechanism.noise_cdf(x - 1.0);
                add_mass(&mut pmf, options.bucket(mechanism.privacy_loss(x)?)?, mass);
            }
        }
        NoiseKind::Continuous => {
            let mut lower_x = tail.lower_x_truncation;
            let mut step = EstimateType::Optimistic.round(mechanism.privacy_loss(lower_x)? / interval)?;
            while lower_x < tail.upper_x_truncation {
                let upper_x = tail
                    .upper_x_truncation
                    .min(mechanism.inverse_privacy_loss(interval * step as f64))
                    .max(lower_x);
                let mass = mechanism.noise_cdf(upper_x) - mechanism.noise_cdf(lower_x);
                add_mass(&mut pmf, estimate.round(step as f64 + 0.5)?, mass);
                lower_x = upper_x;
                step -= 1;
            }
        }
    }

    PrivacyLossDistribution::new(pmf, interval, infinity_mass)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mechanisms::{
        discrete_laplace::DiscreteLaplaceMechanism, gaussian::GaussianMechanism,
        laplace::LaplaceMechanism, traits::TailPrivacyLossDistribution,
    };
    use approx::assert_relative_eq;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Mass conservation of the shared construction for continuous and
    //   discrete noise.
    // - The pessimistic / optimistic bracketing of the exact delta.
    // - Placement of tail masses and the infinity mass.
    // - Rejection of tails whose truncation points are not finite.
    // -------------------------------------------------------------------------

    /// Linear-loss mechanism whose tail truncates at `(-∞, +∞)`.
    struct UnboundedBody;

    impl AdditiveNoiseMechanism for UnboundedBody {
        fn sensitivity(&self) -> f64 {
            1.0
        }

        fn noise_kind(&self) -> NoiseKind {
            NoiseKind::Continuous
        }

        fn privacy_loss(&self, x: f64) -> PLDResult<f64> {
            Ok(0.5 - x)
        }

        fn inverse_privacy_loss(&self, privacy_loss: f64) -> f64 {
            0.5 - privacy_loss
        }

        fn noise_cdf(&self, _x: f64) -> f64 {
            0.5
        }

        fn privacy_loss_tail(&self, _estimate: EstimateType) -> TailPrivacyLossDistribution {
            TailPrivacyLossDistribution {
                lower_x_truncation: f64::NEG_INFINITY,
                upper_x_truncation: f64::INFINITY,
                tail_probability_mass_function: Vec::new(),
            }
        }
    }

    fn opts(interval: f64, estimate: EstimateType) -> DiscretizationOptions {
        DiscretizationOptions::with_interval(interval, estimate).unwrap()
    }

    #[test]
    // Purpose
    // -------
    // Verify that the Laplace PLD keeps all mass and brackets the exact
    // delta.
    //
    // Given
    // -----
    // - b = 1, Δ = 1, interval 1e-3, both estimate types.
    //
    // Expect
    // ------
    // - Total mass 1 and no infinity mass in both modes.
    // - pessimistic delta(ε) ≥ exact ≥ optimistic delta(ε) for several ε.
    fn laplace_pld_conserves_mass_and_brackets_exact_delta() {
        // Arrange
        let m = LaplaceMechanism::new(1.0, 1.0).unwrap();

        // Act
        let pess = discretize_additive_noise(&m, &opts(1e-3, EstimateType::Pessimistic)).unwrap();
        let opt = discretize_additive_noise(&m, &opts(1e-3, EstimateType::Optimistic)).unwrap();

        // Assert
        for pld in [&pess, &opt] {
            assert_relative_eq!(pld.total_mass(), 1.0, max_relative = 1e-9);
            assert_eq!(pld.infinity_mass(), 0.0);
        }
        for eps in [0.0, 0.2, 0.5, 0.9] {
            let exact = m.exact_delta_for_epsilon(eps);
            assert!(pess.get_delta_for_epsilon(eps) >= exact - 1e-12, "pessimistic at {eps}");
            assert!(opt.get_delta_for_epsilon(eps) <= exact + 1e-12, "optimistic at {eps}");
            assert!(pess.get_delta_for_epsilon(eps) - opt.get_delta_for_epsilon(eps) < 5e-3);
        }
    }

    #[test]
    // Purpose
    // -------
    // Verify the Gaussian tail handling: pessimistic construction carries the
    // lower tail as infinity mass, optimistic construction drops the upper
    // tail.
    //
    // Given
    // -----
    // - σ = 1, Δ = 1, truncation bound ln(2e-6), interval 1e-2.
    //
    // Expect
    // ------
    // - Pessimistic: infinity mass 1e-6, total mass 1.
    // - Optimistic: no infinity mass, total mass 1 − 1e-6.
    fn gaussian_tails_follow_estimate_type() {
        // Arrange
        let m = GaussianMechanism::with_log_mass_truncation_bound(1.0, 1.0, 2e-6f64.ln()).unwrap();

        // Act
        let pess = discretize_additive_noise(&m, &opts(1e-2, EstimateType::Pessimistic)).unwrap();
        let opt = discretize_additive_noise(&m, &opts(1e-2, EstimateType::Optimistic)).unwrap();

        // Assert
        assert_relative_eq!(pess.infinity_mass(), 1e-6, max_relative = 1e-9);
        assert_relative_eq!(pess.total_mass(), 1.0, max_relative = 1e-9);
        assert_eq!(opt.infinity_mass(), 0.0);
        assert_relative_eq!(opt.total_mass(), 1.0 - 1e-6, max_relative = 1e-9);
    }

    #[test]
    // Purpose
    // -------
    // Verify the discrete body: one bucket per integer in `1..=Δ−1`.
    //
    // Given
    // -----
    // - a = 0.5, Δ = 3, interval 1e-4, pessimistic.
    //
    // Expect
    // ------
    // - Buckets at ±1.5 (tails) and ±0.5 (x = 1, 2) with the matching PMF
    //   values; total mass 1.
    fn discrete_laplace_body_is_bucketed_per_integer() {
        // Arrange
        let m = DiscreteLaplaceMechanism::new(0.5, 3.0).unwrap();

        // Act
        let pld = discretize_additive_noise(&m, &opts(1e-4, EstimateType::Pessimistic)).unwrap();

        // Assert
        let pmf = pld.rounded_probability_mass_function();
        assert_eq!(pmf.len(), 4);
        let point = |x: f64| m.noise_cdf(x) - m.noise_cdf(x - 1.0);
        assert_relative_eq!(pmf[&5000], point(1.0), max_relative = 1e-12);
        assert_relative_eq!(pmf[&-5000], point(2.0), max_relative = 1e-12);
        assert_relative_eq!(pmf[&15000], m.noise_cdf(0.0), max_relative = 1e-12);
        assert_relative_eq!(pmf[&-15000], m.noise_cdf(-3.0), max_relative = 1e-12);
        assert_relative_eq!(pld.total_mass(), 1.0, max_relative = 1e-12);
    }

    #[test]
    // Purpose
    // -------
    // Ensure a tail with infinite truncation points is rejected up front
    // instead of starting a body walk that never reaches its end.
    //
    // Given
    // -----
    // - A mechanism whose tail reports the body `(-∞, +∞)`.
    //
    // Expect
    // ------
    // - `InvalidParameter` naming `lower_x_truncation`, in both modes.
    fn infinite_truncation_points_are_rejected() {
        for estimate in [EstimateType::Pessimistic, EstimateType::Optimistic] {
            // Act
            let result = discretize_additive_noise(&UnboundedBody, &opts(1e-2, estimate));

            // Assert
            assert!(matches!(
                result,
                Err(PLDError::InvalidParameter { name: "lower_x_truncation", .. })
            ));
        }
    }
}
