//! mechanisms::additive — a mechanism bundled with its discretized PLD.
//!
//! Purpose
//! -------
//! Pair an [`AdditiveNoiseMechanism`] with the [`PrivacyLossDistribution`]
//! built from it, so that queries can use whichever is more accurate:
//! `delta` for a given `epsilon` comes from the mechanism's exact formula,
//! while `epsilon` for a given `delta` and composition go through the
//! histogram.
//!
//! Key behaviors
//! -------------
//! - [`AdditiveNoisePrivacyLoss::new`] runs the shared construction once.
//! - `from_privacy_guarantee` on each concrete alias calibrates the
//!   mechanism first and then discretizes it.
//! - [`AdditiveNoisePrivacyLoss::self_composed`] returns the bundle of the
//!   composed mechanism when the family is closed under composition
//!   (Gaussian), keeping the exact `delta` query.
//! - [`AdditiveNoisePrivacyLoss::self_compose`] uses that closed form when
//!   it exists and falls back to k-fold convolution otherwise.
//!
//! Downstream usage
//! ----------------
//! - Hand [`AdditiveNoisePrivacyLoss::pld`] to
//!   [`PrivacyLossDistribution::compose`] to combine different mechanisms.
use crate::{
    mechanisms::{
        construction::discretize_additive_noise,
        discrete_laplace::DiscreteLaplaceMechanism,
        gaussian::GaussianMechanism,
        laplace::LaplaceMechanism,
        search::SearchOptions,
        traits::AdditiveNoiseMechanism,
    },
    pld::{
        distribution::PrivacyLossDistribution,
        errors::{PLDError, PLDResult},
        options::DiscretizationOptions,
        params::DifferentialPrivacyParameters,
    },
};

/// AdditiveNoisePrivacyLoss — an additive-noise mechanism and its PLD.
///
/// Fields
/// ------
/// - `mechanism`: `M`
///   The noise mechanism.
/// - `options`: [`DiscretizationOptions`]
///   Grid and rounding used to build `pld`; reused by `self_compose`.
/// - `pld`: [`PrivacyLossDistribution`]
///   The discretized privacy loss distribution of `mechanism`.
#[derive(Debug, Clone, PartialEq)]
pub struct AdditiveNoisePrivacyLoss<M> {
    mechanism: M,
    options: DiscretizationOptions,
    pld: PrivacyLossDistribution,
}

pub type LaplacePrivacyLoss = AdditiveNoisePrivacyLoss<LaplaceMechanism>;
pub type GaussianPrivacyLoss = AdditiveNoisePrivacyLoss<GaussianMechanism>;
pub type DiscreteLaplacePrivacyLoss = AdditiveNoisePrivacyLoss<DiscreteLaplaceMechanism>;

impl<M: AdditiveNoiseMechanism> AdditiveNoisePrivacyLoss<M> {
    /// Discretize `mechanism` with `options`.
    ///
    /// Errors
    /// ------
    /// - Propagates errors from
    ///   [`discretize_additive_noise`](crate::mechanisms::construction::discretize_additive_noise).
    pub fn new(mechanism: M, options: DiscretizationOptions) -> PLDResult<Self> {
        let pld = discretize_additive_noise(&mechanism, &options)?;
        Ok(AdditiveNoisePrivacyLoss { mechanism, options, pld })
    }

    pub fn mechanism(&self) -> &M {
        &self.mechanism
    }

    pub fn options(&self) -> &DiscretizationOptions {
        &self.options
    }

    pub fn pld(&self) -> &PrivacyLossDistribution {
        &self.pld
    }

    pub fn into_pld(self) -> PrivacyLossDistribution {
        self.pld
    }

    /// Exact hockey-stick divergence of the mechanism at `epsilon`.
    ///
    /// Unlike the histogram query, this carries no discretization error.
    pub fn get_delta_for_epsilon(&self, epsilon: f64) -> f64 {
        self.mechanism.exact_delta_for_epsilon(epsilon)
    }

    /// Smallest `epsilon` whose divergence is at most `delta`, read from the
    /// discretized PLD.
    pub fn get_epsilon_for_delta(&self, delta: f64) -> f64 {
        self.pld.get_epsilon_for_delta(delta)
    }

    /// Compose this mechanism's PLD with any other PLD on the same grid.
    ///
    /// Errors
    /// ------
    /// - `PLDError::IncompatibleGranularity` on mismatched intervals.
    pub fn compose(&self, other: &PrivacyLossDistribution) -> PLDResult<PrivacyLossDistribution> {
        self.pld.compose(other)
    }

    /// Bundle of the single mechanism equivalent to `num_times` runs, if the
    /// family is closed under composition.
    ///
    /// Returns
    /// -------
    /// - `Ok(Some(bundle))`: the composed mechanism discretized with the same
    ///   options; its `get_delta_for_epsilon` stays exact.
    /// - `Ok(None)`: no closed form; use [`Self::self_compose`].
    ///
    /// Errors
    /// ------
    /// - `PLDError::InvalidParameter` if `num_times == 0`.
    pub fn self_composed(&self, num_times: u32) -> PLDResult<Option<Self>> {
        if num_times == 0 {
            return Err(PLDError::InvalidParameter {
                name: "num_times",
                value: 0.0,
                reason: "Must be at least 1.",
            });
        }
        self.mechanism
            .self_composed(num_times)
            .map(|composed| Self::new(composed, self.options))
            .transpose()
    }

    /// PLD of `num_times` runs of this mechanism.
    ///
    /// If the mechanism family is closed under composition, the composed
    /// mechanism is discretized directly; otherwise the histogram is
    /// self-convolved.
    ///
    /// Errors
    /// ------
    /// - `PLDError::InvalidParameter` if `num_times == 0`.
    pub fn self_compose(&self, num_times: u32) -> PLDResult<PrivacyLossDistribution> {
        match self.self_composed(num_times)? {
            Some(composed) => Ok(composed.into_pld()),
            None => self.pld.self_compose(num_times),
        }
    }
}

impl LaplacePrivacyLoss {
    /// PLD of the Laplace mechanism with scale `sensitivity / ε`.
    pub fn from_privacy_guarantee(
        privacy_parameters: DifferentialPrivacyParameters, sensitivity: f64,
        options: DiscretizationOptions,
    ) -> PLDResult<Self> {
        Self::new(LaplaceMechanism::from_privacy_guarantee(privacy_parameters, sensitivity)?, options)
    }
}

impl DiscreteLaplacePrivacyLoss {
    /// PLD of the discrete Laplace mechanism with parameter `ε / sensitivity`.
    pub fn from_privacy_guarantee(
        privacy_parameters: DifferentialPrivacyParameters, sensitivity: f64,
        options: DiscretizationOptions,
    ) -> PLDResult<Self> {
        Self::new(
            DiscreteLaplaceMechanism::from_privacy_guarantee(privacy_parameters, sensitivity)?,
            options,
        )
    }
}

impl GaussianPrivacyLoss {
    /// PLD of the Gaussian mechanism with the smallest standard deviation
    /// meeting `privacy_parameters`.
    pub fn from_privacy_guarantee(
        privacy_parameters: DifferentialPrivacyParameters, sensitivity: f64,
        options: DiscretizationOptions, search_options: &SearchOptions,
    ) -> PLDResult<Self> {
        Self::new(
            GaussianMechanism::from_privacy_guarantee(privacy_parameters, sensitivity, search_options)?,
            options,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pld::options::EstimateType;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Guarantee-based construction for the three families.
    // - Exact versus histogram-based delta queries.
    // - `self_compose` / `self_composed` dispatch: closed form for Gaussian,
    //   convolution for Laplace, and rejection of zero repetitions.
    //
    // They intentionally DO NOT cover:
    // - Per-family closed forms; see each mechanism module.
    // -------------------------------------------------------------------------

    fn opts(interval: f64, estimate: EstimateType) -> DiscretizationOptions {
        DiscretizationOptions::with_interval(interval, estimate).unwrap()
    }

    #[test]
    // Purpose
    // -------
    // Verify the pure-DP Laplace scenario.
    //
    // Given
    // -----
    // - (ε, δ) = (1, 0), sensitivity 1, default options.
    //
    // Expect
    // ------
    // - parameter = 1; exact delta(1) ≈ 0; histogram delta(1) ≈ 0; total
    //   mass 1.
    fn laplace_from_privacy_guarantee_is_pure_dp() {
        // Arrange
        let params = DifferentialPrivacyParameters::pure(1.0).unwrap();

        // Act
        let pl = LaplacePrivacyLoss::from_privacy_guarantee(params, 1.0, DiscretizationOptions::default())
            .unwrap();

        // Assert
        assert_eq!(pl.mechanism().parameter(), 1.0);
        assert_abs_diff_eq!(pl.get_delta_for_epsilon(1.0), 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(pl.pld().get_delta_for_epsilon(1.0), 0.0, epsilon = 1e-12);
        assert_relative_eq!(pl.pld().total_mass(), 1.0, max_relative = 1e-9);
    }

    #[test]
    // Purpose
    // -------
    // Verify that the discrete Laplace histogram agrees with the exact delta
    // when there is no body to discretize.
    //
    // Given
    // -----
    // - a = 1, Δ = 1 (two point masses only).
    //
    // Expect
    // ------
    // - Histogram delta(0) equals the exact delta(0) = (1 − e^{-1})/(1 + e^{-1}).
    fn discrete_laplace_histogram_matches_exact_delta() {
        // Arrange
        let mech = DiscreteLaplaceMechanism::new(1.0, 1.0).unwrap();

        // Act
        let pl = DiscreteLaplacePrivacyLoss::new(mech, DiscretizationOptions::default()).unwrap();

        // Assert
        let e = (-1.0f64).exp();
        let expected = (1.0 - e) / (1.0 + e);
        assert_eq!(pl.pld().rounded_probability_mass_function().len(), 2);
        assert_relative_eq!(pl.get_delta_for_epsilon(0.0), expected, max_relative = 1e-12);
        assert_relative_eq!(pl.pld().get_delta_for_epsilon(0.0), expected, max_relative = 1e-9);
    }

    #[test]
    // Purpose
    // -------
    // Verify that the Gaussian bundle uses the closed-form self-composition.
    //
    // Given
    // -----
    // - σ = 1, Δ = 1, interval 1e-3, k = 4.
    //
    // Expect
    // ------
    // - `self_compose(4)` equals discretizing σ = 1, Δ = 2 directly, and is
    //   within 1e-2 of convolving the single-run histogram.
    fn gaussian_self_compose_uses_closed_form() {
        // Arrange
        let options = opts(1e-3, EstimateType::Pessimistic);
        let pl = GaussianPrivacyLoss::new(GaussianMechanism::new(1.0, 1.0).unwrap(), options).unwrap();
        let direct = GaussianPrivacyLoss::new(GaussianMechanism::new(1.0, 2.0).unwrap(), options).unwrap();

        // Act
        let closed_form = pl.self_compose(4).unwrap();
        let convolved = pl.pld().self_compose(4).unwrap();

        // Assert
        assert_eq!(&closed_form, direct.pld());
        let exact = direct.get_delta_for_epsilon(1.0);
        assert!(closed_form.get_delta_for_epsilon(1.0) >= exact - 1e-12);
        assert_abs_diff_eq!(
            convolved.get_delta_for_epsilon(1.0),
            closed_form.get_delta_for_epsilon(1.0),
            epsilon = 1e-2
        );
    }

    #[test]
    // Purpose
    // -------
    // Verify the convolution fallback and the zero-repetition error.
    //
    // Given
    // -----
    // - Laplace b = 1, Δ = 1, interval 1e-2.
    //
    // Expect
    // ------
    // - `self_compose(2)` equals `pld().self_compose(2)`; `self_compose(0)`
    //   is `InvalidParameter`.
    fn laplace_self_compose_falls_back_to_convolution() {
        let pl = LaplacePrivacyLoss::new(
            LaplaceMechanism::new(1.0, 1.0).unwrap(),
            opts(1e-2, EstimateType::Pessimistic),
        )
        .unwrap();
        assert_eq!(pl.self_compose(2).unwrap(), pl.pld().self_compose(2).unwrap());
        assert!(matches!(pl.self_compose(0), Err(PLDError::InvalidParameter { name: "num_times", .. })));
    }

    #[test]
    // Purpose
    // -------
    // Verify that composing a Gaussian bundle in closed form keeps an exact
    // `delta` query for the composed mechanism, while Laplace has no closed
    // form.
    //
    // Given
    // -----
    // - Gaussian σ = 2, Δ = 1, k = 9; Laplace b = 1, Δ = 1; interval 1e-3.
    //
    // Expect
    // ------
    // - The Gaussian bundle has sensitivity 3 and its exact delta equals the
    //   delta of a directly built σ = 2, Δ = 3 mechanism at several ε.
    // - Its PLD equals `self_compose(9)`.
    // - Laplace returns `None`; zero repetitions are rejected.
    fn gaussian_self_composed_keeps_exact_delta() {
        // Arrange
        let options = opts(1e-3, EstimateType::Pessimistic);
        let gaussian = GaussianPrivacyLoss::new(GaussianMechanism::new(2.0, 1.0).unwrap(), options).unwrap();
        let laplace = LaplacePrivacyLoss::new(LaplaceMechanism::new(1.0, 1.0).unwrap(), options).unwrap();
        let direct = GaussianMechanism::new(2.0, 3.0).unwrap();

        // Act
        let composed = gaussian.self_composed(9).unwrap().unwrap();

        // Assert
        assert_relative_eq!(composed.mechanism().sensitivity(), 3.0, max_relative = 1e-12);
        for eps in [0.0, 0.5, 1.0, 2.0] {
            assert_relative_eq!(
                composed.get_delta_for_epsilon(eps),
                direct.exact_delta_for_epsilon(eps),
                max_relative = 1e-12
            );
        }
        assert_eq!(composed.pld(), &gaussian.self_compose(9).unwrap());
        assert!(laplace.self_composed(3).unwrap().is_none());
        assert!(gaussian.self_composed(0).is_err());
    }

    #[test]
    // Purpose
    // -------
    // Verify Gaussian calibration end to end through the bundle.
    //
    // Given
    // -----
    // - (ε, δ) = (1, 1e-5), sensitivity 1, interval 1e-3.
    //
    // Expect
    // ------
    // - Exact delta(1) ≤ 1e-5; histogram epsilon(1e-5) close to 1.
    fn gaussian_from_privacy_guarantee_meets_target() {
        // Arrange
        let params = DifferentialPrivacyParameters::new(1.0, 1e-5).unwrap();

        // Act
        let pl = GaussianPrivacyLoss::from_privacy_guarantee(
            params,
            1.0,
            opts(1e-3, EstimateType::Pessimistic),
            &SearchOptions::default(),
        )
        .unwrap();

        // Assert
        assert!(pl.get_delta_for_epsilon(1.0) <= 1e-5);
        assert_abs_diff_eq!(pl.get_epsilon_for_delta(1e-5), 1.0, epsilon = 1e-2);
    }
}
