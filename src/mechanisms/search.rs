//! mechanisms::search — calibrating Gaussian noise to an `(ε, δ)` target.
//!
//! Purpose
//! -------
//! Find the smallest standard deviation `σ` for which the Gaussian mechanism
//! with sensitivity `Δ` is `(ε, δ)`-DP. There is no closed form, but the
//! exact hockey-stick divergence `δ(σ)` at fixed `ε` is decreasing in `σ`,
//! so a bracket-and-bisect search suffices.
//!
//! Key behaviors
//! -------------
//! - Start from the Dwork–Roth value `√(2 ln(1.5/δ)) · Δ / ε`, which is
//!   sufficient for `ε ≤ 1`; double it until the exact delta meets the
//!   target.
//! - Bisect `[0, upper]` until the bracket is narrower than the tolerance,
//!   returning the upper end so the result always satisfies the target.
//! - Log every bracket expansion and the final bracket through
//!   [`crate::logging::search_logger`].
//!
//! Invariants & assumptions
//! ------------------------
//! - `ε > 0` and `δ > 0`; otherwise no finite `σ` exists.
//! - The search evaluates the exact delta, so it never discretizes.
use slog::{debug, info};

use crate::{
    logging::search_logger,
    mechanisms::{gaussian::GaussianMechanism, traits::AdditiveNoiseMechanism},
    numerical_stability::STANDARD_DEVIATION_SEARCH_TOLERANCE,
    pld::{
        errors::{PLDError, PLDResult},
        params::DifferentialPrivacyParameters,
        validation::require_positive,
    },
};

/// Options for [`minimal_standard_deviation`].
///
/// Fields:
/// - `tolerance` — stop once the bracket width is at most this value.
/// - `verbose` — if `true`, log progress to the terminal (behind the
///   `obs_slog` feature).
///
/// Default:
/// - `tolerance`: `STANDARD_DEVIATION_SEARCH_TOLERANCE` (`1e-7`)
/// - `verbose`: `false`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchOptions {
    pub tolerance: f64,
    pub verbose: bool,
}

impl SearchOptions {
    /// Errors
    /// ------
    /// - `PLDError::InvalidParameter` if `tolerance` is not finite and
    ///   strictly positive.
    pub fn new(tolerance: f64, verbose: bool) -> PLDResult<Self> {
        let tolerance = require_positive("tolerance", tolerance)?;
        Ok(SearchOptions { tolerance, verbose })
    }
}

impl Default for SearchOptions {
    fn default() -> Self {
        SearchOptions { tolerance: STANDARD_DEVIATION_SEARCH_TOLERANCE, verbose: false }
    }
}

/// Smallest Gaussian standard deviation meeting `privacy_parameters`.
///
/// Parameters
/// ----------
/// - `privacy_parameters`: target `(ε, δ)`; both must be positive.
/// - `sensitivity`: `Δ > 0`.
/// - `options`: bracket tolerance and verbosity.
///
/// Returns
/// -------
/// `PLDResult<f64>`
///   A `σ` whose exact delta at `ε` is at most `δ`, within `tolerance` of
///   the smallest such value.
///
/// Errors
/// ------
/// - `PLDError::InvalidParameter` for `ε = 0`, `δ = 0`, or an invalid
///   sensitivity.
/// - `PLDError::SearchFailed` if doubling the upper bound overflows before
///   the target is met.
pub fn minimal_standard_deviation(
    privacy_parameters: DifferentialPrivacyParameters, sensitivity: f64, options: &SearchOptions,
) -> PLDResult<f64> {
    let epsilon = require_positive("epsilon", privacy_parameters.epsilon())?;
    let delta = require_positive("delta", privacy_parameters.delta())?;
    let sensitivity = require_positive("sensitivity", sensitivity)?;
    let log = search_logger(options.verbose);

    let meets_target =
        |sigma: f64| -> PLDResult<bool> { Ok(exact_delta(sigma, sensitivity, epsilon)? <= delta) };

    let mut upper = (2.0 * (1.5 / delta).ln()).sqrt() * sensitivity / epsilon;
    info!(log, "initial standard deviation"; "upper" => upper, "epsilon" => epsilon, "delta" => delta);
    while !meets_target(upper)? {
        upper *= 2.0;
        if !upper.is_finite() {
            return Err(PLDError::SearchFailed {
                reason: format!("no finite standard deviation reaches delta = {delta} at epsilon = {epsilon}"),
            });
        }
        info!(log, "bracket expanded"; "upper" => upper);
    }

    let mut lower = 0.0;
    while upper - lower > options.tolerance {
        let mid = 0.5 * (lower + upper);
        if mid <= lower || mid >= upper {
            break;
        }
        if meets_target(mid)? {
            upper = mid;
        } else {
            lower = mid;
        }
        debug!(log, "bisection"; "lower" => lower, "upper" => upper);
    }
    info!(log, "search finished"; "lower" => lower, "upper" => upper);
    Ok(upper)
}

// ---- Helper Methods ----

fn exact_delta(standard_deviation: f64, sensitivity: f64, epsilon: f64) -> PLDResult<f64> {
    Ok(GaussianMechanism::new(standard_deviation, sensitivity)?.exact_delta_for_epsilon(epsilon))
}

#[cfg(test)]
mod tests {
    use super::*;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - The calibrated σ meets the target while σ − tolerance·10 does not.
    // - Bracket expansion for ε > 1.
    // - Validation of ε, δ, and the tolerance.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Verify that the search returns a tight, feasible standard deviation.
    //
    // Given
    // -----
    // - (ε, δ) = (1, 1e-5), Δ = 1, default options.
    //
    // Expect
    // ------
    // - δ(σ) ≤ 1e-5 and δ(σ − 1e-6) > 1e-5; σ below the Dwork–Roth value.
    fn calibrated_standard_deviation_is_tight() {
        // Arrange
        let params = DifferentialPrivacyParameters::new(1.0, 1e-5).unwrap();

        // Act
        let sigma = minimal_standard_deviation(params, 1.0, &SearchOptions::default()).unwrap();

        // Assert
        assert!(exact_delta(sigma, 1.0, 1.0).unwrap() <= 1e-5);
        assert!(exact_delta(sigma - 1e-6, 1.0, 1.0).unwrap() > 1e-5);
        assert!(sigma < (2.0 * (1.5f64 / 1e-5).ln()).sqrt());
    }

    #[test]
    // Purpose
    // -------
    // Exercise the search for a large ε and a scaled sensitivity.
    //
    // Given
    // -----
    // - (ε, δ) = (5, 1e-3), Δ = 2, tolerance 1e-9.
    //
    // Expect
    // ------
    // - The result meets the target, and σ scales linearly with Δ.
    fn large_epsilon_search_meets_target_and_scales_with_sensitivity() {
        // Arrange
        let params = DifferentialPrivacyParameters::new(5.0, 1e-3).unwrap();
        let opts = SearchOptions::new(1e-9, false).unwrap();

        // Act
        let sigma_2 = minimal_standard_deviation(params, 2.0, &opts).unwrap();
        let sigma_1 = minimal_standard_deviation(params, 1.0, &opts).unwrap();

        // Assert
        assert!(exact_delta(sigma_2, 2.0, 5.0).unwrap() <= 1e-3);
        assert!((sigma_2 - 2.0 * sigma_1).abs() < 1e-6, "{sigma_2} vs 2 * {sigma_1}");
    }

    #[test]
    // Purpose
    // -------
    // Ensure degenerate targets and options are rejected.
    //
    // Given
    // -----
    // - δ = 0; ε = 0; tolerance 0.
    //
    // Expect
    // ------
    // - `InvalidParameter` in each case.
    fn degenerate_targets_are_rejected() {
        let opts = SearchOptions::default();
        let pure = DifferentialPrivacyParameters::pure(1.0).unwrap();
        let zero_eps = DifferentialPrivacyParameters::new(0.0, 1e-5).unwrap();
        assert!(matches!(
            minimal_standard_deviation(pure, 1.0, &opts),
            Err(PLDError::InvalidParameter { name: "delta", .. })
        ));
        assert!(matches!(
            minimal_standard_deviation(zero_eps, 1.0, &opts),
            Err(PLDError::InvalidParameter { name: "epsilon", .. })
        ));
        assert!(SearchOptions::new(0.0, false).is_err());
    }
}
