//! Public API surface for additive-noise mechanisms.
//!
//! - [`AdditiveNoiseMechanism`]: capability set every noise family provides
//!   (privacy loss, its inverse, the noise CDF, and the tail split).
//! - [`NoiseKind`]: whether the noise is supported on the reals or on the
//!   integers; selects the body discretization strategy.
//! - [`TailPrivacyLossDistribution`]: the body interval plus the tail mass
//!   handled as explicit point masses.
//!
//! Convention: the mechanism outputs `f(D) + Z`. With `μ_upper` the law of
//! `Z` and `μ_lower` the law of `Z + Δ`, the privacy loss at noise value `x`
//! is `ln(μ_upper(x) / μ_lower(x))`. Every implementation assumes this loss
//! is non-increasing in `x`; the construction and the exact-delta formula
//! both rely on it.
use crate::pld::{errors::PLDResult, options::EstimateType};

/// Support of the noise distribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoiseKind {
    Continuous,
    Discrete,
}

/// Tail split of a mechanism's privacy loss distribution.
///
/// Fields:
/// - `lower_x_truncation`, `upper_x_truncation`: the body interval of noise
///   values discretized step by step.
/// - `tail_probability_mass_function`: `(privacy loss, mass)` pairs for the
///   noise mass outside the body. A loss of `+∞` marks mass that goes to the
///   infinity mass of the resulting PLD.
#[derive(Debug, Clone, PartialEq)]
pub struct TailPrivacyLossDistribution {
    pub lower_x_truncation: f64,
    pub upper_x_truncation: f64,
    pub tail_probability_mass_function: Vec<(f64, f64)>,
}

/// Capability set of an additive-noise mechanism.
///
/// Required:
/// - `sensitivity()`: `Δ > 0`, the shift between `μ_upper` and `μ_lower`.
/// - `noise_kind()`: continuous or integer-valued noise.
/// - `privacy_loss(x)`: loss at noise value `x`.
///   - Errors: `PLDError::UndefinedInput` for points outside the support
///     (non-integers for discrete noise).
/// - `inverse_privacy_loss(l)`: largest `x` with `privacy_loss(x) ≥ l`;
///   `+∞` when `l` is at or below the infimum loss, `−∞` when `l` exceeds
///   the supremum loss.
/// - `noise_cdf(x)`: `P(Z ≤ x)`.
/// - `privacy_loss_tail(estimate)`: body interval and tail masses.
///
/// Optional:
/// - `exact_delta_for_epsilon(ε)`: hockey-stick divergence computed directly
///   from the noise CDF.
/// - `self_composed(k)`: a single mechanism equivalent to `k` runs of this
///   one, when the family is closed under composition.
pub trait AdditiveNoiseMechanism {
    // Required methods
    fn sensitivity(&self) -> f64;
    fn noise_kind(&self) -> NoiseKind;
    fn privacy_loss(&self, x: f64) -> PLDResult<f64>;
    fn inverse_privacy_loss(&self, privacy_loss: f64) -> f64;
    fn noise_cdf(&self, x: f64) -> f64;
    fn privacy_loss_tail(&self, estimate: EstimateType) -> TailPrivacyLossDistribution;

    // Optional methods

    /// `CDF(x*) − e^ε · CDF(x* − Δ)` with `x* = inverse_privacy_loss(ε)`,
    /// clamped at 0.
    ///
    /// Since the loss is non-increasing, `{x ≤ x*}` is exactly the set of
    /// noise values whose loss is at least `ε`, which is where the
    /// hockey-stick integrand is positive.
    fn exact_delta_for_epsilon(&self, epsilon: f64) -> f64 {
        let x_cutoff = self.inverse_privacy_loss(epsilon);
        let delta =
            self.noise_cdf(x_cutoff) - epsilon.exp() * self.noise_cdf(x_cutoff - self.sensitivity());
        if delta.is_nan() { 0.0 } else { delta.max(0.0) }
    }

    fn self_composed(&self, _num_times: u32) -> Option<Self>
    where
        Self: Sized,
    {
        None
    }
}
