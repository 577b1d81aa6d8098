//! pld::distribution — the privacy loss distribution and its operations.
//!
//! Purpose
//! -------
//! Represent the privacy loss distribution (PLD) of a pair of distributions
//! `(μ_upper, μ_lower)`: the law of `ln(μ_upper(o) / μ_lower(o))` for
//! `o ~ μ_upper`, discretized onto a grid of width
//! `value_discretization_interval`, with the mass of infinite loss tracked
//! separately. From a PLD one reads off the tight `delta` for any `epsilon`
//! (the ε-hockey-stick divergence) and vice versa, and composing mechanisms
//! amounts to convolving their PLDs.
//!
//! Key behaviors
//! -------------
//! - Closed-form factories: [`PrivacyLossDistribution::from_privacy_parameters`]
//!   (worst-case PLD of an `(ε, δ)`-DP mechanism) and
//!   [`PrivacyLossDistribution::from_randomized_response`].
//! - Queries: [`PrivacyLossDistribution::get_delta_for_epsilon`] and
//!   [`PrivacyLossDistribution::get_epsilon_for_delta`].
//! - Composition: [`PrivacyLossDistribution::compose`] (pairwise) and
//!   [`PrivacyLossDistribution::self_compose`] (k-fold).
//!
//! Invariants & assumptions
//! ------------------------
//! - Every stored bucket has strictly positive mass.
//! - Every bucket key lies in `[-MAX_BUCKET_KEY, MAX_BUCKET_KEY]`, so key
//!   arithmetic during composition is checked before convolving.
//! - `infinity_mass ∈ [0, 1]` and `infinity_mass + Σ masses ≤ 1` up to
//!   floating-point rounding (equality for exact, untruncated PLDs).
//! - Values are immutable after construction; composition returns a new PLD.
//!
//! Conventions
//! -----------
//! - Bucket key `i` represents the loss value `i · value_discretization_interval`;
//!   keys are integers so that composition never accumulates error in the
//!   grid itself.
//!
//! Testing notes
//! -------------
//! - Unit tests cover the closed-form factories, both queries on
//!   hand-computable PLDs (including the infinite-mass and underflow
//!   branches), monotonicity, composition rules for the infinity mass, and
//!   agreement between `compose` and `self_compose`.
use std::collections::BTreeMap;

use crate::{
    convolution::{convolve_dictionary, self_convolve_dictionary},
    numerical_stability::MAX_BUCKET_KEY,
    pld::{
        errors::{PLDError, PLDResult},
        options::DiscretizationOptions,
        params::DifferentialPrivacyParameters,
        options::EstimateType,
        validation::{require_open_unit, require_positive},
    },
};

/// PrivacyLossDistribution — discretized privacy loss with infinity mass.
///
/// Fields
/// ------
/// - `rounded_probability_mass_function`: `BTreeMap<i64, f64>`
///   Bucket key → probability mass; key `i` stands for loss
///   `i · value_discretization_interval`.
/// - `value_discretization_interval`: `f64`
///   Grid width. Two PLDs compose only if their widths are identical.
/// - `infinity_mass`: `f64`
///   Mass of outcomes with infinite privacy loss (outcomes possible only
///   under `μ_upper`, or tails folded in by pessimistic truncation).
#[derive(Debug, Clone, PartialEq)]
pub struct PrivacyLossDistribution {
    rounded_probability_mass_function: BTreeMap<i64, f64>,
    value_discretization_interval: f64,
    infinity_mass: f64,
}

impl PrivacyLossDistribution {
    /// Build a PLD from an already rounded histogram.
    ///
    /// Buckets with non-positive mass are dropped and `infinity_mass` is
    /// capped at 1 to absorb summation round-off.
    ///
    /// Errors
    /// ------
    /// - `PLDError::InvalidParameter` if the interval is not finite and
    ///   positive, if `infinity_mass` is negative or NaN, or if a key lies
    ///   outside `[-MAX_BUCKET_KEY, MAX_BUCKET_KEY]`.
    pub fn new(
        mut rounded_probability_mass_function: BTreeMap<i64, f64>,
        value_discretization_interval: f64, infinity_mass: f64,
    ) -> PLDResult<Self> {
        let value_discretization_interval =
            require_positive("value_discretization_interval", value_discretization_interval)?;
        if !(infinity_mass >= 0.0) {
            return Err(PLDError::InvalidParameter {
                name: "infinity_mass",
                value: infinity_mass,
                reason: "Must be a probability in [0, 1].",
            });
        }
        rounded_probability_mass_function.retain(|_, mass| *mass > 0.0);
        if let Some((lowest, highest)) = key_range(&rounded_probability_mass_function) {
            require_key_range(i128::from(lowest), i128::from(highest))?;
        }
        Ok(PrivacyLossDistribution {
            rounded_probability_mass_function,
            value_discretization_interval,
            infinity_mass: infinity_mass.min(1.0),
        })
    }

    /// Pessimistic PLD of a mechanism known only to be `(ε, δ)`-DP.
    ///
    /// The worst case places mass `δ` at `+∞`,
    /// `(1 − δ) / (1 + e^{−ε})` at `ε`, and `(1 − δ) / (1 + e^{ε})` at `−ε`.
    /// Both finite values are rounded up onto the grid.
    ///
    /// Errors
    /// ------
    /// - `PLDError::InvalidParameter` if the interval is invalid, or if
    ///   `ε / interval` has no bucket key (for instance `ε = +∞`).
    pub fn from_privacy_parameters(
        privacy_parameters: DifferentialPrivacyParameters, value_discretization_interval: f64,
    ) -> PLDResult<Self> {
        let interval = require_positive("value_discretization_interval", value_discretization_interval)?;
        let epsilon = privacy_parameters.epsilon();
        let delta = privacy_parameters.delta();

        let mut pmf = BTreeMap::new();
        let upper_key = EstimateType::Pessimistic.round(epsilon / interval)?;
        let lower_key = EstimateType::Pessimistic.round(-epsilon / interval)?;
        add_mass(&mut pmf, upper_key, (1.0 - delta) / (1.0 + (-epsilon).exp()));
        add_mass(&mut pmf, lower_key, (1.0 - delta) / (1.0 + epsilon.exp()));
        Self::new(pmf, interval, delta)
    }

    /// Exact PLD of k-ary randomized response.
    ///
    /// With probability `1 − p` the mechanism reports its input bucket, and
    /// with probability `p` a uniformly random one of the `k` buckets. For
    /// neighbouring inputs `x ≠ x'`:
    /// - `o = x` has mass `1 − p + p/k` and loss `ln((1 − p + p/k) / (p/k))`;
    /// - `o = x'` has mass `p/k` and the negated loss;
    /// - each of the other `k − 2` outputs has mass `p/k` and loss 0.
    ///
    /// Errors
    /// ------
    /// - `PLDError::InvalidParameter` if `p ∉ (0, 1)` or `k ≤ 1`.
    pub fn from_randomized_response(
        noise_parameter: f64, num_buckets: u64, options: &DiscretizationOptions,
    ) -> PLDResult<Self> {
        let noise_parameter = require_open_unit("noise_parameter", noise_parameter)?;
        if num_buckets <= 1 {
            return Err(PLDError::InvalidParameter {
                name: "num_buckets",
                value: num_buckets as f64,
                reason: "Must be strictly greater than 1.",
            });
        }
        let k = num_buckets as f64;
        let output_equal_input = (1.0 - noise_parameter) + noise_parameter / k;
        let output_not_input = noise_parameter / k;

        let mut pmf = BTreeMap::new();
        add_mass(&mut pmf, options.bucket((output_equal_input / output_not_input).ln())?, output_equal_input);
        add_mass(&mut pmf, options.bucket((output_not_input / output_equal_input).ln())?, output_not_input);
        add_mass(&mut pmf, 0, output_not_input * (k - 2.0));
        Self::new(pmf, options.value_discretization_interval(), 0.0)
    }

    pub fn rounded_probability_mass_function(&self) -> &BTreeMap<i64, f64> {
        &self.rounded_probability_mass_function
    }

    pub fn value_discretization_interval(&self) -> f64 {
        self.value_discretization_interval
    }

    pub fn infinity_mass(&self) -> f64 {
        self.infinity_mass
    }

    /// `infinity_mass + Σ masses`; 1 for exact PLDs, below 1 when mass was
    /// discarded by optimistic truncation.
    pub fn total_mass(&self) -> f64 {
        self.infinity_mass + self.rounded_probability_mass_function.values().sum::<f64>()
    }

    /// ε-hockey-stick divergence between `μ_upper` and `μ_lower`.
    ///
    /// Returns `infinity_mass + Σ_{v > ε} mass(v) · (1 − e^{ε − v})`, which
    /// is the `delta` for which the underlying mechanism is `(ε, δ)`-DP.
    /// Buckets at or below `ε` contribute nothing.
    pub fn get_delta_for_epsilon(&self, epsilon: f64) -> f64 {
        let mut divergence = self.infinity_mass;
        for (&key, &mass) in self.rounded_probability_mass_function.iter().rev() {
            let value = key as f64 * self.value_discretization_interval;
            if value <= epsilon {
                break;
            }
            divergence += (1.0 - (epsilon - value).exp()) * mass;
        }
        divergence
    }

    /// Smallest non-negative `ε` whose hockey-stick divergence is ≤ `delta`.
    ///
    /// Returns `+∞` when `infinity_mass > delta`, since no finite `ε` can
    /// then reach the target.
    ///
    /// Notes
    /// -----
    /// - Walks buckets from the largest loss downward, keeping
    ///   `mass_upper = infinity_mass + Σ mass(v)` and
    ///   `mass_lower = Σ mass(v) · e^{−v}` over the buckets seen so far. For
    ///   an `ε` below every unseen bucket, the divergence is
    ///   `mass_upper − e^{ε} · mass_lower`, so the answer is
    ///   `ln((mass_upper − δ) / mass_lower)` once that value is at least the
    ///   next bucket's loss.
    /// - If `e^{−v}` underflows so that `mass_lower` stays 0 while
    ///   `mass_upper ≥ δ`, the answer is `max(0, v)` for that bucket.
    pub fn get_epsilon_for_delta(&self, delta: f64) -> f64 {
        if self.infinity_mass > delta {
            return f64::INFINITY;
        }

        let mut mass_upper = self.infinity_mass;
        let mut mass_lower = 0.0;
        for (&key, &mass) in self.rounded_probability_mass_function.iter().rev() {
            let value = key as f64 * self.value_discretization_interval;

            if mass_upper > delta
                && mass_lower > 0.0
                && ((mass_upper - delta) / mass_lower).ln() >= value
            {
                break;
            }

            mass_upper += mass;
            mass_lower += (-value).exp() * mass;

            if mass_upper >= delta && mass_lower == 0.0 {
                return value.max(0.0);
            }
        }

        if mass_upper <= mass_lower + delta {
            0.0
        } else {
            ((mass_upper - delta) / mass_lower).ln()
        }
    }

    /// `(ε, δ)` pair reported at the given `epsilon`.
    pub fn privacy_parameters_at(&self, epsilon: f64) -> PLDResult<DifferentialPrivacyParameters> {
        DifferentialPrivacyParameters::new(epsilon, self.get_delta_for_epsilon(epsilon).clamp(0.0, 1.0))
    }

    /// PLD of running both mechanisms on the same data.
    ///
    /// The histogram is the convolution of the two histograms; the infinity
    /// mass is `a + b − a·b`, since the composed loss is infinite as soon
    /// as either part is.
    ///
    /// Errors
    /// ------
    /// - `PLDError::IncompatibleGranularity` if the discretization intervals
    ///   differ.
    /// - `PLDError::InvalidParameter` if a composed key would leave
    ///   `[-MAX_BUCKET_KEY, MAX_BUCKET_KEY]`.
    pub fn compose(&self, other: &PrivacyLossDistribution) -> PLDResult<Self> {
        if self.value_discretization_interval != other.value_discretization_interval {
            return Err(PLDError::IncompatibleGranularity {
                left: self.value_discretization_interval,
                right: other.value_discretization_interval,
            });
        }
        if let (Some((a_low, a_high)), Some((b_low, b_high))) = (
            key_range(&self.rounded_probability_mass_function),
            key_range(&other.rounded_probability_mass_function),
        ) {
            require_key_range(
                i128::from(a_low) + i128::from(b_low),
                i128::from(a_high) + i128::from(b_high),
            )?;
        }
        let pmf = convolve_dictionary(
            &self.rounded_probability_mass_function,
            &other.rounded_probability_mass_function,
        );
        let infinity_mass =
            self.infinity_mass + other.infinity_mass - self.infinity_mass * other.infinity_mass;
        Self::new(pmf, self.value_discretization_interval, infinity_mass)
    }

    /// PLD of running this mechanism `num_times` times.
    ///
    /// The histogram is the k-fold self-convolution; the infinity mass is
    /// `1 − (1 − infinity_mass)^k`. `num_times = 1` returns an identical PLD.
    ///
    /// Errors
    /// ------
    /// - `PLDError::InvalidParameter` if `num_times == 0`, or if a composed
    ///   key would leave `[-MAX_BUCKET_KEY, MAX_BUCKET_KEY]`.
    pub fn self_compose(&self, num_times: u32) -> PLDResult<Self> {
        if num_times == 0 {
            return Err(PLDError::InvalidParameter {
                name: "num_times",
                value: 0.0,
                reason: "Must be at least 1.",
            });
        }
        if num_times == 1 {
            return Ok(self.clone());
        }
        if let Some((lowest, highest)) = key_range(&self.rounded_probability_mass_function) {
            let k = i128::from(num_times);
            require_key_range(i128::from(lowest) * k, i128::from(highest) * k)?;
        }
        let pmf = self_convolve_dictionary(&self.rounded_probability_mass_function, num_times);
        let infinity_mass = 1.0 - (1.0 - self.infinity_mass).powi(num_times as i32);
        Self::new(pmf, self.value_discretization_interval, infinity_mass)
    }
}

// ---- Helper Methods ----

fn key_range(pmf: &BTreeMap<i64, f64>) -> Option<(i64, i64)> {
    let (&lowest, _) = pmf.first_key_value()?;
    let (&highest, _) = pmf.last_key_value()?;
    Some((lowest, highest))
}

fn require_key_range(lowest: i128, highest: i128) -> PLDResult<()> {
    let bound = i128::from(MAX_BUCKET_KEY);
    let offending = if lowest < -bound {
        lowest
    } else if highest > bound {
        highest
    } else {
        return Ok(());
    };
    Err(PLDError::InvalidParameter {
        name: "bucket_key",
        value: offending as f64,
        reason: "Privacy-loss bucket keys must lie within [-MAX_BUCKET_KEY, MAX_BUCKET_KEY].",
    })
}

/// Add `mass` to `key`, ignoring non-positive contributions.
#[inline]
pub(crate) fn add_mass(pmf: &mut BTreeMap<i64, f64>, key: i64, mass: f64) {
    if mass > 0.0 {
        *pmf.entry(key).or_insert(0.0) += mass;
    }
}
