//! pld::options — discretization configuration for privacy loss distributions.
//!
//! Purpose
//! -------
//! Collect the knobs that govern how a (possibly continuous) privacy-loss
//! random variable is turned into an integer-keyed histogram: the bucket
//! width, the rounding direction, and the log-mass below which outcomes are
//! not tracked individually.
//!
//! Key behaviors
//! -------------
//! - [`EstimateType`] fixes the rounding direction: pessimistic rounds loss
//!   values up (so `delta` queries never underestimate), optimistic rounds
//!   them down (so they never overestimate).
//! - [`DiscretizationOptions`] bundles the interval, estimate type, and
//!   truncation bound, validating the interval at construction.
//!
//! Invariants & assumptions
//! ------------------------
//! - `value_discretization_interval` is finite and strictly positive.
//! - `log_mass_truncation_bound` is not NaN; `-∞` disables truncation.
//!
//! Downstream usage
//! ----------------
//! - Pass a [`DiscretizationOptions`] to every PLD factory. The default is
//!   pessimistic with interval `1e-4` and no truncation.

use crate::{
    numerical_stability::{DEFAULT_VALUE_DISCRETIZATION_INTERVAL, MAX_BUCKET_KEY},
    pld::{
        errors::{PLDError, PLDResult},
        validation::require_positive,
    },
};

/// Rounding direction applied to privacy-loss values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EstimateType {
    /// Round loss values up; `delta` queries give an upper bound.
    #[default]
    Pessimistic,
    /// Round loss values down; `delta` queries give a lower bound.
    Optimistic,
}

impl EstimateType {
    /// Map a boolean `pessimistic_estimate` flag onto the enum.
    pub fn from_pessimistic(pessimistic_estimate: bool) -> Self {
        if pessimistic_estimate { EstimateType::Pessimistic } else { EstimateType::Optimistic }
    }

    pub fn is_pessimistic(&self) -> bool {
        matches!(self, EstimateType::Pessimistic)
    }

    /// Round `x` to a bucket key in this estimate's direction (`ceil` or
    /// `floor`).
    ///
    /// Errors
    /// ------
    /// - `PLDError::InvalidParameter` if `x` is NaN or infinite, or if the
    ///   rounded value exceeds `MAX_BUCKET_KEY` in magnitude.
    #[inline]
    pub fn round(&self, x: f64) -> PLDResult<i64> {
        let rounded = match self {
            EstimateType::Pessimistic => x.ceil(),
            EstimateType::Optimistic => x.floor(),
        };
        if !(rounded.abs() <= MAX_BUCKET_KEY as f64) {
            return Err(PLDError::InvalidParameter {
                name: "privacy_loss",
                value: x,
                reason: "Must be finite and within the bucket key range once discretized.",
            });
        }
        Ok(rounded as i64)
    }
}

/// DiscretizationOptions — how privacy-loss values are bucketed.
///
/// Fields
/// ------
/// - `value_discretization_interval`: `f64`
///   Bucket width; a bucket key `i` represents loss `i * interval`.
/// - `estimate`: [`EstimateType`]
///   Rounding direction for loss values.
/// - `log_mass_truncation_bound`: `f64`
///   Outcomes whose upper-distribution log-mass is at or below this bound
///   are folded into the infinity mass (pessimistic) or dropped
///   (optimistic). Only used when building from explicit distributions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiscretizationOptions {
    value_discretization_interval: f64,
    estimate: EstimateType,
    log_mass_truncation_bound: f64,
}

impl DiscretizationOptions {
    /// Build validated options.
    ///
    /// Errors
    /// ------
    /// - `PLDError::InvalidParameter` if the interval is not finite and
    ///   strictly positive, or if the truncation bound is NaN.
    pub fn new(
        value_discretization_interval: f64, estimate: EstimateType, log_mass_truncation_bound: f64,
    ) -> PLDResult<Self> {
        let value_discretization_interval =
            require_positive("value_discretization_interval", value_discretization_interval)?;
        if log_mass_truncation_bound.is_nan() {
            return Err(PLDError::InvalidParameter {
                name: "log_mass_truncation_bound",
                value: log_mass_truncation_bound,
                reason: "Must not be NaN.",
            });
        }
        Ok(DiscretizationOptions { value_discretization_interval, estimate, log_mass_truncation_bound })
    }

    /// Options with the given interval and estimate type, no truncation.
    pub fn with_interval(value_discretization_interval: f64, estimate: EstimateType) -> PLDResult<Self> {
        Self::new(value_discretization_interval, estimate, f64::NEG_INFINITY)
    }

    pub fn value_discretization_interval(&self) -> f64 {
        self.value_discretization_interval
    }

    pub fn estimate(&self) -> EstimateType {
        self.estimate
    }

    pub fn log_mass_truncation_bound(&self) -> f64 {
        self.log_mass_truncation_bound
    }

    /// Bucket key of the loss `value` under these options.
    ///
    /// Errors
    /// ------
    /// - See [`EstimateType::round`].
    #[inline]
    pub fn bucket(&self, value: f64) -> PLDResult<i64> {
        self.estimate.round(value / self.value_discretization_interval)
    }
}

impl Default for DiscretizationOptions {
    fn default() -> Self {
        DiscretizationOptions {
            value_discretization_interval: DEFAULT_VALUE_DISCRETIZATION_INTERVAL,
            estimate: EstimateType::Pessimistic,
            log_mass_truncation_bound: f64::NEG_INFINITY,
        }
    }
}
