//! pld::discretization — PLDs from two explicit probability mass functions.
//!
//! Purpose
//! -------
//! Build the privacy loss distribution of a pair `(μ_upper, μ_lower)` given
//! both as log-probability maps over a shared outcome domain. This is the
//! general-purpose entry point for mechanisms with a finite (or finitely
//! truncated) output space.
//!
//! Key behaviors
//! -------------
//! - Outcomes absent from `μ_lower` (or with log-probability `-∞` there)
//!   carry infinite privacy loss; their upper mass goes to `infinity_mass`.
//! - Outcomes whose upper log-mass exceeds the truncation bound contribute
//!   their upper mass at loss `log μ_upper(o) − log μ_lower(o)`, rounded onto
//!   the grid in the estimate's direction.
//! - Outcomes at or below the bound are folded into `infinity_mass`
//!   (pessimistic) or discarded (optimistic).
//!
//! Invariants & assumptions
//! ------------------------
//! - Inputs are natural-log probabilities; each map describes a complete
//!   distribution when mass conservation is expected.
//! - Pessimistic construction conserves total mass; optimistic construction
//!   may lose the truncated part.
//!
//! Testing notes
//! -------------
//! - Unit tests check mass conservation in both modes, the infinite-loss
//!   path, rounding direction, and truncation behavior.
use std::{collections::{BTreeMap, HashMap}, hash::Hash};

use crate::pld::{
    distribution::{PrivacyLossDistribution, add_mass},
    errors::PLDResult,
    options::DiscretizationOptions,
};

impl PrivacyLossDistribution {
    /// Construct a PLD from the log-PMFs of `μ_lower` and `μ_upper`.
    ///
    /// Parameters
    /// ----------
    /// - `log_pmf_lower`: `&HashMap<K, f64>`
    ///   Outcome → `ln μ_lower(outcome)`.
    /// - `log_pmf_upper`: `&HashMap<K, f64>`
    ///   Outcome → `ln μ_upper(outcome)`.
    /// - `options`: `&DiscretizationOptions`
    ///   Grid width, rounding direction, and log-mass truncation bound.
    ///
    /// Returns
    /// -------
    /// `PLDResult<PrivacyLossDistribution>`
    ///
    /// Errors
    /// ------
    /// - `PLDError::InvalidParameter` if a loss `ln μ_upper − ln μ_lower`
    ///   has no bucket key (non-finite or beyond `MAX_BUCKET_KEY` grid steps).
    ///
    /// Notes
    /// -----
    /// - Outcomes present only in `log_pmf_lower` have zero upper mass and
    ///   contribute nothing.
    pub fn from_two_probability_mass_functions<K: Eq + Hash>(
        log_pmf_lower: &HashMap<K, f64>, log_pmf_upper: &HashMap<K, f64>,
        options: &DiscretizationOptions,
    ) -> PLDResult<Self> {
        let mut infinity_mass = 0.0;
        for (outcome, &log_upper) in log_pmf_upper {
            let log_lower = log_pmf_lower.get(outcome).copied().unwrap_or(f64::NEG_INFINITY);
            if log_lower == f64::NEG_INFINITY {
                infinity_mass += log_upper.exp();
            }
        }

        let mut pmf = BTreeMap::new();
        for (outcome, &log_lower) in log_pmf_lower {
            if log_lower == f64::NEG_INFINITY {
                // Counted in the infinity mass above.
                continue;
            }
            let log_upper = log_pmf_upper.get(outcome).copied().unwrap_or(f64::NEG_INFINITY);
            if log_upper > options.log_mass_truncation_bound() {
                add_mass(&mut pmf, options.bucket(log_upper - log_lower)?, log_upper.exp());
            } else if options.estimate().is_pessimistic() {
                infinity_mass += log_upper.exp();
            }
        }

        Self::new(pmf, options.value_discretization_interval(), infinity_mass)
    }
}
