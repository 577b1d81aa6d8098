//! rust_pld — privacy loss distributions for differential-privacy accounting,
//! with optional Python bindings.
//!
//! Purpose
//! -------
//! Serve as the crate root for Rust callers and as the PyO3 bridge that
//! exposes privacy loss distributions to Python via the `_rust_pld`
//! extension module. A privacy loss distribution (PLD) captures the full
//! privacy profile of a mechanism; composing mechanisms is convolution of
//! their PLDs, and the tight `(ε, δ)` guarantee is read off at the end.
//!
//! Key behaviors
//! -------------
//! - Re-export the core Rust modules:
//!   - [`pld`]: the PLD type, its queries and composition, closed-form
//!     factories, and the explicit-PMF discretization engine.
//!   - [`mechanisms`]: Laplace, Gaussian, and discrete Laplace mechanisms
//!     and the shared discretization of additive noise.
//!   - [`convolution`]: sparse histogram convolution via FFT.
//!   - [`numerical_stability`]: named numerical defaults.
//!   - [`logging`]: slog logger construction.
//! - Define the `#[pyclass]` wrapper and the `#[pymodule]` initializer for
//!   the `_rust_pld` Python extension when `python-bindings` is enabled.
//!
//! Invariants & assumptions
//! ------------------------
//! - All numerical work lives in the inner modules; this file performs only
//!   FFI glue and error mapping.
//! - Every operation is a pure function of its inputs; no global state.
//!
//! Conventions
//! -----------
//! - Privacy-loss values are natural-log ratios; `ε` and `δ` follow the
//!   usual `(ε, δ)`-DP definition.
//! - Errors from core Rust code are [`pld::PLDError`] values and become
//!   `ValueError` at the PyO3 boundary.
//!
//! Downstream usage
//! ----------------
//! - Typical Rust use: build a PLD per mechanism
//!   (e.g. [`mechanisms::GaussianPrivacyLoss::new`]), combine with
//!   [`pld::PrivacyLossDistribution::compose`] /
//!   [`pld::PrivacyLossDistribution::self_compose`], then query
//!   [`pld::PrivacyLossDistribution::get_epsilon_for_delta`].
//!
//! Testing notes
//! -------------
//! - Unit tests live next to each module; `tests/` holds an end-to-end
//!   accounting pipeline.

pub mod convolution;
pub mod logging;
pub mod mechanisms;
pub mod numerical_stability;
pub mod pld;

#[cfg(feature = "python-bindings")]
use std::collections::{BTreeMap, HashMap};

#[cfg(feature = "python-bindings")]
use pyo3::prelude::*;

#[cfg(feature = "python-bindings")]
use crate::{
    mechanisms::{
        DiscreteLaplaceMechanism, DiscreteLaplacePrivacyLoss, GaussianMechanism, GaussianPrivacyLoss,
        LaplaceMechanism, LaplacePrivacyLoss, SearchOptions,
    },
    numerical_stability::{DEFAULT_LOG_MASS_TRUNCATION_BOUND, DEFAULT_VALUE_DISCRETIZATION_INTERVAL},
    pld::{
        DifferentialPrivacyParameters, DiscretizationOptions, EstimateType, PLDResult,
        PrivacyLossDistribution,
    },
};

/// PrivacyLossDistribution — Python-facing wrapper for
/// [`pld::PrivacyLossDistribution`].
///
/// Purpose
/// -------
/// Let Python callers build PLDs for the supported mechanisms, compose them,
/// and query `(ε, δ)` guarantees.
///
/// Key behaviors
/// -------------
/// - Static factories mirror the Rust constructors, taking
///   `pessimistic_estimate` and `value_discretization_interval` keyword
///   arguments instead of a `DiscretizationOptions` value.
/// - `compose` / `self_compose` return new wrapper objects.
/// - Objects built from a mechanism answer `get_delta_for_epsilon` with the
///   mechanism's exact formula. Gaussian objects keep it through
///   `self_compose`, which uses the closed form; every other composition
///   falls back to the histogram.
///
/// Fields
/// ------
/// - `inner`: [`pld::PrivacyLossDistribution`]
/// - `mechanism`: `Option<MechanismPrivacyLoss>`
///   The source mechanism bundle, when `inner` came from one.
#[cfg(feature = "python-bindings")]
#[pyclass(name = "PrivacyLossDistribution", module = "rust_pld")]
#[derive(Clone)]
pub struct PyPrivacyLossDistribution {
    inner: PrivacyLossDistribution,
    mechanism: Option<MechanismPrivacyLoss>,
}

/// Mechanism bundle retained by a Python-side PLD.
#[cfg(feature = "python-bindings")]
#[derive(Clone)]
enum MechanismPrivacyLoss {
    Laplace(LaplacePrivacyLoss),
    Gaussian(GaussianPrivacyLoss),
    DiscreteLaplace(DiscreteLaplacePrivacyLoss),
}

#[cfg(feature = "python-bindings")]
impl MechanismPrivacyLoss {
    fn pld(&self) -> &PrivacyLossDistribution {
        match self {
            MechanismPrivacyLoss::Laplace(pl) => pl.pld(),
            MechanismPrivacyLoss::Gaussian(pl) => pl.pld(),
            MechanismPrivacyLoss::DiscreteLaplace(pl) => pl.pld(),
        }
    }

    fn get_delta_for_epsilon(&self, epsilon: f64) -> f64 {
        match self {
            MechanismPrivacyLoss::Laplace(pl) => pl.get_delta_for_epsilon(epsilon),
            MechanismPrivacyLoss::Gaussian(pl) => pl.get_delta_for_epsilon(epsilon),
            MechanismPrivacyLoss::DiscreteLaplace(pl) => pl.get_delta_for_epsilon(epsilon),
        }
    }

    fn self_composed(&self, num_times: u32) -> PLDResult<Option<Self>> {
        Ok(match self {
            MechanismPrivacyLoss::Laplace(pl) => pl.self_composed(num_times)?.map(Self::Laplace),
            MechanismPrivacyLoss::Gaussian(pl) => pl.self_composed(num_times)?.map(Self::Gaussian),
            MechanismPrivacyLoss::DiscreteLaplace(pl) => {
                pl.self_composed(num_times)?.map(Self::DiscreteLaplace)
            }
        })
    }
}

#[cfg(feature = "python-bindings")]
fn discretization_options(
    pessimistic_estimate: bool, value_discretization_interval: f64, log_mass_truncation_bound: f64,
) -> PyResult<DiscretizationOptions> {
    Ok(DiscretizationOptions::new(
        value_discretization_interval,
        EstimateType::from_pessimistic(pessimistic_estimate),
        log_mass_truncation_bound,
    )?)
}

#[cfg(feature = "python-bindings")]
impl From<PrivacyLossDistribution> for PyPrivacyLossDistribution {
    fn from(inner: PrivacyLossDistribution) -> Self {
        PyPrivacyLossDistribution { inner, mechanism: None }
    }
}

#[cfg(feature = "python-bindings")]
impl From<MechanismPrivacyLoss> for PyPrivacyLossDistribution {
    fn from(mechanism: MechanismPrivacyLoss) -> Self {
        PyPrivacyLossDistribution { inner: mechanism.pld().clone(), mechanism: Some(mechanism) }
    }
}

#[cfg(feature = "python-bindings")]
#[pymethods]
impl PyPrivacyLossDistribution {
    #[staticmethod]
    #[pyo3(signature = (epsilon, delta, value_discretization_interval = DEFAULT_VALUE_DISCRETIZATION_INTERVAL))]
    pub fn from_privacy_parameters(
        epsilon: f64, delta: f64, value_discretization_interval: f64,
    ) -> PyResult<Self> {
        let params = DifferentialPrivacyParameters::new(epsilon, delta)?;
        Ok(PrivacyLossDistribution::from_privacy_parameters(params, value_discretization_interval)?.into())
    }

    #[staticmethod]
    #[pyo3(signature = (
        noise_parameter,
        num_buckets,
        pessimistic_estimate = true,
        value_discretization_interval = DEFAULT_VALUE_DISCRETIZATION_INTERVAL,
    ))]
    pub fn from_randomized_response(
        noise_parameter: f64, num_buckets: u64, pessimistic_estimate: bool,
        value_discretization_interval: f64,
    ) -> PyResult<Self> {
        let options =
            discretization_options(pessimistic_estimate, value_discretization_interval, f64::NEG_INFINITY)?;
        Ok(PrivacyLossDistribution::from_randomized_response(noise_parameter, num_buckets, &options)?
            .into())
    }

    #[staticmethod]
    #[pyo3(signature = (
        log_pmf_lower,
        log_pmf_upper,
        pessimistic_estimate = true,
        value_discretization_interval = DEFAULT_VALUE_DISCRETIZATION_INTERVAL,
        log_mass_truncation_bound = f64::NEG_INFINITY,
    ))]
    pub fn from_two_probability_mass_functions(
        log_pmf_lower: HashMap<i64, f64>, log_pmf_upper: HashMap<i64, f64>,
        pessimistic_estimate: bool, value_discretization_interval: f64,
        log_mass_truncation_bound: f64,
    ) -> PyResult<Self> {
        let options = discretization_options(
            pessimistic_estimate,
            value_discretization_interval,
            log_mass_truncation_bound,
        )?;
        Ok(PrivacyLossDistribution::from_two_probability_mass_functions(
            &log_pmf_lower,
            &log_pmf_upper,
            &options,
        )?
        .into())
    }

    #[staticmethod]
    #[pyo3(signature = (
        parameter,
        sensitivity = 1.0,
        pessimistic_estimate = true,
        value_discretization_interval = DEFAULT_VALUE_DISCRETIZATION_INTERVAL,
    ))]
    pub fn from_laplace_mechanism(
        parameter: f64, sensitivity: f64, pessimistic_estimate: bool,
        value_discretization_interval: f64,
    ) -> PyResult<Self> {
        let options =
            discretization_options(pessimistic_estimate, value_discretization_interval, f64::NEG_INFINITY)?;
        let mechanism = LaplaceMechanism::new(parameter, sensitivity)?;
        Ok(MechanismPrivacyLoss::Laplace(LaplacePrivacyLoss::new(mechanism, options)?).into())
    }

    #[staticmethod]
    #[pyo3(signature = (
        standard_deviation,
        sensitivity = 1.0,
        pessimistic_estimate = true,
        value_discretization_interval = DEFAULT_VALUE_DISCRETIZATION_INTERVAL,
        log_mass_truncation_bound = DEFAULT_LOG_MASS_TRUNCATION_BOUND,
    ))]
    pub fn from_gaussian_mechanism(
        standard_deviation: f64, sensitivity: f64, pessimistic_estimate: bool,
        value_discretization_interval: f64, log_mass_truncation_bound: f64,
    ) -> PyResult<Self> {
        let options =
            discretization_options(pessimistic_estimate, value_discretization_interval, f64::NEG_INFINITY)?;
        let mechanism = GaussianMechanism::with_log_mass_truncation_bound(
            standard_deviation,
            sensitivity,
            log_mass_truncation_bound,
        )?;
        Ok(MechanismPrivacyLoss::Gaussian(GaussianPrivacyLoss::new(mechanism, options)?).into())
    }

    #[staticmethod]
    #[pyo3(signature = (
        epsilon,
        delta,
        sensitivity = 1.0,
        pessimistic_estimate = true,
        value_discretization_interval = DEFAULT_VALUE_DISCRETIZATION_INTERVAL,
        verbose = false,
    ))]
    pub fn from_gaussian_privacy_guarantee(
        epsilon: f64, delta: f64, sensitivity: f64, pessimistic_estimate: bool,
        value_discretization_interval: f64, verbose: bool,
    ) -> PyResult<Self> {
        let options =
            discretization_options(pessimistic_estimate, value_discretization_interval, f64::NEG_INFINITY)?;
        let params = DifferentialPrivacyParameters::new(epsilon, delta)?;
        let search = SearchOptions { verbose, ..SearchOptions::default() };
        let mechanism = GaussianMechanism::from_privacy_guarantee(params, sensitivity, &search)?;
        Ok(MechanismPrivacyLoss::Gaussian(GaussianPrivacyLoss::new(mechanism, options)?).into())
    }

    #[staticmethod]
    #[pyo3(signature = (
        parameter,
        sensitivity = 1,
        pessimistic_estimate = true,
        value_discretization_interval = DEFAULT_VALUE_DISCRETIZATION_INTERVAL,
    ))]
    pub fn from_discrete_laplace_mechanism(
        parameter: f64, sensitivity: u32, pessimistic_estimate: bool,
        value_discretization_interval: f64,
    ) -> PyResult<Self> {
        let options =
            discretization_options(pessimistic_estimate, value_discretization_interval, f64::NEG_INFINITY)?;
        let mechanism = DiscreteLaplaceMechanism::new(parameter, f64::from(sensitivity))?;
        Ok(MechanismPrivacyLoss::DiscreteLaplace(DiscreteLaplacePrivacyLoss::new(mechanism, options)?)
            .into())
    }

    pub fn get_delta_for_epsilon(&self, epsilon: f64) -> f64 {
        match &self.mechanism {
            Some(mechanism) => mechanism.get_delta_for_epsilon(epsilon),
            None => self.inner.get_delta_for_epsilon(epsilon),
        }
    }

    pub fn get_epsilon_for_delta(&self, delta: f64) -> f64 {
        self.inner.get_epsilon_for_delta(delta)
    }

    pub fn compose(&self, other: &PyPrivacyLossDistribution) -> PyResult<Self> {
        Ok(self.inner.compose(&other.inner)?.into())
    }

    pub fn self_compose(&self, num_times: u32) -> PyResult<Self> {
        if let Some(mechanism) = &self.mechanism {
            if let Some(composed) = mechanism.self_composed(num_times)? {
                return Ok(composed.into());
            }
        }
        Ok(self.inner.self_compose(num_times)?.into())
    }

    #[getter]
    pub fn value_discretization_interval(&self) -> f64 {
        self.inner.value_discretization_interval()
    }

    #[getter]
    pub fn infinity_mass(&self) -> f64 {
        self.inner.infinity_mass()
    }

    #[getter]
    pub fn rounded_probability_mass_function(&self) -> BTreeMap<i64, f64> {
        self.inner.rounded_probability_mass_function().clone()
    }
}

/// _rust_pld — PyO3 module initializer for the Python extension.
///
/// Registers [`PyPrivacyLossDistribution`] as `PrivacyLossDistribution`.
#[cfg(feature = "python-bindings")]
#[pymodule]
fn _rust_pld<'py>(_py: Python<'py>, m: &Bound<'py, PyModule>) -> PyResult<()> {
    m.add_class::<PyPrivacyLossDistribution>()?;
    Ok(())
}
