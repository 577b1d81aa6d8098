//! pld::errors — error type shared by the privacy-loss machinery.
//!
//! Purpose
//! -------
//! Provide a single error enum and result alias for constructing, querying,
//! and composing privacy loss distributions, together with a conversion
//! layer to Python exceptions for PyO3-based bindings.
//!
//! Key behaviors
//! -------------
//! - Define [`PLDResult`] and [`PLDError`] as the canonical result and error
//!   types for every fallible operation in the crate.
//! - Attach human-readable `Display` messages that embed the offending value
//!   so diagnostics are meaningful without additional context.
//! - Implement `From<PLDError> for PyErr` when the `python-bindings`
//!   feature is enabled.
//!
//! Invariants & assumptions
//! ------------------------
//! - All failures are caller-input validation failures; none are retried and
//!   none leave a partially constructed object behind.
//! - `PLDError` values are small and cheap to clone.
//!
//! Conventions
//! -----------
//! - Messages are phrased in terms of domain constraints ("must be positive",
//!   "must be an integer") rather than implementation details.

#[cfg(feature = "python-bindings")]
use pyo3::{PyErr, exceptions::PyValueError};

/// Crate-wide result alias for privacy-loss operations.
pub type PLDResult<T> = Result<T, PLDError>;

/// PLDError — failures of privacy-loss construction, queries, and composition.
///
/// Variants
/// --------
/// - `InvalidParameter { name, value, reason }`
///   A scalar input violates its domain: non-positive scale, parameter or
///   standard deviation, non-integer sensitivity where an integer is
///   required, a randomized-response noise parameter outside `(0, 1)`, a
///   bucket count ≤ 1, a non-positive discretization interval, and so on.
/// - `IncompatibleGranularity { left, right }`
///   Two distributions with different discretization intervals were
///   composed.
/// - `UndefinedInput { x }`
///   A discrete mechanism's privacy loss was evaluated at a non-integer
///   point.
/// - `SearchFailed { reason }`
///   The Gaussian calibration could not bracket the target guarantee with
///   finite standard deviations.
#[derive(Debug, Clone, PartialEq)]
pub enum PLDError {
    InvalidParameter { name: &'static str, value: f64, reason: &'static str },
    IncompatibleGranularity { left: f64, right: f64 },
    UndefinedInput { x: f64 },
    SearchFailed { reason: String },
}

impl std::error::Error for PLDError {}

impl std::fmt::Display for PLDError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PLDError::InvalidParameter { name, value, reason } => {
                write!(f, "Invalid {name}: {value}. {reason}")
            }
            PLDError::IncompatibleGranularity { left, right } => {
                write!(f, "Discretization intervals are different: {left} vs {right}")
            }
            PLDError::UndefinedInput { x } => {
                write!(f, "Privacy loss at x is undefined for x = {x}")
            }
            PLDError::SearchFailed { reason } => {
                write!(f, "Standard deviation search failed: {reason}")
            }
        }
    }
}

#[cfg(feature = "python-bindings")]
impl From<PLDError> for PyErr {
    fn from(err: PLDError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}
