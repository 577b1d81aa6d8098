//! numerical_stability — shared numerical tolerances and defaults.
//!
//! Purpose
//! -------
//! Centralize the small set of numerical constants that the privacy-loss
//! machinery depends on, so that discretization, convolution, and
//! calibration code share a single source of truth and tests can assert
//! against the same values directly.
//!
//! Key behaviors
//! -------------
//! - Expose the default discretization interval of privacy-loss values.
//! - Expose the default log-mass truncation bound used for the Gaussian
//!   noise tails.
//! - Expose the width at which the Gaussian standard-deviation search stops.
//! - Expose the operand size under which the convolution kernel prefers
//!   direct summation over FFT.
//!
//! Invariants & assumptions
//! ------------------------
//! - All constants are finite except where documented otherwise.
//! - None of these values are validated here; consumers validate any
//!   caller-supplied overrides through their own option constructors.
//!
//! Conventions
//! -----------
//! - This module is pure data: it never logs, allocates, or performs I/O.
//!
//! Downstream usage
//! ----------------
//! - `pld::options` uses the discretization default for
//!   `DiscretizationOptions::default()`.
//! - `mechanisms::gaussian` and `mechanisms::search` use the truncation
//!   bound and the search tolerance.
//! - `convolution::fft` uses the direct-summation cutoff.
//! - `pld::options` and `pld::distribution` bound bucket keys by
//!   `MAX_BUCKET_KEY`.

pub mod constants;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::constants::{
    DEFAULT_LOG_MASS_TRUNCATION_BOUND, DEFAULT_VALUE_DISCRETIZATION_INTERVAL,
    DIRECT_CONVOLUTION_MAX_LEN, MAX_BUCKET_KEY, STANDARD_DEVIATION_SEARCH_TOLERANCE,
};
