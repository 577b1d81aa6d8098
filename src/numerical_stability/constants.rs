//! Numerical constants for privacy-loss discretization and calibration.
//!
//! # Provided items
//! - [`DEFAULT_VALUE_DISCRETIZATION_INTERVAL`]: granularity of privacy-loss
//!   buckets (default 1e-4).
//! - [`DEFAULT_LOG_MASS_TRUNCATION_BOUND`]: natural log of the noise mass
//!   discarded from the Gaussian tails (default -50).
//! - [`STANDARD_DEVIATION_SEARCH_TOLERANCE`]: bracket width at which the
//!   Gaussian calibration stops (default 1e-7).
//! - [`DIRECT_CONVOLUTION_MAX_LEN`]: shorter-operand length under which
//!   linear convolution is summed directly.
//! - [`MAX_BUCKET_KEY`]: bound on the magnitude of privacy-loss bucket keys.

/// Default length of the interval privacy-loss values are rounded to.
///
/// Every bucket key `i` of a privacy loss distribution represents the loss
/// value `i * interval`. Smaller intervals reduce the rounding error of
/// `delta`/`epsilon` queries at the cost of longer histograms, which in turn
/// make composition more expensive.
pub const DEFAULT_VALUE_DISCRETIZATION_INTERVAL: f64 = 1e-4;

/// Default log of the Gaussian noise mass that is moved out of the body.
///
/// The Gaussian noise has unbounded support, so the discretization walks
/// only over `[x₀, −x₀]` with `CDF(x₀) = 0.5 · exp(bound)` and books the two
/// tails as explicit point masses. With `bound = −50` each tail holds about
/// `1e-22` of mass, well below anything a `delta` query can resolve.
pub const DEFAULT_LOG_MASS_TRUNCATION_BOUND: f64 = -50.0;

/// Bracket width at which the Gaussian standard-deviation search stops.
///
/// The search returns the upper end of the final bracket, so the returned
/// standard deviation always satisfies the requested guarantee and exceeds
/// the optimum by at most this amount.
pub const STANDARD_DEVIATION_SEARCH_TOLERANCE: f64 = 1e-7;

/// Shorter-operand length under which convolution is summed directly.
///
/// Direct summation is exact up to ordinary rounding and leaves empty
/// buckets empty, while FFT round-off leaks tiny positive values into them.
/// Past this size the `O(n log n)` transform wins.
pub const DIRECT_CONVOLUTION_MAX_LEN: usize = 32;

/// Largest magnitude a privacy-loss bucket key may take (`2^53`).
///
/// Every integer up to this bound is exact as an `f64`, and the sum of two
/// keys in range cannot overflow `i64`. Rounding and composition reject
/// results outside `[-MAX_BUCKET_KEY, MAX_BUCKET_KEY]`.
pub const MAX_BUCKET_KEY: i64 = 1 << 53;
