//! convolution — sparse histogram convolution via dense transforms.
//!
//! Purpose
//! -------
//! Compose privacy-loss histograms: the histogram of a sum of independent
//! integer-keyed random variables is the convolution of their histograms.
//! Histograms are stored sparsely (integer key → weight), but convolution
//! runs on dense arrays, so this subtree owns both the dense/sparse
//! conversion and the transform-based kernels.
//!
//! Key behaviors
//! -------------
//! - [`DenseHistogram`] makes the `(offset, dense array)` representation
//!   explicit and testable.
//! - [`convolve_dictionary`] and [`self_convolve_dictionary`] convolve
//!   sparse histograms (pairwise and k-fold).
//! - Small operands are summed directly; large ones go through `rustfft`.
//!
//! Invariants & assumptions
//! ------------------------
//! - Input weights are non-negative.
//! - Output maps never contain non-positive weights: round-off negatives and
//!   exact zeros are dropped when converting back.
//!
//! Testing notes
//! -------------
//! - Unit tests in [`dense`], [`fft`], and [`dictionary`] cover conversion,
//!   hand-computed convolutions, FFT vs direct agreement, the identity
//!   element, and self-convolution against repeated pairwise convolution.

pub mod dense;
pub mod dictionary;
pub mod fft;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::dense::DenseHistogram;
pub use self::dictionary::{convolve_dictionary, self_convolve_dictionary};
