//! Convolution of sparse integer-keyed histograms.
//!
//! These are the entry points the privacy loss distribution uses: densify,
//! convolve in [`fft`](crate::convolution::fft), and sparsify again, so the
//! result never stores a non-positive weight.
use std::collections::BTreeMap;

use crate::convolution::{dense::DenseHistogram, fft};

/// Convolution of two sparse histograms.
///
/// For each key `k`, the result holds the sum over all `k1 + k2 = k` of
/// `first[k1] * second[k2]`. Either operand being empty yields an empty map.
pub fn convolve_dictionary(
    first: &BTreeMap<i64, f64>, second: &BTreeMap<i64, f64>,
) -> BTreeMap<i64, f64> {
    match (DenseHistogram::from_sparse(first), DenseHistogram::from_sparse(second)) {
        (Some(a), Some(b)) => fft::convolve(&a, &b).to_sparse(),
        _ => BTreeMap::new(),
    }
}

/// k-fold convolution of a sparse histogram with itself.
///
/// An empty input stays empty for `num_times ≥ 1`.
pub fn self_convolve_dictionary(input: &BTreeMap<i64, f64>, num_times: u32) -> BTreeMap<i64, f64> {
    match DenseHistogram::from_sparse(input) {
        Some(dense) => fft::self_convolve(&dense, num_times).to_sparse(),
        None if num_times == 0 => BTreeMap::from([(0, 1.0)]),
        None => BTreeMap::new(),
    }
}
