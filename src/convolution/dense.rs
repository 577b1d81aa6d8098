//! Dense `(offset, array)` view of sparse integer-keyed histograms.
//!
//! A sparse histogram maps integer keys to non-negative weights. Convolution
//! needs a contiguous array, so [`DenseHistogram`] stores the minimum key as
//! `offset` and the weights for `offset..=max_key` in an `ndarray::Array1`,
//! zero-filling missing keys. Converting back drops every non-positive entry,
//! which also strips the slightly negative values FFT round-off produces.
use std::collections::BTreeMap;

use ndarray::Array1;

/// Contiguous histogram: `masses[i]` is the weight of key `offset + i`.
#[derive(Debug, Clone, PartialEq)]
pub struct DenseHistogram {
    offset: i64,
    masses: Array1<f64>,
}

impl DenseHistogram {
    pub fn new(offset: i64, masses: Array1<f64>) -> Self {
        DenseHistogram { offset, masses }
    }

    /// Densify a sparse histogram. Returns `None` when `sparse` is empty.
    pub fn from_sparse(sparse: &BTreeMap<i64, f64>) -> Option<Self> {
        let (&offset, _) = sparse.first_key_value()?;
        let (&max_key, _) = sparse.last_key_value()?;
        let len = (max_key - offset) as usize + 1;
        let mut masses = Array1::<f64>::zeros(len);
        for (&key, &mass) in sparse {
            masses[(key - offset) as usize] = mass;
        }
        Some(DenseHistogram { offset, masses })
    }

    /// Sparsify, keeping only strictly positive entries.
    pub fn to_sparse(&self) -> BTreeMap<i64, f64> {
        self.masses
            .iter()
            .enumerate()
            .filter(|(_, mass)| **mass > 0.0)
            .map(|(i, &mass)| (self.offset + i as i64, mass))
            .collect()
    }

    pub fn offset(&self) -> i64 {
        self.offset
    }

    pub fn masses(&self) -> &Array1<f64> {
        &self.masses
    }

    pub fn len(&self) -> usize {
        self.masses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.masses.is_empty()
    }
}
