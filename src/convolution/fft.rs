//! Linear and k-fold convolution of dense histograms.
//!
//! Purpose
//! -------
//! Compute `a * b` and the k-fold self-convolution `a^{*k}` of dense weight
//! arrays, using `rustfft` transforms for large operands and direct
//! summation for small ones.
//!
//! Key behaviors
//! -------------
//! - [`convolve`]: linear convolution; output offset is the sum of the input
//!   offsets and output length is `len(a) + len(b) − 1`.
//! - [`self_convolve`]: pads to `k · len`, transforms, raises each frequency
//!   coefficient to the k-th power, inverts, and keeps the real part; output
//!   offset is `k · offset`.
//!
//! Invariants & assumptions
//! ------------------------
//! - Inputs hold non-negative weights. Transform-based outputs may contain
//!   tiny negative values and imaginary residue from round-off; the real
//!   part is kept as-is here and non-positive values are dropped when the
//!   caller converts back to sparse form.
//!
//! Conventions
//! -----------
//! - `rustfft` inverse transforms are unnormalized; results are scaled by
//!   `1 / n` here.
use ndarray::Array1;
use rustfft::{FftPlanner, num_complex::Complex};

use crate::{convolution::dense::DenseHistogram, numerical_stability::DIRECT_CONVOLUTION_MAX_LEN};

/// Linear convolution of two dense histograms.
pub fn convolve(a: &DenseHistogram, b: &DenseHistogram) -> DenseHistogram {
    let offset = a.offset() + b.offset();
    if a.is_empty() || b.is_empty() {
        return DenseHistogram::new(offset, Array1::zeros(0));
    }
    let masses = if a.len().min(b.len()) <= DIRECT_CONVOLUTION_MAX_LEN {
        direct_convolve(a.masses(), b.masses())
    } else {
        fft_convolve(a.masses(), b.masses())
    };
    DenseHistogram::new(offset, masses)
}

/// k-fold convolution of a dense histogram with itself.
///
/// `num_times = 1` returns a copy of the input; `num_times = 0` returns the
/// unit point mass at key 0.
pub fn self_convolve(a: &DenseHistogram, num_times: u32) -> DenseHistogram {
    match num_times {
        0 => return DenseHistogram::new(0, Array1::from_elem(1, 1.0)),
        1 => return a.clone(),
        _ => {}
    }
    let offset = a.offset() * i64::from(num_times);
    if a.is_empty() {
        return DenseHistogram::new(offset, Array1::zeros(0));
    }

    let fft_len = num_times as usize * a.len();
    let mut planner = FftPlanner::<f64>::new();
    let fft = planner.plan_fft_forward(fft_len);
    let ifft = planner.plan_fft_inverse(fft_len);

    let mut buffer = to_complex_padded(a.masses(), fft_len);
    fft.process(&mut buffer);
    for coeff in buffer.iter_mut() {
        *coeff = coeff.powu(num_times);
    }
    ifft.process(&mut buffer);

    let scale = 1.0 / fft_len as f64;
    let masses = buffer.iter().map(|c| c.re * scale).collect::<Array1<f64>>();
    DenseHistogram::new(offset, masses)
}

// ---- Helper Methods ----

fn direct_convolve(a: &Array1<f64>, b: &Array1<f64>) -> Array1<f64> {
    let mut out = Array1::<f64>::zeros(a.len() + b.len() - 1);
    for (i, &x) in a.iter().enumerate() {
        if x == 0.0 {
            continue;
        }
        for (j, &y) in b.iter().enumerate() {
            out[i + j] += x * y;
        }
    }
    out
}

fn fft_convolve(a: &Array1<f64>, b: &Array1<f64>) -> Array1<f64> {
    let out_len = a.len() + b.len() - 1;
    let fft_len = out_len.next_power_of_two();

    let mut planner = FftPlanner::<f64>::new();
    let fft = planner.plan_fft_forward(fft_len);
    let ifft = planner.plan_fft_inverse(fft_len);

    let mut a_c = to_complex_padded(a, fft_len);
    let mut b_c = to_complex_padded(b, fft_len);
    fft.process(&mut a_c);
    fft.process(&mut b_c);
    for (x, y) in a_c.iter_mut().zip(b_c.iter()) {
        *x *= *y;
    }
    ifft.process(&mut a_c);

    let scale = 1.0 / fft_len as f64;
    a_c.iter().take(out_len).map(|c| c.re * scale).collect()
}

fn to_complex_padded(values: &Array1<f64>, len: usize) -> Vec<Complex<f64>> {
    let mut buffer: Vec<Complex<f64>> = values.iter().map(|&v| Complex::new(v, 0.0)).collect();
    buffer.resize(len, Complex::new(0.0, 0.0));
    buffer
}
