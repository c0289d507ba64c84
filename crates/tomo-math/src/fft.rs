//! 1D and 2D FFT wrappers around rustfft.
//!
//! Convention matches numpy:
//! - Forward FFT (fft1/fft2): unnormalized
//! - Inverse FFT (ifft1/ifft2): normalized by 1/n

use ndarray::Array2;
use num_complex::Complex64;
use rustfft::{Fft, FftPlanner};
use std::sync::Arc;

/// Forward 1D FFT of a real signal. Matches `numpy.fft.fft()`.
pub fn fft1(input: &[f64]) -> Vec<Complex64> {
    assert!(!input.is_empty(), "fft1 needs at least one sample");
    let mut planner = FftPlanner::new();
    let fft = planner.plan_fft_forward(input.len());
    let mut data: Vec<Complex64> = input.iter().map(|&v| Complex64::new(v, 0.0)).collect();
    fft.process(&mut data);
    data
}

/// Inverse 1D FFT, real part only. Matches `numpy.fft.ifft().real`.
pub fn ifft1_real(input: &[Complex64]) -> Vec<f64> {
    assert!(!input.is_empty(), "ifft1 needs at least one sample");
    let n = input.len();
    let mut planner = FftPlanner::new();
    let ifft = planner.plan_fft_inverse(n);
    let mut data = input.to_vec();
    ifft.process(&mut data);
    let norm = 1.0 / n as f64;
    data.iter().map(|c| c.re * norm).collect()
}

/// Forward 2D FFT. Matches `numpy.fft.fft2()`.
pub fn fft2(input: &Array2<f64>) -> Array2<Complex64> {
    let (nrows, ncols) = input.dim();
    let mut planner = FftPlanner::new();

    let mut data = input.mapv(|v| Complex64::new(v, 0.0));

    // Rows first (axis 1), then columns via transpose so every pass
    // runs over contiguous slices.
    let fft_row = planner.plan_fft_forward(ncols);
    row_pass(&mut data, &fft_row);

    let fft_col = planner.plan_fft_forward(nrows);
    let mut transposed = transpose(&data);
    row_pass(&mut transposed, &fft_col);
    transpose_into(&transposed, &mut data);

    data
}

/// Inverse 2D FFT, real part only. Matches `numpy.fft.ifft2().real`.
///
/// Applies 1/(nrows*ncols) normalization.
pub fn ifft2_real(input: &Array2<Complex64>) -> Array2<f64> {
    let (nrows, ncols) = input.dim();
    let mut planner = FftPlanner::new();
    let norm = 1.0 / (nrows * ncols) as f64;

    let mut data = input.clone();

    let ifft_row = planner.plan_fft_inverse(ncols);
    row_pass(&mut data, &ifft_row);

    let ifft_col = planner.plan_fft_inverse(nrows);
    let mut transposed = transpose(&data);
    row_pass(&mut transposed, &ifft_col);
    transpose_into(&transposed, &mut data);

    data.mapv(|c| c.re * norm)
}

fn row_pass(data: &mut Array2<Complex64>, fft: &Arc<dyn Fft<f64>>) {
    for mut row in data.rows_mut() {
        let slice = row.as_slice_mut().expect("row must be contiguous");
        fft.process(slice);
    }
}

fn transpose(input: &Array2<Complex64>) -> Array2<Complex64> {
    let (nrows, ncols) = input.dim();
    let mut out = Array2::zeros((ncols, nrows));
    for i in 0..nrows {
        for j in 0..ncols {
            out[[j, i]] = input[[i, j]];
        }
    }
    out
}

fn transpose_into(input: &Array2<Complex64>, out: &mut Array2<Complex64>) {
    let (nrows, ncols) = input.dim();
    for i in 0..nrows {
        for j in 0..ncols {
            out[[j, i]] = input[[i, j]];
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fft2_roundtrip() {
        let original = Array2::from_shape_fn((16, 24), |(i, j)| ((i * 24 + j) as f64).sin());
        let spectrum = fft2(&original);
        let recovered = ifft2_real(&spectrum);

        for ((i, j), &val) in original.indexed_iter() {
            assert!(
                (recovered[[i, j]] - val).abs() < 1e-10,
                "FFT roundtrip failed at ({i}, {j}): {} vs {val}",
                recovered[[i, j]]
            );
        }
    }

    #[test]
    fn test_fft1_roundtrip() {
        let original: Vec<f64> = (0..37).map(|i| (0.3 * i as f64).cos()).collect();
        let spectrum = fft1(&original);
        let recovered = ifft1_real(&spectrum);

        for (i, (&r, &o)) in recovered.iter().zip(original.iter()).enumerate() {
            assert!((r - o).abs() < 1e-10, "1D roundtrip failed at {i}: {r} vs {o}");
        }
    }

    #[test]
    fn test_fft2_dc_component() {
        // For a constant field, the DC component (0,0) should be N*M*value
        let val = 3.0;
        let input = Array2::from_elem((8, 8), val);
        let spectrum = fft2(&input);

        let expected_dc = 64.0 * val;
        assert!(
            (spectrum[[0, 0]].re - expected_dc).abs() < 1e-10,
            "DC component: {} vs {expected_dc}",
            spectrum[[0, 0]].re
        );
        assert!(
            spectrum[[0, 0]].im.abs() < 1e-10,
            "DC imaginary should be zero"
        );
    }

    #[test]
    fn test_fft1_delta_spectrum_is_flat() {
        // A unit impulse has |F(k)| = 1 at every bin.
        let mut signal = vec![0.0; 32];
        signal[5] = 1.0;
        let spectrum = fft1(&signal);
        for (k, c) in spectrum.iter().enumerate() {
            assert!(
                (c.norm() - 1.0).abs() < 1e-12,
                "impulse spectrum not flat at bin {k}: {}",
                c.norm()
            );
        }
    }

    #[test]
    fn test_fft2_zeros() {
        let input = Array2::zeros((8, 8));
        let spectrum = fft2(&input);
        for &v in spectrum.iter() {
            assert!(v.norm() < 1e-15, "FFT of zeros should be zero");
        }
    }
}
