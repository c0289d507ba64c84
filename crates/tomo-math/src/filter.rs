// ─────────────────────────────────────────────────────────────────────
// Tomo-Axis — Image Filters
// © 2019–2026 Maria Matveeva <matveeva.maria@gmail.com>
// License: GNU LGPL v3 or later
// ─────────────────────────────────────────────────────────────────────
//! Image-domain helpers for preprocessing: separable Gaussian blur,
//! block binning, non-finite sanitation and basic statistics.

use ndarray::Array2;

/// Normalized Gaussian kernel truncated at radius ceil(3σ).
///
/// A non-positive sigma yields the identity kernel.
pub fn gaussian_kernel(sigma: f64) -> Vec<f64> {
    if sigma <= 0.0 {
        return vec![1.0];
    }
    let radius = (3.0 * sigma).ceil().max(1.0) as isize;
    let mut kernel = Vec::with_capacity(2 * radius as usize + 1);
    for i in -radius..=radius {
        let x = i as f64 / sigma;
        kernel.push((-0.5 * x * x).exp());
    }
    let sum: f64 = kernel.iter().sum();
    for v in &mut kernel {
        *v /= sum;
    }
    kernel
}

/// Separable Gaussian blur with edge clamping.
pub fn gaussian_blur(input: &Array2<f64>, sigma: f64) -> Array2<f64> {
    if sigma <= 0.0 {
        return input.clone();
    }
    let kernel = gaussian_kernel(sigma);
    let horizontal = convolve_rows(input, &kernel);
    convolve_cols(&horizontal, &kernel)
}

fn convolve_rows(input: &Array2<f64>, kernel: &[f64]) -> Array2<f64> {
    let (nrows, ncols) = input.dim();
    let radius = (kernel.len() / 2) as isize;
    let mut out = Array2::zeros((nrows, ncols));
    for i in 0..nrows {
        for j in 0..ncols {
            let mut acc = 0.0;
            for (k, &w) in kernel.iter().enumerate() {
                let jj = (j as isize + k as isize - radius).clamp(0, ncols as isize - 1);
                acc += w * input[[i, jj as usize]];
            }
            out[[i, j]] = acc;
        }
    }
    out
}

fn convolve_cols(input: &Array2<f64>, kernel: &[f64]) -> Array2<f64> {
    let (nrows, ncols) = input.dim();
    let radius = (kernel.len() / 2) as isize;
    let mut out = Array2::zeros((nrows, ncols));
    for i in 0..nrows {
        for j in 0..ncols {
            let mut acc = 0.0;
            for (k, &w) in kernel.iter().enumerate() {
                let ii = (i as isize + k as isize - radius).clamp(0, nrows as isize - 1);
                acc += w * input[[ii as usize, j]];
            }
            out[[i, j]] = acc;
        }
    }
    out
}

/// Block-average downsampling by an integer factor.
///
/// Output dimensions are the input dimensions divided by the factor,
/// rounded down; trailing rows and columns that do not fill a block
/// are dropped.
pub fn bin_average(input: &Array2<f64>, factor: usize) -> Array2<f64> {
    assert!(factor >= 1, "binning factor must be >= 1");
    if factor == 1 {
        return input.clone();
    }
    let (nrows, ncols) = input.dim();
    let out_rows = nrows / factor;
    let out_cols = ncols / factor;
    let norm = 1.0 / (factor * factor) as f64;
    Array2::from_shape_fn((out_rows, out_cols), |(i, j)| {
        let mut sum = 0.0;
        for di in 0..factor {
            for dj in 0..factor {
                sum += input[[i * factor + di, j * factor + dj]];
            }
        }
        sum * norm
    })
}

/// Replace NaN and infinite samples with zero in place.
///
/// Returns the number of samples replaced.
pub fn sanitize_non_finite(input: &mut Array2<f64>) -> usize {
    let mut replaced = 0;
    for v in input.iter_mut() {
        if !v.is_finite() {
            *v = 0.0;
            replaced += 1;
        }
    }
    replaced
}

/// Mean and population standard deviation in one pass.
pub fn mean_std(input: &Array2<f64>) -> (f64, f64) {
    if input.is_empty() {
        return (0.0, 0.0);
    }
    let n = input.len() as f64;
    let mean = input.sum() / n;
    let var = input.iter().map(|&v| (v - mean) * (v - mean)).sum::<f64>() / n;
    (mean, var.sqrt())
}
