// ─────────────────────────────────────────────────────────────────────
// Tomo-Axis — FFT Correlation
// © 2019–2026 Maria Matveeva <matveeva.maria@gmail.com>
// License: GNU LGPL v3 or later
// ─────────────────────────────────────────────────────────────────────
//! Circular phase and cross correlation via the FFT.
//!
//! Both variants remove the mean before transforming and refine the
//! integer peak with a three-point parabola per axis. Lags follow the
//! FFT convention: bin indices above n/2 wrap to negative lags, so for
//! `b(x) = a(x - d)` the peak lands at lag `-d`.
//!
//! Phase correlation whitens the cross-power spectrum; its peak height
//! is near 1 for a pure shift and drops toward 0 as the images
//! decorrelate. Cross correlation normalizes by the L2 norms instead,
//! which keeps the peak a true correlation coefficient in [-1, 1] and
//! tolerates low-contrast data better.

use ndarray::Array2;
use num_complex::Complex64;
use tomo_types::constants::SPECTRUM_EPS_REL;

use crate::fft::{fft1, fft2, ifft1_real, ifft2_real};
use crate::fit::parabolic_vertex;

/// 2D correlation surface with its refined peak.
#[derive(Debug, Clone)]
pub struct Correlation2d {
    /// Full correlation surface indexed by (row lag bin, column lag bin).
    pub surface: Array2<f64>,
    /// Integer row bin of the peak.
    pub peak_row: usize,
    /// Integer column bin of the peak.
    pub peak_col: usize,
    /// Signed sub-pixel column lag.
    pub dx: f64,
    /// Signed sub-pixel row lag.
    pub dy: f64,
    /// Surface value at the integer peak.
    pub response: f64,
}

impl Correlation2d {
    /// Correlation values along the peak row as (lag, value) pairs in
    /// ascending lag order. Used for the diagnostic curve plot.
    pub fn row_through_peak(&self) -> Vec<(f64, f64)> {
        let ncols = self.surface.ncols();
        let mut points: Vec<(f64, f64)> = (0..ncols)
            .map(|j| (wrap_lag(j, ncols), self.surface[[self.peak_row, j]]))
            .collect();
        points.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));
        points
    }
}

/// 1D correlation profile with its refined peak.
#[derive(Debug, Clone)]
pub struct Correlation1d {
    pub surface: Vec<f64>,
    /// Signed sub-pixel lag.
    pub dx: f64,
    /// Surface value at the integer peak.
    pub response: f64,
}

/// Map an FFT bin index to a signed circular lag.
///
/// Bins above n/2 wrap to negative lags, matching `numpy.fft.fftfreq`.
pub fn wrap_lag(index: usize, n: usize) -> f64 {
    if index <= n / 2 {
        index as f64
    } else {
        index as f64 - n as f64
    }
}

/// Phase correlation of two equally shaped images.
pub fn phase_correlate_2d(a: &Array2<f64>, b: &Array2<f64>) -> Correlation2d {
    assert_eq!(a.dim(), b.dim(), "correlation inputs must share a shape");
    assert!(!a.is_empty(), "correlation inputs must be non-empty");

    let fa = fft2(&remove_mean_2d(a));
    let fb = fft2(&remove_mean_2d(b));
    let mut q = Array2::from_shape_fn(fa.dim(), |(i, j)| fa[[i, j]] * fb[[i, j]].conj());
    whiten(q.as_slice_mut().expect("spectrum must be contiguous"));
    find_peak_2d(ifft2_real(&q))
}

/// Normalized cross correlation of two equally shaped images.
pub fn cross_correlate_2d(a: &Array2<f64>, b: &Array2<f64>) -> Correlation2d {
    assert_eq!(a.dim(), b.dim(), "correlation inputs must share a shape");
    assert!(!a.is_empty(), "correlation inputs must be non-empty");

    let a0 = remove_mean_2d(a);
    let b0 = remove_mean_2d(b);
    let denom = l2_norm(a0.iter()) * l2_norm(b0.iter());

    let fa = fft2(&a0);
    let fb = fft2(&b0);
    let q = Array2::from_shape_fn(fa.dim(), |(i, j)| fa[[i, j]] * fb[[i, j]].conj());
    let mut surface = ifft2_real(&q);
    // Near-constant inputs are rejected upstream; the surface is ~zero
    // here and stays unscaled.
    if denom > 1e-30 {
        surface.mapv_inplace(|v| v / denom);
    }
    find_peak_2d(surface)
}

/// Phase correlation of two equally sized 1D profiles.
pub fn phase_correlate_1d(a: &[f64], b: &[f64]) -> Correlation1d {
    assert_eq!(a.len(), b.len(), "correlation inputs must share a length");
    assert!(!a.is_empty(), "correlation inputs must be non-empty");

    let fa = fft1(&remove_mean_1d(a));
    let fb = fft1(&remove_mean_1d(b));
    let mut q: Vec<Complex64> = fa
        .iter()
        .zip(fb.iter())
        .map(|(x, y)| x * y.conj())
        .collect();
    whiten(&mut q);
    find_peak_1d(ifft1_real(&q))
}

/// Normalized cross correlation of two equally sized 1D profiles.
pub fn cross_correlate_1d(a: &[f64], b: &[f64]) -> Correlation1d {
    assert_eq!(a.len(), b.len(), "correlation inputs must share a length");
    assert!(!a.is_empty(), "correlation inputs must be non-empty");

    let a0 = remove_mean_1d(a);
    let b0 = remove_mean_1d(b);
    let denom = l2_norm(a0.iter()) * l2_norm(b0.iter());

    let fa = fft1(&a0);
    let fb = fft1(&b0);
    let q: Vec<Complex64> = fa
        .iter()
        .zip(fb.iter())
        .map(|(x, y)| x * y.conj())
        .collect();
    let mut surface = ifft1_real(&q);
    if denom > 1e-30 {
        for v in &mut surface {
            *v /= denom;
        }
    }
    find_peak_1d(surface)
}

/// Flatten every surviving bin of the cross-power spectrum to unit
/// magnitude. Bins below a relative floor are zeroed instead of
/// amplified.
fn whiten(spectrum: &mut [Complex64]) {
    let max_norm = spectrum.iter().map(|c| c.norm()).fold(0.0_f64, f64::max);
    let eps = max_norm * SPECTRUM_EPS_REL;
    for c in spectrum.iter_mut() {
        let n = c.norm();
        *c = if n > eps {
            *c / n
        } else {
            Complex64::new(0.0, 0.0)
        };
    }
}

fn find_peak_2d(surface: Array2<f64>) -> Correlation2d {
    let (nrows, ncols) = surface.dim();
    let mut peak_row = 0;
    let mut peak_col = 0;
    let mut response = f64::NEG_INFINITY;
    for ((i, j), &v) in surface.indexed_iter() {
        if v > response {
            response = v;
            peak_row = i;
            peak_col = j;
        }
    }

    // Wrap-aware neighbours for the parabolic refinement.
    let up = surface[[(peak_row + nrows - 1) % nrows, peak_col]];
    let down = surface[[(peak_row + 1) % nrows, peak_col]];
    let left = surface[[peak_row, (peak_col + ncols - 1) % ncols]];
    let right = surface[[peak_row, (peak_col + 1) % ncols]];

    let dy = wrap_lag(peak_row, nrows) + parabolic_vertex(up, response, down);
    let dx = wrap_lag(peak_col, ncols) + parabolic_vertex(left, response, right);

    Correlation2d {
        surface,
        peak_row,
        peak_col,
        dx,
        dy,
        response,
    }
}

fn find_peak_1d(surface: Vec<f64>) -> Correlation1d {
    let n = surface.len();
    let mut peak = 0;
    let mut response = f64::NEG_INFINITY;
    for (i, &v) in surface.iter().enumerate() {
        if v > response {
            response = v;
            peak = i;
        }
    }

    let left = surface[(peak + n - 1) % n];
    let right = surface[(peak + 1) % n];
    let dx = wrap_lag(peak, n) + parabolic_vertex(left, response, right);

    Correlation1d {
        surface,
        dx,
        response,
    }
}

fn remove_mean_2d(a: &Array2<f64>) -> Array2<f64> {
    let mean = a.sum() / a.len() as f64;
    a.mapv(|v| v - mean)
}

fn remove_mean_1d(a: &[f64]) -> Vec<f64> {
    let mean = a.iter().sum::<f64>() / a.len() as f64;
    a.iter().map(|&v| v - mean).collect()
}

fn l2_norm<'a, I: Iterator<Item = &'a f64>>(values: I) -> f64 {
    values.map(|&v| v * v).sum::<f64>().sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Aperiodic multi-frequency texture; rich spectrum, no symmetry.
    fn textured(nrows: usize, ncols: usize) -> Array2<f64> {
        Array2::from_shape_fn((nrows, ncols), |(i, j)| {
            let x = j as f64;
            let y = i as f64;
            (0.37 * x).sin() + (0.23 * y).cos() + 0.2 * (0.11 * (x + 2.0 * y)).sin()
        })
    }

    #[test]
    fn test_wrap_lag_even_and_odd() {
        let lags8: Vec<f64> = (0..8).map(|i| wrap_lag(i, 8)).collect();
        assert_eq!(lags8, vec![0.0, 1.0, 2.0, 3.0, 4.0, -3.0, -2.0, -1.0]);
        let lags7: Vec<f64> = (0..7).map(|i| wrap_lag(i, 7)).collect();
        assert_eq!(lags7, vec![0.0, 1.0, 2.0, 3.0, -3.0, -2.0, -1.0]);
    }

    #[test]
    fn test_phase_2d_identical() {
        let a = textured(16, 32);
        let corr = phase_correlate_2d(&a, &a);
        assert!(corr.dx.abs() < 1e-6, "dx {}", corr.dx);
        assert!(corr.dy.abs() < 1e-6, "dy {}", corr.dy);
        assert!(corr.response > 0.9, "response {}", corr.response);
    }

    #[test]
    fn test_phase_2d_integer_shift() {
        // b[i][j] = a[i+3][j+5] (circular) puts the peak at lag (+3, +5).
        let a = textured(16, 32);
        let b = Array2::from_shape_fn((16, 32), |(i, j)| a[[(i + 3) % 16, (j + 5) % 32]]);
        let corr = phase_correlate_2d(&a, &b);
        assert!((corr.dy - 3.0).abs() < 0.05, "dy {}", corr.dy);
        assert!((corr.dx - 5.0).abs() < 0.05, "dx {}", corr.dx);
    }

    #[test]
    fn test_phase_1d_integer_shift() {
        let a: Vec<f64> = (0..64).map(|i| (0.37 * i as f64).sin() + (0.19 * i as f64).cos()).collect();
        let b: Vec<f64> = (0..64).map(|i| a[(i + 7) % 64]).collect();
        let corr = phase_correlate_1d(&a, &b);
        assert!((corr.dx - 7.0).abs() < 0.05, "dx {}", corr.dx);
    }

    #[test]
    fn test_phase_1d_negative_wrap() {
        let a: Vec<f64> = (0..64).map(|i| (0.37 * i as f64).sin() + (0.19 * i as f64).cos()).collect();
        let b: Vec<f64> = (0..64).map(|i| a[(i + 60) % 64]).collect();
        let corr = phase_correlate_1d(&a, &b);
        assert!((corr.dx + 4.0).abs() < 0.05, "dx {}", corr.dx);
    }

    #[test]
    fn test_phase_1d_subpixel_shift() {
        // Band-limited periodic signal sampled 0.3 px later; the peak
        // lands at lag -0.3 to within the parabola's bias.
        let n = 64;
        let f = |x: f64| {
            let w = 2.0 * std::f64::consts::PI / n as f64;
            (w * x).sin() + 0.5 * (3.0 * w * x + 1.0).sin() + 0.25 * (5.0 * w * x).cos()
        };
        let a: Vec<f64> = (0..n).map(|i| f(i as f64)).collect();
        let b: Vec<f64> = (0..n).map(|i| f(i as f64 - 0.3)).collect();
        let corr = phase_correlate_1d(&a, &b);
        assert!((corr.dx + 0.3).abs() < 0.15, "dx {}", corr.dx);
    }

    #[test]
    fn test_cross_2d_identical_is_unit_peak() {
        let a = textured(16, 32);
        let corr = cross_correlate_2d(&a, &a);
        assert!(corr.dx.abs() < 1e-6, "dx {}", corr.dx);
        assert!(corr.dy.abs() < 1e-6, "dy {}", corr.dy);
        assert!(
            (corr.response - 1.0).abs() < 1e-9,
            "response {}",
            corr.response
        );
    }

    #[test]
    fn test_cross_1d_shift() {
        let a: Vec<f64> = (0..48).map(|i| (0.29 * i as f64).sin()).collect();
        let b: Vec<f64> = (0..48).map(|i| a[(i + 6) % 48]).collect();
        let corr = cross_correlate_1d(&a, &b);
        assert!((corr.dx - 6.0).abs() < 0.05, "dx {}", corr.dx);
        assert!(
            (corr.response - 1.0).abs() < 1e-9,
            "response {}",
            corr.response
        );
    }

    #[test]
    fn test_constant_inputs_give_zero_response() {
        let a = Array2::from_elem((8, 8), 4.2);
        let corr = phase_correlate_2d(&a, &a);
        assert_eq!(corr.dx, 0.0);
        assert_eq!(corr.dy, 0.0);
        assert!(corr.response.abs() < 1e-12, "response {}", corr.response);
    }

    #[test]
    fn test_row_through_peak_ordering() {
        let a = textured(16, 32);
        let b = Array2::from_shape_fn((16, 32), |(i, j)| a[[i, (j + 5) % 32]]);
        let corr = phase_correlate_2d(&a, &b);
        let row = corr.row_through_peak();
        assert_eq!(row.len(), 32);
        for pair in row.windows(2) {
            assert!(pair[0].0 < pair[1].0, "lags must ascend");
        }
        // The strongest sample of that row sits at the peak lag.
        let (best_lag, _) = row
            .iter()
            .fold((f64::NAN, f64::NEG_INFINITY), |acc, &(lag, v)| {
                if v > acc.1 {
                    (lag, v)
                } else {
                    acc
                }
            });
        assert!((best_lag - 5.0).abs() < 1e-9, "best lag {best_lag}");
    }
}
