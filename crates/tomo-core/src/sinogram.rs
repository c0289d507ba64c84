// ─────────────────────────────────────────────────────────────────────
// Tomo-Axis — Sinogram Estimator
// © 2019–2026 Maria Matveeva <matveeva.maria@gmail.com>
// License: GNU LGPL v3 or later
// ─────────────────────────────────────────────────────────────────────
//! Axis estimation from a sinogram's centroid track.
//!
//! The intensity centroid of each sinogram row is the projection of
//! the object's centre of mass, which traces
//! `c(θ) = axis + x̄·cos θ + ȳ·sin θ` across angles. A weighted
//! least-squares fit of that sinusoid yields the axis column as the
//! fitted offset, independent of where the mass sits.
//!
//! The data must be attenuation-like (object bright on a dark
//! background); transmission data should pass through the negative-log
//! transform first. Negative samples are clamped to zero for the
//! centroid so noise around the background level does not skew it.

use ndarray::Array2;
use tomo_math::fit::fit_centroid_sine;
use tomo_types::config::SinogramConfig;
use tomo_types::constants::{MIN_PROJECTION_DIM, ROW_INTENSITY_EPS};
use tomo_types::error::{AxisError, AxisResult};

/// Axis estimate from a sinogram.
#[derive(Debug, Clone)]
pub struct SinogramEstimate {
    /// Axis column in pixels (the fitted sinusoid offset).
    pub axis_px: f64,
    /// Signed axis offset from the detector centre column.
    pub offset_px: f64,
    /// Amplitude of the centroid sinusoid, px.
    pub amplitude_px: f64,
    /// Phase of the sinusoid, degrees.
    pub phase_deg: f64,
    /// Weighted RMS residual of the fit, px.
    pub fit_rms_px: f64,
    /// Clamped R² of the fit.
    pub confidence: f64,
    /// Rows that carried enough intensity to contribute.
    pub rows_used: usize,
    /// (angle_deg, centroid) samples that entered the fit.
    pub centroids: Vec<(f64, f64)>,
    /// Fitted sinusoid evaluated at the same angles.
    pub fitted: Vec<(f64, f64)>,
}

/// Estimate the rotation-axis column from a sinogram and its angles.
pub fn estimate_from_sinogram(
    sino: &Array2<f64>,
    angles_deg: &[f64],
    config: &SinogramConfig,
) -> AxisResult<SinogramEstimate> {
    config.validate()?;

    let (rows, cols) = sino.dim();
    if angles_deg.len() != rows {
        return Err(AxisError::InvalidInput(format!(
            "angle count {} does not match sinogram rows {rows}",
            angles_deg.len()
        )));
    }
    if cols < MIN_PROJECTION_DIM {
        return Err(AxisError::InvalidInput(format!(
            "sinogram has {cols} columns; need at least {MIN_PROJECTION_DIM}"
        )));
    }
    if rows < config.min_rows {
        return Err(AxisError::InvalidInput(format!(
            "sinogram has {rows} rows; need at least {}",
            config.min_rows
        )));
    }
    if sino.iter().any(|v| !v.is_finite()) {
        return Err(AxisError::InvalidInput(
            "sinogram contains non-finite samples; preprocessing sanitizes these".into(),
        ));
    }

    // Row centroids over clamped intensities; empty rows are skipped.
    let mut theta = Vec::new();
    let mut centroids = Vec::new();
    let mut weights = Vec::new();
    let mut samples = Vec::new();
    for i in 0..rows {
        let mut total = 0.0;
        let mut first_moment = 0.0;
        for j in 0..cols {
            let v = sino[[i, j]].max(0.0);
            total += v;
            first_moment += j as f64 * v;
        }
        if total <= ROW_INTENSITY_EPS {
            continue;
        }
        let centroid = first_moment / total;
        theta.push(angles_deg[i].to_radians());
        centroids.push(centroid);
        weights.push(total);
        samples.push((angles_deg[i], centroid));
    }

    let usable = theta.len();
    if usable < config.min_rows.max(3) {
        return Err(AxisError::InvalidInput(format!(
            "only {usable} sinogram rows carry intensity; need at least {}",
            config.min_rows.max(3)
        )));
    }

    let span = theta.iter().cloned().fold(f64::NEG_INFINITY, f64::max)
        - theta.iter().cloned().fold(f64::INFINITY, f64::min);
    if span < 1e-9 {
        return Err(AxisError::InvalidInput(
            "all sinogram angles are equal; the centroid sinusoid is unconstrained".into(),
        ));
    }

    let fit = fit_centroid_sine(&theta, &centroids, &weights)?;

    let centre = (cols as f64 - 1.0) / 2.0;
    let fitted = samples
        .iter()
        .map(|&(deg, _)| {
            let t = deg.to_radians();
            (deg, fit.offset + fit.a_cos * t.cos() + fit.b_sin * t.sin())
        })
        .collect();

    Ok(SinogramEstimate {
        axis_px: fit.offset,
        offset_px: fit.offset - centre,
        amplitude_px: fit.amplitude(),
        phase_deg: fit.phase_deg(),
        fit_rms_px: fit.rms,
        confidence: fit.r_squared,
        rows_used: usable,
        centroids: samples,
        fitted,
    })
}

/// Uniform angle grid over `[start, end)`, one entry per sinogram row.
/// 0:180 over n rows gives `0, 180/n, ..., 180·(n-1)/n`.
pub fn angle_grid(start_deg: f64, end_deg: f64, count: usize) -> Vec<f64> {
    let step = (end_deg - start_deg) / count as f64;
    (0..count).map(|i| start_deg + step * i as f64).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::phantom::{Phantom, ProjectionGeometry};

    fn test_sinogram(axis_col: f64, ncols: usize, n_angles: usize) -> (Array2<f64>, Vec<f64>) {
        let geometry = ProjectionGeometry {
            ncols,
            nrows: 1,
            axis_col,
            tilt_deg: 0.0,
        };
        let angles = angle_grid(0.0, 180.0, n_angles);
        let sino = geometry.sinogram(&Phantom::standard(0.3 * ncols as f64), &angles);
        (sino, angles)
    }

    #[test]
    fn test_angle_grid_end_exclusive() {
        let grid = angle_grid(0.0, 180.0, 4);
        assert_eq!(grid, vec![0.0, 45.0, 90.0, 135.0]);
    }

    #[test]
    fn test_recovers_axis() {
        let (sino, angles) = test_sinogram(70.25, 128, 180);
        let est = estimate_from_sinogram(&sino, &angles, &SinogramConfig::default()).unwrap();
        assert!(
            (est.axis_px - 70.25).abs() < 0.3,
            "axis {} vs 70.25",
            est.axis_px
        );
        assert!(est.confidence > 0.9, "confidence {}", est.confidence);
        assert_eq!(est.rows_used, 180);
        assert!(est.amplitude_px > 0.5, "amplitude {}", est.amplitude_px);
    }

    #[test]
    fn test_sparse_angles_still_work() {
        let (sino, angles) = test_sinogram(60.0, 128, 12);
        let est = estimate_from_sinogram(&sino, &angles, &SinogramConfig::default()).unwrap();
        assert!(
            (est.axis_px - 60.0).abs() < 0.3,
            "axis {} vs 60",
            est.axis_px
        );
    }

    #[test]
    fn test_angle_count_mismatch() {
        let (sino, mut angles) = test_sinogram(64.0, 128, 90);
        angles.pop();
        assert!(matches!(
            estimate_from_sinogram(&sino, &angles, &SinogramConfig::default()),
            Err(AxisError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_equal_angles_rejected() {
        let (sino, _) = test_sinogram(64.0, 128, 90);
        let angles = vec![45.0; 90];
        let err =
            estimate_from_sinogram(&sino, &angles, &SinogramConfig::default()).unwrap_err();
        assert!(err.to_string().contains("equal"), "got: {err}");
    }

    #[test]
    fn test_empty_sinogram_rejected() {
        let sino = Array2::zeros((90, 128));
        let angles = angle_grid(0.0, 180.0, 90);
        let err =
            estimate_from_sinogram(&sino, &angles, &SinogramConfig::default()).unwrap_err();
        assert!(err.to_string().contains("intensity"), "got: {err}");
    }

    #[test]
    fn test_empty_rows_are_skipped() {
        let (mut sino, angles) = test_sinogram(64.0, 128, 90);
        for j in 0..128 {
            sino[[10, j]] = 0.0;
            sino[[55, j]] = 0.0;
        }
        let est = estimate_from_sinogram(&sino, &angles, &SinogramConfig::default()).unwrap();
        assert_eq!(est.rows_used, 88);
        assert!((est.axis_px - 64.0).abs() < 0.3, "axis {}", est.axis_px);
    }

    #[test]
    fn test_series_share_angles() {
        let (sino, angles) = test_sinogram(66.0, 128, 45);
        let est = estimate_from_sinogram(&sino, &angles, &SinogramConfig::default()).unwrap();
        assert_eq!(est.centroids.len(), est.fitted.len());
        for (c, f) in est.centroids.iter().zip(est.fitted.iter()) {
            assert_eq!(c.0, f.0, "sample and fit angles must align");
            assert!((c.1 - f.1).abs() < 0.5, "fit strays from centroid at {}°", c.0);
        }
    }
}
