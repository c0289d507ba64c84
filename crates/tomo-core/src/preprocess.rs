// ─────────────────────────────────────────────────────────────────────
// Tomo-Axis — Projection Preprocessing
// © 2019–2026 Maria Matveeva <matveeva.maria@gmail.com>
// License: GNU LGPL v3 or later
// ─────────────────────────────────────────────────────────────────────
//! Detector-frame preprocessing applied before estimation.
//!
//! The pipeline order is fixed: sanitize → flat/dark correction → ROI
//! crop → binning → Gaussian smoothing → negative log. Each step is
//! also exposed on its own.

use ndarray::{s, Array2};
use tomo_math::filter::{bin_average, gaussian_blur, sanitize_non_finite};
use tomo_types::config::{PreprocessConfig, Roi};
use tomo_types::constants::{FLAT_FIELD_EPS, NEG_LOG_FLOOR};
use tomo_types::error::{AxisError, AxisResult};

/// What `prepare` did to the frame, for verbose reporting.
#[derive(Debug, Clone, Copy, Default)]
pub struct PrepareInfo {
    /// Non-finite samples replaced with zero.
    pub sanitized: usize,
    /// Output dimensions after ROI and binning.
    pub rows: usize,
    pub cols: usize,
}

/// Flat/dark-field correction `(p - dark) / (flat - dark)`.
///
/// The denominator is clamped away from zero. A missing dark frame is
/// treated as zero.
pub fn flat_dark_correct(
    p: &Array2<f64>,
    flat: &Array2<f64>,
    dark: Option<&Array2<f64>>,
) -> AxisResult<Array2<f64>> {
    if flat.dim() != p.dim() {
        return Err(AxisError::shape(p.dim(), flat.dim()));
    }
    if let Some(d) = dark {
        if d.dim() != p.dim() {
            return Err(AxisError::shape(p.dim(), d.dim()));
        }
    }

    let (rows, cols) = p.dim();
    let mut out = Array2::zeros((rows, cols));
    for i in 0..rows {
        for j in 0..cols {
            let d = dark.map_or(0.0, |d| d[[i, j]]);
            let denom = (flat[[i, j]] - d).max(FLAT_FIELD_EPS);
            out[[i, j]] = (p[[i, j]] - d) / denom;
        }
    }
    Ok(out)
}

/// Subtract a dark frame without flat normalization.
pub fn dark_subtract(p: &Array2<f64>, dark: &Array2<f64>) -> AxisResult<Array2<f64>> {
    if dark.dim() != p.dim() {
        return Err(AxisError::shape(p.dim(), dark.dim()));
    }
    Ok(p - dark)
}

/// Crop to a validated region of interest.
pub fn crop_roi(p: &Array2<f64>, roi: &Roi) -> AxisResult<Array2<f64>> {
    let (rows, cols) = p.dim();
    roi.validate(rows, cols)?;
    Ok(p
        .slice(s![roi.y..roi.y + roi.height, roi.x..roi.x + roi.width])
        .to_owned())
}

/// Negative-log transform for transmission data, with the intensity
/// clamped above zero so dead pixels stay finite.
pub fn neg_log(p: &Array2<f64>) -> Array2<f64> {
    p.mapv(|v| -(v.max(NEG_LOG_FLOOR).ln()))
}

/// Full preprocessing pipeline per `PreprocessConfig`.
///
/// `flat` and `dark` are already-loaded frames matching the raw
/// projection shape; the caller resolves the configured paths.
pub fn prepare(
    p: &Array2<f64>,
    flat: Option<&Array2<f64>>,
    dark: Option<&Array2<f64>>,
    config: &PreprocessConfig,
) -> AxisResult<(Array2<f64>, PrepareInfo)> {
    let mut frame = p.clone();
    let sanitized = sanitize_non_finite(&mut frame);

    frame = match (flat, dark) {
        (Some(f), d) => flat_dark_correct(&frame, f, d)?,
        (None, Some(d)) => dark_subtract(&frame, d)?,
        (None, None) => frame,
    };

    if let Some(roi) = &config.roi {
        frame = crop_roi(&frame, roi)?;
    }

    if config.binning > 1 {
        let (rows, cols) = frame.dim();
        if rows / config.binning == 0 || cols / config.binning == 0 {
            return Err(AxisError::InvalidInput(format!(
                "binning factor {} leaves no pixels from a {rows}x{cols} frame",
                config.binning
            )));
        }
        frame = bin_average(&frame, config.binning);
    }

    if config.smooth_sigma > 0.0 {
        frame = gaussian_blur(&frame, config.smooth_sigma);
    }

    if config.neg_log {
        frame = neg_log(&frame);
    }

    let (rows, cols) = frame.dim();
    Ok((
        frame,
        PrepareInfo {
            sanitized,
            rows,
            cols,
        },
    ))
}
