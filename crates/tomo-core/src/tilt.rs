// ─────────────────────────────────────────────────────────────────────
// Tomo-Axis — Tilt Estimator
// © 2019–2026 Maria Matveeva <matveeva.maria@gmail.com>
// License: GNU LGPL v3 or later
// ─────────────────────────────────────────────────────────────────────
//! In-plane axis tilt from banded opposed-pair registration.
//!
//! A tilted rotation axis shifts the apparent axis column linearly
//! with the detector row. The image pair is cut into horizontal bands,
//! each band is collapsed to a 1D profile and registered against the
//! mirrored counterpart, and a response-weighted line is fitted
//! through the per-band lags. Half the line's slope is tan(tilt); the
//! intercept at the centre row gives the axis column there.

use ndarray::Array2;
use tomo_math::correlate::phase_correlate_1d;
use tomo_math::fit::fit_line_weighted;
use tomo_math::resample::flip_horizontal;
use tomo_types::config::TiltConfig;
use tomo_types::error::{AxisError, AxisResult};

use crate::validate;

/// One band's registration result.
#[derive(Debug, Clone, Copy)]
pub struct BandShift {
    /// Centre row of the band in the full image.
    pub row_center: f64,
    /// Measured horizontal lag of the band.
    pub shift_px: f64,
    /// Correlation peak response, used as the fit weight.
    pub response: f64,
}

/// Axis tilt estimate from banded registration.
#[derive(Debug, Clone)]
pub struct TiltEstimate {
    /// In-plane tilt of the rotation axis, degrees.
    pub tilt_deg: f64,
    /// Axis column at the centre row.
    pub axis_px: f64,
    /// Axis offset from the detector centre column.
    pub offset_px: f64,
    /// Slope of the lag-vs-row line, px per row.
    pub slope_px_per_row: f64,
    /// Weighted RMS residual of the line fit, px.
    pub fit_rms_px: f64,
    /// Mean band response damped by the fit residual.
    pub confidence: f64,
    /// Per-band diagnostics.
    pub bands: Vec<BandShift>,
}

/// Estimate axis tilt and position from opposed projections.
pub fn estimate_tilt(
    p0: &Array2<f64>,
    p180: &Array2<f64>,
    config: &TiltConfig,
) -> AxisResult<TiltEstimate> {
    config.validate()?;
    validate::opposed_pair(p0, p180)?;

    let (rows, ncols) = p0.dim();
    let needed = config.bands * config.min_band_rows;
    if rows < needed {
        return Err(AxisError::InvalidInput(format!(
            "{rows} rows cannot host {} bands of at least {} rows",
            config.bands, config.min_band_rows
        )));
    }

    let flipped = flip_horizontal(p180);
    let mut bands = Vec::with_capacity(config.bands);
    for band in 0..config.bands {
        let lo = band * rows / config.bands;
        let hi = (band + 1) * rows / config.bands;
        let profile0 = band_profile(p0, lo, hi);
        let profile180 = band_profile(&flipped, lo, hi);
        let corr = phase_correlate_1d(&profile0, &profile180);
        bands.push(BandShift {
            row_center: (lo + hi - 1) as f64 / 2.0,
            shift_px: corr.dx,
            response: corr.response.max(0.0),
        });
    }

    let total_weight: f64 = bands.iter().map(|b| b.response).sum();
    if total_weight <= 1e-12 {
        return Err(AxisError::InvalidInput(
            "no band produced a correlation response; cannot fit a tilt".into(),
        ));
    }

    let x: Vec<f64> = bands.iter().map(|b| b.row_center).collect();
    let y: Vec<f64> = bands.iter().map(|b| b.shift_px).collect();
    let w: Vec<f64> = bands.iter().map(|b| b.response).collect();
    let fit = fit_line_weighted(&x, &y, &w)?;

    let centre_col = (ncols as f64 - 1.0) / 2.0;
    let mid_row = (rows as f64 - 1.0) / 2.0;
    let lag_at_mid = fit.slope * mid_row + fit.intercept;
    let axis = centre_col + lag_at_mid / 2.0;
    let tilt_deg = (fit.slope / 2.0).atan().to_degrees();

    let mean_response = total_weight / bands.len() as f64;
    let confidence = (mean_response / (1.0 + fit.rms)).clamp(0.0, 1.0);

    Ok(TiltEstimate {
        tilt_deg,
        axis_px: axis,
        offset_px: lag_at_mid / 2.0,
        slope_px_per_row: fit.slope,
        fit_rms_px: fit.rms,
        confidence,
        bands,
    })
}

/// Column-wise mean over rows [lo, hi).
fn band_profile(p: &Array2<f64>, lo: usize, hi: usize) -> Vec<f64> {
    let ncols = p.ncols();
    let norm = 1.0 / (hi - lo) as f64;
    (0..ncols)
        .map(|j| {
            let mut sum = 0.0;
            for i in lo..hi {
                sum += p[[i, j]];
            }
            sum * norm
        })
        .collect()
}
