// ─────────────────────────────────────────────────────────────────────
// Tomo-Axis — Opposed-Pair Estimator
// © 2019–2026 Maria Matveeva <matveeva.maria@gmail.com>
// License: GNU LGPL v3 or later
// ─────────────────────────────────────────────────────────────────────
//! Axis estimation from a 0°/180° projection pair.
//!
//! In parallel-beam geometry the 180° projection is the 0° projection
//! mirrored about the rotation-axis column `c`. Mirroring the 180°
//! projection about the detector centre instead leaves a copy of the
//! 0° projection translated by `2·(c - centre)` pixels, so the
//! correlation lag between the two is twice the axis offset:
//!
//! ```text
//! axis = centre + lag/2,    centre = (ncols - 1)/2
//! ```
//!
//! The vertical component of the correlation peak measures stage drift
//! between the two exposures and is reported as a warning when it
//! exceeds the configured threshold.

use ndarray::Array2;
use tomo_math::correlate::{cross_correlate_2d, phase_correlate_2d, Correlation2d};
use tomo_math::resample::{flip_horizontal, shift_horizontal};
use tomo_types::config::{CorrelationKind, PairConfig};
use tomo_types::error::AxisResult;

use crate::validate;

/// Axis estimate from an opposed projection pair.
#[derive(Debug, Clone)]
pub struct PairEstimate {
    /// Axis column in pixels, sub-pixel.
    pub axis_px: f64,
    /// Signed axis offset from the detector centre column.
    pub offset_px: f64,
    /// Horizontal lag between the 0° projection and the mirrored 180°
    /// projection; twice the axis offset.
    pub shift_px: f64,
    /// Vertical lag between the two projections (stage drift).
    pub drift_px: f64,
    /// Correlation peak response; near 1 for a clean pair.
    pub confidence: f64,
    /// RMS of the pixel difference after aligning the mirrored
    /// projection, over the overlapping interior columns.
    pub residual_rms: f64,
    /// Correlation values along the peak row as (lag, value) pairs.
    pub correlation_row: Vec<(f64, f64)>,
    /// True when |drift| exceeds `PairConfig::drift_warn_px`.
    pub drift_warning: bool,
}

/// Estimate the rotation-axis column from opposed projections.
pub fn estimate_from_pair(
    p0: &Array2<f64>,
    p180: &Array2<f64>,
    config: &PairConfig,
) -> AxisResult<PairEstimate> {
    config.validate()?;
    validate::opposed_pair(p0, p180)?;

    let flipped = flip_horizontal(p180);
    let corr = match config.correlation {
        CorrelationKind::Phase => phase_correlate_2d(p0, &flipped),
        CorrelationKind::Cross => cross_correlate_2d(p0, &flipped),
    };

    let ncols = p0.ncols();
    let centre = (ncols as f64 - 1.0) / 2.0;
    let shift = corr.dx;
    let axis = centre + shift / 2.0;

    let residual_rms = alignment_residual(p0, &flipped, &corr);

    Ok(PairEstimate {
        axis_px: axis,
        offset_px: shift / 2.0,
        shift_px: shift,
        drift_px: corr.dy,
        confidence: corr.response,
        residual_rms,
        correlation_row: corr.row_through_peak(),
        drift_warning: corr.dy.abs() > config.drift_warn_px,
    })
}

/// Full correlation surface between the 0° projection and the mirrored
/// 180° projection. Recomputed on demand; [`PairEstimate`] does not
/// carry it.
pub fn correlation_surface(
    p0: &Array2<f64>,
    p180: &Array2<f64>,
    kind: CorrelationKind,
) -> AxisResult<Array2<f64>> {
    validate::opposed_pair(p0, p180)?;
    let flipped = flip_horizontal(p180);
    let corr = match kind {
        CorrelationKind::Phase => phase_correlate_2d(p0, &flipped),
        CorrelationKind::Cross => cross_correlate_2d(p0, &flipped),
    };
    Ok(corr.surface)
}

/// RMS difference between the 0° projection and the shift-aligned
/// mirror, over columns untouched by the zero fill. Returns 0 when no
/// interior remains.
fn alignment_residual(p0: &Array2<f64>, flipped: &Array2<f64>, corr: &Correlation2d) -> f64 {
    let aligned = shift_horizontal(flipped, -corr.dx);
    let (rows, cols) = p0.dim();
    let margin = corr.dx.abs().ceil() as usize + 1;
    if 2 * margin >= cols {
        return 0.0;
    }

    let mut sum = 0.0;
    let mut count = 0usize;
    for i in 0..rows {
        for j in margin..cols - margin {
            let d = p0[[i, j]] - aligned[[i, j]];
            sum += d * d;
            count += 1;
        }
    }
    (sum / count as f64).sqrt()
}
