// ─────────────────────────────────────────────────────────────────────
// Tomo-Axis — Constants
// © 2019–2026 Maria Matveeva <matveeva.maria@gmail.com>
// License: GNU LGPL v3 or later
// ─────────────────────────────────────────────────────────────────────
/// Default number of horizontal bands for the tilt estimator.
pub const DEFAULT_TILT_BANDS: usize = 8;

/// Default minimum number of detector rows a tilt band must contain.
pub const DEFAULT_MIN_BAND_ROWS: usize = 8;

/// Vertical drift (px) above which the pair estimator flags the scan.
/// Drift means the two projections are offset along the rotation axis,
/// which registration cannot attribute to the axis position.
pub const DEFAULT_DRIFT_WARN_PX: f64 = 4.0;

/// Absolute row intensity below which a sinogram row is treated as
/// empty and skipped by the centroid fit.
pub const ROW_INTENSITY_EPS: f64 = 1e-9;

/// Clamp floor for flat-field denominators, `(flat - dark)`.
pub const FLAT_FIELD_EPS: f64 = 1e-6;

/// Clamp floor for intensities entering the negative-log transform.
pub const NEG_LOG_FLOOR: f64 = 1e-12;

/// Smallest projection dimension (either axis) the estimators accept.
pub const MIN_PROJECTION_DIM: usize = 8;

/// Relative floor when normalizing the cross-power spectrum; magnitudes
/// below `max_magnitude * SPECTRUM_EPS_REL` are zeroed instead of divided.
pub const SPECTRUM_EPS_REL: f64 = 1e-12;

/// Standard deviation below which a projection counts as constant.
pub const CONSTANT_STD_EPS: f64 = 1e-12;
