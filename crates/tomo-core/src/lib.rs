// ─────────────────────────────────────────────────────────────────────
// Tomo-Axis — Estimator Core
// © 2019–2026 Maria Matveeva <matveeva.maria@gmail.com>
// License: GNU LGPL v3 or later
// ─────────────────────────────────────────────────────────────────────
//! Rotation-axis estimators for parallel-beam tomography.
//!
//! Three independent estimators are provided:
//!
//! - [`pair::estimate_from_pair`] registers a 0°/180° projection pair
//!   by correlating the first projection against the mirrored second
//!   one; half the measured lag is the axis offset from the detector
//!   centre.
//! - [`tilt::estimate_tilt`] repeats the registration per horizontal
//!   band and fits a line through the band lags, giving the in-plane
//!   tilt of the axis along with its position at the centre row.
//! - [`sinogram::estimate_from_sinogram`] tracks the row centroid of a
//!   sinogram across angles and fits the sinusoid whose offset is the
//!   axis column.
//!
//! [`phantom`] generates analytic ellipsoid projections with known
//! axis position and tilt, so every estimator is testable against
//! exact ground truth. [`preprocess`] carries the flat/dark, ROI,
//! binning, smoothing and negative-log steps applied before any
//! estimation.

pub mod pair;
pub mod phantom;
pub mod preprocess;
pub mod sinogram;
pub mod tilt;

mod validate;
