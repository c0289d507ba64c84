// ─────────────────────────────────────────────────────────────────────
// Tomo-Axis — Numerical Primitives
// © 2019–2026 Maria Matveeva <matveeva.maria@gmail.com>
// License: GNU LGPL v3 or later
// ─────────────────────────────────────────────────────────────────────
//! Numerical building blocks shared by the axis estimators.
//!
//! The crate collects the small amount of signal processing the tool
//! needs: FFT wrappers over `rustfft`, phase and cross correlation with
//! sub-pixel peak refinement, weighted line and sinusoid fits, and the
//! image-domain helpers (Gaussian smoothing, binning, resampling) used
//! during preprocessing.

pub mod correlate;
pub mod fft;
pub mod filter;
pub mod fit;
pub mod resample;
