// ─────────────────────────────────────────────────────────────────────
// Tomo-Axis — Config
// © 2019–2026 Maria Matveeva <matveeva.maria@gmail.com>
// License: GNU LGPL v3 or later
// ─────────────────────────────────────────────────────────────────────
use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_DRIFT_WARN_PX, DEFAULT_MIN_BAND_ROWS, DEFAULT_TILT_BANDS,
};
use crate::error::{AxisError, AxisResult};

/// Correlation backend for projection registration.
///
/// Phase correlation gives a sharp, shift-only peak and is the default.
/// Plain cross correlation is broader but more forgiving on noisy or
/// low-texture projections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CorrelationKind {
    #[default]
    Phase,
    Cross,
}

impl CorrelationKind {
    pub fn parse(s: &str) -> Result<Self, String> {
        match s {
            "phase" => Ok(CorrelationKind::Phase),
            "cross" => Ok(CorrelationKind::Cross),
            other => Err(format!(
                "Unknown correlation kind '{other}', expected 'phase' or 'cross'"
            )),
        }
    }
}

/// Rectangular region of interest in pixel coordinates.
/// `x` is the column of the left edge, `y` the row of the top edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Roi {
    pub x: usize,
    pub y: usize,
    pub width: usize,
    pub height: usize,
}

impl Roi {
    /// Check the ROI against an array of shape `(rows, cols)`.
    pub fn validate(&self, rows: usize, cols: usize) -> AxisResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(AxisError::InvalidInput(format!(
                "ROI has zero area: {}x{}",
                self.width, self.height
            )));
        }
        let x_end = self.x.checked_add(self.width);
        let y_end = self.y.checked_add(self.height);
        match (x_end, y_end) {
            (Some(xe), Some(ye)) if xe <= cols && ye <= rows => Ok(()),
            _ => Err(AxisError::InvalidInput(format!(
                "ROI {}+{} x {}+{} exceeds image {}x{}",
                self.x, self.width, self.y, self.height, rows, cols
            ))),
        }
    }
}

/// Detector-frame preprocessing applied before any estimator runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PreprocessConfig {
    /// Path to a flat-field (open beam) frame.
    pub flat: Option<String>,
    /// Path to a dark-current frame.
    pub dark: Option<String>,
    /// Region of interest; `None` keeps the full frame.
    pub roi: Option<Roi>,
    /// Block-averaging factor, 1 = no binning.
    pub binning: usize,
    /// Gaussian smoothing sigma in pixels, 0 = off.
    pub smooth_sigma: f64,
    /// Apply `-ln(I)` after normalization (absorption contrast).
    pub neg_log: bool,
}

impl Default for PreprocessConfig {
    fn default() -> Self {
        PreprocessConfig {
            flat: None,
            dark: None,
            roi: None,
            binning: 1,
            smooth_sigma: 0.0,
            neg_log: false,
        }
    }
}

impl PreprocessConfig {
    pub fn validate(&self) -> AxisResult<()> {
        if self.binning == 0 {
            return Err(AxisError::Config("binning must be >= 1".into()));
        }
        if !self.smooth_sigma.is_finite() || self.smooth_sigma < 0.0 {
            return Err(AxisError::Config(format!(
                "smooth_sigma must be finite and >= 0, got {}",
                self.smooth_sigma
            )));
        }
        Ok(())
    }
}

/// Opposed-projection registration settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PairConfig {
    pub correlation: CorrelationKind,
    /// Vertical drift (px) beyond which the result carries a warning.
    pub drift_warn_px: f64,
}

impl Default for PairConfig {
    fn default() -> Self {
        PairConfig {
            correlation: CorrelationKind::Phase,
            drift_warn_px: DEFAULT_DRIFT_WARN_PX,
        }
    }
}

impl PairConfig {
    pub fn validate(&self) -> AxisResult<()> {
        if !self.drift_warn_px.is_finite() || self.drift_warn_px < 0.0 {
            return Err(AxisError::Config(format!(
                "drift_warn_px must be finite and >= 0, got {}",
                self.drift_warn_px
            )));
        }
        Ok(())
    }
}

/// Banded tilt-estimation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TiltConfig {
    pub enabled: bool,
    /// Number of horizontal bands the projections are split into.
    pub bands: usize,
    /// Minimum detector rows per band.
    pub min_band_rows: usize,
}

impl Default for TiltConfig {
    fn default() -> Self {
        TiltConfig {
            enabled: true,
            bands: DEFAULT_TILT_BANDS,
            min_band_rows: DEFAULT_MIN_BAND_ROWS,
        }
    }
}

impl TiltConfig {
    pub fn validate(&self) -> AxisResult<()> {
        if self.bands < 2 {
            return Err(AxisError::Config(format!(
                "tilt estimation needs at least 2 bands, got {}",
                self.bands
            )));
        }
        if self.min_band_rows == 0 {
            return Err(AxisError::Config("min_band_rows must be >= 1".into()));
        }
        Ok(())
    }
}

/// Sinogram centroid-fit settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SinogramConfig {
    /// Minimum number of usable (non-empty) sinogram rows.
    /// The sinusoid fit has 3 parameters, so the floor is 3.
    pub min_rows: usize,
}

impl Default for SinogramConfig {
    fn default() -> Self {
        SinogramConfig { min_rows: 3 }
    }
}

impl SinogramConfig {
    pub fn validate(&self) -> AxisResult<()> {
        if self.min_rows < 3 {
            return Err(AxisError::Config(format!(
                "min_rows must be >= 3, got {}",
                self.min_rows
            )));
        }
        Ok(())
    }
}

/// Top-level job configuration. Every field has a default, so `{}` is a
/// valid configuration file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct JobConfig {
    pub preprocess: PreprocessConfig,
    pub pair: PairConfig,
    pub tilt: TiltConfig,
    pub sinogram: SinogramConfig,
}

impl JobConfig {
    /// Load from a JSON file.
    pub fn from_file(path: &str) -> AxisResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> AxisResult<()> {
        self.preprocess.validate()?;
        self.pair.validate()?;
        self.tilt.validate()?;
        self.sinogram.validate()?;
        Ok(())
    }
}
