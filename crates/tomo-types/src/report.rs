// ─────────────────────────────────────────────────────────────────────
// Tomo-Axis — Report Types
// © 2019–2026 Maria Matveeva <matveeva.maria@gmail.com>
// License: GNU LGPL v3 or later
// ─────────────────────────────────────────────────────────────────────
use serde::{Deserialize, Serialize};

/// Estimation method identifier. Serialized in snake_case so report
/// consumers see stable names like `"pair_phase"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Method {
    PairPhase,
    PairCross,
    TiltBands,
    SinogramCentroid,
}

impl Method {
    /// Human-readable label for the CLI summary.
    pub fn label(&self) -> &'static str {
        match self {
            Method::PairPhase => "opposed-pair phase correlation",
            Method::PairCross => "opposed-pair cross correlation",
            Method::TiltBands => "banded tilt fit",
            Method::SinogramCentroid => "sinogram centroid fit",
        }
    }

    /// Short snake_case name, identical to the serialized form.
    pub fn name(&self) -> &'static str {
        match self {
            Method::PairPhase => "pair_phase",
            Method::PairCross => "pair_cross",
            Method::TiltBands => "tilt_bands",
            Method::SinogramCentroid => "sinogram_centroid",
        }
    }

    /// Whether this method registers the full opposed pair.
    pub fn is_pair(&self) -> bool {
        matches!(self, Method::PairPhase | Method::PairCross)
    }
}

/// One axis estimate, common across all methods.
///
/// `axis_px` is the axis column in the original detector frame;
/// `offset_px` is `axis_px - (width - 1)/2`, signed, positive to the
/// right of the detector centre.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AxisEstimate {
    pub method: Method,
    pub axis_px: f64,
    pub offset_px: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tilt_deg: Option<f64>,
    /// Method-specific quality score in [0, 1].
    pub confidence: f64,
}

/// Extra numbers from the opposed-pair registration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PairDetails {
    /// Horizontal lag between the 0° projection and the mirrored 180°
    /// projection; the axis offset is half of this.
    pub shift_px: f64,
    /// Vertical lag (drift along the rotation axis).
    pub drift_px: f64,
    /// RMS pixel difference after shift alignment.
    pub residual_rms: f64,
}

/// Extra numbers from the banded tilt fit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TiltDetails {
    pub slope_px_per_row: f64,
    pub fit_rms_px: f64,
    pub bands: usize,
}

/// Extra numbers from the sinogram centroid fit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SinogramDetails {
    pub amplitude_px: f64,
    pub phase_deg: f64,
    pub fit_rms_px: f64,
    pub rows_used: usize,
}

/// A report entry: the estimate plus whichever detail block applies.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportEntry {
    #[serde(flatten)]
    pub estimate: AxisEstimate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pair: Option<PairDetails>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tilt: Option<TiltDetails>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sinogram: Option<SinogramDetails>,
}

/// Input files that produced the report.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportInputs {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub projection_0: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub projection_180: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sinogram: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flat: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dark: Option<String>,
}

/// Detector geometry after preprocessing (the frame estimates refer to).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectorInfo {
    pub width_px: usize,
    pub height_px: usize,
    /// Half-pixel centre, `(width - 1)/2`.
    pub center_px: f64,
}

/// Full machine-readable result of one tomo-axis run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AxisReport {
    pub tool: String,
    pub version: String,
    /// "pair" or "sinogram".
    pub mode: String,
    pub inputs: ReportInputs,
    pub detector: DetectorInfo,
    pub estimates: Vec<ReportEntry>,
    pub selected: ReportEntry,
}

/// Pick the best estimate: highest confidence wins; on a tie the pair
/// registration is preferred because it uses the full 2-D data.
/// NaN confidences lose against everything.
pub fn select_best(entries: &[ReportEntry]) -> Option<usize> {
    let score = |e: &ReportEntry| {
        if e.estimate.confidence.is_nan() {
            f64::NEG_INFINITY
        } else {
            e.estimate.confidence
        }
    };

    let mut best: Option<usize> = None;
    for (i, entry) in entries.iter().enumerate() {
        match best {
            None => best = Some(i),
            Some(b) => {
                let sb = score(&entries[b]);
                let si = score(entry);
                if si > sb
                    || (si == sb
                        && entry.estimate.method.is_pair()
                        && !entries[b].estimate.method.is_pair())
                {
                    best = Some(i);
                }
            }
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(method: Method, confidence: f64) -> ReportEntry {
        ReportEntry {
            estimate: AxisEstimate {
                method,
                axis_px: 100.0,
                offset_px: 0.5,
                tilt_deg: None,
                confidence,
            },
            pair: None,
            tilt: None,
            sinogram: None,
        }
    }

    #[test]
    fn test_method_json_names() {
        for method in [
            Method::PairPhase,
            Method::PairCross,
            Method::TiltBands,
            Method::SinogramCentroid,
        ] {
            let json = serde_json::to_string(&method).unwrap();
            assert_eq!(json, format!("\"{}\"", method.name()));
        }
    }

    #[test]
    fn test_select_best_highest_confidence() {
        let entries = vec![
            entry(Method::SinogramCentroid, 0.7),
            entry(Method::PairPhase, 0.9),
            entry(Method::TiltBands, 0.8),
        ];
        assert_eq!(select_best(&entries), Some(1));
    }

    #[test]
    fn test_select_best_tie_prefers_pair() {
        let entries = vec![
            entry(Method::SinogramCentroid, 0.8),
            entry(Method::PairCross, 0.8),
        ];
        assert_eq!(select_best(&entries), Some(1));
    }

    #[test]
    fn test_select_best_nan_loses() {
        let entries = vec![
            entry(Method::PairPhase, f64::NAN),
            entry(Method::SinogramCentroid, 0.1),
        ];
        assert_eq!(select_best(&entries), Some(1));
    }

    #[test]
    fn test_select_best_empty() {
        assert_eq!(select_best(&[]), None);
    }

    #[test]
    fn test_entry_flattens_estimate_fields() {
        let mut e = entry(Method::PairPhase, 0.9);
        e.pair = Some(PairDetails {
            shift_px: 12.4,
            drift_px: 0.2,
            residual_rms: 0.03,
        });
        let json = serde_json::to_string(&e).unwrap();
        assert!(json.contains("\"axis_px\":100.0"), "json: {json}");
        assert!(json.contains("\"method\":\"pair_phase\""), "json: {json}");
        assert!(json.contains("\"shift_px\":12.4"), "json: {json}");
        assert!(!json.contains("tilt_deg"), "None details stay absent: {json}");
    }

    #[test]
    fn test_report_roundtrip() {
        let selected = entry(Method::PairPhase, 0.9);
        let report = AxisReport {
            tool: "tomo-axis".into(),
            version: "1.0.0".into(),
            mode: "pair".into(),
            inputs: ReportInputs {
                projection_0: Some("p0.npy".into()),
                projection_180: Some("p180.npy".into()),
                ..ReportInputs::default()
            },
            detector: DetectorInfo {
                width_px: 2048,
                height_px: 512,
                center_px: 1023.5,
            },
            estimates: vec![selected.clone(), entry(Method::TiltBands, 0.5)],
            selected,
        };
        let json = serde_json::to_string_pretty(&report).unwrap();
        let back: AxisReport = serde_json::from_str(&json).unwrap();
        assert_eq!(back.estimates.len(), 2);
        assert_eq!(back.detector.center_px, 1023.5);
        assert_eq!(back.selected.estimate.axis_px, 100.0);
        assert_eq!(back.inputs.projection_0.as_deref(), Some("p0.npy"));
    }
}
