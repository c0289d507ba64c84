// ─────────────────────────────────────────────────────────────────────
// Tomo-Axis — CLI Definition
// © 2019–2026 Maria Matveeva <matveeva.maria@gmail.com>
// License: GNU LGPL v3 or later
// ─────────────────────────────────────────────────────────────────────
//! Command-line surface and config-file merging.
//!
//! The JSON config file (`--config`) supplies defaults; explicit flags
//! override individual fields on top of it.

use clap::{ArgGroup, Args, Parser, Subcommand};
use tomo_types::config::{CorrelationKind, JobConfig, Roi};

/// Computing axis of rotation for parallel-beam tomography.
#[derive(Parser, Debug)]
#[command(name = "tomo-axis", version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Estimate the axis from a 0°/180° projection pair.
    Pair(PairArgs),

    /// Estimate the axis from a sinogram.
    #[command(visible_alias = "sino")]
    Sinogram(SinogramArgs),
}

#[derive(Args, Debug)]
pub struct PairArgs {
    /// 0° projection (.npy, .tif/.tiff or .png).
    #[arg(value_name = "PROJ0")]
    pub proj0: String,

    /// 180° projection, same shape as PROJ0.
    #[arg(value_name = "PROJ180")]
    pub proj180: String,

    /// Flat-field (open beam) frame.
    #[arg(long, value_name = "PATH")]
    pub flat: Option<String>,

    /// Dark-current frame.
    #[arg(long, value_name = "PATH")]
    pub dark: Option<String>,

    /// Crop to a region of interest before estimation.
    #[arg(long, value_name = "X,Y,W,H", value_parser = parse_roi)]
    pub roi: Option<Roi>,

    /// Average N x N pixel blocks before estimation.
    #[arg(long = "bin", value_name = "N")]
    pub bin: Option<usize>,

    /// Gaussian smoothing sigma in pixels.
    #[arg(long = "sigma", value_name = "S")]
    pub sigma: Option<f64>,

    /// Convert transmission to attenuation with -ln(I).
    #[arg(long = "neg-log")]
    pub neg_log: bool,

    /// Correlation method: phase (default) or cross.
    #[arg(long, value_name = "METHOD", value_parser = CorrelationKind::parse)]
    pub method: Option<CorrelationKind>,

    /// Skip the banded tilt estimate.
    #[arg(long = "no-tilt")]
    pub no_tilt: bool,

    /// Horizontal bands for the tilt fit.
    #[arg(long, value_name = "N")]
    pub bands: Option<usize>,

    /// Write a red/cyan alignment overlay image.
    #[arg(long, value_name = "PATH")]
    pub overlay: Option<String>,

    /// Dump the full correlation surface as .npy.
    #[arg(long = "dump-correlation", value_name = "PATH")]
    pub dump_correlation: Option<String>,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Args, Debug)]
#[command(group(
    ArgGroup::new("angle-source")
        .required(true)
        .args(["angles", "angles_file"])
))]
pub struct SinogramArgs {
    /// Sinogram (rows = angles, columns = detector).
    #[arg(value_name = "SINO")]
    pub sinogram: String,

    /// Uniform angle grid START:END in degrees, end-exclusive over the
    /// sinogram rows (0:180 over n rows gives 0, 180/n, ...).
    #[arg(long, value_name = "START:END", value_parser = parse_angle_range)]
    pub angles: Option<AngleRange>,

    /// Text file with one angle in degrees per sinogram row.
    #[arg(long = "angles-file", value_name = "PATH")]
    pub angles_file: Option<String>,

    #[command(flatten)]
    pub output: OutputArgs,
}

/// Flags shared by both modes.
#[derive(Args, Debug)]
pub struct OutputArgs {
    /// Write the JSON report here.
    #[arg(long, value_name = "PATH")]
    pub report: Option<String>,

    /// Write a diagnostic curve plot here.
    #[arg(long, value_name = "PATH")]
    pub curve: Option<String>,

    /// JSON config file with estimator defaults.
    #[arg(long, value_name = "PATH")]
    pub config: Option<String>,

    /// Narrate pipeline steps to stderr.
    #[arg(short, long)]
    pub verbose: bool,
}

/// Half-open angle interval in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AngleRange {
    pub start_deg: f64,
    pub end_deg: f64,
}

pub fn parse_roi(s: &str) -> Result<Roi, String> {
    let parts: Vec<&str> = s.split(',').map(str::trim).collect();
    if parts.len() != 4 {
        return Err(format!("expected X,Y,W,H, got '{s}'"));
    }
    let field = |i: usize, name: &str| -> Result<usize, String> {
        parts[i]
            .parse()
            .map_err(|_| format!("ROI {name} '{}' is not a non-negative integer", parts[i]))
    };
    Ok(Roi {
        x: field(0, "x")?,
        y: field(1, "y")?,
        width: field(2, "width")?,
        height: field(3, "height")?,
    })
}

pub fn parse_angle_range(s: &str) -> Result<AngleRange, String> {
    let (start, end) = s
        .split_once(':')
        .ok_or_else(|| format!("expected START:END, got '{s}'"))?;
    let start_deg: f64 = start
        .trim()
        .parse()
        .map_err(|_| format!("start angle '{start}' is not a number"))?;
    let end_deg: f64 = end
        .trim()
        .parse()
        .map_err(|_| format!("end angle '{end}' is not a number"))?;
    if !start_deg.is_finite() || !end_deg.is_finite() {
        return Err(format!("angle range {s} must be finite"));
    }
    if end_deg <= start_deg {
        return Err(format!("angle range {start_deg}:{end_deg} is empty"));
    }
    Ok(AngleRange { start_deg, end_deg })
}

/// Layer pair-mode flags over the config-file defaults. Flags that were
/// not given leave the config value in place.
pub fn merge_pair(args: &PairArgs, mut config: JobConfig) -> JobConfig {
    if args.flat.is_some() {
        config.preprocess.flat = args.flat.clone();
    }
    if args.dark.is_some() {
        config.preprocess.dark = args.dark.clone();
    }
    if args.roi.is_some() {
        config.preprocess.roi = args.roi;
    }
    if let Some(bin) = args.bin {
        config.preprocess.binning = bin;
    }
    if let Some(sigma) = args.sigma {
        config.preprocess.smooth_sigma = sigma;
    }
    if args.neg_log {
        config.preprocess.neg_log = true;
    }
    if let Some(method) = args.method {
        config.pair.correlation = method;
    }
    if args.no_tilt {
        config.tilt.enabled = false;
    }
    if let Some(bands) = args.bands {
        config.tilt.bands = bands;
    }
    config
}

/// Config-file defaults, or the built-in defaults when no file given.
pub fn load_job_config(path: Option<&str>) -> tomo_types::error::AxisResult<JobConfig> {
    match path {
        Some(p) => JobConfig::from_file(p),
        None => Ok(JobConfig::default()),
    }
}
