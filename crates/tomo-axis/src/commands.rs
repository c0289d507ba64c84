// ─────────────────────────────────────────────────────────────────────
// Tomo-Axis — Subcommand Drivers
// © 2019–2026 Maria Matveeva <matveeva.maria@gmail.com>
// License: GNU LGPL v3 or later
// ─────────────────────────────────────────────────────────────────────
//! Pair and sinogram pipelines: load, preprocess, estimate, report.

use anyhow::{Context, Result};
use ndarray::Array2;
use tomo_core::pair::{correlation_surface, estimate_from_pair, PairEstimate};
use tomo_core::preprocess::prepare;
use tomo_core::sinogram::{estimate_from_sinogram, SinogramEstimate};
use tomo_core::tilt::{estimate_tilt, TiltEstimate};
use tomo_types::config::{CorrelationKind, JobConfig, PreprocessConfig};
use tomo_types::report::{
    select_best, AxisEstimate, AxisReport, DetectorInfo, Method, PairDetails, ReportEntry,
    ReportInputs, SinogramDetails, TiltDetails,
};

use crate::angles;
use crate::cli::{merge_pair, OutputArgs, PairArgs, SinogramArgs};

const CURVE_WIDTH: u32 = 900;
const CURVE_HEIGHT: u32 = 600;

pub fn run_pair(args: &PairArgs) -> Result<()> {
    let out = &args.output;
    let config = load_config(out)?;
    let config = merge_pair(args, config);
    config.validate().context("invalid configuration")?;

    let p0_raw = load(&args.proj0, "0° projection", out.verbose)?;
    let p180_raw = load(&args.proj180, "180° projection", out.verbose)?;
    let flat = match config.preprocess.flat.as_deref() {
        Some(path) => Some(load(path, "flat frame", out.verbose)?),
        None => None,
    };
    let dark = match config.preprocess.dark.as_deref() {
        Some(path) => Some(load(path, "dark frame", out.verbose)?),
        None => None,
    };

    let (p0, info0) = prepare(&p0_raw, flat.as_ref(), dark.as_ref(), &config.preprocess)
        .context("preprocessing 0° projection")?;
    let (p180, info180) = prepare(&p180_raw, flat.as_ref(), dark.as_ref(), &config.preprocess)
        .context("preprocessing 180° projection")?;
    note(
        out.verbose,
        &format!(
            "prepared frames {} x {} px ({} non-finite samples replaced)",
            info0.cols,
            info0.rows,
            info0.sanitized + info180.sanitized
        ),
    );

    note(
        out.verbose,
        &format!("registering pair ({:?} correlation)", config.pair.correlation),
    );
    let pair_est =
        estimate_from_pair(&p0, &p180, &config.pair).context("pair registration failed")?;

    let tilt_est = if config.tilt.enabled {
        note(
            out.verbose,
            &format!("fitting tilt over {} bands", config.tilt.bands),
        );
        match estimate_tilt(&p0, &p180, &config.tilt) {
            Ok(t) => Some(t),
            Err(e) => {
                eprintln!("warning: tilt estimate skipped: {e}");
                None
            }
        }
    } else {
        None
    };

    let method = match config.pair.correlation {
        CorrelationKind::Phase => Method::PairPhase,
        CorrelationKind::Cross => Method::PairCross,
    };
    let mut entries = vec![pair_entry(method, &pair_est)];
    if let Some(t) = &tilt_est {
        entries.push(tilt_entry(t));
    }
    let best = select_best(&entries).context("no estimate produced")?;

    let report = AxisReport {
        tool: "tomo-axis".into(),
        version: env!("CARGO_PKG_VERSION").into(),
        mode: "pair".into(),
        inputs: ReportInputs {
            projection_0: Some(args.proj0.clone()),
            projection_180: Some(args.proj180.clone()),
            sinogram: None,
            flat: config.preprocess.flat.clone(),
            dark: config.preprocess.dark.clone(),
        },
        detector: detector_info(&p0),
        selected: entries[best].clone(),
        estimates: entries,
    };

    print_summary(&report);
    println!("  drift      : {:+.2} px vertical", pair_est.drift_px);
    if pair_est.drift_warning {
        println!(
            "  warning    : vertical drift exceeds {:.1} px, check stage stability",
            config.pair.drift_warn_px
        );
    }

    if let Some(path) = out.report.as_deref() {
        write_report(path, &report, out.verbose)?;
    }
    if let Some(path) = out.curve.as_deref() {
        let img = tomo_render::curve::plot_curve(
            &pair_est.correlation_row,
            None,
            Some(pair_est.shift_px),
            CURVE_WIDTH,
            CURVE_HEIGHT,
        )
        .context("rendering correlation curve")?;
        tomo_render::save_png(path, &img)?;
        note(out.verbose, &format!("wrote correlation curve '{path}'"));
    }
    if let Some(path) = args.overlay.as_deref() {
        let img = tomo_render::overlay::pair_overlay(
            &p0,
            &p180,
            pair_est.shift_px,
            pair_est.axis_px,
        )
        .context("rendering alignment overlay")?;
        tomo_render::save_png(path, &img)?;
        note(out.verbose, &format!("wrote alignment overlay '{path}'"));
    }
    if let Some(path) = args.dump_correlation.as_deref() {
        let surface = correlation_surface(&p0, &p180, config.pair.correlation)?;
        tomo_io::save_npy(path, &surface)?;
        note(out.verbose, &format!("wrote correlation surface '{path}'"));
    }

    Ok(())
}

pub fn run_sinogram(args: &SinogramArgs) -> Result<()> {
    let out = &args.output;
    let config = load_config(out)?;
    config.validate().context("invalid configuration")?;

    let raw = load(&args.sinogram, "sinogram", out.verbose)?;

    // Frame-oriented stages do not apply to a sinogram: rows are
    // angles, so cropping or binning would desynchronize the angle
    // list, and flat/dark frames have no matching geometry.
    let pp = &config.preprocess;
    if pp.roi.is_some() || pp.binning > 1 || pp.flat.is_some() || pp.dark.is_some() {
        eprintln!("warning: roi/binning/flat/dark settings are ignored in sinogram mode");
    }
    let reduced = PreprocessConfig {
        smooth_sigma: pp.smooth_sigma,
        neg_log: pp.neg_log,
        ..PreprocessConfig::default()
    };
    let (sino, info) = prepare(&raw, None, None, &reduced).context("preprocessing sinogram")?;
    note(
        out.verbose,
        &format!(
            "prepared sinogram {} rows x {} px ({} non-finite samples replaced)",
            info.rows, info.cols, info.sanitized
        ),
    );

    let angle_list = angles::resolve(args.angles, args.angles_file.as_deref(), sino.nrows())?;
    note(
        out.verbose,
        &format!("fitting centroids over {} angles", angle_list.len()),
    );
    let est = estimate_from_sinogram(&sino, &angle_list, &config.sinogram)
        .context("sinogram centroid fit failed")?;

    let entries = vec![sinogram_entry(&est)];
    let best = select_best(&entries).context("no estimate produced")?;

    let report = AxisReport {
        tool: "tomo-axis".into(),
        version: env!("CARGO_PKG_VERSION").into(),
        mode: "sinogram".into(),
        inputs: ReportInputs {
            projection_0: None,
            projection_180: None,
            sinogram: Some(args.sinogram.clone()),
            flat: None,
            dark: None,
        },
        detector: detector_info(&sino),
        selected: entries[best].clone(),
        estimates: entries,
    };

    print_summary(&report);
    println!("  rows used  : {} of {}", est.rows_used, sino.nrows());
    println!(
        "  amplitude  : {:.2} px (phase {:+.1}°)",
        est.amplitude_px, est.phase_deg
    );

    if let Some(path) = out.report.as_deref() {
        write_report(path, &report, out.verbose)?;
    }
    if let Some(path) = out.curve.as_deref() {
        let img = tomo_render::curve::plot_curve(
            &est.centroids,
            Some(&est.fitted),
            None,
            CURVE_WIDTH,
            CURVE_HEIGHT,
        )
        .context("rendering centroid curve")?;
        tomo_render::save_png(path, &img)?;
        note(out.verbose, &format!("wrote centroid curve '{path}'"));
    }

    Ok(())
}

fn load_config(out: &OutputArgs) -> Result<JobConfig> {
    let config = crate::cli::load_job_config(out.config.as_deref())
        .context("loading configuration")?;
    if let Some(path) = out.config.as_deref() {
        note(out.verbose, &format!("loaded configuration '{path}'"));
    }
    Ok(config)
}

fn load(path: &str, role: &str, verbose: bool) -> Result<Array2<f64>> {
    let arr = tomo_io::load_array(path).with_context(|| format!("loading {role} '{path}'"))?;
    note(
        verbose,
        &format!("loaded {role} '{path}' ({} x {} px)", arr.ncols(), arr.nrows()),
    );
    Ok(arr)
}

fn note(verbose: bool, msg: &str) {
    if verbose {
        eprintln!("[tomo-axis] {msg}");
    }
}

fn detector_info(frame: &Array2<f64>) -> DetectorInfo {
    DetectorInfo {
        width_px: frame.ncols(),
        height_px: frame.nrows(),
        center_px: (frame.ncols() as f64 - 1.0) / 2.0,
    }
}

fn pair_entry(method: Method, est: &PairEstimate) -> ReportEntry {
    ReportEntry {
        estimate: AxisEstimate {
            method,
            axis_px: est.axis_px,
            offset_px: est.offset_px,
            tilt_deg: None,
            confidence: est.confidence,
        },
        pair: Some(PairDetails {
            shift_px: est.shift_px,
            drift_px: est.drift_px,
            residual_rms: est.residual_rms,
        }),
        tilt: None,
        sinogram: None,
    }
}

fn tilt_entry(est: &TiltEstimate) -> ReportEntry {
    ReportEntry {
        estimate: AxisEstimate {
            method: Method::TiltBands,
            axis_px: est.axis_px,
            offset_px: est.offset_px,
            tilt_deg: Some(est.tilt_deg),
            confidence: est.confidence,
        },
        pair: None,
        tilt: Some(TiltDetails {
            slope_px_per_row: est.slope_px_per_row,
            fit_rms_px: est.fit_rms_px,
            bands: est.bands.len(),
        }),
        sinogram: None,
    }
}

fn sinogram_entry(est: &SinogramEstimate) -> ReportEntry {
    ReportEntry {
        estimate: AxisEstimate {
            method: Method::SinogramCentroid,
            axis_px: est.axis_px,
            offset_px: est.offset_px,
            tilt_deg: None,
            confidence: est.confidence,
        },
        pair: None,
        tilt: None,
        sinogram: Some(SinogramDetails {
            amplitude_px: est.amplitude_px,
            phase_deg: est.phase_deg,
            fit_rms_px: est.fit_rms_px,
            rows_used: est.rows_used,
        }),
    }
}

fn print_summary(report: &AxisReport) {
    let sel = &report.selected.estimate;
    println!("tomo-axis v{} ({} mode)", report.version, report.mode);
    println!(
        "  detector   : {} x {} px (centre {:.2})",
        report.detector.width_px, report.detector.height_px, report.detector.center_px
    );
    println!("  axis       : {:.3} px", sel.axis_px);
    println!("  offset     : {:+.3} px from centre", sel.offset_px);
    if let Some(tilt) = sel.tilt_deg {
        println!("  tilt       : {:+.3}°", tilt);
    }
    println!("  confidence : {:.3}", sel.confidence);
    println!("  method     : {}", sel.method.label());

    if report.estimates.len() > 1 {
        println!("  estimates  :");
        for entry in &report.estimates {
            let e = &entry.estimate;
            println!(
                "    {:<18} axis {:>10.3}  confidence {:.3}",
                e.method.name(),
                e.axis_px,
                e.confidence
            );
        }
    }
}

fn write_report(path: &str, report: &AxisReport, verbose: bool) -> Result<()> {
    let json = serde_json::to_string_pretty(report).context("serializing report")?;
    std::fs::write(path, json + "\n").with_context(|| format!("writing report '{path}'"))?;
    note(verbose, &format!("wrote report '{path}'"));
    Ok(())
}
