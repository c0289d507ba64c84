//! Angle lists for sinogram mode.
//!
//! Either a uniform end-exclusive grid from `--angles START:END`, or
//! one angle per line from `--angles-file` (blank lines and `#`
//! comments are skipped).

use anyhow::{bail, Context, Result};
use tomo_core::sinogram::angle_grid;

use crate::cli::AngleRange;

/// Angle list for a sinogram with `rows` rows.
pub fn resolve(range: Option<AngleRange>, file: Option<&str>, rows: usize) -> Result<Vec<f64>> {
    match (range, file) {
        (Some(r), None) => Ok(angle_grid(r.start_deg, r.end_deg, rows)),
        (None, Some(path)) => read_angles_file(path),
        // clap's argument group enforces exactly one source.
        _ => bail!("exactly one of --angles or --angles-file is required"),
    }
}

fn read_angles_file(path: &str) -> Result<Vec<f64>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading angles file '{path}'"))?;

    let mut angles = Vec::new();
    for (lineno, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let value: f64 = line
            .parse()
            .with_context(|| format!("{path}:{}: '{line}' is not an angle", lineno + 1))?;
        if !value.is_finite() {
            bail!("{path}:{}: angle must be finite", lineno + 1);
        }
        angles.push(value);
    }
    Ok(angles)
}
