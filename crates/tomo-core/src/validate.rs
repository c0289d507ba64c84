//! Input validation shared by the estimators.

use ndarray::Array2;
use tomo_math::filter::mean_std;
use tomo_types::constants::{CONSTANT_STD_EPS, MIN_PROJECTION_DIM};
use tomo_types::error::{AxisError, AxisResult};

/// Reject projections that cannot carry a correlation signal: too
/// small, non-finite, or constant.
pub(crate) fn projection(p: &Array2<f64>, name: &str) -> AxisResult<()> {
    let (rows, cols) = p.dim();
    if rows < MIN_PROJECTION_DIM || cols < MIN_PROJECTION_DIM {
        return Err(AxisError::InvalidInput(format!(
            "{name} is {rows}x{cols}; need at least {MIN_PROJECTION_DIM} px per side"
        )));
    }
    if p.iter().any(|v| !v.is_finite()) {
        return Err(AxisError::InvalidInput(format!(
            "{name} contains non-finite samples; preprocessing sanitizes these"
        )));
    }
    let (_, std) = mean_std(p);
    if std < CONSTANT_STD_EPS {
        return Err(AxisError::InvalidInput(format!(
            "{name} is constant; nothing to correlate"
        )));
    }
    Ok(())
}

/// Validate an opposed pair: both projections individually, then their
/// shape agreement.
pub(crate) fn opposed_pair(p0: &Array2<f64>, p180: &Array2<f64>) -> AxisResult<()> {
    projection(p0, "projection 0°")?;
    projection(p180, "projection 180°")?;
    if p0.dim() != p180.dim() {
        return Err(AxisError::shape(p0.dim(), p180.dim()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_tiny_projection() {
        let p = Array2::from_shape_fn((4, 4), |(i, j)| (i + j) as f64);
        assert!(matches!(
            projection(&p, "test"),
            Err(AxisError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_rejects_constant_projection() {
        let p = Array2::from_elem((32, 32), 5.0);
        let err = projection(&p, "test").unwrap_err();
        assert!(err.to_string().contains("constant"), "got: {err}");
    }

    #[test]
    fn test_rejects_nan() {
        let mut p = Array2::from_shape_fn((16, 16), |(i, j)| (i * j) as f64);
        p[[3, 3]] = f64::NAN;
        assert!(projection(&p, "test").is_err());
    }

    #[test]
    fn test_pair_shape_mismatch() {
        let a = Array2::from_shape_fn((16, 16), |(i, j)| (i * j) as f64);
        let b = Array2::from_shape_fn((16, 20), |(i, j)| (i * j) as f64);
        assert!(matches!(
            opposed_pair(&a, &b),
            Err(AxisError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn test_accepts_good_pair() {
        let a = Array2::from_shape_fn((16, 16), |(i, j)| ((i * j) as f64).sin());
        assert!(opposed_pair(&a, &a).is_ok());
    }
}
