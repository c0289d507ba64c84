// ─────────────────────────────────────────────────────────────────────
// Tomo-Axis — Least-Squares Fits
// © 2019–2026 Maria Matveeva <matveeva.maria@gmail.com>
// License: GNU LGPL v3 or later
// ─────────────────────────────────────────────────────────────────────
//! Small closed-form least-squares fits.
//!
//! Weighted straight line for the tilt estimate, offset-plus-sinusoid
//! for the sinogram centroid track, and the three-point parabola used
//! for sub-pixel peak refinement.

use tomo_types::error::{AxisError, AxisResult};

/// Straight line y = slope*x + intercept from a weighted fit.
#[derive(Debug, Clone, Copy)]
pub struct LineFit {
    pub slope: f64,
    pub intercept: f64,
    /// Weighted RMS residual of the fit.
    pub rms: f64,
}

/// Sinusoid c(θ) = offset + a·cos θ + b·sin θ from a weighted fit.
#[derive(Debug, Clone, Copy)]
pub struct SineFit {
    pub offset: f64,
    pub a_cos: f64,
    pub b_sin: f64,
    /// Weighted RMS residual of the fit.
    pub rms: f64,
    /// Weighted coefficient of determination, clamped to [0, 1].
    pub r_squared: f64,
}

impl SineFit {
    /// Peak-to-center amplitude sqrt(a² + b²).
    pub fn amplitude(&self) -> f64 {
        (self.a_cos * self.a_cos + self.b_sin * self.b_sin).sqrt()
    }

    /// Phase of the sinusoid in degrees, in (-180, 180].
    pub fn phase_deg(&self) -> f64 {
        self.b_sin.atan2(self.a_cos).to_degrees()
    }
}

/// Sub-pixel vertex offset of the parabola through three equidistant
/// samples (left, center, right), relative to the center sample.
///
/// The offset is clamped to [-1, 1]; a flat triple maps to 0.
pub fn parabolic_vertex(left: f64, center: f64, right: f64) -> f64 {
    let denom = left - 2.0 * center + right;
    if denom.abs() < 1e-12 {
        return 0.0;
    }
    (0.5 * (left - right) / denom).clamp(-1.0, 1.0)
}

/// Weighted least-squares line through (x[i], y[i]) with weights w[i].
///
/// Fails when the weights vanish or the abscissae carry no spread.
pub fn fit_line_weighted(x: &[f64], y: &[f64], w: &[f64]) -> AxisResult<LineFit> {
    assert_eq!(x.len(), y.len(), "line fit inputs must share a length");
    assert_eq!(x.len(), w.len(), "line fit weights must share a length");

    let mut sw = 0.0;
    let mut sx = 0.0;
    let mut sy = 0.0;
    for i in 0..x.len() {
        sw += w[i];
        sx += w[i] * x[i];
        sy += w[i] * y[i];
    }
    if sw <= 0.0 {
        return Err(AxisError::Numerics(
            "line fit has no positive weight".into(),
        ));
    }

    // Centered accumulation keeps the normal equations well-conditioned.
    let xbar = sx / sw;
    let ybar = sy / sw;
    let mut sxx = 0.0;
    let mut sxy = 0.0;
    for i in 0..x.len() {
        let dx = x[i] - xbar;
        sxx += w[i] * dx * dx;
        sxy += w[i] * dx * (y[i] - ybar);
    }
    if sxx <= 1e-12 {
        return Err(AxisError::Numerics(
            "line fit abscissae are degenerate".into(),
        ));
    }

    let slope = sxy / sxx;
    let intercept = ybar - slope * xbar;

    let mut ss_res = 0.0;
    for i in 0..x.len() {
        let r = y[i] - (slope * x[i] + intercept);
        ss_res += w[i] * r * r;
    }
    let rms = (ss_res / sw).sqrt();

    Ok(LineFit {
        slope,
        intercept,
        rms,
    })
}

/// Weighted fit of c(θ) = offset + a·cos θ + b·sin θ via 3x3 normal
/// equations. Angles are in radians.
pub fn fit_centroid_sine(theta: &[f64], values: &[f64], w: &[f64]) -> AxisResult<SineFit> {
    assert_eq!(theta.len(), values.len(), "sine fit inputs must share a length");
    assert_eq!(theta.len(), w.len(), "sine fit weights must share a length");
    if theta.len() < 3 {
        return Err(AxisError::Numerics(format!(
            "sine fit needs at least 3 samples, got {}",
            theta.len()
        )));
    }

    let mut m = [[0.0_f64; 3]; 3];
    let mut rhs = [0.0_f64; 3];
    let mut sw = 0.0;
    let mut sy = 0.0;
    for i in 0..theta.len() {
        let phi = [1.0, theta[i].cos(), theta[i].sin()];
        for r in 0..3 {
            for c in 0..3 {
                m[r][c] += w[i] * phi[r] * phi[c];
            }
            rhs[r] += w[i] * phi[r] * values[i];
        }
        sw += w[i];
        sy += w[i] * values[i];
    }
    if sw <= 0.0 {
        return Err(AxisError::Numerics(
            "sine fit has no positive weight".into(),
        ));
    }

    let [offset, a_cos, b_sin] = solve3(m, rhs)?;

    let ybar = sy / sw;
    let mut ss_res = 0.0;
    let mut ss_tot = 0.0;
    for i in 0..theta.len() {
        let model = offset + a_cos * theta[i].cos() + b_sin * theta[i].sin();
        let r = values[i] - model;
        let d = values[i] - ybar;
        ss_res += w[i] * r * r;
        ss_tot += w[i] * d * d;
    }
    let rms = (ss_res / sw).sqrt();
    // A constant track is fitted exactly by the offset term.
    let r_squared = if ss_tot <= 1e-18 {
        1.0
    } else {
        (1.0 - ss_res / ss_tot).clamp(0.0, 1.0)
    };

    Ok(SineFit {
        offset,
        a_cos,
        b_sin,
        rms,
        r_squared,
    })
}

/// Solve a 3x3 system by Gaussian elimination with partial pivoting.
pub fn solve3(m: [[f64; 3]; 3], rhs: [f64; 3]) -> AxisResult<[f64; 3]> {
    let mut a = m;
    let mut b = rhs;

    let mut scale = 0.0_f64;
    for row in &a {
        for &v in row {
            scale = scale.max(v.abs());
        }
    }
    let tol = scale.max(1.0) * 1e-12;

    for k in 0..3 {
        // Pivot on the largest remaining entry in column k.
        let mut pivot = k;
        for r in (k + 1)..3 {
            if a[r][k].abs() > a[pivot][k].abs() {
                pivot = r;
            }
        }
        if a[pivot][k].abs() < tol {
            return Err(AxisError::Numerics(
                "singular normal equations in 3x3 solve".into(),
            ));
        }
        if pivot != k {
            a.swap(k, pivot);
            b.swap(k, pivot);
        }

        for r in (k + 1)..3 {
            let f = a[r][k] / a[k][k];
            for c in k..3 {
                a[r][c] -= f * a[k][c];
            }
            b[r] -= f * b[k];
        }
    }

    let mut x = [0.0_f64; 3];
    for k in (0..3).rev() {
        let mut sum = b[k];
        for c in (k + 1)..3 {
            sum -= a[k][c] * x[c];
        }
        x[k] = sum / a[k][k];
    }
    Ok(x)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn test_parabolic_vertex_symmetric() {
        assert_eq!(parabolic_vertex(1.0, 2.0, 1.0), 0.0);
    }

    #[test]
    fn test_parabolic_vertex_known_shift() {
        // y = -(x - 0.25)^2 sampled at -1, 0, 1.
        let f = |x: f64| -(x - 0.25) * (x - 0.25);
        let d = parabolic_vertex(f(-1.0), f(0.0), f(1.0));
        assert!((d - 0.25).abs() < 1e-12, "vertex offset {d} vs 0.25");
    }

    #[test]
    fn test_parabolic_vertex_flat() {
        assert_eq!(parabolic_vertex(2.0, 2.0, 2.0), 0.0);
    }

    #[test]
    fn test_line_fit_exact() {
        let x: Vec<f64> = (0..12).map(|i| i as f64).collect();
        let y: Vec<f64> = x.iter().map(|&v| 0.4 * v - 3.0).collect();
        let w = vec![1.0; x.len()];
        let fit = fit_line_weighted(&x, &y, &w).unwrap();
        assert!((fit.slope - 0.4).abs() < 1e-12, "slope {}", fit.slope);
        assert!(
            (fit.intercept + 3.0).abs() < 1e-12,
            "intercept {}",
            fit.intercept
        );
        assert!(fit.rms < 1e-12, "rms {}", fit.rms);
    }

    #[test]
    fn test_line_fit_weight_pulls_slope() {
        // Three points, the heavy pair defines the line.
        let x = [0.0, 1.0, 2.0];
        let y = [0.0, 1.0, 10.0];
        let heavy = fit_line_weighted(&x, &y, &[10.0, 10.0, 0.01]).unwrap();
        let even = fit_line_weighted(&x, &y, &[1.0, 1.0, 1.0]).unwrap();
        assert!(heavy.slope < even.slope, "{} vs {}", heavy.slope, even.slope);
        assert!((heavy.slope - 1.0).abs() < 0.1, "heavy slope {}", heavy.slope);
    }

    #[test]
    fn test_line_fit_degenerate_x() {
        let x = [2.0, 2.0, 2.0];
        let y = [1.0, 2.0, 3.0];
        let w = [1.0, 1.0, 1.0];
        assert!(matches!(
            fit_line_weighted(&x, &y, &w),
            Err(AxisError::Numerics(_))
        ));
    }

    #[test]
    fn test_sine_fit_exact() {
        let n = 24;
        let theta: Vec<f64> = (0..n).map(|i| PI * i as f64 / n as f64).collect();
        let values: Vec<f64> = theta
            .iter()
            .map(|&t| 63.5 + 4.0 * t.cos() - 2.5 * t.sin())
            .collect();
        let w = vec![1.0; n];
        let fit = fit_centroid_sine(&theta, &values, &w).unwrap();
        assert!((fit.offset - 63.5).abs() < 1e-9, "offset {}", fit.offset);
        assert!((fit.a_cos - 4.0).abs() < 1e-9, "a_cos {}", fit.a_cos);
        assert!((fit.b_sin + 2.5).abs() < 1e-9, "b_sin {}", fit.b_sin);
        assert!(fit.r_squared > 0.999, "r² {}", fit.r_squared);
        let amp = fit.amplitude();
        let expected = (4.0_f64 * 4.0 + 2.5 * 2.5).sqrt();
        assert!((amp - expected).abs() < 1e-9, "amplitude {amp}");
    }

    #[test]
    fn test_sine_fit_constant_track() {
        let theta: Vec<f64> = (0..8).map(|i| PI * i as f64 / 8.0).collect();
        let values = vec![10.0; 8];
        let w = vec![1.0; 8];
        let fit = fit_centroid_sine(&theta, &values, &w).unwrap();
        assert!((fit.offset - 10.0).abs() < 1e-9);
        assert!(fit.amplitude() < 1e-9, "amplitude {}", fit.amplitude());
        assert!((fit.r_squared - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_sine_fit_rejects_degenerate_angles() {
        let theta = [0.7, 0.7, 0.7, 0.7];
        let values = [1.0, 2.0, 3.0, 4.0];
        let w = [1.0; 4];
        assert!(matches!(
            fit_centroid_sine(&theta, &values, &w),
            Err(AxisError::Numerics(_))
        ));
    }

    #[test]
    fn test_solve3_identity() {
        let m = [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]];
        let x = solve3(m, [3.0, -1.0, 2.0]).unwrap();
        assert!((x[0] - 3.0).abs() < 1e-12);
        assert!((x[1] + 1.0).abs() < 1e-12);
        assert!((x[2] - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_solve3_needs_pivoting() {
        // Zero on the leading diagonal forces a row swap.
        let m = [[0.0, 1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 2.0]];
        let x = solve3(m, [5.0, 7.0, 4.0]).unwrap();
        assert!((x[0] - 7.0).abs() < 1e-12);
        assert!((x[1] - 5.0).abs() < 1e-12);
        assert!((x[2] - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_solve3_singular() {
        let m = [[1.0, 2.0, 3.0], [2.0, 4.0, 6.0], [1.0, 1.0, 1.0]];
        assert!(solve3(m, [1.0, 2.0, 3.0]).is_err());
    }
}
