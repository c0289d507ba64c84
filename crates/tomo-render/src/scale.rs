//! Robust 8-bit scaling of detector frames.
//!
//! Raw frames carry outliers (dead and hot pixels), so the display
//! window comes from the 1% and 99% percentiles rather than min/max.

use image::GrayImage;
use ndarray::Array2;

/// Display window of an array: the (1%, 99%) percentiles of its
/// finite values. Falls back to (0, 1) when nothing is finite.
pub fn percentile_window(img: &Array2<f64>) -> (f64, f64) {
    let mut values: Vec<f64> = img.iter().cloned().filter(|v| v.is_finite()).collect();
    if values.is_empty() {
        return (0.0, 1.0);
    }
    values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let rank = |q: f64| -> f64 {
        let idx = (q * (values.len() - 1) as f64).round() as usize;
        values[idx]
    };
    (rank(0.01), rank(0.99))
}

/// Map an f64 array to 8-bit grayscale over its percentile window.
pub fn to_gray(img: &Array2<f64>) -> GrayImage {
    let (lo, hi) = percentile_window(img);
    to_gray_window(img, lo, hi)
}

/// Map an f64 array to 8-bit grayscale over an explicit window.
/// Opposed frames share one window so equal intensities match.
pub fn to_gray_window(img: &Array2<f64>, lo: f64, hi: f64) -> GrayImage {
    let (rows, cols) = img.dim();
    let span = if hi > lo { hi - lo } else { 1.0 };

    GrayImage::from_fn(cols as u32, rows as u32, |x, y| {
        let v = img[[y as usize, x as usize]];
        let t = if v.is_finite() {
            ((v - lo) / span).clamp(0.0, 1.0)
        } else {
            0.0
        };
        image::Luma([(t * 255.0).round() as u8])
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ramp_maps_monotone() {
        let img = Array2::from_shape_fn((10, 100), |(_, j)| j as f64);
        let gray = to_gray(&img);
        assert_eq!(gray.dimensions(), (100, 10));
        assert!(gray.get_pixel(0, 0)[0] < gray.get_pixel(50, 0)[0]);
        assert!(gray.get_pixel(50, 0)[0] < gray.get_pixel(99, 0)[0]);
    }

    #[test]
    fn test_hot_pixel_does_not_wash_out_window() {
        let mut img = Array2::from_shape_fn((10, 100), |(_, j)| j as f64);
        img[[5, 50]] = 1e9;
        let (lo, hi) = percentile_window(&img);
        assert!(lo >= 0.0 && lo < 5.0, "lo = {lo}");
        assert!(hi < 100.0, "hi = {hi}");
    }

    #[test]
    fn test_constant_frame_is_uniform() {
        let img = Array2::from_elem((8, 8), 42.0);
        let gray = to_gray(&img);
        let first = gray.get_pixel(0, 0)[0];
        assert!(gray.pixels().all(|p| p[0] == first));
    }

    #[test]
    fn test_non_finite_values_render_black() {
        let mut img = Array2::from_shape_fn((8, 8), |(i, j)| (i + j) as f64 + 1.0);
        img[[3, 3]] = f64::NAN;
        let gray = to_gray(&img);
        assert_eq!(gray.get_pixel(3, 3)[0], 0);
    }
}
