// ─────────────────────────────────────────────────────────────────────
// Tomo-Axis — Diagnostic Rendering
// © 2019–2026 Maria Matveeva <matveeva.maria@gmail.com>
// License: GNU LGPL v3 or later
// ─────────────────────────────────────────────────────────────────────
//! Diagnostic images for visual verification of an axis estimate.
//!
//! Two renderers: a red/cyan overlay of the opposed projections after
//! alignment, and a curve plot for correlation rows and centroid fits.
//! Both return plain `RgbImage` buffers; [`save_png`] writes them out.

use image::RgbImage;
use tomo_types::error::{AxisError, AxisResult};

pub mod curve;
pub mod overlay;
pub mod scale;

/// Write a rendered image to `path` (format chosen by extension).
pub fn save_png(path: &str, img: &RgbImage) -> AxisResult<()> {
    img.save(path).map_err(|e| AxisError::Encode {
        path: path.to_string(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn test_save_png_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.png");
        let img = RgbImage::from_pixel(8, 4, Rgb([10, 20, 30]));
        save_png(path.to_str().unwrap(), &img).unwrap();

        let back = image::open(&path).unwrap().to_rgb8();
        assert_eq!(back.dimensions(), (8, 4));
        assert_eq!(back.get_pixel(3, 2), &Rgb([10, 20, 30]));
    }

    #[test]
    fn test_save_png_bad_directory_is_encode_error() {
        let img = RgbImage::new(2, 2);
        let err = save_png("/nonexistent-dir/out.png", &img).unwrap_err();
        assert!(matches!(err, AxisError::Encode { .. }), "got {err:?}");
    }
}
