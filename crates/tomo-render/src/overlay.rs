// ─────────────────────────────────────────────────────────────────────
// Tomo-Axis — Alignment Overlay
// © 2019–2026 Maria Matveeva <matveeva.maria@gmail.com>
// License: GNU LGPL v3 or later
// ─────────────────────────────────────────────────────────────────────
//! Red/cyan fusion of an opposed projection pair.
//!
//! The 0° frame fills the red channel, the mirrored and shift-aligned
//! 180° frame fills green and blue. A correct axis estimate turns the
//! overlap gray; residual misalignment shows as colored fringes. The
//! estimated axis column is drawn as a vertical line.

use image::{Rgb, RgbImage};
use imageproc::drawing::draw_line_segment_mut;
use ndarray::Array2;
use tomo_math::resample::{flip_horizontal, shift_horizontal};
use tomo_types::error::{AxisError, AxisResult};

use crate::scale::{percentile_window, to_gray_window};

const AXIS_COLOR: Rgb<u8> = Rgb([255, 255, 0]);

/// Render the alignment overlay for an opposed pair.
///
/// `shift_px` is the measured horizontal lag between the 0° frame and
/// the mirrored 180° frame; `axis_px` is the estimated axis column.
pub fn pair_overlay(
    p0: &Array2<f64>,
    p180: &Array2<f64>,
    shift_px: f64,
    axis_px: f64,
) -> AxisResult<RgbImage> {
    if p0.dim() != p180.dim() {
        return Err(AxisError::shape(p0.dim(), p180.dim()));
    }
    let (rows, cols) = p0.dim();
    if rows == 0 || cols == 0 {
        return Err(AxisError::InvalidInput(
            "cannot render an overlay for an empty frame".into(),
        ));
    }

    let aligned = shift_horizontal(&flip_horizontal(p180), -shift_px);

    // One display window for both frames so matched intensities fuse
    // to gray.
    let (lo, hi) = percentile_window(p0);
    let gray0 = to_gray_window(p0, lo, hi);
    let gray180 = to_gray_window(&aligned, lo, hi);

    let mut img = RgbImage::from_fn(cols as u32, rows as u32, |x, y| {
        let r = gray0.get_pixel(x, y)[0];
        let gb = gray180.get_pixel(x, y)[0];
        Rgb([r, gb, gb])
    });

    draw_line_segment_mut(
        &mut img,
        (axis_px as f32, 0.0),
        (axis_px as f32, (rows - 1) as f32),
        AXIS_COLOR,
    );
    Ok(img)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn textured(rows: usize, cols: usize) -> Array2<f64> {
        Array2::from_shape_fn((rows, cols), |(i, j)| {
            (0.19 * j as f64).sin() + (0.23 * i as f64).cos() + 2.0
        })
    }

    #[test]
    fn test_perfect_alignment_fuses_gray() {
        let p0 = textured(32, 48);
        let p180 = flip_horizontal(&p0);

        // Mirror about the frame centre: lag 0, axis at (48-1)/2.
        let img = pair_overlay(&p0, &p180, 0.0, 23.5).unwrap();
        assert_eq!(img.dimensions(), (48, 32));

        let px = img.get_pixel(10, 16);
        assert_eq!(px[0], px[1]);
        assert_eq!(px[1], px[2]);
    }

    #[test]
    fn test_axis_line_is_drawn() {
        let p0 = textured(32, 48);
        let p180 = flip_horizontal(&p0);
        let img = pair_overlay(&p0, &p180, 0.0, 30.0).unwrap();

        let on_line = (0..32).filter(|&y| *img.get_pixel(30, y) == AXIS_COLOR).count();
        assert!(on_line > 16, "axis line covers {on_line} of 32 rows");
    }

    #[test]
    fn test_shape_mismatch_rejected() {
        let p0 = textured(32, 48);
        let p180 = textured(32, 47);
        let err = pair_overlay(&p0, &p180, 0.0, 20.0).unwrap_err();
        assert!(matches!(err, AxisError::ShapeMismatch { .. }));
    }

    #[test]
    fn test_misalignment_leaves_fringes() {
        let p0 = textured(32, 48);
        let p180 = flip_horizontal(&p0);

        // Wrong shift: interior pixels should no longer fuse to gray.
        let img = pair_overlay(&p0, &p180, 6.0, 23.5).unwrap();
        let fringed = (8..40u32)
            .filter(|&x| {
                let px = img.get_pixel(x, 16);
                px[0] != px[1]
            })
            .count();
        assert!(fringed > 8, "only {fringed} fringed pixels");
    }
}
