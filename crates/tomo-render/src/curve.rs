// ─────────────────────────────────────────────────────────────────────
// Tomo-Axis — Curve Plot
// © 2019–2026 Maria Matveeva <matveeva.maria@gmail.com>
// License: GNU LGPL v3 or later
// ─────────────────────────────────────────────────────────────────────
//! Minimal polyline plot on a dark background.
//!
//! Renders one measured series, an optional fitted series and an
//! optional vertical marker at the estimate. Used for the correlation
//! row in pair mode and the centroid-vs-angle fit in sinogram mode.

use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_hollow_rect_mut, draw_line_segment_mut};
use imageproc::rect::Rect;
use tomo_types::error::{AxisError, AxisResult};

const BACKGROUND: Rgb<u8> = Rgb([12, 12, 12]);
const FRAME: Rgb<u8> = Rgb([110, 110, 110]);
const SERIES: Rgb<u8> = Rgb([235, 235, 235]);
const FITTED: Rgb<u8> = Rgb([255, 170, 0]);
const MARKER: Rgb<u8> = Rgb([255, 60, 60]);

const MARGIN: u32 = 32;

/// Plot `series` (and optionally `fitted`) as polylines.
///
/// `marker_x` draws a vertical line at that data coordinate. The data
/// window covers both series; non-finite points break the polyline.
pub fn plot_curve(
    series: &[(f64, f64)],
    fitted: Option<&[(f64, f64)]>,
    marker_x: Option<f64>,
    width: u32,
    height: u32,
) -> AxisResult<RgbImage> {
    if series.is_empty() {
        return Err(AxisError::InvalidInput("cannot plot an empty series".into()));
    }
    if width < 2 * MARGIN + 16 || height < 2 * MARGIN + 16 {
        return Err(AxisError::InvalidInput(format!(
            "plot size {width}x{height} is below the minimum {0}x{0}",
            2 * MARGIN + 16
        )));
    }

    let mut img = RgbImage::from_pixel(width, height, BACKGROUND);

    let window = DataWindow::over(series, fitted, marker_x)?;
    let map = PixelMap {
        window,
        width,
        height,
    };

    draw_hollow_rect_mut(
        &mut img,
        Rect::at((MARGIN - 1) as i32, (MARGIN - 1) as i32)
            .of_size(width - 2 * MARGIN + 2, height - 2 * MARGIN + 2),
        FRAME,
    );

    if let Some(x) = marker_x {
        if x.is_finite() {
            let px = map.x(x);
            draw_line_segment_mut(
                &mut img,
                (px, MARGIN as f32),
                (px, (height - MARGIN) as f32),
                MARKER,
            );
        }
    }
    if let Some(fit) = fitted {
        polyline(&mut img, fit, &map, FITTED);
    }
    polyline(&mut img, series, &map, SERIES);

    Ok(img)
}

struct DataWindow {
    x_min: f64,
    x_max: f64,
    y_min: f64,
    y_max: f64,
}

impl DataWindow {
    fn over(
        series: &[(f64, f64)],
        fitted: Option<&[(f64, f64)]>,
        marker_x: Option<f64>,
    ) -> AxisResult<Self> {
        let mut x_min = f64::INFINITY;
        let mut x_max = f64::NEG_INFINITY;
        let mut y_min = f64::INFINITY;
        let mut y_max = f64::NEG_INFINITY;

        let points = series
            .iter()
            .chain(fitted.into_iter().flatten())
            .filter(|(x, y)| x.is_finite() && y.is_finite());
        for &(x, y) in points {
            x_min = x_min.min(x);
            x_max = x_max.max(x);
            y_min = y_min.min(y);
            y_max = y_max.max(y);
        }
        if let Some(x) = marker_x.filter(|x| x.is_finite()) {
            x_min = x_min.min(x);
            x_max = x_max.max(x);
        }
        if !x_min.is_finite() || !y_min.is_finite() {
            return Err(AxisError::InvalidInput(
                "series contains no finite points".into(),
            ));
        }

        // Pad so extreme points do not sit on the frame. Degenerate
        // spans widen to a unit window.
        let x_pad = 0.02 * (x_max - x_min);
        let y_pad = 0.05 * (y_max - y_min);
        let (x_min, x_max) = if x_max > x_min {
            (x_min - x_pad, x_max + x_pad)
        } else {
            (x_min - 0.5, x_max + 0.5)
        };
        let (y_min, y_max) = if y_max > y_min {
            (y_min - y_pad, y_max + y_pad)
        } else {
            (y_min - 0.5, y_max + 0.5)
        };
        Ok(DataWindow {
            x_min,
            x_max,
            y_min,
            y_max,
        })
    }
}

struct PixelMap {
    window: DataWindow,
    width: u32,
    height: u32,
}

impl PixelMap {
    fn x(&self, x: f64) -> f32 {
        let t = (x - self.window.x_min) / (self.window.x_max - self.window.x_min);
        (MARGIN as f64 + t * (self.width - 2 * MARGIN) as f64) as f32
    }

    fn y(&self, y: f64) -> f32 {
        let t = (y - self.window.y_min) / (self.window.y_max - self.window.y_min);
        ((self.height - MARGIN) as f64 - t * (self.height - 2 * MARGIN) as f64) as f32
    }
}

fn polyline(img: &mut RgbImage, points: &[(f64, f64)], map: &PixelMap, color: Rgb<u8>) {
    for pair in points.windows(2) {
        let (x0, y0) = pair[0];
        let (x1, y1) = pair[1];
        if !(x0.is_finite() && y0.is_finite() && x1.is_finite() && y1.is_finite()) {
            continue;
        }
        draw_line_segment_mut(
            img,
            (map.x(x0), map.y(y0)),
            (map.x(x1), map.y(y1)),
            color,
        );
    }
}
