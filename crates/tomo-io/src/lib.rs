// ─────────────────────────────────────────────────────────────────────
// Tomo-Axis — Frame IO
// © 2019–2026 Maria Matveeva <matveeva.maria@gmail.com>
// License: GNU LGPL v3 or later
// ─────────────────────────────────────────────────────────────────────
//! Detector frame and sinogram loading.
//!
//! `.npy` arrays load natively through ndarray-npy; the expected dtype
//! is f64, with fallbacks for f32 and the u16/u8 frames raw detectors
//! produce. TIFF and PNG images decode through the image crate with
//! grayscale values kept in their natural ranges.

use image::DynamicImage;
use ndarray::Array2;
use ndarray_npy::{ReadNpyExt, WriteNpyExt};
use std::fs::File;
use std::io::{BufWriter, Cursor};
use std::path::Path;
use tomo_types::error::{AxisError, AxisResult};

/// Load a 2-D array from `.npy`, `.tif`/`.tiff` or `.png`.
///
/// The extension selects the decoder; anything else is rejected rather
/// than sniffed.
pub fn load_array(path: &str) -> AxisResult<Array2<f64>> {
    let ext = Path::new(path)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "npy" => load_npy(path),
        "tif" | "tiff" | "png" => load_image(path),
        other => Err(AxisError::Decode {
            path: path.to_string(),
            reason: format!(
                "unsupported extension '{other}' (expected .npy, .tif, .tiff or .png)"
            ),
        }),
    }
}

/// Write a 2-D f64 array as `.npy`.
pub fn save_npy(path: &str, array: &Array2<f64>) -> AxisResult<()> {
    let file = File::create(path)?;
    array
        .write_npy(BufWriter::new(file))
        .map_err(|e| AxisError::Encode {
            path: path.to_string(),
            reason: e.to_string(),
        })
}

fn load_npy(path: &str) -> AxisResult<Array2<f64>> {
    let bytes = std::fs::read(path)?;

    let first_err = match Array2::<f64>::read_npy(Cursor::new(&bytes)) {
        Ok(a) => return Ok(a),
        Err(e) => e,
    };
    if let Ok(a) = Array2::<f32>::read_npy(Cursor::new(&bytes)) {
        return Ok(a.mapv(f64::from));
    }
    if let Ok(a) = Array2::<u16>::read_npy(Cursor::new(&bytes)) {
        return Ok(a.mapv(f64::from));
    }
    if let Ok(a) = Array2::<u8>::read_npy(Cursor::new(&bytes)) {
        return Ok(a.mapv(f64::from));
    }

    Err(AxisError::Decode {
        path: path.to_string(),
        reason: format!("not a 2-D f64/f32/u16/u8 .npy array ({first_err})"),
    })
}

fn load_image(path: &str) -> AxisResult<Array2<f64>> {
    let img = image::open(path).map_err(|e| AxisError::Decode {
        path: path.to_string(),
        reason: e.to_string(),
    })?;
    let (width, height) = (img.width() as usize, img.height() as usize);

    let data: Vec<f64> = match img {
        DynamicImage::ImageLuma8(buf) => buf.into_raw().into_iter().map(f64::from).collect(),
        DynamicImage::ImageLuma16(buf) => buf.into_raw().into_iter().map(f64::from).collect(),
        // Color and float variants reduce to 32-bit luma first.
        other => other
            .to_luma32f()
            .into_raw()
            .into_iter()
            .map(f64::from)
            .collect(),
    };

    Array2::from_shape_vec((height, width), data).map_err(|e| AxisError::Decode {
        path: path.to_string(),
        reason: format!("image buffer reshape: {e}"),
    })
}
