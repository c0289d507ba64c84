//! Horizontal mirror and sub-pixel shift.
//!
//! Both operate along the detector column axis only; the estimators
//! never move samples between rows.

use ndarray::Array2;

/// Mirror an image about its vertical center line.
pub fn flip_horizontal(input: &Array2<f64>) -> Array2<f64> {
    let (nrows, ncols) = input.dim();
    Array2::from_shape_fn((nrows, ncols), |(i, j)| input[[i, ncols - 1 - j]])
}

/// Resample an image shifted along columns: out(x) = in(x + shift),
/// with linear interpolation and zero fill outside the frame.
pub fn shift_horizontal(input: &Array2<f64>, shift: f64) -> Array2<f64> {
    let (nrows, ncols) = input.dim();
    Array2::from_shape_fn((nrows, ncols), |(i, j)| {
        let pos = j as f64 + shift;
        let base = pos.floor();
        let frac = pos - base;
        let j0 = base as isize;
        let j1 = j0 + 1;
        let v0 = if j0 >= 0 && (j0 as usize) < ncols {
            input[[i, j0 as usize]]
        } else {
            0.0
        };
        let v1 = if j1 >= 0 && (j1 as usize) < ncols {
            input[[i, j1 as usize]]
        } else {
            0.0
        };
        (1.0 - frac) * v0 + frac * v1
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flip_is_involution() {
        let input = Array2::from_shape_fn((5, 8), |(i, j)| (i * 8 + j) as f64);
        let twice = flip_horizontal(&flip_horizontal(&input));
        assert_eq!(twice, input);
    }

    #[test]
    fn test_flip_mirrors_columns() {
        let input = Array2::from_shape_vec((1, 4), vec![1.0, 2.0, 3.0, 4.0]).unwrap();
        let flipped = flip_horizontal(&input);
        assert_eq!(flipped[[0, 0]], 4.0);
        assert_eq!(flipped[[0, 3]], 1.0);
    }

    #[test]
    fn test_integer_shift_moves_bump() {
        let mut input = Array2::zeros((2, 10));
        input[[0, 6]] = 1.0;
        input[[1, 6]] = 2.0;
        // out(x) = in(x + 2): the bump moves from column 6 to column 4.
        let out = shift_horizontal(&input, 2.0);
        assert_eq!(out[[0, 4]], 1.0);
        assert_eq!(out[[1, 4]], 2.0);
        assert_eq!(out[[0, 6]], 0.0);
    }

    #[test]
    fn test_half_pixel_shift_interpolates() {
        let input = Array2::from_shape_vec((1, 4), vec![0.0, 2.0, 4.0, 6.0]).unwrap();
        let out = shift_horizontal(&input, 0.5);
        assert!((out[[0, 0]] - 1.0).abs() < 1e-12, "got {}", out[[0, 0]]);
        assert!((out[[0, 1]] - 3.0).abs() < 1e-12, "got {}", out[[0, 1]]);
    }

    #[test]
    fn test_shift_fills_zero_outside() {
        let input = Array2::from_elem((1, 4), 5.0);
        let out = shift_horizontal(&input, -1.0);
        assert_eq!(out[[0, 0]], 0.0, "left edge must be zero filled");
        assert_eq!(out[[0, 1]], 5.0);
        let out = shift_horizontal(&input, 1.0);
        assert_eq!(out[[0, 3]], 0.0, "right edge must be zero filled");
    }
}
