use thiserror::Error;

#[derive(Error, Debug)]
pub enum AxisError {
    #[error(
        "Shape mismatch: expected {expected_rows}x{expected_cols}, \
         got {actual_rows}x{actual_cols}"
    )]
    ShapeMismatch {
        expected_rows: usize,
        expected_cols: usize,
        actual_rows: usize,
        actual_cols: usize,
    },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Numerical degeneracy: {0}")]
    Numerics(String),

    #[error("Cannot decode {path}: {reason}")]
    Decode { path: String, reason: String },

    #[error("Cannot write {path}: {reason}")]
    Encode { path: String, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl AxisError {
    /// Shape-mismatch error from two `(rows, cols)` pairs.
    pub fn shape(expected: (usize, usize), actual: (usize, usize)) -> Self {
        AxisError::ShapeMismatch {
            expected_rows: expected.0,
            expected_cols: expected.1,
            actual_rows: actual.0,
            actual_cols: actual.1,
        }
    }
}

pub type AxisResult<T> = Result<T, AxisError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shape_mismatch_message_carries_dims() {
        let err = AxisError::shape((128, 256), (128, 255));
        let msg = err.to_string();
        assert!(msg.contains("128x256"), "message: {msg}");
        assert!(msg.contains("128x255"), "message: {msg}");
    }

    #[test]
    fn test_io_error_converts() {
        fn fails() -> AxisResult<String> {
            let s = std::fs::read_to_string("/nonexistent/tomo-axis-test")?;
            Ok(s)
        }
        assert!(matches!(fails(), Err(AxisError::Io(_))));
    }
}
