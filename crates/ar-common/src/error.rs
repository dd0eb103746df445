//! Error types for the aggregation engine.

use thiserror::Error;

use crate::Rect;

/// Result type alias using ArError.
pub type ArResult<T> = Result<T, ArError>;

/// Primary error type for aggregation, transfer and contouring.
#[derive(Debug, Error)]
pub enum ArError {
    /// A write landed outside a grid's declared rectangle. This is a
    /// programming error; the run that hit it is abandoned.
    #[error("cell ({x}, {y}) is outside grid bounds {bounds}")]
    OutOfBounds { x: i32, y: i32, bounds: Rect },

    #[error("view transform is not invertible (determinant {determinant})")]
    NonInvertibleTransform { determinant: f64 },

    /// A leaf task panicked; partial results were discarded.
    #[error("aggregation task failed: {0}")]
    TaskFailed(String),

    #[error("Invalid parameter value for '{param}': {message}")]
    InvalidParameter { param: String, message: String },

    #[error("configuration error: {0}")]
    ConfigError(String),
}

impl ArError {
    /// Create an OutOfBounds error.
    pub fn out_of_bounds(x: i32, y: i32, bounds: Rect) -> Self {
        Self::OutOfBounds { x, y, bounds }
    }

    /// Create an InvalidParameter error.
    pub fn invalid_parameter(param: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            param: param.into(),
            message: message.into(),
        }
    }

    /// Build a TaskFailed error from a caught panic payload.
    pub fn from_panic(payload: Box<dyn std::any::Any + Send>) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "task panicked".to_string()
        };
        Self::TaskFailed(message)
    }
}
