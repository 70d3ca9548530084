//! Error types for the pixelart-vectorize library

use thiserror::Error;

/// Main error type for vectorization operations
#[derive(Error, Debug)]
pub enum VectorizeError {
    #[error("invalid input: {message}")]
    InvalidInput { message: String },

    #[error("structural invariant violated: {message}")]
    StructuralInvariant { message: String },

    #[error("closed B-spline wrap invariant violated: {message}")]
    SplineInvariant { message: String },

    #[error(
        "B-spline degree mismatch: expected degree {expected}, got {actual} (knots={knots}, points={points})"
    )]
    DegreeMismatch {
        expected: usize,
        actual: usize,
        knots: usize,
        points: usize,
    },

    #[error("out of bounds access at ({x}, {y}) for a {width}x{height} image")]
    OutOfBounds {
        x: i64,
        y: i64,
        width: u32,
        height: u32,
    },
}

impl VectorizeError {
    /// Create a new invalid-input error
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// Create a new structural-invariant error
    pub fn structural_invariant(message: impl Into<String>) -> Self {
        Self::StructuralInvariant {
            message: message.into(),
        }
    }

    /// Create a new spline-invariant error
    pub fn spline_invariant(message: impl Into<String>) -> Self {
        Self::SplineInvariant {
            message: message.into(),
        }
    }
}

/// Result type alias for convenience
pub type VectorizeResult<T> = Result<T, VectorizeError>;
