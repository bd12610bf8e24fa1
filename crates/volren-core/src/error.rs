//! Error types for volren-rs.

use thiserror::Error;

/// The main error type for volren-rs operations.
#[derive(Error, Debug)]
pub enum VolrenError {
    /// The grid placement composed with the grid size cannot be inverted.
    #[error("grid transform is singular (determinant {determinant})")]
    SingularTransform { determinant: f32 },

    /// A grid axis has zero or negative spacing.
    #[error("grid spacing must be positive, got {0}")]
    NonPositiveSpacing(f32),

    /// A grid has no voxels along at least one axis.
    #[error("grid size must be at least 1 along every axis, got {x}x{y}x{z}")]
    EmptyGrid { x: u32, y: u32, z: u32 },

    /// Data size mismatch.
    #[error("data size mismatch: expected {expected}, got {actual}")]
    SizeMismatch { expected: usize, actual: usize },

    /// A color name that is not in the color table.
    #[error("unknown color name '{0}'")]
    UnknownColor(String),

    /// A hex color string that could not be parsed.
    #[error("invalid hex color '{0}'")]
    InvalidHexColor(String),

    /// Failure reported by a rendering backend.
    #[error("backend error: {0}")]
    Backend(String),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// A specialized Result type for volren-rs operations.
pub type Result<T> = std::result::Result<T, VolrenError>;
