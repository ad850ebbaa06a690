use thiserror::Error;

/// Error type for cube and coordinate operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CubeError {
    #[error("cube '{cube}' has no coordinate named '{coordinate}'")]
    CoordinateNotFound { cube: String, coordinate: String },
    #[error("cube '{cube}' has no dimension {dim} (cube has {ndim} dimensions)")]
    DimensionOutOfRange {
        cube: String,
        dim: usize,
        ndim: usize,
    },
    #[error("coordinate '{coordinate}' has {points} points but dimension {dim} has length {len}")]
    CoordinateLengthMismatch {
        coordinate: String,
        points: usize,
        dim: usize,
        len: usize,
    },
    #[error("index {index} is out of range for dimension {dim} of cube '{cube}' (length {len})")]
    IndexOutOfRange {
        cube: String,
        dim: usize,
        index: usize,
        len: usize,
    },
    #[error("shape {right:?} does not broadcast against shape {left:?}")]
    ShapeMismatch { left: Vec<usize>, right: Vec<usize> },
    #[error("expected exactly one cube with var_name '{var_name}', found {count}")]
    ConstraintMismatch { var_name: String, count: usize },
}

/// Convenience type for `Result<T, CubeError>`.
pub type CubeResult<T> = Result<T, CubeError>;
