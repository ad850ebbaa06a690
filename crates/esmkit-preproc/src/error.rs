use thiserror::Error;

use esmkit_cube::CubeError;

/// Error type for variable derivation.
#[derive(Error, Debug)]
pub enum DeriveError {
    #[error("no derivation is registered for variable '{short_name}'")]
    UnknownVariable { short_name: String },
    #[error("cannot derive '{short_name}': input '{required}' is not among the loaded cubes")]
    MissingSource { short_name: String, required: String },
    #[error(transparent)]
    Cube(#[from] CubeError),
}

/// Convenience type for `Result<T, DeriveError>`.
pub type DeriveResult<T> = Result<T, DeriveError>;
