use std::path::{Path, PathBuf};

use thiserror::Error;

/// Error type for table loading and configuration.
#[derive(Error, Debug)]
pub enum TableError {
    #[error("CMOR tables path is not a directory: {}", path.display())]
    ConfigurationNotFound { path: PathBuf },
    #[error("cannot parse CMOR table {}: {detail}", path.display())]
    ParseError { path: PathBuf, detail: String },
    #[error(
        "variable '{variable}' in table '{table}' references dimension '{dimension}' \
         which is neither a known coordinate nor a generic level"
    )]
    UnresolvedDimension {
        table: String,
        variable: String,
        dimension: String,
    },
    #[error("project '{project}' is not present in the tables configuration")]
    UnknownProject { project: String },
    #[error("cannot read {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl TableError {
    pub(crate) fn parse(path: &Path, detail: impl Into<String>) -> Self {
        TableError::ParseError {
            path: path.to_path_buf(),
            detail: detail.into(),
        }
    }
}

/// Convenience type for `Result<T, TableError>`.
pub type TableResult<T> = Result<T, TableError>;
