//! Directory-scan helpers shared by the table loaders.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{TableError, TableResult};

/// Regular files directly under `dir`, sorted by name so that loads are
/// deterministic regardless of filesystem enumeration order.
pub(crate) fn sorted_files(dir: &Path) -> TableResult<Vec<PathBuf>> {
    let entries = fs::read_dir(dir).map_err(|source| TableError::Io {
        path: dir.to_path_buf(),
        source,
    })?;
    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| TableError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        if path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// True when the file name (not the whole path) contains `needle`.
pub(crate) fn file_name_contains(path: &Path, needle: &str) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.contains(needle))
}

pub(crate) fn read_file(path: &Path) -> TableResult<String> {
    fs::read_to_string(path).map_err(|source| TableError::Io {
        path: path.to_path_buf(),
        source,
    })
}
