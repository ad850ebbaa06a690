//! Per-project wiring between a project name and its CMOR tables.
//!
//! Configuration is a TOML document mapping project names to a table format
//! and a tables directory:
//!
//! ```toml
//! [projects.CMIP6]
//! cmor_type = "CMIP6"
//! cmor_tables_path = "/opt/cmor/cmip6"
//!
//! [projects.CMIP5]
//! cmor_type = "CMIP5"
//! cmor_tables_path = "/opt/cmor/cmip5"
//! ```
//!
//! Paths are used as written; resolving them against an installation prefix
//! is the caller's concern.

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::cmip5::load_cmip5_tables;
use crate::cmip6::load_cmip6_tables;
use crate::error::{TableError, TableResult};
use crate::fsutil::read_file;
use crate::table::TableSet;

/// Which loader a project's tables directory needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TableFormat {
    /// Line-oriented text tables.
    Cmip5,
    /// JSON tables.
    Cmip6,
}

/// Table location and format for one project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectTables {
    pub cmor_type: TableFormat,
    pub cmor_tables_path: PathBuf,
}

/// The full project-to-tables map.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TablesConfig {
    #[serde(default)]
    pub projects: IndexMap<String, ProjectTables>,
}

impl TablesConfig {
    /// Parse a configuration file.
    pub fn from_file(path: &Path) -> TableResult<Self> {
        let text = read_file(path)?;
        toml::from_str(&text).map_err(|err| TableError::parse(path, err.to_string()))
    }

    /// The entry for `project`, or [`TableError::UnknownProject`].
    pub fn project(&self, project: &str) -> TableResult<&ProjectTables> {
        self.projects
            .get(project)
            .ok_or_else(|| TableError::UnknownProject {
                project: project.to_string(),
            })
    }

    /// Load the full table registry for `project` with the loader its entry
    /// selects.
    pub fn load_tables(&self, project: &str) -> TableResult<TableSet> {
        let entry = self.project(project)?;
        debug!(
            project,
            format = ?entry.cmor_type,
            path = %entry.cmor_tables_path.display(),
            "loading CMOR tables"
        );
        match entry.cmor_type {
            TableFormat::Cmip5 => load_cmip5_tables(&entry.cmor_tables_path),
            TableFormat::Cmip6 => load_cmip6_tables(&entry.cmor_tables_path),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_projects_map() {
        let config: TablesConfig = toml::from_str(
            r#"
            [projects.CMIP6]
            cmor_type = "CMIP6"
            cmor_tables_path = "/opt/cmor/cmip6"

            [projects.OBS]
            cmor_type = "CMIP5"
            cmor_tables_path = "/opt/cmor/obs"
            "#,
        )
        .unwrap();
        assert_eq!(config.projects.len(), 2);
        let cmip6 = config.project("CMIP6").unwrap();
        assert_eq!(cmip6.cmor_type, TableFormat::Cmip6);
        assert_eq!(cmip6.cmor_tables_path, PathBuf::from("/opt/cmor/cmip6"));
    }

    #[test]
    fn unknown_project_is_an_error() {
        let config = TablesConfig::default();
        let err = config.project("EMAC").unwrap_err();
        assert!(matches!(err, TableError::UnknownProject { project } if project == "EMAC"));
    }
}
