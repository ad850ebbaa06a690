//! Loader for the JSON table layout introduced with CMIP6.
//!
//! A tables directory looks like
//!
//! ```text
//! <cmor_tables_path>/Tables/CMIP6_coordinate.json
//! <cmor_tables_path>/Tables/CMIP6_Amon.json
//! <cmor_tables_path>/Tables/CMIP6_Omon.json
//! ...
//! ```
//!
//! Coordinate files are read first so that every variable's `dimensions`
//! list can be resolved against the shared pool, whatever order the table
//! files sort in.

use std::path::Path;

use indexmap::IndexMap;
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::{TableError, TableResult};
use crate::fsutil::{file_name_contains, read_file, sorted_files};
use crate::info::{CoordinateInfo, VariableInfo};
use crate::table::{resolve_dimensions, TableSet};

/// JSON files whose names contain one of these carry controlled
/// vocabularies or grid definitions, not variable tables.
const SKIP_FRAGMENTS: &[&str] = &["CV_test", "grids"];

/// Load every table under `<cmor_tables_path>/Tables/` into a fresh
/// [`TableSet`].
///
/// The whole load aborts on the first malformed file; a partially usable
/// registry is never returned.
pub fn load_cmip6_tables(cmor_tables_path: &Path) -> TableResult<TableSet> {
    let tables_dir = cmor_tables_path.join("Tables");
    if !tables_dir.is_dir() {
        return Err(TableError::ConfigurationNotFound { path: tables_dir });
    }

    let files: Vec<_> = sorted_files(&tables_dir)?
        .into_iter()
        .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
        .collect();

    let mut tables = TableSet::default();

    for path in &files {
        if file_name_contains(path, "coordinate") {
            load_coordinate_file(path, &mut tables)?;
        }
    }
    debug!(coordinates = tables.coords.len(), "loaded shared coordinates");

    for path in &files {
        if SKIP_FRAGMENTS
            .iter()
            .any(|fragment| file_name_contains(path, fragment))
        {
            continue;
        }
        load_table_file(path, &mut tables)?;
    }

    Ok(tables)
}

fn load_coordinate_file(path: &Path, tables: &mut TableSet) -> TableResult<()> {
    let value: Value = serde_json::from_str(&read_file(path)?)
        .map_err(|err| TableError::parse(path, err.to_string()))?;
    let entries = value
        .get("axis_entry")
        .and_then(Value::as_object)
        .ok_or_else(|| TableError::parse(path, "missing 'axis_entry' object"))?;
    for (name, entry) in entries {
        let entry = entry.as_object().ok_or_else(|| {
            TableError::parse(path, format!("axis_entry '{name}' is not an object"))
        })?;
        tables
            .coords
            .insert(name.clone(), read_coordinate(name, entry));
    }
    Ok(())
}

fn load_table_file(path: &Path, tables: &mut TableSet) -> TableResult<()> {
    let value: Value = serde_json::from_str(&read_file(path)?)
        .map_err(|err| TableError::parse(path, err.to_string()))?;
    // Only files carrying both a header and variable entries are tables;
    // anything else (the coordinate file included) is passed over.
    let (Some(header), Some(entries)) = (value.get("Header"), value.get("variable_entry")) else {
        return Ok(());
    };
    let header = header
        .as_object()
        .ok_or_else(|| TableError::parse(path, "'Header' is not an object"))?;
    let entries = entries
        .as_object()
        .ok_or_else(|| TableError::parse(path, "'variable_entry' is not an object"))?;

    let table_name = table_name(header)
        .ok_or_else(|| TableError::parse(path, "header has no 'table_id'"))?;
    let generic_levels: Vec<String> = match header.get("generic_levels") {
        Some(Value::String(levels)) => levels.split_whitespace().map(str::to_string).collect(),
        _ => return Err(TableError::parse(path, "header has no 'generic_levels'")),
    };
    let default_frequency = read_str(header, "frequency");

    let mut variables = IndexMap::new();
    for (short_name, entry) in entries {
        let entry = entry.as_object().ok_or_else(|| {
            TableError::parse(path, format!("variable_entry '{short_name}' is not an object"))
        })?;
        let mut variable = read_variable(short_name, entry, &default_frequency);
        resolve_dimensions(&mut variable, &generic_levels, &tables.coords, &table_name)?;
        variables.insert(short_name.clone(), variable);
    }

    debug!(
        table = %table_name,
        variables = variables.len(),
        file = %path.display(),
        "loaded CMOR table"
    );
    tables.tables.insert(table_name, variables);
    Ok(())
}

/// The registry key for a table: its `table_id` with the conventional
/// `"Table "` prefix removed (`"Table Amon"` becomes `"Amon"`).
fn table_name(header: &Map<String, Value>) -> Option<String> {
    let table_id = header.get("table_id")?.as_str()?;
    Some(
        table_id
            .strip_prefix("Table ")
            .unwrap_or(table_id)
            .to_string(),
    )
}

fn read_variable(
    short_name: &str,
    entry: &Map<String, Value>,
    default_frequency: &str,
) -> VariableInfo {
    let mut variable = VariableInfo::new(short_name);
    variable.standard_name = read_str(entry, "standard_name");
    variable.long_name = read_str(entry, "long_name");
    variable.units = read_str(entry, "units");
    variable.valid_min = read_str(entry, "valid_min");
    variable.valid_max = read_str(entry, "valid_max");
    variable.positive = read_str(entry, "positive");
    let frequency = read_str(entry, "frequency");
    variable.frequency = if frequency.is_empty() {
        default_frequency.to_string()
    } else {
        frequency
    };
    variable.dimensions = read_str(entry, "dimensions")
        .split_whitespace()
        .map(str::to_string)
        .collect();
    variable
}

fn read_coordinate(name: &str, entry: &Map<String, Value>) -> CoordinateInfo {
    let mut coord = CoordinateInfo::new(name);
    coord.axis = read_str(entry, "axis");
    coord.value = read_str(entry, "value");
    coord.standard_name = read_str(entry, "standard_name");
    coord.long_name = read_str(entry, "long_name");
    coord.out_name = read_str(entry, "out_name");
    coord.var_name = read_str(entry, "var_name");
    coord.units = read_str(entry, "units");
    coord.stored_direction = read_str(entry, "stored_direction");
    coord.requested = read_str_list(entry, "requested");
    coord.valid_min = read_str(entry, "valid_min");
    coord.valid_max = read_str(entry, "valid_max");
    coord
}

/// A field as a string. Numbers are rendered with their JSON spelling so
/// `"valid_min": 0.0` and `"valid_min": "0.0"` behave alike; absent and
/// `null` both mean "not specified".
fn read_str(entry: &Map<String, Value>, key: &str) -> String {
    match entry.get(key) {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(text)) => text.clone(),
        Some(other) => other.to_string(),
    }
}

/// A field as a list of strings. A bare string splits on whitespace, any
/// other scalar or an absent key gives an empty list.
fn read_str_list(entry: &Map<String, Value>, key: &str) -> Vec<String> {
    match entry.get(key) {
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| match item {
                Value::String(text) => text.clone(),
                other => other.to_string(),
            })
            .collect(),
        Some(Value::String(text)) => text.split_whitespace().map(str::to_string).collect(),
        _ => Vec::new(),
    }
}
