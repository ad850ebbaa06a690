//! Loader for the line-oriented text table layout used by CMIP5 and the
//! projects that inherited its format (obs4MIPs, ana4mips, custom tables).
//!
//! A table file is a sequence of `key: value` lines. `!` starts a comment,
//! either for a whole line or for the tail of one. `axis_entry:` and
//! `variable_entry:` open records whose following lines describe one
//! coordinate or one variable; a record runs until the next record header,
//! the next `table_id`, or the end of the file.

use std::path::Path;
use std::str::Lines;

use indexmap::IndexMap;
use tracing::debug;

use crate::error::{TableError, TableResult};
use crate::fsutil::{file_name_contains, read_file, sorted_files};
use crate::info::{CoordinateInfo, VariableInfo};
use crate::table::{resolve_dimensions, TableSet};

/// Load every table under `<cmor_tables_path>/Tables/` into a fresh
/// [`TableSet`].
///
/// Files named `*coordinate*` are read first so a shared coordinate file is
/// honored when a project ships one; most CMIP5-era projects instead repeat
/// their axis entries at the top of every table file, which works with any
/// file order. The whole load aborts on the first malformed file.
pub fn load_cmip5_tables(cmor_tables_path: &Path) -> TableResult<TableSet> {
    let tables_dir = cmor_tables_path.join("Tables");
    if !tables_dir.is_dir() {
        return Err(TableError::ConfigurationNotFound { path: tables_dir });
    }

    let files = sorted_files(&tables_dir)?;
    let mut tables = TableSet::default();

    for path in &files {
        if file_name_contains(path, "coordinate") {
            load_table_file(path, &mut tables)?;
        }
    }

    for path in &files {
        if file_name_contains(path, "_grids") || file_name_contains(path, "coordinate") {
            continue;
        }
        load_table_file(path, &mut tables)?;
    }

    Ok(tables)
}

fn load_table_file(path: &Path, tables: &mut TableSet) -> TableResult<()> {
    let text = read_file(path)?;
    parse_table_text(path, &text, tables)
}

/// Run the state machine over one file's text.
///
/// `frequency` and `generic_levels` live at file scope: a later `table_id`
/// in the same file starts a new table but inherits both, exactly as the
/// format's producers assume.
fn parse_table_text(path: &Path, text: &str, tables: &mut TableSet) -> TableResult<()> {
    let mut parser = LineParser::new(path, text);
    let mut current: Option<(String, IndexMap<String, VariableInfo>)> = None;
    let mut frequency = String::new();
    let mut generic_levels: Vec<String> = Vec::new();

    let mut entry = parser.next_entry()?;
    while let Some((key, value)) = entry {
        match key.as_str() {
            "table_id" => {
                if let Some((name, variables)) = current.take() {
                    register_table(tables, path, name, variables);
                }
                current = Some((strip_table_prefix(&value), IndexMap::new()));
            }
            "frequency" => frequency = value,
            "generic_levels" => {
                generic_levels.extend(value.split_whitespace().map(str::to_string));
            }
            "axis_entry" => {
                let (coord, next) = read_coordinate_record(&mut parser, value)?;
                tables.coords.insert(coord.name().to_string(), coord);
                entry = next;
                continue;
            }
            "variable_entry" => {
                let Some((table_name, variables)) = current.as_mut() else {
                    return Err(TableError::parse(
                        path,
                        format!("variable_entry '{value}' before any table_id"),
                    ));
                };
                let (mut variable, next) = read_variable_record(&mut parser, value, &frequency)?;
                resolve_dimensions(&mut variable, &generic_levels, &tables.coords, table_name)?;
                variables.insert(variable.short_name().to_string(), variable);
                entry = next;
                continue;
            }
            // Remaining header keys (modeling_realm, table_date, ...) do not
            // affect the registry.
            _ => {}
        }
        entry = parser.next_entry()?;
    }

    if let Some((name, variables)) = current.take() {
        register_table(tables, path, name, variables);
    }
    Ok(())
}

fn register_table(
    tables: &mut TableSet,
    path: &Path,
    name: String,
    variables: IndexMap<String, VariableInfo>,
) {
    debug!(
        table = %name,
        variables = variables.len(),
        file = %path.display(),
        "loaded CMOR table"
    );
    tables.tables.insert(name, variables);
}

/// `"Table Amon"` becomes `"Amon"`; an id without the prefix is kept as is.
fn strip_table_prefix(table_id: &str) -> String {
    table_id
        .strip_prefix("Table ")
        .unwrap_or(table_id)
        .to_string()
}

/// Consume the body of an `axis_entry:` record. Returns the coordinate plus
/// the entry that terminated the record, which the caller dispatches next.
fn read_coordinate_record(
    parser: &mut LineParser<'_>,
    name: String,
) -> TableResult<(CoordinateInfo, Option<(String, String)>)> {
    let mut coord = CoordinateInfo::new(name);
    loop {
        let Some((key, value)) = parser.next_entry()? else {
            return Ok((coord, None));
        };
        match key.as_str() {
            "axis_entry" | "variable_entry" | "table_id" => {
                return Ok((coord, Some((key, value))));
            }
            "axis" => coord.axis = value,
            "value" => coord.value = value,
            "standard_name" => coord.standard_name = value,
            "long_name" => coord.long_name = value,
            "out_name" => coord.out_name = value,
            "var_name" => coord.var_name = value,
            "units" => coord.units = value,
            "stored_direction" => coord.stored_direction = value,
            // May repeat; each line appends.
            "requested" => coord
                .requested
                .extend(value.split_whitespace().map(str::to_string)),
            "valid_min" => coord.valid_min = value,
            "valid_max" => coord.valid_max = value,
            "" => {}
            other => {
                debug!(
                    key = other,
                    coordinate = %coord.name(),
                    "ignoring unrecognized coordinate field"
                );
            }
        }
    }
}

/// Consume the body of a `variable_entry:` record. The variable starts with
/// the file's current default frequency; a `frequency:` line in the body
/// overrides it.
fn read_variable_record(
    parser: &mut LineParser<'_>,
    short_name: String,
    default_frequency: &str,
) -> TableResult<(VariableInfo, Option<(String, String)>)> {
    let mut variable = VariableInfo::new(short_name);
    variable.frequency = default_frequency.to_string();
    loop {
        let Some((key, value)) = parser.next_entry()? else {
            return Ok((variable, None));
        };
        match key.as_str() {
            "axis_entry" | "variable_entry" | "table_id" => {
                return Ok((variable, Some((key, value))));
            }
            "standard_name" => variable.standard_name = value,
            "long_name" => variable.long_name = value,
            "units" => variable.units = value,
            "valid_min" => variable.valid_min = value,
            "valid_max" => variable.valid_max = value,
            "positive" => variable.positive = value,
            "frequency" => variable.frequency = value,
            "dimensions" => {
                variable.dimensions = value.split_whitespace().map(str::to_string).collect();
            }
            "" => {}
            other => {
                debug!(
                    key = other,
                    variable = variable.short_name(),
                    "ignoring unrecognized variable field"
                );
            }
        }
    }
}

/// Cursor over the meaningful lines of one table file.
///
/// Yields `(key, value)` pairs split at the first `:`, with comments
/// stripped and both halves trimmed. A blank line yields `("", "")` so that
/// record readers can skip it without treating it as a terminator. A
/// non-blank line without a `:` is malformed.
struct LineParser<'a> {
    path: &'a Path,
    lines: Lines<'a>,
}

impl<'a> LineParser<'a> {
    fn new(path: &'a Path, text: &'a str) -> Self {
        Self {
            path,
            lines: text.lines(),
        }
    }

    fn next_entry(&mut self) -> TableResult<Option<(String, String)>> {
        for line in self.lines.by_ref() {
            if line.starts_with('!') {
                continue;
            }
            let line = match line.find('!') {
                Some(comment) => &line[..comment],
                None => line,
            };
            let line = line.trim();
            if line.is_empty() {
                return Ok(Some((String::new(), String::new())));
            }
            let Some((key, value)) = line.split_once(':') else {
                return Err(TableError::parse(
                    self.path,
                    format!("expected 'key: value', got '{line}'"),
                ));
            };
            return Ok(Some((key.trim().to_string(), value.trim().to_string())));
        }
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> TableResult<TableSet> {
        let mut tables = TableSet::default();
        parse_table_text(Path::new("CMIP5_test"), text, &mut tables)?;
        Ok(tables)
    }

    const AMON: &str = "\
table_id: Table Amon    ! comment after the value
frequency: mon

axis_entry: time
!----------------------------------
axis: T
standard_name: time
units: days since ?
var_name: time

axis_entry: latitude
axis: Y
standard_name: latitude
units: degrees_north
valid_min: -90.
valid_max: 90.

variable_entry: tas
standard_name: air_temperature
units: K
long_name: Near-Surface Air Temperature
dimensions: time
";

    #[test]
    fn parses_a_single_table_file() {
        let tables = parse(AMON).unwrap();
        let tas = tables.get_variable("Amon", "tas").unwrap();
        assert_eq!(tas.standard_name, "air_temperature");
        assert_eq!(tas.units, "K");
        assert_eq!(tas.frequency, "mon");
        assert_eq!(tas.dimensions, vec!["time"]);
        assert_eq!(tas.coordinates["T"].standard_name, "time");

        let lat = tables.coordinate("latitude").unwrap();
        assert_eq!(lat.axis, "Y");
        assert_eq!(lat.valid_min, "-90.");
    }

    #[test]
    fn variable_frequency_line_overrides_the_table_default() {
        let text = "\
table_id: Table Amon
frequency: mon
axis_entry: time
axis: T
variable_entry: tas
frequency: day
dimensions: time
";
        let tables = parse(text).unwrap();
        let tas = tables.get_variable("Amon", "tas").unwrap();
        assert_eq!(tas.frequency, "day");
    }

    #[test]
    fn requested_lines_accumulate() {
        let text = "\
table_id: Table Amon
axis_entry: plevs
axis: Z
requested: 100000. 92500.
requested: 85000.
";
        let tables = parse(text).unwrap();
        let plevs = tables.coordinate("plevs").unwrap();
        assert_eq!(plevs.requested, vec!["100000.", "92500.", "85000."]);
    }

    #[test]
    fn generic_levels_resolve_without_an_axis_entry() {
        let text = "\
table_id: Table Amon
generic_levels: alevel
axis_entry: time
axis: T
variable_entry: cl
dimensions: time alevel
";
        let tables = parse(text).unwrap();
        let cl = tables.get_variable("Amon", "cl").unwrap();
        let level = &cl.coordinates["Z"];
        assert!(level.generic_level);
        assert_eq!(level.name(), "alevel");
        assert!(tables.coordinate("alevel").is_none());
    }

    #[test]
    fn a_later_table_id_starts_a_new_table() {
        let text = "\
table_id: Table Amon
frequency: mon
axis_entry: time
axis: T
variable_entry: tas
dimensions: time
table_id: Table Lmon
variable_entry: gpp
dimensions: time
";
        let tables = parse(text).unwrap();
        assert!(tables.get_variable("Amon", "tas").is_some());
        assert!(tables.get_variable("Lmon", "gpp").is_some());
        assert!(tables.get_variable("Amon", "gpp").is_none());
        // Defaults carry across table_id lines within one file.
        assert_eq!(tables.get_variable("Lmon", "gpp").unwrap().frequency, "mon");
    }

    #[test]
    fn variable_before_any_table_id_is_malformed() {
        let err = parse("variable_entry: tas\n").unwrap_err();
        assert!(matches!(err, TableError::ParseError { .. }));
    }

    #[test]
    fn line_without_a_colon_is_malformed() {
        let err = parse("table_id: Table Amon\njust words\n").unwrap_err();
        assert!(matches!(err, TableError::ParseError { .. }));
    }

    #[test]
    fn unknown_dimension_is_reported_with_context() {
        let text = "\
table_id: Table Amon
variable_entry: tas
dimensions: time
";
        let err = parse(text).unwrap_err();
        match err {
            TableError::UnresolvedDimension {
                table,
                variable,
                dimension,
            } => {
                assert_eq!(table, "Amon");
                assert_eq!(variable, "tas");
                assert_eq!(dimension, "time");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
