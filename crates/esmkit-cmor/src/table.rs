//! The in-memory table registry and its lookup operation.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{TableError, TableResult};
use crate::info::{CoordinateInfo, VariableInfo, NO_AXIS};

/// Historical variable renames. A lookup that misses retries once per hop
/// with the renamed short name, so recipes written against the older names
/// keep working against newer tables.
const VARIABLE_ALIASES: &[(&str, &str)] = &[
    // sea-ice area fraction, renamed between CMIP5 and CMIP6
    ("sic", "siconc"),
    // tropospheric ozone, folded into o3
    ("tro3", "o3"),
];

/// Registry of CMOR tables for one data-request generation.
///
/// Built once by [`crate::load_cmip5_tables`] or [`crate::load_cmip6_tables`]
/// and read-only afterwards; lookups never mutate. Construct one per tables
/// directory and pass it to whatever needs variable metadata; there is no
/// process-wide instance.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TableSet {
    pub(crate) tables: IndexMap<String, IndexMap<String, VariableInfo>>,
    pub(crate) coords: IndexMap<String, CoordinateInfo>,
}

impl TableSet {
    /// Search for a variable, resolving legacy aliases when the direct
    /// lookup misses. Returns `None` when the table does not constrain the
    /// variable; callers treat that as "nothing to check", not an error.
    pub fn get_variable(&self, table: &str, short_name: &str) -> Option<&VariableInfo> {
        if let Some(var) = self.tables.get(table).and_then(|t| t.get(short_name)) {
            return Some(var);
        }
        VARIABLE_ALIASES
            .iter()
            .find(|(old, _)| *old == short_name)
            .and_then(|(_, renamed)| self.get_variable(table, renamed))
    }

    /// All variables of one table, in source order.
    pub fn get_table(&self, table: &str) -> Option<&IndexMap<String, VariableInfo>> {
        self.tables.get(table)
    }

    /// A coordinate definition from the shared coordinate map.
    pub fn coordinate(&self, name: &str) -> Option<&CoordinateInfo> {
        self.coords.get(name)
    }

    /// Table names in load order.
    pub fn table_names(&self) -> impl Iterator<Item = &str> {
        self.tables.keys().map(String::as_str)
    }
}

/// Resolve a variable's declared dimension names against the shared
/// coordinate map, synthesizing generic-level coordinates where the table
/// declared them. Runs before the variable is exposed, so no partially
/// resolved descriptor ever escapes a loader.
pub(crate) fn resolve_dimensions(
    variable: &mut VariableInfo,
    generic_levels: &[String],
    coords: &IndexMap<String, CoordinateInfo>,
    table: &str,
) -> TableResult<()> {
    for dim in &variable.dimensions {
        let coord = if generic_levels.iter().any(|level| level == dim) {
            CoordinateInfo::generic(dim)
        } else {
            coords
                .get(dim)
                .cloned()
                .ok_or_else(|| TableError::UnresolvedDimension {
                    table: table.to_string(),
                    variable: variable.short_name().to_string(),
                    dimension: dim.clone(),
                })?
        };
        let axis = if coord.axis.is_empty() {
            NO_AXIS.to_string()
        } else {
            coord.axis.clone()
        };
        variable.coordinates.insert(axis, coord);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table_set_with(short_name: &str) -> TableSet {
        let mut set = TableSet::default();
        let mut amon = IndexMap::new();
        amon.insert(short_name.to_string(), VariableInfo::new(short_name));
        set.tables.insert("Amon".to_string(), amon);
        set
    }

    #[test]
    fn test_exact_lookup() {
        let set = table_set_with("tas");
        let var = set.get_variable("Amon", "tas").unwrap();
        assert_eq!(var.short_name(), "tas");
    }

    #[test]
    fn test_alias_lookup_one_hop() {
        let set = table_set_with("siconc");
        let direct = set.get_variable("Amon", "siconc").unwrap();
        let aliased = set.get_variable("Amon", "sic").unwrap();
        assert_eq!(direct, aliased);
    }

    #[test]
    fn test_lookup_miss_is_none() {
        let set = table_set_with("tas");
        assert!(set.get_variable("Amon", "nonexistent").is_none());
        assert!(set.get_variable("Omon", "tas").is_none());
    }

    #[test]
    fn test_unresolved_dimension_is_fatal() {
        let mut var = VariableInfo::new("tas");
        var.dimensions = vec!["time".to_string()];
        let err = resolve_dimensions(&mut var, &[], &IndexMap::new(), "Amon").unwrap_err();
        assert!(matches!(
            err,
            TableError::UnresolvedDimension { ref dimension, .. } if dimension == "time"
        ));
    }

    #[test]
    fn test_generic_level_dimension_is_synthesized() {
        let mut var = VariableInfo::new("tro3");
        var.dimensions = vec!["AR5PL35".to_string()];
        let levels = vec!["AR5PL35".to_string()];
        resolve_dimensions(&mut var, &levels, &IndexMap::new(), "Amon").unwrap();
        let coord = &var.coordinates["Z"];
        assert!(coord.generic_level);
        assert_eq!(coord.name(), "AR5PL35");
    }

    #[test]
    fn test_unlabeled_dimensions_share_the_none_key() {
        let mut coords = IndexMap::new();
        coords.insert("first".to_string(), CoordinateInfo::new("first"));
        coords.insert("second".to_string(), CoordinateInfo::new("second"));

        let mut var = VariableInfo::new("x");
        var.dimensions = vec!["first".to_string(), "second".to_string()];
        resolve_dimensions(&mut var, &[], &coords, "Amon").unwrap();

        // Later unlabeled dimension replaces the earlier one.
        assert_eq!(var.coordinates.len(), 1);
        assert_eq!(var.coordinates[NO_AXIS].name(), "second");
    }
}
