//! Descriptors for CMOR variables and coordinates.
//!
//! These types are format-agnostic: both the JSON ([`crate::cmip6`]) and the
//! text ([`crate::cmip5`]) loaders populate the same structs. Fields that are
//! absent in the source data stay empty: an empty string means "not
//! specified by the table", never an error.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Axis labels a coordinate may carry. Anything else in a source file is
/// kept verbatim but is not a recognized axis.
pub const VALID_AXES: &[&str] = &["X", "Y", "Z", "T"];

/// Key under which coordinates without an axis label are stored in
/// [`VariableInfo::coordinates`].
pub const NO_AXIS: &str = "none";

/// Expected metadata for one variable within one CMOR table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VariableInfo {
    short_name: String,
    pub standard_name: String,
    pub long_name: String,
    /// Canonical unit string. Units are labels here; conversion is the
    /// business of the consuming tooling.
    pub units: String,
    pub valid_min: String,
    pub valid_max: String,
    /// Sign convention for fluxes (`up` / `down`), empty when unspecified.
    pub positive: String,
    /// Sampling frequency. Inherited from the table header unless the
    /// variable entry declares its own.
    pub frequency: String,
    /// Dimension names exactly as the table declares them, in order.
    pub dimensions: Vec<String>,
    /// Resolved coordinates keyed by axis label (`T`/`X`/`Y`/`Z`), or by
    /// [`NO_AXIS`] when the coordinate has no axis. Two dimensions without
    /// an axis label therefore collide on the `none` key and the later one
    /// replaces the earlier.
    pub coordinates: IndexMap<String, CoordinateInfo>,
    /// True when the variable is computed from other fields rather than
    /// read from model output. Set by the derivation layer, not by table
    /// loading.
    pub derived: bool,
    /// Short names of the source variables a derived variable needs, in
    /// order. Set together with `derived`.
    pub required_vars: Vec<String>,
}

impl VariableInfo {
    pub fn new(short_name: impl Into<String>) -> Self {
        Self {
            short_name: short_name.into(),
            ..Self::default()
        }
    }

    /// The variable's canonical compact identifier (e.g. `tas`). Fixed at
    /// construction.
    pub fn short_name(&self) -> &str {
        &self.short_name
    }
}

/// One axis/coordinate definition from a coordinate file or an inline
/// `axis_entry` record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CoordinateInfo {
    name: String,
    /// True for placeholder vertical axes (e.g. `alevel`) whose concrete
    /// levels are model-specific. Generic-level coordinates live on the
    /// variable that declared them, never in the shared coordinate map.
    pub generic_level: bool,
    /// One of [`VALID_AXES`], or empty when the table does not assign one.
    pub axis: String,
    pub value: String,
    pub standard_name: String,
    pub long_name: String,
    pub out_name: String,
    pub var_name: String,
    pub units: String,
    pub stored_direction: String,
    /// Explicitly requested coordinate values, in table order.
    pub requested: Vec<String>,
    pub valid_min: String,
    pub valid_max: String,
}

impl CoordinateInfo {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// A fresh generic-level coordinate. By convention these always carry
    /// axis `Z`.
    pub fn generic(name: impl Into<String>) -> Self {
        let mut coord = Self::new(name);
        coord.generic_level = true;
        coord.axis = "Z".to_string();
        coord
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}
