//! Derivation of variables that models do not publish directly.
//!
//! A derivation declares which source variables it reads and how to turn
//! them into the derived cube. The registry is a plain match: every
//! derivation is known at compile time and looked up by the derived
//! variable's short name, case-insensitively.

use esmkit_cmor::VariableInfo;
use esmkit_cube::{Cube, CubeList};
use tracing::debug;

use crate::error::{DeriveError, DeriveResult};

mod csoil_grid;
mod rtmt;

/// One input a derivation reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequiredVar {
    pub short_name: String,
    /// Table the input lives in when it differs from the derived
    /// variable's own, e.g. fixed fields in `fx`.
    pub mip: Option<String>,
    /// Optional inputs refine the result; their absence is not an error.
    pub optional: bool,
}

impl RequiredVar {
    pub fn new(short_name: impl Into<String>) -> Self {
        Self {
            short_name: short_name.into(),
            mip: None,
            optional: false,
        }
    }

    pub fn with_mip(mut self, mip: impl Into<String>) -> Self {
        self.mip = Some(mip.into());
        self
    }

    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }
}

/// A derived variable: what it needs and how to compute it.
pub trait DerivedVariable {
    /// The variable this derivation produces.
    fn short_name(&self) -> &'static str;

    /// The inputs to load before calling [`DerivedVariable::calculate`].
    fn required(&self, project: &str) -> Vec<RequiredVar>;

    /// Compute the derived cube from the loaded inputs.
    fn calculate(&self, cubes: &CubeList) -> DeriveResult<Cube>;
}

/// The derivation registered for `short_name`, if any.
pub fn derivation_for(short_name: &str) -> Option<Box<dyn DerivedVariable>> {
    match short_name.to_lowercase().as_str() {
        "csoil_grid" => Some(Box::new(csoil_grid::CSoilGrid)),
        "rtmt" => Some(Box::new(rtmt::Rtmt)),
        _ => None,
    }
}

/// The inputs needed to derive `short_name` within `project`.
pub fn get_required(short_name: &str, project: &str) -> DeriveResult<Vec<RequiredVar>> {
    let derivation = derivation_for(short_name).ok_or_else(|| DeriveError::UnknownVariable {
        short_name: short_name.to_string(),
    })?;
    Ok(derivation.required(project))
}

/// Derive `short_name` from `cubes`.
///
/// When one of the cubes already is the requested variable it is returned
/// unchanged; the calculation only runs for variables the model did not
/// output itself.
pub fn derive(cubes: &CubeList, short_name: &str) -> DeriveResult<Cube> {
    if let Some(cube) = cubes.find_var_name(short_name) {
        return Ok(cube.clone());
    }
    let derivation = derivation_for(short_name).ok_or_else(|| DeriveError::UnknownVariable {
        short_name: short_name.to_string(),
    })?;
    debug!(variable = short_name, "deriving variable");
    let mut cube = derivation.calculate(cubes)?;
    cube.metadata.var_name = short_name.to_string();
    Ok(cube)
}

/// Mark a registry descriptor as derivable and record the derivation's
/// inputs on it. Returns false when no derivation exists for the
/// descriptor's variable.
pub fn annotate_derived(info: &mut VariableInfo, project: &str) -> bool {
    let Some(derivation) = derivation_for(info.short_name()) else {
        return false;
    };
    info.derived = true;
    info.required_vars = derivation
        .required(project)
        .into_iter()
        .map(|required| required.short_name)
        .collect();
    true
}

/// The single cube named `required`, or the derivation-level error naming
/// both the derived variable and the missing input.
pub(crate) fn required_cube<'a>(
    cubes: &'a CubeList,
    derived: &str,
    required: &str,
) -> DeriveResult<&'a Cube> {
    cubes
        .find_var_name(required)
        .ok_or_else(|| DeriveError::MissingSource {
            short_name: derived.to_string(),
            required: required.to_string(),
        })
}
