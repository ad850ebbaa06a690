//! Derivation of `cSoil_grid`.

use esmkit_cube::{Cube, CubeList};

use crate::derive::{required_cube, DerivedVariable, RequiredVar};
use crate::error::DeriveResult;

/// Carbon mass in the soil pool per grid cell area.
///
/// `cSoil` is published relative to land area. For spatial integration it
/// has to be relative to the grid cell area instead, so the land area
/// fraction is multiplied in when available. The correction only matters
/// for coastal cells; without `sftlf` the values pass through unchanged.
pub(crate) struct CSoilGrid;

impl DerivedVariable for CSoilGrid {
    fn short_name(&self) -> &'static str {
        "cSoil_grid"
    }

    fn required(&self, _project: &str) -> Vec<RequiredVar> {
        vec![
            RequiredVar::new("cSoil"),
            RequiredVar::new("sftlf").with_mip("fx").optional(),
        ]
    }

    fn calculate(&self, cubes: &CubeList) -> DeriveResult<Cube> {
        let mut cube = required_cube(cubes, self.short_name(), "cSoil")?.clone();
        if let Some(sftlf) = cubes.find_var_name("sftlf") {
            // sftlf is a percentage; the correction wants a fraction.
            let mut fraction = sftlf.clone();
            fraction.scale(0.01);
            cube.multiply_by(&fraction)?;
        }
        Ok(cube)
    }
}
