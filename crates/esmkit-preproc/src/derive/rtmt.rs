//! Derivation of `rtmt` from EMAC channel output.

use esmkit_cube::{Cube, CubeList};

use crate::derive::{required_cube, DerivedVariable, RequiredVar};
use crate::error::DeriveResult;

/// Net downward radiative flux at the top of the model.
///
/// EMAC writes the thermal (`flxt_ave`) and solar (`flxs_ave`) flux
/// streams on interface levels, ordered top down. The net flux at the top
/// of the model is the sum of both streams at the first level.
pub(crate) struct Rtmt;

impl DerivedVariable for Rtmt {
    fn short_name(&self) -> &'static str {
        "rtmt"
    }

    fn required(&self, _project: &str) -> Vec<RequiredVar> {
        vec![RequiredVar::new("flxt_ave"), RequiredVar::new("flxs_ave")]
    }

    fn calculate(&self, cubes: &CubeList) -> DeriveResult<Cube> {
        let flxt = required_cube(cubes, self.short_name(), "flxt_ave")?.select(1, 0)?;
        let flxs = required_cube(cubes, self.short_name(), "flxs_ave")?.select(1, 0)?;
        let mut cube = flxt.add(&flxs)?;
        cube.metadata.standard_name = String::from("net_downward_radiative_flux_at_top_of_model");
        cube.metadata.long_name = String::from("Net Downward Flux at Top of Model");
        cube.metadata.units = String::from("W m-2");
        Ok(cube)
    }
}
