//! Fixes for the BNU-ESM model.

use esmkit_cube::{Cube, CubeList, CubeResult};

use crate::Fix;

/// The published gas fractions are mass ratios in the wrong unit scale;
/// convert to molar fractions against dry air (molar mass 29 g mol-1).
pub(crate) struct Co2;

impl Fix for Co2 {
    fn name(&self) -> &'static str {
        "bnu_esm.co2"
    }

    fn fix_metadata(&self, cubes: &mut CubeList, short_name: &str) -> CubeResult<()> {
        let cube = cubes.extract_var_name_mut(short_name)?;
        cube.metadata.units = String::from("1e-6");
        Ok(())
    }

    fn fix_data(&self, cube: &mut Cube) -> CubeResult<()> {
        cube.scale(29.0 / 44.0 * 1.0e6);
        Ok(())
    }
}

pub(crate) struct Ch4;

impl Fix for Ch4 {
    fn name(&self) -> &'static str {
        "bnu_esm.ch4"
    }

    fn fix_metadata(&self, cubes: &mut CubeList, short_name: &str) -> CubeResult<()> {
        let cube = cubes.extract_var_name_mut(short_name)?;
        cube.metadata.units = String::from("1e-9");
        Ok(())
    }

    fn fix_data(&self, cube: &mut Cube) -> CubeResult<()> {
        cube.scale(29.0 / 16.0 * 1.0e9);
        Ok(())
    }
}

/// Carbon flux is reported per unit carbon instead of per unit CO2.
pub(crate) struct FgCo2;

impl Fix for FgCo2 {
    fn name(&self) -> &'static str {
        "bnu_esm.fgco2"
    }

    fn fix_metadata(&self, cubes: &mut CubeList, short_name: &str) -> CubeResult<()> {
        let cube = cubes.extract_var_name_mut(short_name)?;
        cube.metadata.units = String::from("kg m-2 s-1");
        Ok(())
    }

    fn fix_data(&self, cube: &mut Cube) -> CubeResult<()> {
        cube.scale(12.0 / 44.0);
        Ok(())
    }
}

pub(crate) struct SpCo2;

impl Fix for SpCo2 {
    fn name(&self) -> &'static str {
        "bnu_esm.spco2"
    }

    fn fix_data(&self, cube: &mut Cube) -> CubeResult<()> {
        cube.scale(1.0e6);
        Ok(())
    }
}

/// The model writes 1.0e36 where the optical depth is undefined.
pub(crate) struct Od550Aer;

impl Fix for Od550Aer {
    fn name(&self) -> &'static str {
        "bnu_esm.od550aer"
    }

    fn fix_data(&self, cube: &mut Cube) -> CubeResult<()> {
        cube.mask_equal(1.0e36);
        Ok(())
    }
}

pub(crate) fn fixes(short_name: &str) -> Vec<Box<dyn Fix>> {
    match short_name {
        "co2" => vec![Box::new(Co2)],
        "ch4" => vec![Box::new(Ch4)],
        "fgco2" => vec![Box::new(FgCo2)],
        "spco2" => vec![Box::new(SpCo2)],
        "od550aer" => vec![Box::new(Od550Aer)],
        _ => Vec::new(),
    }
}
