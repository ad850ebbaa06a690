//! Fixes for the CESM1-BGC model.

use esmkit_cube::{Cube, CubeResult};

use crate::Fix;

const LAND_FILL_VALUE: f64 = 1.0e33;

pub(crate) struct Co2;

impl Fix for Co2 {
    fn name(&self) -> &'static str {
        "cesm1_bgc.co2"
    }

    fn fix_data(&self, cube: &mut Cube) -> CubeResult<()> {
        cube.scale(28.966 / 44.0);
        Ok(())
    }
}

/// Land carbon fluxes use an unmasked 1.0e33 fill value.
pub(crate) struct Gpp;

impl Fix for Gpp {
    fn name(&self) -> &'static str {
        "cesm1_bgc.gpp"
    }

    fn fix_data(&self, cube: &mut Cube) -> CubeResult<()> {
        cube.mask_equal(LAND_FILL_VALUE);
        Ok(())
    }
}

pub(crate) struct Nbp;

impl Fix for Nbp {
    fn name(&self) -> &'static str {
        "cesm1_bgc.nbp"
    }

    fn fix_data(&self, cube: &mut Cube) -> CubeResult<()> {
        cube.mask_equal(LAND_FILL_VALUE);
        Ok(())
    }
}

pub(crate) fn fixes(short_name: &str) -> Vec<Box<dyn Fix>> {
    match short_name {
        "co2" => vec![Box::new(Co2)],
        "gpp" => vec![Box::new(Gpp)],
        "nbp" => vec![Box::new(Nbp)],
        _ => Vec::new(),
    }
}
