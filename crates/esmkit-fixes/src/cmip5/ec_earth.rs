//! Fixes for the EC-Earth model.

use esmkit_cube::{Cube, CubeList, CubeResult};

use crate::shared::{add_scalar_height_coord, DEFAULT_HEIGHT};
use crate::Fix;

/// Sea ice area fraction is stored as a unit fraction instead of a percentage.
pub(crate) struct Sic;

impl Fix for Sic {
    fn name(&self) -> &'static str {
        "ec_earth.sic"
    }

    fn fix_data(&self, cube: &mut Cube) -> CubeResult<()> {
        cube.scale(100.0);
        Ok(())
    }
}

pub(crate) struct Sftlf;

impl Fix for Sftlf {
    fn name(&self) -> &'static str {
        "ec_earth.sftlf"
    }

    fn fix_data(&self, cube: &mut Cube) -> CubeResult<()> {
        cube.scale(100.0);
        Ok(())
    }
}

/// Sea surface temperature uses an unmasked 273.15 fill value over land.
pub(crate) struct Tos;

impl Fix for Tos {
    fn name(&self) -> &'static str {
        "ec_earth.tos"
    }

    fn fix_data(&self, cube: &mut Cube) -> CubeResult<()> {
        cube.mask_equal(273.15);
        Ok(())
    }
}

/// Near-surface air temperature is written without its scalar height
/// coordinate and with an unnamed time coordinate.
pub(crate) struct Tas;

impl Fix for Tas {
    fn name(&self) -> &'static str {
        "ec_earth.tas"
    }

    fn fix_metadata(&self, cubes: &mut CubeList, _short_name: &str) -> CubeResult<()> {
        for cube in cubes.iter_mut() {
            if cube.find_coord("height").is_none() {
                add_scalar_height_coord(cube, DEFAULT_HEIGHT)?;
            }
            let time = cube.coord_mut("time")?;
            if time.long_name.is_empty() {
                time.long_name = String::from("time");
            }
        }
        Ok(())
    }
}

pub(crate) fn fixes(short_name: &str) -> Vec<Box<dyn Fix>> {
    match short_name {
        "sic" => vec![Box::new(Sic)],
        "sftlf" => vec![Box::new(Sftlf)],
        "tos" => vec![Box::new(Tos)],
        "tas" => vec![Box::new(Tas)],
        _ => Vec::new(),
    }
}
