//! Fixes shared by the HadGEM2-CC and HadGEM2-ES models.

use esmkit_cube::{CubeList, CubeResult};

use crate::Fix;

/// Latitude points and bounds can stray slightly beyond the poles.
pub(crate) struct AllVars;

impl Fix for AllVars {
    fn name(&self) -> &'static str {
        "hadgem2.allvars"
    }

    fn fix_metadata(&self, cubes: &mut CubeList, _short_name: &str) -> CubeResult<()> {
        for cube in cubes.iter_mut() {
            if cube.find_coord("latitude").is_some() {
                cube.clamp_coord("latitude", -90.0, 90.0)?;
            }
        }
        Ok(())
    }
}

/// Dissolved oxygen is published under a non-standard name.
pub(crate) struct O2;

impl Fix for O2 {
    fn name(&self) -> &'static str {
        "hadgem2.o2"
    }

    fn fix_metadata(&self, cubes: &mut CubeList, short_name: &str) -> CubeResult<()> {
        let cube = cubes.extract_var_name_mut(short_name)?;
        cube.metadata.standard_name =
            String::from("mole_concentration_of_dissolved_molecular_oxygen_in_sea_water");
        cube.metadata.long_name = String::from("Dissolved Oxygen Concentration");
        Ok(())
    }
}

pub(crate) fn fixes(short_name: &str) -> Vec<Box<dyn Fix>> {
    let mut fixes: Vec<Box<dyn Fix>> = vec![Box::new(AllVars)];
    if short_name == "o2" {
        fixes.push(Box::new(O2));
    }
    fixes
}
