//! Fixes for the MIROC-ESM model.

use esmkit_cube::{Cube, CubeList, CubeResult};

use crate::Fix;

/// Atmospheric variables name their pressure level coordinate after the
/// model grid (AR5PL35) instead of the pressure axis.
pub(crate) struct AllVars;

impl Fix for AllVars {
    fn name(&self) -> &'static str {
        "miroc_esm.allvars"
    }

    fn fix_metadata(&self, cubes: &mut CubeList, _short_name: &str) -> CubeResult<()> {
        for cube in cubes.iter_mut() {
            if let Some(plev) = cube.find_coord_mut("AR5PL35") {
                plev.var_name = String::from("plev");
                plev.standard_name = String::from("air_pressure");
                plev.long_name = String::from("Pressure");
            }
        }
        Ok(())
    }
}

/// Ozone is reported in ppmv but declared in ppbv.
pub(crate) struct Tro3;

impl Fix for Tro3 {
    fn name(&self) -> &'static str {
        "miroc_esm.tro3"
    }

    fn fix_data(&self, cube: &mut Cube) -> CubeResult<()> {
        cube.scale(1000.0);
        Ok(())
    }
}

pub(crate) struct Co2;

impl Fix for Co2 {
    fn name(&self) -> &'static str {
        "miroc_esm.co2"
    }

    fn fix_metadata(&self, cubes: &mut CubeList, short_name: &str) -> CubeResult<()> {
        let cube = cubes.extract_var_name_mut(short_name)?;
        cube.metadata.units = String::from("1.0e-6");
        Ok(())
    }
}

pub(crate) struct Gpp;

impl Fix for Gpp {
    fn name(&self) -> &'static str {
        "miroc_esm.gpp"
    }

    fn fix_metadata(&self, cubes: &mut CubeList, short_name: &str) -> CubeResult<()> {
        let cube = cubes.extract_var_name_mut(short_name)?;
        cube.metadata.units = String::from("g m-2 day-1");
        Ok(())
    }
}

pub(crate) fn fixes(short_name: &str) -> Vec<Box<dyn Fix>> {
    let mut fixes: Vec<Box<dyn Fix>> = vec![Box::new(AllVars)];
    match short_name {
        "tro3" => fixes.push(Box::new(Tro3)),
        "co2" => fixes.push(Box::new(Co2)),
        "gpp" => fixes.push(Box::new(Gpp)),
        _ => {}
    }
    fixes
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use esmkit_cube::Coord;
    use ndarray::array;

    use super::*;

    #[test]
    fn test_pressure_coordinate_renamed() {
        let plev = Coord::dimensional("AR5PL35", 0, array![100000.0, 85000.0]);
        let cube = Cube::new("ta", array![270.0, 265.0].into_dyn())
            .with_coord(plev)
            .unwrap();
        let mut cubes = CubeList::from(vec![cube]);

        AllVars.fix_metadata(&mut cubes, "ta").unwrap();

        let cube = cubes.extract_var_name("ta").unwrap();
        let plev = cube.coord("plev").unwrap();
        assert_eq!(plev.standard_name, "air_pressure");
        assert_eq!(plev.long_name, "Pressure");
        assert!(cube.find_coord("AR5PL35").is_none());
    }

    #[test]
    fn test_cubes_without_model_levels_pass_through() {
        let mut cubes = CubeList::from(vec![Cube::new("tas", array![280.0].into_dyn())]);

        AllVars.fix_metadata(&mut cubes, "tas").unwrap();

        assert!(cubes.extract_var_name("tas").unwrap().coords().is_empty());
    }

    #[test]
    fn test_tro3_rescaled() {
        let mut cube = Cube::new("tro3", array![0.5].into_dyn());

        Tro3.fix_data(&mut cube).unwrap();

        assert_relative_eq!(cube.data[[0]], 500.0);
    }

    #[test]
    fn test_co2_units() {
        let mut cubes = CubeList::from(vec![Cube::new("co2", array![280.0].into_dyn())]);

        Co2.fix_metadata(&mut cubes, "co2").unwrap();

        assert_eq!(cubes.extract_var_name("co2").unwrap().metadata.units, "1.0e-6");
    }

    #[test]
    fn test_gpp_units() {
        let mut cubes = CubeList::from(vec![Cube::new("gpp", array![1.0].into_dyn())]);

        Gpp.fix_metadata(&mut cubes, "gpp").unwrap();

        assert_eq!(cubes.extract_var_name("gpp").unwrap().metadata.units, "g m-2 day-1");
    }

    #[test]
    fn test_fixes_lookup_keeps_allvars_first() {
        let names: Vec<_> = fixes("co2").iter().map(|fix| fix.name()).collect();
        assert_eq!(names, ["miroc_esm.allvars", "miroc_esm.co2"]);
        assert_eq!(fixes("tas").len(), 1);
    }
}
