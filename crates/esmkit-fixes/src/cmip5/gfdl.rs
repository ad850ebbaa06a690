//! Fixes shared by the GFDL CM2p1, CM3 and ESM2M models.

use esmkit_cube::{Cube, CubeList, CubeResult};

use crate::shared::NormalizeTimeUnits;
use crate::Fix;

/// Cell areas are declared in m-2 but stored in m2.
pub(crate) struct Areacello;

impl Fix for Areacello {
    fn name(&self) -> &'static str {
        "gfdl.areacello"
    }

    fn fix_metadata(&self, cubes: &mut CubeList, short_name: &str) -> CubeResult<()> {
        let cube = cubes.extract_var_name_mut(short_name)?;
        cube.metadata.units = String::from("m2");
        Ok(())
    }
}

/// Sea area fraction is stored as a unit fraction instead of a percentage.
pub(crate) struct Sftof;

impl Fix for Sftof {
    fn name(&self) -> &'static str {
        "gfdl.sftof"
    }

    fn fix_data(&self, cube: &mut Cube) -> CubeResult<()> {
        cube.scale(100.0);
        Ok(())
    }
}

/// CM2p1 writes sea surface temperature without a standard name and in
/// degrees Celsius despite declaring Kelvin.
pub(crate) struct Tos;

impl Fix for Tos {
    fn name(&self) -> &'static str {
        "gfdl.tos"
    }

    fn fix_metadata(&self, cubes: &mut CubeList, short_name: &str) -> CubeResult<()> {
        let cube = cubes.extract_var_name_mut(short_name)?;
        cube.metadata.standard_name = String::from("sea_surface_temperature");
        Ok(())
    }

    fn fix_data(&self, cube: &mut Cube) -> CubeResult<()> {
        cube.offset(273.15);
        Ok(())
    }
}

pub(crate) struct Co2;

impl Fix for Co2 {
    fn name(&self) -> &'static str {
        "gfdl.co2"
    }

    fn fix_data(&self, cube: &mut Cube) -> CubeResult<()> {
        cube.scale(1.0e6);
        Ok(())
    }
}

/// All GFDL models share unpadded time units.
fn base_fixes() -> Vec<Box<dyn Fix>> {
    vec![Box::new(NormalizeTimeUnits)]
}

pub(crate) fn cm2p1_fixes(short_name: &str) -> Vec<Box<dyn Fix>> {
    let mut fixes = base_fixes();
    match short_name {
        "areacello" => fixes.push(Box::new(Areacello)),
        "sftof" => fixes.push(Box::new(Sftof)),
        "tos" => fixes.push(Box::new(Tos)),
        _ => {}
    }
    fixes
}

pub(crate) fn cm3_fixes(short_name: &str) -> Vec<Box<dyn Fix>> {
    let mut fixes = base_fixes();
    match short_name {
        "areacello" => fixes.push(Box::new(Areacello)),
        "sftof" => fixes.push(Box::new(Sftof)),
        _ => {}
    }
    fixes
}

pub(crate) fn esm2m_fixes(short_name: &str) -> Vec<Box<dyn Fix>> {
    let mut fixes = base_fixes();
    match short_name {
        "areacello" => fixes.push(Box::new(Areacello)),
        "co2" => fixes.push(Box::new(Co2)),
        "sftof" => fixes.push(Box::new(Sftof)),
        _ => {}
    }
    fixes
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use ndarray::array;

    use super::*;

    #[test]
    fn test_areacello_units() {
        let cube = Cube::new("areacello", array![1.0e9].into_dyn()).with_units("m-2");
        let mut cubes = CubeList::from(vec![cube]);

        Areacello.fix_metadata(&mut cubes, "areacello").unwrap();

        assert_eq!(cubes.extract_var_name("areacello").unwrap().metadata.units, "m2");
    }

    #[test]
    fn test_sftof_converts_fraction_to_percent() {
        let mut cube = Cube::new("sftof", array![0.25].into_dyn());

        Sftof.fix_data(&mut cube).unwrap();

        assert_relative_eq!(cube.data[[0]], 25.0);
    }

    #[test]
    fn test_tos_standard_name_and_offset() {
        let mut cubes = CubeList::from(vec![Cube::new("tos", array![12.5].into_dyn())]);

        Tos.fix_metadata(&mut cubes, "tos").unwrap();
        let cube = cubes.extract_var_name_mut("tos").unwrap();
        Tos.fix_data(cube).unwrap();

        assert_eq!(cube.metadata.standard_name, "sea_surface_temperature");
        assert_relative_eq!(cube.data[[0]], 285.65);
    }

    #[test]
    fn test_esm2m_co2_scale() {
        let mut cube = Cube::new("co2", array![2.0e-4].into_dyn());

        Co2.fix_data(&mut cube).unwrap();

        assert_relative_eq!(cube.data[[0]], 200.0);
    }

    #[test]
    fn test_time_fix_applies_to_every_variable() {
        let names: Vec<_> = cm2p1_fixes("tos").iter().map(|fix| fix.name()).collect();
        assert_eq!(names, ["shared.normalize_time_units", "gfdl.tos"]);

        let names: Vec<_> = cm3_fixes("pr").iter().map(|fix| fix.name()).collect();
        assert_eq!(names, ["shared.normalize_time_units"]);

        let names: Vec<_> = esm2m_fixes("co2").iter().map(|fix| fix.name()).collect();
        assert_eq!(names, ["shared.normalize_time_units", "gfdl.co2"]);
    }
}
