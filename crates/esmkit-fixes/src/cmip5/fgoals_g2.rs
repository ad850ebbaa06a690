//! Fixes for the FGOALS-g2 model.

use crate::shared::NormalizeTimeUnits;
use crate::Fix;

/// Every variable carries time units with unpadded date fields.
pub(crate) fn fixes(_short_name: &str) -> Vec<Box<dyn Fix>> {
    vec![Box::new(NormalizeTimeUnits)]
}

#[cfg(test)]
mod tests {
    use esmkit_cube::{Coord, Cube, CubeList};
    use ndarray::array;

    use super::*;

    #[test]
    fn test_all_variables_get_time_units_fix() {
        let time = Coord::dimensional("time", 0, array![15.0]).with_units("days since 1-1-1");
        let cube = Cube::new("pr", array![1.0].into_dyn()).with_coord(time).unwrap();
        let mut cubes = CubeList::from(vec![cube]);

        for fix in fixes("pr") {
            fix.fix_metadata(&mut cubes, "pr").unwrap();
        }

        let cube = cubes.extract_var_name("pr").unwrap();
        assert_eq!(
            cube.coord("time").unwrap().units,
            "days since 0001-01-01 00:00:00"
        );
    }
}
