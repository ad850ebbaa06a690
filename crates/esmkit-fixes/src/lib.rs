//! Corrections for model output that deviates from its published metadata.
//!
//! Some published datasets carry wrong units, missing coordinates, sentinel
//! values that were never masked, or plainly mislabeled variables. The
//! errors are known and stable per dataset, so they are corrected up front
//! by small single-purpose fixes rather than worked around downstream.
//!
//! A fix can act in two phases: [`Fix::fix_metadata`] adjusts names, units
//! and coordinates on a freshly loaded list of cubes, and [`Fix::fix_data`]
//! rescales or masks the values of a single cube. Most fixes implement only
//! one of the two.

use esmkit_cube::{Cube, CubeList, CubeResult};
use tracing::debug;

mod cmip5;
pub mod shared;

/// One correction for one dataset.
///
/// Implementations are stateless; the registry hands out fresh boxed
/// instances on every lookup.
pub trait Fix {
    /// Identifier for logs, `<dataset module>.<fix>`.
    fn name(&self) -> &'static str;

    /// Adjust metadata before any validation or processing sees it. The
    /// default does nothing.
    fn fix_metadata(&self, _cubes: &mut CubeList, _short_name: &str) -> CubeResult<()> {
        Ok(())
    }

    /// Adjust data values. The default does nothing.
    fn fix_data(&self, _cube: &mut Cube) -> CubeResult<()> {
        Ok(())
    }
}

/// Every fix registered for `short_name` of `dataset` within `project`, in
/// application order: dataset-wide fixes first, then the variable's own.
///
/// Unknown projects and datasets have no fixes; that is the normal case,
/// not an error.
pub fn fixes_for(project: &str, dataset: &str, short_name: &str) -> Vec<Box<dyn Fix>> {
    let project = project.replace('-', "_").to_lowercase();
    match project.as_str() {
        "cmip5" => cmip5::fixes(dataset, &short_name.to_lowercase()),
        _ => Vec::new(),
    }
}

/// Run the metadata phase of every registered fix over `cubes`.
pub fn apply_metadata_fixes(
    project: &str,
    dataset: &str,
    short_name: &str,
    cubes: &mut CubeList,
) -> CubeResult<()> {
    for fix in fixes_for(project, dataset, short_name) {
        debug!(
            fix = fix.name(),
            dataset,
            variable = short_name,
            "applying metadata fix"
        );
        fix.fix_metadata(cubes, short_name)?;
    }
    Ok(())
}

/// Run the data phase of every registered fix over `cube`.
pub fn apply_data_fixes(
    project: &str,
    dataset: &str,
    short_name: &str,
    cube: &mut Cube,
) -> CubeResult<()> {
    for fix in fixes_for(project, dataset, short_name) {
        debug!(
            fix = fix.name(),
            dataset,
            variable = short_name,
            "applying data fix"
        );
        fix.fix_data(cube)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_project_and_dataset_have_no_fixes() {
        assert!(fixes_for("CMIP6", "BNU-ESM", "co2").is_empty());
        assert!(fixes_for("CMIP5", "NOT-A-MODEL", "co2").is_empty());
    }

    #[test]
    fn test_dataset_names_match_like_their_files() {
        // Lookup normalizes case and separators the same way for every
        // dataset.
        assert_eq!(fixes_for("CMIP5", "BNU-ESM", "co2").len(), 1);
        assert_eq!(fixes_for("cmip5", "bnu_esm", "co2").len(), 1);
    }
}
