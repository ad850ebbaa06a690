//! Fixes for CMIP5-era datasets, one module per model family.

use crate::Fix;

mod bnu_esm;
mod cesm1_bgc;
mod ec_earth;
mod fgoals_g2;
mod gfdl;
mod hadgem2;
mod miroc_esm;

/// Dispatch on the dataset name, normalized the same way the dataset
/// modules are named: separators become underscores, case is folded.
pub(crate) fn fixes(dataset: &str, short_name: &str) -> Vec<Box<dyn Fix>> {
    let dataset = dataset.replace('-', "_").to_lowercase();
    match dataset.as_str() {
        "bnu_esm" => bnu_esm::fixes(short_name),
        "cesm1_bgc" => cesm1_bgc::fixes(short_name),
        "ec_earth" => ec_earth::fixes(short_name),
        "fgoals_g2" => fgoals_g2::fixes(short_name),
        "gfdl_cm2p1" => gfdl::cm2p1_fixes(short_name),
        "gfdl_cm3" => gfdl::cm3_fixes(short_name),
        "gfdl_esm2m" => gfdl::esm2m_fixes(short_name),
        "hadgem2_cc" | "hadgem2_es" => hadgem2::fixes(short_name),
        "miroc_esm" => miroc_esm::fixes(short_name),
        _ => Vec::new(),
    }
}
