//! Helpers shared between dataset fix modules.

use esmkit_cube::{Coord, Cube, CubeList, CubeResult};
use tracing::debug;

use crate::Fix;

/// Height above ground of near-surface measurements, in metres.
pub const DEFAULT_HEIGHT: f64 = 2.0;

/// Attach a scalar `height` coordinate to `cube`.
///
/// Used for near-surface variables (tas, huss, ...) whose source files
/// dropped the measurement height.
pub fn add_scalar_height_coord(cube: &mut Cube, height: f64) -> CubeResult<()> {
    debug!(height, cube = cube.name(), "adding scalar height coordinate");
    let coord = Coord::scalar("height", height)
        .with_standard_name("height")
        .with_long_name("height")
        .with_units("m")
        .with_positive("up");
    cube.add_coord(coord)
}

/// Rewrite a `<unit> since <origin>` time unit into its canonical spelling,
/// padding partial dates and times: `days since 1-1-1` becomes
/// `days since 0001-01-01 00:00:00`.
///
/// Anything that does not parse as such a unit is returned unchanged;
/// this is a cleanup, not a validator.
pub fn normalize_time_units(units: &str) -> String {
    let Some((unit, origin)) = units.split_once(" since ") else {
        return units.to_string();
    };
    let mut parts = origin.split_whitespace();
    let Some(date) = parts.next() else {
        return units.to_string();
    };
    let time = parts.next();
    if parts.next().is_some() {
        return units.to_string();
    }
    let (Some(date), Some(time)) = (pad_date(date), pad_time(time.unwrap_or("0"))) else {
        return units.to_string();
    };
    format!("{unit} since {date} {time}")
}

fn pad_date(date: &str) -> Option<String> {
    let mut fields = date.split('-');
    let year: u32 = fields.next()?.parse().ok()?;
    let month: u32 = match fields.next() {
        Some(month) => month.parse().ok()?,
        None => 1,
    };
    let day: u32 = match fields.next() {
        Some(day) => day.parse().ok()?,
        None => 1,
    };
    if fields.next().is_some() {
        return None;
    }
    Some(format!("{year:04}-{month:02}-{day:02}"))
}

fn pad_time(time: &str) -> Option<String> {
    let mut fields = time.split(':');
    let hour: u32 = fields.next()?.parse().ok()?;
    let minute: u32 = match fields.next() {
        Some(minute) => minute.parse().ok()?,
        None => 0,
    };
    let second: u32 = match fields.next() {
        Some(second) => second.parse().ok()?,
        None => 0,
    };
    if fields.next().is_some() {
        return None;
    }
    Some(format!("{hour:02}:{minute:02}:{second:02}"))
}

/// Dataset-wide fix that rewrites every cube's time coordinate units into
/// canonical form. Several models publish abbreviated origins that
/// downstream tooling refuses to compare.
pub struct NormalizeTimeUnits;

impl Fix for NormalizeTimeUnits {
    fn name(&self) -> &'static str {
        "shared.normalize_time_units"
    }

    fn fix_metadata(&self, cubes: &mut CubeList, _short_name: &str) -> CubeResult<()> {
        for cube in cubes.iter_mut() {
            if let Some(time) = cube.find_coord_mut("time") {
                time.units = normalize_time_units(&time.units);
            }
        }
        Ok(())
    }
}
