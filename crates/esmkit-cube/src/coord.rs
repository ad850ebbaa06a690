//! Named coordinates attached to a [`crate::Cube`].
//!
//! A coordinate either describes one dimension of the cube's data (its
//! points run along that axis) or is scalar, carrying a single value with
//! no axis of its own: a reference height, a region label's index, and so
//! on.

use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

/// One coordinate of a cube.
///
/// The three name fields mirror the netCDF/CF convention: any of them may
/// be empty, and [`Coord::name`] picks the most specific one available for
/// display. Units are plain labels; nothing here converts values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Coord {
    pub standard_name: String,
    pub long_name: String,
    pub var_name: String,
    pub units: String,
    /// Sign convention (`up` / `down`), empty when unspecified.
    pub positive: String,
    pub points: Array1<f64>,
    /// Cell bounds, one `[lower, upper]` row per point.
    pub bounds: Option<Array2<f64>>,
    /// Index of the data dimension these points run along, or `None` for a
    /// scalar coordinate. Maintained by the owning cube when dimensions
    /// change shape.
    pub(crate) dim: Option<usize>,
}

impl Coord {
    /// A coordinate for data dimension `dim`.
    pub fn dimensional(var_name: impl Into<String>, dim: usize, points: Array1<f64>) -> Self {
        Self {
            var_name: var_name.into(),
            points,
            dim: Some(dim),
            ..Self::default()
        }
    }

    /// A scalar coordinate holding a single value.
    pub fn scalar(var_name: impl Into<String>, value: f64) -> Self {
        Self {
            var_name: var_name.into(),
            points: Array1::from_elem(1, value),
            dim: None,
            ..Self::default()
        }
    }

    pub fn with_standard_name(mut self, standard_name: impl Into<String>) -> Self {
        self.standard_name = standard_name.into();
        self
    }

    pub fn with_long_name(mut self, long_name: impl Into<String>) -> Self {
        self.long_name = long_name.into();
        self
    }

    pub fn with_units(mut self, units: impl Into<String>) -> Self {
        self.units = units.into();
        self
    }

    pub fn with_positive(mut self, positive: impl Into<String>) -> Self {
        self.positive = positive.into();
        self
    }

    pub fn with_bounds(mut self, bounds: Array2<f64>) -> Self {
        self.bounds = Some(bounds);
        self
    }

    /// The dimension index this coordinate describes, `None` when scalar.
    pub fn dim(&self) -> Option<usize> {
        self.dim
    }

    pub fn is_scalar(&self) -> bool {
        self.dim.is_none()
    }

    /// The most specific non-empty name: standard name, then long name,
    /// then variable name.
    pub fn name(&self) -> &str {
        [&self.standard_name, &self.long_name, &self.var_name]
            .into_iter()
            .find(|name| !name.is_empty())
            .map(String::as_str)
            .unwrap_or("unknown")
    }

    /// True when `name` equals any of the three name fields.
    pub fn matches(&self, name: &str) -> bool {
        self.standard_name == name || self.long_name == name || self.var_name == name
    }

    /// Clamp points and bounds into `[min, max]`.
    pub fn clamp(&mut self, min: f64, max: f64) {
        self.points.mapv_inplace(|p| p.clamp(min, max));
        if let Some(bounds) = &mut self.bounds {
            bounds.mapv_inplace(|b| b.clamp(min, max));
        }
    }
}

#[cfg(test)]
mod tests {
    use ndarray::{array, Array1};

    use super::*;

    #[test]
    fn test_name_prefers_the_most_specific_field() {
        let coord = Coord::dimensional("lat", 0, Array1::zeros(3))
            .with_standard_name("latitude")
            .with_long_name("Latitude");
        assert_eq!(coord.name(), "latitude");

        let coord = Coord::dimensional("lat", 0, Array1::zeros(3)).with_long_name("Latitude");
        assert_eq!(coord.name(), "Latitude");

        let coord = Coord::dimensional("lat", 0, Array1::zeros(3));
        assert_eq!(coord.name(), "lat");

        assert_eq!(Coord::default().name(), "unknown");
    }

    #[test]
    fn test_matches_any_name_field() {
        let coord = Coord::dimensional("plev", 1, Array1::zeros(2)).with_long_name("AR5PL35");
        assert!(coord.matches("AR5PL35"));
        assert!(coord.matches("plev"));
        assert!(!coord.matches("air_pressure"));
    }

    #[test]
    fn test_clamp_limits_points_and_bounds() {
        let mut coord = Coord::dimensional("lat", 0, array![-90.125, 0.0, 90.125])
            .with_bounds(array![[-90.25, -90.0], [-0.5, 0.5], [90.0, 90.25]]);
        coord.clamp(-90.0, 90.0);
        assert_eq!(coord.points, array![-90.0, 0.0, 90.0]);
        assert_eq!(
            coord.bounds.unwrap(),
            array![[-90.0, -90.0], [-0.5, 0.5], [90.0, 90.0]]
        );
    }

    #[test]
    fn test_scalar_coordinates_have_no_dimension() {
        let coord = Coord::scalar("height", 2.0)
            .with_units("m")
            .with_positive("up");
        assert!(coord.is_scalar());
        assert_eq!(coord.dim(), None);
        assert_eq!(coord.points, array![2.0]);
    }
}
