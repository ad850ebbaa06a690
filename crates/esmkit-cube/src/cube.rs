//! The cube: an n-dimensional data array, its optional mask, and the
//! metadata and coordinates that give the numbers meaning.

use ndarray::{Array1, ArrayD, Axis, Zip};
use serde::{Deserialize, Serialize};

use crate::coord::Coord;
use crate::error::{CubeError, CubeResult};

/// Identifying metadata for a cube.
///
/// All fields are plain strings; an empty string means "not recorded".
/// Units are labels, not parsed quantities; a fix that corrects units just
/// rewrites the label.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CubeMetadata {
    pub standard_name: String,
    pub long_name: String,
    pub var_name: String,
    pub units: String,
}

impl CubeMetadata {
    /// The most specific non-empty name: standard name, then long name,
    /// then variable name.
    pub fn name(&self) -> &str {
        [&self.standard_name, &self.long_name, &self.var_name]
            .into_iter()
            .find(|name| !name.is_empty())
            .map(String::as_str)
            .unwrap_or("unknown")
    }
}

/// A data array with a mask, metadata, and named coordinates.
///
/// The mask marks invalid points (`true` = masked) and always has the same
/// shape as the data; `None` means nothing is masked. Coordinates are owned
/// by the cube so that operations which change the data's dimensionality
/// can keep them consistent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cube {
    pub data: ArrayD<f64>,
    pub mask: Option<ArrayD<bool>>,
    pub metadata: CubeMetadata,
    coords: Vec<Coord>,
}

impl Cube {
    pub fn new(var_name: impl Into<String>, data: ArrayD<f64>) -> Self {
        Self {
            data,
            mask: None,
            metadata: CubeMetadata {
                var_name: var_name.into(),
                ..CubeMetadata::default()
            },
            coords: Vec::new(),
        }
    }

    pub fn with_standard_name(mut self, standard_name: impl Into<String>) -> Self {
        self.metadata.standard_name = standard_name.into();
        self
    }

    pub fn with_long_name(mut self, long_name: impl Into<String>) -> Self {
        self.metadata.long_name = long_name.into();
        self
    }

    pub fn with_units(mut self, units: impl Into<String>) -> Self {
        self.metadata.units = units.into();
        self
    }

    /// Builder form of [`Cube::add_coord`].
    pub fn with_coord(mut self, coord: Coord) -> CubeResult<Self> {
        self.add_coord(coord)?;
        Ok(self)
    }

    pub fn name(&self) -> &str {
        self.metadata.name()
    }

    pub fn shape(&self) -> &[usize] {
        self.data.shape()
    }

    pub fn ndim(&self) -> usize {
        self.data.ndim()
    }

    /// Attach a coordinate, checking that a dimensional coordinate actually
    /// fits the dimension it claims to describe.
    pub fn add_coord(&mut self, coord: Coord) -> CubeResult<()> {
        self.check_coord(&coord)?;
        self.coords.push(coord);
        Ok(())
    }

    fn check_coord(&self, coord: &Coord) -> CubeResult<()> {
        if let Some(dim) = coord.dim() {
            let ndim = self.ndim();
            if dim >= ndim {
                return Err(CubeError::DimensionOutOfRange {
                    cube: self.name().to_string(),
                    dim,
                    ndim,
                });
            }
            let len = self.shape()[dim];
            if coord.points.len() != len {
                return Err(CubeError::CoordinateLengthMismatch {
                    coordinate: coord.name().to_string(),
                    points: coord.points.len(),
                    dim,
                    len,
                });
            }
        }
        Ok(())
    }

    pub fn coords(&self) -> &[Coord] {
        &self.coords
    }

    /// The first coordinate matching `name` on any of its name fields.
    pub fn find_coord(&self, name: &str) -> Option<&Coord> {
        self.coords.iter().find(|coord| coord.matches(name))
    }

    pub fn find_coord_mut(&mut self, name: &str) -> Option<&mut Coord> {
        self.coords.iter_mut().find(|coord| coord.matches(name))
    }

    /// Like [`Cube::find_coord`] but a missing coordinate is an error.
    pub fn coord(&self, name: &str) -> CubeResult<&Coord> {
        self.find_coord(name)
            .ok_or_else(|| self.no_such_coord(name))
    }

    pub fn coord_mut(&mut self, name: &str) -> CubeResult<&mut Coord> {
        match self.coords.iter().position(|coord| coord.matches(name)) {
            Some(index) => Ok(&mut self.coords[index]),
            None => Err(self.no_such_coord(name)),
        }
    }

    /// Detach and return the coordinate matching `name`.
    pub fn remove_coord(&mut self, name: &str) -> CubeResult<Coord> {
        match self.coords.iter().position(|coord| coord.matches(name)) {
            Some(index) => Ok(self.coords.remove(index)),
            None => Err(self.no_such_coord(name)),
        }
    }

    /// Swap in `coord` for the existing coordinate it names, keeping its
    /// position in the coordinate list.
    pub fn replace_coord(&mut self, coord: Coord) -> CubeResult<()> {
        self.check_coord(&coord)?;
        match self.coords.iter().position(|c| c.matches(coord.name())) {
            Some(index) => {
                self.coords[index] = coord;
                Ok(())
            }
            None => Err(self.no_such_coord(coord.name())),
        }
    }

    /// Clamp the named coordinate's points and bounds into `[min, max]`.
    pub fn clamp_coord(&mut self, name: &str, min: f64, max: f64) -> CubeResult<()> {
        self.coord_mut(name)?.clamp(min, max);
        Ok(())
    }

    fn no_such_coord(&self, name: &str) -> CubeError {
        CubeError::CoordinateNotFound {
            cube: self.name().to_string(),
            coordinate: name.to_string(),
        }
    }

    /// Multiply every data point by `factor`. Metadata and mask are left
    /// untouched.
    pub fn scale(&mut self, factor: f64) {
        self.data *= factor;
    }

    /// Add `delta` to every data point. Metadata and mask are left
    /// untouched.
    pub fn offset(&mut self, delta: f64) {
        self.data += delta;
    }

    /// Mask every point exactly equal to `value`, keeping anything already
    /// masked. Comparison is bitwise-exact, which is what sentinel fill
    /// values need.
    pub fn mask_equal(&mut self, value: f64) {
        self.mask_where(|v| v == value);
    }

    /// Mask every point for which `pred` holds, keeping anything already
    /// masked.
    pub fn mask_where(&mut self, pred: impl Fn(f64) -> bool) {
        let hits = self.data.mapv(pred);
        match &mut self.mask {
            Some(mask) => {
                Zip::from(mask).and(&hits).for_each(|m, &hit| *m = *m || hit);
            }
            None => self.mask = Some(hits),
        }
    }

    /// The number of masked points.
    pub fn masked_count(&self) -> usize {
        self.mask
            .as_ref()
            .map_or(0, |mask| mask.iter().filter(|&&m| m).count())
    }

    /// Extract the hyperslab at `index` along dimension `dim`, dropping
    /// that dimension.
    ///
    /// The coordinate that described the dropped dimension survives as a
    /// scalar holding the selected point; coordinates on later dimensions
    /// shift down by one.
    pub fn select(&self, dim: usize, index: usize) -> CubeResult<Cube> {
        let ndim = self.ndim();
        if dim >= ndim {
            return Err(CubeError::DimensionOutOfRange {
                cube: self.name().to_string(),
                dim,
                ndim,
            });
        }
        let len = self.shape()[dim];
        if index >= len {
            return Err(CubeError::IndexOutOfRange {
                cube: self.name().to_string(),
                dim,
                index,
                len,
            });
        }

        let data = self.data.index_axis(Axis(dim), index).to_owned();
        let mask = self
            .mask
            .as_ref()
            .map(|mask| mask.index_axis(Axis(dim), index).to_owned());

        let mut coords = Vec::with_capacity(self.coords.len());
        for coord in &self.coords {
            let mut coord = coord.clone();
            match coord.dim {
                Some(d) if d == dim => {
                    let Some(point) = coord.points.get(index).copied() else {
                        continue;
                    };
                    coord.points = Array1::from_elem(1, point);
                    coord.bounds = coord
                        .bounds
                        .map(|bounds| bounds.slice(ndarray::s![index..index + 1, ..]).to_owned());
                    coord.dim = None;
                }
                Some(d) if d > dim => coord.dim = Some(d - 1),
                _ => {}
            }
            coords.push(coord);
        }

        Ok(Cube {
            data,
            mask,
            metadata: self.metadata.clone(),
            coords,
        })
    }

    /// Element-wise sum of two same-shaped cubes. Masks combine as a
    /// union; metadata and coordinates come from `self`.
    pub fn add(&self, other: &Cube) -> CubeResult<Cube> {
        if self.data.shape() != other.data.shape() {
            return Err(CubeError::ShapeMismatch {
                left: self.data.shape().to_vec(),
                right: other.data.shape().to_vec(),
            });
        }
        Ok(Cube {
            data: &self.data + &other.data,
            mask: union_masks(self.mask.as_ref(), other.mask.as_ref()),
            metadata: self.metadata.clone(),
            coords: self.coords.clone(),
        })
    }

    /// Multiply in place by another cube, broadcasting `other` against this
    /// cube's shape (trailing dimensions must line up). `other`'s mask, if
    /// any, is broadcast and unioned in.
    pub fn multiply_by(&mut self, other: &Cube) -> CubeResult<()> {
        let shape_mismatch = || CubeError::ShapeMismatch {
            left: self.data.shape().to_vec(),
            right: other.data.shape().to_vec(),
        };
        let rhs = other
            .data
            .broadcast(self.data.raw_dim())
            .ok_or_else(shape_mismatch)?;
        let data = &self.data * &rhs;

        if let Some(other_mask) = &other.mask {
            let rhs_mask = other_mask
                .broadcast(self.data.raw_dim())
                .ok_or_else(shape_mismatch)?
                .to_owned();
            self.mask = union_masks(self.mask.as_ref(), Some(&rhs_mask));
        }
        self.data = data;
        Ok(())
    }
}

fn union_masks(a: Option<&ArrayD<bool>>, b: Option<&ArrayD<bool>>) -> Option<ArrayD<bool>> {
    match (a, b) {
        (None, None) => None,
        (Some(mask), None) | (None, Some(mask)) => Some(mask.clone()),
        (Some(a), Some(b)) => Some(a | b),
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use ndarray::{array, Array1, ArrayD};

    use super::*;

    fn cube_3d() -> Cube {
        // (time: 2, lev: 2, lat: 3)
        let data = ArrayD::from_shape_vec(
            vec![2, 2, 3],
            (0..12).map(f64::from).collect(),
        )
        .unwrap();
        Cube::new("ta", data)
            .with_units("K")
            .with_coord(Coord::dimensional("time", 0, array![0.0, 1.0]).with_standard_name("time"))
            .unwrap()
            .with_coord(
                Coord::dimensional("lev", 1, array![1000.0, 850.0])
                    .with_standard_name("air_pressure"),
            )
            .unwrap()
            .with_coord(
                Coord::dimensional("lat", 2, array![-45.0, 0.0, 45.0])
                    .with_standard_name("latitude"),
            )
            .unwrap()
    }

    #[test]
    fn test_scale_and_offset_leave_metadata_alone() {
        let mut cube = Cube::new("tos", array![[1.0, 2.0]].into_dyn()).with_units("K");
        cube.scale(100.0);
        cube.offset(0.5);
        assert_relative_eq!(cube.data[[0, 1]], 200.5);
        assert_eq!(cube.metadata.units, "K");
    }

    #[test]
    fn test_mask_equal_unions_with_existing_mask() {
        let mut cube = Cube::new("gpp", array![1.0e33, 2.0, 3.0].into_dyn());
        cube.mask_equal(3.0);
        cube.mask_equal(1.0e33);
        let mask = cube.mask.as_ref().unwrap();
        assert_eq!(mask.as_slice().unwrap(), &[true, false, true]);
        assert_eq!(cube.masked_count(), 2);
        // Data itself is untouched.
        assert_relative_eq!(cube.data[[0]], 1.0e33);
    }

    #[test]
    fn test_select_drops_the_dimension_and_reindexes_coords() {
        let cube = cube_3d();
        let surface = cube.select(1, 0).unwrap();

        assert_eq!(surface.shape(), &[2, 3]);
        assert_relative_eq!(surface.data[[1, 2]], 8.0); // was [1, 0, 2]

        let time = surface.coord("time").unwrap();
        assert_eq!(time.dim(), Some(0));
        let lat = surface.coord("latitude").unwrap();
        assert_eq!(lat.dim(), Some(1));

        // The selected level survives as a scalar coordinate.
        let lev = surface.coord("air_pressure").unwrap();
        assert!(lev.is_scalar());
        assert_eq!(lev.points, array![1000.0]);
    }

    #[test]
    fn test_select_checks_its_arguments() {
        let cube = cube_3d();
        assert!(matches!(
            cube.select(7, 0),
            Err(CubeError::DimensionOutOfRange { dim: 7, .. })
        ));
        assert!(matches!(
            cube.select(1, 9),
            Err(CubeError::IndexOutOfRange { index: 9, .. })
        ));
    }

    #[test]
    fn test_add_requires_matching_shapes() {
        let a = Cube::new("flxt", array![1.0, 2.0].into_dyn());
        let b = Cube::new("flxs", array![10.0, 20.0].into_dyn());
        let sum = a.add(&b).unwrap();
        assert_eq!(sum.data.as_slice().unwrap(), &[11.0, 22.0]);
        assert_eq!(sum.metadata.var_name, "flxt");

        let c = Cube::new("flxs", array![1.0, 2.0, 3.0].into_dyn());
        assert!(matches!(a.add(&c), Err(CubeError::ShapeMismatch { .. })));
    }

    #[test]
    fn test_add_unions_masks() {
        let mut a = Cube::new("a", array![1.0, 5.0].into_dyn());
        a.mask_equal(1.0);
        let mut b = Cube::new("b", array![3.0, 7.0].into_dyn());
        b.mask_equal(7.0);
        let sum = a.add(&b).unwrap();
        assert_eq!(sum.mask.unwrap().as_slice().unwrap(), &[true, true]);
    }

    #[test]
    fn test_multiply_by_broadcasts_trailing_dimensions() {
        let mut cube = cube_3d(); // (2, 2, 3)
        let fraction = Cube::new(
            "sftlf",
            array![[0.0, 0.5, 1.0], [1.0, 1.0, 1.0]].into_dyn(),
        );
        // (2, 3) broadcasts against (2, 2, 3)
        cube.multiply_by(&fraction).unwrap();
        assert_relative_eq!(cube.data[[0, 0, 1]], 0.5);
        assert_relative_eq!(cube.data[[1, 1, 0]], 9.0);

        let bad = Cube::new("sftlf", Array1::zeros(4).into_dyn());
        assert!(matches!(
            cube.multiply_by(&bad),
            Err(CubeError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn test_mask_where_takes_a_predicate() {
        let mut cube = Cube::new("pr", array![-1.0, 0.0, 2.0].into_dyn());
        cube.mask_where(|v| v < 0.0);
        assert_eq!(cube.masked_count(), 1);
        assert!(cube.mask.as_ref().unwrap()[[0]]);
    }

    #[test]
    fn test_remove_and_replace_coord() {
        let mut cube = cube_3d();

        let removed = cube.remove_coord("time").unwrap();
        assert_eq!(removed.standard_name, "time");
        assert!(cube.find_coord("time").is_none());

        let relabeled = Coord::dimensional("lev", 1, array![100000.0, 85000.0])
            .with_standard_name("air_pressure")
            .with_units("Pa");
        cube.replace_coord(relabeled).unwrap();
        let lev = cube.coord("air_pressure").unwrap();
        assert_eq!(lev.units, "Pa");
        assert_eq!(lev.points, array![100000.0, 85000.0]);

        let unknown = Coord::dimensional("lon", 2, array![0.0, 120.0, 240.0]);
        assert!(matches!(
            cube.replace_coord(unknown),
            Err(CubeError::CoordinateNotFound { .. })
        ));
    }

    #[test]
    fn test_clamp_coord_by_name() {
        let mut cube = cube_3d();
        cube.coord_mut("latitude").unwrap().points = array![-95.0, 0.0, 95.0];

        cube.clamp_coord("latitude", -90.0, 90.0).unwrap();

        assert_eq!(
            cube.coord("latitude").unwrap().points,
            array![-90.0, 0.0, 90.0]
        );
        assert!(cube.clamp_coord("depth", 0.0, 1.0).is_err());
    }

    #[test]
    fn test_coord_lookup_reports_the_cube_name() {
        let cube = cube_3d();
        let err = cube.coord("longitude").unwrap_err();
        assert!(matches!(
            err,
            CubeError::CoordinateNotFound { cube, coordinate }
                if cube == "ta" && coordinate == "longitude"
        ));
    }

    #[test]
    fn test_add_coord_validates_dimensions() {
        let mut cube = Cube::new("tas", array![[1.0, 2.0]].into_dyn());
        let err = cube
            .add_coord(Coord::dimensional("lat", 5, Array1::zeros(2)))
            .unwrap_err();
        assert!(matches!(err, CubeError::DimensionOutOfRange { .. }));

        let err = cube
            .add_coord(Coord::dimensional("lat", 1, Array1::zeros(3)))
            .unwrap_err();
        assert!(matches!(err, CubeError::CoordinateLengthMismatch { .. }));

        cube.add_coord(Coord::scalar("height", 2.0)).unwrap();
        assert!(cube.find_coord("height").is_some());
    }
}
