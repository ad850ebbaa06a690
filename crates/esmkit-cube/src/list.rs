//! An ordered collection of cubes, as loaded from one file or assembled
//! for a derivation.

use serde::{Deserialize, Serialize};

use crate::cube::Cube;
use crate::error::{CubeError, CubeResult};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CubeList(pub Vec<Cube>);

impl CubeList {
    pub fn new(cubes: Vec<Cube>) -> Self {
        Self(cubes)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn push(&mut self, cube: Cube) {
        self.0.push(cube);
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Cube> {
        self.0.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Cube> {
        self.0.iter_mut()
    }

    /// The cube whose `var_name` is `var_name`, if there is exactly one.
    pub fn find_var_name(&self, var_name: &str) -> Option<&Cube> {
        let mut matches = self
            .0
            .iter()
            .filter(|cube| cube.metadata.var_name == var_name);
        match (matches.next(), matches.next()) {
            (Some(cube), None) => Some(cube),
            _ => None,
        }
    }

    /// The cube whose `var_name` is `var_name`. Zero or several matches are
    /// an error; callers rely on the match being unambiguous.
    pub fn extract_var_name(&self, var_name: &str) -> CubeResult<&Cube> {
        let mut matches = self
            .0
            .iter()
            .filter(|cube| cube.metadata.var_name == var_name);
        match (matches.next(), matches.next()) {
            (Some(cube), None) => Ok(cube),
            (None, _) => Err(CubeError::ConstraintMismatch {
                var_name: var_name.to_string(),
                count: 0,
            }),
            (Some(_), Some(_)) => Err(CubeError::ConstraintMismatch {
                var_name: var_name.to_string(),
                count: self.count_matching(var_name),
            }),
        }
    }

    /// Mutable form of [`CubeList::extract_var_name`].
    pub fn extract_var_name_mut(&mut self, var_name: &str) -> CubeResult<&mut Cube> {
        let count = self.count_matching(var_name);
        let index = self
            .0
            .iter()
            .position(|cube| cube.metadata.var_name == var_name);
        match index {
            Some(index) if count == 1 => Ok(&mut self.0[index]),
            _ => Err(CubeError::ConstraintMismatch {
                var_name: var_name.to_string(),
                count,
            }),
        }
    }

    fn count_matching(&self, var_name: &str) -> usize {
        self.0
            .iter()
            .filter(|cube| cube.metadata.var_name == var_name)
            .count()
    }
}

impl From<Vec<Cube>> for CubeList {
    fn from(cubes: Vec<Cube>) -> Self {
        Self(cubes)
    }
}

impl IntoIterator for CubeList {
    type Item = Cube;
    type IntoIter = std::vec::IntoIter<Cube>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a CubeList {
    type Item = &'a Cube;
    type IntoIter = std::slice::Iter<'a, Cube>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl<'a> IntoIterator for &'a mut CubeList {
    type Item = &'a mut Cube;
    type IntoIter = std::slice::IterMut<'a, Cube>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter_mut()
    }
}
