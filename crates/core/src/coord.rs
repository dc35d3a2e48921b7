//! Grid coordinates and shapes.
//!
//! A `Coord` addresses one cell of an N-dimensional grid. A `Shape` is the
//! exclusive per-axis bound of that grid. The bound is a display limit, not a
//! storage limit: stores accept coordinates outside of it.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Ordered tuple of non-negative indices, one per axis.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Coord(Vec<usize>);

impl Coord {
    pub fn new(indices: Vec<usize>) -> Self {
        Self(indices)
    }

    /// Number of axes.
    #[inline]
    pub fn ndim(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn get(&self, axis: usize) -> Option<usize> {
        self.0.get(axis).copied()
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.0
    }

    /// Copy of this coordinate with `axis` replaced by `index`.
    pub fn with_axis(&self, axis: usize, index: usize) -> Self {
        let mut indices = self.0.clone();
        indices[axis] = index;
        Self(indices)
    }

    /// Row and column, if the coordinate has at least two axes.
    pub fn row_col(&self) -> Option<(usize, usize)> {
        match self.0.as_slice() {
            [row, col, ..] => Some((*row, *col)),
            _ => None,
        }
    }
}

impl From<Vec<usize>> for Coord {
    fn from(indices: Vec<usize>) -> Self {
        Self(indices)
    }
}

impl<const N: usize> From<[usize; N]> for Coord {
    fn from(indices: [usize; N]) -> Self {
        Self(indices.to_vec())
    }
}

impl From<(usize, usize)> for Coord {
    fn from((row, col): (usize, usize)) -> Self {
        Self(vec![row, col])
    }
}

impl From<(usize, usize, usize)> for Coord {
    fn from((row, col, tab): (usize, usize, usize)) -> Self {
        Self(vec![row, col, tab])
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (i, index) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{index}")?;
        }
        write!(f, ")")
    }
}

/// Exclusive upper bound of every axis of a grid.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Shape(Vec<usize>);

impl Shape {
    pub fn new(dims: Vec<usize>) -> Self {
        Self(dims)
    }

    #[inline]
    pub fn ndim(&self) -> usize {
        self.0.len()
    }

    pub fn dims(&self) -> &[usize] {
        &self.0
    }

    /// Bound of one axis.
    #[inline]
    pub fn bound(&self, axis: usize) -> Option<usize> {
        self.0.get(axis).copied()
    }

    /// Copy of this shape with `axis` bounded by `bound`.
    pub fn with_bound(&self, axis: usize, bound: usize) -> Self {
        let mut dims = self.0.clone();
        dims[axis] = bound;
        Self(dims)
    }
}

impl From<Vec<usize>> for Shape {
    fn from(dims: Vec<usize>) -> Self {
        Self(dims)
    }
}

impl<const N: usize> From<[usize; N]> for Shape {
    fn from(dims: [usize; N]) -> Self {
        Self(dims.to_vec())
    }
}
