//! Row-major point storage shared by the Voronoi and hull components.

use glam::DVec2;

use crate::error::{GeometryError, Result};

/// An ordered set of `D`-dimensional points stored in one flat buffer.
///
/// The dimension is fixed at construction and is always at least 2.
#[derive(Clone, Debug, PartialEq)]
pub struct PointSet {
    coords: Vec<f64>,
    dim: usize,
}

impl PointSet {
    /// Build a point set from a row-major coordinate buffer.
    pub fn from_flat(coords: Vec<f64>, dim: usize) -> Result<Self> {
        if dim < 2 {
            return Err(GeometryError::shape(format!(
                "points must have at least 2 dimensions, got {dim}"
            )));
        }
        if coords.len() % dim != 0 {
            return Err(GeometryError::shape(format!(
                "buffer of {} values is not a multiple of dimension {dim}",
                coords.len()
            )));
        }
        Ok(Self { coords, dim })
    }

    /// Build a point set from individual coordinate rows.
    ///
    /// Every row must have the same length. An empty iterator needs an
    /// explicit dimension, so use [`PointSet::empty`] instead.
    pub fn from_rows<R, I>(rows: I) -> Result<Self>
    where
        R: AsRef<[f64]>,
        I: IntoIterator<Item = R>,
    {
        let mut coords = Vec::new();
        let mut dim = None;
        for (i, row) in rows.into_iter().enumerate() {
            let row = row.as_ref();
            match dim {
                None => dim = Some(row.len()),
                Some(d) if d != row.len() => {
                    return Err(GeometryError::shape(format!(
                        "point {i} has {} coordinates, expected {d}",
                        row.len()
                    )));
                }
                Some(_) => {}
            }
            coords.extend_from_slice(row);
        }
        let dim = dim.ok_or_else(|| GeometryError::shape("no points to infer dimension from"))?;
        Self::from_flat(coords, dim)
    }

    /// An empty point set of the given dimension.
    pub fn empty(dim: usize) -> Result<Self> {
        Self::from_flat(Vec::new(), dim)
    }

    /// Build a 2D point set.
    #[must_use]
    pub fn from_2d(points: &[DVec2]) -> Self {
        Self {
            coords: points.iter().flat_map(|p| [p.x, p.y]).collect(),
            dim: 2,
        }
    }

    #[inline]
    #[must_use]
    pub const fn dim(&self) -> usize {
        self.dim
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.coords.len() / self.dim
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.coords.is_empty()
    }

    /// Coordinates of the `i`-th point.
    ///
    /// # Panics
    /// Panics if `i >= self.len()`.
    #[inline]
    #[must_use]
    pub fn point(&self, i: usize) -> &[f64] {
        &self.coords[i * self.dim..(i + 1) * self.dim]
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = &[f64]> {
        self.coords.chunks_exact(self.dim)
    }

    /// The raw row-major buffer.
    #[must_use]
    pub fn as_flat(&self) -> &[f64] {
        &self.coords
    }

    /// View a 2D point set as `DVec2`s.
    pub fn to_dvec2(&self) -> Result<Vec<DVec2>> {
        if self.dim != 2 {
            return Err(GeometryError::shape(format!(
                "expected 2D points, got dimension {}",
                self.dim
            )));
        }
        Ok(self
            .coords
            .chunks_exact(2)
            .map(|c| DVec2::new(c[0], c[1]))
            .collect())
    }

    pub(crate) fn push(&mut self, point: &[f64]) {
        debug_assert_eq!(point.len(), self.dim);
        self.coords.extend_from_slice(point);
    }
}
