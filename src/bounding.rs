//! Synthetic bounding box injection.
//!
//! Voronoi cells of points on the outer layer of a point set are unbounded.
//! Appending the corners of an enlarged bounding box makes every original
//! cell finite; the corners' own cells are discarded again when the engine
//! output is parsed (see [`crate::diagram`]).

use itertools::Itertools;

use crate::error::{GeometryError, Result};
use crate::points::PointSet;

/// Axis-aligned box, one `[min, max]` interval per dimension.
#[derive(Clone, Debug, PartialEq)]
pub struct BoundingBox {
    pub min: Vec<f64>,
    pub max: Vec<f64>,
}

impl BoundingBox {
    /// Tight per-dimension bounds of a non-empty point set.
    pub fn of(points: &PointSet) -> Result<Self> {
        if points.is_empty() {
            return Err(GeometryError::shape("cannot bound an empty point set"));
        }
        let mut min = vec![f64::INFINITY; points.dim()];
        let mut max = vec![f64::NEG_INFINITY; points.dim()];
        for p in points.iter() {
            for (d, &v) in p.iter().enumerate() {
                min[d] = min[d].min(v);
                max[d] = max[d].max(v);
            }
        }
        Ok(Self { min, max })
    }

    /// Grow every interval by its own width on both sides.
    ///
    /// A zero-width interval stays zero-width.
    #[must_use]
    pub fn expanded(&self) -> Self {
        let (min, max) = self
            .min
            .iter()
            .zip(&self.max)
            .map(|(&lo, &hi)| {
                let width = hi - lo;
                (lo - width, hi + width)
            })
            .unzip();
        Self { min, max }
    }

    #[must_use]
    pub fn dim(&self) -> usize {
        self.min.len()
    }

    /// All `2^D` corners.
    ///
    /// Dimension 0 varies slowest and `min` comes before `max`, so the first
    /// corner is `min` and the last is `max`.
    pub fn corners(&self) -> impl Iterator<Item = Vec<f64>> + '_ {
        self.min
            .iter()
            .zip(&self.max)
            .map(|(&lo, &hi)| [lo, hi])
            .multi_cartesian_product()
    }

    /// True if `point` lies strictly inside on every dimension.
    #[must_use]
    pub fn strictly_contains(&self, point: &[f64]) -> bool {
        point
            .iter()
            .zip(self.min.iter().zip(&self.max))
            .all(|(&v, (&lo, &hi))| lo < v && v < hi)
    }
}

/// A point set with an optional trailing block of synthetic box corners.
#[derive(Clone, Debug)]
pub struct AugmentedPointSet {
    points: PointSet,
    original_count: usize,
    bounds: Option<BoundingBox>,
}

impl AugmentedPointSet {
    /// All points, originals first then synthetic corners.
    #[must_use]
    pub const fn points(&self) -> &PointSet {
        &self.points
    }

    #[must_use]
    pub const fn original_count(&self) -> usize {
        self.original_count
    }

    /// Number of synthetic corners appended: `2^D` or 0.
    #[must_use]
    pub fn synthetic_count(&self) -> usize {
        self.points.len() - self.original_count
    }

    /// The expanded box whose corners were appended, if any.
    #[must_use]
    pub const fn bounds(&self) -> Option<&BoundingBox> {
        self.bounds.as_ref()
    }

    #[must_use]
    pub fn into_points(self) -> PointSet {
        self.points
    }
}

/// Optionally append the `2^D` corners of an expanded bounding box.
///
/// Without augmentation the points are passed through unchanged.
pub fn augment(points: &PointSet, add_bounding_box: bool) -> Result<AugmentedPointSet> {
    let original_count = points.len();
    if !add_bounding_box {
        return Ok(AugmentedPointSet {
            points: points.clone(),
            original_count,
            bounds: None,
        });
    }

    let bounds = BoundingBox::of(points)?.expanded();
    let mut augmented = points.clone();
    for corner in bounds.corners() {
        augmented.push(&corner);
    }
    tracing::debug!(
        original = original_count,
        synthetic = augmented.len() - original_count,
        dim = points.dim(),
        "appended bounding box corners"
    );

    Ok(AugmentedPointSet {
        points: augmented,
        original_count,
        bounds: Some(bounds),
    })
}
