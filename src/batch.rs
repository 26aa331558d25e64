//! Convex hull areas for many point groups in one call.
//!
//! Groups are contiguous ranges of a flat 2D point array described by an
//! index-pointer array: group `g` covers `indptr[g]..indptr[g + 1]`. Every
//! range is validated before any area is computed, so a bad group aborts the
//! whole batch.

use glam::DVec2;
use rayon::prelude::*;

use crate::error::{GeometryError, Result};
use crate::hull::hull_area;
use crate::points::PointSet;

/// Group count at which the batch switches to the rayon pool.
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 64;

#[derive(Clone, Debug)]
pub struct HullBatchOptions {
    /// Batches with at least this many groups run in parallel.
    pub parallel_threshold: usize,
}

impl Default for HullBatchOptions {
    fn default() -> Self {
        Self {
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
        }
    }
}

impl HullBatchOptions {
    #[must_use]
    pub const fn with_parallel_threshold(mut self, threshold: usize) -> Self {
        self.parallel_threshold = threshold;
        self
    }

    /// Never use the thread pool.
    #[must_use]
    pub const fn sequential() -> Self {
        Self {
            parallel_threshold: usize::MAX,
        }
    }
}

/// Reusable batch configuration.
#[derive(Clone, Debug, Default)]
pub struct HullBatch {
    options: HullBatchOptions,
}

impl HullBatch {
    #[must_use]
    pub const fn with_options(options: HullBatchOptions) -> Self {
        Self { options }
    }

    /// One hull area per group.
    ///
    /// `indptr = None` means a single group spanning all points.
    pub fn areas(&self, points: &PointSet, indptr: Option<&[usize]>) -> Result<Vec<f64>> {
        let points = points.to_dvec2()?;
        let groups = match indptr {
            Some(indptr) => group_ranges(indptr, points.len())?,
            None => vec![(0, points.len())],
        };
        Ok(self.areas_of(&points, &groups))
    }

    /// Like [`HullBatch::areas`] for callers that already hold `DVec2`s.
    pub fn areas_2d(&self, points: &[DVec2], indptr: &[usize]) -> Result<Vec<f64>> {
        let groups = group_ranges(indptr, points.len())?;
        Ok(self.areas_of(points, &groups))
    }

    fn areas_of(&self, points: &[DVec2], groups: &[(usize, usize)]) -> Vec<f64> {
        let parallel = groups.len() >= self.options.parallel_threshold;
        tracing::debug!(
            groups = groups.len(),
            points = points.len(),
            parallel,
            "computing hull areas"
        );
        if parallel {
            groups
                .par_iter()
                .map(|&(start, end)| hull_area(&points[start..end]))
                .collect()
        } else {
            groups
                .iter()
                .map(|&(start, end)| hull_area(&points[start..end]))
                .collect()
        }
    }
}

/// Validate an index-pointer array into `(start, end)` pairs.
fn group_ranges(indptr: &[usize], len: usize) -> Result<Vec<(usize, usize)>> {
    if indptr.is_empty() {
        return Err(GeometryError::shape(
            "index pointer array needs at least one entry",
        ));
    }
    indptr
        .windows(2)
        .enumerate()
        .map(|(group, w)| {
            let (start, end) = (w[0], w[1]);
            if start > end || end > len {
                return Err(GeometryError::Range {
                    group,
                    start,
                    end,
                    len,
                });
            }
            Ok((start, end))
        })
        .collect()
}

/// Hull area per group with default options.
pub fn convex_hull_areas(points: &PointSet, indptr: Option<&[usize]>) -> Result<Vec<f64>> {
    HullBatch::default().areas(points, indptr)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    fn points(coords: &[[f64; 2]]) -> PointSet {
        PointSet::from_rows(coords).unwrap()
    }

    #[test]
    fn test_single_group_default() {
        let p = points(&[[0.0, 0.0], [4.0, 0.0], [4.0, 3.0], [0.0, 3.0]]);
        assert_eq!(convex_hull_areas(&p, None).unwrap(), vec![12.0]);
    }

    #[test]
    fn test_collinear_group() {
        let p = points(&[[0.0, 0.0], [1.0, 0.0], [2.0, 0.0]]);
        assert_eq!(convex_hull_areas(&p, None).unwrap(), vec![0.0]);
    }

    #[test]
    fn test_two_triangles() {
        let p = points(&[
            [0.0, 0.0],
            [1.0, 0.0],
            [0.0, 1.0],
            [5.0, 5.0],
            [6.0, 5.0],
            [5.0, 6.0],
        ]);
        assert_eq!(
            convex_hull_areas(&p, Some(&[0, 3, 6])).unwrap(),
            vec![0.5, 0.5]
        );
    }

    #[test]
    fn test_empty_and_partial_groups() {
        let p = points(&[[0.0, 0.0], [2.0, 0.0], [2.0, 2.0], [0.0, 2.0], [9.0, 9.0]]);
        // Trailing points past the last pointer are ignored.
        assert_eq!(
            convex_hull_areas(&p, Some(&[0, 0, 4, 4])).unwrap(),
            vec![0.0, 4.0, 0.0]
        );
        assert!(convex_hull_areas(&p, Some(&[2])).unwrap().is_empty());
    }

    #[test]
    fn test_range_errors_name_the_group() {
        let p = points(&[[0.0, 0.0], [1.0, 0.0], [0.0, 1.0]]);
        match convex_hull_areas(&p, Some(&[0, 2, 1])) {
            Err(GeometryError::Range { group, start, end, .. }) => {
                assert_eq!((group, start, end), (1, 2, 1));
            }
            other => panic!("expected range error, got {other:?}"),
        }
        match convex_hull_areas(&p, Some(&[0, 3, 4])) {
            Err(GeometryError::Range { group, .. }) => assert_eq!(group, 1),
            other => panic!("expected range error, got {other:?}"),
        }
    }

    #[test]
    fn test_shape_errors() {
        let p3 = PointSet::from_rows([[0.0, 0.0, 0.0]]).unwrap();
        assert!(matches!(
            convex_hull_areas(&p3, None),
            Err(GeometryError::Shape { .. })
        ));
        let p = points(&[[0.0, 0.0]]);
        assert!(matches!(
            convex_hull_areas(&p, Some(&[])),
            Err(GeometryError::Shape { .. })
        ));
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let pts: Vec<DVec2> = (0..4000)
            .map(|_| DVec2::new(rng.random_range(-10.0..10.0), rng.random_range(-10.0..10.0)))
            .collect();
        let mut indptr = vec![0];
        while *indptr.last().unwrap() < pts.len() {
            let next = (indptr.last().unwrap() + rng.random_range(0..25)).min(pts.len());
            indptr.push(next);
        }

        let sequential = HullBatch::with_options(HullBatchOptions::sequential())
            .areas_2d(&pts, &indptr)
            .unwrap();
        let parallel =
            HullBatch::with_options(HullBatchOptions::default().with_parallel_threshold(1))
                .areas_2d(&pts, &indptr)
                .unwrap();

        assert_eq!(sequential.len(), indptr.len() - 1);
        assert!(
            sequential
                .iter()
                .zip(&parallel)
                .all(|(a, b)| a.to_bits() == b.to_bits())
        );
    }
}
