//! Voronoi cell/vertex incidence for a point set.
//!
//! Ties the pieces together: optional bounding augmentation, one engine run,
//! and parsing of the engine output with the synthetic cells trimmed away.

use tracing::Span;

use crate::bounding::{BoundingBox, augment};
use crate::diagram::{Diagram, parse_diagram};
use crate::engine::{DiagramEngine, point_file};
use crate::error::{GeometryError, Result};
use crate::points::PointSet;
use crate::sparse::IncidenceMatrix;

/// Settings for one Voronoi computation.
#[derive(Clone, Debug)]
pub struct VoronoiOptions {
    /// Surround the input with `2^D` synthetic corners so every cell is
    /// bounded.
    pub add_bounding_box: bool,
    /// Span all events of the computation are recorded in.
    pub span: Span,
}

impl Default for VoronoiOptions {
    fn default() -> Self {
        Self {
            add_bounding_box: false,
            span: Span::none(),
        }
    }
}

impl VoronoiOptions {
    #[must_use]
    pub fn with_bounding_box(mut self, add_bounding_box: bool) -> Self {
        self.add_bounding_box = add_bounding_box;
        self
    }

    /// Attach the caller's diagnostic context.
    #[must_use]
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }
}

/// Voronoi vertices and which of them bound each input point's cell.
#[derive(Clone, Debug)]
pub struct Voronoi {
    diagram: Diagram,
    bounds: Option<BoundingBox>,
}

impl Voronoi {
    /// Run `engine` on `points` and decode its output.
    pub fn compute<E>(points: &PointSet, options: &VoronoiOptions, engine: &E) -> Result<Self>
    where
        E: DiagramEngine + ?Sized,
    {
        let _entered = options.span.enter();

        let augmented = augment(points, options.add_bounding_box)?;
        let synthetic = augmented.synthetic_count();
        let output = engine.voronoi(&point_file(augmented.points()))?;
        let diagram = parse_diagram(&output, synthetic)?;

        if diagram.dim() != points.dim() {
            return Err(GeometryError::parse(
                0,
                format!(
                    "engine reported dimension {}, input has {}",
                    diagram.dim(),
                    points.dim()
                ),
            ));
        }
        if diagram.incidence().nrows() != points.len() {
            return Err(GeometryError::parse(
                1,
                format!(
                    "engine returned {} cells for {} points",
                    diagram.incidence().nrows() + synthetic,
                    augmented.points().len()
                ),
            ));
        }
        if diagram.synthetic_only_vertices() > 0 {
            tracing::debug!(
                vertices = diagram.synthetic_only_vertices(),
                "vertices reachable only from bounding cells"
            );
        }

        Ok(Self {
            diagram,
            bounds: augmented.bounds().cloned(),
        })
    }

    /// Decode output produced elsewhere, trimming `synthetic_count` trailing
    /// cells.
    pub fn from_output(output: &str, synthetic_count: usize) -> Result<Self> {
        Ok(Self {
            diagram: parse_diagram(output, synthetic_count)?,
            bounds: None,
        })
    }

    #[must_use]
    pub const fn dim(&self) -> usize {
        self.diagram.dim()
    }

    /// `original_points x vertex_count` incidence.
    #[must_use]
    pub const fn incidence(&self) -> &IncidenceMatrix {
        self.diagram.incidence()
    }

    /// Vertex count including the sentinel at index 0.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.diagram.vertex_count()
    }

    /// Row-major vertex table; row 0 is the engine's at-infinity placeholder.
    #[must_use]
    pub fn vertices(&self) -> &[f64] {
        self.diagram.vertices()
    }

    #[must_use]
    pub fn vertex(&self, i: usize) -> &[f64] {
        self.diagram.vertex(i)
    }

    /// Vertex indices bounding the cell of point `i`.
    #[must_use]
    pub fn cell(&self, i: usize) -> &[usize] {
        self.diagram.incidence().row(i)
    }

    /// Whether the cell of point `i` extends to infinity.
    #[must_use]
    pub fn is_unbounded(&self, i: usize) -> bool {
        self.diagram.is_unbounded(i)
    }

    /// The synthetic box used, if augmentation was requested.
    #[must_use]
    pub const fn bounds(&self) -> Option<&BoundingBox> {
        self.bounds.as_ref()
    }

    #[must_use]
    pub const fn diagram(&self) -> &Diagram {
        &self.diagram
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;

    /// Replays canned output and records the point file it was given.
    struct Canned {
        output: &'static str,
        seen: RefCell<Option<String>>,
    }

    impl Canned {
        fn new(output: &'static str) -> Self {
            Self {
                output,
                seen: RefCell::new(None),
            }
        }
    }

    impl DiagramEngine for Canned {
        fn voronoi(&self, point_file: &str) -> Result<String> {
            *self.seen.borrow_mut() = Some(point_file.to_owned());
            Ok(self.output.to_owned())
        }
    }

    /// Single point at the origin wrapped in its bounding box: the original
    /// point's cell is the finite diamond 1-2-3-4, every corner is unbounded.
    const BOXED_POINT: &str = "\
2
5 5 1
-10.101 -10.101
0 -1
-1 0
1 0
0 1
4 1 2 4 3
3 0 2 1
3 0 4 2
3 0 1 3
3 0 3 4
";

    fn pair() -> PointSet {
        PointSet::from_rows([[0.0, 0.0], [1.0, 1.0]]).unwrap()
    }

    #[test]
    fn test_augmented_rows_trimmed() {
        let points = PointSet::from_rows([[0.0, 0.0]]).unwrap();
        let engine = Canned::new(BOXED_POINT);
        let v = Voronoi::compute(&points, &VoronoiOptions::default().with_bounding_box(true), &engine)
            .unwrap();

        assert_eq!(v.incidence().shape(), (1, 5));
        assert_eq!(v.cell(0), &[1, 2, 4, 3]);
        assert!(!v.is_unbounded(0));
        assert!(v.bounds().is_some());

        let sent = engine.seen.borrow().clone().unwrap();
        let lines: Vec<&str> = sent.lines().collect();
        assert_eq!(lines[0], "2");
        assert_eq!(lines[1], "5");
        assert_eq!(lines.len(), 2 + 5);
    }

    #[test]
    fn test_row_count_matches_points_either_way() {
        let two_cells = "2\n2 2 1\n-10.101 -10.101\n0.5 0.5\n2 0 1\n2 0 1\n";
        let points = pair();
        let plain = Voronoi::compute(&points, &VoronoiOptions::default(), &Canned::new(two_cells))
            .unwrap();
        assert_eq!(plain.incidence().nrows(), points.len());
        assert!(plain.bounds().is_none());

        let six_cells = "2\n2 6 1\n-10.101 -10.101\n0.5 0.5\n2 0 1\n2 0 1\n1 0\n1 0\n1 0\n1 0\n";
        let boxed = Voronoi::compute(
            &points,
            &VoronoiOptions::default().with_bounding_box(true),
            &Canned::new(six_cells),
        )
        .unwrap();
        assert_eq!(boxed.incidence().nrows(), points.len());
        assert_eq!(boxed.incidence().ncols(), 2);
    }

    #[test]
    fn test_sentinel_column_never_populated() {
        let v = Voronoi::from_output(BOXED_POINT, 0).unwrap();
        assert_eq!(v.incidence().nrows(), 5);
        assert!(v.incidence().indices().iter().all(|&c| c != 0));
        assert!((1..5).all(|i| v.is_unbounded(i)));
    }

    #[test]
    fn test_cell_count_mismatch_is_parse_error() {
        let one_cell = "2\n2 1 1\n-10.101 -10.101\n0.5 0.5\n2 0 1\n";
        let err = Voronoi::compute(
            &pair(),
            &VoronoiOptions::default(),
            &Canned::new(one_cell),
        )
        .unwrap_err();
        assert!(matches!(err, GeometryError::Parse { record: 1, .. }));
    }

    #[test]
    fn test_dimension_mismatch_is_parse_error() {
        let three_d = "3\n1 2 1\n-10.101 -10.101 -10.101\n1 0\n1 0\n";
        let err = Voronoi::compute(
            &pair(),
            &VoronoiOptions::default(),
            &Canned::new(three_d),
        )
        .unwrap_err();
        assert!(matches!(err, GeometryError::Parse { record: 0, .. }));
    }

    #[test]
    fn test_engine_errors_propagate() {
        let failing = |_: &str| -> Result<String> {
            Err(GeometryError::Engine {
                reason: "QH6214 not enough points".to_owned(),
            })
        };
        let err = Voronoi::compute(&pair(), &VoronoiOptions::default(), &failing)
            .unwrap_err();
        assert!(matches!(err, GeometryError::Engine { .. }));
    }

    #[test]
    fn test_runs_inside_caller_span() {
        let options = VoronoiOptions::default()
            .with_bounding_box(true)
            .with_span(tracing::info_span!("voronoi", job = 3));
        let points = PointSet::from_rows([[0.0, 0.0]]).unwrap();
        let v = Voronoi::compute(&points, &options, &Canned::new(BOXED_POINT)).unwrap();
        assert_eq!(v.diagram().synthetic_only_vertices(), 0);
    }
}
