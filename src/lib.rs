//! # `cellhull`
//!
//! Voronoi cell/vertex incidence from qhull output, and convex hull areas for
//! many 2D point groups in one call.
//!
//! ## What is this?
//!
//! Two small tools that share a point model:
//!
//! - **Voronoi incidence**: run `qvoronoi o` (or anything speaking its text
//!   format) on a point set and get back a sparse `points x vertices` matrix
//!   saying which Voronoi vertices bound each point's cell. Optionally the
//!   input is wrapped in a synthetic box first so that every real cell is
//!   finite; the box's own cells are stripped from the result.
//! - **Batched hull areas**: given a flat array of 2D points and an
//!   index-pointer array splitting it into groups, compute the convex hull
//!   area of each group.
//!
//! ## Quick Start
//!
//! ```rust
//! use cellhull::{PointSet, convex_hull_areas};
//!
//! let points = PointSet::from_rows([
//!     [0.0, 0.0], [1.0, 0.0], [0.0, 1.0],
//!     [5.0, 5.0], [6.0, 5.0], [5.0, 6.0],
//! ])?;
//!
//! let areas = convex_hull_areas(&points, Some(&[0, 3, 6]))?;
//! assert_eq!(areas, vec![0.5, 0.5]);
//! # Ok::<(), cellhull::GeometryError>(())
//! ```
//!
//! Voronoi incidence from engine output:
//!
//! ```rust
//! use cellhull::Voronoi;
//!
//! let output = "2\n2 2 1\n-10.101 -10.101\n0.5 0.5\n2 0 1\n2 0 1\n";
//! let voronoi = Voronoi::from_output(output, 0)?;
//!
//! assert_eq!(voronoi.incidence().shape(), (2, 2));
//! assert_eq!(voronoi.cell(0), &[1]); // vertex 0 (infinity) is never stored
//! assert!(voronoi.is_unbounded(0));
//! # Ok::<(), cellhull::GeometryError>(())
//! ```
//!
//! With the qhull binary installed, [`Voronoi::compute`] runs the whole
//! pipeline through [`QvoronoiProcess`].
//!
//! ## Key Features
//!
//! - **Synthetic bounding box**: `2^D` corners of a box twice the input's
//!   extent, appended after the input and trimmed from the output
//! - **Strict parsing**: malformed or truncated engine output fails with the
//!   offending record index, never a partial result
//! - **Canonical hulls**: collinear boundary points dropped, duplicates
//!   removed, so area is bit-identical under reordering and duplication
//! - **Parallel batches**: large group counts run on the rayon pool with
//!   results in group order
//!
//! ## Algorithm
//!
//! Hulls use Andrew's monotone chain (`O(n log n)`) and the shoelace formula.
//! The Voronoi diagram itself is computed by the external engine; this crate
//! only prepares its input and decodes its output.

#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

pub mod batch;
pub mod bounding;
pub mod diagram;
pub mod engine;
mod error;
pub mod hull;
mod points;
pub mod sparse;
mod voronoi;

pub use batch::{HullBatch, HullBatchOptions, convex_hull_areas};
pub use bounding::{AugmentedPointSet, BoundingBox, augment};
pub use diagram::{Diagram, INFINITY_VERTEX, parse_diagram};
pub use engine::{DiagramEngine, QvoronoiProcess, point_file, write_point_file};
pub use error::{GeometryError, Result};
pub use hull::{convex_hull, hull_area, polygon_area};
pub use points::PointSet;
pub use sparse::{IncidenceBuilder, IncidenceMatrix};
pub use voronoi::{Voronoi, VoronoiOptions};

/// Re-export glam types for convenience
pub mod math {
    pub use glam::DVec2;
}
