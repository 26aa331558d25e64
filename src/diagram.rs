//! Parser for qhull's `qvoronoi o` output.
//!
//! ## Layout
//!
//! ```text
//! D                      dimension
//! V N 1                  vertex count, region count, constant
//! x_0 y_0 ...            V vertex lines; vertex 0 is the point at infinity
//! ...
//! k i_1 ... i_k          N region lines, one per input point, in input order
//! ```
//!
//! Every line is a record. Errors report the 0-based line index of the record
//! that could not be parsed.
//!
//! ## Synthetic trimming
//!
//! When `K` bounding corners were appended to the input, the last `K` region
//! records describe cells of fictitious points and are dropped. The column
//! count stays `V`: vertices only reachable from those cells remain
//! addressable, they are simply not referenced by any retained row. A retained
//! row may still list such a vertex (the cell touches the box boundary
//! numerically); it is kept as a regular column.

use std::str::FromStr;

use rustc_hash::FxHashSet;

use crate::error::{GeometryError, Result};
use crate::sparse::{IncidenceBuilder, IncidenceMatrix};

/// Column reserved for the vertex at infinity.
pub const INFINITY_VERTEX: usize = 0;

/// Header counts are untrusted; cap what they can reserve up front.
const PREALLOC_LIMIT: usize = 1 << 16;

/// Vertex table and point/vertex incidence decoded from engine output.
#[derive(Clone, Debug)]
pub struct Diagram {
    dim: usize,
    vertices: Vec<f64>,
    incidence: IncidenceMatrix,
    unbounded: Vec<bool>,
    synthetic_only_vertices: usize,
}

impl Diagram {
    #[must_use]
    pub const fn dim(&self) -> usize {
        self.dim
    }

    /// Number of vertices including the sentinel at index 0.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len() / self.dim
    }

    /// Coordinates of vertex `i`. Vertex 0 holds the engine's placeholder.
    ///
    /// # Panics
    /// Panics if `i >= self.vertex_count()`.
    #[must_use]
    pub fn vertex(&self, i: usize) -> &[f64] {
        &self.vertices[i * self.dim..(i + 1) * self.dim]
    }

    /// Row-major `V x D` vertex table.
    #[must_use]
    pub fn vertices(&self) -> &[f64] {
        &self.vertices
    }

    /// Sparse `original_points x V` incidence.
    #[must_use]
    pub const fn incidence(&self) -> &IncidenceMatrix {
        &self.incidence
    }

    /// Whether the cell of point `i` reaches infinity.
    #[must_use]
    pub fn is_unbounded(&self, i: usize) -> bool {
        self.unbounded[i]
    }

    /// Vertices listed only by the discarded synthetic cells.
    #[must_use]
    pub const fn synthetic_only_vertices(&self) -> usize {
        self.synthetic_only_vertices
    }
}

/// Non-blank lines of the output, each tagged with its line index.
struct Records<'a> {
    lines: std::iter::Enumerate<std::str::Lines<'a>>,
    last: Option<usize>,
}

impl<'a> Records<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            lines: text.lines().enumerate(),
            last: None,
        }
    }

    fn advance(&mut self) -> Option<(usize, &'a str)> {
        let (idx, line) = self.lines.find(|(_, l)| !l.trim().is_empty())?;
        self.last = Some(idx);
        Some((idx, line))
    }

    /// Index of the record that would follow the last one read.
    fn following(&self) -> usize {
        self.last.map_or(0, |idx| idx + 1)
    }

    /// The next record, or an error naming the record that should follow.
    fn expect(&mut self, what: &str) -> Result<(usize, &'a str)> {
        let missing = self.following();
        self.advance()
            .ok_or_else(|| GeometryError::parse(missing, format!("truncated output, expected {what}")))
    }
}

fn token<T: FromStr>(record: usize, tok: &str, what: &str) -> Result<T> {
    tok.parse()
        .map_err(|_| GeometryError::parse(record, format!("expected {what}, found {tok:?}")))
}

/// Decode `qvoronoi o` output, dropping the trailing `synthetic_count` cells.
pub fn parse_diagram(output: &str, synthetic_count: usize) -> Result<Diagram> {
    let mut records = Records::new(output);

    let (rec, line) = records.expect("dimension")?;
    let mut toks = line.split_whitespace();
    let dim: i64 = token(rec, toks.next().unwrap_or_default(), "dimension")?;
    if dim < 2 {
        return Err(GeometryError::parse(rec, format!("dimension {dim} is below 2")));
    }
    #[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
    let dim = dim as usize;

    let (header_rec, line) = records.expect("vertex count")?;
    let mut toks = line.split_whitespace();
    let vertex_count: i64 = token(header_rec, toks.next().unwrap_or_default(), "vertex count")?;
    if vertex_count <= 0 {
        return Err(GeometryError::parse(
            header_rec,
            format!("vertex count must be positive, got {vertex_count}"),
        ));
    }
    #[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
    let vertex_count = vertex_count as usize;
    let region_count: Option<usize> = toks
        .next()
        .map(|t| token(header_rec, t, "region count"))
        .transpose()?;

    let mut vertices = Vec::with_capacity(vertex_count.saturating_mul(dim).min(PREALLOC_LIMIT));
    for _ in 0..vertex_count {
        let (rec, line) = records.expect("vertex coordinates")?;
        let before = vertices.len();
        for tok in line.split_whitespace() {
            vertices.push(token::<f64>(rec, tok, "vertex coordinate")?);
        }
        let width = vertices.len() - before;
        if width != dim {
            return Err(GeometryError::parse(
                rec,
                format!("vertex has {width} coordinates, expected {dim}"),
            ));
        }
    }

    let regions = parse_regions(&mut records, vertex_count, region_count)?;
    if synthetic_count > regions.len() {
        return Err(GeometryError::parse(
            header_rec,
            format!(
                "{} regions cannot contain {synthetic_count} synthetic cells",
                regions.len()
            ),
        ));
    }
    let (retained, synthetic) = regions.split_at(regions.len() - synthetic_count);

    let entries = retained.iter().map(Vec::len).sum();
    let mut builder = IncidenceBuilder::with_capacity(vertex_count, retained.len(), entries);
    let mut unbounded = Vec::with_capacity(retained.len());
    let mut referenced = FxHashSet::default();
    let mut seen = FxHashSet::default();
    for region in retained {
        unbounded.push(region.contains(&INFINITY_VERTEX));
        referenced.extend(region.iter().copied());
        // Presence only: a vertex listed twice is stored once.
        seen.clear();
        builder.push_row(
            region
                .iter()
                .copied()
                .filter(|&v| v != INFINITY_VERTEX && seen.insert(v)),
        );
    }

    let synthetic_only: FxHashSet<usize> = synthetic
        .iter()
        .flatten()
        .copied()
        .filter(|v| *v != INFINITY_VERTEX && !referenced.contains(v))
        .collect();

    let incidence = builder.build();
    tracing::debug!(
        dim,
        vertices = vertex_count,
        rows = incidence.nrows(),
        nnz = incidence.nnz(),
        dropped_rows = synthetic_count,
        synthetic_only_vertices = synthetic_only.len(),
        "parsed voronoi output"
    );

    Ok(Diagram {
        dim,
        vertices,
        incidence,
        unbounded,
        synthetic_only_vertices: synthetic_only.len(),
    })
}

fn parse_regions(
    records: &mut Records<'_>,
    vertex_count: usize,
    region_count: Option<usize>,
) -> Result<Vec<Vec<usize>>> {
    let mut regions = Vec::with_capacity(region_count.unwrap_or_default().min(PREALLOC_LIMIT));
    loop {
        if region_count.is_some_and(|n| regions.len() == n) {
            break;
        }
        let (rec, line) = match (region_count, records.advance()) {
            (_, Some(record)) => record,
            (None, None) => break,
            (Some(n), None) => {
                return Err(GeometryError::parse(
                    records.following(),
                    format!("truncated output, found {} of {n} regions", regions.len()),
                ));
            }
        };
        let mut toks = line.split_whitespace();
        let listed: usize = token(rec, toks.next().unwrap_or_default(), "region size")?;
        let region = toks
            .map(|t| {
                let v: usize = token(rec, t, "vertex index")?;
                if v >= vertex_count {
                    return Err(GeometryError::parse(
                        rec,
                        format!("vertex index {v} out of range for {vertex_count} vertices"),
                    ));
                }
                Ok(v)
            })
            .collect::<Result<Vec<_>>>()?;
        if region.len() != listed {
            return Err(GeometryError::parse(
                rec,
                format!("region lists {listed} vertices but has {}", region.len()),
            ));
        }
        regions.push(region);
    }

    if let Some((rec, _)) = records.advance() {
        return Err(GeometryError::parse(rec, "unexpected record after last region"));
    }
    Ok(regions)
}
