//! Compressed sparse row storage for the point/vertex incidence relation.

/// Sparse boolean matrix in CSR form.
///
/// Row `i` holds the column indices in `indices[indptr[i]..indptr[i + 1]]`.
/// Every stored entry has value 1.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IncidenceMatrix {
    shape: (usize, usize),
    indptr: Vec<usize>,
    indices: Vec<usize>,
    data: Vec<u8>,
}

impl IncidenceMatrix {
    /// `(rows, columns)`.
    #[must_use]
    pub const fn shape(&self) -> (usize, usize) {
        self.shape
    }

    #[must_use]
    pub const fn nrows(&self) -> usize {
        self.shape.0
    }

    #[must_use]
    pub const fn ncols(&self) -> usize {
        self.shape.1
    }

    /// Number of stored entries.
    #[must_use]
    pub fn nnz(&self) -> usize {
        self.indices.len()
    }

    #[must_use]
    pub fn indptr(&self) -> &[usize] {
        &self.indptr
    }

    #[must_use]
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    #[must_use]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Column indices of row `i`, in engine order.
    ///
    /// # Panics
    /// Panics if `i >= self.nrows()`.
    #[must_use]
    pub fn row(&self, i: usize) -> &[usize] {
        &self.indices[self.indptr[i]..self.indptr[i + 1]]
    }

    pub fn rows(&self) -> impl ExactSizeIterator<Item = &[usize]> {
        self.indptr.windows(2).map(|w| &self.indices[w[0]..w[1]])
    }

    #[must_use]
    pub fn contains(&self, row: usize, col: usize) -> bool {
        row < self.nrows() && self.row(row).contains(&col)
    }

    /// Rows whose cells are bounded by `col`.
    pub fn column_rows(&self, col: usize) -> impl Iterator<Item = usize> + '_ {
        self.rows()
            .enumerate()
            .filter_map(move |(i, row)| row.contains(&col).then_some(i))
    }

    /// Dense row-major 0/1 rendering, mostly for debugging small diagrams.
    #[must_use]
    pub fn to_dense(&self) -> Vec<Vec<u8>> {
        self.rows()
            .map(|row| {
                let mut dense = vec![0; self.ncols()];
                for &c in row {
                    dense[c] = 1;
                }
                dense
            })
            .collect()
    }
}

/// Row-at-a-time builder for [`IncidenceMatrix`].
#[derive(Clone, Debug)]
pub struct IncidenceBuilder {
    ncols: usize,
    indptr: Vec<usize>,
    indices: Vec<usize>,
}

impl IncidenceBuilder {
    #[must_use]
    pub fn new(ncols: usize) -> Self {
        Self {
            ncols,
            indptr: vec![0],
            indices: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_capacity(ncols: usize, rows: usize, entries: usize) -> Self {
        let mut indptr = Vec::with_capacity(rows + 1);
        indptr.push(0);
        Self {
            ncols,
            indptr,
            indices: Vec::with_capacity(entries),
        }
    }

    /// Append a row. Columns must be `< ncols`.
    pub fn push_row(&mut self, cols: impl IntoIterator<Item = usize>) {
        for c in cols {
            debug_assert!(c < self.ncols, "column {c} out of bounds ({})", self.ncols);
            self.indices.push(c);
        }
        self.indptr.push(self.indices.len());
    }

    #[must_use]
    pub fn nrows(&self) -> usize {
        self.indptr.len() - 1
    }

    #[must_use]
    pub fn build(self) -> IncidenceMatrix {
        let data = vec![1; self.indices.len()];
        IncidenceMatrix {
            shape: (self.indptr.len() - 1, self.ncols),
            indptr: self.indptr,
            indices: self.indices,
            data,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> IncidenceMatrix {
        let mut builder = IncidenceBuilder::new(5);
        builder.push_row([1, 2, 4]);
        builder.push_row(std::iter::empty());
        builder.push_row([2, 3]);
        builder.build()
    }

    #[test]
    fn test_builder_layout() {
        let m = sample();
        assert_eq!(m.shape(), (3, 5));
        assert_eq!(m.indptr(), &[0, 3, 3, 5]);
        assert_eq!(m.indices(), &[1, 2, 4, 2, 3]);
        assert_eq!(m.data(), &[1, 1, 1, 1, 1]);
        assert_eq!(m.nnz(), 5);
    }

    #[test]
    fn test_row_access() {
        let m = sample();
        assert_eq!(m.row(0), &[1, 2, 4]);
        assert!(m.row(1).is_empty());
        assert!(m.contains(2, 3));
        assert!(!m.contains(1, 3));
        assert!(!m.contains(7, 3));
        assert_eq!(m.column_rows(2).collect::<Vec<_>>(), vec![0, 2]);
    }

    #[test]
    fn test_to_dense() {
        let dense = sample().to_dense();
        assert_eq!(dense[0], vec![0, 1, 1, 0, 1]);
        assert_eq!(dense[1], vec![0, 0, 0, 0, 0]);
        assert_eq!(dense[2], vec![0, 0, 1, 1, 0]);
    }

    #[test]
    fn test_empty_matrix() {
        let m = IncidenceBuilder::with_capacity(3, 0, 0).build();
        assert_eq!(m.shape(), (0, 3));
        assert_eq!(m.indptr(), &[0]);
        assert_eq!(m.rows().len(), 0);
    }
}
