use thiserror::Error;

/// Errors raised while turning an affinity matrix into a clustering.
#[derive(Debug, Error)]
pub enum ClusterError {
    /// The row pointer array has no entries at all.
    #[error("row pointer array is empty; expected n + 1 entries")]
    EmptyRowPointer,

    /// The row pointer array does not start at 0.
    #[error("row pointer must start at 0, found {0}")]
    RowPointerStart(usize),

    /// The row pointer array decreases between two consecutive rows.
    #[error("row pointer decreases at row {row}: {start} > {end}")]
    DecreasingRowPointer {
        /// Row whose range is inverted.
        row: usize,
        /// Start of the row's range.
        start: usize,
        /// End of the row's range.
        end: usize,
    },

    /// The stored entry count disagrees between the row pointer, indices and data arrays.
    #[error("row pointer ends at {nnz} but {indices} column indices and {data} weights are stored")]
    LengthMismatch {
        /// Last row pointer entry.
        nnz: usize,
        /// Length of the column index array.
        indices: usize,
        /// Length of the weight array.
        data: usize,
    },

    /// A column index does not name a vertex.
    #[error("column index {column} of stored entry {entry} is out of range for {n_vertices} vertices")]
    ColumnOutOfRange {
        /// Position of the entry in the indices array.
        entry: usize,
        /// Offending column index.
        column: usize,
        /// Number of vertices (rows) in the matrix.
        n_vertices: usize,
    },

    /// A weight is NaN or infinite.
    #[error("weight {weight} of stored entry {entry} is not finite")]
    NonFiniteWeight {
        /// Position of the entry in the data array.
        entry: usize,
        /// Offending weight.
        weight: f64,
    },

    /// The matrix is not square.
    #[error("affinity matrix must be square, got {rows} x {cols}")]
    NotSquare {
        /// Number of rows.
        rows: usize,
        /// Number of columns.
        cols: usize,
    },

    /// The matrix is stored column by column.
    #[error("affinity matrix must be stored in compressed-row (CSR) order")]
    NotRowMajor,

    /// `n_seeds` is zero, so no partition would ever be produced.
    #[error("no clustering attempts configured: n_seeds must be at least 1")]
    NoSeeds,

    /// The graph store refused the vertex and edge sequences.
    #[error("graph store rejected the affinity graph")]
    GraphStore(#[source] anyhow::Error),

    /// The partition finder failed; the remaining seeds were not attempted.
    #[error("partition finder failed for seed {seed}")]
    Finder {
        /// Derived seed passed to the failing call.
        seed: u64,
        /// Error reported by the partition finder.
        #[source]
        source: anyhow::Error,
    },
}

impl ClusterError {
    /// True for errors describing an invalid affinity matrix.
    pub fn is_malformed_input(&self) -> bool {
        matches!(
            self,
            ClusterError::EmptyRowPointer
                | ClusterError::RowPointerStart(_)
                | ClusterError::DecreasingRowPointer { .. }
                | ClusterError::LengthMismatch { .. }
                | ClusterError::ColumnOutOfRange { .. }
                | ClusterError::NonFiniteWeight { .. }
                | ClusterError::NotSquare { .. }
                | ClusterError::NotRowMajor
        )
    }
}
