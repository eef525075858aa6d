use crate::AffinityMatrix;

/// Explicit graph form of an affinity matrix: one edge per stored entry, with the weights in
/// a parallel sequence.
#[derive(Clone, Debug, PartialEq)]
pub struct EdgeList {
    /// Number of vertices, equal to the number of matrix rows.
    pub n_vertices: usize,
    /// `(row, column)` endpoints, rows in order and entries in storage order within a row.
    pub edges: Vec<(usize, usize)>,
    /// Weight of each edge, position for position.
    pub weights: Vec<f64>,
}

impl EdgeList {
    /// Number of edges.
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    /// True when the graph has no edges.
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }
}

/// Expand a CSR matrix into an edge list.
///
/// Entries are emitted exactly as stored: duplicates, asymmetric pairs and self-loops are all
/// kept.
pub fn build_edge_list(matrix: &AffinityMatrix) -> EdgeList {
    let mut edges = Vec::with_capacity(matrix.nnz());

    for (row, bounds) in matrix.indptr().windows(2).enumerate() {
        edges.extend(matrix.indices()[bounds[0]..bounds[1]].iter().map(|&col| (row, col)));
    }

    EdgeList {
        n_vertices: matrix.n_vertices(),
        edges,
        weights: matrix.data().to_vec(),
    }
}
