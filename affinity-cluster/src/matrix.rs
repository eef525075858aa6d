use crate::ClusterError;
use sprs::{CsMatI, SpIndex};

/// Square sparse affinity matrix in compressed-row (CSR) form.
///
/// Only the validating constructors can build one, so every stored column index names a
/// vertex and every weight is finite.
#[derive(Clone, Debug, PartialEq)]
pub struct AffinityMatrix {
    indptr: Vec<usize>,
    indices: Vec<usize>,
    data: Vec<f64>,
}

impl AffinityMatrix {
    /// Build a matrix from raw CSR arrays. Row `i` stores the entries
    /// `indptr[i]..indptr[i + 1]` of `indices` and `data`.
    pub fn new(indptr: Vec<usize>, indices: Vec<usize>, data: Vec<f64>) -> Result<Self, ClusterError> {
        validate(&indptr, &indices, &data)?;
        Ok(AffinityMatrix { indptr, indices, data })
    }

    /// Copy a CSR `sprs` matrix. Column-major storage is rejected rather than transposed.
    pub fn from_csmat<I, Iptr>(matrix: &CsMatI<f64, I, Iptr>) -> Result<Self, ClusterError>
    where
        I: SpIndex,
        Iptr: SpIndex,
    {
        if matrix.storage() != sprs::CSR {
            return Err(ClusterError::NotRowMajor);
        }

        let (rows, cols) = matrix.shape();
        if rows != cols {
            return Err(ClusterError::NotSquare { rows, cols });
        }

        let mut indptr = Vec::with_capacity(rows + 1);
        let mut indices = Vec::with_capacity(matrix.nnz());
        let mut data = Vec::with_capacity(matrix.nnz());

        indptr.push(0);
        for row in matrix.outer_iterator() {
            indices.extend(row.indices().iter().map(|col| col.index()));
            data.extend_from_slice(row.data());
            indptr.push(indices.len());
        }

        AffinityMatrix::new(indptr, indices, data)
    }

    /// An empty 0 x 0 matrix.
    pub fn empty() -> Self {
        AffinityMatrix {
            indptr: vec![0],
            indices: Vec::new(),
            data: Vec::new(),
        }
    }

    /// Number of rows, which is also the number of vertices.
    pub fn n_vertices(&self) -> usize {
        self.indptr.len() - 1
    }

    /// Number of stored entries.
    pub fn nnz(&self) -> usize {
        self.indices.len()
    }

    /// Row pointer array, `n_vertices() + 1` long.
    pub fn indptr(&self) -> &[usize] {
        &self.indptr
    }

    /// Column index of every stored entry.
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    /// Weight of every stored entry.
    pub fn data(&self) -> &[f64] {
        &self.data
    }
}

fn validate(indptr: &[usize], indices: &[usize], data: &[f64]) -> Result<(), ClusterError> {
    let (&first, &nnz) = match (indptr.first(), indptr.last()) {
        (Some(first), Some(last)) => (first, last),
        _ => return Err(ClusterError::EmptyRowPointer),
    };

    if first != 0 {
        return Err(ClusterError::RowPointerStart(first));
    }

    for (row, bounds) in indptr.windows(2).enumerate() {
        if bounds[0] > bounds[1] {
            return Err(ClusterError::DecreasingRowPointer {
                row,
                start: bounds[0],
                end: bounds[1],
            });
        }
    }

    if indices.len() != nnz || data.len() != nnz {
        return Err(ClusterError::LengthMismatch {
            nnz,
            indices: indices.len(),
            data: data.len(),
        });
    }

    let n_vertices = indptr.len() - 1;
    if let Some((entry, &column)) = indices.iter().enumerate().find(|&(_, &col)| col >= n_vertices) {
        return Err(ClusterError::ColumnOutOfRange {
            entry,
            column,
            n_vertices,
        });
    }

    if let Some((entry, &weight)) = data.iter().enumerate().find(|(_, w)| !w.is_finite()) {
        return Err(ClusterError::NonFiniteWeight { entry, weight });
    }

    Ok(())
}
