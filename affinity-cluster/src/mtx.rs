use crate::AffinityMatrix;
use anyhow::{bail, format_err, Context, Error};
use flate2::read::MultiGzDecoder;
use sprs::{CsMat, TriMat};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Field {
    Real,
    Pattern,
}

/// Load a square affinity matrix from a Matrix Market coordinate file. Files ending in `.gz`
/// are decompressed.
pub fn load_mtx(path: impl AsRef<Path>) -> Result<AffinityMatrix, Error> {
    let path = path.as_ref();
    let file = File::open(path).with_context(|| path.display().to_string())?;

    let matrix = if path.extension().is_some_and(|ext| ext == "gz") {
        read_mtx(BufReader::new(MultiGzDecoder::new(file)))
    } else {
        read_mtx(BufReader::new(file))
    };

    matrix.with_context(|| path.display().to_string())
}

/// Parse Matrix Market coordinate data into an affinity matrix.
///
/// Supports `real`, `integer` and `pattern` fields with `general` or `symmetric` symmetry.
/// Pattern entries get weight 1, and symmetric entries off the diagonal are mirrored. Repeated
/// coordinates are summed.
pub fn read_mtx(mut reader: impl BufRead) -> Result<AffinityMatrix, Error> {
    let mut field = Field::Real;
    let mut symmetric = false;
    let mut matrix: Option<TriMat<f64>> = None;

    let mut line = String::new();
    let mut line_number = 0;
    loop {
        line.clear();
        if reader.read_line(&mut line)? == 0 {
            break;
        }
        line_number += 1;

        if line_number == 1 {
            if let Some(header) = line.strip_prefix("%%MatrixMarket") {
                (field, symmetric) = parse_header(header)?;
                continue;
            }
        }

        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('%') {
            continue;
        }

        let mut values = trimmed.split_whitespace();
        let mut next_index = |name: &str| -> Result<usize, Error> {
            values
                .next()
                .ok_or_else(|| format_err!("line {line_number}: missing {name}"))?
                .parse::<usize>()
                .with_context(|| format!("line {line_number}: invalid {name}"))
        };

        match matrix.as_mut() {
            None => {
                let nrow = next_index("row count")?;
                let ncol = next_index("column count")?;
                let nnz = next_index("entry count")?;
                let capacity = if symmetric { 2 * nnz } else { nnz };
                matrix = Some(TriMat::with_capacity((nrow, ncol), capacity));
            }
            Some(m) => {
                let row = next_index("row")?;
                let col = next_index("column")?;
                let (nrow, ncol) = (m.rows(), m.cols());
                if row == 0 || row > nrow || col == 0 || col > ncol {
                    bail!("line {line_number}: entry ({row}, {col}) is outside the {nrow} x {ncol} matrix");
                }

                let value = match field {
                    Field::Pattern => 1.0,
                    Field::Real => values
                        .next()
                        .ok_or_else(|| format_err!("line {line_number}: missing value"))?
                        .parse::<f64>()
                        .with_context(|| format!("line {line_number}: invalid value"))?,
                };

                m.add_triplet(row - 1, col - 1, value);
                if symmetric && row != col {
                    m.add_triplet(col - 1, row - 1, value);
                }
            }
        }
    }

    let Some(matrix) = matrix else {
        bail!("no size line found in Matrix Market data");
    };

    let csr: CsMat<f64> = matrix.to_csr();
    Ok(AffinityMatrix::from_csmat(&csr)?)
}

fn parse_header(header: &str) -> Result<(Field, bool), Error> {
    let words = header.split_whitespace().map(str::to_lowercase).collect::<Vec<_>>();
    let [object, format, field, symmetry] = words.as_slice() else {
        bail!("malformed Matrix Market header: {}", header.trim());
    };

    if object != "matrix" || format != "coordinate" {
        bail!("unsupported Matrix Market layout: {object} {format}");
    }

    let field = match field.as_str() {
        "real" | "integer" | "double" => Field::Real,
        "pattern" => Field::Pattern,
        other => bail!("unsupported Matrix Market field: {other}"),
    };

    let symmetric = match symmetry.as_str() {
        "general" => false,
        "symmetric" => true,
        other => bail!("unsupported Matrix Market symmetry: {other}"),
    };

    Ok((field, symmetric))
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::io::Write;

    #[test]
    fn test_general() {
        let data = "%%MatrixMarket matrix coordinate real general
% comment
3 3 3
1 2 0.5
2 1 0.5
2 3 0.8
";
        let m = read_mtx(data.as_bytes()).unwrap();
        assert_eq!(m.indptr(), &[0, 1, 3, 3]);
        assert_eq!(m.indices(), &[1, 0, 2]);
        assert_eq!(m.data(), &[0.5, 0.5, 0.8]);
    }

    #[test]
    fn test_symmetric_pattern() {
        let data = "%%MatrixMarket matrix coordinate pattern symmetric
3 3 3
2 1
3 2
3 3
";
        let m = read_mtx(data.as_bytes()).unwrap();
        assert_eq!(m.indptr(), &[0, 1, 3, 5]);
        assert_eq!(m.indices(), &[1, 0, 2, 1, 2]);
        assert_eq!(m.data(), &[1.0; 5]);
    }

    #[test]
    fn test_no_header() {
        let m = read_mtx("2 2 1\n1 2 3\n".as_bytes()).unwrap();
        assert_eq!(m.n_vertices(), 2);
        assert_eq!(m.data(), &[3.0]);
    }

    #[test]
    fn test_bad_input() {
        assert!(read_mtx("".as_bytes()).is_err());
        assert!(read_mtx("%%MatrixMarket matrix array real general\n1 1\n1.0\n".as_bytes()).is_err());
        assert!(read_mtx("%%MatrixMarket matrix coordinate complex general\n".as_bytes()).is_err());
        assert!(read_mtx("2 2 1\n3 1 1.0\n".as_bytes()).is_err());
        assert!(read_mtx("2 2 1\n1 1\n".as_bytes()).is_err());

        // not square
        let err = read_mtx("2 3 1\n1 3 1.0\n".as_bytes()).unwrap_err();
        assert!(err.to_string().contains("square"), "{err}");
    }

    #[test]
    fn test_load_gz() -> Result<(), Error> {
        let path = std::env::temp_dir().join(format!("affinity-cluster-{}.mtx.gz", std::process::id()));

        let mut encoder = GzEncoder::new(File::create(&path)?, Compression::default());
        encoder.write_all(b"%%MatrixMarket matrix coordinate integer general\n2 2 2\n1 2 4\n2 1 4\n")?;
        encoder.finish()?;

        let m = load_mtx(&path);
        std::fs::remove_file(&path)?;

        let m = m?;
        assert_eq!(m.indices(), &[1, 0]);
        assert_eq!(m.data(), &[4.0, 4.0]);
        Ok(())
    }

    #[test]
    fn test_missing_file() {
        let err = load_mtx("/nonexistent/affinity.mtx").unwrap_err();
        assert!(err.to_string().contains("affinity.mtx"));
    }
}
