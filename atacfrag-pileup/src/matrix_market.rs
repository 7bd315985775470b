use std::io::Write;
use std::path::{Path, PathBuf};

use atacfrag_core::utils::get_dynamic_writer;

use crate::consts::{BARCODES_SUFFIX, FEATURES_SUFFIX, MTX_SUFFIX};
use crate::data::{AnnotatedMatrix, Counts};
use crate::errors::Result;

/// Paths of the three files written by [write_counts_to_mtx].
#[derive(Debug, Clone, PartialEq)]
pub struct MtxFiles {
    pub matrix: PathBuf,
    pub barcodes: PathBuf,
    pub features: PathBuf,
}

impl MtxFiles {
    pub fn from_prefix(output_prefix: &str) -> Self {
        MtxFiles {
            matrix: PathBuf::from(format!("{}_{}", output_prefix, MTX_SUFFIX)),
            barcodes: PathBuf::from(format!("{}_{}", output_prefix, BARCODES_SUFFIX)),
            features: PathBuf::from(format!("{}_{}", output_prefix, FEATURES_SUFFIX)),
        }
    }
}

/// Non-zero `(row, col, value)` entries sorted by row, then column.
fn nonzero_triplets(counts: &Counts) -> Vec<(usize, usize, u32)> {
    let mut triplets: Vec<(usize, usize, u32)> = match counts {
        Counts::Sparse(mx) => mx
            .iter()
            .filter(|(v, _)| **v != 0)
            .map(|(&v, (row, col))| (row, col, v))
            .collect(),
        Counts::Dense(mx) => mx
            .indexed_iter()
            .filter(|(_, v)| **v != 0)
            .map(|((row, col), &v)| (row, col, v))
            .collect(),
    };

    // Matrix Market readers load faster from sorted entries
    triplets.sort_by_key(|&(r, c, _)| (r, c));
    triplets
}

/// Write one name per line.
fn write_names(path: &Path, names: &[String]) -> Result<()> {
    let mut writer = get_dynamic_writer(path)?;
    for name in names {
        writeln!(writer, "{}", name)?;
    }
    writer.flush()?;
    Ok(())
}

/// Write one feature per line, followed by its interval when the matrix has them.
fn write_features(path: &Path, matrix: &AnnotatedMatrix) -> Result<()> {
    let Some(intervals) = &matrix.var_intervals else {
        return write_names(path, &matrix.var_names);
    };

    let mut writer = get_dynamic_writer(path)?;
    for (name, interval) in matrix.var_names.iter().zip(intervals) {
        writeln!(writer, "{}\t{}", name, interval)?;
    }
    writer.flush()?;
    Ok(())
}

/// Write a count matrix to Matrix Market format
///
/// Three gzipped files are written:
/// - {prefix}_matrix.mtx.gz: sparse triplets (row, col, value), 1-indexed
/// - {prefix}_barcodes.tsv.gz: cell barcodes (one per line, row order)
/// - {prefix}_features.tsv.gz: feature names (one per line, column order), each followed by a
///   tab and its `chr:start-end` interval when the matrix carries intervals
///
/// Dense matrices are written the same way, leaving out zeros.
///
/// # Arguments
/// * `matrix` - count matrix, e.g. from [crate::counting::count_fragments_features]
/// * `output_prefix` - Prefix for output files
pub fn write_counts_to_mtx(matrix: &AnnotatedMatrix, output_prefix: &str) -> Result<MtxFiles> {
    let files = MtxFiles::from_prefix(output_prefix);
    let triplets = nonzero_triplets(&matrix.x);
    let (n_rows, n_cols) = matrix.x.shape();

    let mut mtx_writer = get_dynamic_writer(&files.matrix)?;
    writeln!(
        mtx_writer,
        "%%MatrixMarket matrix coordinate integer general"
    )?;
    writeln!(mtx_writer, "{} {} {}", n_rows, n_cols, triplets.len())?;
    for (row_idx, col_idx, value) in triplets {
        writeln!(mtx_writer, "{} {} {}", row_idx + 1, col_idx + 1, value)?;
    }
    mtx_writer.flush()?;

    write_names(&files.barcodes, &matrix.obs_names)?;
    write_features(&files.features, matrix)?;

    log::info!("Wrote {} x {} matrix to {:?}", n_rows, n_cols, files.matrix);

    Ok(files)
}

///
/// Write a matrix as a tab-separated table: a header with the feature names, then one line per
/// cell starting with its barcode. Gzipped when `path` ends in `.gz`.
///
pub fn write_counts_to_tsv(matrix: &AnnotatedMatrix, path: &Path) -> Result<()> {
    let mut writer = get_dynamic_writer(path)?;

    writeln!(writer, "cell\t{}", matrix.var_names.join("\t"))?;

    for (row, cell) in matrix.obs_names.iter().enumerate() {
        write!(writer, "{}", cell)?;
        for col in 0..matrix.n_vars() {
            write!(writer, "\t{}", matrix.x.get(row, col).unwrap_or(0))?;
        }
        writeln!(writer)?;
    }
    writer.flush()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::io::Read;

    use flate2::read::GzDecoder;
    use ndarray::array;
    use pretty_assertions::assert_eq;
    use rstest::*;
    use sprs::TriMat;

    fn read_gz(path: &Path) -> String {
        let mut out = String::new();
        GzDecoder::new(std::fs::File::open(path).unwrap())
            .read_to_string(&mut out)
            .unwrap();
        out
    }

    fn names(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[rstest]
    fn test_write_sparse_mtx() {
        let tempdir = tempfile::tempdir().unwrap();
        let prefix = tempdir.path().join("counts");

        let mut tri: TriMat<u32> = TriMat::new((2, 3));
        tri.add_triplet(1, 2, 4);
        tri.add_triplet(0, 1, 1);
        tri.add_triplet(0, 1, 2);
        let matrix = AnnotatedMatrix::new(
            names(&["CELL_A", "CELL_B"]),
            names(&["GENE_1", "GENE_2", "GENE_3"]),
            Counts::Sparse(tri.to_csr()),
        )
        .unwrap();

        let files = write_counts_to_mtx(&matrix, prefix.to_str().unwrap()).unwrap();

        assert_eq!(files.matrix, tempdir.path().join("counts_matrix.mtx.gz"));
        assert_eq!(
            read_gz(&files.matrix),
            "%%MatrixMarket matrix coordinate integer general\n2 3 2\n1 2 3\n2 3 4\n"
        );
        assert_eq!(read_gz(&files.barcodes), "CELL_A\nCELL_B\n");
        assert_eq!(read_gz(&files.features), "GENE_1\nGENE_2\nGENE_3\n");
    }

    #[rstest]
    fn test_features_carry_intervals() {
        let tempdir = tempfile::tempdir().unwrap();
        let prefix = tempdir.path().join("genes");
        let matrix = AnnotatedMatrix::new(
            names(&["CELL_A"]),
            names(&["GENE_1", "GENE_2"]),
            Counts::Dense(array![[1, 0]]),
        )
        .unwrap()
        .with_var_intervals(names(&["chr1:120-450", "chr2:0-2000"]));

        let files = write_counts_to_mtx(&matrix, prefix.to_str().unwrap()).unwrap();

        assert_eq!(
            read_gz(&files.features),
            "GENE_1\tchr1:120-450\nGENE_2\tchr2:0-2000\n"
        );
    }

    #[rstest]
    fn test_write_dense_mtx_skips_zeros() {
        let tempdir = tempfile::tempdir().unwrap();
        let prefix = tempdir.path().join("pileup");
        let matrix = AnnotatedMatrix::new(
            names(&["CELL_A"]),
            names(&["10", "11"]),
            Counts::Dense(array![[0, 7]]),
        )
        .unwrap();

        let files = write_counts_to_mtx(&matrix, prefix.to_str().unwrap()).unwrap();

        assert_eq!(
            read_gz(&files.matrix),
            "%%MatrixMarket matrix coordinate integer general\n1 2 1\n1 2 7\n"
        );
    }

    #[rstest]
    fn test_write_tsv() {
        let tempdir = tempfile::tempdir().unwrap();
        let path = tempdir.path().join("pileup.tsv");
        let matrix = AnnotatedMatrix::new(
            names(&["CELL_A", "CELL_B"]),
            names(&["-1", "0", "1"]),
            Counts::Dense(array![[0, 1, 2], [3, 0, 0]]),
        )
        .unwrap();

        write_counts_to_tsv(&matrix, &path).unwrap();

        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "cell\t-1\t0\t1\nCELL_A\t0\t1\t2\nCELL_B\t3\t0\t0\n"
        );
    }
}
