use std::path::Path;

use ndarray::{Array2, s};

use atacfrag_core::Position;

use crate::cell_index::CellIndex;
use crate::data::{AnnotatedMatrix, Counts};
use crate::errors::{FragmentError, Result};
use crate::store::{FragmentStore, unknown_contig};

///
/// Add the fragments overlapping `[start, end)` on `chrom` to an existing cell x position
/// matrix.
///
/// Column `j` of `mx` stands for position `start + j`. Each fragment of a known cell adds its
/// score to the columns it covers, clipped to `[0, mx.ncols())`; fragments of cells that are
/// not in `cells` are skipped. Overlapping fragments of the same cell add up.
///
/// # Arguments
/// - mx: matrix with one row per cell of `cells`
/// - fragments: an open fragment store
/// - cells: barcode to row index
/// - chrom: chromosome, must be known to the store
/// - start: first position of the region
/// - end: end of the region (exclusive)
pub fn accumulate<S: FragmentStore>(
    mx: &mut Array2<u32>,
    fragments: &mut S,
    cells: &CellIndex,
    chrom: &str,
    start: Position,
    end: Position,
) -> Result<()> {
    if start > end {
        return Err(FragmentError::InvalidRange {
            chrom: chrom.to_string(),
            start,
            end,
        });
    }

    if !fragments.has_contig(chrom) {
        return Err(unknown_contig(&*fragments, chrom));
    }

    if mx.nrows() != cells.len() {
        return Err(FragmentError::ShapeMismatch {
            shape: mx.dim(),
            n_obs: cells.len(),
            n_vars: mx.ncols(),
        });
    }

    let width = mx.ncols() as Position;

    for fr in fragments.fetch(chrom, start, end)? {
        let Some(row) = cells.get(&fr.barcode) else {
            continue;
        };

        // ends are non-inclusive
        let col_start = (fr.start - start).max(0);
        let col_end = (fr.end - start).min(width);
        if col_start >= col_end {
            continue;
        }

        let mut cols = mx.slice_mut(s![row, col_start as usize..col_end as usize]);
        cols += fr.score;
    }

    Ok(())
}

///
/// Pile up fragments in a region. Returns a cell x position matrix that can be used for QC,
/// one column per base of `[start, end)`.
///
/// The store is consumed and closed before returning.
///
/// # Arguments
/// - fragments: an open fragment store
/// - cells: barcodes of the cells to keep, in output row order
/// - chrom: chromosome of the region
/// - start: start position
/// - end: end position (exclusive)
pub fn region_pileup<S, C>(
    mut fragments: S,
    cells: &[C],
    chrom: &str,
    start: Position,
    end: Position,
) -> Result<AnnotatedMatrix>
where
    S: FragmentStore,
    C: AsRef<str>,
{
    let result = pileup_into_matrix(&mut fragments, cells, chrom, start, end);
    fragments.close()?;
    result
}

///
/// Open the fragments file at `path` and pile up fragments in a region, see [region_pileup].
///
pub fn region_pileup_from_path<S, C>(
    path: &Path,
    cells: &[C],
    chrom: &str,
    start: Position,
    end: Position,
) -> Result<AnnotatedMatrix>
where
    S: FragmentStore,
    C: AsRef<str>,
{
    if start > end {
        return Err(FragmentError::InvalidRange {
            chrom: chrom.to_string(),
            start,
            end,
        });
    }
    region_pileup(S::open(path)?, cells, chrom, start, end)
}

fn pileup_into_matrix<S, C>(
    fragments: &mut S,
    cells: &[C],
    chrom: &str,
    start: Position,
    end: Position,
) -> Result<AnnotatedMatrix>
where
    S: FragmentStore,
    C: AsRef<str>,
{
    if start > end {
        return Err(FragmentError::InvalidRange {
            chrom: chrom.to_string(),
            start,
            end,
        });
    }

    // Check if chromosome present in the fragments file
    if !fragments.has_contig(chrom) {
        return Err(unknown_contig(&*fragments, chrom));
    }

    let index = CellIndex::new(cells)?;
    let mut mx = Array2::<u32>::zeros((cells.len(), (end - start) as usize));

    accumulate(&mut mx, fragments, &index, chrom, start, end)?;

    let obs_names = cells.iter().map(|c| c.as_ref().to_string()).collect();
    let var_names = (start..end).map(|p| p.to_string()).collect();

    AnnotatedMatrix::new(obs_names, var_names, Counts::Dense(mx))
}
