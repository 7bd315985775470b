use ndarray::{Array1, Array2, Axis};

use atacfrag_core::Position;
use atacfrag_core::models::FeatureSet;

use crate::cell_index::CellIndex;
use crate::connection::connect_fragments;
use crate::consts::DEFAULT_TSS_FLANK;
use crate::data::{AnnotatedMatrix, Counts};
use crate::errors::{FragmentError, Result};
use crate::pileup::accumulate;
use crate::progress::feature_progress;
use crate::store::FragmentStore;

#[derive(Debug, Clone)]
pub struct TssOptions {
    pub extend_upstream: u32,
    pub extend_downstream: u32,
    pub progress: bool,
}

impl Default for TssOptions {
    fn default() -> Self {
        TssOptions {
            extend_upstream: DEFAULT_TSS_FLANK,
            extend_downstream: DEFAULT_TSS_FLANK,
            progress: true,
        }
    }
}

///
/// Pile up fragments around transcription start sites. Returns a dense cell x position matrix
/// that can be used for QC.
///
/// The start of every feature is taken as its TSS. Column `j` stands for the offset
/// `j - extend_upstream` from the TSS, and the fragments of all features are summed into the
/// same matrix. Features on chromosomes that are not in the fragments file are dropped.
///
/// # Arguments
/// - adata: matrix with a located fragments file; its cells become the rows
/// - features: feature annotation with the TSS as start, e.g. genes
/// - options: number of bases upstream and downstream of the TSS
pub fn tss_pileup<S: FragmentStore>(
    adata: &mut AnnotatedMatrix,
    features: &FeatureSet,
    options: &TssOptions,
) -> Result<AnnotatedMatrix> {
    if adata.files.fragments().is_none() {
        return Err(FragmentError::NotLocated);
    }

    let cells = CellIndex::new(&adata.obs_names)?;

    let width = options.extend_upstream as usize + options.extend_downstream as usize + 1;
    // Not sparse since most positions are expected to be filled
    let mut mx = Array2::<u32>::zeros((adata.n_obs(), width));

    let mut fragments: S = connect_fragments(adata, None)?;
    let piled = pileup_sites(&mut mx, &mut fragments, &cells, features, options);
    let closed = fragments.close();
    piled?;
    closed?;

    let upstream = Position::from(options.extend_upstream);
    let downstream = Position::from(options.extend_downstream);
    let var_names = (-upstream..=downstream).map(|p| p.to_string()).collect();

    AnnotatedMatrix::new(adata.obs_names.clone(), var_names, Counts::Dense(mx))
}

fn pileup_sites<S: FragmentStore>(
    mx: &mut Array2<u32>,
    fragments: &mut S,
    cells: &CellIndex,
    features: &FeatureSet,
    options: &TssOptions,
) -> Result<()> {
    // Subset the features to the chromosomes present in the fragments file
    let features = features.filter_chromosomes(|chrom| fragments.has_contig(chrom));

    log::info!(
        "Piling up fragments in {} cells around {} TSS...",
        cells.len(),
        features.len()
    );

    let bar = feature_progress(features.len(), options.progress, "Fetching regions");

    for feature in &features {
        bar.inc(1);

        let tss_start = feature.start - Position::from(options.extend_upstream);
        let tss_end = feature.start + Position::from(options.extend_downstream);

        accumulate(mx, fragments, cells, &feature.chr, tss_start, tss_end)?;
    }

    bar.finish_and_clear();

    Ok(())
}

///
/// Total counts per position of a TSS pileup, summed over cells.
///
pub fn tss_profile(mx: &Array2<u32>) -> Array1<u64> {
    mx.map(|&v| u64::from(v)).sum_axis(Axis(0))
}
