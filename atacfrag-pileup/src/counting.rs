use std::borrow::Cow;

use sprs::{CsMat, TriMat};

use atacfrag_core::models::FeatureSet;

use crate::cell_index::CellIndex;
use crate::connection::connect_fragments;
use crate::consts::{DEFAULT_GENE_DOWNSTREAM, DEFAULT_GENE_UPSTREAM};
use crate::data::{AnnotatedMatrix, AtacData, Counts};
use crate::errors::{FragmentError, Result};
use crate::progress::feature_progress;
use crate::store::FragmentStore;

#[derive(Debug, Clone)]
pub struct CountOptions {
    /// Bases to extend every feature upstream (2000 by default, to cover promoters).
    pub extend_upstream: u32,
    /// Bases to extend every feature downstream.
    pub extend_downstream: u32,
    pub progress: bool,
}

impl Default for CountOptions {
    fn default() -> Self {
        CountOptions {
            extend_upstream: DEFAULT_GENE_UPSTREAM,
            extend_downstream: DEFAULT_GENE_DOWNSTREAM,
            progress: true,
        }
    }
}

///
/// Count fragments overlapping given features. Returns a sparse cells x features matrix.
///
/// Every fragment of a known cell that overlaps the (extended) feature adds its score to the
/// cell's count for that feature. The fragments file must have been located on the ATAC
/// modality beforehand (see [crate::connection::locate_fragments]).
///
/// # Arguments
/// - data: a matrix or multimodal data with an `atac` modality; its cells become the rows
/// - features: feature annotation, e.g. genes. When `None`, gene intervals of the `rna`
///   modality are used if there are any.
/// - options: extension and progress settings
pub fn count_fragments_features<S, D>(
    data: &mut D,
    features: Option<&FeatureSet>,
    options: &CountOptions,
) -> Result<AnnotatedMatrix>
where
    S: FragmentStore,
    D: AtacData + ?Sized,
{
    let obs_names = data.atac()?.obs_names.clone();

    let features = match features {
        Some(features) => Cow::Borrowed(features),
        // Try to get gene annotation from the rna modality
        None => Cow::Owned(
            data.gene_annotation()
                .ok_or(FragmentError::MissingFeatures)?,
        ),
    };

    let cells = CellIndex::new(&obs_names)?;

    let mut fragments: S = connect_fragments(data, None)?;
    let counted = count_features(&mut fragments, &cells, &features, options);
    // The connection has to be closed
    let closed = fragments.close();

    let mx = counted.map_err(|e| {
        log::error!("{}", e);
        e
    })?;
    closed?;

    // keep the feature coordinates next to their names
    let intervals = features.iter().map(|feature| feature.to_string()).collect();

    Ok(
        AnnotatedMatrix::new(obs_names, features.names(), Counts::Sparse(mx))?
            .with_var_intervals(intervals),
    )
}

///
/// Fill a features x cells matrix row by row, then flip it to cells x features.
///
fn count_features<S: FragmentStore>(
    fragments: &mut S,
    cells: &CellIndex,
    features: &FeatureSet,
    options: &CountOptions,
) -> Result<CsMat<u32>> {
    let mut mx: TriMat<u32> = TriMat::new((features.len(), cells.len()));

    log::info!(
        "Counting fragments in {} cells for {} features...",
        cells.len(),
        features.len()
    );

    let bar = feature_progress(features.len(), options.progress, "Counting fragments");

    for (i, feature) in features.iter().enumerate() {
        bar.inc(1);

        if !fragments.has_contig(&feature.chr) {
            log::debug!(
                "Skipping feature {}: chromosome {} is not in the fragments file",
                feature.display_name(),
                feature.chr
            );
            continue;
        }

        let region = feature.extend(options.extend_upstream, options.extend_downstream);
        for fr in fragments.fetch(&region.chr, region.start, region.end)? {
            if let Some(col) = cells.get(&fr.barcode) {
                // number of cuts per fragment
                mx.add_triplet(i, col, fr.score);
            }
        }
    }

    bar.finish_and_clear();

    // Faster to convert to csr first and then transpose; duplicates are summed on conversion
    let mx: CsMat<u32> = mx.to_csr();
    Ok(mx.transpose_into().to_csr())
}
