use std::path::Path;

use anyhow::{Context, Result};
use clap::ArgMatches;

use atacfrag_core::models::FeatureSet;
use atacfrag_core::utils::read_barcodes;
use atacfrag_pileup::{
    AnnotatedMatrix, CountOptions, FragmentFile, count_fragments_features, locate_fragments,
    write_counts_to_mtx,
};

use super::cli::DEFAULT_OUT;

pub fn run_count(matches: &ArgMatches) -> Result<()> {
    let fragments = matches
        .get_one::<String>("fragments")
        .context("A path to a fragments file is required.")?;
    let barcodes = matches
        .get_one::<String>("barcodes")
        .context("A path to a barcodes file is required.")?;
    let features = matches
        .get_one::<String>("features")
        .context("A path to a feature file is required.")?;

    let default_out = DEFAULT_OUT.to_string();
    let output = matches.get_one::<String>("output").unwrap_or(&default_out);

    let defaults = CountOptions::default();
    let options = CountOptions {
        extend_upstream: matches
            .get_one::<u32>("upstream")
            .copied()
            .unwrap_or(defaults.extend_upstream),
        extend_downstream: matches
            .get_one::<u32>("downstream")
            .copied()
            .unwrap_or(defaults.extend_downstream),
        progress: !matches.get_flag("no-progress"),
    };

    let barcodes = read_barcodes(barcodes)
        .with_context(|| format!("Failed to read barcodes from {}", barcodes))?;
    let features = FeatureSet::try_from(Path::new(features))
        .with_context(|| format!("Failed to read features from {}", features))?;

    let mut adata = AnnotatedMatrix::from_cells(barcodes);
    locate_fragments::<FragmentFile, _>(&mut adata, Some(Path::new(fragments)))?;

    let counts = count_fragments_features::<FragmentFile, _>(&mut adata, Some(&features), &options)?;

    let files = write_counts_to_mtx(&counts, output)?;
    log::info!("Counts written to {:?}", files.matrix);

    Ok(())
}
