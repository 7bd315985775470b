use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use clap::ArgMatches;

use atacfrag_core::models::FeatureSet;
use atacfrag_core::utils::{get_dynamic_writer, read_barcodes};
use atacfrag_pileup::{
    AnnotatedMatrix, FragmentFile, TssOptions, locate_fragments, tss_pileup, tss_profile,
    write_counts_to_tsv,
};

use super::cli::DEFAULT_OUT;

pub fn run_tss(matches: &ArgMatches) -> Result<()> {
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
    let profile = matches.get_one::<String>("profile");

    let defaults = TssOptions::default();
    let options = TssOptions {
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

    let pileup = tss_pileup::<FragmentFile>(&mut adata, &features, &options)?;
    write_counts_to_tsv(&pileup, Path::new(output))?;

    if let Some(profile) = profile {
        let mx = pileup
            .x
            .as_dense()
            .context("TSS pileup is expected to be dense")?;

        let mut writer = get_dynamic_writer(Path::new(profile))?;
        writeln!(writer, "position\tcount")?;
        for (position, count) in pileup.var_names.iter().zip(tss_profile(mx).iter()) {
            writeln!(writer, "{}\t{}", position, count)?;
        }
        writer.flush()?;
    }

    Ok(())
}
