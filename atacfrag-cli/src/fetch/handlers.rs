use std::path::Path;

use anyhow::{Context, Result};
use clap::ArgMatches;

use atacfrag_core::models::FeatureSet;
use atacfrag_pileup::{ExtractOptions, FragmentFile, fetch_regions_to_df};

use super::cli::DEFAULT_OUT;

pub fn run_fetch(matches: &ArgMatches) -> Result<()> {
    let fragments = matches
        .get_one::<String>("fragments")
        .context("A path to a fragments file is required.")?;
    let features = matches
        .get_one::<String>("features")
        .context("A feature file or a region is required.")?;

    let default_out = DEFAULT_OUT.to_string();
    let output = matches.get_one::<String>("output").unwrap_or(&default_out);

    let defaults = ExtractOptions::default();
    let options = ExtractOptions {
        extend_upstream: matches
            .get_one::<u32>("upstream")
            .copied()
            .unwrap_or(defaults.extend_upstream),
        extend_downstream: matches
            .get_one::<u32>("downstream")
            .copied()
            .unwrap_or(defaults.extend_downstream),
        relative_coordinates: matches.get_flag("relative"),
        progress: false,
    };

    let fragments = Path::new(fragments);
    // anything that is not a file is taken for a region string
    let table = match Path::new(features).is_file() {
        true => {
            let features = FeatureSet::try_from(Path::new(features))
                .with_context(|| format!("Failed to read features from {}", features))?;
            fetch_regions_to_df::<FragmentFile>(fragments, &features, &options)?
        }
        false => fetch_regions_to_df::<FragmentFile>(fragments, features.as_str(), &options)?,
    };

    table.write_tsv(Path::new(output))?;
    log::info!("{} fragments written to {}", table.len(), output);

    Ok(())
}
