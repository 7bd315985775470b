use std::path::Path;
use std::str::FromStr;

use anyhow::{Context, Result};
use clap::ArgMatches;

use atacfrag_core::models::Region;
use atacfrag_core::utils::read_barcodes;
use atacfrag_pileup::{FragmentFile, region_pileup_from_path, write_counts_to_tsv};

use super::cli::DEFAULT_OUT;

pub fn run_pileup(matches: &ArgMatches) -> Result<()> {
    let fragments = matches
        .get_one::<String>("fragments")
        .context("A path to a fragments file is required.")?;
    let barcodes = matches
        .get_one::<String>("barcodes")
        .context("A path to a barcodes file is required.")?;
    let region = matches
        .get_one::<String>("region")
        .context("A region is required.")?;

    let default_out = DEFAULT_OUT.to_string();
    let output = matches.get_one::<String>("output").unwrap_or(&default_out);

    let region =
        Region::from_str(region).with_context(|| format!("Can't parse region {}", region))?;
    let barcodes = read_barcodes(barcodes)
        .with_context(|| format!("Failed to read barcodes from {}", barcodes))?;

    let pileup = region_pileup_from_path::<FragmentFile, _>(
        Path::new(fragments),
        &barcodes,
        &region.chr,
        region.start,
        region.end,
    )?;

    write_counts_to_tsv(&pileup, Path::new(output))?;
    log::info!("Pileup over {} written to {}", region, output);

    Ok(())
}
