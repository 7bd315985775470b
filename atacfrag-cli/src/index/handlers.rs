use std::path::Path;

use anyhow::{Context, Result};
use clap::ArgMatches;

use atacfrag_pileup::index_fragments;

pub fn run_index(matches: &ArgMatches) -> Result<()> {
    let fragments = matches
        .get_one::<String>("fragments")
        .context("A path to a fragments file is required.")?;

    let index = index_fragments(Path::new(fragments))?;
    log::info!("Index written to {:?}", index);

    Ok(())
}
