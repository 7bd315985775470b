mod count;
mod fetch;
mod index;
mod pileup;
mod tss;

use anyhow::Result;
use clap::{Arg, ArgAction, Command};

pub mod consts {
    pub const VERSION: &str = env!("CARGO_PKG_VERSION");
    pub const BIN_NAME: &str = "atacfrag";
}

fn build_parser() -> Command {
    Command::new(consts::BIN_NAME)
        .bin_name(consts::BIN_NAME)
        .version(consts::VERSION)
        .about("Pileups and count matrices from single-cell ATAC-seq fragment files.")
        .subcommand_required(true)
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(ArgAction::Count)
                .global(true)
                .help("Verbosity level (-v = info, -vv = debug)"),
        )
        .subcommand(count::cli::create_count_cli())
        .subcommand(pileup::cli::create_pileup_cli())
        .subcommand(tss::cli::create_tss_cli())
        .subcommand(fetch::cli::create_fetch_cli())
        .subcommand(index::cli::create_index_cli())
}

fn init_logger(verbose: u8) {
    env_logger::Builder::new()
        .filter_level(match verbose {
            0 => log::LevelFilter::Error,
            1 => log::LevelFilter::Info,
            _ => log::LevelFilter::Debug,
        })
        .init();
}

fn main() -> Result<()> {
    let app = build_parser();
    let matches = app.get_matches();

    match matches.subcommand() {
        //
        // FEATURE COUNTS
        //
        Some((count::cli::COUNT_CMD, matches)) => {
            init_logger(matches.get_count("verbose"));
            count::handlers::run_count(matches)?;
        }

        //
        // REGION PILEUP
        //
        Some((pileup::cli::PILEUP_CMD, matches)) => {
            init_logger(matches.get_count("verbose"));
            pileup::handlers::run_pileup(matches)?;
        }

        //
        // TSS PILEUP
        //
        Some((tss::cli::TSS_CMD, matches)) => {
            init_logger(matches.get_count("verbose"));
            tss::handlers::run_tss(matches)?;
        }

        //
        // FRAGMENT EXTRACTION
        //
        Some((fetch::cli::FETCH_CMD, matches)) => {
            init_logger(matches.get_count("verbose"));
            fetch::handlers::run_fetch(matches)?;
        }

        //
        // TABIX INDEX
        //
        Some((index::cli::INDEX_CMD, matches)) => {
            init_logger(matches.get_count("verbose"));
            index::handlers::run_index(matches)?;
        }

        _ => unreachable!("Subcommand not found"),
    };

    Ok(())
}
