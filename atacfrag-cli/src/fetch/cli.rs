use clap::{Arg, Command, arg, value_parser};

pub const FETCH_CMD: &str = "fetch";
pub const DEFAULT_OUT: &str = "fragments_table.tsv.gz";

pub fn create_fetch_cli() -> Command {
    Command::new(FETCH_CMD)
        .about("Extract the fragments of all cells overlapping a region or a set of features.")
        .arg(Arg::new("fragments").required(true).help("Fragments file (tsv.gz, bgzip-compressed, with a .tbi index)"))
        .arg(
            Arg::new("features")
                .required(true)
                .help("BED-like feature file, or a single region as chrom:start-end"),
        )
        .arg(arg!(--output <OUTPUT> "Output table (gzipped when it ends in .gz)").default_value(DEFAULT_OUT))
        .arg(
            arg!(--upstream <UPSTREAM> "Bases to extend every feature upstream")
                .value_parser(value_parser!(u32))
                .default_value("0"),
        )
        .arg(
            arg!(--downstream <DOWNSTREAM> "Bases to extend every feature downstream")
                .value_parser(value_parser!(u32))
                .default_value("0"),
        )
        .arg(
            arg!(--relative "Report coordinates relative to the feature midpoint")
                .action(clap::ArgAction::SetTrue),
        )
}
