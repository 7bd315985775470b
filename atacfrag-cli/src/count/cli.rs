use clap::{Arg, Command, arg, value_parser};

pub const COUNT_CMD: &str = "count";
pub const DEFAULT_OUT: &str = "counts";

pub fn create_count_cli() -> Command {
    Command::new(COUNT_CMD)
        .about("Count fragments per cell over a set of features (e.g. genes). Writes a sparse Matrix Market matrix.")
        .arg(Arg::new("fragments").required(true).help("Fragments file (tsv.gz, bgzip-compressed, with a .tbi index)"))
        .arg(Arg::new("barcodes").required(true).help("Cell barcodes, one per line"))
        .arg(Arg::new("features").required(true).help("BED-like feature file, 4th column used as name"))
        .arg(arg!(--output <PREFIX> "Prefix for the output files").default_value(DEFAULT_OUT))
        .arg(
            arg!(--upstream <UPSTREAM> "Bases to extend every feature upstream")
                .value_parser(value_parser!(u32))
                .default_value("2000"),
        )
        .arg(
            arg!(--downstream <DOWNSTREAM> "Bases to extend every feature downstream")
                .value_parser(value_parser!(u32))
                .default_value("0"),
        )
        .arg(
            Arg::new("no-progress")
                .long("no-progress")
                .action(clap::ArgAction::SetTrue)
                .help("Don't show a progress bar"),
        )
}
