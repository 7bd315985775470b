use clap::{Arg, Command, arg, value_parser};

pub const TSS_CMD: &str = "tss";
pub const DEFAULT_OUT: &str = "tss_pileup.tsv.gz";

pub fn create_tss_cli() -> Command {
    Command::new(TSS_CMD)
        .about("Pile up fragments per cell around transcription start sites (feature starts).")
        .arg(Arg::new("fragments").required(true).help("Fragments file (tsv.gz, bgzip-compressed, with a .tbi index)"))
        .arg(Arg::new("barcodes").required(true).help("Cell barcodes, one per line"))
        .arg(Arg::new("features").required(true).help("BED-like feature file, start is the TSS"))
        .arg(arg!(--output <OUTPUT> "Output table (gzipped when it ends in .gz)").default_value(DEFAULT_OUT))
        .arg(
            arg!(--upstream <UPSTREAM> "Bases upstream of the TSS")
                .value_parser(value_parser!(u32))
                .default_value("1000"),
        )
        .arg(
            arg!(--downstream <DOWNSTREAM> "Bases downstream of the TSS")
                .value_parser(value_parser!(u32))
                .default_value("1000"),
        )
        .arg(arg!(--profile <PROFILE> "Also write the summed counts per position to this file"))
        .arg(
            Arg::new("no-progress")
                .long("no-progress")
                .action(clap::ArgAction::SetTrue)
                .help("Don't show a progress bar"),
        )
}
