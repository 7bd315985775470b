use clap::{Arg, Command, arg};

pub const PILEUP_CMD: &str = "pileup";
pub const DEFAULT_OUT: &str = "pileup.tsv.gz";

pub fn create_pileup_cli() -> Command {
    Command::new(PILEUP_CMD)
        .about("Pile up fragments per cell and base over one region (chr1:1000-2000).")
        .arg(Arg::new("fragments").required(true).help("Fragments file (tsv.gz, bgzip-compressed, with a .tbi index)"))
        .arg(Arg::new("barcodes").required(true).help("Cell barcodes, one per line"))
        .arg(Arg::new("region").required(true).help("Region as chrom:start-end"))
        .arg(arg!(--output <OUTPUT> "Output table (gzipped when it ends in .gz)").default_value(DEFAULT_OUT))
}
