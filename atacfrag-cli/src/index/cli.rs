use clap::{Arg, Command};

pub const INDEX_CMD: &str = "index";

pub fn create_index_cli() -> Command {
    Command::new(INDEX_CMD)
        .about("Write the tabix index (.tbi) of a bgzip-compressed, position-sorted fragments file.")
        .arg(Arg::new("fragments").required(true).help("Fragments file (tsv.gz, bgzip-compressed)"))
}
