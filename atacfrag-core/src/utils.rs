use std::ffi::OsStr;
use std::fs::File;
use std::io::prelude::*;
use std::io::{BufRead, BufReader, BufWriter};
use std::path::Path;

use flate2::Compression;
use flate2::read::MultiGzDecoder;
use flate2::write::GzEncoder;

use crate::errors::{RegionError, Result};

fn is_gzipped(path: &Path) -> bool {
    path.extension() == Some(OsStr::new("gz"))
}

///
/// Get a reader for either a gzip'd or non-gzip'd file.
///
/// Fragments files are usually bgzip'd, which is a series of concatenated gzip members,
/// so the multi-member decoder is used.
///
/// # Arguments
///
/// - path: path to the file to read
///
pub fn get_dynamic_reader(path: &Path) -> Result<BufReader<Box<dyn Read>>> {
    let file = File::open(path).map_err(|source| RegionError::FileReadError {
        path: path.display().to_string(),
        source,
    })?;
    let file: Box<dyn Read> = match is_gzipped(path) {
        true => Box::new(MultiGzDecoder::new(file)),
        false => Box::new(file),
    };

    Ok(BufReader::new(file))
}

///
/// Get a writer that gzip-compresses its output when the path ends in `.gz`.
///
/// Parent directories are created if needed.
///
/// # Arguments
///
/// - path: path to the file to create
///
pub fn get_dynamic_writer(path: &Path) -> Result<Box<dyn Write>> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let file = File::create(path)?;
    let writer: Box<dyn Write> = match is_gzipped(path) {
        true => Box::new(GzEncoder::new(BufWriter::new(file), Compression::default())),
        false => Box::new(BufWriter::new(file)),
    };

    Ok(writer)
}

///
/// Read a list of cell barcodes, one per line. Blank lines are ignored.
///
/// Only the first whitespace-delimited field is kept, so 10x `barcodes.tsv` files
/// with extra columns work as-is.
///
pub fn read_barcodes<P: AsRef<Path>>(path: P) -> Result<Vec<String>> {
    let reader = get_dynamic_reader(path.as_ref())?;
    let mut barcodes = Vec::new();

    for line in reader.lines() {
        let line = line?;
        if let Some(barcode) = line.split_whitespace().next() {
            barcodes.push(barcode.to_string());
        }
    }

    Ok(barcodes)
}
