use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::fs::File;
use std::io::BufRead;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use noodles::bgzf;
use noodles::core::Position as IndexPosition;
use noodles::core::region::Interval;
use noodles::csi::BinningIndex;
use noodles::csi::binning_index::index::header;
use noodles::csi::binning_index::index::reference_sequence::bin::Chunk;
use noodles::tabix;

use atacfrag_core::Position;
use atacfrag_core::models::Fragment;

use crate::consts::{TABIX_EXTENSION, TABIX_MAX_POSITION};
use crate::errors::{FragmentError, Result};

///
/// A random-access store of fragment records, keyed by position.
///
/// This is the only seam between the counting code and the on-disk representation of a
/// fragments file. A handle is opened for exactly one path, is owned by whoever opened it,
/// and is released either by [FragmentStore::close] or by being dropped.
///
pub trait FragmentStore: Sized {
    ///
    /// Open a store for the fragments file at `path`.
    ///
    fn open(path: &Path) -> Result<Self>;

    ///
    /// Fetch every record overlapping the half-open interval `[start, end)` on `chrom`.
    ///
    /// Coordinates outside the chromosome (including negative starts) are clipped, not
    /// rejected. Asking for a chromosome the store does not know is an
    /// [FragmentError::UnknownContig].
    fn fetch(&mut self, chrom: &str, start: Position, end: Position) -> Result<Vec<Fragment>>;

    /// The chromosome names known to the store.
    fn contigs(&self) -> &BTreeSet<String>;

    /// The path this store was opened for.
    fn path(&self) -> &Path;

    fn has_contig(&self, chrom: &str) -> bool {
        self.contigs().contains(chrom)
    }

    ///
    /// Release the handle.
    ///
    fn close(self) -> Result<()> {
        log::debug!("Closing fragments file {:?}", self.path());
        Ok(())
    }
}

/// Build the error for a chromosome missing from `store`.
pub fn unknown_contig<S: FragmentStore>(store: &S, chrom: &str) -> FragmentError {
    FragmentError::UnknownContig {
        chrom: chrom.to_string(),
        known: store
            .contigs()
            .iter()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", "),
    }
}

/// Path of the tabix index that belongs to `path`: `fragments.tsv.gz` -> `fragments.tsv.gz.tbi`.
pub fn index_path(path: &Path) -> PathBuf {
    let mut index = path.as_os_str().to_owned();
    index.push(TABIX_EXTENSION);
    PathBuf::from(index)
}

///
/// A bgzip-compressed fragments file (`fragments.tsv.gz`) with its tabix index next to it
/// (`fragments.tsv.gz.tbi`), as written by cellranger-atac.
///
/// Opening reads the index only. The chromosome names come from the index header, and every
/// fetch decodes just the BGZF blocks the index points to for the queried interval.
///
pub struct FragmentFile {
    path: PathBuf,
    contigs: BTreeSet<String>,
    reference_sequence_ids: HashMap<String, usize>,
    index: tabix::Index,
    reader: bgzf::Reader<File>,
}

impl fmt::Debug for FragmentFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FragmentFile")
            .field("path", &self.path)
            .field("contigs", &self.contigs)
            .finish()
    }
}

/// Convert a clipped, non-empty half-open query into the 1-based closed interval of the index.
fn index_interval(
    chrom: &str,
    start: Position,
    end: Position,
) -> Result<(IndexPosition, IndexPosition)> {
    let invalid = || FragmentError::InvalidRange {
        chrom: chrom.to_string(),
        start,
        end,
    };

    let first = usize::try_from(start + 1)
        .ok()
        .and_then(|p| IndexPosition::try_from(p).ok())
        .ok_or_else(invalid)?;
    let last = usize::try_from(end)
        .ok()
        .and_then(|p| IndexPosition::try_from(p).ok())
        .ok_or_else(invalid)?;

    Ok((first, last))
}

impl FragmentStore for FragmentFile {
    fn open(path: &Path) -> Result<Self> {
        let open_error = |reason: String| FragmentError::StoreOpen {
            path: path.to_owned(),
            reason,
        };

        let reader = File::open(path)
            .map(bgzf::Reader::new)
            .map_err(|e| open_error(e.to_string()))?;

        let index_path = index_path(path);
        let index = tabix::read(&index_path)
            .map_err(|e| open_error(format!("can't read index {:?}: {}", index_path, e)))?;

        let reference_sequence_ids: HashMap<String, usize> = index
            .header()
            .ok_or_else(|| open_error(format!("index {:?} has no header", index_path)))?
            .reference_sequence_names()
            .iter()
            .enumerate()
            .map(|(id, name)| (name.to_string(), id))
            .collect();
        let contigs = reference_sequence_ids.keys().cloned().collect();

        log::debug!(
            "Opened {:?} with {} indexed chromosomes",
            path,
            reference_sequence_ids.len()
        );

        Ok(FragmentFile {
            path: path.to_owned(),
            contigs,
            reference_sequence_ids,
            index,
            reader,
        })
    }

    fn fetch(&mut self, chrom: &str, start: Position, end: Position) -> Result<Vec<Fragment>> {
        let Some(&reference_sequence_id) = self.reference_sequence_ids.get(chrom) else {
            return Err(unknown_contig(&*self, chrom));
        };

        let start = start.max(0);
        let end = end.min(TABIX_MAX_POSITION);
        if start >= end {
            return Ok(Vec::new());
        }

        let (first, last) = index_interval(chrom, start, end)?;
        let chunks = self
            .index
            .query(reference_sequence_id, Interval::from(first..=last))?;

        let mut fragments = Vec::new();
        let mut line = String::new();
        for chunk in chunks {
            self.reader.seek(chunk.start())?;

            while self.reader.virtual_position() < chunk.end() {
                line.clear();
                if self.reader.read_line(&mut line)? == 0 {
                    break;
                }

                let record = line.trim_end();
                if record.is_empty() || record.starts_with('#') {
                    continue;
                }

                let fragment = Fragment::from_str(record)?;
                if fragment.chr == chrom && fragment.overlaps(start, end) {
                    fragments.push(fragment);
                }
            }
        }

        Ok(fragments)
    }

    fn contigs(&self) -> &BTreeSet<String> {
        &self.contigs
    }

    fn path(&self) -> &Path {
        &self.path
    }
}

/// Chromosome and 1-based closed span of a fragments line, from its first three columns.
fn record_span(record: &str) -> Option<(&str, IndexPosition, IndexPosition)> {
    let mut fields = record.split('\t');
    let chrom = fields.next()?;
    let start = fields.next()?.parse::<usize>().ok()?;
    let end = fields.next()?.parse::<usize>().ok()?;

    let first = IndexPosition::try_from(start + 1).ok()?;
    // a zero-length fragment still has to occupy one base in the index
    let last = IndexPosition::try_from(end.max(start + 1)).ok()?;

    Some((chrom, first, last))
}

///
/// Build a tabix index for a bgzip-compressed, position-sorted fragments file and write it
/// next to the file (`tabix -p bed fragments.tsv.gz`).
///
/// Only the chromosome, start and end columns are read, so the index can be built for a file
/// whose other columns are never parsed. Returns the path of the written index.
///
pub fn index_fragments(path: &Path) -> Result<PathBuf> {
    let index_error = |reason: String| FragmentError::Index {
        path: path.to_owned(),
        reason,
    };

    let mut reader = File::open(path)
        .map(bgzf::Reader::new)
        .map_err(|e| index_error(e.to_string()))?;

    let mut indexer = tabix::index::Indexer::default();
    indexer.set_header(header::Builder::bed().build());

    let mut line = String::new();
    let mut line_number = 0;
    let mut start_position = reader.virtual_position();

    loop {
        line.clear();
        if reader.read_line(&mut line)? == 0 {
            break;
        }
        line_number += 1;
        let end_position = reader.virtual_position();

        let record = line.trim_end();
        if !record.is_empty() && !record.starts_with('#') {
            let (chrom, first, last) = record_span(record).ok_or_else(|| {
                index_error(format!("line {}: no chromosome, start and end", line_number))
            })?;

            indexer
                .add_record(chrom, first, last, Chunk::new(start_position, end_position))
                .map_err(|e| index_error(format!("line {}: {}", line_number, e)))?;
        }

        start_position = end_position;
    }

    let index = indexer.build();
    let index_path = index_path(path);
    tabix::write(&index_path, &index)?;

    log::info!("Wrote tabix index {:?}", index_path);

    Ok(index_path)
}
