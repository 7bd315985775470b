//! Shared fixtures for the unit tests.
use std::collections::BTreeSet;
use std::fs::File;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use noodles::bgzf;
use rstest::*;

use atacfrag_core::Position;
use atacfrag_core::models::Fragment;
use atacfrag_core::utils::get_dynamic_reader;

use crate::errors::Result;
use crate::store::{FragmentStore, index_fragments, unknown_contig};

pub fn example_fragments() -> Vec<Fragment> {
    vec![
        Fragment::new("chr1", 100, 200, "CELL_A", 2),
        Fragment::new("chr1", 150, 300, "CELL_B", 1),
        Fragment::new("chr1", 400, 500, "CELL_A", 1),
        Fragment::new("chr2", 1000, 1100, "CELL_C", 4),
    ]
}

pub fn example_store() -> MemoryStore {
    MemoryStore::from_fragments("fragments.tsv.gz", example_fragments())
}

#[fixture]
pub fn fragment_store() -> MemoryStore {
    example_store()
}

#[fixture]
pub fn cells() -> Vec<String> {
    vec!["CELL_A".to_string(), "CELL_B".to_string(), "CELL_C".to_string()]
}

/// Write `lines` bgzip-compressed, without an index.
pub fn write_bgzf_lines(dir: &Path, file_name: &str, lines: &[&str]) -> PathBuf {
    let path = dir.join(file_name);
    let mut writer = bgzf::Writer::new(File::create(&path).unwrap());
    for line in lines {
        writeln!(writer, "{}", line).unwrap();
    }
    writer.try_finish().unwrap();
    path
}

/// Write `lines` bgzip-compressed and index them.
pub fn write_fragment_lines(dir: &Path, file_name: &str, lines: &[&str]) -> PathBuf {
    let path = write_bgzf_lines(dir, file_name, lines);
    index_fragments(&path).unwrap();
    path
}

/// Write `fragments` as an indexed `fragments.tsv.gz`. They must be sorted by position.
pub fn write_fragments_file(dir: &Path, file_name: &str, fragments: &[Fragment]) -> PathBuf {
    let lines: Vec<String> = fragments
        .iter()
        .map(|f| format!("{}\t{}\t{}\t{}\t{}", f.chr, f.start, f.end, f.barcode, f.score))
        .collect();
    let lines: Vec<&str> = lines.iter().map(String::as_str).collect();
    write_fragment_lines(dir, file_name, &lines)
}

///
/// A store over records held in memory, for tests that don't need a file.
///
#[derive(Debug)]
pub struct MemoryStore {
    path: PathBuf,
    contigs: BTreeSet<String>,
    fragments: Vec<Fragment>,
}

impl MemoryStore {
    pub fn from_fragments<P: Into<PathBuf>>(path: P, mut fragments: Vec<Fragment>) -> Self {
        fragments.sort_by(|a, b| (&a.chr, a.start, a.end).cmp(&(&b.chr, b.start, b.end)));
        MemoryStore {
            path: path.into(),
            contigs: fragments.iter().map(|f| f.chr.clone()).collect(),
            fragments,
        }
    }
}

impl FragmentStore for MemoryStore {
    fn open(path: &Path) -> Result<Self> {
        let mut fragments = Vec::new();
        for line in get_dynamic_reader(path)?.lines() {
            let line = line?;
            if !line.is_empty() && !line.starts_with('#') {
                fragments.push(Fragment::from_str(&line)?);
            }
        }
        Ok(MemoryStore::from_fragments(path, fragments))
    }

    fn fetch(&mut self, chrom: &str, start: Position, end: Position) -> Result<Vec<Fragment>> {
        if !self.has_contig(chrom) {
            return Err(unknown_contig(&*self, chrom));
        }
        Ok(self
            .fragments
            .iter()
            .filter(|f| f.chr == chrom && f.overlaps(start, end))
            .cloned()
            .collect())
    }

    fn contigs(&self) -> &BTreeSet<String> {
        &self.contigs
    }

    fn path(&self) -> &Path {
        &self.path
    }
}

///
/// A store that remembers every range it was asked for.
///
pub struct RecordingStore<S> {
    inner: S,
    pub fetched: Vec<(String, Position, Position)>,
}

impl<S> RecordingStore<S> {
    pub fn new(inner: S) -> Self {
        RecordingStore {
            inner,
            fetched: Vec::new(),
        }
    }
}

impl<S: FragmentStore> FragmentStore for RecordingStore<S> {
    fn open(path: &Path) -> Result<Self> {
        Ok(RecordingStore::new(S::open(path)?))
    }

    fn fetch(&mut self, chrom: &str, start: Position, end: Position) -> Result<Vec<Fragment>> {
        self.fetched.push((chrom.to_string(), start, end));
        self.inner.fetch(chrom, start, end)
    }

    fn contigs(&self) -> &BTreeSet<String> {
        self.inner.contigs()
    }

    fn path(&self) -> &Path {
        self.inner.path()
    }
}
