use std::io::Write;
use std::path::Path;
use std::str::FromStr;

use atacfrag_core::Position;
use atacfrag_core::models::{FeatureSet, Fragment, Region};
use atacfrag_core::utils::get_dynamic_writer;

use crate::consts::FRAGMENT_TABLE_HEADER;
use crate::errors::{FragmentError, Result};
use crate::progress::feature_progress;
use crate::store::FragmentStore;

#[derive(Debug, Clone, Default)]
pub struct ExtractOptions {
    pub extend_upstream: u32,
    pub extend_downstream: u32,
    /// Report coordinates relative to the midpoint of each feature.
    pub relative_coordinates: bool,
    pub progress: bool,
}

///
/// What to extract: a set of features, or a single region string (`chr1:100-200`).
///
#[derive(Debug, Clone, Copy)]
pub enum FeatureQuery<'a> {
    Table(&'a FeatureSet),
    Region(&'a str),
}

impl<'a> From<&'a FeatureSet> for FeatureQuery<'a> {
    fn from(value: &'a FeatureSet) -> Self {
        FeatureQuery::Table(value)
    }
}

impl<'a> From<&'a str> for FeatureQuery<'a> {
    fn from(value: &'a str) -> Self {
        FeatureQuery::Region(value)
    }
}

/// One fragment as reported for a feature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FragmentRow {
    pub chromosome: String,
    pub start: Position,
    pub end: Position,
    pub cell: String,
    pub score: u32,
    /// `chrom_start_end` of the (extended) feature the fragment was fetched for.
    pub feature: String,
}

impl FragmentRow {
    fn new(fragment: Fragment, feature: &str, offset: Position) -> Self {
        FragmentRow {
            chromosome: fragment.chr,
            start: fragment.start - offset,
            end: fragment.end - offset,
            cell: fragment.barcode,
            score: fragment.score,
            feature: feature.to_string(),
        }
    }
}

///
/// Fragments extracted for a number of features, in feature order.
///
/// A fragment overlapping several features shows up once per feature.
///
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FragmentTable {
    pub rows: Vec<FragmentRow>,
}

impl FragmentTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FragmentRow> {
        self.rows.iter()
    }

    ///
    /// Write the table as a tab-separated file with a header line.
    ///
    /// The output is gzip-compressed when `path` ends in `.gz`.
    pub fn write_tsv(&self, path: &Path) -> Result<()> {
        let mut writer = get_dynamic_writer(path)?;

        writeln!(writer, "{}", FRAGMENT_TABLE_HEADER.join("\t"))?;
        for row in &self.rows {
            writeln!(
                writer,
                "{}\t{}\t{}\t{}\t{}\t{}",
                row.chromosome, row.start, row.end, row.cell, row.score, row.feature
            )?;
        }
        writer.flush()?;

        Ok(())
    }
}

///
/// Parse a fragments file and return the fragments overlapping the given features as a table
/// with the columns `Chromosome`, `Start`, `End`, `Cell`, `Score` and `Feature`.
///
/// Fragments of all cells are reported. Features on chromosomes that are not in the file are
/// skipped with a log message.
///
/// # Arguments
/// - path: location of the fragments file
/// - features: a [FeatureSet] or a region string such as `chr1:10000-20000`
/// - options: extension of the features, and whether to report coordinates relative to the
///   midpoint of each feature
///
/// An error is returned when no fragment was found for any of the features.
pub fn fetch_regions_to_df<'a, S: FragmentStore>(
    path: &Path,
    features: impl Into<FeatureQuery<'a>>,
    options: &ExtractOptions,
) -> Result<FragmentTable> {
    let parsed;
    let features = match features.into() {
        FeatureQuery::Table(features) => features,
        FeatureQuery::Region(region) => {
            parsed = FeatureSet::from(vec![Region::from_str(region)?]);
            &parsed
        }
    };

    let mut fragments = S::open(path)?;
    let extracted = extract_rows(&mut fragments, features, options);
    let closed = fragments.close();
    let table = extracted?;
    closed?;

    if table.is_empty() {
        return Err(FragmentError::EmptyResult(features.len()));
    }

    Ok(table)
}

fn extract_rows<S: FragmentStore>(
    fragments: &mut S,
    features: &FeatureSet,
    options: &ExtractOptions,
) -> Result<FragmentTable> {
    let mut table = FragmentTable::default();

    let bar = feature_progress(features.len(), options.progress, "Fetching fragments");

    for feature in features {
        bar.inc(1);

        let region = feature.extend(options.extend_upstream, options.extend_downstream);
        let label = region.label();

        let fetched = match fragments.fetch(&region.chr, region.start, region.end) {
            Ok(fetched) => fetched,
            Err(e) if e.is_region_local() => {
                log::warn!("Skipping feature {}: {}", label, e);
                continue;
            }
            Err(e) => return Err(e),
        };

        // midpoint of the feature before extension
        let offset = match options.relative_coordinates {
            true => feature.mid_point(),
            false => 0,
        };

        table.rows.extend(
            fetched
                .into_iter()
                .map(|fragment| FragmentRow::new(fragment, &label, offset)),
        );
    }

    bar.finish_and_clear();

    Ok(table)
}
