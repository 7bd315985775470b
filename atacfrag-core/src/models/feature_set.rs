use std::io::BufRead;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::consts::HEADER_PREFIXES;
use crate::errors::{RegionError, Result};
use crate::models::Region;
use crate::utils::get_dynamic_reader;

///
/// FeatureSet struct, an ordered table of features (genes, TSSs, peaks, ...).
///
/// Order is significant: it becomes the column order of count matrices built from the set.
///
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FeatureSet {
    pub features: Vec<Region>,
    pub path: Option<PathBuf>,
}

impl FeatureSet {
    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Region> {
        self.features.iter()
    }

    /// Feature names, falling back to `chrom:start-end` for unnamed features.
    pub fn names(&self) -> Vec<String> {
        self.features.iter().map(Region::display_name).collect()
    }

    ///
    /// Keep only the features whose chromosome satisfies `keep`, preserving order.
    ///
    pub fn filter_chromosomes<F>(&self, keep: F) -> FeatureSet
    where
        F: Fn(&str) -> bool,
    {
        FeatureSet {
            features: self
                .features
                .iter()
                .filter(|f| keep(&f.chr))
                .cloned()
                .collect(),
            path: self.path.clone(),
        }
    }
}

impl From<Vec<Region>> for FeatureSet {
    fn from(features: Vec<Region>) -> Self {
        FeatureSet {
            features,
            path: None,
        }
    }
}

impl<'a> IntoIterator for &'a FeatureSet {
    type Item = &'a Region;
    type IntoIter = std::slice::Iter<'a, Region>;

    fn into_iter(self) -> Self::IntoIter {
        self.features.iter()
    }
}

impl FromStr for FeatureSet {
    type Err = RegionError;

    ///
    /// Parse a single region string (`chr1:1-2000000` or `chr1-1-2000000`) into a
    /// one-feature set.
    fn from_str(s: &str) -> Result<Self> {
        Ok(FeatureSet::from(vec![Region::from_str(s)?]))
    }
}

impl TryFrom<&Path> for FeatureSet {
    type Error = RegionError;

    ///
    /// Create a new [FeatureSet] from a BED-like file.
    ///
    /// The first three columns are chromosome, start and end; a fourth column, if present,
    /// is used as the feature name. `track`, `browser` and `#` lines are skipped, as is a
    /// leading column header such as `Chromosome Start End Name`.
    ///
    /// # Arguments:
    /// - value: path to bed file on disk, optionally gzip'd.
    fn try_from(value: &Path) -> Result<Self> {
        let reader = get_dynamic_reader(value)?;

        let mut features: Vec<Region> = Vec::new();
        let mut first_line = true;

        for (index, line) in reader.lines().enumerate() {
            let line = line?;

            if line.trim().is_empty() || HEADER_PREFIXES.iter().any(|p| line.starts_with(p)) {
                continue;
            }

            let parts: Vec<&str> = line.split('\t').collect();
            let malformed = || RegionError::MalformedFeature {
                line: index + 1,
                content: line.clone(),
            };

            if parts.len() < 3 {
                return Err(malformed());
            }

            // Handling column headers like `chr start end etc` without #
            if first_line {
                first_line = false;
                if parts[1].parse::<i64>().is_err() {
                    continue;
                }
            }

            let start = parts[1].parse().map_err(|_| malformed())?;
            let end = parts[2].parse().map_err(|_| malformed())?;
            let mut region = Region::new(parts[0], start, end).map_err(|_| malformed())?;
            if let Some(name) = parts.get(3).filter(|n| !n.is_empty()) {
                region = region.with_name(*name);
            }

            features.push(region);
        }

        if features.is_empty() {
            return Err(RegionError::EmptyFeatureFile(value.display().to_string()));
        }

        Ok(FeatureSet {
            features,
            path: Some(value.to_owned()),
        })
    }
}

impl TryFrom<&str> for FeatureSet {
    type Error = RegionError;

    fn try_from(value: &str) -> Result<Self> {
        FeatureSet::try_from(Path::new(value))
    }
}

impl TryFrom<PathBuf> for FeatureSet {
    type Error = RegionError;

    fn try_from(value: PathBuf) -> Result<Self> {
        FeatureSet::try_from(value.as_path())
    }
}
