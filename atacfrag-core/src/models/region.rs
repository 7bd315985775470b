use std::fmt::{self, Display};
use std::str::FromStr;

use crate::Position;
use crate::errors::{RegionError, Result};

///
/// Region struct, a single feature such as a gene, a TSS or a user supplied interval.
///
/// Coordinates are 0-based, half-open: `[start, end)`.
///
#[derive(Eq, PartialEq, Hash, Debug, Clone)]
pub struct Region {
    pub chr: String,
    pub start: Position,
    pub end: Position,

    pub name: Option<String>,
}

impl Region {
    ///
    /// Create a new unnamed region, checking that `start <= end`.
    ///
    pub fn new(chr: impl Into<String>, start: Position, end: Position) -> Result<Self> {
        if start > end {
            return Err(RegionError::InvalidRange { start, end });
        }
        Ok(Region {
            chr: chr.into(),
            start,
            end,
            name: None,
        })
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    ///
    /// Get the width of the region
    ///
    pub fn width(&self) -> Position {
        self.end - self.start
    }

    /// Midpoint of the region, `start + width / 2` truncated towards zero. Regions that were
    /// extended past the chromosome start can sit at negative positions.
    pub fn mid_point(&self) -> Position {
        // integer division truncates towards zero
        (self.start + self.end) / 2
    }

    ///
    /// Return a copy of this region extended `upstream` bases before its start and
    /// `downstream` bases after its end. The start may become negative.
    ///
    pub fn extend(&self, upstream: u32, downstream: u32) -> Region {
        Region {
            chr: self.chr.clone(),
            start: self.start - Position::from(upstream),
            end: self.end + Position::from(downstream),
            name: self.name.clone(),
        }
    }

    /// Label used to tag records fetched for this region: `chrom_start_end`.
    pub fn label(&self) -> String {
        format!("{}_{}_{}", self.chr, self.start, self.end)
    }

    /// The region name if one is set, otherwise its `chrom:start-end` string.
    pub fn display_name(&self) -> String {
        match &self.name {
            Some(name) => name.clone(),
            None => self.to_string(),
        }
    }
}

impl Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}-{}", self.chr, self.start, self.end)
    }
}

impl FromStr for Region {
    type Err = RegionError;

    ///
    /// Parse a region string of the form `chrom:start-end` or `chrom-start-end`.
    ///
    /// Chromosome names may contain `-` themselves (`HLA-A*01:01`, `chrUn-1`), so
    /// coordinates are taken from the right hand side of the string.
    fn from_str(s: &str) -> Result<Self> {
        let invalid = || RegionError::InvalidRegionString(s.to_string());
        let s = s.trim();

        let (chr, start, end) = match s.rsplit_once(':') {
            Some((chr, range)) => {
                let (start, end) = range.split_once('-').ok_or_else(invalid)?;
                (chr, start, end)
            }
            None => {
                let mut parts = s.rsplitn(3, '-');
                let end = parts.next().ok_or_else(invalid)?;
                let start = parts.next().ok_or_else(invalid)?;
                let chr = parts.next().ok_or_else(invalid)?;
                (chr, start, end)
            }
        };

        if chr.is_empty() {
            return Err(invalid());
        }

        let start = start.replace(',', "").parse::<Position>().map_err(|_| invalid())?;
        let end = end.replace(',', "").parse::<Position>().map_err(|_| invalid())?;

        Region::new(chr, start, end)
    }
}
