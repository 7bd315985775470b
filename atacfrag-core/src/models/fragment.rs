use std::str::FromStr;

use crate::Position;
use crate::consts::FRAGMENT_COLUMNS;
use crate::errors::{RegionError, Result};

///
/// One record of a fragments file:
///
/// ```text
/// chr1 10000 11000 GTCAGTCAGTCAGTCA-1 1
/// ^    ^     ^     ^                  ^
/// |    |     |     barcode            score (number of cuts supporting the fragment)
/// |    |     end (exclusive)
/// |    start (0-based, inclusive)
/// chromosome
/// ```
///
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fragment {
    pub chr: String,
    pub start: Position,
    pub end: Position,
    pub barcode: String,
    pub score: u32,
}

impl Fragment {
    pub fn new(
        chr: impl Into<String>,
        start: Position,
        end: Position,
        barcode: impl Into<String>,
        score: u32,
    ) -> Self {
        Fragment {
            chr: chr.into(),
            start,
            end,
            barcode: barcode.into(),
            score,
        }
    }

    /// Whether the fragment overlaps the half-open interval `[start, end)`. An empty
    /// interval overlaps nothing.
    #[inline]
    pub fn overlaps(&self, start: Position, end: Position) -> bool {
        start < end && self.start < end && self.end > start
    }
}

impl FromStr for Fragment {
    type Err = RegionError;

    fn from_str(s: &str) -> Result<Self> {
        let parts: Vec<&str> = s.split_whitespace().collect();
        if parts.len() != FRAGMENT_COLUMNS {
            return Err(RegionError::MalformedFragment(s.to_string()));
        }

        let malformed = |_| RegionError::MalformedFragment(s.to_string());

        let start = parts[1].parse::<Position>().map_err(malformed)?;
        let end = parts[2].parse::<Position>().map_err(malformed)?;
        let score = parts[4].parse::<u32>().map_err(malformed)?;

        if start > end {
            return Err(RegionError::MalformedFragment(s.to_string()));
        }

        Ok(Fragment {
            chr: parts[0].to_string(),
            start,
            end,
            barcode: parts[3].to_string(),
            score,
        })
    }
}
