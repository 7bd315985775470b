use std::path::PathBuf;

use thiserror::Error;

use atacfrag_core::Position;
use atacfrag_core::errors::RegionError;

/// Error type for fragment pileup and counting operations.
#[derive(Error, Debug)]
pub enum FragmentError {
    /// Neither an explicit path nor a previously located one is available.
    #[error(
        "No fragments file path known: `files.fragments` is empty and no path was given. Please specify one of the two."
    )]
    Configuration,

    #[error("Start must not be greater than end ({chrom}: start = {start}, end = {end})")]
    InvalidRange {
        chrom: String,
        start: Position,
        end: Position,
    },

    #[error("Chromosome {chrom} is not present in fragments file chromosomes: {known}")]
    UnknownContig { chrom: String, known: String },

    #[error(
        "Argument `features` is required. It should be a BED-like feature set with gene coordinates and names."
    )]
    MissingFeatures,

    #[error("There is no fragments file located yet. Run `locate_fragments` first.")]
    NotLocated,

    #[error("No fragments were found in any of the {0} requested regions")]
    EmptyResult(usize),

    #[error("Modality '{0}' is not present in the data")]
    MissingModality(String),

    #[error("Duplicate cell identifier: {0}")]
    DuplicateCell(String),

    #[error("Matrix of shape {shape:?} does not fit {n_obs} cells and {n_vars} features")]
    ShapeMismatch {
        shape: (usize, usize),
        n_obs: usize,
        n_vars: usize,
    },

    #[error("Can't open fragments file {path:?}: {reason}")]
    StoreOpen { path: PathBuf, reason: String },

    #[error("Can't index fragments file {path:?}: {reason}")]
    Index { path: PathBuf, reason: String },

    #[error(transparent)]
    Region(#[from] RegionError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl FragmentError {
    /// Errors that only concern a single region and can be skipped in a multi-region scan.
    pub fn is_region_local(&self) -> bool {
        matches!(
            self,
            FragmentError::UnknownContig { .. } | FragmentError::InvalidRange { .. }
        )
    }
}

/// Result type alias for atacfrag-pileup operations.
pub type Result<T> = std::result::Result<T, FragmentError>;
