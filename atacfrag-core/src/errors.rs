use std::num::ParseIntError;

use thiserror::Error;

use crate::Position;

#[derive(Error, Debug)]
pub enum RegionError {
    #[error("Can't read file {path}: {source}")]
    FileReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid region string '{0}'. Expected `chrom:start-end` or `chrom-start-end`")]
    InvalidRegionString(String),

    #[error("Invalid range: start ({start}) must not be greater than end ({end})")]
    InvalidRange { start: Position, end: Position },

    #[error("Error parsing fragment file line: {0}. Is your fragment file malformed?")]
    MalformedFragment(String),

    #[error("Error parsing line {line} of feature file: {content}")]
    MalformedFeature { line: usize, content: String },

    #[error("Corrupted file. 0 regions found in the file: {0}")]
    EmptyFeatureFile(String),

    #[error("Integer parsing error: {0}")]
    ParseIntError(#[from] ParseIntError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, RegionError>;
