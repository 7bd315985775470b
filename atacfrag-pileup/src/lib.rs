//! # Fragment pileups and count matrices for single-cell ATAC-seq
//!
//! This crate turns a cell-barcoded fragments file (`fragments.tsv.gz`) into matrices:
//! per-base pileups over a region or around transcription start sites, and cell x feature
//! count matrices over an annotation such as genes.
//!
//! Fragments files are bgzip-compressed and sorted by position, with a tabix index next to them
//! (`fragments.tsv.gz.tbi`). [index_fragments] writes one when it is missing.
//!
//! The fragments file never lives on the matrix itself. Its path is recorded in the
//! `files.fragments` metadata by [locate_fragments], and every operation opens its own
//! [FragmentStore] handle from that path and closes it before returning.
//!
//! ## Example
//! ```rust,no_run
//! use std::path::Path;
//!
//! use atacfrag_pileup::{AnnotatedMatrix, CountOptions, FragmentFile};
//! use atacfrag_pileup::{count_fragments_features, locate_fragments};
//! use atacfrag_core::models::FeatureSet;
//!
//! let mut adata = AnnotatedMatrix::from_cells(vec!["AAACGAAAGCGCAATG-1".to_string()]);
//! locate_fragments::<FragmentFile, _>(&mut adata, Some(Path::new("atac_fragments.tsv.gz"))).unwrap();
//!
//! let genes = FeatureSet::try_from("genes.bed").unwrap();
//! let counts = count_fragments_features::<FragmentFile, _>(
//!     &mut adata,
//!     Some(&genes),
//!     &CountOptions::default(),
//! )
//! .unwrap();
//! ```
pub mod cell_index;
pub mod connection;
pub mod consts;
pub mod counting;
pub mod data;
pub mod errors;
pub mod extract;
pub mod matrix_market;
pub mod pileup;
pub mod progress;
pub mod store;
pub mod tss;

#[cfg(test)]
mod test_utils;

// re-exports
pub use cell_index::CellIndex;
pub use connection::*;
pub use counting::*;
pub use data::*;
pub use errors::{FragmentError, Result};
pub use extract::*;
pub use matrix_market::*;
pub use pileup::*;
pub use store::{FragmentFile, FragmentStore, index_fragments, index_path};
pub use tss::*;
