//! # Core models for working with single-cell fragment files.
//!
//! This crate holds the small, shared building blocks used by the rest of atacfrag: genomic
//! [models::Region]s (genes, TSS windows, user regions), [models::Fragment] records as they appear
//! in a 10x-style fragments file, and [models::FeatureSet]s of regions read from BED-like files or
//! parsed from compact region strings such as `chr1:1000-2000`.
//!
//! All coordinates are 0-based and half-open (`[start, end)`). Positions are signed because
//! upstream extension of a feature near the beginning of a chromosome can legitimately reach
//! below zero; clipping is left to whoever answers the range query.
pub mod consts;
pub mod errors;
pub mod models;
pub mod utils;

/// A genomic coordinate.
pub type Position = i64;
