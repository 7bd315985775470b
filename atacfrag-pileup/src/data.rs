use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use ndarray::Array2;
use sprs::CsMat;

use atacfrag_core::models::{FeatureSet, Region};

use crate::consts::{ATAC_MODALITY, FRAGMENTS_KEY, RNA_MODALITY};
use crate::errors::{FragmentError, Result};

///
/// Cell-by-feature counts, either sparse (cell-major CSR) or dense.
///
#[derive(Debug, Clone, PartialEq)]
pub enum Counts {
    Sparse(CsMat<u32>),
    Dense(Array2<u32>),
}

impl Counts {
    /// (rows, columns)
    pub fn shape(&self) -> (usize, usize) {
        match self {
            Counts::Sparse(mx) => mx.shape(),
            Counts::Dense(mx) => mx.dim(),
        }
    }

    /// Value at `(row, col)`; structural zeros of a sparse matrix read as 0.
    pub fn get(&self, row: usize, col: usize) -> Option<u32> {
        let (rows, cols) = self.shape();
        if row >= rows || col >= cols {
            return None;
        }
        match self {
            Counts::Sparse(mx) => Some(mx.get(row, col).copied().unwrap_or(0)),
            Counts::Dense(mx) => mx.get((row, col)).copied(),
        }
    }

    pub fn is_sparse(&self) -> bool {
        matches!(self, Counts::Sparse(_))
    }

    pub fn as_dense(&self) -> Option<&Array2<u32>> {
        match self {
            Counts::Dense(mx) => Some(mx),
            Counts::Sparse(_) => None,
        }
    }

    pub fn as_sparse(&self) -> Option<&CsMat<u32>> {
        match self {
            Counts::Sparse(mx) => Some(mx),
            Counts::Dense(_) => None,
        }
    }
}

///
/// Paths of files associated with a matrix (the `files` entry of its unstructured metadata).
///
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FileMetadata {
    files: BTreeMap<String, PathBuf>,
}

impl FileMetadata {
    pub fn get(&self, key: &str) -> Option<&Path> {
        self.files.get(key).map(PathBuf::as_path)
    }

    pub fn insert<P: Into<PathBuf>>(&mut self, key: &str, path: P) {
        self.files.insert(key.to_string(), path.into());
    }

    /// The located fragments file, if any.
    pub fn fragments(&self) -> Option<&Path> {
        self.get(FRAGMENTS_KEY)
    }

    pub fn set_fragments<P: Into<PathBuf>>(&mut self, path: P) {
        self.insert(FRAGMENTS_KEY, path)
    }
}

///
/// A matrix with named rows (cells, `obs`) and columns (features, `var`), plus the file
/// metadata that ties it to a fragments file.
///
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotatedMatrix {
    pub obs_names: Vec<String>,
    pub var_names: Vec<String>,
    pub x: Counts,
    /// Per-feature genomic interval strings (`chr1:100-200`), as carried by RNA modalities.
    pub var_intervals: Option<Vec<String>>,
    pub files: FileMetadata,
}

impl AnnotatedMatrix {
    ///
    /// Create a new matrix, checking that the counts match the number of names.
    ///
    pub fn new(obs_names: Vec<String>, var_names: Vec<String>, x: Counts) -> Result<Self> {
        let shape = x.shape();
        if shape != (obs_names.len(), var_names.len()) {
            return Err(FragmentError::ShapeMismatch {
                shape,
                n_obs: obs_names.len(),
                n_vars: var_names.len(),
            });
        }

        Ok(AnnotatedMatrix {
            obs_names,
            var_names,
            x,
            var_intervals: None,
            files: FileMetadata::default(),
        })
    }

    ///
    /// A matrix with the given cells and no features yet.
    ///
    pub fn from_cells(obs_names: Vec<String>) -> Self {
        let x = Counts::Sparse(CsMat::zero((obs_names.len(), 0)));
        AnnotatedMatrix {
            obs_names,
            var_names: Vec::new(),
            x,
            var_intervals: None,
            files: FileMetadata::default(),
        }
    }

    pub fn with_var_intervals(mut self, intervals: Vec<String>) -> Self {
        self.var_intervals = Some(intervals);
        self
    }

    pub fn n_obs(&self) -> usize {
        self.obs_names.len()
    }

    pub fn n_vars(&self) -> usize {
        self.var_names.len()
    }

    /// Counts for a cell and a feature looked up by name.
    pub fn get(&self, cell: &str, feature: &str) -> Option<u32> {
        let row = self.obs_names.iter().position(|c| c == cell)?;
        let col = self.var_names.iter().position(|f| f == feature)?;
        self.x.get(row, col)
    }

    ///
    /// Gene annotation from the per-feature intervals: one feature per gene, named after the
    /// gene. Genes without a parsable interval (often `NA`) are left out.
    ///
    pub fn interval_annotation(&self) -> Option<FeatureSet> {
        let intervals = self.var_intervals.as_ref()?;

        let mut features: Vec<Region> = Vec::with_capacity(intervals.len());
        for (name, interval) in self.var_names.iter().zip(intervals) {
            match Region::from_str(interval) {
                Ok(region) => features.push(region.with_name(name.as_str())),
                Err(e) => log::debug!("Skipping gene {} without a usable interval: {}", name, e),
            }
        }

        Some(FeatureSet::from(features))
    }
}

///
/// Data holding an ATAC modality: either a single [AnnotatedMatrix] or a [MultiModal]
/// container with an `atac` modality.
///
pub trait AtacData {
    fn atac(&self) -> Result<&AnnotatedMatrix>;

    fn atac_mut(&mut self) -> Result<&mut AnnotatedMatrix>;

    /// Gene annotation that can stand in for features when none are given.
    fn gene_annotation(&self) -> Option<FeatureSet> {
        None
    }
}

impl AtacData for AnnotatedMatrix {
    fn atac(&self) -> Result<&AnnotatedMatrix> {
        Ok(self)
    }

    fn atac_mut(&mut self) -> Result<&mut AnnotatedMatrix> {
        Ok(self)
    }
}

///
/// Several named modalities measured on the same cells (for example `rna` and `atac`).
///
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MultiModal {
    pub modalities: BTreeMap<String, AnnotatedMatrix>,
}

impl MultiModal {
    pub fn new() -> Self {
        MultiModal::default()
    }

    pub fn with_modality(mut self, name: &str, matrix: AnnotatedMatrix) -> Self {
        self.modalities.insert(name.to_string(), matrix);
        self
    }

    pub fn get(&self, name: &str) -> Option<&AnnotatedMatrix> {
        self.modalities.get(name)
    }
}

impl AtacData for MultiModal {
    fn atac(&self) -> Result<&AnnotatedMatrix> {
        self.modalities
            .get(ATAC_MODALITY)
            .ok_or_else(|| FragmentError::MissingModality(ATAC_MODALITY.to_string()))
    }

    fn atac_mut(&mut self) -> Result<&mut AnnotatedMatrix> {
        self.modalities
            .get_mut(ATAC_MODALITY)
            .ok_or_else(|| FragmentError::MissingModality(ATAC_MODALITY.to_string()))
    }

    fn gene_annotation(&self) -> Option<FeatureSet> {
        self.modalities.get(RNA_MODALITY)?.interval_annotation()
    }
}
