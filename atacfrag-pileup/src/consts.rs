/// Key under the `files` metadata map where the fragments file path is stored.
pub const FRAGMENTS_KEY: &str = "fragments";

pub const ATAC_MODALITY: &str = "atac";
pub const RNA_MODALITY: &str = "rna";

/// Gene bodies are extended upstream to cover promoters.
pub const DEFAULT_GENE_UPSTREAM: u32 = 2000;
pub const DEFAULT_GENE_DOWNSTREAM: u32 = 0;

pub const DEFAULT_TSS_FLANK: u32 = 1000;

pub const FRAGMENT_TABLE_HEADER: [&str; 6] = ["Chromosome", "Start", "End", "Cell", "Score", "Feature"];

pub const MTX_SUFFIX: &str = "matrix.mtx.gz";
pub const BARCODES_SUFFIX: &str = "barcodes.tsv.gz";
pub const FEATURES_SUFFIX: &str = "features.tsv.gz";

/// Appended to the fragments file path to find its tabix index.
pub const TABIX_EXTENSION: &str = ".tbi";

/// Largest position a tabix index (14-bit minimum shift, depth 5) can address.
pub const TABIX_MAX_POSITION: i64 = 1 << 29;
