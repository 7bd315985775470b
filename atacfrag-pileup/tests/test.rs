use std::io::Read;
use std::path::{Path, PathBuf};

use flate2::read::GzDecoder;

use rstest::*;

use atacfrag_core::models::FeatureSet;
use atacfrag_core::utils::read_barcodes;
use atacfrag_pileup::consts::{ATAC_MODALITY, RNA_MODALITY};
use atacfrag_pileup::*;

#[fixture]
fn path_to_fragments() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/data/fragments.tsv.gz")
}

#[fixture]
fn path_to_genes() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/data/genes.bed")
}

#[fixture]
fn barcodes() -> Vec<String> {
    read_barcodes(Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/data/barcodes.tsv")).unwrap()
}

#[fixture]
fn located(path_to_fragments: PathBuf, barcodes: Vec<String>) -> AnnotatedMatrix {
    let mut adata = AnnotatedMatrix::from_cells(barcodes);
    locate_fragments::<FragmentFile, _>(&mut adata, Some(path_to_fragments.as_path())).unwrap();
    adata
}

mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[rstest]
    fn test_count_genes(mut located: AnnotatedMatrix, path_to_genes: PathBuf) {
        let genes = FeatureSet::try_from(path_to_genes.as_path()).unwrap();
        let options = CountOptions {
            progress: false,
            ..Default::default()
        };

        let counts =
            count_fragments_features::<FragmentFile, _>(&mut located, Some(&genes), &options)
                .unwrap();

        assert_eq!(counts.x.shape(), (3, 4));
        assert_eq!(counts.var_names, vec!["GENE_A", "GENE_B", "GENE_C", "MT-GENE"]);

        let a = "AAACAGCCAAGGAATC-1";
        let b = "AAACAGCCAATCCCTT-1";
        let c = "AAACAGCCAATGCGCT-1";
        // GENE_A is extended to [9000, 15000)
        assert_eq!(counts.get(a, "GENE_A"), Some(2));
        assert_eq!(counts.get(b, "GENE_A"), Some(2));
        assert_eq!(counts.get(c, "GENE_A"), Some(0));
        assert_eq!(counts.get(c, "GENE_B"), Some(3));
        assert_eq!(counts.get(b, "GENE_C"), Some(1));
        assert_eq!(counts.get(c, "GENE_C"), Some(2));
        // chrM is not in the fragments file
        assert_eq!(counts.get(a, "MT-GENE"), Some(0));
    }

    #[rstest]
    fn test_count_genes_from_rna_modality(located: AnnotatedMatrix, barcodes: Vec<String>) {
        let rna = AnnotatedMatrix::new(
            barcodes,
            vec!["GENE_C".to_string(), "GENE_NA".to_string()],
            Counts::Dense(ndarray::Array2::zeros((3, 2))),
        )
        .unwrap()
        .with_var_intervals(vec!["chr2:6000-9000".to_string(), "NA".to_string()]);
        let mut mdata = MultiModal::new()
            .with_modality(ATAC_MODALITY, located)
            .with_modality(RNA_MODALITY, rna);

        let counts = count_fragments_features::<FragmentFile, _>(
            &mut mdata,
            None,
            &CountOptions {
                progress: false,
                ..Default::default()
            },
        )
        .unwrap();

        assert_eq!(counts.var_names, vec!["GENE_C"]);
        assert_eq!(counts.get("AAACAGCCAATGCGCT-1", "GENE_C"), Some(2));
    }

    #[rstest]
    fn test_region_pileup(path_to_fragments: PathBuf, barcodes: Vec<String>) {
        let pileup = region_pileup_from_path::<FragmentFile, _>(
            &path_to_fragments,
            &barcodes,
            "chr1",
            10000,
            10200,
        )
        .unwrap();

        let mx = pileup.x.as_dense().unwrap();
        assert_eq!(mx.dim(), (3, 200));
        assert_eq!(mx.row(0).sum(), 150);
        assert_eq!(mx.row(1).sum(), 2 * 120);
        assert_eq!(mx.row(2).sum(), 0);
        assert_eq!(mx[[1, 79]], 0);
        assert_eq!(mx[[1, 80]], 2);
    }

    #[rstest]
    fn test_tss_pileup(mut located: AnnotatedMatrix, path_to_genes: PathBuf) {
        let genes = FeatureSet::try_from(path_to_genes.as_path()).unwrap();
        let options = TssOptions {
            progress: false,
            ..Default::default()
        };

        let pileup = tss_pileup::<FragmentFile>(&mut located, &genes, &options).unwrap();

        assert_eq!(pileup.x.shape(), (3, 2001));
        assert_eq!(pileup.var_names[0], "-1000");
        assert_eq!(pileup.var_names[1000], "0");
        assert_eq!(pileup.var_names[2000], "1000");

        let mx = pileup.x.as_dense().unwrap();
        assert_eq!(mx.row(0).sum(), 150);
        assert_eq!(mx.row(1).sum(), 2 * 220 + 200);
        assert_eq!(mx.row(2).sum(), 3 * 100 + 2 * 150);

        let profile = tss_profile(mx);
        assert_eq!(profile[0], 2);
        assert_eq!(profile[1000], 5);
    }

    #[rstest]
    fn test_fetch_regions(path_to_fragments: PathBuf) {
        let options = ExtractOptions::default();

        let table =
            fetch_regions_to_df::<FragmentFile>(&path_to_fragments, "chr1:19900-20100", &options)
                .unwrap();

        let cells: Vec<&str> = table.iter().map(|row| row.cell.as_str()).collect();
        assert_eq!(cells, vec!["AAACAGCCAATGCGCT-1", "TTTGTTGGTTTGGCTA-1"]);
        assert!(table.iter().all(|row| row.feature == "chr1_19900_20100"));
    }

    #[rstest]
    fn test_fetch_regions_relative(path_to_fragments: PathBuf, path_to_genes: PathBuf) {
        let genes = FeatureSet::try_from(path_to_genes.as_path()).unwrap();
        let options = ExtractOptions {
            relative_coordinates: true,
            ..Default::default()
        };

        let table = fetch_regions_to_df::<FragmentFile>(&path_to_fragments, &genes, &options)
            .unwrap();

        // GENE_A midpoint is 13000
        let gene_a: Vec<(i64, i64)> = table
            .iter()
            .filter(|row| row.feature == "chr1_11000_15000")
            .map(|row| (row.start, row.end))
            .collect();
        assert_eq!(gene_a, vec![(-1000, -900)]);
        assert_eq!(table.len(), 4);
    }

    #[rstest]
    fn test_write_outputs(mut located: AnnotatedMatrix, path_to_genes: PathBuf) {
        let tempdir = tempfile::tempdir().unwrap();
        let genes = FeatureSet::try_from(path_to_genes.as_path()).unwrap();
        let options = CountOptions {
            progress: false,
            ..Default::default()
        };
        let counts =
            count_fragments_features::<FragmentFile, _>(&mut located, Some(&genes), &options)
                .unwrap();

        let prefix = tempdir.path().join("genes");
        let files = write_counts_to_mtx(&counts, prefix.to_str().unwrap()).unwrap();
        assert!(files.matrix.exists());
        assert!(files.barcodes.exists());
        let mut features = String::new();
        GzDecoder::new(std::fs::File::open(&files.features).unwrap())
            .read_to_string(&mut features)
            .unwrap();
        assert_eq!(
            features,
            "GENE_A\tchr1:11000-15000\nGENE_B\tchr1:20000-25000\n\
             GENE_C\tchr2:6000-9000\nMT-GENE\tchrM:0-500\n"
        );

        let tsv = tempdir.path().join("counts.tsv.gz");
        write_counts_to_tsv(&counts, &tsv).unwrap();
        assert!(tsv.exists());
    }

    #[rstest]
    fn test_missing_fragments_file(barcodes: Vec<String>) {
        let mut adata = AnnotatedMatrix::from_cells(barcodes);
        let result = locate_fragments::<FragmentFile, _>(
            &mut adata,
            Some(Path::new("tests/data/does_not_exist.tsv.gz")),
        );

        assert!(matches!(result, Err(FragmentError::StoreOpen { .. })));
        assert!(adata.files.fragments().is_none());
    }

    #[rstest]
    fn test_rebuilt_index_answers_the_same(path_to_fragments: PathBuf) {
        let tempdir = tempfile::tempdir().unwrap();
        let copy = tempdir.path().join("fragments.tsv.gz");
        std::fs::copy(&path_to_fragments, &copy).unwrap();

        let written = index_fragments(&copy).unwrap();
        assert_eq!(written, index_path(&copy));

        let mut shipped = FragmentFile::open(&path_to_fragments).unwrap();
        let mut rebuilt = FragmentFile::open(&copy).unwrap();
        assert_eq!(shipped.contigs(), rebuilt.contigs());
        for (chrom, start, end) in [("chr1", 0, 30000), ("chr1", 10100, 12050), ("chr2", 5100, 5950)] {
            assert_eq!(
                shipped.fetch(chrom, start, end).unwrap(),
                rebuilt.fetch(chrom, start, end).unwrap()
            );
        }
    }

    #[rstest]
    fn test_unindexed_fragments_file(barcodes: Vec<String>) {
        let tempdir = tempfile::tempdir().unwrap();
        let path = tempdir.path().join("fragments.tsv.gz");
        std::fs::copy(
            Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/data/fragments.tsv.gz"),
            &path,
        )
        .unwrap();
        let mut adata = AnnotatedMatrix::from_cells(barcodes);

        let result = locate_fragments::<FragmentFile, _>(&mut adata, Some(path.as_path()));

        assert!(matches!(result, Err(FragmentError::StoreOpen { .. })));
        assert!(adata.files.fragments().is_none());
    }
}
