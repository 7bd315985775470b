use fxhash::FxHashMap;

use crate::errors::{FragmentError, Result};

///
/// Maps a cell barcode to its row in an output matrix.
///
/// Built once per operation from the ordered cell names of the target matrix and only read
/// afterwards.
///
#[derive(Debug, Clone, Default)]
pub struct CellIndex {
    rows: FxHashMap<String, usize>,
}

impl CellIndex {
    ///
    /// Build the index. Row `i` belongs to the `i`-th cell; barcodes must be unique.
    ///
    pub fn new<I, S>(cells: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut rows: FxHashMap<String, usize> = FxHashMap::default();
        for (row, cell) in cells.into_iter().enumerate() {
            let cell = cell.as_ref();
            if rows.insert(cell.to_string(), row).is_some() {
                return Err(FragmentError::DuplicateCell(cell.to_string()));
            }
        }

        Ok(CellIndex { rows })
    }

    /// Row of `cell`, or `None` for a barcode that is not part of the matrix.
    #[inline]
    pub fn get(&self, cell: &str) -> Option<usize> {
        self.rows.get(cell).copied()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::*;

    use crate::test_utils::*;

    #[rstest]
    fn test_rows_follow_input_order(cells: Vec<String>) {
        let index = CellIndex::new(&cells).unwrap();

        assert_eq!(index.len(), 3);
        assert_eq!(index.get("CELL_A"), Some(0));
        assert_eq!(index.get("CELL_C"), Some(2));
        assert_eq!(index.get("NOT_A_CELL"), None);
    }

    #[rstest]
    fn test_duplicate_barcode() {
        let result = CellIndex::new(["AAAC-1", "GGGT-1", "AAAC-1"]);
        assert!(matches!(result, Err(FragmentError::DuplicateCell(cell)) if cell == "AAAC-1"));
    }

    #[rstest]
    fn test_empty_index() {
        let index = CellIndex::new(Vec::<String>::new()).unwrap();
        assert!(index.is_empty());
    }
}
