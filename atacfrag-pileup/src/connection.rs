use std::path::{Path, PathBuf};

use crate::data::AtacData;
use crate::errors::{FragmentError, Result};
use crate::store::FragmentStore;

fn resolve_fragments_path<D: AtacData + ?Sized>(
    data: &D,
    fragments: Option<&Path>,
) -> Result<PathBuf> {
    if let Some(path) = fragments {
        return Ok(path.to_owned());
    }

    // Check if a path is already present
    match data.atac()?.files.fragments() {
        Some(path) => {
            log::info!("Using fragments file {:?} from files.fragments", path);
            Ok(path.to_owned())
        }
        None => Err(FragmentError::Configuration),
    }
}

fn open_and_register<S, D>(data: &mut D, fragments: Option<&Path>) -> Result<S>
where
    S: FragmentStore,
    D: AtacData + ?Sized,
{
    let path = resolve_fragments_path(data, fragments).map_err(|e| {
        log::error!("{}", e);
        e
    })?;

    // make sure a connection to the fragments file can be created before remembering it
    let store = S::open(&path).map_err(|e| {
        log::error!("{}", e);
        e
    })?;

    data.atac_mut()?.files.set_fragments(path);

    Ok(store)
}

///
/// Validate a fragments file and record its path in the `files.fragments` metadata of the
/// ATAC modality.
///
/// The file is opened to make sure it can be read, then closed again before returning; it is
/// never kept in memory by the matrix. Without an explicit path, the path already stored in
/// the metadata is validated instead.
///
/// # Arguments
/// - data: a single matrix or multimodal data with an `atac` modality
/// - fragments: path to the fragments file (e.g. `atac_fragments.tsv.gz`)
///
/// # Returns
/// The path that is now stored on the matrix.
///
/// Nothing is written to the metadata when the path cannot be resolved or opened.
pub fn locate_fragments<S, D>(data: &mut D, fragments: Option<&Path>) -> Result<PathBuf>
where
    S: FragmentStore,
    D: AtacData + ?Sized,
{
    let store: S = open_and_register(data, fragments)?;
    let path = store.path().to_owned();

    store.close()?;

    Ok(path)
}

///
/// Same as [locate_fragments], but hand the open store to the caller instead of closing it.
///
/// The caller owns the returned handle and is responsible for releasing it, either with
/// [FragmentStore::close] or by dropping it.
pub fn connect_fragments<S, D>(data: &mut D, fragments: Option<&Path>) -> Result<S>
where
    S: FragmentStore,
    D: AtacData + ?Sized,
{
    open_and_register(data, fragments)
}
