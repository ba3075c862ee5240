//! Two-artifact persistence for a [`SignatureStore`].
//!
//! A base path `P` maps to `P.names` (text, see `names_file`) and
//! `P.features` (binary, see `features_file`). The i-th name belongs to
//! the i-th vector. The features header carries a digest of the names
//! artifact so a mixed pair from two different saves is rejected.

use std::ffi::OsString;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::recognition::domain::identity_record::IdentityRecord;
use crate::recognition::domain::signature_store::SignatureStore;
use crate::recognition::infrastructure::{features_file, names_file};
use crate::shared::constants::{FEATURES_EXTENSION, NAMES_EXTENSION};

#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("refusing to save an empty signature store")]
    EmptyStore,
    #[error("database file not found: {0}")]
    NotFound(PathBuf),
    #[error("corrupt database file {path}: {reason}")]
    CorruptFormat { path: PathBuf, reason: String },
    #[error("inconsistent database: {names} names vs {vectors} signatures")]
    Inconsistent { names: usize, vectors: usize },
    /// Both artifacts decode and agree on the count but come from
    /// different saves.
    #[error("inconsistent database: names artifact does not belong to the features artifact")]
    Unpaired,
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Paths of the names and features artifacts for `base`.
pub fn artifact_paths(base: &Path) -> (PathBuf, PathBuf) {
    (with_suffix(base, NAMES_EXTENSION), with_suffix(base, FEATURES_EXTENSION))
}

fn with_suffix(path: &Path, extension: &str) -> PathBuf {
    let mut s: OsString = path.as_os_str().to_owned();
    s.push(".");
    s.push(extension);
    PathBuf::from(s)
}

/// Writes both artifacts for a non-empty store.
///
/// Each artifact is written to a `.part` sibling and renamed into place,
/// so a crash never leaves a half-written file under the final name.
/// Missing parent directories are created.
pub fn save(store: &SignatureStore, base: &Path) -> Result<(), PersistenceError> {
    let Some(dimension) = store.dimension() else {
        return Err(PersistenceError::EmptyStore);
    };

    let (names_path, features_path) = artifact_paths(base);
    if let Some(parent) = base.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(io_err(parent))?;
    }

    let names = names_file::encode(store.all().iter().map(|r| r.name.as_str()));
    let features = features_file::encode(
        store.all().iter().map(|r| r.signature.as_slice()),
        dimension,
        features_file::names_digest(names.as_bytes()),
    );

    let names_tmp = with_suffix(&names_path, "part");
    let features_tmp = with_suffix(&features_path, "part");
    let result = write_synced(&features_tmp, &features)
        .and_then(|()| write_synced(&names_tmp, names.as_bytes()))
        .and_then(|()| fs::rename(&features_tmp, &features_path).map_err(io_err(&features_path)))
        .and_then(|()| fs::rename(&names_tmp, &names_path).map_err(io_err(&names_path)));

    if result.is_err() {
        let _ = fs::remove_file(&features_tmp);
        let _ = fs::remove_file(&names_tmp);
    } else {
        log::info!("Saved {} signatures to {}", store.len(), base.display());
    }
    result
}

/// Reads both artifacts into a fresh store.
///
/// Nothing is returned unless both artifacts decode and agree on the
/// record count, so callers can swap the result in without ever exposing
/// a partially loaded store.
pub fn load(base: &Path) -> Result<SignatureStore, PersistenceError> {
    let (names_path, features_path) = artifact_paths(base);
    for path in [&names_path, &features_path] {
        if !path.is_file() {
            return Err(PersistenceError::NotFound(path.clone()));
        }
    }

    let names_bytes = fs::read(&names_path).map_err(io_err(&names_path))?;
    let names_digest = features_file::names_digest(&names_bytes);
    let names_text =
        String::from_utf8(names_bytes).map_err(|e| corrupt(&names_path, e.to_string()))?;
    let names = names_file::decode(&names_text).map_err(|e| corrupt(&names_path, e))?;

    let features_bytes = fs::read(&features_path).map_err(io_err(&features_path))?;
    let features =
        features_file::decode(&features_bytes).map_err(|e| corrupt(&features_path, e))?;
    let vectors = features.vectors;

    if names.len() != vectors.len() {
        return Err(PersistenceError::Inconsistent {
            names: names.len(),
            vectors: vectors.len(),
        });
    }
    if features.names_digest != names_digest {
        return Err(PersistenceError::Unpaired);
    }

    let records = names
        .into_iter()
        .zip(vectors)
        .map(|(name, signature)| IdentityRecord::new(name, signature))
        .collect();
    let store = SignatureStore::from_records(records)
        .map_err(|e| corrupt(&features_path, e.to_string()))?;

    log::info!("Loaded {} signatures from {}", store.len(), base.display());
    Ok(store)
}

fn write_synced(path: &Path, bytes: &[u8]) -> Result<(), PersistenceError> {
    let mut file = fs::File::create(path).map_err(io_err(path))?;
    file.write_all(bytes).map_err(io_err(path))?;
    file.sync_all().map_err(io_err(path))
}

fn io_err(path: &Path) -> impl FnOnce(std::io::Error) -> PersistenceError {
    let path = path.to_path_buf();
    move |source| PersistenceError::Io { path, source }
}

fn corrupt(path: &Path, reason: String) -> PersistenceError {
    PersistenceError::CorruptFormat {
        path: path.to_path_buf(),
        reason,
    }
}
