//! High-level transform of one planned item.
//!
//! [`transform`] is the single entry point the scheduler calls per item. It
//! makes sure the destination directory exists, then either copies the
//! source byte for byte or hands an orient-and-fit job to the backend.

use super::backend::{BackendError, ImageBackend};
use super::orientation::Orientation;
use super::params::{FitParams, Quality};
use crate::types::{Action, PlannedItem};
use sha2::{Digest, Sha256};
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TransformError {
    #[error("cannot create directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("cannot open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("cannot write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("{path}: {source}")]
    Imaging {
        path: PathBuf,
        #[source]
        source: BackendError,
    },
}

/// What a successful transform did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransformOutcome {
    /// Source copied verbatim.
    Copied { bytes: u64 },
    /// Destination already held identical bytes; nothing written.
    Unchanged,
    /// Image oriented, fitted, and saved.
    Resized {
        width: u32,
        height: u32,
        orientation: Orientation,
    },
}

/// Settings shared by every transform in a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransformOptions {
    pub quality: Quality,
}

/// Create the parent directory of `path` if it is missing.
///
/// Concurrent callers racing on the same directory all succeed.
pub fn ensure_parent_dir(path: &Path) -> Result<(), TransformError> {
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => ensure_dir(dir),
        _ => Ok(()),
    }
}

/// `create_dir_all` with the path attached to the error.
pub fn ensure_dir(dir: &Path) -> Result<(), TransformError> {
    fs::create_dir_all(dir).map_err(|source| TransformError::CreateDir {
        path: dir.to_path_buf(),
        source,
    })
}

/// Produce one planned item's output.
pub fn transform(
    backend: &impl ImageBackend,
    item: &PlannedItem,
    options: &TransformOptions,
) -> Result<TransformOutcome, TransformError> {
    ensure_parent_dir(&item.destination)?;

    match item.action {
        Action::Copy => copy_file(&item.source, &item.destination),
        Action::Fit(limit) => {
            let orientation = resolve_orientation(backend, &item.source);
            let params = plan_fit(item, limit, orientation, options);
            let dims = backend
                .fit(&params)
                .map_err(|source| TransformError::Imaging {
                    path: item.source.clone(),
                    source,
                })?;
            Ok(TransformOutcome::Resized {
                width: dims.width,
                height: dims.height,
                orientation,
            })
        }
    }
}

/// Read the orientation, falling back to [`Orientation::Normal`] on any error.
pub fn resolve_orientation(backend: &impl ImageBackend, source: &Path) -> Orientation {
    match backend.read_orientation(source) {
        Ok(orientation) => orientation,
        Err(e) => {
            log::debug!(
                "no usable EXIF orientation in {}, assuming 1: {}",
                source.display(),
                e
            );
            Orientation::Normal
        }
    }
}

/// Plan a fit operation without executing it.
pub fn plan_fit(
    item: &PlannedItem,
    limit: u32,
    orientation: Orientation,
    options: &TransformOptions,
) -> FitParams {
    FitParams {
        source: item.source.clone(),
        output: item.destination.clone(),
        limit,
        orientation,
        quality: options.quality,
    }
}

/// Byte-stream copy with create/truncate semantics on the destination.
///
/// Skips the write when the destination already has identical content.
pub fn copy_file(source: &Path, destination: &Path) -> Result<TransformOutcome, TransformError> {
    let mut input = File::open(source).map_err(|e| TransformError::Open {
        path: source.to_path_buf(),
        source: e,
    })?;

    if same_content(source, destination) {
        return Ok(TransformOutcome::Unchanged);
    }

    let mut output = File::create(destination).map_err(|e| TransformError::Write {
        path: destination.to_path_buf(),
        source: e,
    })?;
    let bytes = io::copy(&mut input, &mut output).map_err(|e| TransformError::Write {
        path: destination.to_path_buf(),
        source: e,
    })?;
    Ok(TransformOutcome::Copied { bytes })
}

/// True when both files exist with equal length and SHA-256.
fn same_content(a: &Path, b: &Path) -> bool {
    let (Ok(meta_a), Ok(meta_b)) = (fs::metadata(a), fs::metadata(b)) else {
        return false;
    };
    if !meta_b.is_file() || meta_a.len() != meta_b.len() {
        return false;
    }
    match (hash_file(a), hash_file(b)) {
        (Ok(ha), Ok(hb)) => ha == hb,
        _ => false,
    }
}

/// SHA-256 hash of a file's contents, returned as a hex string.
pub fn hash_file(path: &Path) -> io::Result<String> {
    let mut file = File::open(path)?;
    let mut hasher = Sha256::new();
    io::copy(&mut file, &mut hasher)?;
    Ok(format!("{:x}", hasher.finalize()))
}
