//! Destination storage.
//!
//! The pipeline hands finished images to a [`StorageSink`]; the stock
//! [`LocalSink`] copies into a destination folder, creating it on demand.
//! Uploading somewhere else (a synced share, an object store client) means
//! implementing the trait, not touching the pipeline.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Where finished images go.
pub trait StorageSink {
    /// Store `source` at `destination`, returning the path actually written.
    fn store(&self, source: &Path, destination: &Path) -> Result<PathBuf, StorageError>;
}

/// Copies into a local (or locally-mounted) folder.
#[derive(Debug, Default)]
pub struct LocalSink;

impl LocalSink {
    pub fn new() -> Self {
        LocalSink
    }
}

impl StorageSink for LocalSink {
    fn store(&self, source: &Path, destination: &Path) -> Result<PathBuf, StorageError> {
        if let Some(parent) = destination.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::copy(source, destination)?;
        Ok(destination.to_path_buf())
    }
}
