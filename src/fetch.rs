//! Byte retrieval for image sources.
//!
//! The gallery always fetches an image's bytes before decoding them. Sources
//! are site-relative paths such as `images/photo-3.jpg`.
//!
//! [`DirFetcher`] serves a directory. [`MemoryFetcher`] holds bytes already
//! in hand.

use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Invalid source path: {0}")]
    InvalidPath(String),
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// True when `source` is a non-empty relative path that stays below its root.
pub fn is_contained(source: &str) -> bool {
    !source.is_empty()
        && Path::new(source)
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
}

/// Retrieves the raw bytes of an image source.
pub trait ImageFetcher: Sync {
    fn fetch(&self, source: &str) -> Result<Vec<u8>, FetchError>;
}

/// Serves sources from a directory on disk.
#[derive(Debug, Clone)]
pub struct DirFetcher {
    root: PathBuf,
}

impl DirFetcher {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Resolve a source under the root, rejecting anything that escapes it.
    pub fn resolve(&self, source: &str) -> Result<PathBuf, FetchError> {
        if !is_contained(source) {
            return Err(FetchError::InvalidPath(source.to_string()));
        }
        Ok(self.root.join(source))
    }
}

impl ImageFetcher for DirFetcher {
    fn fetch(&self, source: &str) -> Result<Vec<u8>, FetchError> {
        let path = self.resolve(source)?;
        match std::fs::read(&path) {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(FetchError::NotFound(source.to_string()))
            }
            Err(err) => Err(FetchError::Io { path, source: err }),
        }
    }
}

/// Serves sources from an in-memory map.
#[derive(Debug, Clone, Default)]
pub struct MemoryFetcher {
    files: HashMap<String, Vec<u8>>,
}

impl MemoryFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, source: impl Into<String>, bytes: Vec<u8>) {
        self.files.insert(source.into(), bytes);
    }

    pub fn with(mut self, source: impl Into<String>, bytes: Vec<u8>) -> Self {
        self.insert(source, bytes);
        self
    }
}

impl ImageFetcher for MemoryFetcher {
    fn fetch(&self, source: &str) -> Result<Vec<u8>, FetchError> {
        self.files
            .get(source)
            .cloned()
            .ok_or_else(|| FetchError::NotFound(source.to_string()))
    }
}
