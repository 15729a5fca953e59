//! # Local Filesystem Backend

use std::fs;
use std::path::PathBuf;

use super::backend::StorageBackend;
use super::errors::{UploadError, UploadResult};

/// Local filesystem storage backend
#[derive(Debug)]
pub struct LocalBackend {
    root: PathBuf,
}

impl LocalBackend {
    /// Create a new local backend rooted at a directory
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    fn full_path(&self, path: &str) -> PathBuf {
        self.root.join(path)
    }
}

impl StorageBackend for LocalBackend {
    fn write(&self, path: &str, data: &[u8]) -> UploadResult<()> {
        let full_path = self.full_path(path);

        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).map_err(|e| UploadError::Io(e.to_string()))?;
        }

        fs::write(&full_path, data).map_err(|e| UploadError::Io(e.to_string()))
    }

    fn read(&self, path: &str) -> UploadResult<Vec<u8>> {
        let full_path = self.full_path(path);

        fs::read(&full_path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                UploadError::NotFound(path.to_string())
            } else {
                UploadError::Io(e.to_string())
            }
        })
    }

    fn delete(&self, path: &str) -> UploadResult<()> {
        let full_path = self.full_path(path);

        fs::remove_file(&full_path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                UploadError::NotFound(path.to_string())
            } else {
                UploadError::Io(e.to_string())
            }
        })
    }

    fn exists(&self, path: &str) -> UploadResult<bool> {
        Ok(self.full_path(path).exists())
    }
}
