//! # Storage Backend Trait

use super::errors::UploadResult;

/// Raw byte storage for uploaded files
pub trait StorageBackend: Send + Sync {
    /// Write data at a path, creating parent directories as needed
    fn write(&self, path: &str, data: &[u8]) -> UploadResult<()>;

    /// Read the data at a path
    fn read(&self, path: &str) -> UploadResult<Vec<u8>>;

    /// Delete the data at a path
    fn delete(&self, path: &str) -> UploadResult<()>;

    /// Whether anything is stored at a path
    fn exists(&self, path: &str) -> UploadResult<bool>;
}
