//! # Upload Errors

use thiserror::Error;

/// Result type for upload operations
pub type UploadResult<T> = Result<T, UploadError>;

/// File upload errors
#[derive(Debug, Clone, Error)]
pub enum UploadError {
    /// No file was attached to the request
    #[error("Please upload a file")]
    MissingFile,

    /// The uploaded file is not an image
    #[error("Please upload an image file")]
    NotAnImage,

    /// The uploaded file exceeds the size cap
    #[error("Please upload an image less than {0} bytes")]
    TooLarge(u64),

    /// Stored object does not exist
    #[error("File not found: {0}")]
    NotFound(String),

    /// Filesystem failure
    #[error("Problem with file upload: {0}")]
    Io(String),
}

impl UploadError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            UploadError::MissingFile => 400,
            UploadError::NotAnImage => 400,
            UploadError::TooLarge(_) => 400,
            UploadError::NotFound(_) => 404,
            UploadError::Io(_) => 500,
        }
    }
}
