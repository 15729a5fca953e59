//! # Photo Upload Service
//!
//! Validates and stores bootcamp photos. Stored names follow the
//! `photo_{bootcamp_id}{ext}` convention so re-uploads overwrite in place.

use std::sync::OnceLock;

use regex::Regex;

use super::backend::StorageBackend;
use super::errors::{UploadError, UploadResult};

/// Default upload size cap (1 MB)
pub const DEFAULT_MAX_BYTES: u64 = 1_000_000;

/// Upload validation policy
#[derive(Debug, Clone)]
pub struct PhotoPolicy {
    /// Maximum file size in bytes
    pub max_bytes: u64,
}

impl Default for PhotoPolicy {
    fn default() -> Self {
        Self {
            max_bytes: DEFAULT_MAX_BYTES,
        }
    }
}

/// Photo storage service over a backend
pub struct PhotoService<B: StorageBackend> {
    backend: B,
    policy: PhotoPolicy,
}

impl<B: StorageBackend> PhotoService<B> {
    pub fn new(backend: B, policy: PhotoPolicy) -> Self {
        Self { backend, policy }
    }

    /// Validate and store a bootcamp photo, returning the stored filename
    pub fn store_photo(
        &self,
        bootcamp_id: &str,
        original_name: &str,
        content_type: &str,
        data: &[u8],
    ) -> UploadResult<String> {
        if data.is_empty() {
            return Err(UploadError::MissingFile);
        }
        if !content_type.starts_with("image/") {
            return Err(UploadError::NotAnImage);
        }
        if data.len() as u64 > self.policy.max_bytes {
            return Err(UploadError::TooLarge(self.policy.max_bytes));
        }

        let filename = photo_filename(bootcamp_id, original_name);
        self.backend.write(&filename, data)?;

        Ok(filename)
    }

    /// Read a stored photo back
    pub fn read_photo(&self, filename: &str) -> UploadResult<Vec<u8>> {
        self.backend.read(filename)
    }
}

/// Build the stored filename for a bootcamp photo.
///
/// The original extension is kept only when it is a short alphanumeric
/// suffix; anything else falls back to `.jpg`.
pub fn photo_filename(bootcamp_id: &str, original_name: &str) -> String {
    static EXT_RE: OnceLock<Regex> = OnceLock::new();
    let ext_re = EXT_RE.get_or_init(|| Regex::new(r"^\.[A-Za-z0-9]{1,8}$").unwrap());

    let ext = original_name
        .rfind('.')
        .map(|i| &original_name[i..])
        .filter(|ext| ext_re.is_match(ext))
        .unwrap_or(".jpg");

    format!("photo_{}{}", bootcamp_id, ext.to_ascii_lowercase())
}
