//! Where rendered documents land.
//!
//! Filenames are flat: the store rejects anything that could escape its root.
//! `AppState` carries an `Arc<dyn OutputStore>` chosen at startup from config.

pub mod local;
#[cfg(test)]
pub mod memory;
pub mod s3;

use async_trait::async_trait;
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("invalid output filename: {0:?}")]
    InvalidName(String),

    #[error("file not found: {0}")]
    NotFound(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("S3 error: {0}")]
    S3(String),
}

/// Where a written document can be found again.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageHandle {
    pub filename: String,
    /// Filesystem path or `s3://bucket/key` URI.
    pub location: String,
}

#[async_trait]
pub trait OutputStore: Send + Sync {
    async fn write(
        &self,
        filename: &str,
        content: Bytes,
        content_type: &str,
    ) -> Result<StorageHandle, StorageError>;

    async fn read(&self, filename: &str) -> Result<Bytes, StorageError>;
}

/// A flat name is a single, non-empty path segment.
pub fn validate_filename(filename: &str) -> Result<(), StorageError> {
    let bad = filename.is_empty()
        || filename == "."
        || filename == ".."
        || filename.contains(['/', '\\', '\0'])
        || filename.starts_with('.');
    if bad {
        return Err(StorageError::InvalidName(filename.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flat_names_accepted() {
        assert!(validate_filename("resolucion_15_00001_123.html").is_ok());
        assert!(validate_filename("resumen_generacion_20240507_090000.html").is_ok());
    }

    #[test]
    fn test_path_like_names_rejected() {
        for name in ["", ".", "..", "../etc/passwd", "a/b.html", "a\\b.html", ".hidden"] {
            assert!(
                matches!(validate_filename(name), Err(StorageError::InvalidName(_))),
                "{name:?} should be rejected"
            );
        }
    }
}
