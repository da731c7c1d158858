use std::path::PathBuf;

use async_trait::async_trait;
use bytes::Bytes;
use tracing::{debug, info};

use crate::storage::{validate_filename, OutputStore, StorageError, StorageHandle};

/// Writes documents under a single output directory.
pub struct LocalOutputStore {
    root: PathBuf,
}

impl LocalOutputStore {
    /// Creates the output directory if it does not exist yet.
    pub async fn open(root: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let root = root.into();
        tokio::fs::create_dir_all(&root).await?;
        info!("Local output store at {}", root.display());
        Ok(Self { root })
    }
}

#[async_trait]
impl OutputStore for LocalOutputStore {
    async fn write(
        &self,
        filename: &str,
        content: Bytes,
        _content_type: &str,
    ) -> Result<StorageHandle, StorageError> {
        validate_filename(filename)?;
        let path = self.root.join(filename);
        tokio::fs::write(&path, &content).await?;
        debug!("Wrote {} bytes to {}", content.len(), path.display());

        Ok(StorageHandle {
            filename: filename.to_string(),
            location: path.display().to_string(),
        })
    }

    async fn read(&self, filename: &str) -> Result<Bytes, StorageError> {
        validate_filename(filename)?;
        match tokio::fs::read(self.root.join(filename)).await {
            Ok(content) => Ok(Bytes::from(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StorageError::NotFound(filename.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_write_then_read() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalOutputStore::open(dir.path().join("generated"))
            .await
            .unwrap();

        let handle = store
            .write("a.html", Bytes::from_static(b"<p>hola</p>"), "text/html")
            .await
            .unwrap();
        assert_eq!(handle.filename, "a.html");
        assert!(handle.location.ends_with("a.html"));

        let content = store.read("a.html").await.unwrap();
        assert_eq!(&content[..], b"<p>hola</p>");
    }

    #[tokio::test]
    async fn test_missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalOutputStore::open(dir.path()).await.unwrap();
        assert!(matches!(
            store.read("nope.html").await,
            Err(StorageError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_escaping_names_are_refused() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalOutputStore::open(dir.path()).await.unwrap();
        let result = store
            .write("../escape.html", Bytes::from_static(b"x"), "text/html")
            .await;
        assert!(matches!(result, Err(StorageError::InvalidName(_))));
    }
}
