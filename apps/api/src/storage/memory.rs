//! In-memory output store for tests, with injectable write failures.

use std::collections::BTreeMap;
use std::sync::Mutex;

use async_trait::async_trait;
use bytes::Bytes;

use crate::storage::{validate_filename, OutputStore, StorageError, StorageHandle};

#[derive(Default)]
pub struct MemoryOutputStore {
    files: Mutex<BTreeMap<String, Bytes>>,
    /// Writes to any filename containing one of these fragments fail.
    fail_on: Vec<String>,
}

impl MemoryOutputStore {
    pub fn failing_on(fragments: &[&str]) -> Self {
        Self {
            files: Mutex::default(),
            fail_on: fragments.iter().map(|f| f.to_string()).collect(),
        }
    }

    pub fn filenames(&self) -> Vec<String> {
        self.files.lock().unwrap().keys().cloned().collect()
    }

    pub fn bytes(&self, filename: &str) -> Option<Bytes> {
        self.files.lock().unwrap().get(filename).cloned()
    }

    pub fn text(&self, filename: &str) -> Option<String> {
        self.files
            .lock()
            .unwrap()
            .get(filename)
            .map(|b| String::from_utf8_lossy(b).into_owned())
    }
}

#[async_trait]
impl OutputStore for MemoryOutputStore {
    async fn write(
        &self,
        filename: &str,
        content: Bytes,
        _content_type: &str,
    ) -> Result<StorageHandle, StorageError> {
        validate_filename(filename)?;
        if self.fail_on.iter().any(|f| filename.contains(f.as_str())) {
            return Err(StorageError::Io(std::io::Error::new(
                std::io::ErrorKind::Other,
                "simulated disk failure",
            )));
        }
        self.files
            .lock()
            .unwrap()
            .insert(filename.to_string(), content);
        Ok(StorageHandle {
            filename: filename.to_string(),
            location: format!("memory://{filename}"),
        })
    }

    async fn read(&self, filename: &str) -> Result<Bytes, StorageError> {
        validate_filename(filename)?;
        self.files
            .lock()
            .unwrap()
            .get(filename)
            .cloned()
            .ok_or_else(|| StorageError::NotFound(filename.to_string()))
    }
}
