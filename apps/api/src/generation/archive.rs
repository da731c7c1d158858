//! Bundles stored documents into a single ZIP download.

use std::collections::HashSet;
use std::io::{Cursor, Write};

use bytes::Bytes;
use chrono::NaiveDateTime;
use thiserror::Error;
use tracing::{debug, warn};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::storage::{OutputStore, StorageError};

pub const CONTENT_TYPE: &str = "application/zip";

#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("Debe indicar al menos un archivo")]
    NoFilenames,

    #[error("Ninguno de los archivos solicitados existe")]
    NothingFound,

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("zip encoding failed: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("zip encoding failed: {0}")]
    Io(#[from] std::io::Error),
}

/// `resoluciones_<YYYYmmdd_HHMMSS>.zip`
pub fn archive_filename(now: NaiveDateTime) -> String {
    format!("resoluciones_{}.zip", now.format("%Y%m%d_%H%M%S"))
}

/// Reads each named file from `store` into one deflated archive, in request
/// order. Duplicates are added once and missing files are skipped.
pub async fn build_archive(
    store: &dyn OutputStore,
    filenames: &[String],
) -> Result<Bytes, ArchiveError> {
    let mut seen = HashSet::new();
    let names: Vec<&str> = filenames
        .iter()
        .map(|name| name.trim())
        .filter(|name| !name.is_empty() && seen.insert(*name))
        .collect();
    if names.is_empty() {
        return Err(ArchiveError::NoFilenames);
    }

    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let mut added = 0usize;

    for name in names {
        let content = match store.read(name).await {
            Ok(content) => content,
            Err(StorageError::NotFound(_)) => {
                warn!("Skipping {name} in archive: not found");
                continue;
            }
            Err(e) => return Err(e.into()),
        };
        writer.start_file(name, options)?;
        writer.write_all(&content)?;
        added += 1;
    }

    if added == 0 {
        return Err(ArchiveError::NothingFound);
    }

    let buffer = writer.finish()?.into_inner();
    debug!("Archived {added} files ({} bytes)", buffer.len());
    Ok(Bytes::from(buffer))
}

#[cfg(test)]
mod tests {
    use std::io::Read;

    use chrono::NaiveDate;
    use zip::ZipArchive;

    use super::*;
    use crate::storage::memory::MemoryOutputStore;

    async fn store_with(files: &[(&str, &str)]) -> MemoryOutputStore {
        let store = MemoryOutputStore::default();
        for (name, content) in files {
            store
                .write(name, Bytes::from(content.to_string()), "text/html")
                .await
                .unwrap();
        }
        store
    }

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_archive_filename_uses_timestamp() {
        let now = NaiveDate::from_ymd_opt(2024, 5, 7)
            .unwrap()
            .and_hms_opt(9, 5, 3)
            .unwrap();
        assert_eq!(archive_filename(now), "resoluciones_20240507_090503.zip");
    }

    #[tokio::test]
    async fn test_archive_holds_requested_files_once() {
        let store = store_with(&[
            ("resolucion_15_00001_100.html", "<p>uno</p>"),
            ("resolucion_15_00002_200.html", "<p>dos</p>"),
            ("resolucion_15_00003_300.html", "<p>tres</p>"),
        ])
        .await;

        let bytes = build_archive(
            &store,
            &names(&[
                "resolucion_15_00002_200.html",
                "resolucion_15_00001_100.html",
                " resolucion_15_00002_200.html ",
                "resolucion_15_00009_900.html",
            ]),
        )
        .await
        .unwrap();

        let mut archive = ZipArchive::new(Cursor::new(bytes.to_vec())).unwrap();
        assert_eq!(archive.len(), 2);
        assert_eq!(archive.by_index(0).unwrap().name(), "resolucion_15_00002_200.html");

        let mut content = String::new();
        archive
            .by_name("resolucion_15_00001_100.html")
            .unwrap()
            .read_to_string(&mut content)
            .unwrap();
        assert_eq!(content, "<p>uno</p>");
    }

    #[tokio::test]
    async fn test_empty_and_missing_requests_are_rejected() {
        let store = store_with(&[("resolucion_15_00001_100.html", "x")]).await;

        assert!(matches!(
            build_archive(&store, &names(&[" ", ""])).await,
            Err(ArchiveError::NoFilenames)
        ));
        assert!(matches!(
            build_archive(&store, &names(&["nope.html"])).await,
            Err(ArchiveError::NothingFound)
        ));
        assert!(matches!(
            build_archive(&store, &names(&["../etc/passwd"])).await,
            Err(ArchiveError::Storage(StorageError::InvalidName(_)))
        ));
    }
}
