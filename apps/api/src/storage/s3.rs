use async_trait::async_trait;
use aws_sdk_s3::primitives::ByteStream;
use bytes::Bytes;
use tracing::info;

use crate::storage::{validate_filename, OutputStore, StorageError, StorageHandle};

const KEY_PREFIX: &str = "resolutions";

/// Writes documents to `s3://<bucket>/resolutions/<filename>` (MinIO locally).
pub struct S3OutputStore {
    client: aws_sdk_s3::Client,
    bucket: String,
}

impl S3OutputStore {
    pub fn new(client: aws_sdk_s3::Client, bucket: String) -> Self {
        Self { client, bucket }
    }

    fn key(filename: &str) -> String {
        format!("{KEY_PREFIX}/{filename}")
    }
}

#[async_trait]
impl OutputStore for S3OutputStore {
    async fn write(
        &self,
        filename: &str,
        content: Bytes,
        content_type: &str,
    ) -> Result<StorageHandle, StorageError> {
        validate_filename(filename)?;
        let key = Self::key(filename);

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(&key)
            .body(ByteStream::from(content))
            .content_type(content_type)
            .send()
            .await
            .map_err(|e| StorageError::S3(format!("upload of {key} failed: {e}")))?;

        info!("Uploaded s3://{}/{}", self.bucket, key);

        Ok(StorageHandle {
            filename: filename.to_string(),
            location: format!("s3://{}/{}", self.bucket, key),
        })
    }

    async fn read(&self, filename: &str) -> Result<Bytes, StorageError> {
        validate_filename(filename)?;
        let key = Self::key(filename);

        let object = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(&key)
            .send()
            .await
            .map_err(|e| {
                if e.as_service_error().is_some_and(|se| se.is_no_such_key()) {
                    StorageError::NotFound(filename.to_string())
                } else {
                    StorageError::S3(format!("download of {key} failed: {e}"))
                }
            })?;

        let data = object
            .body
            .collect()
            .await
            .map_err(|e| StorageError::S3(format!("reading {key} failed: {e}")))?;
        Ok(data.into_bytes())
    }
}
