use super::MOCK_SIGNED_URL;
use crate::storage::{BucketHandle, FileHandle, GetSignedUrlOptions, StorageError, StorageHandle};
use async_trait::async_trait;
use bytes::Bytes;
use tracing::info;

const MOCK_BUCKET: &str = "mock-bucket";

/// Storage that logs each call and always succeeds.
#[derive(Debug, Clone, Copy, Default)]
pub struct MockStorage;

#[derive(Debug, Clone)]
pub struct MockBucket {
    name: String,
}

#[derive(Debug, Clone)]
pub struct MockFile {
    path: String,
}

impl StorageHandle for MockStorage {
    fn bucket(&self, name: Option<&str>) -> Box<dyn BucketHandle> {
        Box::new(MockBucket {
            name: name.unwrap_or(MOCK_BUCKET).to_string(),
        })
    }
}

impl BucketHandle for MockBucket {
    fn name(&self) -> &str {
        &self.name
    }

    fn file(&self, path: &str) -> Box<dyn FileHandle> {
        Box::new(MockFile {
            path: path.to_string(),
        })
    }
}

#[async_trait]
impl FileHandle for MockFile {
    fn name(&self) -> &str {
        &self.path
    }

    async fn save(&self, body: Bytes, _content_type: &str) -> Result<(), StorageError> {
        info!(path = %self.path, bytes = body.len(), "[MOCK] Saved file");
        Ok(())
    }

    async fn get_signed_url(&self, _options: GetSignedUrlOptions) -> Result<String, StorageError> {
        info!(path = %self.path, "[MOCK] Signed URL");
        Ok(MOCK_SIGNED_URL.to_string())
    }

    async fn exists(&self) -> Result<bool, StorageError> {
        info!(path = %self.path, "[MOCK] Exists check");
        Ok(true)
    }

    async fn delete(&self) -> Result<(), StorageError> {
        info!(path = %self.path, "[MOCK] Deleted file");
        Ok(())
    }
}
