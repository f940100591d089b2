use crate::core::parse_error_response;
use crate::storage::signer::{percent_encode, GetSignedUrlOptions, UrlSigner};
use crate::storage::{FileHandle, StorageError};
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{header, StatusCode};
use reqwest_middleware::ClientWithMiddleware;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::SystemTime;
use tracing::debug;

/// Represents a file within a Google Cloud Storage bucket.
pub struct File {
    client: ClientWithMiddleware,
    base_url: String,
    bucket_name: String,
    name: String,
    signer: Arc<UrlSigner>,
}

/// Metadata for a Google Cloud Storage object.
#[derive(Debug, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ObjectMetadata {
    pub name: Option<String>,
    pub bucket: Option<String>,
    pub generation: Option<String>,
    pub content_type: Option<String>,
    pub time_created: Option<String>,
    pub updated: Option<String>,
    pub size: Option<String>,
    pub md5_hash: Option<String>,
    pub media_link: Option<String>,
}

impl File {
    pub(crate) fn new(
        client: ClientWithMiddleware,
        base_url: String,
        bucket_name: String,
        name: String,
        signer: Arc<UrlSigner>,
    ) -> Self {
        Self {
            client,
            base_url,
            bucket_name,
            name,
            signer,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the name of the bucket containing the file.
    pub fn bucket(&self) -> &str {
        &self.bucket_name
    }

    // JSON API object resource; the object name is a single path segment.
    fn object_url(&self) -> String {
        format!(
            "{}/storage/v1/b/{}/o/{}",
            self.base_url,
            self.bucket_name,
            percent_encode(&self.name)
        )
    }

    /// Uploads `body` with the simple (media) upload API.
    pub async fn save(
        &self,
        body: impl Into<reqwest::Body>,
        mime_type: &str,
    ) -> Result<(), StorageError> {
        let url = format!("{}/upload/storage/v1/b/{}/o", self.base_url, self.bucket_name);

        let response = self
            .client
            .post(&url)
            .query(&[("uploadType", "media"), ("name", self.name.as_str())])
            .header(header::CONTENT_TYPE, mime_type)
            .body(body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(StorageError::ApiError(
                parse_error_response(response, "Upload failed").await,
            ));
        }

        debug!(bucket = %self.bucket_name, name = %self.name, "Uploaded object");
        Ok(())
    }

    /// Returns whether the object exists.
    pub async fn exists(&self) -> Result<bool, StorageError> {
        let response = self.client.get(self.object_url()).send().await?;

        match response.status() {
            status if status.is_success() => Ok(true),
            StatusCode::NOT_FOUND => Ok(false),
            _ => Err(StorageError::ApiError(
                parse_error_response(response, "Exists check failed").await,
            )),
        }
    }

    pub async fn delete(&self) -> Result<(), StorageError> {
        let response = self.client.delete(self.object_url()).send().await?;

        if !response.status().is_success() {
            return Err(StorageError::ApiError(
                parse_error_response(response, "Delete failed").await,
            ));
        }

        Ok(())
    }

    pub async fn get_metadata(&self) -> Result<ObjectMetadata, StorageError> {
        let response = self.client.get(self.object_url()).send().await?;

        if !response.status().is_success() {
            return Err(StorageError::ApiError(
                parse_error_response(response, "Get metadata failed").await,
            ));
        }

        Ok(response.json().await?)
    }

    /// Generates a V4 signed URL for this object. Signing is local; no request is made.
    pub fn get_signed_url(&self, options: &GetSignedUrlOptions) -> Result<String, StorageError> {
        self.signer
            .sign(&self.bucket_name, &self.name, options, SystemTime::now())
    }
}

#[async_trait]
impl FileHandle for File {
    fn name(&self) -> &str {
        File::name(self)
    }

    async fn save(&self, body: Bytes, content_type: &str) -> Result<(), StorageError> {
        File::save(self, body, content_type).await
    }

    async fn get_signed_url(&self, options: GetSignedUrlOptions) -> Result<String, StorageError> {
        File::get_signed_url(self, &options)
    }

    async fn exists(&self) -> Result<bool, StorageError> {
        File::exists(self).await
    }

    async fn delete(&self) -> Result<(), StorageError> {
        File::delete(self).await
    }
}
