//! Cloud Storage for Firebase.
//!
//! The handle traits ([`StorageHandle`], [`BucketHandle`], [`FileHandle`])
//! mirror the bucket → file → operation shape of the provider SDK so the
//! real client and [`crate::mock::MockStorage`] are interchangeable.
//!
//! # Examples
//!
//! ```rust,no_run
//! # use firebase_bootstrap::storage::GetSignedUrlOptions;
//! # use std::time::Duration;
//! # async fn run(firebase: firebase_bootstrap::Firebase) -> Result<(), Box<dyn std::error::Error>> {
//! let file = firebase.storage().bucket(None).file("videos/intro.mp4");
//! file.save(bytes::Bytes::from_static(b"..."), "video/mp4").await?;
//! let url = file.get_signed_url(GetSignedUrlOptions::read_for(Duration::from_secs(900))).await?;
//! # Ok(())
//! # }
//! ```

pub mod bucket;
pub mod file;
pub mod signer;

use crate::core::authorized_client;
use crate::core::middleware::AuthMiddleware;
use async_trait::async_trait;
use bucket::Bucket;
use bytes::Bytes;
use reqwest_middleware::ClientWithMiddleware;
use signer::UrlSigner;
use std::sync::Arc;
use thiserror::Error;

pub use signer::{GetSignedUrlOptions, SignedUrlMethod};

pub(crate) const STORAGE_API: &str = "https://storage.googleapis.com";

/// Errors that can occur during Storage operations.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("HTTP Request failed: {0}")]
    RequestError(#[from] reqwest::Error),
    #[error("Middleware error: {0}")]
    MiddlewareError(#[from] reqwest_middleware::Error),
    /// Errors returned by the Cloud Storage API.
    #[error("API error: {0}")]
    ApiError(String),
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
    /// The signed URL request was invalid or the key could not sign.
    #[error("Signing error: {0}")]
    SigningError(String),
}

/// Entry point of a storage backend.
pub trait StorageHandle: Send + Sync {
    /// Returns the bucket called `name`, or the app's default bucket.
    fn bucket(&self, name: Option<&str>) -> Box<dyn BucketHandle>;
}

pub trait BucketHandle: Send + Sync {
    fn name(&self) -> &str;

    /// Returns a reference to the object at `path`. No request is made.
    fn file(&self, path: &str) -> Box<dyn FileHandle>;
}

#[async_trait]
pub trait FileHandle: Send + Sync {
    fn name(&self) -> &str;

    async fn save(&self, body: Bytes, content_type: &str) -> Result<(), StorageError>;

    async fn get_signed_url(&self, options: GetSignedUrlOptions) -> Result<String, StorageError>;

    async fn exists(&self) -> Result<bool, StorageError>;

    async fn delete(&self) -> Result<(), StorageError>;
}

/// Client for interacting with Cloud Storage for Firebase.
#[derive(Clone)]
pub struct FirebaseStorage {
    client: ClientWithMiddleware,
    base_url: String,
    default_bucket: String,
    signer: Arc<UrlSigner>,
}

impl FirebaseStorage {
    /// Creates a client authorized by `middleware`.
    ///
    /// This is typically called via `FirebaseApp::storage()`.
    pub fn new(middleware: &AuthMiddleware, default_bucket: impl Into<String>) -> Self {
        Self::new_with_client(
            authorized_client(middleware),
            STORAGE_API,
            UrlSigner::from_key(&middleware.key),
            default_bucket,
        )
    }

    /// Creates a client with a caller-supplied HTTP client and API root
    /// (`https://storage.googleapis.com` in production).
    pub fn new_with_client(
        client: ClientWithMiddleware,
        base_url: impl Into<String>,
        signer: UrlSigner,
        default_bucket: impl Into<String>,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            default_bucket: default_bucket.into(),
            signer: Arc::new(signer),
        }
    }

    /// Gets a `Bucket` by name, or the default bucket (`{project_id}.appspot.com`) for `None`.
    pub fn bucket(&self, name: Option<&str>) -> Bucket {
        let bucket_name = name.unwrap_or(&self.default_bucket).to_string();

        Bucket::new(
            self.client.clone(),
            self.base_url.clone(),
            bucket_name,
            self.signer.clone(),
        )
    }
}

impl StorageHandle for FirebaseStorage {
    fn bucket(&self, name: Option<&str>) -> Box<dyn BucketHandle> {
        Box::new(FirebaseStorage::bucket(self, name))
    }
}
