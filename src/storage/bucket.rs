use crate::storage::file::File;
use crate::storage::signer::UrlSigner;
use crate::storage::{BucketHandle, FileHandle};
use reqwest_middleware::ClientWithMiddleware;
use std::sync::Arc;

/// A reference to a Google Cloud Storage bucket.
pub struct Bucket {
    client: ClientWithMiddleware,
    base_url: String,
    name: String,
    signer: Arc<UrlSigner>,
}

impl Bucket {
    pub(crate) fn new(
        client: ClientWithMiddleware,
        base_url: String,
        name: String,
        signer: Arc<UrlSigner>,
    ) -> Self {
        Self {
            client,
            base_url,
            name,
            signer,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Gets a `File` for the object at `name`, e.g. `"images/profile.png"`.
    pub fn file(&self, name: &str) -> File {
        File::new(
            self.client.clone(),
            self.base_url.clone(),
            self.name.clone(),
            name.to_string(),
            self.signer.clone(),
        )
    }
}

impl BucketHandle for Bucket {
    fn name(&self) -> &str {
        Bucket::name(self)
    }

    fn file(&self, path: &str) -> Box<dyn FileHandle> {
        Box::new(Bucket::file(self, path))
    }
}
