//! Firebase Admin bootstrap: loads service-account credentials from the
//! environment and hands out auth and storage handles, real or mock.

pub mod auth;
pub mod bootstrap;
pub mod config;
pub mod core;
pub mod mock;
pub mod storage;

#[cfg(test)]
pub(crate) mod test_support;

pub use bootstrap::{bootstrap, bootstrap_with, initialize_provider, Firebase, FirebaseMode};
pub use config::{ConfigError, FirebaseConfig};

use auth::keys::{PublicKeyManager, GOOGLE_PUBLIC_KEYS_URL};
use auth::verifier::IdTokenVerifier;
use auth::{FirebaseAuth, IDENTITY_TOOLKIT_API};
use crate::core::middleware::AuthMiddleware;
use storage::signer::UrlSigner;
use storage::{FirebaseStorage, STORAGE_API};
use thiserror::Error;
use yup_oauth2::ServiceAccountKey;

/// Errors raised while initializing the provider client.
#[derive(Error, Debug)]
pub enum InitError {
    #[error("Invalid service account credential: {0}")]
    InvalidCredential(String),
    #[error("Project ID is missing in service account key")]
    MissingProjectId,
}

/// Settings applied when initializing a [`FirebaseApp`].
///
/// The endpoint overrides point the clients at an emulator or test server.
#[derive(Debug, Clone, Default)]
pub struct AppOptions {
    /// Default bucket; `{project_id}.appspot.com` when unset.
    pub storage_bucket: Option<String>,
    pub identity_toolkit_url: Option<String>,
    pub storage_url: Option<String>,
    pub public_keys_url: Option<String>,
}

/// An initialized Firebase Admin app.
#[derive(Clone)]
pub struct FirebaseApp {
    project_id: String,
    options: AppOptions,
    middleware: AuthMiddleware,
}

impl FirebaseApp {
    /// Validates `key` and creates the app. No network request is made;
    /// access tokens are fetched on first use.
    pub fn initialize(key: ServiceAccountKey, options: AppOptions) -> Result<Self, InitError> {
        let project_id = key
            .project_id
            .clone()
            .filter(|id| !id.is_empty())
            .ok_or(InitError::MissingProjectId)?;

        if key.client_email.is_empty() {
            return Err(InitError::InvalidCredential(
                "client_email must not be empty".to_string(),
            ));
        }

        crate::core::parse_private_key(&key.private_key).map_err(|e| {
            InitError::InvalidCredential(format!("failed to parse private key: {}", e))
        })?;

        Ok(Self {
            project_id,
            options,
            middleware: AuthMiddleware::new(key),
        })
    }

    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    pub fn options(&self) -> &AppOptions {
        &self.options
    }

    pub fn storage_bucket(&self) -> String {
        self.options
            .storage_bucket
            .clone()
            .unwrap_or_else(|| format!("{}.appspot.com", self.project_id))
    }

    pub fn auth(&self) -> FirebaseAuth {
        let api = self
            .options
            .identity_toolkit_url
            .as_deref()
            .unwrap_or(IDENTITY_TOOLKIT_API);
        let keys_url = self
            .options
            .public_keys_url
            .as_deref()
            .unwrap_or(GOOGLE_PUBLIC_KEYS_URL);

        let verifier =
            IdTokenVerifier::with_key_manager(self.project_id.clone(), PublicKeyManager::with_url(keys_url));

        FirebaseAuth::new_with_client(
            crate::core::authorized_client(&self.middleware),
            format!("{}/projects/{}", api, self.project_id),
            verifier,
        )
    }

    pub fn storage(&self) -> FirebaseStorage {
        let base_url = self.options.storage_url.as_deref().unwrap_or(STORAGE_API);

        FirebaseStorage::new_with_client(
            crate::core::authorized_client(&self.middleware),
            base_url,
            UrlSigner::from_key(&self.middleware.key),
            self.storage_bucket(),
        )
    }
}
