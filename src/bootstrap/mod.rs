//! Startup wiring: decides once between the real provider and the mocks.

use crate::auth::AuthHandle;
use crate::config::{ConfigError, FirebaseConfig};
use crate::mock::{MockAuth, MockStorage};
use crate::storage::StorageHandle;
use crate::{AppOptions, FirebaseApp, InitError};
use std::fmt;
use std::sync::Arc;
use tracing::{error, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FirebaseMode {
    Real,
    Mock,
}

impl fmt::Display for FirebaseMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FirebaseMode::Real => "real",
            FirebaseMode::Mock => "mock",
        })
    }
}

/// The auth and storage handles the application runs with.
///
/// Built once at startup by [`bootstrap`] and passed to whatever needs it
/// (request authentication, upload handlers). Cloning is cheap.
#[derive(Clone)]
pub struct Firebase {
    mode: FirebaseMode,
    auth: Arc<dyn AuthHandle>,
    storage: Arc<dyn StorageHandle>,
    app: Option<FirebaseApp>,
}

impl fmt::Debug for Firebase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Firebase")
            .field("mode", &self.mode)
            .field("project_id", &self.app.as_ref().map(FirebaseApp::project_id))
            .finish()
    }
}

impl Firebase {
    /// Loads configuration from the environment and bootstraps.
    pub fn from_env() -> Result<Self, ConfigError> {
        let config = FirebaseConfig::from_env()?;
        Ok(bootstrap(&config))
    }

    pub fn mock() -> Self {
        Self {
            mode: FirebaseMode::Mock,
            auth: Arc::new(MockAuth),
            storage: Arc::new(MockStorage),
            app: None,
        }
    }

    pub fn real(app: FirebaseApp) -> Self {
        Self {
            mode: FirebaseMode::Real,
            auth: Arc::new(app.auth()),
            storage: Arc::new(app.storage()),
            app: Some(app),
        }
    }

    pub fn mode(&self) -> FirebaseMode {
        self.mode
    }

    pub fn is_mock(&self) -> bool {
        self.mode == FirebaseMode::Mock
    }

    pub fn auth(&self) -> Arc<dyn AuthHandle> {
        self.auth.clone()
    }

    pub fn storage(&self) -> Arc<dyn StorageHandle> {
        self.storage.clone()
    }

    /// The underlying app, present only in real mode.
    pub fn app(&self) -> Option<&FirebaseApp> {
        self.app.as_ref()
    }
}

/// Initializes the provider from `config`, or returns mock handles when the
/// configuration is in mock mode or initialization fails.
pub fn bootstrap(config: &FirebaseConfig) -> Firebase {
    bootstrap_with(config, initialize_provider)
}

/// Like [`bootstrap`], with a caller-supplied provider initializer.
pub fn bootstrap_with<F>(config: &FirebaseConfig, initialize: F) -> Firebase
where
    F: FnOnce(&FirebaseConfig) -> Result<FirebaseApp, InitError>,
{
    if config.is_mock_mode() {
        warn!("Running in MOCK mode for Firebase. Authentication and Storage will NOT work securely.");
        warn!("Set FIREBASE_PRIVATE_KEY to your service account key to enable real functionality.");
        return Firebase::mock();
    }

    match initialize(config) {
        Ok(app) => {
            info!(
                project_id = app.project_id(),
                bucket = %app.storage_bucket(),
                "Initialized Firebase Admin"
            );
            Firebase::real(app)
        }
        Err(e) => {
            error!(error = %e, "Failed to initialize Firebase Admin, falling back to mock mode");
            Firebase::mock()
        }
    }
}

/// Builds the real app from `config` with the project's default bucket.
pub fn initialize_provider(config: &FirebaseConfig) -> Result<FirebaseApp, InitError> {
    let key = config
        .service_account_key()
        .ok_or_else(|| InitError::InvalidCredential("private key is missing".to_string()))?;

    FirebaseApp::initialize(
        key,
        AppOptions {
            storage_bucket: Some(config.storage_bucket()),
            ..Default::default()
        },
    )
}

#[cfg(test)]
mod tests;
