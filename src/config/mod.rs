use std::env;
use std::fmt;
use thiserror::Error;
use tracing::warn;
use yup_oauth2::ServiceAccountKey;

pub const PROJECT_ID_VAR: &str = "FIREBASE_PROJECT_ID";
pub const PRIVATE_KEY_VAR: &str = "FIREBASE_PRIVATE_KEY";
pub const CLIENT_EMAIL_VAR: &str = "FIREBASE_CLIENT_EMAIL";

/// Marker left in the private key of the template `.env` file.
pub const PLACEHOLDER_PRIVATE_KEY: &str = "YOUR_PRIVATE_KEY_HERE";

const TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

/// Errors raised while loading configuration. Both are fatal at startup.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing Firebase credentials in environment variables: {}", .0.join(", "))]
    MissingCredentials(Vec<&'static str>),
    #[error(
        "You are using the placeholder Firebase private key (YOUR_PRIVATE_KEY_HERE). \
         Set FIREBASE_PRIVATE_KEY to the service account key from the Firebase Console."
    )]
    PlaceholderKey,
}

#[derive(Clone, PartialEq, Eq)]
pub struct FirebaseConfig {
    pub project_id: String,
    /// PEM-encoded key with real line breaks; `None` when the variable is blank.
    pub private_key: Option<String>,
    pub client_email: String,
}

impl fmt::Debug for FirebaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FirebaseConfig")
            .field("project_id", &self.project_id)
            .field("private_key", &self.private_key.as_ref().map(|_| "<redacted>"))
            .field("client_email", &self.client_email)
            .finish()
    }
}

impl FirebaseConfig {
    /// Loads `.env` if present, then reads the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        if let Err(e) = dotenvy::dotenv() {
            if !e.not_found() {
                warn!(error = %e, "Failed to load .env file");
            }
        }

        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Reads the configuration through `lookup`, which maps a variable name to its value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let project_id = non_empty(PROJECT_ID_VAR);
        let private_key = lookup(PRIVATE_KEY_VAR);
        let client_email = non_empty(CLIENT_EMAIL_VAR);

        let (project_id, private_key, client_email) = match (project_id, private_key, client_email) {
            (Some(project_id), Some(private_key), Some(client_email)) => {
                (project_id, private_key, client_email)
            }
            (project_id, private_key, client_email) => {
                let missing = [
                    (PROJECT_ID_VAR, project_id.is_none()),
                    (PRIVATE_KEY_VAR, private_key.is_none()),
                    (CLIENT_EMAIL_VAR, client_email.is_none()),
                ]
                .into_iter()
                .filter_map(|(name, absent)| absent.then_some(name))
                .collect();
                return Err(ConfigError::MissingCredentials(missing));
            }
        };

        if private_key.contains(PLACEHOLDER_PRIVATE_KEY) {
            return Err(ConfigError::PlaceholderKey);
        }

        let private_key = unescape_newlines(&private_key);
        let private_key = (!private_key.trim().is_empty()).then_some(private_key);

        Ok(Self {
            project_id,
            private_key,
            client_email,
        })
    }

    /// True when no real provider should be contacted: the key is absent or
    /// still the template placeholder.
    pub fn is_mock_mode(&self) -> bool {
        match &self.private_key {
            None => true,
            Some(key) => key.contains(PLACEHOLDER_PRIVATE_KEY),
        }
    }

    /// Default Cloud Storage bucket of the project.
    pub fn storage_bucket(&self) -> String {
        format!("{}.appspot.com", self.project_id)
    }

    /// Service-account key for the OAuth2 token flow, or `None` without a private key.
    pub fn service_account_key(&self) -> Option<ServiceAccountKey> {
        let private_key = self.private_key.clone()?;

        Some(ServiceAccountKey {
            key_type: Some("service_account".to_string()),
            project_id: Some(self.project_id.clone()),
            private_key_id: None,
            private_key,
            client_email: self.client_email.clone(),
            client_id: None,
            auth_uri: None,
            token_uri: TOKEN_URI.to_string(),
            auth_provider_x509_cert_url: None,
            client_x509_cert_url: None,
        })
    }
}

// `.env` files and CI secrets carry PEM keys on one line with literal `\n`.
fn unescape_newlines(value: &str) -> String {
    value.replace("\\n", "\n")
}
