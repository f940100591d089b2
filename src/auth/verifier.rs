use crate::auth::keys::{KeyFetchError, PublicKeyManager};
use crate::auth::models::DecodedIdToken;
use jsonwebtoken::{decode, decode_header, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

const ISSUER_PREFIX: &str = "https://securetoken.google.com/";

// Tolerated clock skew for `auth_time`.
const AUTH_TIME_SKEW_SECS: i64 = 300;

#[derive(Error, Debug)]
pub enum TokenVerificationError {
    #[error("Key fetch error: {0}")]
    KeyFetchError(#[from] KeyFetchError),
    #[error("JWT validation error: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
    #[error("Invalid token: {0}")]
    InvalidToken(String),
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FirebaseTokenClaims {
    pub aud: String,
    pub iss: String,
    pub sub: String,
    pub exp: i64,
    pub iat: i64,
    pub auth_time: i64,
    #[serde(flatten)]
    pub claims: serde_json::Map<String, serde_json::Value>,
}

impl From<FirebaseTokenClaims> for DecodedIdToken {
    fn from(token: FirebaseTokenClaims) -> Self {
        let string_claim = |name: &str| {
            token
                .claims
                .get(name)
                .and_then(serde_json::Value::as_str)
                .map(str::to_string)
        };

        Self {
            email: string_claim("email"),
            name: string_claim("name"),
            picture: string_claim("picture"),
            uid: token.sub,
            claims: token.claims,
        }
    }
}

/// Verifies Firebase ID tokens for one project.
pub struct IdTokenVerifier {
    project_id: String,
    key_manager: PublicKeyManager,
}

impl IdTokenVerifier {
    pub fn new(project_id: impl Into<String>) -> Self {
        Self::with_key_manager(project_id, PublicKeyManager::new())
    }

    pub fn with_key_manager(project_id: impl Into<String>, key_manager: PublicKeyManager) -> Self {
        Self {
            project_id: project_id.into(),
            key_manager,
        }
    }

    pub async fn verify_token(&self, token: &str) -> Result<FirebaseTokenClaims, TokenVerificationError> {
        let header = decode_header(token)?;
        let kid = header
            .kid
            .ok_or_else(|| TokenVerificationError::InvalidToken("Missing kid in header".to_string()))?;

        let public_key_pem = self.key_manager.get_key(&kid).await?;
        let key = DecodingKey::from_rsa_pem(public_key_pem.as_bytes())?;

        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_audience(&[&self.project_id]);
        validation.set_issuer(&[format!("{}{}", ISSUER_PREFIX, self.project_id)]);

        let claims = decode::<FirebaseTokenClaims>(token, &key, &validation)?.claims;

        if claims.sub.is_empty() {
            return Err(TokenVerificationError::InvalidToken(
                "Subject (sub) claim must not be empty".to_string(),
            ));
        }

        if claims.auth_time > chrono::Utc::now().timestamp() + AUTH_TIME_SKEW_SECS {
            return Err(TokenVerificationError::InvalidToken(
                "Auth time is in the future".to_string(),
            ));
        }

        Ok(claims)
    }
}
