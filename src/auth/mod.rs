pub mod keys;
pub mod models;
pub mod verifier;

use crate::auth::models::{DecodedIdToken, GetAccountInfoRequest, GetAccountInfoResponse, UserRecord};
use crate::auth::verifier::{IdTokenVerifier, TokenVerificationError};
use crate::core::parse_error_response;
use async_trait::async_trait;
use reqwest::header;
use reqwest_middleware::ClientWithMiddleware;
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

pub(crate) const IDENTITY_TOOLKIT_API: &str = "https://identitytoolkit.googleapis.com/v1";


#[derive(Error, Debug)]
pub enum AuthError {
    #[error("HTTP Request failed: {0}")]
    RequestError(#[from] reqwest::Error),
    #[error("Middleware error: {0}")]
    MiddlewareError(#[from] reqwest_middleware::Error),
    #[error("API error: {0}")]
    ApiError(String),
    #[error("User not found")]
    UserNotFound,
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
    #[error("Token verification failed: {0}")]
    TokenVerification(#[from] TokenVerificationError),
}

/// Identity operations shared by the real and mock auth handles.
#[async_trait]
pub trait AuthHandle: Send + Sync {
    /// Verifies a bearer ID token and returns its identity claims.
    async fn verify_id_token(&self, token: &str) -> Result<DecodedIdToken, AuthError>;

    /// Fetches the user record for `uid`.
    async fn get_user(&self, uid: &str) -> Result<UserRecord, AuthError>;
}

/// Client for the Identity Toolkit API.
#[derive(Clone)]
pub struct FirebaseAuth {
    client: ClientWithMiddleware,
    base_url: String,
    verifier: Arc<IdTokenVerifier>,
}

impl FirebaseAuth {
    /// Creates a client from an authorized HTTP client.
    ///
    /// `base_url` is the project resource URL, e.g.
    /// `https://identitytoolkit.googleapis.com/v1/projects/my-project`.
    pub fn new_with_client(
        client: ClientWithMiddleware,
        base_url: impl Into<String>,
        verifier: IdTokenVerifier,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            verifier: Arc::new(verifier),
        }
    }

    pub async fn verify_id_token(&self, token: &str) -> Result<DecodedIdToken, AuthError> {
        let claims = self.verifier.verify_token(token).await?;
        debug!(uid = %claims.sub, "Verified ID token");
        Ok(claims.into())
    }

    async fn get_account_info(&self, request: GetAccountInfoRequest) -> Result<UserRecord, AuthError> {
        let url = format!("{}/accounts:lookup", self.base_url);

        let response = self
            .client
            .post(&url)
            .header(header::CONTENT_TYPE, "application/json")
            .body(serde_json::to_vec(&request)?)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(AuthError::ApiError(
                parse_error_response(response, "Get user failed").await,
            ));
        }

        let result: GetAccountInfoResponse = response.json().await?;

        result
            .users
            .and_then(|mut users| users.pop())
            .ok_or(AuthError::UserNotFound)
    }

    pub async fn get_user(&self, uid: &str) -> Result<UserRecord, AuthError> {
        let request = GetAccountInfoRequest {
            local_id: Some(vec![uid.to_string()]),
            email: None,
        };
        self.get_account_info(request).await
    }

    pub async fn get_user_by_email(&self, email: &str) -> Result<UserRecord, AuthError> {
        let request = GetAccountInfoRequest {
            local_id: None,
            email: Some(vec![email.to_string()]),
        };
        self.get_account_info(request).await
    }
}

#[async_trait]
impl AuthHandle for FirebaseAuth {
    async fn verify_id_token(&self, token: &str) -> Result<DecodedIdToken, AuthError> {
        FirebaseAuth::verify_id_token(self, token).await
    }

    async fn get_user(&self, uid: &str) -> Result<UserRecord, AuthError> {
        FirebaseAuth::get_user(self, uid).await
    }
}
