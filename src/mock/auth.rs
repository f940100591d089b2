use super::{MOCK_DISPLAY_NAME, MOCK_EMAIL, MOCK_PICTURE_URL, MOCK_UID};
use crate::auth::models::{DecodedIdToken, UserRecord};
use crate::auth::{AuthError, AuthHandle};
use async_trait::async_trait;
use tracing::info;

// Characters of the token echoed to the log.
const TOKEN_PREFIX_LEN: usize = 10;

/// Accepts any token as the fixed mock identity.
#[derive(Debug, Clone, Copy, Default)]
pub struct MockAuth;

#[async_trait]
impl AuthHandle for MockAuth {
    async fn verify_id_token(&self, token: &str) -> Result<DecodedIdToken, AuthError> {
        let prefix: String = token.chars().take(TOKEN_PREFIX_LEN).collect();
        info!(token = %format!("{}...", prefix), "[MOCK] Verifying token");

        Ok(DecodedIdToken {
            uid: MOCK_UID.to_string(),
            email: Some(MOCK_EMAIL.to_string()),
            name: Some(MOCK_DISPLAY_NAME.to_string()),
            picture: Some(MOCK_PICTURE_URL.to_string()),
            claims: serde_json::Map::new(),
        })
    }

    async fn get_user(&self, uid: &str) -> Result<UserRecord, AuthError> {
        Ok(UserRecord {
            local_id: uid.to_string(),
            email: Some(MOCK_EMAIL.to_string()),
            display_name: Some(MOCK_DISPLAY_NAME.to_string()),
            ..Default::default()
        })
    }
}
