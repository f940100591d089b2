use serde::{Deserialize, Serialize};

/// An Identity Toolkit account record.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct UserRecord {
    pub local_id: String,
    pub email: Option<String>,
    pub email_verified: bool,
    pub display_name: Option<String>,
    pub photo_url: Option<String>,
    pub phone_number: Option<String>,
    pub disabled: bool,
    /// Milliseconds since the epoch, as a decimal string.
    pub created_at: Option<String>,
    pub last_login_at: Option<String>,
    pub provider_user_info: Option<Vec<ProviderUserInfo>>,
    /// JSON-encoded custom claims.
    pub custom_attributes: Option<String>,
}

impl UserRecord {
    pub fn uid(&self) -> &str {
        &self.local_id
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProviderUserInfo {
    pub provider_id: String,
    pub display_name: Option<String>,
    pub photo_url: Option<String>,
    pub federated_id: Option<String>,
    pub email: Option<String>,
    pub raw_id: Option<String>,
}

/// Identity claims of a verified ID token.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DecodedIdToken {
    pub uid: String,
    pub email: Option<String>,
    pub name: Option<String>,
    pub picture: Option<String>,
    /// Remaining claims of the token (`firebase`, custom claims, ...).
    pub claims: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GetAccountInfoRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub local_id: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetAccountInfoResponse {
    pub users: Option<Vec<UserRecord>>,
}
