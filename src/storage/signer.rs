//! Cloud Storage V4 signed URLs (`GOOG4-RSA-SHA256`), signed locally with
//! the service-account private key.

use crate::core::parse_private_key;
use crate::storage::StorageError;
use chrono::{DateTime, Utc};
use rsa::pkcs1v15::SigningKey;
use rsa::signature::{SignatureEncoding, Signer};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::fmt;
use std::time::{Duration, SystemTime};
use yup_oauth2::ServiceAccountKey;

const SIGNING_ALGORITHM: &str = "GOOG4-RSA-SHA256";
const SIGNING_HOST: &str = "storage.googleapis.com";
const MAX_EXPIRY_SECS: u64 = 7 * 24 * 60 * 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignedUrlMethod {
    Get,
    Put,
    Delete,
}

impl fmt::Display for SignedUrlMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SignedUrlMethod::Get => "GET",
            SignedUrlMethod::Put => "PUT",
            SignedUrlMethod::Delete => "DELETE",
        })
    }
}

#[derive(Debug, Clone)]
pub struct GetSignedUrlOptions {
    pub method: SignedUrlMethod,
    /// Absolute expiry; at most seven days after signing.
    pub expires: SystemTime,
    /// When set, the request must carry this `Content-Type`.
    pub content_type: Option<String>,
}

impl GetSignedUrlOptions {
    /// Read access for `ttl` from now.
    pub fn read_for(ttl: Duration) -> Self {
        Self {
            method: SignedUrlMethod::Get,
            expires: SystemTime::now() + ttl,
            content_type: None,
        }
    }
}

pub struct UrlSigner {
    client_email: String,
    private_key: String,
}

impl UrlSigner {
    pub fn new(client_email: impl Into<String>, private_key: impl Into<String>) -> Self {
        Self {
            client_email: client_email.into(),
            private_key: private_key.into(),
        }
    }

    pub fn from_key(key: &ServiceAccountKey) -> Self {
        Self::new(key.client_email.clone(), key.private_key.clone())
    }

    pub fn client_email(&self) -> &str {
        &self.client_email
    }

    pub(crate) fn sign(
        &self,
        bucket: &str,
        object: &str,
        options: &GetSignedUrlOptions,
        now: SystemTime,
    ) -> Result<String, StorageError> {
        let expires_in = options
            .expires
            .duration_since(now)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        if expires_in == 0 {
            return Err(StorageError::SigningError(
                "Expiration time must be in the future".to_string(),
            ));
        }
        if expires_in > MAX_EXPIRY_SECS {
            return Err(StorageError::SigningError(format!(
                "Expiration time can't be more than {} seconds in the future",
                MAX_EXPIRY_SECS
            )));
        }

        let now: DateTime<Utc> = now.into();
        let timestamp = now.format("%Y%m%dT%H%M%SZ").to_string();
        let scope = format!("{}/auto/storage/goog4_request", now.format("%Y%m%d"));

        let mut headers = BTreeMap::from([("host", SIGNING_HOST.to_string())]);
        if let Some(content_type) = &options.content_type {
            headers.insert("content-type", content_type.clone());
        }
        let signed_headers = headers.keys().copied().collect::<Vec<_>>().join(";");
        let canonical_headers: String = headers
            .iter()
            .map(|(name, value)| format!("{}:{}\n", name, value.trim()))
            .collect();

        let query = BTreeMap::from([
            ("X-Goog-Algorithm", SIGNING_ALGORITHM.to_string()),
            ("X-Goog-Credential", format!("{}/{}", self.client_email, scope)),
            ("X-Goog-Date", timestamp.clone()),
            ("X-Goog-Expires", expires_in.to_string()),
            ("X-Goog-SignedHeaders", signed_headers.clone()),
        ]);
        let canonical_query = query
            .iter()
            .map(|(key, value)| format!("{}={}", percent_encode(key), percent_encode(value)))
            .collect::<Vec<_>>()
            .join("&");

        let canonical_uri = format!("/{}/{}", bucket, encode_path(object));
        let canonical_request = format!(
            "{}\n{}\n{}\n{}\n{}\nUNSIGNED-PAYLOAD",
            options.method, canonical_uri, canonical_query, canonical_headers, signed_headers
        );

        let string_to_sign = format!(
            "{}\n{}\n{}\n{}",
            SIGNING_ALGORITHM,
            timestamp,
            scope,
            hex::encode(Sha256::digest(canonical_request.as_bytes()))
        );

        let key = parse_private_key(&self.private_key)
            .map_err(|e| StorageError::SigningError(format!("Invalid private key: {}", e)))?;
        let signature = SigningKey::<Sha256>::new(key).sign(string_to_sign.as_bytes());

        Ok(format!(
            "https://{}{}?{}&X-Goog-Signature={}",
            SIGNING_HOST,
            canonical_uri,
            canonical_query,
            hex::encode(signature.to_bytes())
        ))
    }
}

/// RFC 3986 encoding: everything but unreserved characters is escaped.
pub(crate) fn percent_encode(value: &str) -> String {
    url::form_urlencoded::byte_serialize(value.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
        .replace('*', "%2A")
        .replace("%7E", "~")
}

fn encode_path(path: &str) -> String {
    path.split('/').map(percent_encode).collect::<Vec<_>>().join("/")
}
