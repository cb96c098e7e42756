//! Service-account authentication for the publishing API.
//!
//! Uses the OAuth 2.0 JWT-bearer grant: a signed RS256 assertion is
//! exchanged at the key's token endpoint for a short-lived bearer token.

use jsonwebtoken::{Algorithm, EncodingKey, Header};
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Error, Result};
use crate::utils::io;

pub const ANDROID_PUBLISHER_SCOPE: &str = "https://www.googleapis.com/auth/androidpublisher";
pub const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";
const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const ASSERTION_LIFETIME_SECS: i64 = 3600;

/// The fields of a Google service-account JSON key that authentication needs.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceAccountKey {
    #[serde(rename = "type")]
    pub key_type: Option<String>,
    pub client_email: String,
    pub private_key: String,
    #[serde(default)]
    pub private_key_id: Option<String>,
    #[serde(default)]
    pub token_uri: Option<String>,
}

#[derive(Debug, Serialize)]
struct AssertionClaims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Clone)]
pub struct AccessToken {
    pub token: String,
}

impl ServiceAccountKey {
    pub fn load(path: &Path) -> Result<Self> {
        let content = io::read_file(path, "read service account file")?;
        Self::from_json(&path.display().to_string(), &content)
    }

    pub fn from_json(source: &str, content: &str) -> Result<Self> {
        let key: Self = serde_json::from_str(content)
            .map_err(|e| Error::auth_invalid_credentials(source, e.to_string()))?;

        if let Some(kind) = key.key_type.as_deref() {
            if kind != "service_account" {
                return Err(Error::auth_invalid_credentials(
                    source,
                    format!("expected a service_account key, found '{}'", kind),
                ));
            }
        }

        Ok(key)
    }

    pub fn token_uri(&self) -> &str {
        self.token_uri.as_deref().unwrap_or(DEFAULT_TOKEN_URI)
    }

    /// Signed assertion requesting `scope`, issued at `issued_at` (unix seconds).
    pub fn assertion(&self, scope: &str, issued_at: i64) -> Result<String> {
        let key = EncodingKey::from_rsa_pem(self.private_key.as_bytes()).map_err(|e| {
            Error::auth_invalid_credentials(&self.client_email, format!("private key: {}", e))
        })?;

        let mut header = Header::new(Algorithm::RS256);
        header.kid = self.private_key_id.clone();

        let claims = AssertionClaims {
            iss: &self.client_email,
            scope,
            aud: self.token_uri(),
            iat: issued_at,
            exp: issued_at + ASSERTION_LIFETIME_SECS,
        };

        jsonwebtoken::encode(&header, &claims, &key)
            .map_err(|e| Error::auth_invalid_credentials(&self.client_email, e.to_string()))
    }

    /// Exchange a fresh assertion for an access token.
    pub fn fetch_access_token(&self, http: &Client, scope: &str) -> Result<AccessToken> {
        let assertion = self.assertion(scope, chrono::Utc::now().timestamp())?;

        let response = http
            .post(self.token_uri())
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
            .send()
            .map_err(|e| Error::auth_token_failed(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .map_err(|e| Error::auth_token_failed(e.to_string()))?;
        if !status.is_success() {
            return Err(Error::auth_token_failed(format!(
                "HTTP {}: {}",
                status.as_u16(),
                body
            )));
        }

        let parsed: TokenResponse = serde_json::from_str(&body)
            .map_err(|e| Error::auth_token_failed(format!("invalid token response: {}", e)))?;

        Ok(AccessToken {
            token: parsed.access_token,
        })
    }
}
