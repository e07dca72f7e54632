use chrono::Utc;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use tokio::fs;

use crate::config::CredentialsSource;
use crate::error::{config_error, upstream_error, RelayResult};

/// Write access to events only
pub const SCOPE: &str = "https://www.googleapis.com/auth/calendar.events";

const TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const GRANT_TYPE: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";

/// Assertion lifetime in seconds
const ASSERTION_TTL: i64 = 3600;

/// The two service-account fields the relay needs
#[derive(Debug, Clone)]
pub struct ServiceAccountKey {
    pub client_email: String,
    pub private_key: String,
}

/// Claims of the signed JWT-bearer assertion
#[derive(Debug, Serialize)]
struct AssertionClaims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    exp: i64,
    iat: i64,
}

/// Parse a service-account JSON document into the fields we use
pub fn parse_service_account_key(json: &str) -> RelayResult<ServiceAccountKey> {
    let document: Value = serde_json::from_str(json)
        .map_err(|e| config_error(&format!("Malformed service account JSON: {}", e)))?;

    let client_email = document
        .get("client_email")
        .and_then(|v| v.as_str())
        .filter(|s| !s.is_empty());
    let private_key = document
        .get("private_key")
        .and_then(|v| v.as_str())
        .filter(|s| !s.is_empty());

    match (client_email, private_key) {
        (Some(client_email), Some(private_key)) => Ok(ServiceAccountKey {
            client_email: client_email.to_string(),
            private_key: private_key.to_string(),
        }),
        _ => Err(config_error(
            "Service account JSON is missing client_email or private_key",
        )),
    }
}

/// Resolve the service-account key from the configured source.
///
/// Runs per request; nothing is cached between calls.
pub async fn resolve_key(source: Option<&CredentialsSource>) -> RelayResult<ServiceAccountKey> {
    let source = source.ok_or_else(|| {
        config_error(
            "Google credentials are not configured \
             (set GOOGLE_CREDENTIALS, GOOGLE_SERVICE_ACCOUNT_KEY or GOOGLE_CREDENTIALS_FILE)",
        )
    })?;

    let json = match source {
        CredentialsSource::Inline(text) => text.clone(),
        CredentialsSource::File(path) => fs::read_to_string(path).await.map_err(|e| {
            config_error(&format!(
                "Failed to read credentials file {}: {}",
                path.display(),
                e
            ))
        })?,
    };

    parse_service_account_key(&json)
}

/// Sign a short-lived RS256 assertion for the JWT-bearer grant
fn sign_assertion(key: &ServiceAccountKey) -> RelayResult<String> {
    let encoding_key = EncodingKey::from_rsa_pem(key.private_key.as_bytes())
        .map_err(|e| config_error(&format!("Invalid service account private key: {}", e)))?;

    let now = Utc::now().timestamp();
    let claims = AssertionClaims {
        iss: &key.client_email,
        scope: SCOPE,
        aud: TOKEN_URL,
        iat: now,
        exp: now + ASSERTION_TTL,
    };

    encode(&Header::new(Algorithm::RS256), &claims, &encoding_key)
        .map_err(|e| config_error(&format!("Failed to sign token assertion: {}", e)))
}

/// Exchange a signed assertion for an access token
pub async fn fetch_access_token(client: &Client, key: &ServiceAccountKey) -> RelayResult<String> {
    let assertion = sign_assertion(key)?;

    let params = [("grant_type", GRANT_TYPE), ("assertion", assertion.as_str())];

    let response = client
        .post(TOKEN_URL)
        .form(&params)
        .send()
        .await
        .map_err(|e| upstream_error(&format!("Failed to exchange token: {}", e)))?;

    if !response.status().is_success() {
        let status = response.status();
        let error_body = response
            .text()
            .await
            .unwrap_or_else(|_| "Could not read error response".to_string());
        return Err(upstream_error(&format!(
            "Failed to exchange token: HTTP {} - {}",
            status, error_body
        )));
    }

    let token: Value = response
        .json()
        .await
        .map_err(|e| upstream_error(&format!("Failed to parse token response: {}", e)))?;

    token
        .get("access_token")
        .and_then(|t| t.as_str())
        .map(String::from)
        .ok_or_else(|| upstream_error("Token response missing 'access_token' field"))
}
