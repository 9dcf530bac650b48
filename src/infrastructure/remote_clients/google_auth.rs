// ============================================================
// GOOGLE AUTH
// ============================================================
// Bearer tokens for the Sheets API: a fixed token or a service account
// exchanging a signed JWT at the OAuth token endpoint

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::domain::app_config::SheetsConfig;
use crate::domain::error::{AppError, Result};

pub const SHEETS_SCOPE: &str = "https://www.googleapis.com/auth/spreadsheets";
pub const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const ASSERTION_LIFETIME_SECS: i64 = 3600;
const REFRESH_MARGIN_SECS: i64 = 60;

#[async_trait]
pub trait AccessTokenSource: Send + Sync {
    async fn access_token(&self) -> Result<String>;
}

/// Pick the credential source from config: service account first, then a
/// pre-issued token.
pub fn token_source(config: &SheetsConfig) -> Result<Arc<dyn AccessTokenSource>> {
    match config.service_account() {
        Some((email, key)) => {
            tracing::info!(client_email = email, "Using service account for Google Sheets");
            Ok(Arc::new(ServiceAccountTokenProvider::new(
                email,
                key,
                &config.token_url,
            )?))
        }
        None => Ok(Arc::new(StaticToken::new(config.access_token.clone()))),
    }
}

/// A token issued out of band; never refreshed
pub struct StaticToken(Option<String>);

impl StaticToken {
    pub fn new(token: Option<String>) -> Self {
        Self(token)
    }
}

#[async_trait]
impl AccessTokenSource for StaticToken {
    async fn access_token(&self) -> Result<String> {
        self.0
            .as_deref()
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .map(str::to_string)
            .ok_or_else(|| {
                AppError::Config(
                    "Missing Sheets API credentials: configure a service account or token"
                        .to_string(),
                )
            })
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct AssertionClaims {
    iss: String,
    scope: String,
    aud: String,
    exp: i64,
    iat: i64,
}

struct CachedToken {
    token: String,
    expires_at: DateTime<Utc>,
}

/// Service account flow: sign an RS256 assertion, trade it for an access
/// token, reuse that token until shortly before it expires.
pub struct ServiceAccountTokenProvider {
    client: reqwest::Client,
    client_email: String,
    signing_key: EncodingKey,
    token_url: String,
    cached: Mutex<Option<CachedToken>>,
}

impl ServiceAccountTokenProvider {
    /// `private_key` is PEM; `\n` escapes from env files are accepted.
    pub fn new(client_email: &str, private_key: &str, token_url: &str) -> Result<Self> {
        let pem = private_key.replace("\\n", "\n");
        let signing_key = EncodingKey::from_rsa_pem(pem.as_bytes())
            .map_err(|e| AppError::Config(format!("Invalid service account private key: {}", e)))?;

        Ok(Self {
            client: reqwest::Client::new(),
            client_email: client_email.to_string(),
            signing_key,
            token_url: token_url.to_string(),
            cached: Mutex::new(None),
        })
    }

    fn sign_assertion(&self, now: DateTime<Utc>) -> Result<String> {
        let claims = AssertionClaims {
            iss: self.client_email.clone(),
            scope: SHEETS_SCOPE.to_string(),
            aud: self.token_url.clone(),
            exp: now.timestamp() + ASSERTION_LIFETIME_SECS,
            iat: now.timestamp(),
        };
        jsonwebtoken::encode(&Header::new(Algorithm::RS256), &claims, &self.signing_key)
            .map_err(|e| AppError::Security(format!("Failed to sign JWT: {}", e)))
    }

    async fn request_token(&self) -> Result<CachedToken> {
        let now = Utc::now();
        let assertion = self.sign_assertion(now)?;

        let response = self
            .client
            .post(&self.token_url)
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
            .send()
            .await
            .map_err(|e| AppError::RemoteService(format!("Token request failed: {}", e)))?;

        let status = response.status();
        let body: serde_json::Value = response.json().await.unwrap_or(serde_json::Value::Null);

        if !status.is_success() {
            let reason = body["error_description"]
                .as_str()
                .or_else(|| body["error"].as_str())
                .unwrap_or("unknown error");
            tracing::error!(status = %status, reason, "Google token exchange failed");
            return Err(AppError::RemoteService(format!(
                "Failed to obtain Google access token: {}",
                reason
            )));
        }

        let token = body["access_token"]
            .as_str()
            .filter(|token| !token.is_empty())
            .ok_or_else(|| {
                AppError::RemoteService(
                    "Token response did not include an access token".to_string(),
                )
            })?;
        let expires_in = body["expires_in"].as_i64().unwrap_or(ASSERTION_LIFETIME_SECS);

        tracing::debug!(expires_in, "Obtained Google access token");
        Ok(CachedToken {
            token: token.to_string(),
            expires_at: now + Duration::seconds(expires_in),
        })
    }
}

#[async_trait]
impl AccessTokenSource for ServiceAccountTokenProvider {
    async fn access_token(&self) -> Result<String> {
        // Held across the exchange so concurrent callers share one request
        let mut cached = self.cached.lock().await;

        let refresh_after = Utc::now() + Duration::seconds(REFRESH_MARGIN_SECS);
        if let Some(current) = cached.as_ref().filter(|c| c.expires_at > refresh_after) {
            return Ok(current.token.clone());
        }

        let fresh = self.request_token().await?;
        let token = fresh.token.clone();
        *cached = Some(fresh);
        Ok(token)
    }
}
