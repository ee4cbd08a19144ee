use std::fmt;

use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;
use tracing::error;

use crate::config::config::Config;

const GOOGLE_AUTH_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const GOOGLE_SCOPES: &str = "openid email profile";

pub const GOOGLE_PROVIDER: &str = "google";

#[derive(Debug, Error)]
pub enum OAuthError {
    #[error("Token exchange failed: {0}")]
    TokenExchange(String),

    #[error("Invalid ID token: {0}")]
    InvalidIdToken(String),

    #[error("Identity has no email address")]
    MissingEmail,

    #[error("Email address {0} is not verified")]
    UnverifiedEmail(String),
}

/// Tokens returned by the provider, before encryption.
#[derive(Debug, Clone, Default)]
pub struct ProviderTokens {
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    pub expires_at: Option<i64>,
    pub scope: Option<String>,
}

/// A verified identity handed back by the provider after the code exchange.
#[derive(Debug, Clone)]
pub struct ProviderIdentity {
    pub provider: String,
    pub provider_account_id: String,
    pub email: String,
    pub name: Option<String>,
    pub image: Option<String>,
    pub tokens: ProviderTokens,
}

#[async_trait]
pub trait IdentityProvider: Send + Sync + fmt::Debug {
    /// Consent screen URL carrying the given `state`.
    fn authorize_url(&self, state: &str) -> String;

    /// Trade an authorization code for a verified identity.
    async fn exchange_code(&self, code: &str) -> Result<ProviderIdentity, OAuthError>;
}

#[derive(Debug, Deserialize)]
struct GoogleTokenResponse {
    access_token: String,
    id_token: String,
    refresh_token: Option<String>,
    expires_in: Option<i64>,
    scope: Option<String>,
}

pub struct GoogleProvider {
    client_id: String,
    client_secret: String,
    redirect_uri: String,
    http_client: Client,
    id_token_client: google_oauth::AsyncClient,
}

impl fmt::Debug for GoogleProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GoogleProvider")
            .field("client_id", &self.client_id)
            .field("redirect_uri", &self.redirect_uri)
            .finish_non_exhaustive()
    }
}

impl GoogleProvider {
    pub fn new(config: &Config) -> Self {
        Self {
            client_id: config.google_client_id.clone(),
            client_secret: config.google_client_secret.clone(),
            redirect_uri: config.google_redirect_uri(),
            http_client: Client::new(),
            id_token_client: google_oauth::AsyncClient::new(config.google_client_id.clone()),
        }
    }
}

#[async_trait]
impl IdentityProvider for GoogleProvider {
    fn authorize_url(&self, state: &str) -> String {
        format!(
            "{}?client_id={}&redirect_uri={}&response_type=code&scope={}&state={}&access_type=offline&prompt=select_account",
            GOOGLE_AUTH_URL,
            urlencoding::encode(&self.client_id),
            urlencoding::encode(&self.redirect_uri),
            urlencoding::encode(GOOGLE_SCOPES),
            urlencoding::encode(state)
        )
    }

    async fn exchange_code(&self, code: &str) -> Result<ProviderIdentity, OAuthError> {
        let response = self
            .http_client
            .post(GOOGLE_TOKEN_URL)
            .form(&[
                ("code", code),
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("redirect_uri", self.redirect_uri.as_str()),
                ("grant_type", "authorization_code"),
            ])
            .send()
            .await
            .map_err(|e| OAuthError::TokenExchange(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            error!("Google token endpoint returned {}: {}", status, body);
            return Err(OAuthError::TokenExchange(format!("status {}", status)));
        }

        let tokens = response
            .json::<GoogleTokenResponse>()
            .await
            .map_err(|e| OAuthError::TokenExchange(e.to_string()))?;

        let payload = self
            .id_token_client
            .validate_id_token(&tokens.id_token)
            .await
            .map_err(|e| OAuthError::InvalidIdToken(e.to_string()))?;

        let email = payload.email.ok_or(OAuthError::MissingEmail)?;
        if payload.email_verified == Some(false) {
            return Err(OAuthError::UnverifiedEmail(email));
        }

        Ok(ProviderIdentity {
            provider: GOOGLE_PROVIDER.to_string(),
            provider_account_id: payload.sub,
            email,
            name: payload.name,
            image: payload.picture,
            tokens: ProviderTokens {
                access_token: Some(tokens.access_token),
                refresh_token: tokens.refresh_token,
                expires_at: tokens
                    .expires_in
                    .map(|secs| Utc::now().timestamp() + secs),
                scope: tokens.scope,
            },
        })
    }
}
