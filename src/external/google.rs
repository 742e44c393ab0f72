use crate::config::GoogleConfig;
use crate::error::{AppError, AppResult};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

const TOKENINFO_ENDPOINT: &str = "https://oauth2.googleapis.com/tokeninfo";

/// Identity asserted by a verified OAuth ID token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OAuthIdentity {
    pub subject: String,
    pub email: String,
    pub name: Option<String>,
}

#[async_trait]
pub trait OAuthVerifier: Send + Sync {
    async fn verify(&self, id_token: &str) -> AppResult<OAuthIdentity>;
}

#[derive(Clone)]
pub struct GoogleOAuthService {
    http: Client,
    cfg: GoogleConfig,
}

impl GoogleOAuthService {
    pub fn new(cfg: GoogleConfig) -> Self {
        Self {
            http: Client::new(),
            cfg,
        }
    }
}

#[derive(Debug, Deserialize)]
struct TokenInfo {
    aud: String,
    sub: String,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    email_verified: Option<String>,
    #[serde(default)]
    name: Option<String>,
}

impl TokenInfo {
    fn into_identity(self, client_id: &str) -> AppResult<OAuthIdentity> {
        if self.aud != client_id {
            return Err(AppError::AuthError("Google token audience mismatch".into()));
        }
        if self.email_verified.as_deref() != Some("true") {
            return Err(AppError::AuthError("Google email is not verified".into()));
        }
        let email = self
            .email
            .filter(|e| !e.is_empty())
            .ok_or_else(|| AppError::AuthError("Google token has no email".into()))?;
        Ok(OAuthIdentity {
            subject: self.sub,
            email,
            name: self.name,
        })
    }
}

#[async_trait]
impl OAuthVerifier for GoogleOAuthService {
    async fn verify(&self, id_token: &str) -> AppResult<OAuthIdentity> {
        if self.cfg.client_id.is_empty() {
            return Err(AppError::InternalError(
                "Google sign-in is not configured".into(),
            ));
        }
        if id_token.is_empty() || id_token.len() > 4096 {
            return Err(AppError::ValidationError("Invalid Google credential".into()));
        }

        let resp = self
            .http
            .get(TOKENINFO_ENDPOINT)
            .query(&[("id_token", id_token)])
            .send()
            .await?;

        if !resp.status().is_success() {
            log::warn!("Google token rejected: HTTP {}", resp.status().as_u16());
            return Err(AppError::AuthError("Invalid Google token".into()));
        }

        let info: TokenInfo = resp.json().await?;
        info.into_identity(&self.cfg.client_id)
    }
}
