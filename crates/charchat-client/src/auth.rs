use chrono::Utc;
use reqwest::Method;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::http::ApiClient;
use crate::token::{decode_claims, UserInfo};

#[derive(Debug, Serialize)]
struct Credentials<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Debug, Deserialize)]
struct LoginResponse {
    #[serde(default)]
    token: Option<String>,
}

impl ApiClient {
    /// Create a new account. Does not persist a token; callers log in
    /// separately afterwards.
    pub async fn register(
        &self,
        username: &str,
        password: &str,
    ) -> Result<serde_json::Value, ApiError> {
        let builder = self
            .request(Method::POST, "/register")
            .json(&Credentials { username, password });
        self.execute(builder).await
    }

    /// Authenticate and persist the returned session token
    pub async fn login(&self, username: &str, password: &str) -> Result<(), ApiError> {
        let builder = self
            .request(Method::POST, "/login")
            .json(&Credentials { username, password });
        let response: LoginResponse = self.execute(builder).await?;

        let token = response.token.ok_or_else(|| ApiError::Unknown {
            message: "Login response did not include a token".to_string(),
        })?;
        self.token_store()
            .save(&token)
            .map_err(|e| ApiError::Unknown {
                message: format!("Failed to persist session token: {}", e),
            })?;
        Ok(())
    }

    /// Clear the persisted token. Callers decide what happens next (e.g. the
    /// REPL drops back to its login prompt).
    pub fn logout(&self) -> Result<(), ApiError> {
        self.token_store().clear().map_err(|e| ApiError::Unknown {
            message: format!("Failed to clear session token: {}", e),
        })
    }

    /// True only when a token is stored, its payload decodes, and its
    /// expiration is strictly in the future
    pub fn is_authenticated(&self) -> bool {
        self.token_store()
            .load()
            .as_deref()
            .and_then(decode_claims)
            .map(|claims| claims.expires_after(Utc::now().timestamp()))
            .unwrap_or(false)
    }

    /// Identity derived from the stored token. Absent (never an error) when
    /// no token is stored or its payload cannot be decoded.
    pub fn user_info(&self) -> Option<UserInfo> {
        let claims = decode_claims(&self.token_store().load()?)?;
        Some(UserInfo {
            user_id: claims.user_id(),
            username: claims.username,
            exp: claims.exp,
        })
    }
}
