use std::fs;
use std::io;
use std::path::PathBuf;

use base64::engine::general_purpose::{URL_SAFE, URL_SAFE_NO_PAD};
use base64::Engine;
use serde::Deserialize;

/// File-backed storage for the bearer token.
///
/// One well-known path holds the raw token string; it is read before every
/// request and removed wholesale on logout or when the backend answers 401.
#[derive(Debug, Clone)]
pub struct TokenStore {
    path: PathBuf,
}

impl TokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Default token location under the platform data directory
    pub fn default_path() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("charchat")
            .join("token")
    }

    /// Read the stored token, if any. Unreadable or empty files count as
    /// "no token stored".
    pub fn load(&self) -> Option<String> {
        let raw = fs::read_to_string(&self.path).ok()?;
        let token = raw.trim().to_string();
        if token.is_empty() {
            None
        } else {
            Some(token)
        }
    }

    /// Persist a token, creating parent directories as needed
    pub fn save(&self, token: &str) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, token)
    }

    /// Remove the stored token. Clearing an already-cleared token is a no-op.
    pub fn clear(&self) -> io::Result<()> {
        match fs::remove_file(&self.path) {
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            other => other,
        }
    }
}

/// Claims extracted from the token payload.
///
/// Decoding is a display/UX convenience only: the signature is never verified
/// client-side, and malformed tokens yield `None` rather than an error.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenClaims {
    #[serde(default)]
    pub sub: Option<serde_json::Value>,
    #[serde(default)]
    pub user_id: Option<serde_json::Value>,
    #[serde(default)]
    pub username: Option<String>,
    /// Expiration, epoch seconds
    #[serde(default)]
    pub exp: Option<i64>,
}

impl TokenClaims {
    /// User identifier, preferring the backend's `user_id` over the standard
    /// `sub` claim
    pub fn user_id(&self) -> Option<String> {
        claim_to_string(self.user_id.as_ref()).or_else(|| claim_to_string(self.sub.as_ref()))
    }

    /// True only when the expiration is strictly in the future. A missing
    /// `exp` claim counts as expired.
    pub fn expires_after(&self, now_epoch_secs: i64) -> bool {
        matches!(self.exp, Some(exp) if exp > now_epoch_secs)
    }
}

fn claim_to_string(value: Option<&serde_json::Value>) -> Option<String> {
    match value? {
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Decoded identity derived from the stored token
#[derive(Debug, Clone, PartialEq)]
pub struct UserInfo {
    pub user_id: Option<String>,
    pub username: Option<String>,
    /// Expiration, epoch seconds
    pub exp: Option<i64>,
}

/// Decode the claims from a token's middle base64url segment.
///
/// Returns `None` for anything that is not three dot-separated segments with
/// a JSON object payload. Never panics and never verifies the signature.
pub fn decode_claims(token: &str) -> Option<TokenClaims> {
    let mut segments = token.split('.');
    let _header = segments.next()?;
    let payload = segments.next()?;
    segments.next()?;

    // Spec-compliant tokens are unpadded, but tolerate padded encoders
    let bytes = URL_SAFE_NO_PAD
        .decode(payload)
        .or_else(|_| URL_SAFE.decode(payload))
        .ok()?;
    serde_json::from_slice(&bytes).ok()
}
