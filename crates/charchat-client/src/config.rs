use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::token::TokenStore;

/// Default backend host, used when `CHARCHAT_API_URL` is not set
pub const DEFAULT_API_URL: &str = "https://characters-2-0.onrender.com";

/// Environment variable overriding the backend base URL
pub const API_URL_ENV: &str = "CHARCHAT_API_URL";

/// Request timeout, generous to tolerate slow AI-generation responses
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Shorter timeout for the liveness probe
pub const HEALTH_TIMEOUT: Duration = Duration::from_secs(5);

/// Configuration for the charchat API client
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Backend base URL (no trailing slash)
    pub base_url: String,
    /// Timeout applied to every request
    pub timeout: Duration,
    /// Where the session token is persisted
    pub token_path: PathBuf,
    /// Print request/response debug output
    pub verbose: bool,
}

impl ClientConfig {
    /// Create a configuration for the given base URL with default timeout and
    /// token location
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            timeout: REQUEST_TIMEOUT,
            token_path: TokenStore::default_path(),
            verbose: false,
        }
    }

    /// Read the base URL from the environment, falling back to the default
    /// remote host
    pub fn from_env() -> Self {
        let base_url = env::var(API_URL_ENV).unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        Self::new(base_url)
    }

    pub fn with_token_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.token_path = path.into();
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }
}
