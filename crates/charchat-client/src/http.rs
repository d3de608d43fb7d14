use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::{Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;

use charchat_logging::{log_request, log_response};

use crate::config::{ClientConfig, HEALTH_TIMEOUT};
use crate::error::ApiError;
use crate::token::TokenStore;

/// Single configured transport shared by all requests.
///
/// Construct one at application start and pass it by reference; it owns the
/// base URL, the fixed 30 s timeout and the token store. Every outgoing
/// request picks up the stored bearer token, and any 401 response clears it
/// before the error reaches the caller.
#[derive(Debug)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    store: TokenStore,
    verbose: bool,
}

impl ApiClient {
    pub fn new(config: ClientConfig) -> Result<Self, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .default_headers(headers)
            .build()
            .map_err(ApiError::from_transport)?;

        Ok(Self {
            http,
            base_url: config.base_url,
            store: TokenStore::new(config.token_path),
            verbose: config.verbose,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn token_store(&self) -> &TokenStore {
        &self.store
    }

    /// Build a request for the given path, attaching the stored bearer token
    /// when one is present. A missing token never fails the request.
    pub(crate) fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        let mut builder = self.http.request(method, url);
        if let Some(token) = self.store.load() {
            builder = builder.bearer_auth(token);
        }
        builder
    }

    /// Send a request and normalize the outcome.
    ///
    /// A 401 response unconditionally clears the stored token (clearing an
    /// already-cleared token is a no-op); every other failure maps into the
    /// [`ApiError`] taxonomy. Nothing is retried.
    pub(crate) async fn execute<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
    ) -> Result<T, ApiError> {
        let request = builder.build().map_err(ApiError::from_transport)?;
        let token = self.store.load();
        log_request(
            request.method().as_str(),
            request.url().as_str(),
            token.as_deref(),
            request.body().and_then(|b| b.as_bytes()),
            self.verbose,
        );

        let response = self
            .http
            .execute(request)
            .await
            .map_err(ApiError::from_transport)?;
        let status = response.status();
        let body = response.text().await.map_err(ApiError::from_transport)?;
        log_response(&status, &body, self.verbose);

        if status == StatusCode::UNAUTHORIZED {
            // Stale or invalid session: drop the token before surfacing the error
            let _ = self.store.clear();
            return Err(ApiError::Unauthenticated);
        }
        if !status.is_success() {
            return Err(ApiError::from_response(status, &body));
        }

        let payload = if body.trim().is_empty() { "null" } else { body.as_str() };
        serde_json::from_str(payload).map_err(|e| ApiError::Unknown {
            message: format!("Unexpected response shape: {}", e),
        })
    }

    /// Liveness probe with its own short timeout. Never errors; an unreachable
    /// or unhealthy backend simply reports `false`.
    pub async fn health(&self) -> bool {
        let result = self
            .request(Method::GET, "/health")
            .timeout(HEALTH_TIMEOUT)
            .send()
            .await;
        matches!(result, Ok(response) if response.status().is_success())
    }
}
