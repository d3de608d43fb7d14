use reqwest::StatusCode;
use thiserror::Error;

/// Closed taxonomy of user-facing API errors.
///
/// Every request either resolves with its payload or rejects with exactly one
/// of these kinds; callers display the message and never interpret raw HTTP
/// status codes themselves.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP 400, carrying the backend-provided message when present
    #[error("{message}")]
    InvalidRequest { message: String },

    /// HTTP 401; the stored session token has already been cleared
    #[error("Please log in to continue.")]
    Unauthenticated,

    /// HTTP 403
    #[error("You don't have permission to perform this action.")]
    Forbidden,

    /// HTTP 404
    #[error("The requested resource was not found.")]
    NotFound,

    /// HTTP 429
    #[error("Too many requests. Please wait a moment and try again.")]
    RateLimited,

    /// Any 5xx status; backend internals are not leaked to the user
    #[error("Server error. Please try again later.")]
    Server { status: u16 },

    /// No response was received (connection failure or timeout)
    #[error("Network connection failed. Please check your internet connection.")]
    Network,

    /// Anything else
    #[error("{message}")]
    Unknown { message: String },
}

impl ApiError {
    /// Normalize a non-success HTTP response into an error kind.
    ///
    /// 401 is not handled here: the transport layer intercepts it to clear the
    /// stored token before surfacing [`ApiError::Unauthenticated`].
    pub fn from_response(status: StatusCode, body: &str) -> Self {
        let backend_message = backend_error_message(body);
        match status.as_u16() {
            400 => ApiError::InvalidRequest {
                message: backend_message
                    .unwrap_or_else(|| "Invalid request. Please check your input.".to_string()),
            },
            401 => ApiError::Unauthenticated,
            403 => ApiError::Forbidden,
            404 => ApiError::NotFound,
            429 => ApiError::RateLimited,
            s if (500..600).contains(&s) => ApiError::Server { status: s },
            s => ApiError::Unknown {
                message: backend_message
                    .unwrap_or_else(|| format!("Request failed with status {}", s)),
            },
        }
    }

    /// Normalize a transport failure (the request produced no response)
    pub fn from_transport(err: reqwest::Error) -> Self {
        if err.is_builder() {
            ApiError::Unknown {
                message: err.to_string(),
            }
        } else if err.is_connect() || err.is_timeout() || err.status().is_none() {
            ApiError::Network
        } else {
            ApiError::Unknown {
                message: err.to_string(),
            }
        }
    }

    /// Original HTTP status, where one was received
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::InvalidRequest { .. } => Some(400),
            ApiError::Unauthenticated => Some(401),
            ApiError::Forbidden => Some(403),
            ApiError::NotFound => Some(404),
            ApiError::RateLimited => Some(429),
            ApiError::Server { status } => Some(*status),
            ApiError::Network | ApiError::Unknown { .. } => None,
        }
    }

    /// Stable machine-readable kind name
    pub fn kind(&self) -> &'static str {
        match self {
            ApiError::InvalidRequest { .. } => "invalid_request",
            ApiError::Unauthenticated => "unauthenticated",
            ApiError::Forbidden => "forbidden",
            ApiError::NotFound => "not_found",
            ApiError::RateLimited => "rate_limited",
            ApiError::Server { .. } => "server_error",
            ApiError::Network => "network_error",
            ApiError::Unknown { .. } => "unknown_error",
        }
    }
}

/// Pull a human-readable message out of a backend error body, if any
fn backend_error_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value
        .get("error")
        .or_else(|| value.get("message"))
        .and_then(|v| v.as_str())
        .map(|s| s.to_string())
}
