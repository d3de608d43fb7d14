//! # charchat-client
//!
//! HTTP client for the character chat backend.
//!
//! The crate owns the three concerns every caller shares:
//!
//! - **Transport**: a single configured `reqwest` client (base URL, 30 s
//!   timeout, JSON headers) that injects the stored bearer token into every
//!   request and drops the token on any 401 response.
//! - **Session**: login/register/logout plus token-derived identity. The JWT
//!   payload is decoded for display purposes only; the signature is never
//!   verified client-side.
//! - **Normalization**: every operation resolves with a typed payload or
//!   rejects with one [`ApiError`] from a closed taxonomy. Callers never see
//!   raw transport errors or HTTP status codes.
//!
//! ## Example
//!
//! ```rust,no_run
//! use charchat_client::{ApiClient, ClientConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), charchat_client::ApiError> {
//!     let client = ApiClient::new(ClientConfig::from_env())?;
//!
//!     client.login("alice", "secret").await?;
//!     let turn = client.send_message("revanth-reddy", "hello", true, None, None).await?;
//!     for message in &turn.messages {
//!         println!("{}: {}", message.role, message.content);
//!     }
//!     Ok(())
//! }
//! ```

pub mod auth;
pub mod chat;
pub mod config;
pub mod error;
pub mod http;
pub mod token;

pub use config::{ClientConfig, DEFAULT_API_URL, HEALTH_TIMEOUT, REQUEST_TIMEOUT};
pub use error::ApiError;
pub use http::ApiClient;
pub use token::{decode_claims, TokenClaims, TokenStore, UserInfo};
