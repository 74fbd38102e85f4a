//! Identity authority interface used by the auth gate and the protected handler.
use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

/// Authority-layer errors (transport/status/decoding).
///
/// Note:
/// - Kept independent from `AppError`; the gate maps every variant to 401 and
///   the handler maps every variant to 500. None of this reaches the caller.
#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("http error calling {endpoint}: {source}")]
    Http {
        endpoint: &'static str,
        source: reqwest::Error,
    },
    #[error("{endpoint} returned {status}: {body}")]
    Status {
        endpoint: &'static str,
        status: u16,
        body: String,
    },
    #[error("failed to decode response from {endpoint}: {source}")]
    Decode {
        endpoint: &'static str,
        source: reqwest::Error,
    },
    #[error("{endpoint} did not answer within {after:?}")]
    Timeout {
        endpoint: &'static str,
        after: Duration,
    },
    #[error("invalid claims: {0}")]
    InvalidClaims(&'static str),
    #[error("invalid authority url: {0}")]
    InvalidUrl(String),
    #[error("secret key contains characters not allowed in a header")]
    InvalidSecret,
    #[error("failed to build http client: {0}")]
    Client(reqwest::Error),
}

/// Session claims returned by the authority for a verified token.
///
/// Unknown claims are ignored; only the subject and session id are carried on.
#[derive(Debug, Clone, Deserialize)]
pub struct SessionClaims {
    pub sub: String,
    #[serde(default)]
    pub sid: Option<String>,
}

/// User profile as returned by the authority's user endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct UserProfile {
    #[serde(default)]
    pub first_name: Option<String>,
}

/// The two operations this service consumes from the identity provider.
///
/// Implementations are built once at startup and shared across requests
/// (`Arc<dyn IdentityAuthority>`), so they must be `Send + Sync` and hold no
/// per-request state. Neither operation retries.
#[async_trait]
pub trait IdentityAuthority: Send + Sync + 'static {
    // Returns the backend name (for logging).
    fn backend_name(&self) -> &'static str;

    // Validate an opaque session token and return its claims.
    async fn verify_token(&self, token: &str) -> Result<SessionClaims, IdentityError>;

    // Fetch the profile of an already-authenticated subject.
    async fn get_user(&self, user_id: &str) -> Result<UserProfile, IdentityError>;
}

/// Bound a single authority call, whatever the implementation does internally.
///
/// The outer request timeout is sized from the same value, so a stalled
/// authority always ends here (401 in the gate, 500 in the handler).
pub async fn with_deadline<T, F>(
    endpoint: &'static str,
    after: Duration,
    call: F,
) -> Result<T, IdentityError>
where
    F: Future<Output = Result<T, IdentityError>>,
{
    tokio::time::timeout(after, call)
        .await
        .map_err(|_| IdentityError::Timeout { endpoint, after })?
}
