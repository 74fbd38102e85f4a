//! Clerk backend API client.
//!
//! Wraps a single `reqwest::Client` configured with the secret key as a
//! default bearer header. Built once at startup and shared via `Arc`.
//!
//! Endpoints (relative to the configured API url):
//! - `POST tokens/verify`  body `{"token": "..."}` -> session claims
//! - `GET  users/{user_id}`                        -> user profile
//!
//! Retries are NOT built in: a single failed call is a single failed request.
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use serde::{Serialize, de::DeserializeOwned};
use url::Url;

use crate::services::identity::authority::{
    IdentityAuthority, IdentityError, SessionClaims, UserProfile,
};

const VERIFY_ENDPOINT: &str = "tokens/verify";
const USERS_ENDPOINT: &str = "users";

// Upstream error bodies are only logged; keep them short.
const MAX_ERROR_BODY_CHARS: usize = 256;

#[derive(Serialize)]
struct VerifyTokenRequest<'a> {
    token: &'a str,
}

#[derive(Clone)]
pub struct ClerkClient {
    http: reqwest::Client,
    base_url: Url,
}

impl std::fmt::Debug for ClerkClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Do not print key material
        f.debug_struct("ClerkClient")
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl ClerkClient {
    pub fn new(base_url: Url, secret_key: &str, timeout: Duration) -> Result<Self, IdentityError> {
        if base_url.cannot_be_a_base() {
            return Err(IdentityError::InvalidUrl(base_url.to_string()));
        }

        let mut auth = HeaderValue::from_str(&format!("Bearer {}", secret_key))
            .map_err(|_| IdentityError::InvalidSecret)?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);

        let http = reqwest::Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()
            .map_err(IdentityError::Client)?;

        Ok(Self { http, base_url })
    }

    // Append path segments to the base url. Each segment is percent-encoded,
    // including `/`, so a subject id can never escape its segment.
    fn endpoint_url(&self, segments: &[&str]) -> Result<Url, IdentityError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| IdentityError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn send<T: DeserializeOwned>(
        &self,
        endpoint: &'static str,
        request: reqwest::RequestBuilder,
    ) -> Result<T, IdentityError> {
        let resp = request
            .send()
            .await
            .map_err(|source| IdentityError::Http { endpoint, source })?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(IdentityError::Status {
                endpoint,
                status: status.as_u16(),
                body: body.chars().take(MAX_ERROR_BODY_CHARS).collect(),
            });
        }

        resp.json::<T>()
            .await
            .map_err(|source| IdentityError::Decode { endpoint, source })
    }
}

#[async_trait]
impl IdentityAuthority for ClerkClient {
    fn backend_name(&self) -> &'static str {
        "clerk"
    }

    async fn verify_token(&self, token: &str) -> Result<SessionClaims, IdentityError> {
        let url = self.endpoint_url(&["tokens", "verify"])?;
        let request = self.http.post(url).json(&VerifyTokenRequest { token });

        let claims: SessionClaims = self.send(VERIFY_ENDPOINT, request).await?;

        if claims.sub.trim().is_empty() {
            return Err(IdentityError::InvalidClaims("empty 'sub' claim"));
        }

        Ok(claims)
    }

    async fn get_user(&self, user_id: &str) -> Result<UserProfile, IdentityError> {
        let url = self.endpoint_url(&[USERS_ENDPOINT, user_id])?;

        self.send(USERS_ENDPOINT, self.http.get(url)).await
    }
}
