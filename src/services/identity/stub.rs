//! In-memory authority for router/handler tests.
use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use crate::services::identity::authority::{
    IdentityAuthority, IdentityError, SessionClaims, UserProfile,
};

#[derive(Default)]
pub struct StubAuthority {
    // token -> subject
    sessions: HashMap<String, String>,
    // subject -> first name (None = profile without a first name)
    users: HashMap<String, Option<String>>,
    // simulated authority latency, applied to every call
    delay: Option<Duration>,

    verify_calls: AtomicUsize,
    user_calls: AtomicUsize,
    seen_tokens: Mutex<Vec<String>>,
}

impl StubAuthority {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_session(mut self, token: &str, subject: &str) -> Self {
        self.sessions.insert(token.to_string(), subject.to_string());
        self
    }

    pub fn with_user(mut self, subject: &str, first_name: Option<&str>) -> Self {
        self.users
            .insert(subject.to_string(), first_name.map(str::to_string));
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    async fn stall(&self) {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
    }

    pub fn verify_calls(&self) -> usize {
        self.verify_calls.load(Ordering::SeqCst)
    }

    pub fn user_calls(&self) -> usize {
        self.user_calls.load(Ordering::SeqCst)
    }

    pub fn seen_tokens(&self) -> Vec<String> {
        self.seen_tokens.lock().unwrap().clone()
    }
}

#[async_trait]
impl IdentityAuthority for StubAuthority {
    fn backend_name(&self) -> &'static str {
        "stub"
    }

    async fn verify_token(&self, token: &str) -> Result<SessionClaims, IdentityError> {
        self.verify_calls.fetch_add(1, Ordering::SeqCst);
        self.seen_tokens.lock().unwrap().push(token.to_string());
        self.stall().await;

        let sub = self
            .sessions
            .get(token)
            .cloned()
            .ok_or_else(|| IdentityError::Status {
                endpoint: "tokens/verify",
                status: 401,
                body: "invalid token".to_string(),
            })?;

        Ok(SessionClaims {
            sub,
            sid: Some("sess_stub".to_string()),
        })
    }

    async fn get_user(&self, user_id: &str) -> Result<UserProfile, IdentityError> {
        self.user_calls.fetch_add(1, Ordering::SeqCst);
        self.stall().await;

        let first_name = self
            .users
            .get(user_id)
            .cloned()
            .ok_or_else(|| IdentityError::Status {
                endpoint: "users",
                status: 404,
                body: "not found".to_string(),
            })?;

        Ok(UserProfile { first_name })
    }
}
