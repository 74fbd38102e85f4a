/*
 * Responsibility
 * - Router に紐づける共有コンテキスト (AppState)
 *   - identity: 起動時に一度だけ作る authority client (以後 read-only)
 *   - identity_timeout: authority 呼び出し 1 回あたりの上限
 * - Clone 前提で持つ (内部は Arc/Clone cheap)
 */
use std::sync::Arc;
use std::time::Duration;

use crate::services::identity::IdentityAuthority;

#[derive(Clone)]
pub struct AppState {
    pub identity: Arc<dyn IdentityAuthority>,
    pub identity_timeout: Duration,
}

impl AppState {
    pub fn new(identity: Arc<dyn IdentityAuthority>, identity_timeout: Duration) -> Self {
        Self {
            identity,
            identity_timeout,
        }
    }
}
