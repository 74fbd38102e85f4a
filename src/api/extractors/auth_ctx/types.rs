/*
 * Responsibility
 * - Handler から見える「認証済みコンテキスト」の型
 * - gate middleware が検証して request extensions に格納し、handler はこの型だけを受け取る
 *
 * Notes
 * - token の検証は identity authority 側の責務 (ここではローカル検証しない)
 */

/// 認証済みのリクエストに付与されるコンテキスト
///
/// - `user_id` は authority が返した claims の `sub` そのもの (加工しない)
/// - `session_id` はログ相関用 (authority が返した場合のみ)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthCtx {
    pub user_id: String,
    pub session_id: Option<String>,
}

impl AuthCtx {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            session_id: None,
        }
    }

    pub fn with_session_id(mut self, session_id: Option<String>) -> Self {
        self.session_id = session_id;
        self
    }
}
